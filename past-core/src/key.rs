//! Core traits and types for PAST keys.

use core::fmt;
use core::marker::PhantomData;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::PastError;
use crate::header::KeyKind;
use crate::sealed::Sealed;
use crate::version::Version;

/// A marker for [`Authentication`], [`Encryption`], [`Secret`], and [`Public`] keys.
pub trait KeyType: Send + Sync + Sealed + Sized + 'static {
    const KIND: KeyKind;
}

/// Marks a key as symmetric and tokens as authenticated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Authentication;
/// Marks a key as symmetric and tokens as encrypted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Encryption;
/// Marks a key as secret
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Secret;
/// Marks a key as public and tokens as signed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Public;

impl Sealed for Authentication {}
impl Sealed for Encryption {}
impl Sealed for Secret {}
impl Sealed for Public {}

impl KeyType for Authentication {
    const KIND: KeyKind = KeyKind::SymmetricAuthentication;
}

impl KeyType for Encryption {
    const KIND: KeyKind = KeyKind::SymmetricEncryption;
}

impl KeyType for Secret {
    const KIND: KeyKind = KeyKind::AsymmetricSecret;
}

impl KeyType for Public {
    const KIND: KeyKind = KeyKind::AsymmetricPublic;
}

/// Binds a concrete key representation to a version and a [`KeyType`].
pub trait HasKey<K: KeyType>: Version {
    type Key: Send + Sync;

    /// Decode the key from bytes.
    fn decode(bytes: &[u8]) -> Result<Self::Key, PastError>;
    /// Encode the key into bytes.
    fn encode(key: &Self::Key) -> Box<[u8]>;
}

/// 32 bytes of symmetric key material.
///
/// Symmetric keys are not tied to a protocol version, only to a purpose, so
/// every version shares this type.
pub struct SymmetricKey<K> {
    bytes: [u8; 32],
    _kind: PhantomData<K>,
}

/// Key used to authenticate and verify `auth` tokens.
pub type AuthenticationKey = SymmetricKey<Authentication>;
/// Key used to encrypt and decrypt `enc` tokens.
pub type EncryptionKey = SymmetricKey<Encryption>;

impl<K: KeyType> SymmetricKey<K> {
    pub fn from_raw_bytes(bytes: [u8; 32]) -> Self {
        Self {
            bytes,
            _kind: PhantomData,
        }
    }

    pub fn as_raw_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Generate a random key
    pub fn random() -> Result<Self, PastError> {
        let mut bytes = [0; 32];
        getrandom::fill(&mut bytes).map_err(|_| PastError::CryptoError)?;
        Ok(Self::from_raw_bytes(bytes))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PastError> {
        bytes
            .try_into()
            .map(Self::from_raw_bytes)
            .map_err(|_| PastError::InvalidKey)
    }

    pub fn encode(&self) -> Box<[u8]> {
        Box::new(self.bytes)
    }
}

impl<K> Clone for SymmetricKey<K> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes,
            _kind: PhantomData,
        }
    }
}

impl<K> Drop for SymmetricKey<K> {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl<K> ZeroizeOnDrop for SymmetricKey<K> {}

impl<K: KeyType> fmt::Debug for SymmetricKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("kind", &K::KIND)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_checks_length() {
        let key = AuthenticationKey::decode(&[7; 32]).unwrap();
        assert_eq!(key.as_raw_bytes(), &[7; 32]);
        assert_eq!(&*key.encode(), &[7; 32]);

        assert!(matches!(
            EncryptionKey::decode(&[7; 31]),
            Err(PastError::InvalidKey)
        ));
        assert!(matches!(
            EncryptionKey::decode(&[7; 33]),
            Err(PastError::InvalidKey)
        ));
    }

    #[test]
    fn random_keys_differ() {
        let a = EncryptionKey::random().unwrap();
        let b = EncryptionKey::random().unwrap();
        assert_ne!(a.as_raw_bytes(), b.as_raw_bytes());
    }

    #[test]
    fn debug_does_not_leak_material() {
        let key = AuthenticationKey::from_raw_bytes([0xab; 32]);
        let debug = format!("{key:?}");
        assert!(debug.contains("SymmetricAuthentication"));
        assert!(!debug.contains("171"));
    }
}
