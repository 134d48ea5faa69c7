//! Runtime keys.
//!
//! A [`Key`] knows its [`KeyKind`], and asymmetric keys also know the
//! [`ProtocolVersion`] they were generated for. The registry checks both
//! before any token is sealed or unsealed.

use core::fmt;

use past_core::key::{AuthenticationKey, EncryptionKey, HasKey, Public, Secret};
use past_core::version::{Auth, Enc, SealingVersion, Sign};
use past_core::{KeyKind, PastError, ProtocolVersion};
use past_v1::core::V1;
use past_v2::core::V2;

/// A signing key, bound to the version it was generated for.
#[derive(Clone)]
pub enum SecretKey {
    /// RSA-2048 with PSS and SHA-384
    V1(past_v1::SecretKey),
    /// Ed25519
    V2(past_v2::SecretKey),
}

/// A verifying key, bound to the version of its secret half.
#[derive(Clone)]
pub enum PublicKey {
    V1(past_v1::PublicKey),
    V2(past_v2::PublicKey),
}

/// Any key a PAST token can be sealed or unsealed with.
#[derive(Clone)]
pub enum Key {
    Authentication(AuthenticationKey),
    Encryption(EncryptionKey),
    Secret(SecretKey),
    Public(PublicKey),
}

impl SecretKey {
    /// Generate a new signing key for `version`.
    ///
    /// v1 generates a 2048-bit RSA modulus, which is slow.
    pub fn random(version: ProtocolVersion) -> Result<Self, PastError> {
        match version {
            ProtocolVersion::V1 => <V1 as SealingVersion<Sign>>::random().map(Self::V1),
            ProtocolVersion::V2 => <V2 as SealingVersion<Sign>>::random().map(Self::V2),
        }
    }

    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::V1(_) => ProtocolVersion::V1,
            Self::V2(_) => ProtocolVersion::V2,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::V1(key) => PublicKey::V1(<V1 as SealingVersion<Sign>>::unsealing_key(key)),
            Self::V2(key) => PublicKey::V2(<V2 as SealingVersion<Sign>>::unsealing_key(key)),
        }
    }

    /// PKCS#1 (DER or PEM) for v1, `seed || public` for v2.
    pub fn from_bytes(version: ProtocolVersion, bytes: &[u8]) -> Result<Self, PastError> {
        match version {
            ProtocolVersion::V1 => <V1 as HasKey<Secret>>::decode(bytes).map(Self::V1),
            ProtocolVersion::V2 => <V2 as HasKey<Secret>>::decode(bytes).map(Self::V2),
        }
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        match self {
            Self::V1(key) => <V1 as HasKey<Secret>>::encode(key),
            Self::V2(key) => <V2 as HasKey<Secret>>::encode(key),
        }
    }
}

impl PublicKey {
    pub fn version(&self) -> ProtocolVersion {
        match self {
            Self::V1(_) => ProtocolVersion::V1,
            Self::V2(_) => ProtocolVersion::V2,
        }
    }

    /// SPKI (DER or PEM) for v1, the 32 byte point for v2.
    pub fn from_bytes(version: ProtocolVersion, bytes: &[u8]) -> Result<Self, PastError> {
        match version {
            ProtocolVersion::V1 => <V1 as HasKey<Public>>::decode(bytes).map(Self::V1),
            ProtocolVersion::V2 => <V2 as HasKey<Public>>::decode(bytes).map(Self::V2),
        }
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        match self {
            Self::V1(key) => <V1 as HasKey<Public>>::encode(key),
            Self::V2(key) => <V2 as HasKey<Public>>::encode(key),
        }
    }
}

impl Key {
    /// Generate a new key of the given kind.
    ///
    /// Symmetric keys are generated the same way for every version, but only
    /// asymmetric keys stay bound to `version`. Public keys cannot be
    /// generated on their own, derive them with [`Key::public_key`].
    pub fn random(kind: KeyKind, version: ProtocolVersion) -> Result<Self, PastError> {
        match kind {
            KeyKind::SymmetricAuthentication => match version {
                ProtocolVersion::V1 => <V1 as SealingVersion<Auth>>::random(),
                ProtocolVersion::V2 => <V2 as SealingVersion<Auth>>::random(),
            }
            .map(Self::Authentication),
            KeyKind::SymmetricEncryption => match version {
                ProtocolVersion::V1 => <V1 as SealingVersion<Enc>>::random(),
                ProtocolVersion::V2 => <V2 as SealingVersion<Enc>>::random(),
            }
            .map(Self::Encryption),
            KeyKind::AsymmetricSecret => SecretKey::random(version).map(Self::Secret),
            KeyKind::AsymmetricPublic => Err(PastError::InvalidKey),
        }
    }

    /// Decode a key from its raw byte encoding.
    pub fn from_bytes(
        kind: KeyKind,
        version: ProtocolVersion,
        bytes: &[u8],
    ) -> Result<Self, PastError> {
        match kind {
            KeyKind::SymmetricAuthentication => {
                AuthenticationKey::decode(bytes).map(Self::Authentication)
            }
            KeyKind::SymmetricEncryption => EncryptionKey::decode(bytes).map(Self::Encryption),
            KeyKind::AsymmetricSecret => SecretKey::from_bytes(version, bytes).map(Self::Secret),
            KeyKind::AsymmetricPublic => PublicKey::from_bytes(version, bytes).map(Self::Public),
        }
    }

    pub fn to_bytes(&self) -> Box<[u8]> {
        match self {
            Self::Authentication(key) => key.encode(),
            Self::Encryption(key) => key.encode(),
            Self::Secret(key) => key.to_bytes(),
            Self::Public(key) => key.to_bytes(),
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Authentication(_) => KeyKind::SymmetricAuthentication,
            Self::Encryption(_) => KeyKind::SymmetricEncryption,
            Self::Secret(_) => KeyKind::AsymmetricSecret,
            Self::Public(_) => KeyKind::AsymmetricPublic,
        }
    }

    /// The version an asymmetric key is bound to. Symmetric keys work with every version.
    pub fn version(&self) -> Option<ProtocolVersion> {
        match self {
            Self::Authentication(_) | Self::Encryption(_) => None,
            Self::Secret(key) => Some(key.version()),
            Self::Public(key) => Some(key.version()),
        }
    }

    /// The verifying half of a secret key, or the key itself if it is already public.
    pub fn public_key(&self) -> Option<Key> {
        match self {
            Self::Authentication(_) | Self::Encryption(_) => None,
            Self::Secret(key) => Some(Self::Public(key.public_key())),
            Self::Public(key) => Some(Self::Public(key.clone())),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Key");
        s.field("kind", &self.kind());
        if let Some(version) = self.version() {
            s.field("version", &version);
        }
        s.finish_non_exhaustive()
    }
}

impl From<AuthenticationKey> for Key {
    fn from(key: AuthenticationKey) -> Self {
        Self::Authentication(key)
    }
}

impl From<EncryptionKey> for Key {
    fn from(key: EncryptionKey) -> Self {
        Self::Encryption(key)
    }
}

impl From<SecretKey> for Key {
    fn from(key: SecretKey) -> Self {
        Self::Secret(key)
    }
}

impl From<PublicKey> for Key {
    fn from(key: PublicKey) -> Self {
        Self::Public(key)
    }
}

impl From<past_v1::SecretKey> for Key {
    fn from(key: past_v1::SecretKey) -> Self {
        Self::Secret(SecretKey::V1(key))
    }
}

impl From<past_v2::SecretKey> for Key {
    fn from(key: past_v2::SecretKey) -> Self {
        Self::Secret(SecretKey::V2(key))
    }
}

impl From<past_v1::PublicKey> for Key {
    fn from(key: past_v1::PublicKey) -> Self {
        Self::Public(PublicKey::V1(key))
    }
}

impl From<past_v2::PublicKey> for Key {
    fn from(key: past_v2::PublicKey) -> Self {
        Self::Public(PublicKey::V2(key))
    }
}

#[cfg(test)]
mod tests {
    use past_core::Purpose;

    use super::*;

    #[test]
    fn kinds_and_versions() {
        let key = Key::random(KeyKind::SymmetricEncryption, ProtocolVersion::V1).unwrap();
        assert_eq!(key.kind(), KeyKind::SymmetricEncryption);
        assert_eq!(key.version(), None);
        assert!(key.public_key().is_none());

        let key = Key::random(KeyKind::AsymmetricSecret, ProtocolVersion::V2).unwrap();
        assert_eq!(key.kind(), KeyKind::AsymmetricSecret);
        assert_eq!(key.version(), Some(ProtocolVersion::V2));

        let public = key.public_key().unwrap();
        assert_eq!(public.kind(), KeyKind::AsymmetricPublic);
        assert_eq!(public.version(), Some(ProtocolVersion::V2));
    }

    #[test]
    fn random_keys_seal_their_own_tokens() {
        for version in ProtocolVersion::ALL {
            for (kind, purpose) in [
                (KeyKind::SymmetricAuthentication, Purpose::Auth),
                (KeyKind::SymmetricEncryption, Purpose::Enc),
                (KeyKind::AsymmetricSecret, Purpose::Sign),
            ] {
                let key = Key::random(kind, version).unwrap();
                assert_eq!(key.kind(), kind);

                let token = crate::issue(version, purpose, b"hello", &key, b"").unwrap();
                let unsealing = key.public_key().unwrap_or(key);
                assert_eq!(crate::open(&token, &unsealing, b"").unwrap(), b"hello");
            }
        }
    }

    #[test]
    fn derived_public_key_matches() {
        let key = past_v2::SecretKey::random().unwrap();
        let expected = <V2 as HasKey<Public>>::encode(&key.public_key());

        let secret = SecretKey::V2(key);
        assert_eq!(secret.public_key().to_bytes(), expected);
    }

    #[test]
    fn public_keys_are_derived() {
        assert!(matches!(
            Key::random(KeyKind::AsymmetricPublic, ProtocolVersion::V2),
            Err(PastError::InvalidKey)
        ));
    }

    #[test]
    fn bytes() {
        let key = Key::from_bytes(KeyKind::SymmetricAuthentication, ProtocolVersion::V2, &[9; 32])
            .unwrap();
        assert_eq!(&*key.to_bytes(), &[9; 32]);

        let secret = Key::random(KeyKind::AsymmetricSecret, ProtocolVersion::V2).unwrap();
        let public = secret.public_key().unwrap();
        let decoded =
            Key::from_bytes(KeyKind::AsymmetricPublic, ProtocolVersion::V2, &public.to_bytes())
                .unwrap();
        assert_eq!(decoded.to_bytes(), public.to_bytes());

        // a v2 public key is not a valid v1 SPKI document
        assert!(matches!(
            Key::from_bytes(KeyKind::AsymmetricPublic, ProtocolVersion::V1, &public.to_bytes()),
            Err(PastError::InvalidKey)
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let key = Key::from(AuthenticationKey::from_raw_bytes([0xab; 32]));
        assert_eq!(format!("{key:?}"), "Key { kind: SymmetricAuthentication, .. }");
    }
}
