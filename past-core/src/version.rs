use crate::PastError;
use crate::header::{self, ProtocolVersion};
use crate::key::{Authentication, Encryption, HasKey, KeyType, Public, Secret};
use crate::sealed::Sealed;

/// An implementation of the PAST cryptographic schemes.
pub trait Version: Send + Sync + 'static {
    const VERSION: ProtocolVersion;
    /// Header for PAST
    const HEADER: &'static str;
}

/// Marks tokens as authenticated with a symmetric key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Auth;
/// Marks tokens as encrypted with a symmetric key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Enc;
/// Marks tokens as signed with an asymmetric key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sign;

impl Sealed for Auth {}
impl Sealed for Enc {}
impl Sealed for Sign {}

/// A marker for [`Auth`], [`Enc`], and [`Sign`], used for token encodings.
pub trait Purpose: Sealed + Send + Sync + Sized + 'static {
    const PURPOSE: header::Purpose;
    /// ".auth." or ".enc." or ".sign."
    const HEADER: &'static str;

    /// The key used to authenticate/encrypt/sign tokens.
    type SealingKey: KeyType;
    /// The key used to verify/decrypt tokens.
    type UnsealingKey: KeyType;
}

impl Purpose for Auth {
    const PURPOSE: header::Purpose = header::Purpose::Auth;
    const HEADER: &'static str = ".auth.";

    type SealingKey = Authentication;
    type UnsealingKey = Authentication;
}

impl Purpose for Enc {
    const PURPOSE: header::Purpose = header::Purpose::Enc;
    const HEADER: &'static str = ".enc.";

    type SealingKey = Encryption;
    type UnsealingKey = Encryption;
}

impl Purpose for Sign {
    const PURPOSE: header::Purpose = header::Purpose::Sign;
    const HEADER: &'static str = ".sign.";

    type SealingKey = Secret;
    type UnsealingKey = Public;
}

/// The concrete key `V` uses to create `P` tokens.
pub type SealingKey<V, P> = <V as HasKey<<P as Purpose>::SealingKey>>::Key;
/// The concrete key `V` uses to check `P` tokens.
pub type UnsealingKey<V, P> = <V as HasKey<<P as Purpose>::UnsealingKey>>::Key;

/// This PAST implementation allows authenticating/encrypting/signing tokens.
pub trait SealingVersion<P: Purpose>: HasKey<P::SealingKey> + HasKey<P::UnsealingKey> {
    /// Derive the key that checks tokens made with `key`.
    fn unsealing_key(key: &SealingKey<Self, P>) -> UnsealingKey<Self, P>;

    /// Generate a random sealing key.
    fn random() -> Result<SealingKey<Self, P>, PastError>;

    /// Generate the randomness prefix for a new token.
    ///
    /// The message is appended to the returned buffer before sealing.
    fn nonce() -> Result<Vec<u8>, PastError>;

    /// Seal `payload`, which starts with the bytes produced by [`SealingVersion::nonce`].
    ///
    /// Reusing a nonce breaks the security of the scheme. Only use this for
    /// reproducible tests.
    fn dangerous_seal_with_nonce(
        key: &SealingKey<Self, P>,
        payload: Vec<u8>,
        footer: &[u8],
    ) -> Result<Vec<u8>, PastError>;
}

/// This PAST implementation allows verifying/decrypting tokens.
pub trait UnsealingVersion<P: Purpose>: HasKey<P::UnsealingKey> {
    /// Check the token payload, returning the cleartext.
    ///
    /// Nothing is returned unless the whole payload authenticated.
    fn unseal<'a>(
        key: &UnsealingKey<Self, P>,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError>;
}
