//! Versioned, purpose-bound security tokens.
//!
//! A PAST token is `<version>.<purpose>.<payload>[.<footer>]`. The version
//! fixes the primitives, and the purpose picks one of them:
//!
//! | purpose | key | v1 | v2 |
//! |---------|-----|----|----|
//! | `auth` | [`AuthenticationKey`] | HMAC-SHA384 | HMAC-SHA512-256 |
//! | `enc` | [`EncryptionKey`] | AES-256-CTR + HMAC-SHA384 | XChaCha20-Poly1305 |
//! | `sign` | [`SecretKey`] / [`PublicKey`] | RSA-PSS-SHA384 | Ed25519 |
//!
//! Every entry point checks that the key belongs to the token's purpose, and
//! that asymmetric keys belong to the token's version, before any
//! cryptography runs.
//!
//! ```
//! use past::{EncryptionKey, Key, PastError, ProtocolVersion};
//!
//! let key = Key::from(EncryptionKey::random()?);
//!
//! let token = past::encrypt(ProtocolVersion::V2, br#"{"sub":"alice"}"#, &key, b"kid:1")?;
//! assert!(token.starts_with("v2.enc."));
//!
//! let payload = past::decrypt(&token, &key, b"kid:1")?;
//! assert_eq!(payload, br#"{"sub":"alice"}"#);
//!
//! assert!(matches!(
//!     past::decrypt(&token, &key, b"kid:2"),
//!     Err(PastError::FooterMismatch)
//! ));
//! # Ok::<(), PastError>(())
//! ```

pub mod key;
pub mod registry;
mod suite;

pub use key::{Key, PublicKey, SecretKey};
pub use past_core::key::{AuthenticationKey, EncryptionKey};
pub use past_core::{Header, KeyKind, Malformed, PastError, ProtocolVersion, Purpose, Token};

/// Authenticate `payload` with a symmetric key. The payload stays readable.
pub fn authenticate(
    version: ProtocolVersion,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    suite::seal(version, Purpose::Auth, payload, key, footer)
}

/// Verify an `auth` token and return its payload.
pub fn verify_authentication(token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, PastError> {
    suite::unseal(token, Some(Purpose::Auth), key, footer)
}

/// Encrypt `payload` with a symmetric key.
pub fn encrypt(
    version: ProtocolVersion,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    suite::seal(version, Purpose::Enc, payload, key, footer)
}

/// Decrypt an `enc` token.
pub fn decrypt(token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, PastError> {
    suite::unseal(token, Some(Purpose::Enc), key, footer)
}

/// Sign `payload` with a secret key bound to `version`. The payload stays readable.
pub fn sign(
    version: ProtocolVersion,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    suite::seal(version, Purpose::Sign, payload, key, footer)
}

/// Verify a `sign` token with the public key, or with the secret key it was signed with.
pub fn verify_signature(token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, PastError> {
    suite::unseal(token, Some(Purpose::Sign), key, footer)
}

/// Seal a token for a purpose chosen at runtime.
pub fn issue(
    version: ProtocolVersion,
    purpose: Purpose,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    suite::seal(version, purpose, payload, key, footer)
}

/// Unseal a token of any purpose, as long as `key` fits it.
pub fn open(token: &str, key: &Key, footer: &[u8]) -> Result<Vec<u8>, PastError> {
    suite::unseal(token, None, key, footer)
}
