//! PAST v2 (RustCrypto)
//!
//! * `auth`: HMAC-SHA512, truncated to 32 bytes
//! * `enc`: XChaCha20-Poly1305 with a BLAKE2b derived nonce
//! * `sign`: Ed25519
//!
//! ```
//! use past_v2::{SecretKey, SignedToken, VerifiedToken};
//!
//! // create a new keypair
//! let secret_key = SecretKey::random().unwrap();
//! let public_key = secret_key.public_key();
//!
//! // create and sign a new token
//! let token = VerifiedToken::new(b"{\"sub\":\"alice\"}".to_vec())
//!     .with_footer(b"kid:1".to_vec())
//!     .sign(&secret_key)
//!     .unwrap()
//!     .to_string();
//! assert!(token.starts_with("v2.sign."));
//!
//! // parse the token and verify the signature
//! let token: SignedToken = token.parse().unwrap();
//! let verified = token.verify(&public_key, b"kid:1").unwrap();
//! assert_eq!(verified.payload, b"{\"sub\":\"alice\"}");
//! ```
#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use past_core::PastError;

/// A token carrying a v2 MAC, not yet verified
pub type AuthenticatedToken = past_core::tokens::AuthenticatedToken<core::V2>;
/// A token with secret data
pub type EncryptedToken = past_core::tokens::EncryptedToken<core::V2>;
/// A token with publically readable data, but not yet verified
pub type SignedToken = past_core::tokens::SignedToken<core::V2>;

/// An [`AuthenticatedToken`] before authenticating or after verifying
pub type UnauthenticatedToken = past_core::tokens::UnsealedToken<core::V2, past_core::version::Auth>;
/// An [`EncryptedToken`] before encrypting or after decrypting
pub type DecryptedToken = past_core::tokens::UnsealedToken<core::V2, past_core::version::Enc>;
/// A [`SignedToken`] before signing or after verifying
pub type VerifiedToken = past_core::tokens::UnsealedToken<core::V2, past_core::version::Sign>;

/// Key used to [`authenticate`](UnauthenticatedToken::authenticate) and [`verify`](AuthenticatedToken::verify)
pub type AuthenticationKey = past_core::key::AuthenticationKey;
/// Key used for [`encryption`](DecryptedToken::encrypt) and [`decryption`](EncryptedToken::decrypt)
pub type EncryptionKey = past_core::key::EncryptionKey;
/// Private key used for token [`signing`](VerifiedToken::sign)
pub use crate::core::SecretKey;
/// Public key used for signature [`verification`](SignedToken::verify)
pub use crate::core::PublicKey;
