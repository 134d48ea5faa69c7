//! PAST v1 (RustCrypto)
//!
//! * `auth`: HMAC-SHA384
//! * `enc`: AES-256-CTR with HMAC-SHA384, keys split by HKDF-SHA384
//! * `sign`: RSA-PSS with SHA-384 over a 2048-bit modulus
//!
//! ```
//! use past_v1::{AuthenticatedToken, AuthenticationKey, UnauthenticatedToken};
//!
//! let key = AuthenticationKey::random().unwrap();
//!
//! let token = UnauthenticatedToken::new(b"{\"sub\":\"alice\"}".to_vec())
//!     .with_footer(b"kid:1".to_vec())
//!     .authenticate(&key)
//!     .unwrap()
//!     .to_string();
//! assert!(token.starts_with("v1.auth."));
//!
//! let token: AuthenticatedToken = token.parse().unwrap();
//! let verified = token.verify(&key, b"kid:1").unwrap();
//! assert_eq!(verified.payload, b"{\"sub\":\"alice\"}");
//! ```
#![forbid(unsafe_code)]

/// Low level implementation primitives.
pub mod core;

pub use past_core::PastError;

/// A token carrying a v1 MAC, not yet verified
pub type AuthenticatedToken = past_core::tokens::AuthenticatedToken<core::V1>;
/// A token with secret data
pub type EncryptedToken = past_core::tokens::EncryptedToken<core::V1>;
/// A token with publically readable data, but not yet verified
pub type SignedToken = past_core::tokens::SignedToken<core::V1>;

/// An [`AuthenticatedToken`] before authenticating or after verifying
pub type UnauthenticatedToken = past_core::tokens::UnsealedToken<core::V1, past_core::version::Auth>;
/// An [`EncryptedToken`] before encrypting or after decrypting
pub type DecryptedToken = past_core::tokens::UnsealedToken<core::V1, past_core::version::Enc>;
/// A [`SignedToken`] before signing or after verifying
pub type VerifiedToken = past_core::tokens::UnsealedToken<core::V1, past_core::version::Sign>;

/// Key used to [`authenticate`](UnauthenticatedToken::authenticate) and [`verify`](AuthenticatedToken::verify)
pub type AuthenticationKey = past_core::key::AuthenticationKey;
/// Key used for [`encryption`](DecryptedToken::encrypt) and [`decryption`](EncryptedToken::decrypt)
pub type EncryptionKey = past_core::key::EncryptionKey;
/// Private key used for token [`signing`](VerifiedToken::sign)
pub use crate::core::SecretKey;
/// Public key used for signature [`verification`](SignedToken::verify)
pub use crate::core::PublicKey;
