//! Core traits and types for PAST tokens.
//!
//! This crate is not meant to be used directly. The `past` crate wires the
//! version suites together, and `past-v1`/`past-v2` implement the
//! cryptography on top of the traits defined here.

pub mod encodings;
pub mod header;
pub mod key;
pub mod pae;
pub mod tokens;
pub mod version;

pub use encodings::{Header, Token};
pub use header::{KeyKind, ProtocolVersion, Purpose};

mod sealed {
    pub trait Sealed {}
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Error returned for all PAST operations that can fail
pub enum PastError {
    /// The token string was not of a valid form.
    #[error("could not parse the token: {0}")]
    MalformedToken(#[from] Malformed),
    /// The MAC, AEAD tag or signature did not verify.
    #[error("token could not be authenticated")]
    AuthenticationFailure,
    /// The key cannot be used for tokens of this purpose.
    #[error("a {key} key cannot be used for {purpose} tokens")]
    KeyPurposeMismatch { key: KeyKind, purpose: Purpose },
    /// The asymmetric key was generated for a different protocol version.
    #[error("key is bound to {key} but the token is {token}")]
    KeyVersionMismatch {
        key: ProtocolVersion,
        token: ProtocolVersion,
    },
    /// The footer in the token is not the footer the caller expected.
    #[error("token footer does not match the expected footer")]
    FooterMismatch,
    /// Could not decode the provided key bytes
    #[error("could not parse the key")]
    InvalidKey,
    /// A primitive or the system RNG failed while sealing.
    #[error("cryptographic operation failed")]
    CryptoError,
    /// There was an error with payload processing
    #[error("there was an error with the payload encoding: {0}")]
    PayloadError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Why a token string was rejected before any cryptographic check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Malformed {
    #[error("expected 3 or 4 segments, found {0}")]
    SegmentCount(usize),
    #[error("unknown protocol version")]
    UnknownVersion,
    #[error("unknown purpose")]
    UnknownPurpose,
    #[error("expected a {expected} token, found {found}")]
    UnexpectedHeader { expected: Header, found: Header },
    #[error("segment is not unpadded base64url")]
    Base64,
    #[error("footer segment is present but empty")]
    EmptyFooter,
    #[error("payload is shorter than the version overhead")]
    TooShort,
}
