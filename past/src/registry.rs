//! Key-purpose-version binding.
//!
//! Both checks run on every seal and unseal, before any primitive touches the
//! token. Nothing about a key's compatibility is cached.

use past_core::{PastError, ProtocolVersion, Purpose};

use crate::key::Key;

/// Check that `key` may be used for `purpose` tokens.
pub fn bind(key: &Key, purpose: Purpose) -> Result<(), PastError> {
    let kind = key.kind();
    if kind.purpose() == purpose {
        Ok(())
    } else {
        Err(PastError::KeyPurposeMismatch { key: kind, purpose })
    }
}

/// Check that `key` may create `purpose` tokens.
///
/// Like [`bind`], but also rejects public keys, which can only verify.
pub fn bind_sealing(key: &Key, purpose: Purpose) -> Result<(), PastError> {
    bind(key, purpose)?;

    let kind = key.kind();
    if kind.can_seal() {
        Ok(())
    } else {
        Err(PastError::KeyPurposeMismatch { key: kind, purpose })
    }
}

/// Check that an asymmetric `key` was generated for `version`.
///
/// Symmetric keys are accepted by every version.
pub fn bind_version(key: &Key, version: ProtocolVersion) -> Result<(), PastError> {
    match key.version() {
        Some(bound) if bound != version => Err(PastError::KeyVersionMismatch {
            key: bound,
            token: version,
        }),
        _ => Ok(()),
    }
}
