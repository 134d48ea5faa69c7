//! Dispatch from `(version, key)` into the monomorphised version suites.

use past_core::tokens::{SealedToken, UnsealedToken};
use past_core::version::{
    self, Auth, Enc, SealingKey, SealingVersion, Sign, UnsealingKey, UnsealingVersion,
};
use past_core::{Header, KeyKind, Malformed, PastError, ProtocolVersion, Purpose, Token};
use past_v1::core::V1;
use past_v2::core::V2;
use tracing::{debug, trace_span};

use crate::key::{Key, PublicKey, SecretKey};
use crate::registry;

/// Seal `payload` into a `version` token of the given `purpose`.
pub(crate) fn seal(
    version: ProtocolVersion,
    purpose: Purpose,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    let _span = trace_span!("seal", %version, %purpose).entered();

    let res = seal_inner(version, purpose, payload, key, footer);
    if let Err(error) = &res {
        debug!(%error, kind = %key.kind(), "refused to seal token");
    }
    res
}

fn seal_inner(
    version: ProtocolVersion,
    purpose: Purpose,
    payload: &[u8],
    key: &Key,
    footer: &[u8],
) -> Result<String, PastError> {
    registry::bind_sealing(key, purpose)?;
    registry::bind_version(key, version)?;

    // asymmetric keys pick their own version, which bind_version has already
    // matched against the requested one.
    match (version, key) {
        (ProtocolVersion::V1, Key::Authentication(k)) => seal_with::<V1, Auth>(k, payload, footer),
        (ProtocolVersion::V2, Key::Authentication(k)) => seal_with::<V2, Auth>(k, payload, footer),
        (ProtocolVersion::V1, Key::Encryption(k)) => seal_with::<V1, Enc>(k, payload, footer),
        (ProtocolVersion::V2, Key::Encryption(k)) => seal_with::<V2, Enc>(k, payload, footer),
        (_, Key::Secret(SecretKey::V1(k))) => seal_with::<V1, Sign>(k, payload, footer),
        (_, Key::Secret(SecretKey::V2(k))) => seal_with::<V2, Sign>(k, payload, footer),
        (_, Key::Public(_)) => Err(PastError::KeyPurposeMismatch {
            key: KeyKind::AsymmetricPublic,
            purpose,
        }),
    }
}

fn seal_with<V, P>(key: &SealingKey<V, P>, payload: &[u8], footer: &[u8]) -> Result<String, PastError>
where
    V: SealingVersion<P>,
    P: version::Purpose,
{
    let token = UnsealedToken::<V, P>::new(payload)
        .with_footer(footer)
        .seal(key)?;
    Ok(token.to_string())
}

/// Parse and check `token`, returning its payload.
///
/// With `expected` set, tokens of any other purpose are rejected as malformed
/// before the key is looked at.
pub(crate) fn unseal(
    token: &str,
    expected: Option<Purpose>,
    key: &Key,
    footer: &[u8],
) -> Result<Vec<u8>, PastError> {
    let token: Token = token.parse().inspect_err(|error| {
        debug!(%error, "rejected malformed token");
    })?;

    let header = token.header();
    let _span = trace_span!("unseal", version = %header.version, purpose = %header.purpose).entered();

    let res = unseal_inner(token, expected, key, footer);
    if let Err(error) = &res {
        debug!(%error, kind = %key.kind(), "rejected token");
    }
    res
}

fn unseal_inner(
    token: Token,
    expected: Option<Purpose>,
    key: &Key,
    footer: &[u8],
) -> Result<Vec<u8>, PastError> {
    let found = token.header();
    if let Some(purpose) = expected
        && purpose != found.purpose
    {
        let expected = Header::new(found.version, purpose);
        return Err(Malformed::UnexpectedHeader { expected, found }.into());
    }

    registry::bind(key, found.purpose)?;
    registry::bind_version(key, found.version)?;

    match (found.version, key) {
        (ProtocolVersion::V1, Key::Authentication(k)) => unseal_with::<V1, Auth>(token, k, footer),
        (ProtocolVersion::V2, Key::Authentication(k)) => unseal_with::<V2, Auth>(token, k, footer),
        (ProtocolVersion::V1, Key::Encryption(k)) => unseal_with::<V1, Enc>(token, k, footer),
        (ProtocolVersion::V2, Key::Encryption(k)) => unseal_with::<V2, Enc>(token, k, footer),
        (_, Key::Secret(SecretKey::V1(k))) => {
            unseal_with::<V1, Sign>(token, &k.public_key(), footer)
        }
        (_, Key::Secret(SecretKey::V2(k))) => {
            unseal_with::<V2, Sign>(token, &k.public_key(), footer)
        }
        (_, Key::Public(PublicKey::V1(k))) => unseal_with::<V1, Sign>(token, k, footer),
        (_, Key::Public(PublicKey::V2(k))) => unseal_with::<V2, Sign>(token, k, footer),
    }
}

fn unseal_with<V, P>(token: Token, key: &UnsealingKey<V, P>, footer: &[u8]) -> Result<Vec<u8>, PastError>
where
    V: UnsealingVersion<P>,
    P: version::Purpose,
{
    let token = SealedToken::<V, P>::try_from(token)?;
    Ok(token.unseal(key, footer)?.payload)
}
