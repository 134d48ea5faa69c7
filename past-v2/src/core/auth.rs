use hmac::{Hmac, Mac};
use past_core::key::{Authentication, AuthenticationKey, HasKey};
use past_core::pae::pre_auth_encode;
use past_core::version::{Auth, SealingVersion, UnsealingVersion};
use past_core::{Malformed, PastError};
use sha2::Sha512;

use super::{PreAuthEncodeDigest, V2, header};

/// HMAC-SHA512 output is truncated to its first 32 bytes.
const TAG_LEN: usize = 32;

impl HasKey<Authentication> for V2 {
    type Key = AuthenticationKey;

    fn decode(bytes: &[u8]) -> Result<AuthenticationKey, PastError> {
        AuthenticationKey::decode(bytes)
    }
    fn encode(key: &AuthenticationKey) -> Box<[u8]> {
        key.encode()
    }
}

impl SealingVersion<Auth> for V2 {
    fn unsealing_key(key: &AuthenticationKey) -> AuthenticationKey {
        key.clone()
    }

    fn random() -> Result<AuthenticationKey, PastError> {
        AuthenticationKey::random()
    }

    fn nonce() -> Result<Vec<u8>, PastError> {
        Ok(Vec::new())
    }

    fn dangerous_seal_with_nonce(
        key: &AuthenticationKey,
        mut payload: Vec<u8>,
        footer: &[u8],
    ) -> Result<Vec<u8>, PastError> {
        let tag = preauth_auth(key, &payload, footer).finalize().into_bytes();
        payload.extend_from_slice(&tag[..TAG_LEN]);
        Ok(payload)
    }
}

impl UnsealingVersion<Auth> for V2 {
    fn unseal<'a>(
        key: &AuthenticationKey,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError> {
        let (cleartext, tag) = payload
            .split_last_chunk::<TAG_LEN>()
            .ok_or(Malformed::TooShort)?;

        preauth_auth(key, cleartext, footer)
            .verify_truncated_left(tag)
            .map_err(|_| PastError::AuthenticationFailure)?;

        Ok(cleartext)
    }
}

fn preauth_auth(key: &AuthenticationKey, cleartext: &[u8], footer: &[u8]) -> Hmac<Sha512> {
    let mut mac = <Hmac<Sha512> as Mac>::new_from_slice(key.as_raw_bytes())
        .expect("hmac accepts keys of any length");

    pre_auth_encode(
        [&header::<Auth>(), &[cleartext], &[footer]],
        PreAuthEncodeDigest(&mut mac),
    );
    mac
}
