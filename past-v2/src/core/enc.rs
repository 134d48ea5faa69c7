use chacha20poly1305::XChaCha20Poly1305;
use digest::Mac;
use generic_array::typenum::U24;
use past_core::key::{Encryption, EncryptionKey, HasKey};
use past_core::pae::pre_auth_encode;
use past_core::version::{Enc, SealingVersion, UnsealingVersion};
use past_core::{Malformed, PastError};

use super::{V2, header};

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

impl HasKey<Encryption> for V2 {
    type Key = EncryptionKey;

    fn decode(bytes: &[u8]) -> Result<EncryptionKey, PastError> {
        EncryptionKey::decode(bytes)
    }
    fn encode(key: &EncryptionKey) -> Box<[u8]> {
        key.encode()
    }
}

impl SealingVersion<Enc> for V2 {
    fn unsealing_key(key: &EncryptionKey) -> EncryptionKey {
        key.clone()
    }

    fn random() -> Result<EncryptionKey, PastError> {
        EncryptionKey::random()
    }

    fn nonce() -> Result<Vec<u8>, PastError> {
        let mut nonce = [0; NONCE_LEN];
        getrandom::fill(&mut nonce).map_err(|_| PastError::CryptoError)?;

        let mut payload = Vec::with_capacity(NONCE_LEN + TAG_LEN);
        payload.extend_from_slice(&nonce);
        Ok(payload)
    }

    fn dangerous_seal_with_nonce(
        key: &EncryptionKey,
        mut payload: Vec<u8>,
        footer: &[u8],
    ) -> Result<Vec<u8>, PastError> {
        use chacha20poly1305::aead::AeadMutInPlace;
        use cipher::KeyInit;

        let (nonce, ciphertext) = payload
            .split_first_chunk_mut::<NONCE_LEN>()
            .ok_or(PastError::CryptoError)?;

        // the random bytes key a BLAKE2b MAC over the message, the output
        // is the real nonce.
        let mut n: blake2::Blake2bMac<U24> =
            Mac::new_from_slice(nonce).expect("24 bytes is less than the 64 bytes max");
        n.update(ciphertext);
        *nonce = n.finalize().into_bytes().into();

        let nonce: &[u8; NONCE_LEN] = nonce;

        let aad = preauth_enc(nonce, footer);
        let tag = XChaCha20Poly1305::new(key.as_raw_bytes().into())
            .encrypt_in_place_detached(nonce.into(), &aad, ciphertext)
            .map_err(|_| PastError::CryptoError)?;

        payload.extend_from_slice(&tag);

        Ok(payload)
    }
}

impl UnsealingVersion<Enc> for V2 {
    fn unseal<'a>(
        key: &EncryptionKey,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError> {
        use chacha20poly1305::aead::AeadMutInPlace;
        use cipher::KeyInit;

        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(Malformed::TooShort.into());
        }

        let (ciphertext, tag) = payload
            .split_last_chunk_mut::<TAG_LEN>()
            .ok_or(Malformed::TooShort)?;
        let (nonce, ciphertext) = ciphertext
            .split_first_chunk_mut::<NONCE_LEN>()
            .ok_or(Malformed::TooShort)?;
        let nonce: &[u8; NONCE_LEN] = nonce;
        let tag: &[u8; TAG_LEN] = tag;

        let aad = preauth_enc(nonce, footer);
        XChaCha20Poly1305::new(key.as_raw_bytes().into())
            .decrypt_in_place_detached(nonce.into(), &aad, ciphertext, tag.into())
            .map_err(|_| PastError::AuthenticationFailure)?;

        Ok(ciphertext)
    }
}

fn preauth_enc(nonce: &[u8], footer: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    pre_auth_encode([&header::<Enc>(), &[nonce], &[footer]], &mut v);
    v
}
