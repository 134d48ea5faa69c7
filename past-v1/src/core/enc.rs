use cipher::{KeyIvInit, StreamCipher};
use generic_array::GenericArray;
use hmac::{Hmac, Mac};
use past_core::key::{Encryption, EncryptionKey, HasKey};
use past_core::pae::pre_auth_encode;
use past_core::version::{Enc, SealingVersion, UnsealingVersion};
use past_core::{Malformed, PastError};
use sha2::Sha384;
use zeroize::Zeroizing;

use super::{PreAuthEncodeDigest, V1, header};

type Cipher = ctr::Ctr128BE<aes::Aes256>;

impl HasKey<Encryption> for V1 {
    type Key = EncryptionKey;

    fn decode(bytes: &[u8]) -> Result<EncryptionKey, PastError> {
        EncryptionKey::decode(bytes)
    }
    fn encode(key: &EncryptionKey) -> Box<[u8]> {
        key.encode()
    }
}

fn keys(key: &EncryptionKey, nonce: &[u8; 32]) -> (Cipher, Hmac<Sha384>) {
    let (salt, iv) = nonce.split_at(16);

    let hkdf = hkdf::Hkdf::<Sha384>::new(Some(salt), key.as_raw_bytes());
    let mut ek = Zeroizing::new([0; 32]);
    let mut ak = Zeroizing::new([0; 32]);
    hkdf.expand(b"past-encryption-key", &mut *ek)
        .expect("32 bytes is a valid hkdf-sha384 output length");
    hkdf.expand(b"past-auth-key-for-aead", &mut *ak)
        .expect("32 bytes is a valid hkdf-sha384 output length");

    let cipher = Cipher::new(GenericArray::from_slice(&*ek), GenericArray::from_slice(iv));
    let mac = <Hmac<Sha384> as Mac>::new_from_slice(&*ak).expect("hmac accepts keys of any length");
    (cipher, mac)
}

impl SealingVersion<Enc> for V1 {
    fn unsealing_key(key: &EncryptionKey) -> EncryptionKey {
        key.clone()
    }

    fn random() -> Result<EncryptionKey, PastError> {
        EncryptionKey::random()
    }

    fn nonce() -> Result<Vec<u8>, PastError> {
        let mut nonce = [0; 32];
        getrandom::fill(&mut nonce).map_err(|_| PastError::CryptoError)?;

        let mut payload = Vec::with_capacity(80);
        payload.extend_from_slice(&nonce);
        Ok(payload)
    }

    fn dangerous_seal_with_nonce(
        key: &EncryptionKey,
        mut payload: Vec<u8>,
        footer: &[u8],
    ) -> Result<Vec<u8>, PastError> {
        let (nonce, plaintext) = payload
            .split_first_chunk_mut::<32>()
            .ok_or(PastError::CryptoError)?;

        // the random bytes only key the nonce derivation, so a weak RNG
        // still gives a unique nonce per message.
        let mut n = <Hmac<Sha384> as Mac>::new_from_slice(nonce)
            .expect("hmac accepts keys of any length");
        n.update(plaintext);
        nonce.copy_from_slice(&n.finalize().into_bytes()[..32]);

        let (mut cipher, mut mac) = keys(key, nonce);
        cipher.apply_keystream(plaintext);
        preauth_enc(&mut mac, nonce, plaintext, footer);
        payload.extend_from_slice(&mac.finalize().into_bytes());

        Ok(payload)
    }
}

impl UnsealingVersion<Enc> for V1 {
    fn unseal<'a>(
        key: &EncryptionKey,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError> {
        if payload.len() < 80 {
            return Err(Malformed::TooShort.into());
        }

        let (ciphertext, tag) = payload
            .split_last_chunk_mut::<48>()
            .ok_or(Malformed::TooShort)?;
        let (nonce, ciphertext) = ciphertext
            .split_first_chunk_mut::<32>()
            .ok_or(Malformed::TooShort)?;

        let (mut cipher, mut mac) = keys(key, nonce);
        preauth_enc(&mut mac, nonce, ciphertext, footer);
        mac.verify_slice(tag)
            .map_err(|_| PastError::AuthenticationFailure)?;
        cipher.apply_keystream(ciphertext);

        Ok(ciphertext)
    }
}

fn preauth_enc(mac: &mut Hmac<Sha384>, nonce: &[u8], ciphertext: &[u8], footer: &[u8]) {
    pre_auth_encode(
        [&header::<Enc>(), &[nonce], &[ciphertext], &[footer]],
        PreAuthEncodeDigest(mac),
    );
}

#[cfg(test)]
mod tests {
    use past_core::tokens::{EncryptedToken, UnsealedToken};

    use super::*;

    fn key() -> EncryptionKey {
        EncryptionKey::from_raw_bytes([0x70; 32])
    }

    fn seal(payload: &[u8], footer: &[u8], nonce: [u8; 32]) -> String {
        UnsealedToken::<V1, Enc>::new(payload)
            .with_footer(footer)
            .dangerous_seal_with_nonce(&key(), nonce.to_vec())
            .unwrap()
            .to_string()
    }

    #[test]
    fn round_trip() {
        let token = UnsealedToken::<V1, Enc>::new(b"{\"sub\":\"alice\"}".to_vec())
            .with_footer(b"kid:1".to_vec())
            .encrypt(&key())
            .unwrap()
            .to_string();
        assert!(token.starts_with("v1.enc."));

        let token: EncryptedToken<V1> = token.parse().unwrap();
        let token = token.decrypt(&key(), b"kid:1").unwrap();
        assert_eq!(token.payload, b"{\"sub\":\"alice\"}");
        assert_eq!(token.footer, b"kid:1");
    }

    #[test]
    fn ciphertext_hides_plaintext() {
        let token: past_core::Token = seal(b"secret message", b"", [0; 32]).parse().unwrap();
        let payload = token.payload();
        assert_eq!(payload.len(), 32 + 14 + 48);
        assert!(!payload.windows(14).any(|w| w == b"secret message"));
    }

    #[test]
    fn nonce_is_bound_to_the_message() {
        // same randomness, same message: same token
        assert_eq!(seal(b"a", b"", [1; 32]), seal(b"a", b"", [1; 32]));

        // same randomness, different message: different nonce
        let a: past_core::Token = seal(b"a", b"", [1; 32]).parse().unwrap();
        let b: past_core::Token = seal(b"b", b"", [1; 32]).parse().unwrap();
        assert_ne!(a.payload()[..32], b.payload()[..32]);
    }

    #[test]
    fn tampered_ciphertext() {
        let token: past_core::Token = seal(b"hello", b"", [2; 32]).parse().unwrap();
        let (header, mut payload, footer) = token.into_parts();
        payload[33] ^= 1;

        let token: EncryptedToken<V1> = past_core::Token::new(header, payload, footer)
            .try_into()
            .unwrap();
        assert!(matches!(
            token.decrypt(&key(), b""),
            Err(PastError::AuthenticationFailure)
        ));
    }

    #[test]
    fn too_short() {
        let mut payload = [0; 79];
        assert!(matches!(
            <V1 as UnsealingVersion<Enc>>::unseal(&key(), &mut payload, b""),
            Err(PastError::MalformedToken(Malformed::TooShort))
        ));
    }
}
