use ed25519_dalek::Signature;
use past_core::key::{HasKey, Public, Secret};
use past_core::pae::pre_auth_encode;
use past_core::version::{SealingVersion, Sign, UnsealingVersion};
use past_core::{Malformed, PastError};

use super::{PublicKey, SecretKey, V2, header};

impl HasKey<Public> for V2 {
    type Key = PublicKey;

    /// Accepts the 32 byte compressed point.
    fn decode(bytes: &[u8]) -> Result<PublicKey, PastError> {
        let key = bytes.try_into().map_err(|_| PastError::InvalidKey)?;
        ed25519_dalek::VerifyingKey::from_bytes(key)
            .map(PublicKey)
            .map_err(|_| PastError::InvalidKey)
    }
    fn encode(key: &PublicKey) -> Box<[u8]> {
        key.0.as_bytes().to_vec().into_boxed_slice()
    }
}

impl HasKey<Secret> for V2 {
    type Key = SecretKey;

    /// Accepts the 32 byte seed followed by the 32 byte public key.
    fn decode(bytes: &[u8]) -> Result<SecretKey, PastError> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| PastError::InvalidKey)?;

        // rejects a public half that does not belong to the seed
        ed25519_dalek::SigningKey::from_keypair_bytes(bytes)
            .map(SecretKey)
            .map_err(|_| PastError::InvalidKey)
    }
    fn encode(key: &SecretKey) -> Box<[u8]> {
        Box::new(key.0.to_keypair_bytes())
    }
}

impl SecretKey {
    pub fn random() -> Result<Self, PastError> {
        let mut seed = zeroize::Zeroizing::new([0; 32]);
        getrandom::fill(&mut *seed).map_err(|_| PastError::CryptoError)?;
        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&seed)))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }
}

impl SealingVersion<Sign> for V2 {
    fn unsealing_key(key: &SecretKey) -> PublicKey {
        key.public_key()
    }

    fn random() -> Result<SecretKey, PastError> {
        SecretKey::random()
    }

    fn nonce() -> Result<Vec<u8>, PastError> {
        Ok(Vec::new())
    }

    fn dangerous_seal_with_nonce(
        key: &SecretKey,
        mut payload: Vec<u8>,
        footer: &[u8],
    ) -> Result<Vec<u8>, PastError> {
        use ed25519_dalek::Signer;

        let signature = key
            .0
            .try_sign(&preauth_sign(&payload, footer))
            .map_err(|_| PastError::CryptoError)?;
        payload.extend_from_slice(&signature.to_bytes());
        Ok(payload)
    }
}

impl UnsealingVersion<Sign> for V2 {
    fn unseal<'a>(
        key: &PublicKey,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError> {
        let (cleartext, tag) = payload
            .split_last_chunk::<{ Signature::BYTE_SIZE }>()
            .ok_or(Malformed::TooShort)?;

        let signature = Signature::from_bytes(tag);
        key.0
            .verify_strict(&preauth_sign(cleartext, footer), &signature)
            .map_err(|_| PastError::AuthenticationFailure)?;

        Ok(cleartext)
    }
}

fn preauth_sign(cleartext: &[u8], footer: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    pre_auth_encode([&header::<Sign>(), &[cleartext], &[footer]], &mut v);
    v
}
