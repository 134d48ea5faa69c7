use digest::Digest;
use past_core::key::{HasKey, Public, Secret};
use past_core::pae::pre_auth_encode;
use past_core::version::{SealingVersion, Sign, UnsealingVersion};
use past_core::{Malformed, PastError};
use rsa::pss::Signature;
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use sha2::Sha384;

use super::{PreAuthEncodeDigest, PublicKey, SecretKey, V1, header};

const MODULUS_BITS: usize = 2048;
const SIGNATURE_LEN: usize = MODULUS_BITS / 8;

impl HasKey<Public> for V1 {
    type Key = PublicKey;

    /// Accepts an SPKI document, DER or PEM.
    fn decode(bytes: &[u8]) -> Result<PublicKey, PastError> {
        use rsa::pkcs8::spki::DecodePublicKey;

        let key = if let Ok(key) = rsa::RsaPublicKey::from_public_key_der(bytes) {
            key
        } else {
            let s = str::from_utf8(bytes).map_err(|_| PastError::InvalidKey)?;
            rsa::RsaPublicKey::from_public_key_pem(s).map_err(|_| PastError::InvalidKey)?
        };

        if key.n().bits() != MODULUS_BITS {
            return Err(PastError::InvalidKey);
        }

        Ok(PublicKey(rsa::pss::VerifyingKey::new(key)))
    }
    fn encode(key: &PublicKey) -> Box<[u8]> {
        use rsa::pkcs8::spki::EncodePublicKey;

        key.0
            .to_public_key_der()
            .expect("encoding to spki der should succeed")
            .into_vec()
            .into_boxed_slice()
    }
}

impl HasKey<Secret> for V1 {
    type Key = SecretKey;

    /// Accepts a PKCS#1 `RSAPrivateKey`, DER or PEM.
    fn decode(bytes: &[u8]) -> Result<SecretKey, PastError> {
        use rsa::pkcs1::DecodeRsaPrivateKey;

        let key = if let Ok(key) = rsa::RsaPrivateKey::from_pkcs1_der(bytes) {
            key
        } else {
            let s = str::from_utf8(bytes).map_err(|_| PastError::InvalidKey)?;
            rsa::RsaPrivateKey::from_pkcs1_pem(s).map_err(|_| PastError::InvalidKey)?
        };

        if key.n().bits() != MODULUS_BITS {
            return Err(PastError::InvalidKey);
        }

        Ok(SecretKey(rsa::pss::SigningKey::new(key)))
    }
    fn encode(key: &SecretKey) -> Box<[u8]> {
        use rsa::pkcs1::EncodeRsaPrivateKey;

        let key: &rsa::RsaPrivateKey = key.0.as_ref();
        key.to_pkcs1_der()
            .expect("encoding to pkcs1 der should succeed")
            .as_bytes()
            .into()
    }
}

impl SecretKey {
    pub fn random() -> Result<Self, PastError> {
        rsa::pss::SigningKey::random(&mut OsRng, MODULUS_BITS)
            .map_err(|_| PastError::CryptoError)
            .map(Self)
    }

    pub fn public_key(&self) -> PublicKey {
        use rsa::signature::Keypair;

        PublicKey(self.0.verifying_key())
    }
}

impl SealingVersion<Sign> for V1 {
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
        use rsa::signature::RandomizedDigestSigner;

        let digest = preauth_sign(&payload, footer);
        let signature: Box<[u8]> = key
            .0
            .try_sign_digest_with_rng(&mut OsRng, digest)
            .map_err(|_| PastError::CryptoError)?
            .into();

        payload.extend_from_slice(&signature);
        Ok(payload)
    }
}

impl UnsealingVersion<Sign> for V1 {
    fn unseal<'a>(
        key: &PublicKey,
        payload: &'a mut [u8],
        footer: &[u8],
    ) -> Result<&'a [u8], PastError> {
        use rsa::signature::DigestVerifier;

        let (cleartext, tag) = payload
            .split_last_chunk::<SIGNATURE_LEN>()
            .ok_or(Malformed::TooShort)?;

        let signature =
            Signature::try_from(&tag[..]).map_err(|_| PastError::AuthenticationFailure)?;
        let digest = preauth_sign(cleartext, footer);
        DigestVerifier::<Sha384, Signature>::verify_digest(&key.0, digest, &signature)
            .map_err(|_| PastError::AuthenticationFailure)?;

        Ok(cleartext)
    }
}

fn preauth_sign(cleartext: &[u8], footer: &[u8]) -> Sha384 {
    let mut digest = Sha384::new();
    pre_auth_encode(
        [&header::<Sign>(), &[cleartext], &[footer]],
        PreAuthEncodeDigest(&mut digest),
    );
    digest
}
