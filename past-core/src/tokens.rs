//! Generic Tokens

use core::fmt;
use core::marker::PhantomData;

use subtle::ConstantTimeEq;

use crate::PastError;
use crate::version::{
    self, Auth, Enc, SealingKey, SealingVersion, Sign, UnsealingKey, UnsealingVersion,
};

pub type AuthenticatedToken<V> = SealedToken<V, Auth>;
pub type EncryptedToken<V> = SealedToken<V, Enc>;
pub type SignedToken<V> = SealedToken<V, Sign>;

/// An unsealed token.
///
/// This represents a PAST which has had its MAC, encryption or signature
/// validated, or which is about to be sealed.
///
/// This type is un-serializable as it isn't sealed. For that you will want [`SealedToken`].
pub struct UnsealedToken<V, P> {
    /// The message that was contained in the token
    pub payload: Vec<u8>,
    /// The footer that was sent with the token
    pub footer: Vec<u8>,
    _version: PhantomData<V>,
    _purpose: PhantomData<P>,
}

impl<V: version::Version, P: version::Purpose> UnsealedToken<V, P> {
    /// Create a new [`UnsealedToken`] builder with the given message payload
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        UnsealedToken {
            payload: payload.into(),
            footer: Vec::new(),
            _version: PhantomData,
            _purpose: PhantomData,
        }
    }

    /// Set the footer for this token.
    ///
    /// Footers are embedded into the token as base64 only. They are authenticated but not encrypted.
    pub fn with_footer(mut self, footer: impl Into<Vec<u8>>) -> Self {
        self.footer = footer.into();
        self
    }
}

/// A secured token.
///
/// This represents a PAST that is authenticated, encrypted or signed.
/// Using one of the following aliases is suggested
/// * [`AuthenticatedToken`] - An [`auth`](Auth) PAST carrying a MAC.
/// * [`EncryptedToken`] - An [`enc`](Enc) PAST that is encrypted.
/// * [`SignedToken`] - A [`sign`](Sign) PAST that is signed.
///
/// The payload is inaccessible until it has been checked with [`SealedToken::unseal`].
pub struct SealedToken<V, P> {
    pub(crate) payload: Vec<u8>,
    pub(crate) footer: Vec<u8>,
    _version: PhantomData<V>,
    _purpose: PhantomData<P>,
}

impl<V, P> SealedToken<V, P> {
    pub(crate) fn from_parts(payload: Vec<u8>, footer: Vec<u8>) -> Self {
        SealedToken {
            payload,
            footer,
            _version: PhantomData,
            _purpose: PhantomData,
        }
    }

    /// View the **unverified** footer for this token
    pub fn unverified_footer(&self) -> &[u8] {
        &self.footer
    }
}

impl<V: version::Version, P: version::Purpose> fmt::Debug for SealedToken<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SealedToken").field(&self.to_string()).finish()
    }
}

impl<V: UnsealingVersion<P>, P: version::Purpose> SealedToken<V, P> {
    /// Check the token against `key`, pinning the footer to `footer`.
    ///
    /// The footer is compared before any cryptography runs. An empty `footer`
    /// only accepts tokens without a footer.
    #[doc(alias = "decrypt")]
    #[doc(alias = "verify")]
    pub fn unseal(
        mut self,
        key: &UnsealingKey<V, P>,
        footer: &[u8],
    ) -> Result<UnsealedToken<V, P>, PastError> {
        if !bool::from(self.footer.as_slice().ct_eq(footer)) {
            return Err(PastError::FooterMismatch);
        }

        let cleartext = V::unseal(key, &mut self.payload, &self.footer)?.to_vec();

        Ok(UnsealedToken {
            payload: cleartext,
            footer: self.footer,
            _version: PhantomData,
            _purpose: PhantomData,
        })
    }
}

impl<V: SealingVersion<P>, P: version::Purpose> UnsealedToken<V, P> {
    #[doc(alias = "encrypt")]
    #[doc(alias = "sign")]
    pub fn seal(self, key: &SealingKey<V, P>) -> Result<SealedToken<V, P>, PastError> {
        let nonce = V::nonce()?;
        self.dangerous_seal_with_nonce(key, nonce)
    }

    /// Seal the token with a caller-provided randomness prefix.
    ///
    /// Reusing a nonce breaks the security of the scheme. Only use this for
    /// reproducible tests.
    pub fn dangerous_seal_with_nonce(
        self,
        key: &SealingKey<V, P>,
        mut nonce: Vec<u8>,
    ) -> Result<SealedToken<V, P>, PastError> {
        nonce.extend_from_slice(&self.payload);
        let payload = V::dangerous_seal_with_nonce(key, nonce, &self.footer)?;

        Ok(SealedToken::from_parts(payload, self.footer))
    }
}

impl<V: SealingVersion<Auth>> UnsealedToken<V, Auth> {
    #[inline(always)]
    pub fn authenticate(self, key: &SealingKey<V, Auth>) -> Result<AuthenticatedToken<V>, PastError> {
        self.seal(key)
    }
}

impl<V: UnsealingVersion<Auth>> AuthenticatedToken<V> {
    #[inline(always)]
    pub fn verify(
        self,
        key: &UnsealingKey<V, Auth>,
        footer: &[u8],
    ) -> Result<UnsealedToken<V, Auth>, PastError> {
        self.unseal(key, footer)
    }
}

impl<V: SealingVersion<Enc>> UnsealedToken<V, Enc> {
    #[inline(always)]
    pub fn encrypt(self, key: &SealingKey<V, Enc>) -> Result<EncryptedToken<V>, PastError> {
        self.seal(key)
    }
}

impl<V: UnsealingVersion<Enc>> EncryptedToken<V> {
    #[inline(always)]
    pub fn decrypt(
        self,
        key: &UnsealingKey<V, Enc>,
        footer: &[u8],
    ) -> Result<UnsealedToken<V, Enc>, PastError> {
        self.unseal(key, footer)
    }
}

impl<V: SealingVersion<Sign>> UnsealedToken<V, Sign> {
    #[inline(always)]
    pub fn sign(self, key: &SealingKey<V, Sign>) -> Result<SignedToken<V>, PastError> {
        self.seal(key)
    }
}

impl<V: UnsealingVersion<Sign>> SignedToken<V> {
    #[inline(always)]
    pub fn verify(
        self,
        key: &UnsealingKey<V, Sign>,
        footer: &[u8],
    ) -> Result<UnsealedToken<V, Sign>, PastError> {
        self.unseal(key, footer)
    }
}
