//! PAST wire encoding.
//!
//! `<version>.<purpose>.<base64url(payload)>[.<base64url(footer)>]`, where the
//! base64url is unpadded and the footer segment is only written for a
//! non-empty footer.

use core::fmt;
use core::str::FromStr;

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::header::{ProtocolVersion, Purpose};
use crate::tokens::SealedToken;
use crate::{Malformed, PastError, version};

/// The `<version>.<purpose>` prefix of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Header {
    pub version: ProtocolVersion,
    pub purpose: Purpose,
}

impl Header {
    pub const fn new(version: ProtocolVersion, purpose: Purpose) -> Self {
        Self { version, purpose }
    }

    /// The header of a typed token.
    pub const fn of<V: version::Version, P: version::Purpose>() -> Self {
        Self::new(V::VERSION, P::PURPOSE)
    }

    fn parse(version: &str, purpose: &str) -> Result<Self, Malformed> {
        let version = ProtocolVersion::from_mnemonic(version).ok_or(Malformed::UnknownVersion)?;
        let purpose = Purpose::from_mnemonic(purpose).ok_or(Malformed::UnknownPurpose)?;
        Ok(Self { version, purpose })
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.version, self.purpose)
    }
}

/// A parsed, but not yet verified, token.
///
/// The payload is the raw suite output: the message followed by a tag or
/// signature, or the nonce, ciphertext and tag for `enc` tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    header: Header,
    payload: Vec<u8>,
    footer: Vec<u8>,
}

impl Token {
    pub fn new(header: Header, payload: Vec<u8>, footer: Vec<u8>) -> Self {
        Self {
            header,
            payload,
            footer,
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// View the **unverified** footer for this token
    pub fn unverified_footer(&self) -> &[u8] {
        &self.footer
    }

    pub fn into_parts(self) -> (Header, Vec<u8>, Vec<u8>) {
        (self.header, self.payload, self.footer)
    }
}

fn decode_segment(s: &str) -> Result<Vec<u8>, Malformed> {
    Base64UrlUnpadded::decode_vec(s).map_err(|_| Malformed::Base64)
}

fn write_token(
    f: &mut fmt::Formatter<'_>,
    header: &[&str],
    payload: &[u8],
    footer: &[u8],
) -> fmt::Result {
    for h in header {
        f.write_str(h)?;
    }
    f.write_str(&Base64UrlUnpadded::encode_string(payload))?;

    if !footer.is_empty() {
        f.write_str(".")?;
        f.write_str(&Base64UrlUnpadded::encode_string(footer))?;
    }

    Ok(())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Header { version, purpose } = self.header;
        write_token(
            f,
            &[version.mnemonic(), ".", purpose.mnemonic(), "."],
            &self.payload,
            &self.footer,
        )
    }
}

impl FromStr for Token {
    type Err = PastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segment_count = || Malformed::SegmentCount(s.split('.').count());

        let mut parts = s.splitn(5, '.');
        let (Some(version), Some(purpose), Some(payload)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(segment_count().into());
        };
        let footer = parts.next();
        if parts.next().is_some() {
            return Err(segment_count().into());
        }

        let header = Header::parse(version, purpose)?;
        let payload = decode_segment(payload)?;
        let footer = match footer {
            None => Vec::new(),
            Some("") => return Err(Malformed::EmptyFooter.into()),
            Some(footer) => decode_segment(footer)?,
        };

        Ok(Self {
            header,
            payload,
            footer,
        })
    }
}

impl<V: version::Version, P: version::Purpose> fmt::Display for SealedToken<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, &[V::HEADER, P::HEADER], &self.payload, &self.footer)
    }
}

impl<V: version::Version, P: version::Purpose> FromStr for SealedToken<V, P> {
    type Err = PastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Token>().and_then(Self::try_from)
    }
}

impl<V: version::Version, P: version::Purpose> TryFrom<Token> for SealedToken<V, P> {
    type Error = PastError;

    fn try_from(token: Token) -> Result<Self, Self::Error> {
        let expected = Header::of::<V, P>();
        if token.header != expected {
            return Err(Malformed::UnexpectedHeader {
                expected,
                found: token.header,
            }
            .into());
        }

        Ok(SealedToken::from_parts(token.payload, token.footer))
    }
}

#[cfg(feature = "serde")]
impl<V: version::Version, P: version::Purpose> serde_core::Serialize for SealedToken<V, P> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde_core::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de, V: version::Version, P: version::Purpose> serde_core::Deserialize<'de>
    for SealedToken<V, P>
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde_core::Deserializer<'de>,
    {
        struct FromStrVisitor<V, P>(core::marker::PhantomData<(V, P)>);
        impl<'de, V: version::Version, P: version::Purpose> serde_core::de::Visitor<'de>
            for FromStrVisitor<V, P>
        {
            type Value = SealedToken<V, P>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "a \"{}{}\" past", V::HEADER, P::HEADER)
            }
            fn visit_str<Err>(self, v: &str) -> Result<Self::Value, Err>
            where
                Err: serde_core::de::Error,
            {
                v.parse().map_err(Err::custom)
            }
        }
        deserializer.deserialize_str(FromStrVisitor(core::marker::PhantomData))
    }
}
