//! JSON claims for PAST tokens.
//!
//! ```
//! use past::{EncryptionKey, Key, ProtocolVersion, Purpose};
//! use past_json::{Claims, TokenBuilder};
//!
//! let key = Key::from(EncryptionKey::random()?);
//!
//! let token = TokenBuilder::new(Purpose::Enc)
//!     .version(ProtocolVersion::V2)
//!     .claim("sub", "alice")
//!     .footer("kid:1")
//!     .finalize(&key)?;
//! assert!(token.as_str().starts_with("v2.enc."));
//!
//! let claims: Claims = past_json::parse(token.as_str(), &key, b"kid:1")?;
//! assert_eq!(claims.get("sub"), Some(&"alice".into()));
//! # Ok::<(), past::PastError>(())
//! ```
#![forbid(unsafe_code)]

use core::fmt;

#[cfg(feature = "claims")]
pub use jiff;

use past::{Key, PastError, ProtocolVersion, Purpose};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn payload_error(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> PastError {
    PastError::PayloadError(err.into())
}

/// A JSON object of claims.
///
/// Keys are kept sorted, so the same claims always encode to the same bytes.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Set a claim, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode the claims as a token payload.
    pub fn to_payload(&self) -> Result<Vec<u8>, PastError> {
        serde_json::to_vec(&self.0).map_err(payload_error)
    }

    /// Decode a token payload. The payload must be a JSON object.
    pub fn from_payload(payload: &[u8]) -> Result<Self, PastError> {
        serde_json::from_slice(payload).map(Self).map_err(payload_error)
    }

    /// Deserialize the claims into a typed struct.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, PastError> {
        serde_json::from_value(Value::Object(self.0)).map_err(payload_error)
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Claims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(feature = "claims")]
mod registered {
    use jiff::Timestamp;
    use past::PastError;
    use serde_json::Value;

    use crate::{Claims, payload_error};

    macro_rules! string_claims {
        ($($name:ident, $set:ident, $doc:literal;)*) => {
            impl Claims {
                $(
                    #[doc = concat!("The `", stringify!($name), "` (", $doc, ") claim, if it is a string.")]
                    pub fn $name(&self) -> Option<&str> {
                        self.get(stringify!($name)).and_then(Value::as_str)
                    }

                    #[doc = concat!("Set the `", stringify!($name), "` (", $doc, ") claim.")]
                    pub fn $set(&mut self, value: impl Into<String>) -> &mut Self {
                        self.insert(stringify!($name), value.into());
                        self
                    }
                )*
            }
        };
    }

    macro_rules! time_claims {
        ($($name:ident, $set:ident, $doc:literal;)*) => {
            impl Claims {
                $(
                    #[doc = concat!("The `", stringify!($name), "` (", $doc, ") claim.")]
                    ///
                    /// Errors if the claim is present but not an RFC 3339 timestamp.
                    pub fn $name(&self) -> Result<Option<Timestamp>, PastError> {
                        self.timestamp(stringify!($name))
                    }

                    #[doc = concat!("Set the `", stringify!($name), "` (", $doc, ") claim.")]
                    pub fn $set(&mut self, value: Timestamp) -> &mut Self {
                        self.insert(stringify!($name), value.to_string());
                        self
                    }
                )*
            }
        };
    }

    string_claims! {
        iss, set_iss, "issuer";
        sub, set_sub, "subject";
        aud, set_aud, "audience";
        jti, set_jti, "token identifier";
    }

    time_claims! {
        exp, set_exp, "expiration";
        nbf, set_nbf, "not before";
        iat, set_iat, "issued at";
    }

    impl Claims {
        fn timestamp(&self, name: &str) -> Result<Option<Timestamp>, PastError> {
            match self.get(name) {
                None => Ok(None),
                Some(Value::String(s)) => s.parse::<Timestamp>().map(Some).map_err(payload_error),
                Some(_) => Err(payload_error(format!("{name} claim is not a string"))),
            }
        }
    }
}

/// Builds a token from claims and a footer.
///
/// Every setter consumes the builder, and [`TokenBuilder::finalize`] produces
/// a new [`IssuedToken`] each time, so no serialization outlives the inputs
/// it was made from.
#[derive(Clone, Debug)]
#[must_use]
pub struct TokenBuilder {
    version: ProtocolVersion,
    purpose: Purpose,
    claims: Claims,
    footer: Vec<u8>,
}

impl TokenBuilder {
    /// Start a `purpose` token. The version defaults to [`ProtocolVersion::V2`].
    pub fn new(purpose: Purpose) -> Self {
        Self {
            version: ProtocolVersion::V2,
            purpose,
            claims: Claims::new(),
            footer: Vec::new(),
        }
    }

    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn purpose(mut self, purpose: Purpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// Replace all claims.
    pub fn claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }

    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name, value);
        self
    }

    /// Edit the claims in place, for the registered claim setters.
    pub fn with_claims(mut self, f: impl FnOnce(&mut Claims)) -> Self {
        f(&mut self.claims);
        self
    }

    /// Set a raw footer. Footers are authenticated but never encrypted.
    pub fn footer(mut self, footer: impl Into<Vec<u8>>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Set the footer to the JSON encoding of `footer`.
    ///
    /// Verifiers parse footers before they are authenticated, so keep them small
    /// and parse them into a known struct layout.
    pub fn json_footer(mut self, footer: &impl Serialize) -> Result<Self, PastError> {
        self.footer = serde_json::to_vec(footer).map_err(payload_error)?;
        Ok(self)
    }

    /// Seal the claims with `key`.
    ///
    /// The key is checked against the purpose and version on every call.
    pub fn finalize(&self, key: &Key) -> Result<IssuedToken, PastError> {
        let payload = self.claims.to_payload()?;
        let token = past::issue(self.version, self.purpose, &payload, key, &self.footer)?;

        Ok(IssuedToken {
            token,
            version: self.version,
            purpose: self.purpose,
            claims: self.claims.clone(),
        })
    }
}

/// A sealed token and the claims it was made from.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuedToken {
    token: String,
    version: ProtocolVersion,
    purpose: Purpose,
    claims: Claims,
}

impl IssuedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

impl fmt::Display for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Unseal a token of any purpose and decode its claims.
pub fn parse(token: &str, key: &Key, footer: &[u8]) -> Result<Claims, PastError> {
    let payload = past::open(token, key, footer)?;
    Claims::from_payload(&payload)
}

/// Read the footer of a token as JSON, before it is verified.
///
/// Use this to pick a key, then pass the raw footer bytes to [`parse`] to pin it.
pub fn unverified_footer<T: DeserializeOwned>(token: &str) -> Result<T, PastError> {
    let token: past::Token = token.parse()?;
    serde_json::from_slice(token.unverified_footer()).map_err(payload_error)
}
