//! Runtime tags for versions, purposes and key kinds.

use core::fmt;

/// A fixed bundle of primitives, identified on the wire by `v1` or `v2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProtocolVersion {
    V1,
    V2,
}

impl ProtocolVersion {
    pub const ALL: [Self; 2] = [Self::V1, Self::V2];

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.mnemonic() == s)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The guarantee a token provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Purpose {
    /// Symmetric authentication. The payload is readable by anyone.
    Auth,
    /// Symmetric authenticated encryption.
    Enc,
    /// Asymmetric signature. The payload is readable by anyone.
    Sign,
}

impl Purpose {
    pub const ALL: [Self; 3] = [Self::Auth, Self::Enc, Self::Sign];

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Enc => "enc",
            Self::Sign => "sign",
        }
    }

    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.mnemonic() == s)
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The variant of a key, which decides the single purpose it may be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    SymmetricAuthentication,
    SymmetricEncryption,
    AsymmetricSecret,
    AsymmetricPublic,
}

impl KeyKind {
    pub const fn purpose(self) -> Purpose {
        match self {
            Self::SymmetricAuthentication => Purpose::Auth,
            Self::SymmetricEncryption => Purpose::Enc,
            Self::AsymmetricSecret | Self::AsymmetricPublic => Purpose::Sign,
        }
    }

    /// Whether this kind of key can create tokens, not only check them.
    pub const fn can_seal(self) -> bool {
        !matches!(self, Self::AsymmetricPublic)
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SymmetricAuthentication => "symmetric authentication",
            Self::SymmetricEncryption => "symmetric encryption",
            Self::AsymmetricSecret => "asymmetric secret",
            Self::AsymmetricPublic => "asymmetric public",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonics() {
        for v in ProtocolVersion::ALL {
            assert_eq!(ProtocolVersion::from_mnemonic(v.mnemonic()), Some(v));
        }
        for p in Purpose::ALL {
            assert_eq!(Purpose::from_mnemonic(p.mnemonic()), Some(p));
        }

        assert_eq!(ProtocolVersion::from_mnemonic("v3"), None);
        assert_eq!(ProtocolVersion::from_mnemonic("V1"), None);
        assert_eq!(Purpose::from_mnemonic("local"), None);
        assert_eq!(Purpose::from_mnemonic(""), None);
    }

    #[test]
    fn key_kinds() {
        assert_eq!(KeyKind::SymmetricAuthentication.purpose(), Purpose::Auth);
        assert_eq!(KeyKind::SymmetricEncryption.purpose(), Purpose::Enc);
        assert_eq!(KeyKind::AsymmetricSecret.purpose(), Purpose::Sign);
        assert_eq!(KeyKind::AsymmetricPublic.purpose(), Purpose::Sign);

        assert!(KeyKind::AsymmetricSecret.can_seal());
        assert!(!KeyKind::AsymmetricPublic.can_seal());
    }
}
