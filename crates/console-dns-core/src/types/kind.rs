use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource record types a zone catalogue can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordKind {
    /// IPv4 host address
    A,
    /// IPv6 host address
    Aaaa,
    /// Free-form text
    Txt,
    /// Canonical name alias
    Cname,
    /// Delegated name server
    Ns,
    /// Mail exchanger
    Mx,
    /// Service locator
    Srv,
    /// Certification authority authorization
    Caa,
    /// Start of authority
    Soa,
}

impl RecordKind {
    /// Number of supported kinds
    pub const COUNT: usize = 9;

    /// Every supported kind, in discriminant order
    pub const ALL: [Self; Self::COUNT] = [
        Self::A,
        Self::Aaaa,
        Self::Txt,
        Self::Cname,
        Self::Ns,
        Self::Mx,
        Self::Srv,
        Self::Caa,
        Self::Soa,
    ];

    /// Canonical mnemonic, as used in DNS presentation format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Ns => "NS",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
            Self::Soa => "SOA",
        }
    }

    /// Whether answers of this kind point at another host that may need glue
    #[must_use]
    pub const fn is_referral(self) -> bool {
        matches!(self, Self::Ns | Self::Mx | Self::Srv)
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
