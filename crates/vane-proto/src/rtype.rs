//! DNS record types.
//!
//! The closed registry of type codes this codec understands, plus a
//! wrapper preserving unassigned codes verbatim.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type.
///
/// Covers the RFC 1035 types, the RFC 1183 extensions, DNSSEC types,
/// and the query-only meta types. See RFC 3597 for how codes outside
/// this registry are carried.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
#[allow(missing_docs)] // Variant names are the registry mnemonics.
pub enum RecordType {
    A = 1,
    NS = 2,
    MD = 3,
    MF = 4,
    CNAME = 5,
    SOA = 6,
    MB = 7,
    MG = 8,
    MR = 9,
    NULL = 10,
    WKS = 11,
    PTR = 12,
    HINFO = 13,
    MINFO = 14,
    MX = 15,
    TXT = 16,
    RP = 17,
    AFSDB = 18,
    X25 = 19,
    ISDN = 20,
    RT = 21,
    NSAP = 22,
    NSAPPTR = 23,
    SIG = 24,
    KEY = 25,
    PX = 26,
    GPOS = 27,
    AAAA = 28,
    LOC = 29,
    NXT = 30,
    EID = 31,
    NIMLOC = 32,
    SRV = 33,
    ATMA = 34,
    NAPTR = 35,
    KX = 36,
    CERT = 37,
    A6 = 38,
    DNAME = 39,
    SINK = 40,
    OPT = 41,
    APL = 42,
    DS = 43,
    SSHFP = 44,
    IPSECKEY = 45,
    RRSIG = 46,
    NSEC = 47,
    DNSKEY = 48,
    DHCID = 49,
    NSEC3 = 50,
    NSEC3PARAM = 51,
    HIP = 55,
    SPF = 99,
    UINFO = 100,
    UID = 101,
    GID = 102,
    UNSPEC = 103,
    TKEY = 249,
    TSIG = 250,
    IXFR = 251,
    AXFR = 252,
    MAILB = 253,
    MAILA = 254,
    ANY = 255,
}

impl RecordType {
    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a record type from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns true for the query-only meta types (IXFR, AXFR, MAILB,
    /// MAILA, ANY), which never appear as record data.
    #[inline]
    pub const fn is_meta(self) -> bool {
        matches!(
            self,
            Self::IXFR | Self::AXFR | Self::MAILB | Self::MAILA | Self::ANY
        )
    }

    /// Returns true for DNSSEC record types.
    #[inline]
    pub const fn is_dnssec(self) -> bool {
        matches!(
            self,
            Self::SIG
                | Self::KEY
                | Self::DS
                | Self::RRSIG
                | Self::NSEC
                | Self::DNSKEY
                | Self::NSEC3
                | Self::NSEC3PARAM
        )
    }

    /// Returns the presentation mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::MD => "MD",
            Self::MF => "MF",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::MB => "MB",
            Self::MG => "MG",
            Self::MR => "MR",
            Self::NULL => "NULL",
            Self::WKS => "WKS",
            Self::PTR => "PTR",
            Self::HINFO => "HINFO",
            Self::MINFO => "MINFO",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::RP => "RP",
            Self::AFSDB => "AFSDB",
            Self::X25 => "X25",
            Self::ISDN => "ISDN",
            Self::RT => "RT",
            Self::NSAP => "NSAP",
            Self::NSAPPTR => "NSAP-PTR",
            Self::SIG => "SIG",
            Self::KEY => "KEY",
            Self::PX => "PX",
            Self::GPOS => "GPOS",
            Self::AAAA => "AAAA",
            Self::LOC => "LOC",
            Self::NXT => "NXT",
            Self::EID => "EID",
            Self::NIMLOC => "NIMLOC",
            Self::SRV => "SRV",
            Self::ATMA => "ATMA",
            Self::NAPTR => "NAPTR",
            Self::KX => "KX",
            Self::CERT => "CERT",
            Self::A6 => "A6",
            Self::DNAME => "DNAME",
            Self::SINK => "SINK",
            Self::OPT => "OPT",
            Self::APL => "APL",
            Self::DS => "DS",
            Self::SSHFP => "SSHFP",
            Self::IPSECKEY => "IPSECKEY",
            Self::RRSIG => "RRSIG",
            Self::NSEC => "NSEC",
            Self::DNSKEY => "DNSKEY",
            Self::DHCID => "DHCID",
            Self::NSEC3 => "NSEC3",
            Self::NSEC3PARAM => "NSEC3PARAM",
            Self::HIP => "HIP",
            Self::SPF => "SPF",
            Self::UINFO => "UINFO",
            Self::UID => "UID",
            Self::GID => "GID",
            Self::UNSPEC => "UNSPEC",
            Self::TKEY => "TKEY",
            Self::TSIG => "TSIG",
            Self::IXFR => "IXFR",
            Self::AXFR => "AXFR",
            Self::MAILB => "MAILB",
            Self::MAILA => "MAILA",
            Self::ANY => "ANY",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A record type as it appears on the wire: either a registered type
/// or an unassigned 16-bit code preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A type from the registry.
    Known(RecordType),
    /// An unassigned code.
    Unknown(u16),
}

impl Type {
    /// Creates a type from a 16-bit wire value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        match RecordType::from_u16(value) {
            Some(rtype) => Self::Known(rtype),
            None => Self::Unknown(value),
        }
    }

    /// Returns the 16-bit wire value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(rtype) => rtype.to_u16(),
            Self::Unknown(value) => value,
        }
    }

    /// Returns the registered type, if any.
    #[inline]
    pub const fn as_known(self) -> Option<RecordType> {
        match self {
            Self::Known(rtype) => Some(rtype),
            Self::Unknown(_) => None,
        }
    }
}

impl From<RecordType> for Type {
    fn from(rtype: RecordType) -> Self {
        Self::Known(rtype)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 3597 presentation for unassigned codes.
            Self::Known(rtype) => write!(f, "{rtype}"),
            Self::Unknown(value) => write!(f, "TYPE{value}"),
        }
    }
}
