//! Record data (RDATA) variants.
//!
//! One module per record category, mirroring the type registry:
//!
//! - `address` — A, AAAA, WKS
//! - `name` — NS, CNAME, PTR, DNAME, MB, MD, MF, MG, MR, MINFO, RP
//! - `service` — MX, AFSDB, RT, KX, PX, SRV, NAPTR
//! - `authority` — SOA
//! - `text` — TXT, SPF, HINFO, X25, ISDN
//! - `loc` — LOC
//! - `dnssec` — SIG, RRSIG, KEY, DNSKEY, DS
//! - `unknown` — everything else, preserved verbatim
//!
//! Decoders for types whose RDATA may embed compressed names take the
//! whole message and an offset; fixed-layout decoders take the RDATA
//! slice alone. Either way a decoder must account for exactly RDLENGTH
//! octets, which [`RData::parse`] enforces.

pub mod address;
pub mod authority;
pub mod dnssec;
pub mod loc;
pub mod name;
pub mod service;
pub mod text;
pub mod unknown;

pub use address::{A, AAAA, WKS};
pub use authority::SOA;
pub use dnssec::{DNSKEY, DS, RRSIG};
pub use loc::LOC;
pub use name::{HostName, MINFO, RP};
pub use service::{Exchange, NAPTR, PX, SRV};
pub use text::{CharacterStrings, HINFO, ISDN, X25};
pub use unknown::Opaque;

use crate::error::{Error, Result};
use crate::rtype::RecordType;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decoded record data, tagged by record type.
///
/// Types with structured decoders get their own variant; the remainder
/// of the registry and all unassigned codes are preserved verbatim as
/// [`Opaque`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RData {
    /// IPv4 address.
    A(A),
    /// IPv6 address.
    AAAA(AAAA),
    /// Well-known services.
    WKS(WKS),
    /// Authoritative name server.
    NS(HostName),
    /// Canonical name.
    CNAME(HostName),
    /// Domain name pointer.
    PTR(HostName),
    /// Delegation name.
    DNAME(HostName),
    /// Mailbox domain.
    MB(HostName),
    /// Mail destination (obsolete).
    MD(HostName),
    /// Mail forwarder (obsolete).
    MF(HostName),
    /// Mail group member.
    MG(HostName),
    /// Mail rename domain.
    MR(HostName),
    /// Mailbox information.
    MINFO(MINFO),
    /// Responsible person.
    RP(RP),
    /// Mail exchange.
    MX(Exchange),
    /// AFS database location.
    AFSDB(Exchange),
    /// Route through.
    RT(Exchange),
    /// Key exchange.
    KX(Exchange),
    /// X.400 mapping.
    PX(PX),
    /// Server selection.
    SRV(SRV),
    /// Naming authority pointer.
    NAPTR(NAPTR),
    /// Start of authority.
    SOA(SOA),
    /// Text strings.
    TXT(CharacterStrings),
    /// Sender policy framework (TXT layout).
    SPF(CharacterStrings),
    /// Host information.
    HINFO(HINFO),
    /// X.25 address.
    X25(X25),
    /// ISDN address.
    ISDN(ISDN),
    /// Geographic location.
    LOC(LOC),
    /// Signature (obsolete RRSIG layout).
    SIG(RRSIG),
    /// DNSSEC signature.
    RRSIG(RRSIG),
    /// Key (obsolete DNSKEY layout).
    KEY(DNSKEY),
    /// DNSSEC public key.
    DNSKEY(DNSKEY),
    /// Delegation signer.
    DS(DS),
    /// Verbatim RDATA for all other type codes.
    Opaque(Opaque),
}

impl RData {
    /// Decodes the RDATA of a record of type `rtype`.
    ///
    /// `message` is the complete DNS message (needed for compression
    /// pointers inside RDATA), `offset` the start of the RDATA, and
    /// `rdlength` the advertised length. Fails with
    /// [`Error::RDataLengthMismatch`] when the decoder accounts for a
    /// different number of octets than advertised.
    pub fn parse(
        rtype: RecordType,
        message: &[u8],
        offset: usize,
        rdlength: u16,
    ) -> Result<Self> {
        let rdlength = rdlength as usize;
        let slice = message
            .get(offset..offset + rdlength)
            .ok_or(Error::unexpected_eof(offset + rdlength))?;

        let (rdata, consumed) = match rtype {
            RecordType::A => (Self::A(A::parse(slice)?), rdlength),
            RecordType::AAAA => (Self::AAAA(AAAA::parse(slice)?), rdlength),
            RecordType::WKS => (Self::WKS(WKS::parse(slice)?), rdlength),
            RecordType::NS => name_variant(Self::NS, message, offset)?,
            RecordType::CNAME => name_variant(Self::CNAME, message, offset)?,
            RecordType::PTR => name_variant(Self::PTR, message, offset)?,
            RecordType::DNAME => name_variant(Self::DNAME, message, offset)?,
            RecordType::MB => name_variant(Self::MB, message, offset)?,
            RecordType::MD => name_variant(Self::MD, message, offset)?,
            RecordType::MF => name_variant(Self::MF, message, offset)?,
            RecordType::MG => name_variant(Self::MG, message, offset)?,
            RecordType::MR => name_variant(Self::MR, message, offset)?,
            RecordType::MINFO => {
                let (rdata, used) = MINFO::parse(message, offset)?;
                (Self::MINFO(rdata), used)
            }
            RecordType::RP => {
                let (rdata, used) = RP::parse(message, offset)?;
                (Self::RP(rdata), used)
            }
            RecordType::MX => {
                let (rdata, used) = Exchange::parse(message, offset)?;
                (Self::MX(rdata), used)
            }
            RecordType::AFSDB => {
                let (rdata, used) = Exchange::parse(message, offset)?;
                (Self::AFSDB(rdata), used)
            }
            RecordType::RT => {
                let (rdata, used) = Exchange::parse(message, offset)?;
                (Self::RT(rdata), used)
            }
            RecordType::KX => {
                let (rdata, used) = Exchange::parse(message, offset)?;
                (Self::KX(rdata), used)
            }
            RecordType::PX => {
                let (rdata, used) = PX::parse(message, offset)?;
                (Self::PX(rdata), used)
            }
            RecordType::SRV => {
                let (rdata, used) = SRV::parse(message, offset)?;
                (Self::SRV(rdata), used)
            }
            RecordType::NAPTR => {
                let (rdata, used) = NAPTR::parse(message, offset)?;
                (Self::NAPTR(rdata), used)
            }
            RecordType::SOA => {
                let (rdata, used) = SOA::parse(message, offset)?;
                (Self::SOA(rdata), used)
            }
            RecordType::TXT => (Self::TXT(CharacterStrings::parse(slice)?), rdlength),
            RecordType::SPF => (Self::SPF(CharacterStrings::parse(slice)?), rdlength),
            RecordType::HINFO => (Self::HINFO(HINFO::parse(slice)?), rdlength),
            RecordType::X25 => (Self::X25(X25::parse(slice)?), rdlength),
            RecordType::ISDN => (Self::ISDN(ISDN::parse(slice)?), rdlength),
            RecordType::LOC => (Self::LOC(LOC::parse(slice)?), rdlength),
            RecordType::SIG => {
                let (rdata, used) = RRSIG::parse(message, offset, rdlength)?;
                (Self::SIG(rdata), used)
            }
            RecordType::RRSIG => {
                let (rdata, used) = RRSIG::parse(message, offset, rdlength)?;
                (Self::RRSIG(rdata), used)
            }
            RecordType::KEY => (Self::KEY(DNSKEY::parse(slice)?), rdlength),
            RecordType::DNSKEY => (Self::DNSKEY(DNSKEY::parse(slice)?), rdlength),
            RecordType::DS => (Self::DS(DS::parse(slice)?), rdlength),
            other => (
                Self::Opaque(Opaque::new(other.to_u16(), slice)),
                rdlength,
            ),
        };

        if consumed != rdlength {
            return Err(Error::RDataLengthMismatch {
                rtype: rtype.name(),
                expected: rdlength,
                actual: consumed,
            });
        }

        Ok(rdata)
    }

    /// Returns the uncompressed wire length of this RDATA.
    pub fn wire_len(&self) -> usize {
        match self {
            Self::A(r) => r.wire_len(),
            Self::AAAA(r) => r.wire_len(),
            Self::WKS(r) => r.wire_len(),
            Self::NS(r)
            | Self::CNAME(r)
            | Self::PTR(r)
            | Self::DNAME(r)
            | Self::MB(r)
            | Self::MD(r)
            | Self::MF(r)
            | Self::MG(r)
            | Self::MR(r) => r.wire_len(),
            Self::MINFO(r) => r.wire_len(),
            Self::RP(r) => r.wire_len(),
            Self::MX(r) | Self::AFSDB(r) | Self::RT(r) | Self::KX(r) => r.wire_len(),
            Self::PX(r) => r.wire_len(),
            Self::SRV(r) => r.wire_len(),
            Self::NAPTR(r) => r.wire_len(),
            Self::SOA(r) => r.wire_len(),
            Self::TXT(r) | Self::SPF(r) => r.wire_len(),
            Self::HINFO(r) => r.wire_len(),
            Self::X25(r) => r.wire_len(),
            Self::ISDN(r) => r.wire_len(),
            Self::LOC(r) => r.wire_len(),
            Self::SIG(r) | Self::RRSIG(r) => r.wire_len(),
            Self::KEY(r) | Self::DNSKEY(r) => r.wire_len(),
            Self::DS(r) => r.wire_len(),
            Self::Opaque(r) => r.wire_len(),
        }
    }

    /// Appends the uncompressed wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        match self {
            Self::A(r) => r.write_to(buf),
            Self::AAAA(r) => r.write_to(buf),
            Self::WKS(r) => r.write_to(buf),
            Self::NS(r)
            | Self::CNAME(r)
            | Self::PTR(r)
            | Self::DNAME(r)
            | Self::MB(r)
            | Self::MD(r)
            | Self::MF(r)
            | Self::MG(r)
            | Self::MR(r) => r.write_to(buf),
            Self::MINFO(r) => r.write_to(buf),
            Self::RP(r) => r.write_to(buf),
            Self::MX(r) | Self::AFSDB(r) | Self::RT(r) | Self::KX(r) => r.write_to(buf),
            Self::PX(r) => r.write_to(buf),
            Self::SRV(r) => r.write_to(buf),
            Self::NAPTR(r) => r.write_to(buf),
            Self::SOA(r) => r.write_to(buf),
            Self::TXT(r) | Self::SPF(r) => r.write_to(buf),
            Self::HINFO(r) => r.write_to(buf),
            Self::X25(r) => r.write_to(buf),
            Self::ISDN(r) => r.write_to(buf),
            Self::LOC(r) => r.write_to(buf),
            Self::SIG(r) | Self::RRSIG(r) => r.write_to(buf),
            Self::KEY(r) | Self::DNSKEY(r) => r.write_to(buf),
            Self::DS(r) => r.write_to(buf),
            Self::Opaque(r) => r.write_to(buf),
        }
    }

    /// Returns the IPv4 address for an A record.
    pub fn as_a(&self) -> Option<std::net::Ipv4Addr> {
        match self {
            Self::A(a) => Some(a.address()),
            _ => None,
        }
    }

    /// Returns the IPv6 address for an AAAA record.
    pub fn as_aaaa(&self) -> Option<std::net::Ipv6Addr> {
        match self {
            Self::AAAA(aaaa) => Some(aaaa.address()),
            _ => None,
        }
    }

    /// Returns the target name for a CNAME record.
    pub fn as_cname(&self) -> Option<&crate::name::Name> {
        match self {
            Self::CNAME(cname) => Some(cname.name()),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A(r) => write!(f, "{r}"),
            Self::AAAA(r) => write!(f, "{r}"),
            Self::WKS(r) => write!(f, "{r}"),
            Self::NS(r)
            | Self::CNAME(r)
            | Self::PTR(r)
            | Self::DNAME(r)
            | Self::MB(r)
            | Self::MD(r)
            | Self::MF(r)
            | Self::MG(r)
            | Self::MR(r) => write!(f, "{r}"),
            Self::MINFO(r) => write!(f, "{r}"),
            Self::RP(r) => write!(f, "{r}"),
            Self::MX(r) | Self::AFSDB(r) | Self::RT(r) | Self::KX(r) => write!(f, "{r}"),
            Self::PX(r) => write!(f, "{r}"),
            Self::SRV(r) => write!(f, "{r}"),
            Self::NAPTR(r) => write!(f, "{r}"),
            Self::SOA(r) => write!(f, "{r}"),
            Self::TXT(r) | Self::SPF(r) => write!(f, "{r}"),
            Self::HINFO(r) => write!(f, "{r}"),
            Self::X25(r) => write!(f, "{r}"),
            Self::ISDN(r) => write!(f, "{r}"),
            Self::LOC(r) => write!(f, "{r}"),
            Self::SIG(r) | Self::RRSIG(r) => write!(f, "{r}"),
            Self::KEY(r) | Self::DNSKEY(r) => write!(f, "{r}"),
            Self::DS(r) => write!(f, "{r}"),
            Self::Opaque(r) => write!(f, "{r}"),
        }
    }
}

/// Helper for the nine single-name RDATA layouts.
fn name_variant(
    wrap: fn(HostName) -> RData,
    message: &[u8],
    offset: usize,
) -> Result<(RData, usize)> {
    let (rdata, used) = HostName::parse(message, offset)?;
    Ok((wrap(rdata), used))
}
