//! DNS resource records.

use crate::class::Class;
use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rdata::RData;
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// A DNS resource record: owner name, type, class, TTL and typed data.
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                      NAME                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TYPE                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                     CLASS                     |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      TTL                      |
/// |                                               |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                   RDLENGTH                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// /                     RDATA                     /
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRecord {
    name: Name,
    rtype: Type,
    rclass: Class,
    ttl: u32,
    rdata: RData,
}

impl ResourceRecord {
    /// Creates a resource record.
    pub fn new(name: Name, rtype: Type, rclass: Class, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        }
    }

    /// Creates an IN-class A record.
    pub fn a(name: Name, ttl: u32, addr: std::net::Ipv4Addr) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::A),
            Class::IN,
            ttl,
            RData::A(crate::rdata::A::new(addr)),
        )
    }

    /// Creates an IN-class AAAA record.
    pub fn aaaa(name: Name, ttl: u32, addr: std::net::Ipv6Addr) -> Self {
        Self::new(
            name,
            Type::Known(RecordType::AAAA),
            Class::IN,
            ttl,
            RData::AAAA(crate::rdata::AAAA::new(addr)),
        )
    }

    /// Returns the owner name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Returns the record type.
    #[inline]
    pub fn rtype(&self) -> Type {
        self.rtype
    }

    /// Returns the record type if it is registered.
    #[inline]
    pub fn record_type(&self) -> Option<RecordType> {
        self.rtype.as_known()
    }

    /// Returns the record class.
    #[inline]
    pub fn rclass(&self) -> Class {
        self.rclass
    }

    /// Returns the TTL in seconds.
    #[inline]
    pub const fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the record data.
    #[inline]
    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    /// Returns true if this is an SOA record.
    #[inline]
    pub fn is_soa(&self) -> bool {
        matches!(self.rtype, Type::Known(RecordType::SOA))
    }

    /// Returns the TTL remaining at `now` for a record captured at
    /// `captured_at`, or zero once it has elapsed.
    ///
    /// Elapsed time is floored to whole seconds, so a 1-second TTL is
    /// still live half a second after capture.
    pub fn remaining_ttl(&self, captured_at: Instant, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(captured_at).as_secs();
        u64::from(self.ttl).saturating_sub(elapsed) as u32
    }

    /// Returns true if the TTL has fully elapsed at `now`.
    pub fn is_expired(&self, captured_at: Instant, now: Instant) -> bool {
        self.remaining_ttl(captured_at, now) == 0
    }

    /// Returns a copy with the given TTL.
    #[must_use]
    pub fn with_ttl(&self, ttl: u32) -> Self {
        let mut record = self.clone();
        record.ttl = ttl;
        record
    }

    /// Parses a record at `offset`, returning it and the bytes consumed.
    ///
    /// The typed decoder must account for exactly RDLENGTH octets;
    /// [`RData::parse`] fails otherwise.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, name_len) = NameParser::new(message).parse_name(offset)?;

        let mut reader = WireReader::at(message, offset + name_len);
        let rtype_value = reader.read_u16()?;
        let rclass_value = reader.read_u16()?;
        let ttl = reader.read_u32()?;
        let rdlength = reader.read_u16()?;

        let rdata_start = reader.position();
        if rdata_start + rdlength as usize > message.len() {
            return Err(Error::unexpected_eof(rdata_start + rdlength as usize));
        }

        let rtype = Type::from_u16(rtype_value);
        let rdata = match rtype {
            Type::Known(known) => RData::parse(known, message, rdata_start, rdlength)?,
            Type::Unknown(code) => RData::Opaque(crate::rdata::Opaque::new(
                code,
                &message[rdata_start..rdata_start + rdlength as usize],
            )),
        };

        Ok((
            Self {
                name,
                rtype,
                rclass: Class::from_u16(rclass_value),
                ttl,
                rdata,
            },
            name_len + 10 + rdlength as usize,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        self.name.wire_len() + 10 + self.rdata.wire_len()
    }

    /// Appends the wire form to a buffer. Names are not compressed.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.name.write_wire(buf);
        buf.extend_from_slice(&self.rtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.rclass.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());
        buf.extend_from_slice(&(self.rdata.wire_len() as u16).to_be_bytes());
        self.rdata.write_to(buf);
    }

    /// Returns the wire form as a standalone byte vector.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_to(&mut buf);
        buf.to_vec()
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.rclass, self.rtype, self.rdata
        )
    }
}

/// Streaming parser over a resource record section.
#[derive(Debug)]
pub struct RecordParser<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> RecordParser<'a> {
    /// Creates a parser reading `count` records starting at `offset`.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the offset just past the last parsed record.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next record, or `None` when the section is done.
    pub fn next(&mut self) -> Result<Option<ResourceRecord>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let (record, consumed) = ResourceRecord::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;
        Ok(Some(record))
    }
}
