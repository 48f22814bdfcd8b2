//! Authority record types (SOA).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SOA record — start of authority (RFC 1035).
///
/// Marks the top of a zone and carries its transfer timing parameters.
/// Zone transfers are bracketed by two copies of this record, which is
/// how the AXFR stream reader detects the end of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SOA {
    mname: Name,
    rname: Name,
    serial: u32,
    refresh: u32,
    retry: u32,
    expire: u32,
    minimum: u32,
}

impl SOA {
    /// Creates an SOA record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mname: Name,
        rname: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
    ) -> Self {
        Self {
            mname,
            rname,
            serial,
            refresh,
            retry,
            expire,
            minimum,
        }
    }

    /// Returns the primary name server.
    #[inline]
    pub fn mname(&self) -> &Name {
        &self.mname
    }

    /// Returns the responsible mailbox (first label is the local part).
    #[inline]
    pub fn rname(&self) -> &Name {
        &self.rname
    }

    /// Returns the zone serial.
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.serial
    }

    /// Returns the secondary refresh interval in seconds.
    #[inline]
    pub const fn refresh(&self) -> u32 {
        self.refresh
    }

    /// Returns the refresh retry interval in seconds.
    #[inline]
    pub const fn retry(&self) -> u32 {
        self.retry
    }

    /// Returns the zone expiry bound in seconds.
    #[inline]
    pub const fn expire(&self) -> u32 {
        self.expire
    }

    /// Returns the minimum / negative-caching TTL in seconds.
    #[inline]
    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    /// Parses the record, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(message);
        let (mname, mname_len) = parser.parse_name(offset)?;
        let (rname, rname_len) = parser.parse_name(offset + mname_len)?;

        let mut reader = WireReader::at(message, offset + mname_len + rname_len);
        let serial = reader.read_u32()?;
        let refresh = reader.read_u32()?;
        let retry = reader.read_u32()?;
        let expire = reader.read_u32()?;
        let minimum = reader.read_u32()?;

        Ok((
            Self {
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            },
            mname_len + rname_len + 20,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        self.mname.wire_len() + self.rname.wire_len() + 20
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.mname.write_wire(buf);
        self.rname.write_wire(buf);
        for value in [
            self.serial,
            self.refresh,
            self.retry,
            self.expire,
            self.minimum,
        ] {
            buf.extend_from_slice(&value.to_be_bytes());
        }
    }
}

impl fmt::Display for SOA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.mname, self.rname, self.serial, self.refresh, self.retry, self.expire,
            self.minimum
        )
    }
}
