//! DNS message header.
//!
//! The fixed 12-byte structure at the start of every message: the
//! transaction id, a 16-bit flag word, and four section counts.

use crate::error::{Error, Result};
use crate::opcode::OpCode;
use crate::rcode::ResponseCode;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the DNS header in bytes.
pub const HEADER_SIZE: usize = 12;

bitflags! {
    /// The single-bit fields of the header flag word.
    ///
    /// The opcode and rcode nibbles live in the same 16-bit word but
    /// are modeled separately on [`Header`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HeaderFlags: u16 {
        /// Query (0) / response (1).
        const QR = 0x8000;
        /// Authoritative answer.
        const AA = 0x0400;
        /// Truncated message.
        const TC = 0x0200;
        /// Recursion desired.
        const RD = 0x0100;
        /// Recursion available.
        const RA = 0x0080;
        /// Reserved, must be zero on the wire.
        const Z = 0x0070;
    }
}

impl Default for HeaderFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for HeaderFlags {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for HeaderFlags {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::from_bits_truncate(u16::deserialize(deserializer)?))
    }
}

/// DNS message header (RFC 1035 §4.1.1).
///
/// ```text
///                                 1  1  1  1  1  1
///   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                      ID                       |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    QDCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ANCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    NSCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// |                    ARCOUNT                    |
/// +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Transaction id correlating responses to queries.
    pub id: u16,
    /// Single-bit flags.
    pub flags: HeaderFlags,
    /// Operation code.
    pub opcode: OpCode,
    /// Response code.
    pub rcode: ResponseCode,
    /// Number of questions.
    pub qd_count: u16,
    /// Number of answer records.
    pub an_count: u16,
    /// Number of authority records.
    pub ns_count: u16,
    /// Number of additional records.
    pub ar_count: u16,
}

impl Header {
    /// Creates an empty header with the given transaction id.
    #[inline]
    pub const fn new(id: u16) -> Self {
        Self {
            id,
            flags: HeaderFlags::empty(),
            opcode: OpCode::Query,
            rcode: ResponseCode::NoError,
            qd_count: 0,
            an_count: 0,
            ns_count: 0,
            ar_count: 0,
        }
    }

    /// Creates a query header.
    pub fn query(id: u16, recursion_desired: bool) -> Self {
        let mut header = Self::new(id);
        if recursion_desired {
            header.flags |= HeaderFlags::RD;
        }
        header
    }

    /// Returns true if this is a query.
    #[inline]
    pub fn is_query(&self) -> bool {
        !self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if this is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.flags.contains(HeaderFlags::QR)
    }

    /// Returns true if the message was truncated.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.flags.contains(HeaderFlags::TC)
    }

    /// Returns true if recursion was requested.
    #[inline]
    pub fn recursion_desired(&self) -> bool {
        self.flags.contains(HeaderFlags::RD)
    }

    /// Returns true if the server offers recursion.
    #[inline]
    pub fn recursion_available(&self) -> bool {
        self.flags.contains(HeaderFlags::RA)
    }

    /// Returns true if the answer is authoritative.
    #[inline]
    pub fn is_authoritative(&self) -> bool {
        self.flags.contains(HeaderFlags::AA)
    }

    /// Parses a header from the start of a message.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::too_short(HEADER_SIZE, data.len()));
        }

        let id = u16::from_be_bytes([data[0], data[1]]);
        let word = u16::from_be_bytes([data[2], data[3]]);

        let opcode_value = ((word >> 11) & 0x0F) as u8;
        let opcode = OpCode::from_u8(opcode_value).ok_or(Error::InvalidOpCode {
            value: opcode_value,
        })?;

        // Unassigned rcodes are folded to ServFail rather than dropping
        // the whole message.
        let rcode =
            ResponseCode::from_u8((word & 0x0F) as u8).unwrap_or(ResponseCode::ServFail);

        Ok(Self {
            id,
            flags: HeaderFlags::from_bits_truncate(word),
            opcode,
            rcode,
            qd_count: u16::from_be_bytes([data[4], data[5]]),
            an_count: u16::from_be_bytes([data[6], data[7]]),
            ns_count: u16::from_be_bytes([data[8], data[9]]),
            ar_count: u16::from_be_bytes([data[10], data[11]]),
        })
    }

    /// Serializes the header. The Z bits are always emitted as zero.
    pub fn to_wire(&self) -> [u8; HEADER_SIZE] {
        let mut word = (self.flags & !HeaderFlags::Z).bits();
        word |= u16::from(self.opcode.to_u8()) << 11;
        word |= u16::from(self.rcode.to_u8());

        let mut buf = [0u8; HEADER_SIZE];
        buf[0..2].copy_from_slice(&self.id.to_be_bytes());
        buf[2..4].copy_from_slice(&word.to_be_bytes());
        buf[4..6].copy_from_slice(&self.qd_count.to_be_bytes());
        buf[6..8].copy_from_slice(&self.an_count.to_be_bytes());
        buf[8..10].copy_from_slice(&self.ns_count.to_be_bytes());
        buf[10..12].copy_from_slice(&self.ar_count.to_be_bytes());
        buf
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut bytes::BytesMut) {
        buf.extend_from_slice(&self.to_wire());
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id:{:04X} {} {}",
            self.id,
            if self.is_response() { "qr" } else { "query" },
            self.rcode
        )?;
        if self.is_authoritative() {
            write!(f, " aa")?;
        }
        if self.is_truncated() {
            write!(f, " tc")?;
        }
        if self.recursion_desired() {
            write!(f, " rd")?;
        }
        if self.recursion_available() {
            write!(f, " ra")?;
        }
        write!(
            f,
            " qd:{} an:{} ns:{} ar:{}",
            self.qd_count, self.an_count, self.ns_count, self.ar_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut header = Header::query(0x1234, true);
        header.qd_count = 1;

        let wire = header.to_wire();
        assert_eq!(&wire[..4], &[0x12, 0x34, 0x01, 0x00]);

        let parsed = Header::parse(&wire).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn z_bits_cleared_on_emit() {
        let mut header = Header::new(1);
        header.flags |= HeaderFlags::Z;
        let wire = header.to_wire();
        assert_eq!(wire[3] & 0x70, 0);
    }

    #[test]
    fn response_flags() {
        // 0x8580: QR + AA + RD + RA, rcode 0.
        let wire = [0x00, 0x2A, 0x85, 0x80, 0, 1, 0, 2, 0, 0, 0, 0];
        let header = Header::parse(&wire).unwrap();

        assert!(header.is_response());
        assert!(header.is_authoritative());
        assert!(header.recursion_desired());
        assert!(header.recursion_available());
        assert_eq!(header.rcode, ResponseCode::NoError);
        assert_eq!(header.an_count, 2);
    }

    #[test]
    fn rejects_short_input() {
        assert!(matches!(
            Header::parse(&[0; 11]),
            Err(Error::TooShort { .. })
        ));
    }

    #[test]
    fn unknown_rcode_folds_to_servfail() {
        let wire = [0, 1, 0x80, 0x0E, 0, 0, 0, 0, 0, 0, 0, 0];
        let header = Header::parse(&wire).unwrap();
        assert_eq!(header.rcode, ResponseCode::ServFail);
    }
}
