//! Address record types (A, AAAA, WKS).

use crate::error::{Error, Result};
use bytes::BytesMut;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A record — IPv4 host address (RFC 1035).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct A {
    address: Ipv4Addr,
}

impl A {
    /// Creates an A record.
    #[inline]
    pub const fn new(address: Ipv4Addr) -> Self {
        Self { address }
    }

    /// Returns the address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Parses from exactly four octets of RDATA.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let octets: [u8; 4] = rdata
            .try_into()
            .map_err(|_| Error::invalid_rdata("A", format!("{} octets, want 4", rdata.len())))?;
        Ok(Self {
            address: Ipv4Addr::from(octets),
        })
    }

    /// Returns the wire-format length.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        4
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.address.octets());
    }
}

impl fmt::Display for A {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// AAAA record — IPv6 host address (RFC 3596).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AAAA {
    address: Ipv6Addr,
}

impl AAAA {
    /// Creates an AAAA record.
    #[inline]
    pub const fn new(address: Ipv6Addr) -> Self {
        Self { address }
    }

    /// Returns the address.
    #[inline]
    pub const fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Parses from exactly sixteen octets of RDATA.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let octets: [u8; 16] = rdata.try_into().map_err(|_| {
            Error::invalid_rdata("AAAA", format!("{} octets, want 16", rdata.len()))
        })?;
        Ok(Self {
            address: Ipv6Addr::from(octets),
        })
    }

    /// Returns the wire-format length.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        16
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.address.octets());
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// WKS record — well-known services (RFC 1035).
///
/// An IPv4 address, an IP protocol number, and a bitmap with one bit
/// per port number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WKS {
    address: Ipv4Addr,
    protocol: u8,
    bitmap: Vec<u8>,
}

impl WKS {
    /// Creates a WKS record.
    pub fn new(address: Ipv4Addr, protocol: u8, bitmap: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            protocol,
            bitmap: bitmap.into(),
        }
    }

    /// Returns the address.
    #[inline]
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Returns the IP protocol number.
    #[inline]
    pub const fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Returns the service bitmap.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    /// Returns true if the bitmap marks `port` as served.
    pub fn serves_port(&self, port: u16) -> bool {
        let byte = (port / 8) as usize;
        let bit = 7 - (port % 8) as u8;
        self.bitmap
            .get(byte)
            .map(|b| b & (1 << bit) != 0)
            .unwrap_or(false)
    }

    /// Parses from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 5 {
            return Err(Error::invalid_rdata(
                "WKS",
                format!("{} octets, want at least 5", rdata.len()),
            ));
        }
        let octets: [u8; 4] = rdata[..4].try_into().unwrap();
        Ok(Self {
            address: Ipv4Addr::from(octets),
            protocol: rdata[4],
            bitmap: rdata[5..].to_vec(),
        })
    }

    /// Returns the wire-format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        5 + self.bitmap.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.address.octets());
        buf.extend_from_slice(&[self.protocol]);
        buf.extend_from_slice(&self.bitmap);
    }
}

impl fmt::Display for WKS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.address,
            self.protocol,
            HEXLOWER.encode(&self.bitmap)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_roundtrip() {
        let a = A::parse(&[192, 0, 2, 1]).unwrap();
        assert_eq!(a.address(), Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(a.to_string(), "192.0.2.1");

        let mut buf = BytesMut::new();
        a.write_to(&mut buf);
        assert_eq!(buf.as_ref(), &[192, 0, 2, 1]);
    }

    #[test]
    fn a_rejects_wrong_length() {
        assert!(A::parse(&[192, 0, 2]).is_err());
        assert!(A::parse(&[192, 0, 2, 1, 9]).is_err());
    }

    #[test]
    fn aaaa_roundtrip() {
        let mut octets = [0u8; 16];
        octets[15] = 1;
        let aaaa = AAAA::parse(&octets).unwrap();
        assert_eq!(aaaa.to_string(), "::1");
        assert_eq!(aaaa.wire_len(), 16);
    }

    #[test]
    fn wks_ports() {
        // Bitmap bit 25 set (SMTP): byte 3, bit 1 from MSB.
        let mut bitmap = vec![0u8; 4];
        bitmap[3] = 0b0100_0000;
        let wks = WKS::new(Ipv4Addr::new(10, 0, 0, 1), 6, bitmap);

        assert!(wks.serves_port(25));
        assert!(!wks.serves_port(24));
        assert!(!wks.serves_port(80));
    }

    #[test]
    fn wks_parse() {
        let wks = WKS::parse(&[10, 0, 0, 1, 17, 0xFF]).unwrap();
        assert_eq!(wks.protocol(), 17);
        assert_eq!(wks.bitmap(), &[0xFF]);
        assert!(WKS::parse(&[10, 0, 0, 1]).is_err());
    }
}
