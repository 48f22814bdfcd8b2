//! Service and routing record types (MX, AFSDB, RT, KX, PX, SRV, NAPTR).

use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared payload of MX, AFSDB, RT and KX: a 16-bit preference (or
/// subtype, for AFSDB) followed by a domain name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exchange {
    preference: u16,
    exchange: Name,
}

impl Exchange {
    /// Creates the payload.
    pub fn new(preference: u16, exchange: Name) -> Self {
        Self {
            preference,
            exchange,
        }
    }

    /// Returns the preference value (lower is preferred).
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the target host.
    #[inline]
    pub fn exchange(&self) -> &Name {
        &self.exchange
    }

    /// Parses the payload, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut reader = WireReader::at(message, offset);
        let preference = reader.read_u16()?;
        let (exchange, name_len) = NameParser::new(message).parse_name(offset + 2)?;
        Ok((
            Self {
                preference,
                exchange,
            },
            2 + name_len,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        2 + self.exchange.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.preference.to_be_bytes());
        self.exchange.write_wire(buf);
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.preference, self.exchange)
    }
}

/// PX record — X.400 mail mapping (RFC 2163).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PX {
    preference: u16,
    map822: Name,
    mapx400: Name,
}

impl PX {
    /// Creates a PX record.
    pub fn new(preference: u16, map822: Name, mapx400: Name) -> Self {
        Self {
            preference,
            map822,
            mapx400,
        }
    }

    /// Returns the preference value.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the RFC 822 domain.
    #[inline]
    pub fn map822(&self) -> &Name {
        &self.map822
    }

    /// Returns the X.400 domain.
    #[inline]
    pub fn mapx400(&self) -> &Name {
        &self.mapx400
    }

    /// Parses the record, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut reader = WireReader::at(message, offset);
        let preference = reader.read_u16()?;

        let parser = NameParser::new(message);
        let (map822, first) = parser.parse_name(offset + 2)?;
        let (mapx400, second) = parser.parse_name(offset + 2 + first)?;

        Ok((
            Self {
                preference,
                map822,
                mapx400,
            },
            2 + first + second,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        2 + self.map822.wire_len() + self.mapx400.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.preference.to_be_bytes());
        self.map822.write_wire(buf);
        self.mapx400.write_wire(buf);
    }
}

impl fmt::Display for PX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.preference, self.map822, self.mapx400)
    }
}

/// SRV record — server selection (RFC 2782).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SRV {
    priority: u16,
    weight: u16,
    port: u16,
    target: Name,
}

impl SRV {
    /// Creates an SRV record.
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// Returns the priority (lower is preferred).
    #[inline]
    pub const fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns the weight for equal-priority selection.
    #[inline]
    pub const fn weight(&self) -> u16 {
        self.weight
    }

    /// Returns the service port.
    #[inline]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the target host.
    #[inline]
    pub fn target(&self) -> &Name {
        &self.target
    }

    /// Parses the record, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut reader = WireReader::at(message, offset);
        let priority = reader.read_u16()?;
        let weight = reader.read_u16()?;
        let port = reader.read_u16()?;

        let (target, name_len) = NameParser::new(message).parse_name(offset + 6)?;

        Ok((
            Self {
                priority,
                weight,
                port,
                target,
            },
            6 + name_len,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        6 + self.target.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.priority.to_be_bytes());
        buf.extend_from_slice(&self.weight.to_be_bytes());
        buf.extend_from_slice(&self.port.to_be_bytes());
        self.target.write_wire(buf);
    }
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.priority, self.weight, self.port, self.target
        )
    }
}

/// NAPTR record — naming authority pointer (RFC 3403).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NAPTR {
    order: u16,
    preference: u16,
    flags: Vec<u8>,
    services: Vec<u8>,
    regexp: Vec<u8>,
    replacement: Name,
}

impl NAPTR {
    /// Creates a NAPTR record.
    pub fn new(
        order: u16,
        preference: u16,
        flags: impl Into<Vec<u8>>,
        services: impl Into<Vec<u8>>,
        regexp: impl Into<Vec<u8>>,
        replacement: Name,
    ) -> Self {
        Self {
            order,
            preference,
            flags: flags.into(),
            services: services.into(),
            regexp: regexp.into(),
            replacement,
        }
    }

    /// Returns the rule order.
    #[inline]
    pub const fn order(&self) -> u16 {
        self.order
    }

    /// Returns the preference among equal-order rules.
    #[inline]
    pub const fn preference(&self) -> u16 {
        self.preference
    }

    /// Returns the flags string.
    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    /// Returns the services string.
    pub fn services(&self) -> &[u8] {
        &self.services
    }

    /// Returns the rewrite expression.
    pub fn regexp(&self) -> &[u8] {
        &self.regexp
    }

    /// Returns the replacement name.
    #[inline]
    pub fn replacement(&self) -> &Name {
        &self.replacement
    }

    /// Parses the record, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let mut reader = WireReader::at(message, offset);
        let order = reader.read_u16()?;
        let preference = reader.read_u16()?;
        let flags = reader.read_character_string()?.to_vec();
        let services = reader.read_character_string()?.to_vec();
        let regexp = reader.read_character_string()?.to_vec();

        let strings_end = reader.position();
        let (replacement, name_len) = NameParser::new(message).parse_name(strings_end)?;

        Ok((
            Self {
                order,
                preference,
                flags,
                services,
                regexp,
                replacement,
            },
            strings_end - offset + name_len,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        4 + 3
            + self.flags.len()
            + self.services.len()
            + self.regexp.len()
            + self.replacement.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.order.to_be_bytes());
        buf.extend_from_slice(&self.preference.to_be_bytes());
        for s in [&self.flags, &self.services, &self.regexp] {
            buf.extend_from_slice(&[s.len() as u8]);
            buf.extend_from_slice(s);
        }
        self.replacement.write_wire(buf);
    }
}

impl fmt::Display for NAPTR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} \"{}\" \"{}\" \"{}\" {}",
            self.order,
            self.preference,
            String::from_utf8_lossy(&self.flags),
            String::from_utf8_lossy(&self.services),
            String::from_utf8_lossy(&self.regexp),
            self.replacement
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn exchange_roundtrip() {
        let mx = Exchange::new(10, Name::from_str("mail.example.com").unwrap());

        let mut buf = BytesMut::new();
        mx.write_to(&mut buf);

        let (parsed, used) = Exchange::parse(&buf, 0).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(parsed.preference(), 10);
        assert_eq!(parsed.exchange().to_string(), "mail.example.com.");
        assert_eq!(mx.to_string(), "10 mail.example.com.");
    }

    #[test]
    fn srv_roundtrip() {
        let srv = SRV::new(0, 5, 5060, Name::from_str("sip.example.com").unwrap());

        let mut buf = BytesMut::new();
        srv.write_to(&mut buf);

        let (parsed, used) = SRV::parse(&buf, 0).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(parsed, srv);
        assert_eq!(srv.to_string(), "0 5 5060 sip.example.com.");
    }

    #[test]
    fn naptr_roundtrip() {
        let naptr = NAPTR::new(
            100,
            10,
            *b"u",
            b"E2U+sip".to_vec(),
            b"!^.*$!sip:info@example.com!".to_vec(),
            Name::root(),
        );

        let mut buf = BytesMut::new();
        naptr.write_to(&mut buf);

        let (parsed, used) = NAPTR::parse(&buf, 0).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(parsed.order(), 100);
        assert_eq!(parsed.services(), b"E2U+sip");
        assert!(parsed.replacement().is_root());
    }

    #[test]
    fn px_roundtrip() {
        let px = PX::new(
            5,
            Name::from_str("example.com").unwrap(),
            Name::from_str("px400.example.com").unwrap(),
        );

        let mut buf = BytesMut::new();
        px.write_to(&mut buf);

        let (parsed, used) = PX::parse(&buf, 0).unwrap();
        assert_eq!(used, buf.len());
        assert_eq!(parsed, px);
    }
}
