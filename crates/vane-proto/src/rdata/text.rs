//! Text record types (TXT, SPF, HINFO, X25, ISDN).
//!
//! These are built from DNS character-strings: a length octet followed
//! by up to 255 raw bytes.

use crate::error::{Error, Result};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Writes a character-string sequence in presentation form, one quoted
/// string per element.
fn fmt_quoted(f: &mut fmt::Formatter<'_>, strings: &[Vec<u8>]) -> fmt::Result {
    for (i, s) in strings.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "\"")?;
        for &byte in s {
            match byte {
                b'"' | b'\\' => write!(f, "\\{}", byte as char)?,
                0x20..=0x7E => write!(f, "{}", byte as char)?,
                _ => write!(f, "\\{byte:03}")?,
            }
        }
        write!(f, "\"")?;
    }
    Ok(())
}

/// TXT/SPF RDATA — a run of character-strings filling the whole RDATA.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterStrings {
    strings: SmallVec<[Vec<u8>; 2]>,
}

impl CharacterStrings {
    /// Creates the payload from string segments.
    pub fn new(strings: impl IntoIterator<Item = impl Into<Vec<u8>>>) -> Self {
        Self {
            strings: strings.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the individual segments.
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.strings
    }

    /// Returns the segments concatenated, the semantic value for
    /// multi-string records like long SPF policies.
    pub fn concatenated(&self) -> Vec<u8> {
        self.strings.iter().flatten().copied().collect()
    }

    /// Returns the concatenated text if it is valid UTF-8.
    pub fn text(&self) -> Option<String> {
        String::from_utf8(self.concatenated()).ok()
    }

    /// Parses character-strings until the RDATA slice is exhausted.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(rdata);
        let mut strings = SmallVec::new();

        while !reader.is_empty() {
            strings.push(reader.read_character_string()?.to_vec());
        }

        Ok(Self { strings })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        self.strings.iter().map(|s| 1 + s.len()).sum()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        for s in &self.strings {
            buf.extend_from_slice(&[s.len().min(255) as u8]);
            buf.extend_from_slice(&s[..s.len().min(255)]);
        }
    }
}

impl fmt::Display for CharacterStrings {
    /// The canonical rendering concatenates the segments: a record
    /// split as `"hello" "world"` reads back as `helloworld`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.strings {
            for &byte in s {
                match byte {
                    0x20..=0x7E => write!(f, "{}", byte as char)?,
                    _ => write!(f, "\\{byte:03}")?,
                }
            }
        }
        Ok(())
    }
}

/// HINFO record — host CPU and OS (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HINFO {
    cpu: Vec<u8>,
    os: Vec<u8>,
}

impl HINFO {
    /// Creates an HINFO record.
    pub fn new(cpu: impl Into<Vec<u8>>, os: impl Into<Vec<u8>>) -> Self {
        Self {
            cpu: cpu.into(),
            os: os.into(),
        }
    }

    /// Returns the CPU string.
    pub fn cpu(&self) -> &[u8] {
        &self.cpu
    }

    /// Returns the OS string.
    pub fn os(&self) -> &[u8] {
        &self.os
    }

    /// Parses exactly two character-strings from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(rdata);
        let cpu = reader.read_character_string()?.to_vec();
        let os = reader.read_character_string()?.to_vec();
        if !reader.is_empty() {
            return Err(Error::invalid_rdata("HINFO", "trailing bytes"));
        }
        Ok(Self { cpu, os })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        2 + self.cpu.len() + self.os.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&[self.cpu.len() as u8]);
        buf.extend_from_slice(&self.cpu);
        buf.extend_from_slice(&[self.os.len() as u8]);
        buf.extend_from_slice(&self.os);
    }
}

impl fmt::Display for HINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_quoted(f, &[self.cpu.clone(), self.os.clone()])
    }
}

/// X25 record — PSDN address (RFC 1183).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct X25 {
    address: Vec<u8>,
}

impl X25 {
    /// Creates an X25 record.
    pub fn new(address: impl Into<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Returns the PSDN address string.
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    /// Parses one character-string from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(rdata);
        let address = reader.read_character_string()?.to_vec();
        if !reader.is_empty() {
            return Err(Error::invalid_rdata("X25", "trailing bytes"));
        }
        Ok(Self { address })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        1 + self.address.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&[self.address.len() as u8]);
        buf.extend_from_slice(&self.address);
    }
}

impl fmt::Display for X25 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_quoted(f, std::slice::from_ref(&self.address))
    }
}

/// ISDN record — ISDN address and optional subaddress (RFC 1183).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ISDN {
    address: Vec<u8>,
    subaddress: Option<Vec<u8>>,
}

impl ISDN {
    /// Creates an ISDN record.
    pub fn new(address: impl Into<Vec<u8>>, subaddress: Option<Vec<u8>>) -> Self {
        Self {
            address: address.into(),
            subaddress,
        }
    }

    /// Returns the ISDN address.
    pub fn address(&self) -> &[u8] {
        &self.address
    }

    /// Returns the subaddress, if present.
    pub fn subaddress(&self) -> Option<&[u8]> {
        self.subaddress.as_deref()
    }

    /// Parses one or two character-strings from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(rdata);
        let address = reader.read_character_string()?.to_vec();
        let subaddress = if reader.is_empty() {
            None
        } else {
            Some(reader.read_character_string()?.to_vec())
        };
        if !reader.is_empty() {
            return Err(Error::invalid_rdata("ISDN", "trailing bytes"));
        }
        Ok(Self {
            address,
            subaddress,
        })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        1 + self.address.len() + self.subaddress.as_ref().map_or(0, |s| 1 + s.len())
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&[self.address.len() as u8]);
        buf.extend_from_slice(&self.address);
        if let Some(sub) = &self.subaddress {
            buf.extend_from_slice(&[sub.len() as u8]);
            buf.extend_from_slice(sub);
        }
    }
}

impl fmt::Display for ISDN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subaddress {
            Some(sub) => fmt_quoted(f, &[self.address.clone(), sub.clone()]),
            None => fmt_quoted(f, std::slice::from_ref(&self.address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_multi_string() {
        // "hello" "world" with rdlength 12.
        let rdata = [
            5, b'h', b'e', b'l', b'l', b'o', 5, b'w', b'o', b'r', b'l', b'd',
        ];
        let txt = CharacterStrings::parse(&rdata).unwrap();

        assert_eq!(txt.strings().len(), 2);
        assert_eq!(txt.strings()[0], b"hello");
        assert_eq!(txt.strings()[1], b"world");
        assert_eq!(txt.text().unwrap(), "helloworld");
        assert_eq!(txt.to_string(), "helloworld");
    }

    #[test]
    fn txt_roundtrip() {
        let txt = CharacterStrings::new(["v=spf1 -all"]);
        let mut buf = BytesMut::new();
        txt.write_to(&mut buf);

        let parsed = CharacterStrings::parse(&buf).unwrap();
        assert_eq!(parsed, txt);
        assert_eq!(buf.len(), txt.wire_len());
    }

    #[test]
    fn txt_rejects_overrun() {
        // Length octet runs past the end of the RDATA.
        let rdata = [7, b'h', b'i'];
        assert!(CharacterStrings::parse(&rdata).is_err());
    }

    #[test]
    fn txt_escapes_unprintable_display() {
        let txt = CharacterStrings::new([vec![b'o', b'k', 0x07]]);
        assert_eq!(txt.to_string(), "ok\\007");
    }

    #[test]
    fn hinfo() {
        let rdata = [5, b'I', b'n', b't', b'e', b'l', 5, b'L', b'i', b'n', b'u', b'x'];
        let hinfo = HINFO::parse(&rdata).unwrap();
        assert_eq!(hinfo.cpu(), b"Intel");
        assert_eq!(hinfo.os(), b"Linux");
        assert_eq!(hinfo.to_string(), "\"Intel\" \"Linux\"");

        // Trailing data is a length violation.
        let bad = [1, b'a', 1, b'b', 0];
        assert!(HINFO::parse(&bad).is_err());
    }

    #[test]
    fn isdn_optional_subaddress() {
        let single = [3, b'1', b'2', b'3'];
        let isdn = ISDN::parse(&single).unwrap();
        assert_eq!(isdn.address(), b"123");
        assert!(isdn.subaddress().is_none());

        let double = [3, b'1', b'2', b'3', 2, b'0', b'4'];
        let isdn = ISDN::parse(&double).unwrap();
        assert_eq!(isdn.subaddress(), Some(&b"04"[..]));
    }
}
