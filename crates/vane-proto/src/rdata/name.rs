//! Record types whose RDATA is one or two domain names.
//!
//! NS, CNAME, PTR, DNAME, MB, MD, MF, MG and MR all carry a single
//! name and share the [`HostName`] payload; MINFO and RP carry two.

use crate::error::Result;
use crate::name::{Name, NameParser};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RDATA payload of the single-name record types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostName {
    name: Name,
}

impl HostName {
    /// Creates the payload.
    #[inline]
    pub fn new(name: Name) -> Self {
        Self { name }
    }

    /// Returns the carried name.
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Parses the name at `offset`, returning it and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (name, used) = NameParser::new(message).parse_name(offset)?;
        Ok((Self { name }, used))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        self.name.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.name.write_wire(buf);
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<Name> for HostName {
    fn from(name: Name) -> Self {
        Self::new(name)
    }
}

/// MINFO record — mailbox information (RFC 1035).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MINFO {
    rmailbx: Name,
    emailbx: Name,
}

impl MINFO {
    /// Creates a MINFO record.
    pub fn new(rmailbx: Name, emailbx: Name) -> Self {
        Self { rmailbx, emailbx }
    }

    /// Returns the responsible mailbox.
    #[inline]
    pub fn rmailbx(&self) -> &Name {
        &self.rmailbx
    }

    /// Returns the error mailbox.
    #[inline]
    pub fn emailbx(&self) -> &Name {
        &self.emailbx
    }

    /// Parses both names, returning the record and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(message);
        let (rmailbx, first) = parser.parse_name(offset)?;
        let (emailbx, second) = parser.parse_name(offset + first)?;
        Ok((Self { rmailbx, emailbx }, first + second))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        self.rmailbx.wire_len() + self.emailbx.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.rmailbx.write_wire(buf);
        self.emailbx.write_wire(buf);
    }
}

impl fmt::Display for MINFO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rmailbx, self.emailbx)
    }
}

/// RP record — responsible person (RFC 1183).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RP {
    mbox: Name,
    txt: Name,
}

impl RP {
    /// Creates an RP record.
    pub fn new(mbox: Name, txt: Name) -> Self {
        Self { mbox, txt }
    }

    /// Returns the mailbox name (first label is the local part).
    #[inline]
    pub fn mbox(&self) -> &Name {
        &self.mbox
    }

    /// Returns the name of a TXT record with further details.
    #[inline]
    pub fn txt(&self) -> &Name {
        &self.txt
    }

    /// Parses both names, returning the record and the bytes consumed.
    pub fn parse(message: &[u8], offset: usize) -> Result<(Self, usize)> {
        let parser = NameParser::new(message);
        let (mbox, first) = parser.parse_name(offset)?;
        let (txt, second) = parser.parse_name(offset + first)?;
        Ok((Self { mbox, txt }, first + second))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        self.mbox.wire_len() + self.txt.wire_len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.mbox.write_wire(buf);
        self.txt.write_wire(buf);
    }
}

impl fmt::Display for RP {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mbox, self.txt)
    }
}
