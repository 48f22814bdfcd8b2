//! DNS question section.

use crate::class::{Class, RecordClass};
use crate::error::Result;
use crate::name::{Name, NameParser};
use crate::rtype::{RecordType, Type};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DNS question: the name, type, and class being asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    /// The name being queried.
    pub qname: Name,
    /// The requested record type.
    pub qtype: Type,
    /// The query class, almost always IN.
    pub qclass: Class,
}

impl Question {
    /// Creates a question from registry type and class values.
    #[inline]
    pub fn new(qname: Name, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            qname,
            qtype: Type::Known(qtype),
            qclass: Class::Known(qclass),
        }
    }

    /// Creates an IN-class question.
    #[inline]
    pub fn internet(qname: Name, qtype: RecordType) -> Self {
        Self::new(qname, qtype, RecordClass::IN)
    }

    /// Parses a question at `offset`, returning it and the bytes consumed.
    pub fn parse(data: &[u8], offset: usize) -> Result<(Self, usize)> {
        let (qname, name_len) = NameParser::new(data).parse_name(offset)?;

        let mut reader = WireReader::at(data, offset + name_len);
        let qtype = Type::from_u16(reader.read_u16()?);
        let qclass = Class::from_u16(reader.read_u16()?);

        Ok((
            Self {
                qname,
                qtype,
                qclass,
            },
            name_len + 4,
        ))
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        self.qname.wire_len() + 4
    }

    /// Appends the wire form to a buffer. Question names are emitted
    /// without compression.
    pub fn write_to(&self, buf: &mut BytesMut) {
        self.qname.write_wire(buf);
        buf.extend_from_slice(&self.qtype.to_u16().to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_u16().to_be_bytes());
    }

    /// Returns true if `other` asks for the same thing, comparing the
    /// name case-insensitively.
    pub fn matches(&self, other: &Question) -> bool {
        self.qname == other.qname && self.qtype == other.qtype && self.qclass == other.qclass
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.qname, self.qclass, self.qtype)
    }
}

/// Streaming parser over the question section.
#[derive(Debug)]
pub struct QuestionParser<'a> {
    data: &'a [u8],
    offset: usize,
    remaining: u16,
}

impl<'a> QuestionParser<'a> {
    /// Creates a parser reading `count` questions starting at `offset`.
    #[inline]
    pub const fn new(data: &'a [u8], offset: usize, count: u16) -> Self {
        Self {
            data,
            offset,
            remaining: count,
        }
    }

    /// Returns the offset just past the last parsed question.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Parses the next question, or `None` when the section is done.
    pub fn next(&mut self) -> Result<Option<Question>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let (question, consumed) = Question::parse(self.data, self.offset)?;
        self.offset += consumed;
        self.remaining -= 1;
        Ok(Some(question))
    }
}
