//! DNS messages.
//!
//! A message is the 12-byte header followed by the question section
//! and the answer, authority and additional record sections.

use crate::error::{Error, Result};
use crate::header::{Header, HeaderFlags, HEADER_SIZE};
use crate::question::{Question, QuestionParser};
use crate::rcode::ResponseCode;
use crate::record::{RecordParser, ResourceRecord};
use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete DNS message.
///
/// Section counts in the header are authoritative on parse (they drive
/// how many entries are read) and recomputed from the section lengths
/// on emit, so a decoded or emitted message always satisfies
/// `qd_count == questions.len()` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Creates an empty message with the given header.
    pub fn new(header: Header) -> Self {
        Self {
            header,
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// Builds a query: qr=0, opcode QUERY, rd as requested, one
    /// question, everything else empty.
    pub fn query(id: u16, recursion_desired: bool, question: Question) -> Self {
        let mut header = Header::query(id, recursion_desired);
        header.qd_count = 1;

        Self {
            header,
            questions: vec![question],
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    /// Returns the header.
    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns a mutable reference to the header.
    #[inline]
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Returns the transaction id.
    #[inline]
    pub fn id(&self) -> u16 {
        self.header.id
    }

    /// Sets the transaction id.
    #[inline]
    pub fn set_id(&mut self, id: u16) {
        self.header.id = id;
    }

    /// Returns the response code.
    #[inline]
    pub fn rcode(&self) -> ResponseCode {
        self.header.rcode
    }

    /// Returns true if the message is a response.
    #[inline]
    pub fn is_response(&self) -> bool {
        self.header.is_response()
    }

    /// Returns true if the message was truncated in transit.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.header.is_truncated()
    }

    /// Returns the question section.
    #[inline]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Returns the first question, if any.
    #[inline]
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    /// Returns the answer section.
    #[inline]
    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    /// Returns the authority section.
    #[inline]
    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    /// Returns the additional section.
    #[inline]
    pub fn additionals(&self) -> &[ResourceRecord] {
        &self.additionals
    }

    /// Appends a question and updates the count.
    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
        self.header.qd_count = self.questions.len() as u16;
    }

    /// Appends an answer record and updates the count.
    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Appends answer records and updates the count.
    pub fn extend_answers(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.answers.extend(records);
        self.header.an_count = self.answers.len() as u16;
    }

    /// Appends an authority record and updates the count.
    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authorities.push(record);
        self.header.ns_count = self.authorities.len() as u16;
    }

    /// Appends authority records and updates the count.
    pub fn extend_authorities(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.authorities.extend(records);
        self.header.ns_count = self.authorities.len() as u16;
    }

    /// Appends an additional record and updates the count.
    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additionals.push(record);
        self.header.ar_count = self.additionals.len() as u16;
    }

    /// Appends additional records and updates the count.
    pub fn extend_additionals(&mut self, records: impl IntoIterator<Item = ResourceRecord>) {
        self.additionals.extend(records);
        self.header.ar_count = self.additionals.len() as u16;
    }

    /// Returns all A record addresses in the answer section.
    pub fn a_records(&self) -> impl Iterator<Item = std::net::Ipv4Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_a())
    }

    /// Returns all AAAA record addresses in the answer section.
    pub fn aaaa_records(&self) -> impl Iterator<Item = std::net::Ipv6Addr> + '_ {
        self.answers.iter().filter_map(|r| r.rdata().as_aaaa())
    }

    /// Parses a complete message.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::too_short(HEADER_SIZE, data.len()));
        }

        let header = Header::parse(data)?;
        let mut offset = HEADER_SIZE;

        let mut questions = Vec::with_capacity(header.qd_count as usize);
        let mut q_parser = QuestionParser::new(data, offset, header.qd_count);
        while let Some(q) = q_parser.next()? {
            questions.push(q);
        }
        offset = q_parser.offset();

        let mut sections: [Vec<ResourceRecord>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (section, count) in sections
            .iter_mut()
            .zip([header.an_count, header.ns_count, header.ar_count])
        {
            let mut parser = RecordParser::new(data, offset, count);
            while let Some(r) = parser.next()? {
                section.push(r);
            }
            offset = parser.offset();
        }
        let [answers, authorities, additionals] = sections;

        Ok(Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        HEADER_SIZE
            + self.questions.iter().map(Question::wire_len).sum::<usize>()
            + self
                .answers
                .iter()
                .chain(&self.authorities)
                .chain(&self.additionals)
                .map(ResourceRecord::wire_len)
                .sum::<usize>()
    }

    /// Appends the wire form to a buffer, recomputing the section
    /// counts first. Names are emitted without compression.
    pub fn write_to(&self, buf: &mut BytesMut) {
        let mut header = self.header.clone();
        header.qd_count = self.questions.len() as u16;
        header.an_count = self.answers.len() as u16;
        header.ns_count = self.authorities.len() as u16;
        header.ar_count = self.additionals.len() as u16;
        header.write_to(buf);

        for q in &self.questions {
            q.write_to(buf);
        }
        for r in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            r.write_to(buf);
        }
    }

    /// Returns the wire form as frozen bytes.
    pub fn to_wire(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_len());
        self.write_to(&mut buf);
        buf.freeze()
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new(Header::default())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, ";; ->>HEADER<<- {}", self.header)?;

        writeln!(f, ";; QUESTION SECTION:")?;
        for q in &self.questions {
            writeln!(f, ";{q}")?;
        }

        for (title, section) in [
            ("ANSWER", &self.answers),
            ("AUTHORITY", &self.authorities),
            ("ADDITIONAL", &self.additionals),
        ] {
            if !section.is_empty() {
                writeln!(f, ";; {title} SECTION:")?;
                for r in section.iter() {
                    writeln!(f, "{r}")?;
                }
            }
        }

        Ok(())
    }
}

/// Flag helpers reused by tests and the resolver.
impl Message {
    /// Marks the message as a response and sets its rcode.
    pub fn set_response(&mut self, rcode: ResponseCode) {
        self.header.flags |= HeaderFlags::QR;
        self.header.rcode = rcode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use crate::rtype::RecordType;
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    fn a_question(name: &str) -> Question {
        Question::internet(Name::from_str(name).unwrap(), RecordType::A)
    }

    #[test]
    fn minimal_query_encoding() {
        let query = Message::query(0x1234, true, a_question("example.com."));
        let wire = query.to_wire();

        assert_eq!(wire.len(), 29);
        assert_eq!(
            &wire[..12],
            &[0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            &wire[12..25],
            &[7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0]
        );
        assert_eq!(&wire[25..], &[0x00, 0x01, 0x00, 0x01]);
    }

    #[test]
    fn query_roundtrip() {
        let original = Message::query(0xBEEF, true, a_question("www.example.com"));
        let parsed = Message::parse(&original.to_wire()).unwrap();

        assert_eq!(parsed.id(), 0xBEEF);
        assert!(parsed.header().recursion_desired());
        assert_eq!(parsed.questions(), original.questions());
        assert!(parsed.answers().is_empty());
    }

    #[test]
    fn counts_match_sections_after_parse(){
        let mut message = Message::query(7, false, a_question("example.com"));
        message.set_response(ResponseCode::NoError);
        message.add_answer(ResourceRecord::a(
            Name::from_str("example.com").unwrap(),
            60,
            Ipv4Addr::new(192, 0, 2, 1),
        ));
        message.add_answer(ResourceRecord::a(
            Name::from_str("example.com").unwrap(),
            60,
            Ipv4Addr::new(192, 0, 2, 2),
        ));

        let parsed = Message::parse(&message.to_wire()).unwrap();
        assert_eq!(parsed.header().an_count, 2);
        assert_eq!(parsed.answers().len(), 2);
        assert_eq!(parsed.header().qd_count, 1);
        assert_eq!(parsed.questions().len(), 1);
    }

    #[test]
    fn counts_recomputed_on_emit() {
        let mut message = Message::query(1, false, a_question("example.com"));
        // Lie in the header; emission must not trust it.
        message.header_mut().an_count = 40;
        let parsed = Message::parse(&message.to_wire()).unwrap();
        assert_eq!(parsed.header().an_count, 0);
    }

    #[test]
    fn parse_rejects_count_overrun() {
        let mut message = Message::query(1, false, a_question("example.com"));
        message.header_mut().qd_count = 2;

        let mut wire = BytesMut::new();
        message.header().write_to(&mut wire);
        for q in message.questions() {
            q.write_to(&mut wire);
        }

        assert!(Message::parse(&wire).is_err());
    }

    #[test]
    fn parses_compressed_response() {
        // Hand-built response: question example.com/A, answer name is
        // a pointer to the question name at offset 12.
        let mut wire = Vec::new();
        wire.extend_from_slice(&[
            0x00, 0x2A, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        ]);
        wire.extend_from_slice(&[7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0]);
        wire.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
        wire.extend_from_slice(&[0xC0, 0x0C]); // name: pointer to offset 12
        wire.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]); // A IN
        wire.extend_from_slice(&300u32.to_be_bytes());
        wire.extend_from_slice(&[0x00, 0x04, 192, 0, 2, 44]);

        let message = Message::parse(&wire).unwrap();
        assert_eq!(message.answers().len(), 1);

        let answer = &message.answers()[0];
        assert_eq!(answer.name().to_string(), "example.com.");
        assert_eq!(answer.rdata().as_a(), Some(Ipv4Addr::new(192, 0, 2, 44)));
    }
}
