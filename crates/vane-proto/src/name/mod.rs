//! DNS domain names.
//!
//! A domain name is a sequence of labels, each at most 63 octets,
//! terminated by the zero-length root label. The whole wire form is at
//! most 255 octets. Comparison is case-insensitive per RFC 1035 §2.3.3
//! while emission preserves the case the name was built with.

mod parse;

pub use parse::NameParser;

use crate::error::{Error, Result};
use crate::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use bytes::BytesMut;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Inline storage sized for typical names; longer names spill to the heap.
pub(crate) type NameBuf = SmallVec<[u8; 64]>;

/// A fully-qualified DNS domain name.
///
/// The stored representation is the uncompressed wire form, always
/// ending with the root label, so the root name is the single octet
/// `00` and renders as `"."`.
///
/// ```rust
/// use std::str::FromStr;
/// use vane_proto::Name;
///
/// let name = Name::from_str("www.Example.com").unwrap();
/// assert_eq!(name.to_string(), "www.Example.com.");
/// assert_eq!(name, Name::from_str("WWW.EXAMPLE.COM.").unwrap());
/// ```
#[derive(Clone)]
pub struct Name {
    wire: NameBuf,
}

impl Name {
    /// Returns the root name (".").
    pub fn root() -> Self {
        let mut wire = NameBuf::new();
        wire.push(0);
        Self { wire }
    }

    /// Creates a name from uncompressed wire bytes.
    ///
    /// The slice must be a well-formed label sequence ending with the
    /// root label; compression pointers are rejected.
    pub fn from_wire(slice: &[u8]) -> Result<Self> {
        let mut pos = 0;
        loop {
            if pos >= slice.len() {
                return Err(Error::unexpected_eof(pos));
            }
            let len = slice[pos] as usize;
            if len == 0 {
                break;
            }
            if len > MAX_LABEL_LENGTH {
                return Err(Error::InvalidLabelType {
                    offset: pos,
                    value: slice[pos],
                });
            }
            pos += 1 + len;
        }
        if pos + 1 > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: pos + 1 });
        }

        Ok(Self {
            wire: NameBuf::from_slice(&slice[..pos + 1]),
        })
    }

    /// Builds a name from an already-validated buffer.
    pub(crate) fn from_validated(wire: NameBuf) -> Self {
        debug_assert_eq!(wire.last(), Some(&0));
        Self { wire }
    }

    /// Returns the uncompressed wire form, including the root label.
    #[inline]
    pub fn as_wire(&self) -> &[u8] {
        &self.wire
    }

    /// Returns the wire-format length in octets.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.wire.len()
    }

    /// Returns true if this is the root name.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.wire.len() == 1
    }

    /// Returns an iterator over the labels, leftmost first, excluding
    /// the root label.
    pub fn labels(&self) -> LabelIter<'_> {
        LabelIter {
            wire: &self.wire,
            pos: 0,
        }
    }

    /// Returns the number of labels, excluding the root label.
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// Returns the parent name, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let first = self.wire[0] as usize;
        Some(Self {
            wire: NameBuf::from_slice(&self.wire[1 + first..]),
        })
    }

    /// Lowercases the name in place.
    pub fn make_lowercase(&mut self) {
        // Length octets are <= 63 and unaffected by ASCII lowercasing.
        for byte in self.wire.iter_mut() {
            *byte = byte.to_ascii_lowercase();
        }
    }

    /// Returns a lowercased copy.
    #[must_use]
    pub fn lowercased(&self) -> Self {
        let mut copy = self.clone();
        copy.make_lowercase();
        copy
    }

    /// Appends the wire form to a buffer.
    pub fn write_wire(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.wire);
    }

    /// Renders the name in dotted presentation form with a trailing dot.
    pub fn to_presentation(&self) -> CompactString {
        let mut out = CompactString::default();
        for label in self.labels() {
            for &byte in label {
                match byte {
                    b'.' | b'\\' => {
                        out.push('\\');
                        out.push(byte as char);
                    }
                    0x21..=0x7E => out.push(byte as char),
                    _ => {
                        out.push('\\');
                        let _ = fmt::Write::write_fmt(&mut out, format_args!("{byte:03}"));
                    }
                }
            }
            out.push('.');
        }
        if out.is_empty() {
            out.push('.');
        }
        out
    }
}

/// Iterator over the labels of a [`Name`].
#[derive(Debug, Clone)]
pub struct LabelIter<'a> {
    wire: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for LabelIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let len = *self.wire.get(self.pos)? as usize;
        if len == 0 {
            return None;
        }
        let start = self.pos + 1;
        self.pos = start + len;
        self.wire.get(start..start + len)
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a dotted name. A missing trailing dot is implied; the
    /// empty string and `"."` are the root.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let s = s.strip_suffix('.').unwrap_or(s);
        let mut wire = NameBuf::new();

        for label in s.split('.') {
            if label.is_empty() {
                return Err(Error::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(Error::LabelTooLong {
                    length: label.len(),
                });
            }
            for c in label.chars() {
                if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '*' | '/') {
                    return Err(Error::InvalidLabelChar { character: c });
                }
            }
            wire.push(label.len() as u8);
            wire.extend_from_slice(label.as_bytes());
        }
        wire.push(0);

        if wire.len() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong { length: wire.len() });
        }

        Ok(Self { wire })
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_presentation())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name(\"{self}\")")
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.wire.len() == other.wire.len()
            && self
                .wire
                .iter()
                .zip(other.wire.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &byte in self.wire.iter() {
            byte.to_ascii_lowercase().hash(state);
        }
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Name {
    /// Canonical DNS ordering (RFC 4034 §6.1): labels compared
    /// case-insensitively from the root outward.
    fn cmp(&self, other: &Self) -> Ordering {
        let mine: Vec<&[u8]> = self.labels().collect();
        let theirs: Vec<&[u8]> = other.labels().collect();

        for (a, b) in mine.iter().rev().zip(theirs.iter().rev()) {
            let lowered = a
                .iter()
                .map(u8::to_ascii_lowercase)
                .cmp(b.iter().map(u8::to_ascii_lowercase));
            if lowered != Ordering::Equal {
                return lowered;
            }
        }
        mine.len().cmp(&theirs.len())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::root()
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_presentation())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root() {
        let root = Name::root();
        assert!(root.is_root());
        assert_eq!(root.label_count(), 0);
        assert_eq!(root.to_string(), ".");
        assert_eq!(root.as_wire(), &[0]);
    }

    #[test]
    fn from_str_roundtrip() {
        let name = Name::from_str("www.example.com.").unwrap();
        assert_eq!(name.label_count(), 3);
        assert_eq!(name.to_string(), "www.example.com.");

        // Trailing dot is implied.
        assert_eq!(name, Name::from_str("www.example.com").unwrap());
    }

    #[test]
    fn case_insensitive_eq_and_hash() {
        use std::collections::hash_map::DefaultHasher;

        let lower = Name::from_str("example.com").unwrap();
        let upper = Name::from_str("EXAMPLE.COM").unwrap();
        assert_eq!(lower, upper);

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        lower.hash(&mut h1);
        upper.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn case_preserved_on_wire() {
        let name = Name::from_str("Example.COM").unwrap();
        assert_eq!(
            name.as_wire(),
            &[7, b'E', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'C', b'O', b'M', 0]
        );
        assert_eq!(name.lowercased().to_string(), "example.com.");
    }

    #[test]
    fn parent_chain() {
        let name = Name::from_str("www.example.com").unwrap();
        let parent = name.parent().unwrap();
        assert_eq!(parent.to_string(), "example.com.");
        let tld = parent.parent().unwrap();
        assert_eq!(tld.to_string(), "com.");
        assert!(tld.parent().unwrap().is_root());
        assert!(Name::root().parent().is_none());
    }

    #[test]
    fn label_limits() {
        let long_label = "a".repeat(64);
        assert!(matches!(
            Name::from_str(&long_label),
            Err(Error::LabelTooLong { .. })
        ));

        // Four 63-octet labels: 4 * 64 + 1 = 257 > 255.
        let long_name = vec!["b".repeat(63); 4].join(".");
        assert!(matches!(
            Name::from_str(&long_name),
            Err(Error::NameTooLong { .. })
        ));
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(Name::from_str("exa mple.com").is_err());
        assert!(Name::from_str("a..b").is_err());
        assert!(Name::from_str("*.example.com").is_ok());
        assert!(Name::from_str("_sip._tcp.example.com").is_ok());
    }

    #[test]
    fn from_wire_validation() {
        let wire = [3, b'f', b'o', b'o', 0];
        let name = Name::from_wire(&wire).unwrap();
        assert_eq!(name.to_string(), "foo.");

        // Pointer bits are not valid in stored names.
        assert!(Name::from_wire(&[0xC0, 0x02, 0]).is_err());
        // Missing root label.
        assert!(Name::from_wire(&[3, b'f', b'o', b'o']).is_err());
    }

    #[test]
    fn canonical_ordering() {
        let mut names: Vec<Name> = ["z.example.", "a.example.", "example.", "yljkjljk.a.example."]
            .iter()
            .map(|s| Name::from_str(s).unwrap())
            .collect();
        names.sort();

        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "example.",
                "a.example.",
                "yljkjljk.a.example.",
                "z.example."
            ]
        );
    }
}
