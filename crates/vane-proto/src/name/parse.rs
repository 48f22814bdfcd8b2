//! Name parsing from message bytes, with compression support.
//!
//! Compression pointers (RFC 1035 §4.1.4) are two octets whose top two
//! bits are `11`; the remaining 14 bits are an offset into the same
//! message. A pointer terminates the current name: expansion continues
//! at the target while the outer cursor advances past the pointer.

use super::{Name, NameBuf};
use crate::error::{Error, Result};
use crate::MAX_NAME_LENGTH;

/// Parses domain names out of a complete message buffer.
///
/// The whole message is required because compression targets may sit
/// anywhere before the name being read. Pointer targets must refer
/// strictly backward; that single rule bounds the expansion walk by
/// the message length and rejects pointer loops outright.
#[derive(Debug, Clone, Copy)]
pub struct NameParser<'a> {
    message: &'a [u8],
}

impl<'a> NameParser<'a> {
    /// Creates a parser over the complete message.
    #[inline]
    pub const fn new(message: &'a [u8]) -> Self {
        Self { message }
    }

    /// Parses a name starting at `offset`.
    ///
    /// Returns the expanded name and the number of bytes the name
    /// occupies at `offset` itself (a compression pointer counts as
    /// two octets; the expansion behind it does not).
    pub fn parse_name(&self, offset: usize) -> Result<(Name, usize)> {
        let mut wire = NameBuf::new();
        let mut pos = offset;
        let mut consumed = None;

        loop {
            let len_byte = *self
                .message
                .get(pos)
                .ok_or(Error::unexpected_eof(pos))?;

            // Compression pointer: top two bits set.
            if len_byte & 0xC0 == 0xC0 {
                let low = *self
                    .message
                    .get(pos + 1)
                    .ok_or(Error::unexpected_eof(pos + 1))?;
                let target = usize::from(u16::from_be_bytes([len_byte & 0x3F, low]));

                if target >= pos {
                    return Err(Error::InvalidPointer {
                        offset: pos,
                        target,
                    });
                }
                consumed.get_or_insert_with(|| pos - offset + 2);
                pos = target;
                continue;
            }

            // The 0x40 and 0x80 label types are reserved.
            if len_byte & 0xC0 != 0 {
                return Err(Error::InvalidLabelType {
                    offset: pos,
                    value: len_byte,
                });
            }

            let len = len_byte as usize;
            if len == 0 {
                wire.push(0);
                consumed.get_or_insert_with(|| pos - offset + 1);
                break;
            }

            let label = self
                .message
                .get(pos + 1..pos + 1 + len)
                .ok_or(Error::unexpected_eof(pos + 1 + len))?;

            if wire.len() + 1 + len + 1 > MAX_NAME_LENGTH {
                return Err(Error::NameTooLong {
                    length: wire.len() + 1 + len + 1,
                });
            }

            wire.push(len_byte);
            wire.extend_from_slice(label);
            pos += 1 + len;
        }

        Ok((Name::from_validated(wire), consumed.unwrap_or(0)))
    }

    /// Parses a name, discarding the consumed-length bookkeeping.
    #[inline]
    pub fn parse(&self, offset: usize) -> Result<Name> {
        self.parse_name(offset).map(|(name, _)| name)
    }
}
