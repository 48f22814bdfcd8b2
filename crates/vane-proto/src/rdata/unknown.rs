//! Opaque RDATA handling.

use bytes::BytesMut;
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RDATA preserved verbatim.
///
/// Used for every type code without a structured decoder — both
/// registry types this codec carries opaquely (NSEC, OPT, TSIG, APL
/// and friends) and entirely unassigned codes. Rendering follows the
/// RFC 3597 `\# <length> <hex>` generic form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Opaque {
    type_code: u16,
    data: Vec<u8>,
}

impl Opaque {
    /// Creates an opaque payload for the given type code.
    pub fn new(type_code: u16, data: impl Into<Vec<u8>>) -> Self {
        Self {
            type_code,
            data: data.into(),
        }
    }

    /// Returns the 16-bit record type code.
    #[inline]
    pub const fn type_code(&self) -> u16 {
        self.type_code
    }

    /// Returns the raw RDATA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the wire-format length.
    #[inline]
    pub fn wire_len(&self) -> usize {
        self.data.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.data);
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\# {} {}", self.data.len(), HEXLOWER.encode(&self.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_bytes() {
        let opaque = Opaque::new(41, vec![0x00, 0x0A, 0xFF]);
        assert_eq!(opaque.type_code(), 41);
        assert_eq!(opaque.data(), &[0x00, 0x0A, 0xFF]);

        let mut buf = BytesMut::new();
        opaque.write_to(&mut buf);
        assert_eq!(buf.as_ref(), &[0x00, 0x0A, 0xFF]);
    }

    #[test]
    fn generic_presentation() {
        let opaque = Opaque::new(65280, vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(opaque.to_string(), "\\# 4 deadbeef");

        let empty = Opaque::new(10, Vec::new());
        assert_eq!(empty.to_string(), "\\# 0 ");
    }
}
