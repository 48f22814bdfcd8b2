//! Codec error types.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while parsing or emitting DNS wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Ran off the end of the message while reading.
    #[error("unexpected end of message at offset {offset}")]
    UnexpectedEof {
        /// Byte offset at which the read would have ended.
        offset: usize,
    },

    /// The buffer is too short to hold the expected structure.
    #[error("message too short: need {expected} bytes, have {actual}")]
    TooShort {
        /// Minimum number of bytes required.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// A label exceeded 63 octets.
    #[error("label too long: {length} octets exceeds maximum of 63")]
    LabelTooLong {
        /// Offending label length.
        length: usize,
    },

    /// A name exceeded 255 octets in expanded wire form.
    #[error("name too long: {length} octets exceeds maximum of 255")]
    NameTooLong {
        /// Expanded wire length.
        length: usize,
    },

    /// A label contained a character outside the hostname alphabet.
    #[error("invalid character {character:?} in label")]
    InvalidLabelChar {
        /// The rejected character.
        character: char,
    },

    /// A name contained an interior empty label.
    #[error("empty label")]
    EmptyLabel,

    /// A compression pointer referenced an equal or later offset.
    #[error("invalid compression pointer at offset {offset}: target {target}")]
    InvalidPointer {
        /// Offset of the pointer octets.
        offset: usize,
        /// Offset the pointer referenced.
        target: usize,
    },

    /// A length octet used the reserved 0x40/0x80 label types.
    #[error("invalid label type 0x{value:02X} at offset {offset}")]
    InvalidLabelType {
        /// Offset of the length octet.
        offset: usize,
        /// The raw length octet.
        value: u8,
    },

    /// The header flag word carried an opcode outside the registry.
    #[error("invalid opcode: {value}")]
    InvalidOpCode {
        /// The 4-bit opcode value.
        value: u8,
    },

    /// An RDATA decoder consumed a different number of octets than the
    /// record's RDLENGTH advertised.
    #[error("RDATA length mismatch for {rtype}: expected {expected} octets, consumed {actual}")]
    RDataLengthMismatch {
        /// Record type name.
        rtype: &'static str,
        /// Advertised RDLENGTH.
        expected: usize,
        /// Octets actually consumed.
        actual: usize,
    },

    /// An RDATA payload was structurally invalid.
    #[error("invalid {rtype} RDATA: {message}")]
    InvalidRData {
        /// Record type name.
        rtype: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl Error {
    /// Creates an `UnexpectedEof` error.
    #[inline]
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEof { offset }
    }

    /// Creates a `TooShort` error.
    #[inline]
    pub fn too_short(expected: usize, actual: usize) -> Self {
        Self::TooShort { expected, actual }
    }

    /// Creates an `InvalidRData` error.
    #[inline]
    pub fn invalid_rdata(rtype: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRData {
            rtype,
            message: message.into(),
        }
    }

    /// Returns true if the error indicates bytes that cannot be a DNS
    /// message at all, as opposed to an unsupported value.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedEof { .. }
                | Self::TooShort { .. }
                | Self::InvalidPointer { .. }
                | Self::InvalidLabelType { .. }
                | Self::RDataLengthMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        let err = Error::too_short(12, 8);
        assert_eq!(err.to_string(), "message too short: need 12 bytes, have 8");

        let err = Error::LabelTooLong { length: 64 };
        assert_eq!(
            err.to_string(),
            "label too long: 64 octets exceeds maximum of 63"
        );
    }

    #[test]
    fn malformed_classification() {
        assert!(Error::unexpected_eof(3).is_malformed());
        assert!(Error::InvalidPointer { offset: 14, target: 20 }.is_malformed());
        assert!(!Error::InvalidOpCode { value: 9 }.is_malformed());
    }
}
