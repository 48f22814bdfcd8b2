//! DNS record classes.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record class (RFC 1035 §3.2.4).
///
/// In practice only IN appears on the wire; the remaining classes are
/// kept for completeness and for CHAOS-class server identity queries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u16)]
pub enum RecordClass {
    /// Internet.
    IN = 1,
    /// CSNET (obsolete).
    CS = 2,
    /// CHAOS.
    CH = 3,
    /// Hesiod.
    HS = 4,
    /// Query-only: no class (RFC 2136).
    NONE = 254,
    /// Query-only: any class.
    ANY = 255,
}

impl RecordClass {
    /// Returns the numeric value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Creates a class from its numeric value.
    #[inline]
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::try_from(value).ok()
    }

    /// Returns the presentation name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IN => "IN",
            Self::CS => "CS",
            Self::CH => "CH",
            Self::HS => "HS",
            Self::NONE => "NONE",
            Self::ANY => "ANY",
        }
    }
}

impl fmt::Display for RecordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A record class as it appears on the wire: either a registered class
/// or an unassigned 16-bit code preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Class {
    /// A class from the registry.
    Known(RecordClass),
    /// An unassigned code.
    Unknown(u16),
}

impl Class {
    /// The Internet class, the default for queries.
    pub const IN: Self = Self::Known(RecordClass::IN);

    /// Creates a class from a 16-bit wire value.
    #[inline]
    pub fn from_u16(value: u16) -> Self {
        match RecordClass::from_u16(value) {
            Some(class) => Self::Known(class),
            None => Self::Unknown(value),
        }
    }

    /// Returns the 16-bit wire value.
    #[inline]
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::Known(class) => class.to_u16(),
            Self::Unknown(value) => value,
        }
    }

    /// Returns the registered class, if any.
    #[inline]
    pub const fn as_known(self) -> Option<RecordClass> {
        match self {
            Self::Known(class) => Some(class),
            Self::Unknown(_) => None,
        }
    }
}

impl From<RecordClass> for Class {
    fn from(class: RecordClass) -> Self {
        Self::Known(class)
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(class) => write!(f, "{class}"),
            Self::Unknown(value) => write!(f, "CLASS{value}"),
        }
    }
}
