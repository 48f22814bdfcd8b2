//! LOC record — geographic location (RFC 1876).

use crate::error::{Error, Result};
use crate::wire::WireReader;
use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Midpoint of the unsigned coordinate range: the equator for latitude,
/// the prime meridian for longitude.
const COORD_MIDPOINT: u32 = 1 << 31;

/// LOC record — spherical coordinates and precision of a host.
///
/// Latitude and longitude are thousandths of an arcsecond offset from
/// the unsigned midpoint; altitude is centimeters above a base 100 km
/// below the WGS 84 spheroid; the size and precision fields pack a
/// single mantissa digit and a decimal exponent into one octet each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LOC {
    version: u8,
    size: u8,
    horiz_pre: u8,
    vert_pre: u8,
    latitude: u32,
    longitude: u32,
    altitude: u32,
}

impl LOC {
    /// Creates a LOC record from raw field values.
    pub fn new(
        size: u8,
        horiz_pre: u8,
        vert_pre: u8,
        latitude: u32,
        longitude: u32,
        altitude: u32,
    ) -> Self {
        Self {
            version: 0,
            size,
            horiz_pre,
            vert_pre,
            latitude,
            longitude,
            altitude,
        }
    }

    /// Returns the encoded sphere size octet.
    #[inline]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Returns the encoded horizontal precision octet.
    #[inline]
    pub const fn horiz_pre(&self) -> u8 {
        self.horiz_pre
    }

    /// Returns the encoded vertical precision octet.
    #[inline]
    pub const fn vert_pre(&self) -> u8 {
        self.vert_pre
    }

    /// Returns the raw latitude value.
    #[inline]
    pub const fn latitude(&self) -> u32 {
        self.latitude
    }

    /// Returns the raw longitude value.
    #[inline]
    pub const fn longitude(&self) -> u32 {
        self.longitude
    }

    /// Returns the raw altitude value.
    #[inline]
    pub const fn altitude(&self) -> u32 {
        self.altitude
    }

    /// Returns the altitude in meters relative to the WGS 84 spheroid.
    pub fn altitude_meters(&self) -> f64 {
        f64::from(self.altitude) / 100.0 - 100_000.0
    }

    /// Parses from exactly sixteen octets of RDATA.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        if rdata.len() != 16 {
            return Err(Error::invalid_rdata(
                "LOC",
                format!("{} octets, want 16", rdata.len()),
            ));
        }

        let mut reader = WireReader::new(rdata);
        let version = reader.read_u8()?;
        if version != 0 {
            return Err(Error::invalid_rdata(
                "LOC",
                format!("unsupported version {version}"),
            ));
        }

        Ok(Self {
            version,
            size: reader.read_u8()?,
            horiz_pre: reader.read_u8()?,
            vert_pre: reader.read_u8()?,
            latitude: reader.read_u32()?,
            longitude: reader.read_u32()?,
            altitude: reader.read_u32()?,
        })
    }

    /// Returns the wire-format length.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        16
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&[self.version, self.size, self.horiz_pre, self.vert_pre]);
        buf.extend_from_slice(&self.latitude.to_be_bytes());
        buf.extend_from_slice(&self.longitude.to_be_bytes());
        buf.extend_from_slice(&self.altitude.to_be_bytes());
    }
}

/// Renders a size/precision octet in meters.
///
/// The octet packs mantissa and decimal exponent as base×10^exp
/// centimeters; exponents above two shed the centimeter scaling.
fn precision_meters(value: u8) -> u64 {
    let mantissa = u64::from(value >> 4);
    let mut exponent = u32::from(value & 0x0F);
    if exponent > 2 {
        exponent -= 2;
    }
    mantissa * 10u64.pow(exponent)
}

/// Renders a coordinate as degrees, minutes and decimal seconds with a
/// hemisphere suffix.
fn fmt_coordinate(
    f: &mut fmt::Formatter<'_>,
    raw: u32,
    positive: char,
    negative: char,
) -> fmt::Result {
    let (hemisphere, offset) = if raw >= COORD_MIDPOINT {
        (positive, raw - COORD_MIDPOINT)
    } else {
        (negative, COORD_MIDPOINT - raw)
    };

    let millis = offset % 1000;
    let total_seconds = offset / 1000;
    let seconds = total_seconds % 60;
    let minutes = total_seconds / 60 % 60;
    let degrees = total_seconds / 3600;

    write!(
        f,
        "{degrees} {minutes} {seconds}.{millis:03} {hemisphere}"
    )
}

impl fmt::Display for LOC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_coordinate(f, self.latitude, 'N', 'S')?;
        write!(f, " ")?;
        fmt_coordinate(f, self.longitude, 'E', 'W')?;
        write!(
            f,
            " {:.2}m {}m {}m {}m",
            self.altitude_meters(),
            precision_meters(self.size),
            precision_meters(self.horiz_pre),
            precision_meters(self.vert_pre),
        )
    }
}
