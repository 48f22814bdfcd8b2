//! DNSSEC record types (SIG, RRSIG, KEY, DNSKEY, DS).
//!
//! These are parsed for inspection only; no signature or digest is
//! ever verified here. SIG shares the RRSIG layout and KEY the DNSKEY
//! layout (RFC 2535 vs RFC 4034).

use crate::error::{Error, Result};
use crate::name::{Name, NameParser};
use crate::rtype::Type;
use crate::wire::WireReader;
use bytes::BytesMut;
use data_encoding::{BASE64, HEXLOWER};
use serde::{Deserialize, Serialize};
use std::fmt;

/// RRSIG record — resource record signature (RFC 4034 §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RRSIG {
    type_covered: Type,
    algorithm: u8,
    labels: u8,
    original_ttl: u32,
    expiration: u32,
    inception: u32,
    key_tag: u16,
    signer: Name,
    signature: Vec<u8>,
}

impl RRSIG {
    /// Creates an RRSIG record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        type_covered: Type,
        algorithm: u8,
        labels: u8,
        original_ttl: u32,
        expiration: u32,
        inception: u32,
        key_tag: u16,
        signer: Name,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            type_covered,
            algorithm,
            labels,
            original_ttl,
            expiration,
            inception,
            key_tag,
            signer,
            signature: signature.into(),
        }
    }

    /// Returns the covered record type.
    #[inline]
    pub const fn type_covered(&self) -> Type {
        self.type_covered
    }

    /// Returns the signing algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the label count of the signed owner name.
    #[inline]
    pub const fn labels(&self) -> u8 {
        self.labels
    }

    /// Returns the original TTL of the covered RRset.
    #[inline]
    pub const fn original_ttl(&self) -> u32 {
        self.original_ttl
    }

    /// Returns the expiration time (seconds since the epoch, mod 2^32).
    #[inline]
    pub const fn expiration(&self) -> u32 {
        self.expiration
    }

    /// Returns the inception time (seconds since the epoch, mod 2^32).
    #[inline]
    pub const fn inception(&self) -> u32 {
        self.inception
    }

    /// Returns the key tag of the signing key.
    #[inline]
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the signer name.
    #[inline]
    pub fn signer(&self) -> &Name {
        &self.signer
    }

    /// Returns the raw signature bytes.
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Parses the record; the signature is whatever RDATA remains
    /// after the signer name.
    pub fn parse(message: &[u8], offset: usize, rdlength: usize) -> Result<(Self, usize)> {
        let mut reader = WireReader::at(message, offset);
        let type_covered = Type::from_u16(reader.read_u16()?);
        let algorithm = reader.read_u8()?;
        let labels = reader.read_u8()?;
        let original_ttl = reader.read_u32()?;
        let expiration = reader.read_u32()?;
        let inception = reader.read_u32()?;
        let key_tag = reader.read_u16()?;

        let (signer, signer_len) = NameParser::new(message).parse_name(reader.position())?;

        let fixed = 18 + signer_len;
        let sig_len = rdlength.checked_sub(fixed).ok_or_else(|| {
            Error::invalid_rdata("RRSIG", "RDATA shorter than its fixed fields")
        })?;

        let mut reader = WireReader::at(message, offset + fixed);
        let signature = reader.read_bytes(sig_len)?.to_vec();

        Ok((
            Self {
                type_covered,
                algorithm,
                labels,
                original_ttl,
                expiration,
                inception,
                key_tag,
                signer,
                signature,
            },
            fixed + sig_len,
        ))
    }

    /// Returns the uncompressed wire length.
    pub fn wire_len(&self) -> usize {
        18 + self.signer.wire_len() + self.signature.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.type_covered.to_u16().to_be_bytes());
        buf.extend_from_slice(&[self.algorithm, self.labels]);
        buf.extend_from_slice(&self.original_ttl.to_be_bytes());
        buf.extend_from_slice(&self.expiration.to_be_bytes());
        buf.extend_from_slice(&self.inception.to_be_bytes());
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        self.signer.write_wire(buf);
        buf.extend_from_slice(&self.signature);
    }
}

impl fmt::Display for RRSIG {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {} {} {}",
            self.type_covered,
            self.algorithm,
            self.labels,
            self.original_ttl,
            self.expiration,
            self.inception,
            self.key_tag,
            self.signer,
            BASE64.encode(&self.signature)
        )
    }
}

/// DNSKEY record — zone public key (RFC 4034 §2).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DNSKEY {
    flags: u16,
    protocol: u8,
    algorithm: u8,
    public_key: Vec<u8>,
}

impl DNSKEY {
    /// Creates a DNSKEY record.
    pub fn new(flags: u16, protocol: u8, algorithm: u8, public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            flags,
            protocol,
            algorithm,
            public_key: public_key.into(),
        }
    }

    /// Returns the flags word.
    #[inline]
    pub const fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns the protocol octet (always 3 for DNSSEC).
    #[inline]
    pub const fn protocol(&self) -> u8 {
        self.protocol
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the raw public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns true if the zone-key bit is set.
    #[inline]
    pub const fn is_zone_key(&self) -> bool {
        self.flags & 0x0100 != 0
    }

    /// Returns true if the secure-entry-point bit is set.
    #[inline]
    pub const fn is_secure_entry_point(&self) -> bool {
        self.flags & 0x0001 != 0
    }

    /// Parses from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 4 {
            return Err(Error::invalid_rdata(
                "DNSKEY",
                format!("{} octets, want at least 4", rdata.len()),
            ));
        }
        Ok(Self {
            flags: u16::from_be_bytes([rdata[0], rdata[1]]),
            protocol: rdata[2],
            algorithm: rdata[3],
            public_key: rdata[4..].to_vec(),
        })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        4 + self.public_key.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.flags.to_be_bytes());
        buf.extend_from_slice(&[self.protocol, self.algorithm]);
        buf.extend_from_slice(&self.public_key);
    }
}

impl fmt::Display for DNSKEY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.flags,
            self.protocol,
            self.algorithm,
            BASE64.encode(&self.public_key)
        )
    }
}

/// DS record — delegation signer (RFC 4034 §5).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DS {
    key_tag: u16,
    algorithm: u8,
    digest_type: u8,
    digest: Vec<u8>,
}

impl DS {
    /// Creates a DS record.
    pub fn new(key_tag: u16, algorithm: u8, digest_type: u8, digest: impl Into<Vec<u8>>) -> Self {
        Self {
            key_tag,
            algorithm,
            digest_type,
            digest: digest.into(),
        }
    }

    /// Returns the referenced key tag.
    #[inline]
    pub const fn key_tag(&self) -> u16 {
        self.key_tag
    }

    /// Returns the algorithm number.
    #[inline]
    pub const fn algorithm(&self) -> u8 {
        self.algorithm
    }

    /// Returns the digest type number.
    #[inline]
    pub const fn digest_type(&self) -> u8 {
        self.digest_type
    }

    /// Returns the raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Parses from the RDATA slice.
    pub fn parse(rdata: &[u8]) -> Result<Self> {
        if rdata.len() < 4 {
            return Err(Error::invalid_rdata(
                "DS",
                format!("{} octets, want at least 4", rdata.len()),
            ));
        }
        Ok(Self {
            key_tag: u16::from_be_bytes([rdata[0], rdata[1]]),
            algorithm: rdata[2],
            digest_type: rdata[3],
            digest: rdata[4..].to_vec(),
        })
    }

    /// Returns the wire-format length.
    pub fn wire_len(&self) -> usize {
        4 + self.digest.len()
    }

    /// Appends the wire form to a buffer.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(&self.key_tag.to_be_bytes());
        buf.extend_from_slice(&[self.algorithm, self.digest_type]);
        buf.extend_from_slice(&self.digest);
    }
}

impl fmt::Display for DS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key_tag,
            self.algorithm,
            self.digest_type,
            HEXLOWER.encode(&self.digest)
        )
    }
}
