//! # vane-proto
//!
//! DNS wire-format codec for the vane stub resolver: message framing,
//! header and question serialization, domain names with compression
//! pointer handling, and per-type RDATA decoding (RFC 1035 plus the
//! common record-type extensions).
//!
//! ## Example
//!
//! ```rust
//! use std::str::FromStr;
//! use vane_proto::{Message, Name, Question, RecordClass, RecordType};
//!
//! let question = Question::new(
//!     Name::from_str("example.com.").unwrap(),
//!     RecordType::A,
//!     RecordClass::IN,
//! );
//! let query = Message::query(0x1234, true, question);
//! let wire = query.to_wire();
//!
//! let parsed = Message::parse(&wire).unwrap();
//! assert_eq!(parsed.id(), 0x1234);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class;
pub mod error;
pub mod header;
pub mod message;
pub mod name;
pub mod opcode;
pub mod question;
pub mod rcode;
pub mod rdata;
pub mod record;
pub mod rtype;
pub mod wire;

pub use class::{Class, RecordClass};
pub use error::{Error, Result};
pub use header::{Header, HeaderFlags};
pub use message::Message;
pub use name::{Name, NameParser};
pub use opcode::OpCode;
pub use question::Question;
pub use rcode::ResponseCode;
pub use rdata::RData;
pub use record::ResourceRecord;
pub use rtype::{RecordType, Type};

/// Maximum length of a single label (RFC 1035 §2.3.4).
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum wire-format length of a domain name, including length
/// octets and the root label (RFC 1035 §2.3.4).
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum size of a UDP DNS message without EDNS0 (RFC 1035 §4.2.1).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

/// Standard DNS port.
pub const DNS_PORT: u16 = 53;
