//! Query responses.

use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;

use vane_proto::Message;

/// Response text used when every attempt against every server failed.
pub const TIMEOUT_ERROR: &str = "Timeout Error";

/// The outcome of one query: a decoded message plus transport metadata.
///
/// `error` is `None` exactly when the received bytes parsed as a DNS
/// message. A response synthesized for a transport or format failure
/// carries the failure text and empty sections; protocol-level errors
/// (a non-NOERROR rcode) parse fine and are visible on the message
/// header instead, so callers inspect both.
#[derive(Debug, Clone)]
pub struct Response {
    message: Message,
    server: Option<SocketAddr>,
    timestamp: Instant,
    message_size: usize,
    error: Option<String>,
}

impl Response {
    /// Decodes received bytes into a response.
    ///
    /// Parse failures yield a synthesized response carrying the error
    /// text; the bytes are still accounted for in `message_size`.
    pub fn from_wire(server: SocketAddr, bytes: &[u8]) -> Self {
        match Message::parse(bytes) {
            Ok(message) => Self {
                message,
                server: Some(server),
                timestamp: Instant::now(),
                message_size: bytes.len(),
                error: None,
            },
            Err(err) => Self {
                message: Message::default(),
                server: Some(server),
                timestamp: Instant::now(),
                message_size: bytes.len(),
                error: Some(err.to_string()),
            },
        }
    }

    /// Wraps an already-decoded message (used by the AXFR aggregator).
    pub(crate) fn from_message(
        server: SocketAddr,
        message: Message,
        message_size: usize,
    ) -> Self {
        Self {
            message,
            server: Some(server),
            timestamp: Instant::now(),
            message_size,
            error: None,
        }
    }

    /// Synthesizes a failure response with empty sections.
    pub fn failed(server: Option<SocketAddr>, error: impl Into<String>) -> Self {
        Self {
            message: Message::default(),
            server,
            timestamp: Instant::now(),
            message_size: 0,
            error: Some(error.into()),
        }
    }

    /// Synthesizes the response for exhausted retries.
    pub(crate) fn timed_out(server: Option<SocketAddr>) -> Self {
        Self::failed(server, TIMEOUT_ERROR)
    }

    /// Returns the decoded message.
    #[inline]
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Returns the server that produced the response, if any did.
    #[inline]
    pub fn server(&self) -> Option<SocketAddr> {
        self.server
    }

    /// Returns when the response was captured.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the total bytes read off the wire.
    #[inline]
    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Returns the transport/format error, if the response is synthetic.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if bytes were received and parsed.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Returns true if this is a usable answer: parsed and NOERROR.
    pub fn is_no_error(&self) -> bool {
        self.is_ok() && self.message.rcode().is_no_error()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = &self.error {
            return write!(f, ";; error: {error}");
        }
        if let Some(server) = self.server {
            writeln!(f, ";; server: {server} ({} bytes)", self.message_size)?;
        }
        write!(f, "{}", self.message)
    }
}
