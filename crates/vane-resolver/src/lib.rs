//! # vane-resolver
//!
//! A synchronous DNS stub resolver over [`vane-proto`](vane_proto):
//! UDP and TCP transports with per-attempt timeouts, retry and
//! failover across a configured server list, AXFR zone-transfer
//! streaming, and a TTL-aware response cache. Recursion is delegated
//! to the upstream servers; nothing here validates DNSSEC.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vane_resolver::{Resolver, ResolverConfig};
//! use vane_proto::RecordType;
//!
//! let config = ResolverConfig::with_servers(vec!["192.0.2.53:53".parse().unwrap()]);
//! let resolver = Resolver::new(config);
//!
//! let response = resolver.query("example.com", RecordType::A);
//! for addr in response.message().a_records() {
//!     println!("{addr}");
//! }
//! ```
//!
//! All failures come back as a [`Response`]: transport and format
//! problems set [`Response::error`], protocol problems show as a
//! non-NOERROR rcode on the message.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod config;
pub mod response;

mod transport;

pub use cache::{CacheKey, ResponseCache};
pub use config::{ResolverConfig, Transport};
pub use response::{Response, TIMEOUT_ERROR};

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use vane_proto::{Message, Name, Question, RecordClass, RecordType, DNS_PORT};

use transport::Exchanger;

/// Resolver errors.
///
/// These stay internal to the per-server attempt machinery and the
/// fallible configuration helpers; [`Resolver::query`] itself never
/// returns one, reporting failures through the [`Response`] instead.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// A socket operation failed or timed out.
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),

    /// A reply carried a transaction id we did not send.
    #[error("transaction id mismatch: sent {sent:#06x}, got {got:#06x}")]
    IdMismatch {
        /// Id of the outstanding request.
        sent: u16,
        /// Id found in the reply.
        got: u16,
    },

    /// The peer framed a zero-length TCP message.
    #[error("zero-length TCP frame")]
    EmptyFrame,

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A name server given as a hostname did not resolve.
    #[error("cannot resolve name server {0:?}")]
    ServerResolution(String),

    /// A query name was not a valid domain name.
    #[error("invalid query name: {0}")]
    BadName(#[from] vane_proto::Error),
}

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Observer receiving human-readable transport failure events.
pub type VerboseObserver = Arc<dyn Fn(&str) + Send + Sync>;

/// Monotonic transaction-id source, seeded randomly.
#[derive(Debug)]
pub(crate) struct IdSequence(AtomicU16);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicU16::new(rand::random()))
    }

    /// Returns the next id; wraps mod 2^16.
    pub(crate) fn next(&self) -> u16 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// A synchronous stub resolver.
///
/// Shared-state footprint is one mutex (the cache) and one atomic (the
/// id sequence), so a single instance may be queried from several
/// threads; no lock is held while sockets are in flight.
pub struct Resolver {
    config: ResolverConfig,
    cache: ResponseCache,
    ids: IdSequence,
    observer: Option<VerboseObserver>,
}

impl Resolver {
    /// Creates a resolver with the given configuration.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: ResponseCache::new(),
            ids: IdSequence::new(),
            observer: None,
        }
    }

    /// Creates a resolver for the given servers, defaults otherwise.
    pub fn with_servers(servers: Vec<SocketAddr>) -> Self {
        Self::new(ResolverConfig::with_servers(servers))
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut ResolverConfig {
        &mut self.config
    }

    /// Registers an observer for transport failure events.
    ///
    /// The observer runs only on failure paths; it never sees the
    /// traffic of successful exchanges.
    pub fn set_observer(&mut self, observer: VerboseObserver) {
        self.observer = Some(observer);
    }

    /// Enables or disables the cache. Disabling clears it.
    pub fn set_use_cache(&mut self, use_cache: bool) {
        self.config.use_cache = use_cache;
        if !use_cache {
            self.cache.clear();
        }
    }

    /// Returns the response cache.
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Replaces the server list with a single server, resolving
    /// `server` through the currently configured servers when it is a
    /// hostname rather than an address.
    ///
    /// The first A answer wins and becomes the sole server.
    pub fn set_server(&mut self, server: &str, port: u16) -> Result<SocketAddr> {
        let address = match IpAddr::from_str(server) {
            Ok(ip) => SocketAddr::new(ip, port),
            Err(_) => {
                let response = self.query(server, RecordType::A);
                let addr = response
                    .message()
                    .a_records()
                    .next()
                    .ok_or_else(|| ResolverError::ServerResolution(server.to_string()))?;
                SocketAddr::new(IpAddr::V4(addr), port)
            }
        };

        debug!(%address, "name server set");
        self.config.servers = vec![address];
        Ok(address)
    }

    /// Replaces the server list with a single server on port 53.
    pub fn set_server_default_port(&mut self, server: &str) -> Result<SocketAddr> {
        self.set_server(server, DNS_PORT)
    }

    /// Queries for `name` in the IN class.
    pub fn query(&self, name: &str, rtype: RecordType) -> Response {
        self.query_class(name, rtype, RecordClass::IN)
    }

    /// Queries for `name` with an explicit class.
    ///
    /// Never fails outward: bad names, transport exhaustion and
    /// malformed replies all come back as a [`Response`] with its
    /// error field set.
    pub fn query_class(&self, name: &str, rtype: RecordType, rclass: RecordClass) -> Response {
        let qname = match Name::from_str(name) {
            Ok(qname) => qname,
            Err(err) => return Response::failed(None, err.to_string()),
        };

        let question = Question::new(qname, rtype, rclass);
        let key = CacheKey::from_question(&question);

        if self.config.use_cache {
            if let Some(hit) = self.cache.lookup(&key) {
                debug!(%question, "cache hit");
                return hit;
            }
        }

        let mut request = Message::query(self.ids.next(), self.config.recursion, question);
        let exchanger = Exchanger {
            config: &self.config,
            ids: &self.ids,
            observer: self.observer.as_ref(),
        };
        let response = exchanger.exchange(&mut request);

        if self.config.use_cache {
            self.cache.insert(key, &response);
        }

        response
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_sequence_is_strictly_increasing_mod_2_16() {
        let ids = IdSequence(AtomicU16::new(0xFFFE));
        let a = ids.next();
        let b = ids.next();
        let c = ids.next();

        assert_eq!(a, 0xFFFE);
        assert_eq!(b, 0xFFFF);
        assert_eq!(c, 0x0000);
        assert_eq!(b.wrapping_sub(a), 1);
        assert_eq!(c.wrapping_sub(b), 1);
    }

    #[test]
    fn invalid_name_becomes_error_response() {
        let resolver = Resolver::with_servers(vec!["192.0.2.1:53".parse().unwrap()]);
        let response = resolver.query("not a name", RecordType::A);

        assert!(response.error().is_some());
        assert!(response.message().answers().is_empty());
    }

    #[test]
    fn empty_server_list_is_a_config_error_response() {
        let resolver = Resolver::default();
        let response = resolver.query("example.com", RecordType::A);

        assert!(response.error().is_some());
        assert!(response.server().is_none());
    }

    #[test]
    fn disabling_cache_clears_it() {
        let mut resolver = Resolver::default();
        // Populate through the public path is racy without a server;
        // drive the cache directly instead.
        let question = Question::internet(
            Name::from_str("example.com").unwrap(),
            RecordType::A,
        );
        let key = CacheKey::from_question(&question);

        let mut message = Message::query(1, true, question);
        message.set_response(vane_proto::ResponseCode::NoError);
        message.add_answer(vane_proto::ResourceRecord::a(
            Name::from_str("example.com").unwrap(),
            60,
            std::net::Ipv4Addr::new(192, 0, 2, 1),
        ));
        let response = Response::from_wire(
            "192.0.2.53:53".parse().unwrap(),
            &message.to_wire(),
        );

        resolver.cache().insert(key, &response);
        assert_eq!(resolver.cache().len(), 1);

        resolver.set_use_cache(false);
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn set_server_accepts_literal_addresses() {
        let mut resolver = Resolver::default();
        let addr = resolver.set_server("192.0.2.7", 53).unwrap();
        assert_eq!(addr, "192.0.2.7:53".parse().unwrap());
        assert_eq!(resolver.config().servers, vec![addr]);

        let addr6 = resolver.set_server("2001:db8::1", 5353).unwrap();
        assert_eq!(resolver.config().servers, vec![addr6]);
    }
}
