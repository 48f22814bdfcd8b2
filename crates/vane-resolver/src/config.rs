//! Resolver configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::{ResolverError, Result};

/// Transport used to reach the configured name servers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Datagrams, one question per 512-octet exchange.
    Udp,
    /// A connection per attempt, messages framed by a 2-octet length.
    Tcp,
}

impl Default for Transport {
    fn default() -> Self {
        Self::Udp
    }
}

/// Stub resolver configuration.
///
/// The aggregate worst-case wall clock of one query is
/// `retries × servers.len() × timeout`; callers needing a hard bound
/// size these three accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Name servers, tried strictly in order within each attempt.
    pub servers: Vec<SocketAddr>,

    /// Per-attempt socket timeout (seconds).
    pub timeout_secs: u64,

    /// Number of passes over the server list.
    pub retries: u32,

    /// Request recursive service from the upstream (RD flag).
    pub recursion: bool,

    /// Transport to use.
    pub transport: Transport,

    /// Consult and fill the response cache.
    pub use_cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            timeout_secs: 1,
            retries: 3,
            recursion: true,
            transport: Transport::Udp,
            use_cache: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration for the given servers, defaults otherwise.
    pub fn with_servers(servers: Vec<SocketAddr>) -> Self {
        Self {
            servers,
            ..Self::default()
        }
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the retry count, clamped to at least one pass.
    pub fn effective_retries(&self) -> u32 {
        self.retries.max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(ResolverError::InvalidConfig(
                "timeout must be at least one second".into(),
            ));
        }
        if self.retries == 0 {
            return Err(ResolverError::InvalidConfig(
                "retries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
