//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Vec<u8>,
    pub(crate) token_ttl: Duration,
    pub(crate) data_dir: Option<PathBuf>,
    pub(crate) open_reads: bool,
}

impl ServerConfig {
    /// Construct a configuration with the default token lifetime, no
    /// data directory (in-memory store), and authenticated reads.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Vec<u8>) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl: auth::DEFAULT_TTL,
            data_dir: None,
            open_reads: false,
        }
    }

    /// Override the access token lifetime.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Persist records in a sled database under this directory.
    ///
    /// Without a data directory the server keeps records in memory and
    /// loses them on restart.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Allow unauthenticated access to read endpoints.
    #[must_use]
    pub fn with_open_reads(mut self, open_reads: bool) -> Self {
        self.open_reads = open_reads;
        self
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
