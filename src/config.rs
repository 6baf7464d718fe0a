//! Configuration for pulsekv
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;

use crate::error::{PulseError, Result};

/// Main configuration for a pulsekv server instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Sharding Configuration
    // -------------------------------------------------------------------------
    /// Number of storage buckets the keyspace is partitioned over.
    /// Must be >= 1. Changing it requires a full re-shard of existing data.
    pub bucket_count: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Connection read timeout in milliseconds (0 = no timeout)
    pub read_timeout_ms: u64,

    /// Connection write timeout in milliseconds (0 = no timeout)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_count: 16,
            listen_addr: "127.0.0.1:7878".to_string(),
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validate the configuration.
    ///
    /// Rejects a zero bucket count and an unparseable listen address.
    /// Called at startup; a failure here is process-fatal, never per-request.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(PulseError::Config(
                "bucket count must be positive".to_string(),
            ));
        }

        if self.listen_addr.parse::<SocketAddr>().is_err() {
            return Err(PulseError::Config(format!(
                "invalid listen address: {}",
                self.listen_addr
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the number of storage buckets
    pub fn bucket_count(mut self, count: usize) -> Self {
        self.config.bucket_count = count;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds, 0 disables)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 disables)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
