//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::store::{StoreConfig, DEFAULT_QUEUE_CAPACITY};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of live entries, 0 = unbounded
    pub depth: usize,
    /// Lets the admin principal update/delete entries it does not own
    pub admin_override: bool,
    /// Restricts reads to the entry owner (and admin)
    pub owner_only_reads: bool,
    /// Bound of the store's request queue
    pub queue_capacity: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORE_DEPTH` - LRU depth, 0 for unbounded (default: 0)
    /// - `ADMIN_OVERRIDE` - Enable admin override (default: false)
    /// - `OWNER_ONLY_READS` - Only owners may read their keys (default: false)
    /// - `QUEUE_CAPACITY` - Request queue bound (default: 1024)
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            depth: parse_var("STORE_DEPTH").unwrap_or(defaults.depth),
            admin_override: parse_flag("ADMIN_OVERRIDE").unwrap_or(defaults.admin_override),
            owner_only_reads: parse_flag("OWNER_ONLY_READS").unwrap_or(defaults.owner_only_reads),
            queue_capacity: parse_var::<usize>("QUEUE_CAPACITY")
                .filter(|&capacity| capacity > 0)
                .unwrap_or(defaults.queue_capacity),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Store configuration derived from this server configuration.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            depth: self.depth,
            admin_override: self.admin_override,
            owner_only_reads: self.owner_only_reads,
            queue_capacity: self.queue_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: 0,
            admin_override: false,
            owner_only_reads: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            server_port: 8000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_bool(&v))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
