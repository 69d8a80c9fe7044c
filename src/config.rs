//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheLimits;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Freshness window in seconds
    pub cache_duration: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Maximum number of tags the cache can hold
    pub max_entries: usize,
    /// Maximum estimated cache size in MiB
    pub max_size_mb: u64,
    /// Estimated footprint of one image record in bytes
    pub image_size_estimate: u64,
    /// Number of images requested from the provider when the caller gives no limit
    pub default_image_limit: usize,
    /// Shared secret for the admin endpoints, None disables them
    pub admin_token: Option<String>,
    /// Base URL of the remote image API
    pub image_api_url: String,
    /// Private key for the remote image API
    pub image_api_key: Option<String>,
    /// Remote image API request timeout in seconds
    pub image_api_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DURATION` - Freshness window in seconds (default: 300)
    /// - `CACHE_SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `MAX_CACHE_ENTRIES` - Maximum cached tags (default: 20)
    /// - `MAX_CACHE_SIZE_MB` - Maximum estimated size in MiB (default: 50)
    /// - `IMAGE_SIZE_ESTIMATE` - Bytes accounted per image (default: 1024)
    /// - `DEFAULT_IMAGE_LIMIT` - Provider result limit (default: 400)
    /// - `CACHE_ADMIN_TOKEN` - Admin bearer token (default: unset, admin disabled)
    /// - `IMAGE_API_URL` - Remote image API base URL
    /// - `IMAGE_API_KEY` - Remote image API private key (default: unset)
    /// - `IMAGE_API_TIMEOUT` - Remote request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_duration: parse_var("CACHE_DURATION").unwrap_or(defaults.cache_duration),
            sweep_interval: parse_var("CACHE_SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            max_entries: parse_var("MAX_CACHE_ENTRIES").unwrap_or(defaults.max_entries),
            max_size_mb: parse_var("MAX_CACHE_SIZE_MB").unwrap_or(defaults.max_size_mb),
            image_size_estimate: parse_var("IMAGE_SIZE_ESTIMATE")
                .unwrap_or(defaults.image_size_estimate),
            default_image_limit: parse_var("DEFAULT_IMAGE_LIMIT")
                .unwrap_or(defaults.default_image_limit),
            admin_token: non_empty_var("CACHE_ADMIN_TOKEN"),
            image_api_url: non_empty_var("IMAGE_API_URL").unwrap_or(defaults.image_api_url),
            image_api_key: non_empty_var("IMAGE_API_KEY"),
            image_api_timeout: parse_var("IMAGE_API_TIMEOUT")
                .unwrap_or(defaults.image_api_timeout),
        }
    }

    /// Eviction and expiry bounds derived from this configuration.
    pub fn cache_limits(&self) -> CacheLimits {
        CacheLimits {
            ttl_ms: self.cache_duration.saturating_mul(1000),
            max_entries: self.max_entries,
            max_size_bytes: self.max_size_mb.saturating_mul(1024 * 1024),
            bytes_per_image: self.image_size_estimate,
        }
    }

    /// Sweep period, never shorter than one second.
    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_duration: 300,
            sweep_interval: 60,
            max_entries: 20,
            max_size_mb: 50,
            image_size_estimate: 1024,
            default_image_limit: 400,
            admin_token: None,
            image_api_url: "https://api.imagekit.io/v1".to_string(),
            image_api_key: None,
            image_api_timeout: 30,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

// An empty value counts as unset so `CACHE_ADMIN_TOKEN=` never enables admin access.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
