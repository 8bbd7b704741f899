//! Client configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Reconnection policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct RetryConfig {
    /// Retries allowed before the connection stays closed
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between a transport error and the retry, in ms
    #[validate(range(min = 1_u64, max = 600_000_u64))]
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: default_max_attempts(), delay_ms: default_retry_delay_ms() }
    }
}

/// Full tracker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct TrackerConfig {
    /// Location collection server, `ws://` or `wss://`
    #[validate(custom(function = "validate_server_url"))]
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Cadence of the location sync scheduler
    #[validate(range(min = 100_u64, max = 3_600_000_u64))]
    #[serde(default = "default_location_sync_interval_ms")]
    pub location_sync_interval_ms: u64,
    /// Walk duration tick. Fixed at one second outside tests.
    #[validate(range(min = 1_u64))]
    #[serde(skip, default = "default_walk_tick_ms")]
    pub walk_tick_ms: u64,
    /// Cadence of the simulated location source
    #[validate(range(min = 100_u64))]
    #[serde(default = "default_location_update_interval_ms")]
    pub location_update_interval_ms: u64,
    /// Reconnection policy
    #[validate(nested)]
    #[serde(default)]
    pub retry: RetryConfig,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            server_url: default_server_url(),
            location_sync_interval_ms: default_location_sync_interval_ms(),
            walk_tick_ms: default_walk_tick_ms(),
            location_update_interval_ms: default_location_update_interval_ms(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_server_url(value: &str) -> Result<(), ValidationError> {
    let url = url::Url::parse(value).map_err(|_| ValidationError::new("invalid_url"))?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        _ => Err(ValidationError::new("unsupported_scheme")),
    }
}

pub fn default_server_url() -> String {
    "ws://10.0.2.2:8080".to_string()
}

pub const fn default_location_sync_interval_ms() -> u64 {
    5_000
}

pub const fn default_walk_tick_ms() -> u64 {
    1_000
}

pub const fn default_location_update_interval_ms() -> u64 {
    4_000
}

pub const fn default_max_attempts() -> u32 {
    20
}

pub const fn default_retry_delay_ms() -> u64 {
    3_000
}
