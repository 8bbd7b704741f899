//! Connection lifecycle and retry bookkeeping.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the single logical server connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Transport is establishing the connection
    Connecting,
    /// Handshake done, frames may flow both ways
    Open,
    /// Close requested, waiting for the transport to finish
    Closing,
    /// No usable connection
    #[default]
    Closed,
}

impl ConnectionState {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Label shown to the user.
    pub const fn label(self) -> &'static str {
        if self.is_open() {
            "Connected"
        } else {
            "Not Connected"
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Reconnection bookkeeping owned by the connection manager.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryState {
    /// Retries fired since the last successful open
    pub attempt_count: u32,
    /// Retry budget before giving up
    pub max_attempts: u32,
    /// Whether a retry timer is armed right now
    pub pending_retry_scheduled: bool,
}

impl RetryState {
    pub const fn new(max_attempts: u32) -> Self {
        Self { attempt_count: 0, max_attempts, pending_retry_scheduled: false }
    }

    /// No automatic retry will be scheduled any more.
    pub const fn is_exhausted(&self) -> bool {
        self.attempt_count >= self.max_attempts
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new(super::config::default_max_attempts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_open_is_connected() {
        assert_eq!(ConnectionState::Open.label(), "Connected");
        for state in [ConnectionState::Connecting, ConnectionState::Closing, ConnectionState::Closed] {
            assert!(!state.is_open());
            assert_eq!(state.label(), "Not Connected");
        }
    }

    #[test]
    fn test_retry_exhaustion() {
        let mut retry = RetryState::new(2);
        assert!(!retry.is_exhausted());
        retry.attempt_count = 2;
        assert!(retry.is_exhausted());
        assert_eq!(RetryState::default().max_attempts, 20);
    }
}
