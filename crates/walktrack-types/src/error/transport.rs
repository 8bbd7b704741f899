//! Transport-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the bidirectional message transport.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum TransportError {
    /// Connection could not be established
    #[error("Failed to connect to {address}: {message}")]
    ConnectFailed { address: String, message: String },

    /// Frame could not be written to the connection
    #[error("Send failed: {message}")]
    SendFailed { message: String },

    /// No open connection to send on
    #[error("Not connected")]
    NotConnected,
}
