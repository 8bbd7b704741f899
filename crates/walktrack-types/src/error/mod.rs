//! Typed error definitions for WalkTrack.
//!
//! Every error in this hierarchy is recoverable by the client. The worst
//! outcome is a connection that stops retrying and has to be re-initiated.

mod config;
mod transport;

pub use config::ConfigError;
pub use transport::TransportError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A server frame that could not be understood.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ParseError {
    /// Frame is not valid JSON or does not match the message schema
    #[error("Invalid server frame: {message}")]
    InvalidJson { message: String },

    /// Acknowledgement without the timestamp it acknowledges
    #[error("Acknowledgement is missing its timestamp")]
    MissingTimestamp,
}

impl ParseError {
    /// Create a parse error from a serde_json error.
    pub fn from_json_error(e: &serde_json::Error) -> Self {
        Self::InvalidJson { message: e.to_string() }
    }
}

/// Rejected walk commands.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum WalkError {
    /// A walk is already in progress
    #[error("Walk {id} is already active")]
    AlreadyActive { id: String },
}
