//! Unified error type for the WalkTrack engine.

use thiserror::Error;
use walktrack_types::TransportError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackerError {
    /// Connection-level failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The tracker task has stopped and no longer accepts commands.
    #[error("Tracker has shut down")]
    ShutDown,
}

/// Result type alias for tracker operations.
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
