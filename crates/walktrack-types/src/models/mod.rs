//! Core domain models for WalkTrack.
//!
//! This module contains the data structures shared between the engine and
//! whatever renders its state.

mod config;
mod connection;
mod location;
mod message;
mod snapshot;
mod walk;

// Re-export all models
pub use config::{RetryConfig, TrackerConfig};
pub use connection::{ConnectionState, RetryState};
pub use location::{Coordinates, LocationSample};
pub use message::{MessageKind, ServerMessage, ACK_STATUS};
pub use snapshot::{SyncMeta, TrackerSnapshot};
pub use walk::{WalkId, WalkSession};
