//! # WalkTrack Core
//!
//! Client-side engine of the WalkTrack location protocol: keeps one
//! connection to the collection server alive, tracks the user's walk, streams
//! location samples while walking and reconciles server acknowledgements.
//!
//! ## Architecture
//!
//! ```text
//! walktrack-core/src/
//! ├── transport/     # Transport trait, WebSocket + mock implementations
//! ├── connection/    # Connection manager and retry policy
//! ├── scheduler.rs   # Periodic location sync
//! ├── walk.rs        # Walk session + duration ticker
//! ├── dispatcher.rs  # Inbound frame classification
//! ├── location.rs    # Location feed (and a simulated walker)
//! ├── tracker/       # Single coordinating task + handle
//! └── config.rs      # Config file loading
//! ```
//!
//! Everything mutable lives inside the tracker task; the presentation layer
//! talks to it through [`TrackerHandle`] and observes [`TrackerSnapshot`]s.

#![cfg_attr(test, allow(clippy::panic, clippy::float_cmp, clippy::unwrap_used))]

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod location;
pub mod scheduler;
mod timer;
pub mod tracker;
pub mod transport;
pub mod walk;

// Re-export commonly used types
pub use error::{TrackerError, TrackerResult};
pub use location::{location_channel, LocationFeed, LocationPublisher, LocationSource};
pub use tracker::{Tracker, TrackerHandle};
pub use transport::{MockTransport, Transport, WebSocketTransport};
pub use walktrack_types::{TrackerConfig, TrackerSnapshot};
