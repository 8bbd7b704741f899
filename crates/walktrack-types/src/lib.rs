//! # WalkTrack Types
//!
//! Core types, models, and error definitions for the WalkTrack client.
//!
//! This crate provides the foundational type system for the WalkTrack workspace:
//!
//! - **`error`** - Typed errors for the transport, inbound frames, walks and configuration
//! - **`models`** - Domain models (connection state, walk session, location, server messages)
//!
//! ## Architecture Role
//!
//! `walktrack-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        walktrack-types (this crate)
//!                │
//!                ▼
//!         walktrack-core
//!                │
//!                ▼
//!        walktrack-client
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for the wire and for config files
//! - **Clone** for cheap snapshotting across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, ParseError, TransportError, WalkError};

// Re-export core model types
pub use models::{
    ConnectionState, Coordinates, LocationSample, MessageKind, RetryConfig, RetryState,
    ServerMessage, SyncMeta, TrackerConfig, TrackerSnapshot, WalkId, WalkSession,
};
