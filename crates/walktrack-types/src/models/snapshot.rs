//! Read-only observable state handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::connection::{ConnectionState, RetryState};
use super::location::LocationSample;
use super::message::ServerMessage;
use super::walk::WalkSession;

/// Server acknowledgement bookkeeping.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncMeta {
    /// Timestamp of the last acknowledged sample, in epoch ms
    pub last_successful_sync_at_ms: Option<i64>,
}

/// Point-in-time copy of everything the tracker exposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackerSnapshot {
    pub connection_state: ConnectionState,
    pub retry: RetryState,
    pub walk: WalkSession,
    pub sync: SyncMeta,
    pub last_received_message: Option<ServerMessage>,
    pub latest_location_sample: Option<LocationSample>,
}

impl TrackerSnapshot {
    pub fn walk_id(&self) -> Option<&str> {
        self.walk.id().map(super::walk::WalkId::as_str)
    }

    pub const fn walk_duration_seconds(&self) -> u64 {
        self.walk.elapsed_seconds()
    }

    pub const fn last_successful_sync_at_ms(&self) -> Option<i64> {
        self.sync.last_successful_sync_at_ms
    }
}
