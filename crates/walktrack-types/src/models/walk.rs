//! Walk session state machine (Idle / Active).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::WalkError;

/// Opaque walk session identifier.
///
/// Practically unique on one device, not a security token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalkId(String);

impl WalkId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WalkId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for WalkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's ongoing walk, if any.
///
/// `elapsed_seconds` is always 0 while `id` is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalkSession {
    id: Option<WalkId>,
    elapsed_seconds: u64,
}

impl WalkSession {
    pub const fn idle() -> Self {
        Self { id: None, elapsed_seconds: 0 }
    }

    pub fn id(&self) -> Option<&WalkId> {
        self.id.as_ref()
    }

    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub const fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Start a walk with a freshly generated id.
    pub fn begin(&mut self) -> Result<&WalkId, WalkError> {
        self.begin_with(WalkId::generate())
    }

    /// Start a walk with the given id. Rejected while another walk is active.
    pub fn begin_with(&mut self, id: WalkId) -> Result<&WalkId, WalkError> {
        if let Some(current) = &self.id {
            return Err(WalkError::AlreadyActive { id: current.to_string() });
        }
        self.elapsed_seconds = 0;
        Ok(&*self.id.insert(id))
    }

    /// Reset to idle, returning the id of the walk that ended (if any).
    pub fn end(&mut self) -> Option<WalkId> {
        self.elapsed_seconds = 0;
        self.id.take()
    }

    /// Count one elapsed second. No-op while idle.
    pub fn tick(&mut self) -> bool {
        if self.id.is_none() {
            return false;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        true
    }

    /// Elapsed time as `MM:SS`. Minutes keep growing past 99.
    pub fn format_duration(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_seconds / 60, self.elapsed_seconds % 60)
    }
}
