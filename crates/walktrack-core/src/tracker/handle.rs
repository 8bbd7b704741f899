//! Cloneable front door to a running tracker.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use super::Command;
use crate::error::{TrackerError, TrackerResult};
use crate::location::LocationSource;
use walktrack_types::{TrackerSnapshot, WalkId};

/// Commands go to the tracker task; state comes back as snapshots.
#[derive(Clone)]
pub struct TrackerHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<TrackerSnapshot>,
    location: Arc<dyn LocationSource>,
}

impl TrackerHandle {
    pub(super) fn new(
        commands: mpsc::Sender<Command>,
        snapshot: watch::Receiver<TrackerSnapshot>,
        location: Arc<dyn LocationSource>,
    ) -> Self {
        Self { commands, snapshot, location }
    }

    /// Begin a walk. If one is already active it is left untouched and its id returned.
    pub async fn begin_walk(&self) -> TrackerResult<WalkId> {
        self.request(Command::BeginWalk).await
    }

    /// End the current walk, returning its id. Succeeds when idle too.
    pub async fn end_walk(&self) -> TrackerResult<Option<WalkId>> {
        self.request(Command::EndWalk).await
    }

    /// Send a free-form text frame on the open connection.
    pub async fn send_raw(&self, text: impl Into<String>) -> TrackerResult<()> {
        let text = text.into();
        self.request(|reply| Command::SendRaw { text, reply }).await?.map_err(TrackerError::from)
    }

    /// Re-trigger the connection after retries ran out. Returns whether a connection was opened.
    pub async fn reconnect(&self) -> TrackerResult<bool> {
        self.request(Command::Reconnect).await
    }

    /// Tear the tracker down and wait until every timer is cancelled.
    pub async fn shutdown(&self) -> TrackerResult<()> {
        self.request(Command::Shutdown).await
    }

    /// Current state, with the freshest location sample.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let mut snapshot = self.snapshot.borrow().clone();
        snapshot.latest_location_sample = self.location.latest();
        snapshot
    }

    /// Receiver that wakes on every published state change.
    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshot.clone()
    }

    async fn request<R>(&self, command: impl FnOnce(oneshot::Sender<R>) -> Command) -> TrackerResult<R> {
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| TrackerError::ShutDown)?;
        response.await.map_err(|_| TrackerError::ShutDown)
    }
}
