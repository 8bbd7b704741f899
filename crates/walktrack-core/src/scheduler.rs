//! Sync Scheduler
//!
//! Sends the latest location sample on a fixed cadence while the connection
//! is open and a walk is active. Preconditions are rechecked on every tick;
//! a tick that cannot send is skipped, never buffered.

use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::connection::ConnectionManager;
use crate::location::LocationSource;
use crate::timer::RepeatingTimer;
use crate::transport::Transport;
use walktrack_types::WalkSession;

/// Result of one sync tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Sent,
    SkippedNotConnected,
    SkippedNoWalk,
    SkippedNoSample,
    Failed,
}

#[derive(Debug)]
pub struct SyncScheduler {
    timer: RepeatingTimer,
}

impl SyncScheduler {
    pub fn new(cadence: Duration) -> Self {
        // Skip: a late loop sends once, never a burst of stale samples.
        Self { timer: RepeatingTimer::new(cadence, MissedTickBehavior::Skip) }
    }

    pub const fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Start or stop the timer to match the preconditions.
    ///
    /// A stopped scheduler restarts with a full period, so the first send
    /// comes one cadence after the connection opens or the walk begins.
    pub fn reconcile(&mut self, connection_open: bool, walk_active: bool) {
        let should_run = connection_open && walk_active;
        if should_run && !self.timer.is_running() {
            info!("📍 [Sync] Adding location sync interval ({}ms)", self.timer.period().as_millis());
            self.timer.start();
        } else if !should_run && self.timer.is_running() {
            info!("📍 [Sync] Clearing location sync interval");
            self.timer.stop();
        }
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub async fn tick(&mut self) {
        self.timer.tick().await;
    }

    pub fn on_tick<T: Transport>(
        &mut self,
        connection: &mut ConnectionManager<T>,
        walk: &WalkSession,
        location: &dyn LocationSource,
    ) -> SyncOutcome {
        if !connection.state().is_open() {
            debug!("📍 [Sync] Skipping tick, connection is {}", connection.state());
            return SyncOutcome::SkippedNotConnected;
        }
        if !walk.is_active() {
            debug!("📍 [Sync] Skipping tick, no active walk");
            return SyncOutcome::SkippedNoWalk;
        }
        let Some(sample) = location.latest() else {
            debug!("📍 [Sync] Cannot send location, no location available");
            return SyncOutcome::SkippedNoSample;
        };

        let payload = match sample.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("📍 [Sync] Failed to serialize sample: {}", e);
                return SyncOutcome::Failed;
            }
        };
        match connection.send(payload) {
            Ok(()) => {
                debug!("📍 [Sync] Sent location captured at {}", sample.captured_at_ms());
                SyncOutcome::Sent
            }
            Err(_) => SyncOutcome::Failed,
        }
    }
}
