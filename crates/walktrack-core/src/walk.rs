//! Walk session plus its one-second duration ticker.
//!
//! The ticker runs exactly while a walk is active: `begin` starts it, `end`
//! drops it. A tick that races with `end` is absorbed by the idle session.

use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::timer::RepeatingTimer;
use walktrack_types::{WalkError, WalkId, WalkSession};

#[derive(Debug)]
pub struct WalkTracker {
    session: WalkSession,
    ticker: RepeatingTimer,
}

impl WalkTracker {
    pub fn new(tick: Duration) -> Self {
        // Burst so a delayed loop still credits every elapsed second.
        Self { session: WalkSession::idle(), ticker: RepeatingTimer::new(tick, MissedTickBehavior::Burst) }
    }

    pub const fn session(&self) -> &WalkSession {
        &self.session
    }

    pub const fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub const fn ticker_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn begin(&mut self) -> Result<WalkId, WalkError> {
        let id = self.session.begin()?.clone();
        self.ticker.start();
        info!("🚶 [Walk] Beginning walk with id {}", id);
        Ok(id)
    }

    /// End the current walk, if any. Always leaves the session idle.
    pub fn end(&mut self) -> Option<WalkId> {
        self.ticker.stop();
        let ended = self.session.end();
        match &ended {
            Some(id) => info!("🚶 [Walk] Ending walk with id {}", id),
            None => info!("🚶 [Walk] No walk to end"),
        }
        ended
    }

    pub async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    pub fn on_tick(&mut self) {
        if !self.session.tick() {
            self.ticker.stop();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_ticker_counts_seconds_while_active() {
        let mut walk = WalkTracker::new(Duration::from_secs(1));
        walk.begin().unwrap();
        assert!(walk.ticker_running());

        for _ in 0..3 {
            walk.tick().await;
            walk.on_tick();
        }
        assert_eq!(walk.session().elapsed_seconds(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_stops_ticker() {
        let mut walk = WalkTracker::new(Duration::from_secs(1));
        walk.begin().unwrap();
        walk.tick().await;
        walk.on_tick();

        walk.end();
        assert!(!walk.ticker_running());
        assert_eq!(walk.session().elapsed_seconds(), 0);

        advance(Duration::from_secs(5)).await;
        assert!(timeout(Duration::from_secs(5), walk.tick()).await.is_err());

        // A late tick against the idle session is a no-op.
        walk.on_tick();
        assert_eq!(walk.session().elapsed_seconds(), 0);
    }

    #[tokio::test]
    async fn test_second_begin_rejected() {
        let mut walk = WalkTracker::new(Duration::from_secs(1));
        let first = walk.begin().unwrap();
        assert!(walk.begin().is_err());
        assert_eq!(walk.session().id(), Some(&first));
    }
}
