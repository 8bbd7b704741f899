//! Owned, cancellable timers for use inside a `select!` loop.
//!
//! A timer is cancelled by dropping its inner tokio future, so a component
//! that owns one cannot leak it past its own teardown. While unarmed, the
//! `fired`/`tick` futures never resolve, which keeps the corresponding
//! `select!` branch dormant.

use std::future::pending;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};

/// A single delayed wake-up.
#[derive(Debug, Default)]
pub(crate) struct OneShotTimer {
    sleep: Option<Pin<Box<Sleep>>>,
}

impl OneShotTimer {
    /// Arm the timer. Returns `false` (and keeps the existing deadline) if already armed.
    pub(crate) fn arm(&mut self, delay: Duration) -> bool {
        if self.sleep.is_some() {
            return false;
        }
        self.sleep = Some(Box::pin(sleep(delay)));
        true
    }

    pub(crate) fn cancel(&mut self) {
        self.sleep = None;
    }

    pub(crate) const fn is_armed(&self) -> bool {
        self.sleep.is_some()
    }

    /// Resolves once when the deadline passes, disarming the timer.
    pub(crate) async fn fired(&mut self) {
        match self.sleep.as_mut() {
            Some(sleep) => {
                sleep.as_mut().await;
                self.sleep = None;
            }
            None => pending().await,
        }
    }
}

/// A fixed-period tick that can be started and stopped.
#[derive(Debug)]
pub(crate) struct RepeatingTimer {
    period: Duration,
    missed: MissedTickBehavior,
    interval: Option<Interval>,
}

impl RepeatingTimer {
    pub(crate) const fn new(period: Duration, missed: MissedTickBehavior) -> Self {
        Self { period, missed, interval: None }
    }

    /// (Re)start the timer; the first tick comes one full period from now.
    pub(crate) fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(self.missed);
        self.interval = Some(interval);
    }

    pub(crate) fn stop(&mut self) {
        self.interval = None;
    }

    pub(crate) const fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub(crate) const fn period(&self) -> Duration {
        self.period
    }

    pub(crate) async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_one_shot_fires_once() {
        let mut timer = OneShotTimer::default();
        assert!(timer.arm(Duration::from_millis(3000)));
        assert!(!timer.arm(Duration::from_millis(10)));

        let start = Instant::now();
        timer.fired().await;
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
        assert!(!timer.is_armed());

        assert!(timeout(Duration::from_secs(60), timer.fired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_one_shot_never_fires() {
        let mut timer = OneShotTimer::default();
        timer.arm(Duration::from_millis(100));
        timer.cancel();
        assert!(timeout(Duration::from_secs(1), timer.fired()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeating_first_tick_after_full_period() {
        let mut timer = RepeatingTimer::new(Duration::from_millis(1000), MissedTickBehavior::Burst);
        assert!(!timer.is_running());
        timer.start();

        let start = Instant::now();
        timer.tick().await;
        timer.tick().await;
        assert_eq!(start.elapsed(), Duration::from_millis(2000));

        timer.stop();
        assert!(timeout(Duration::from_secs(5), timer.tick()).await.is_err());
    }
}
