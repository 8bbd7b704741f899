//! Location feed consumed by the sync scheduler.
//!
//! The engine never samples positions itself; it reads whatever the device
//! location provider published last.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use walktrack_types::LocationSample;

/// Source of the most recent known position.
pub trait LocationSource: Send + Sync {
    fn latest(&self) -> Option<LocationSample>;
}

/// Reading half of a location channel.
#[derive(Debug, Clone)]
pub struct LocationFeed {
    rx: watch::Receiver<Option<LocationSample>>,
}

impl LocationSource for LocationFeed {
    fn latest(&self) -> Option<LocationSample> {
        *self.rx.borrow()
    }
}

/// Writing half of a location channel, held by the location provider.
#[derive(Debug)]
pub struct LocationPublisher {
    tx: watch::Sender<Option<LocationSample>>,
}

impl LocationPublisher {
    pub fn publish(&self, sample: LocationSample) {
        debug!("🛰️ [Location] Updated: {}", sample.captured_at_ms());
        self.tx.send_replace(Some(sample));
    }

    /// Forget the current fix, e.g. when the provider loses permission.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

pub fn location_channel() -> (LocationPublisher, LocationFeed) {
    let (tx, rx) = watch::channel(None);
    (LocationPublisher { tx }, LocationFeed { rx })
}

/// Largest per-update step of the simulated walker, in degrees (~10 m).
const SIMULATED_STEP_DEG: f64 = 0.0001;

/// Publish a jittered walk around `origin` every `interval`.
///
/// Stops once every feed has been dropped.
pub fn simulate(
    publisher: Arc<LocationPublisher>,
    origin: (f64, f64),
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("🛰️ [Location] Simulating positions from ({:.5}, {:.5})", origin.0, origin.1);
        let (mut latitude, mut longitude) = origin;
        let mut ticker = tokio::time::interval(interval);

        loop {
            ticker.tick().await;
            if publisher.tx.is_closed() {
                debug!("🛰️ [Location] Watch cleared");
                break;
            }
            let (d_lat, d_lon) = {
                let mut rng = rand::thread_rng();
                (
                    rng.gen_range(-SIMULATED_STEP_DEG..=SIMULATED_STEP_DEG),
                    rng.gen_range(-SIMULATED_STEP_DEG..=SIMULATED_STEP_DEG),
                )
            };
            latitude = (latitude + d_lat).clamp(-90.0, 90.0);
            longitude = (longitude + d_lon).clamp(-180.0, 180.0);

            let mut sample = LocationSample::new(latitude, longitude, chrono::Utc::now().timestamp_millis());
            sample.coords.accuracy = Some(5.0);
            publisher.publish(sample);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_sees_latest_sample() {
        let (publisher, feed) = location_channel();
        assert!(feed.latest().is_none());

        publisher.publish(LocationSample::new(1.0, 2.0, 10));
        publisher.publish(LocationSample::new(3.0, 4.0, 20));
        assert_eq!(feed.latest().map(|s| s.timestamp), Some(20));

        publisher.clear();
        assert!(feed.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulation_publishes_near_origin() {
        let (publisher, feed) = location_channel();
        let handle = simulate(Arc::new(publisher), (51.5, -0.12), Duration::from_millis(4000));

        tokio::time::sleep(Duration::from_millis(8500)).await;
        let sample = feed.latest();
        handle.abort();

        let sample = sample.unwrap_or_else(|| panic!("simulation published nothing"));
        assert!((sample.coords.latitude - 51.5).abs() < 0.001);
        assert!((sample.coords.longitude + 0.12).abs() < 0.001);
    }
}
