//! Location samples as produced by the device location provider.

use serde::{Deserialize, Serialize};

/// Position part of a sample.
///
/// Only latitude and longitude are guaranteed; providers fill the rest when they can.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// A position fix and the epoch milliseconds at which it was captured.
///
/// Serializes to the location sync payload:
/// `{"coords":{"latitude":..,"longitude":..},"timestamp":..}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LocationSample {
    pub coords: Coordinates,
    pub timestamp: i64,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, captured_at_ms: i64) -> Self {
        Self {
            coords: Coordinates { latitude, longitude, ..Default::default() },
            timestamp: captured_at_ms,
        }
    }

    pub const fn captured_at_ms(&self) -> i64 {
        self.timestamp
    }

    /// `(lat, long)` rounded to five decimals for display.
    pub fn display_position(&self) -> String {
        format!("({:.5}, {:.5})", self.coords.latitude, self.coords.longitude)
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let sample = LocationSample::new(51.5, -0.125, 1_700_000_000_000);
        let value: serde_json::Value = serde_json::from_str(&sample.to_payload().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "coords": { "latitude": 51.5, "longitude": -0.125 },
                "timestamp": 1_700_000_000_000_i64
            })
        );
    }

    #[test]
    fn test_optional_fields_serialized_when_present() {
        let mut sample = LocationSample::new(1.0, 2.0, 3);
        sample.coords.accuracy = Some(4.5);
        let value: serde_json::Value = serde_json::from_str(&sample.to_payload().unwrap()).unwrap();
        assert_eq!(value["coords"]["accuracy"], json!(4.5));
        assert!(value["coords"].get("speed").is_none());
    }

    #[test]
    fn test_display_position() {
        let sample = LocationSample::new(51.123456789, -0.1, 0);
        assert_eq!(sample.display_position(), "(51.12346, -0.10000)");
    }
}
