use clap::Parser;
use std::path::PathBuf;

use walktrack_types::TrackerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "walktrack",
    about = "WalkTrack client - streams walk locations to a collection server",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(short, long, env = "WALKTRACK_URL", help = "Collection server URL (ws:// or wss://)")]
    pub url: Option<String>,

    #[arg(short, long, env = "WALKTRACK_CONFIG", help = "Path to config JSON")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "WALKTRACK_SYNC_INTERVAL_MS", help = "Location sync cadence in ms")]
    pub sync_interval_ms: Option<u64>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, help = "Publish simulated positions instead of waiting for `loc` input")]
    pub simulate: bool,

    #[arg(
        long,
        value_parser = parse_origin,
        default_value = "51.50735,-0.12776",
        help = "Starting point of the simulated walk as LAT,LON"
    )]
    pub origin: (f64, f64),
}

impl Cli {
    /// Flags win over the config file.
    pub fn apply_overrides(&self, config: &mut TrackerConfig) {
        if let Some(url) = &self.url {
            config.server_url.clone_from(url);
        }
        if let Some(interval) = self.sync_interval_ms {
            config.location_sync_interval_ms = interval;
        }
    }
}

fn parse_origin(s: &str) -> Result<(f64, f64), String> {
    let (lat, lon) = s.split_once(',').ok_or_else(|| "expected LAT,LON".to_string())?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {}", e))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {}", e))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err("coordinates out of range".to_string());
    }
    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin() {
        assert_eq!(parse_origin("51.5, -0.1"), Ok((51.5, -0.1)));
        assert!(parse_origin("51.5").is_err());
        assert!(parse_origin("91,0").is_err());
        assert!(parse_origin("a,b").is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["walktrack", "--url", "wss://walks.example.com", "--sync-interval-ms", "2000"]);
        let mut config = TrackerConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.server_url, "wss://walks.example.com");
        assert_eq!(config.location_sync_interval_ms, 2000);
    }
}
