//! Terminal rendering of tracker snapshots.

use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

use walktrack_types::TrackerSnapshot;

pub fn render(snapshot: &TrackerSnapshot) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["WalkTrack", ""]);

    let connection = if snapshot.connection_state.is_open() {
        Cell::new(snapshot.connection_state.label()).fg(Color::Green)
    } else {
        Cell::new(format!("{} ({})", snapshot.connection_state.label(), snapshot.connection_state))
            .fg(Color::Red)
    };
    table.add_row(vec![Cell::new("Connection"), connection]);
    table.add_row(vec![
        Cell::new("Retries"),
        Cell::new(format!("{}/{}", snapshot.retry.attempt_count, snapshot.retry.max_attempts)),
    ]);
    table.add_row(vec![Cell::new("Walk ID"), Cell::new(snapshot.walk_id().unwrap_or("-"))]);
    table.add_row(vec![Cell::new("Duration"), Cell::new(snapshot.walk.format_duration())]);
    table.add_row(vec![
        Cell::new("Last Sync"),
        Cell::new(snapshot.last_successful_sync_at_ms().map_or_else(|| "-".to_string(), format_epoch_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Lat/Long"),
        Cell::new(
            snapshot
                .latest_location_sample
                .as_ref()
                .map_or_else(|| "-".to_string(), |s| s.display_position()),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Last Message"),
        Cell::new(snapshot.last_received_message.as_ref().map_or("-", |m| m.raw())),
    ]);
    table
}

fn format_epoch_ms(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use walktrack_types::LocationSample;

    #[test]
    fn test_render_idle_snapshot() {
        let rendered = render(&TrackerSnapshot::default()).to_string();
        assert!(rendered.contains("Not Connected (closed)"));
        assert!(rendered.contains("00:00"));
        assert!(rendered.contains("0/20"));
    }

    #[test]
    fn test_render_position_and_sync() {
        let mut snapshot = TrackerSnapshot::default();
        snapshot.latest_location_sample = Some(LocationSample::new(51.507351, -0.127758, 0));
        snapshot.sync.last_successful_sync_at_ms = Some(1_700_000_000_000);

        let rendered = render(&snapshot).to_string();
        assert!(rendered.contains("(51.50735, -0.12776)"));
        assert!(rendered.contains("2023-11-14 22:13:20 UTC"));
    }
}
