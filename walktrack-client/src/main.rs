//! WalkTrack Client - Headless Tracker
//!
//! Keeps a connection to the collection server, reads walk commands from
//! stdin and streams the latest position while a walk is active.
//!
//! Positions come from `loc <lat> <lon>` lines or, with `--simulate`, from a
//! jittered walk around `--origin`.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::{wrappers::WatchStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

mod cli;
mod input;
mod status;

use cli::Cli;
use input::{Input, HELP};
use walktrack_core::config::load_config;
use walktrack_core::{location, location_channel, LocationPublisher, Tracker, TrackerHandle, WebSocketTransport};
use walktrack_types::{ConnectionState, LocationSample};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let (publisher, feed) = location_channel();
    let publisher = Arc::new(publisher);
    let simulation = cli.simulate.then(|| {
        location::simulate(
            Arc::clone(&publisher),
            cli.origin,
            Duration::from_millis(config.location_update_interval_ms),
        )
    });

    let handle = Tracker::spawn(&config, WebSocketTransport::new(), Arc::new(feed));
    info!("🚀 WalkTrack client connecting to {}", config.server_url);
    tokio::spawn(log_transitions(handle.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    info!("📭 stdin closed, shutting down");
                    break;
                };
                match Input::parse(&line) {
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(input)) => execute(&handle, &publisher, input).await,
                    Ok(None) => {}
                    Err(e) => eprintln!("{} {}", "✗".red(), e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("🛑 Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    if let Some(simulation) = simulation {
        simulation.abort();
    }
    if let Err(e) = handle.shutdown().await {
        warn!("Tracker already stopped: {}", e);
    }
    Ok(())
}

async fn execute(handle: &TrackerHandle, publisher: &LocationPublisher, input: Input) {
    match input {
        Input::Begin => match handle.begin_walk().await {
            Ok(id) => println!("{} Walking: {}", "✓".green(), id),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        },
        Input::End => match handle.end_walk().await {
            Ok(Some(id)) => println!("{} Walk {} ended", "✓".green(), id),
            Ok(None) => println!("{}", "No active walk".yellow()),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        },
        Input::Send(text) => match handle.send_raw(text).await {
            Ok(()) => println!("{} Sent", "✓".green()),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        },
        Input::Location { latitude, longitude } => {
            let sample = LocationSample::new(latitude, longitude, chrono::Utc::now().timestamp_millis());
            publisher.publish(sample);
            println!("{} Position {}", "✓".green(), sample.display_position());
        }
        Input::Status => println!("{}", status::render(&handle.snapshot())),
        Input::Reconnect => match handle.reconnect().await {
            Ok(true) => println!("{} Reconnecting", "✓".green()),
            Ok(false) => println!("{}", "Already connected or connecting".yellow()),
            Err(e) => eprintln!("{} {}", "✗".red(), e),
        },
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

/// Log connection state changes until the tracker stops.
async fn log_transitions(handle: TrackerHandle) {
    let mut states = WatchStream::new(handle.subscribe());
    let mut last: Option<ConnectionState> = None;

    while let Some(snapshot) = states.next().await {
        let state = snapshot.connection_state;
        if last == Some(state) {
            continue;
        }
        last = Some(state);
        match state {
            ConnectionState::Open => info!("🔌 {}", state.label().green()),
            ConnectionState::Closed if snapshot.retry.is_exhausted() && !snapshot.retry.pending_retry_scheduled => {
                warn!("🔌 {}: retries exhausted, type `reconnect`", state.label().red());
            }
            _ => info!("🔌 {} ({})", state.label(), state),
        }
    }
}
