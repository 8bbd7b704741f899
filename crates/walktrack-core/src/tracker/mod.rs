//! Tracker: the single coordinating task.
//!
//! One tokio task exclusively owns the connection manager, sync scheduler,
//! walk session and message dispatcher. Commands, transport events and timer
//! firings are handled one at a time in a `select!` loop, and a fresh
//! [`TrackerSnapshot`] is published after each of them. Readers only ever see
//! snapshots.
//!
//! Every exit path (explicit shutdown, all handles dropped, the task being
//! aborted or unwinding) runs the same teardown, which cancels all timers
//! and closes the transport. When the loop exits normally it also waits
//! briefly for the transport to finish closing its sockets.

mod handle;

pub use handle::TrackerHandle;

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionManager, ConnectionUpdate};
use crate::dispatcher::MessageDispatcher;
use crate::location::LocationSource;
use crate::scheduler::SyncScheduler;
use crate::transport::{Transport, TransportEvent};
use crate::walk::WalkTracker;
use walktrack_types::{TrackerConfig, TrackerSnapshot, TransportError, WalkError, WalkId};

const COMMAND_BUFFER: usize = 32;
/// How long shutdown waits for connections to finish closing.
const CLOSE_DRAIN: Duration = Duration::from_secs(2);

pub(crate) enum Command {
    BeginWalk(oneshot::Sender<WalkId>),
    EndWalk(oneshot::Sender<Option<WalkId>>),
    SendRaw { text: String, reply: oneshot::Sender<Result<(), TransportError>> },
    Reconnect(oneshot::Sender<bool>),
    Shutdown(oneshot::Sender<()>),
}

pub struct Tracker<T: Transport> {
    connection: ConnectionManager<T>,
    scheduler: SyncScheduler,
    walk: WalkTracker,
    dispatcher: MessageDispatcher,
    location: Arc<dyn LocationSource>,
    events: mpsc::UnboundedReceiver<TransportEvent>,
    commands: mpsc::Receiver<Command>,
    snapshot: watch::Sender<TrackerSnapshot>,
}

impl<T: Transport> Tracker<T> {
    pub fn new(
        config: &TrackerConfig,
        transport: T,
        location: Arc<dyn LocationSource>,
    ) -> (Self, TrackerHandle) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(TrackerSnapshot::default());

        let tracker = Self {
            connection: ConnectionManager::new(transport, config.server_url.clone(), config.retry, events_tx),
            scheduler: SyncScheduler::new(Duration::from_millis(config.location_sync_interval_ms)),
            walk: WalkTracker::new(Duration::from_millis(config.walk_tick_ms)),
            dispatcher: MessageDispatcher::new(),
            location: Arc::clone(&location),
            events: events_rx,
            commands: commands_rx,
            snapshot: snapshot_tx,
        };
        let handle = TrackerHandle::new(commands_tx, snapshot_rx, location);
        (tracker, handle)
    }

    /// Start the tracker on the current tokio runtime.
    pub fn spawn(config: &TrackerConfig, transport: T, location: Arc<dyn LocationSource>) -> TrackerHandle {
        let (tracker, handle) = Self::new(config, transport, location);
        tokio::spawn(tracker.run());
        handle
    }

    pub async fn run(mut self) {
        info!("🚀 [Tracker] Started, server {}", self.connection.address());
        self.connection.ensure_connected();
        self.publish();

        let shutdown_reply = loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown(reply)) => break Some(reply),
                    Some(command) => self.handle_command(command),
                    None => break None,
                },
                Some(event) = self.events.recv() => self.handle_transport_event(event),
                () = self.connection.retry_due() => self.connection.fire_retry(),
                () = self.scheduler.tick() => {
                    self.scheduler.on_tick(&mut self.connection, self.walk.session(), self.location.as_ref());
                }
                () = self.walk.tick() => self.walk.on_tick(),
            }
            self.scheduler.reconcile(self.connection.state().is_open(), self.walk.is_active());
            self.publish();
        };

        self.teardown();
        let closing = self.connection.closing_tasks();
        if !closing.is_empty() && timeout(CLOSE_DRAIN, join_all(closing)).await.is_err() {
            debug!("🛑 [Tracker] Gave up waiting for the close handshake");
        }
        if let Some(reply) = shutdown_reply {
            let _ = reply.send(());
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::BeginWalk(reply) => {
                let id = match self.walk.begin() {
                    Ok(id) => id,
                    Err(WalkError::AlreadyActive { id }) => {
                        info!("🚶 [Walk] Cannot begin walk, already walking {}", id);
                        WalkId::from(id)
                    }
                };
                let _ = reply.send(id);
            }
            Command::EndWalk(reply) => {
                let _ = reply.send(self.walk.end());
            }
            Command::SendRaw { text, reply } => {
                let _ = reply.send(self.connection.send(text));
            }
            Command::Reconnect(reply) => {
                let _ = reply.send(self.connection.ensure_connected());
            }
            // Handled by the run loop.
            Command::Shutdown(reply) => {
                let _ = reply.send(());
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match self.connection.handle_event(event) {
            Some(ConnectionUpdate::Message(text)) => {
                // Parse failures are logged by the dispatcher and otherwise ignored.
                let _ = self.dispatcher.dispatch(&text);
            }
            Some(ConnectionUpdate::Opened) if self.walk.is_active() => {
                info!(
                    "🚀 [Tracker] Connection open, resuming sync at {} into the walk",
                    self.walk.session().format_duration()
                );
            }
            Some(ConnectionUpdate::Dropped) => {
                let retry = self.connection.retry_state();
                if !retry.pending_retry_scheduled {
                    warn!(
                        "🚀 [Tracker] Connection lost with no retry pending ({}/{}), waiting for reconnect",
                        retry.attempt_count, retry.max_attempts
                    );
                }
            }
            Some(ConnectionUpdate::Closed) => {
                info!("🚀 [Tracker] Server closed the connection, waiting for reconnect");
            }
            Some(ConnectionUpdate::Opened) | None => {}
        }
    }

    fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            connection_state: self.connection.state(),
            retry: self.connection.retry_state(),
            walk: self.walk.session().clone(),
            sync: self.dispatcher.sync_meta(),
            last_received_message: self.dispatcher.last_message().cloned(),
            latest_location_sample: self.location.latest(),
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn teardown(&mut self) {
        self.scheduler.stop();
        if self.walk.is_active() || self.walk.ticker_running() {
            self.walk.end();
        }
        self.connection.teardown();
        self.publish();
        debug!("🛑 [Tracker] Torn down");
    }
}

impl<T: Transport> Drop for Tracker<T> {
    fn drop(&mut self) {
        self.teardown();
    }
}
