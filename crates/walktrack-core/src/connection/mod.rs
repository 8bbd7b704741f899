//! Connection Manager
//!
//! Owns the single logical connection to the collection server and the
//! retry policy around it.
//!
//! Transitions:
//! - `Closed → Connecting` on [`ConnectionManager::ensure_connected`] or a fired retry
//! - `Connecting → Open` on the transport's Open event (resets the retry count)
//! - `* → Closed` on a transport Error or Closed event, or on teardown
//!
//! Retry policy: a transport error arms exactly one retry after a fixed delay
//! while the budget lasts. Further errors while a retry is pending do not arm
//! another. Once `attempt_count` reaches `max_attempts` the connection stays
//! closed until `ensure_connected` is called again.

#[cfg(test)]
mod tests;

use chrono::Utc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::timer::OneShotTimer;
use crate::transport::{ConnectionId, EventSink, Transport, TransportEvent, TransportEventKind};
use walktrack_types::{ConnectionState, RetryConfig, RetryState, TransportError};

/// What a transport event meant for the rest of the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUpdate {
    /// Connection reached Open and the handshake went out
    Opened,
    /// Inbound text frame for the dispatcher
    Message(String),
    /// Connection failed; a retry may be pending
    Dropped,
    /// Connection closed cleanly by the peer
    Closed,
}

pub struct ConnectionManager<T> {
    transport: T,
    address: String,
    events: mpsc::UnboundedSender<TransportEvent>,
    current: Option<ConnectionId>,
    next_id: u64,
    state: ConnectionState,
    retry: RetryState,
    retry_delay: Duration,
    retry_timer: OneShotTimer,
}

impl<T: Transport> ConnectionManager<T> {
    pub fn new(
        transport: T,
        address: impl Into<String>,
        retry: RetryConfig,
        events: mpsc::UnboundedSender<TransportEvent>,
    ) -> Self {
        Self {
            transport,
            address: address.into(),
            events,
            current: None,
            next_id: 1,
            state: ConnectionState::Closed,
            retry: RetryState::new(retry.max_attempts),
            retry_delay: Duration::from_millis(retry.delay_ms),
            retry_timer: OneShotTimer::default(),
        }
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    pub const fn retry_state(&self) -> RetryState {
        self.retry
    }

    pub const fn current(&self) -> Option<ConnectionId> {
        self.current
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Open a connection unless one is already connecting or open.
    ///
    /// An explicit call cancels a pending retry and, once the retry budget is
    /// spent, grants a fresh one. Returns whether a new connection was opened.
    pub fn ensure_connected(&mut self) -> bool {
        if self.current.is_some() && self.state != ConnectionState::Closed {
            debug!("🔌 [Connection] Already {} on {:?}, nothing to do", self.state, self.current);
            return false;
        }
        self.cancel_retry();
        if self.retry.is_exhausted() {
            info!(
                "🔌 [Connection] Retry budget reset after {} failed attempts",
                self.retry.attempt_count
            );
            self.retry.attempt_count = 0;
        }
        self.open();
        true
    }

    /// Apply one transport event. Events from superseded connections are ignored.
    pub fn handle_event(&mut self, event: TransportEvent) -> Option<ConnectionUpdate> {
        if Some(event.connection) != self.current {
            debug!("🔌 [Connection] Ignoring {:?} from stale connection {}", event.kind, event.connection);
            return None;
        }

        match event.kind {
            TransportEventKind::Open => {
                self.state = ConnectionState::Open;
                self.retry.attempt_count = 0;
                info!("✅ [Connection] Connected to {} ({})", self.address, event.connection);

                let handshake = format!("Client established connection at {}", Utc::now().timestamp_millis());
                match self.send(handshake) {
                    Ok(()) => Some(ConnectionUpdate::Opened),
                    Err(_) => Some(ConnectionUpdate::Dropped),
                }
            }
            TransportEventKind::Message(text) => Some(ConnectionUpdate::Message(text)),
            TransportEventKind::Error(info) => {
                warn!("❌ [Connection] Transport error on {}: {}", event.connection, info);
                self.drop_connection();
                self.schedule_retry();
                Some(ConnectionUpdate::Dropped)
            }
            TransportEventKind::Closed { code, reason } => {
                info!("🔌 [Connection] Closed by server ({}): {}", code, reason);
                self.drop_connection();
                Some(ConnectionUpdate::Closed)
            }
        }
    }

    /// Send a text frame on the open connection.
    ///
    /// A failed send is a transport error: the connection is dropped and the
    /// retry policy applies.
    pub fn send(&mut self, text: String) -> Result<(), TransportError> {
        let connection = match self.current {
            Some(id) if self.state.is_open() => id,
            _ => return Err(TransportError::NotConnected),
        };
        if let Err(e) = self.transport.send(connection, text) {
            warn!("❌ [Connection] Send failed on {}: {}", connection, e);
            self.drop_connection();
            self.schedule_retry();
            return Err(e);
        }
        Ok(())
    }

    /// Resolves when the pending retry is due. Never resolves if none is armed.
    pub async fn retry_due(&mut self) {
        self.retry_timer.fired().await;
    }

    /// Run the retry that just became due.
    pub fn fire_retry(&mut self) {
        self.retry_timer.cancel();
        self.retry.pending_retry_scheduled = false;
        if self.current.is_some() && self.state != ConnectionState::Closed {
            debug!("🔌 [Connection] Retry skipped, connection already {}", self.state);
            return;
        }
        self.retry.attempt_count += 1;
        info!(
            "🔄 [Connection] Retrying ({}/{})...",
            self.retry.attempt_count, self.retry.max_attempts
        );
        self.open();
    }

    /// Close the connection and cancel any pending retry.
    pub fn teardown(&mut self) {
        self.cancel_retry();
        if let Some(connection) = self.current.take() {
            self.state = ConnectionState::Closing;
            debug!("🔌 [Connection] Closing {}", connection);
            self.transport.close(connection);
        }
        self.state = ConnectionState::Closed;
    }

    /// Background work still closing dropped connections.
    pub fn closing_tasks(&mut self) -> Vec<JoinHandle<()>> {
        self.transport.closing_tasks()
    }

    fn open(&mut self) {
        let connection = ConnectionId(self.next_id);
        self.next_id += 1;
        self.current = Some(connection);
        self.state = ConnectionState::Connecting;
        info!("🔌 [Connection] Connecting to {} ({})", self.address, connection);
        self.transport.open(&self.address, EventSink::new(connection, self.events.clone()));
    }

    fn drop_connection(&mut self) {
        if let Some(connection) = self.current.take() {
            self.transport.close(connection);
        }
        self.state = ConnectionState::Closed;
    }

    fn schedule_retry(&mut self) {
        if self.retry_timer.is_armed() {
            debug!("🔄 [Connection] Retry already pending");
            return;
        }
        if self.retry.is_exhausted() {
            warn!(
                "⚠️ [Connection] Giving up after {} retries; call ensure_connected to resume",
                self.retry.attempt_count
            );
            return;
        }
        self.retry_timer.arm(self.retry_delay);
        self.retry.pending_retry_scheduled = true;
        info!("🔄 [Connection] Retry scheduled in {}ms", self.retry_delay.as_millis());
    }

    fn cancel_retry(&mut self) {
        self.retry_timer.cancel();
        self.retry.pending_retry_scheduled = false;
    }
}
