//! Message Dispatcher
//!
//! Classifies inbound frames and keeps the acknowledgement bookkeeping.
//! Malformed frames are dropped with a diagnostic; they never affect the
//! connection.

use tracing::{debug, info, warn};

use walktrack_types::{MessageKind, ParseError, ServerMessage, SyncMeta};

#[derive(Debug, Default)]
pub struct MessageDispatcher {
    sync: SyncMeta,
    last_message: Option<ServerMessage>,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn sync_meta(&self) -> SyncMeta {
        self.sync
    }

    pub fn last_message(&self) -> Option<&ServerMessage> {
        self.last_message.as_ref()
    }

    pub fn dispatch(&mut self, frame: &str) -> Result<MessageKind, ParseError> {
        let message = match ServerMessage::parse(frame) {
            Ok(message) => message,
            Err(e) => {
                warn!("📨 [Dispatch] Discarding frame {:?}: {}", frame, e);
                return Err(e);
            }
        };

        let kind = message.kind();
        match kind {
            MessageKind::Ack { timestamp } => {
                info!("📨 [Dispatch] Location synced at {}", timestamp);
                self.sync.last_successful_sync_at_ms = Some(timestamp);
            }
            MessageKind::Other { status } => {
                debug!("📨 [Dispatch] Stored message with unhandled status {}", status);
            }
        }
        self.last_message = Some(message);
        Ok(kind)
    }
}
