//! Bidirectional message transport seam.
//!
//! The engine drives a [`Transport`] through three primitives (open, send,
//! close) and learns about the connection exclusively through
//! [`TransportEvent`]s pushed into the tracker's event channel. Every event is
//! tagged with the [`ConnectionId`] it belongs to, so events raised by a
//! connection that has since been replaced are recognised and dropped.

mod mock;
mod websocket;

pub use mock::{MockTransport, TransportCall};
pub use websocket::WebSocketTransport;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use walktrack_types::TransportError;

/// Identity of one physical connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    Open,
    Message(String),
    Error(String),
    Closed { code: u16, reason: String },
}

/// An event raised by the transport for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub connection: ConnectionId,
    pub kind: TransportEventKind,
}

/// Where a transport reports events for a single connection.
#[derive(Debug, Clone)]
pub struct EventSink {
    connection: ConnectionId,
    tx: mpsc::UnboundedSender<TransportEvent>,
}

impl EventSink {
    pub fn new(connection: ConnectionId, tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self { connection, tx }
    }

    pub const fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn opened(&self) {
        self.emit(TransportEventKind::Open);
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(TransportEventKind::Message(text.into()));
    }

    pub fn error(&self, info: impl Into<String>) {
        self.emit(TransportEventKind::Error(info.into()));
    }

    pub fn closed(&self, code: u16, reason: impl Into<String>) {
        self.emit(TransportEventKind::Closed { code, reason: reason.into() });
    }

    fn emit(&self, kind: TransportEventKind) {
        // Receiver gone means the tracker shut down; nothing left to notify.
        let _ = self.tx.send(TransportEvent { connection: self.connection, kind });
    }
}

/// Minimal interface the connection manager needs from a transport.
///
/// Methods must not block: `open` starts connecting in the background and
/// reports progress through the sink.
pub trait Transport: Send + 'static {
    /// Begin connecting to `address`, reporting events through `sink`.
    fn open(&mut self, address: &str, sink: EventSink);

    /// Queue a text frame on an open connection.
    fn send(&mut self, connection: ConnectionId, text: String) -> Result<(), TransportError>;

    /// Close the connection and release its resources. Idempotent.
    fn close(&mut self, connection: ConnectionId);

    /// Hand over tasks still finishing a close, so shutdown can await them.
    fn closing_tasks(&mut self) -> Vec<JoinHandle<()>> {
        Vec::new()
    }
}
