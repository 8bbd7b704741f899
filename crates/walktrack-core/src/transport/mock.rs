//! In-memory transport that records every call.
//!
//! Clones share the same recording, so a test can hand one clone to the
//! tracker and keep another to inspect calls and raise events.

use parking_lot::Mutex;
use std::sync::Arc;

use super::{ConnectionId, EventSink, Transport};
use walktrack_types::TransportError;

/// A call made against the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Open { connection: ConnectionId, address: String },
    Send { connection: ConnectionId, text: String },
    Close { connection: ConnectionId },
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<TransportCall>,
    sinks: Vec<EventSink>,
    fail_sends: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Recording>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    pub fn open_count(&self) -> usize {
        self.inner.lock().sinks.len()
    }

    /// Text of every frame sent, in order.
    pub fn sent(&self) -> Vec<String> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Send { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn closed(&self) -> Vec<ConnectionId> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Close { connection } => Some(*connection),
                _ => None,
            })
            .collect()
    }

    /// Sink of the most recently opened connection.
    pub fn last_sink(&self) -> Option<EventSink> {
        self.inner.lock().sinks.last().cloned()
    }

    /// Make every following `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.inner.lock().fail_sends = fail;
    }
}

impl Transport for MockTransport {
    fn open(&mut self, address: &str, sink: EventSink) {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(TransportCall::Open { connection: sink.connection(), address: address.to_string() });
        inner.sinks.push(sink);
    }

    fn send(&mut self, connection: ConnectionId, text: String) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        if inner.fail_sends {
            return Err(TransportError::SendFailed { message: "mock send failure".to_string() });
        }
        inner.calls.push(TransportCall::Send { connection, text });
        Ok(())
    }

    fn close(&mut self, connection: ConnectionId) {
        self.inner.lock().calls.push(TransportCall::Close { connection });
    }
}
