//! WebSocket transport backed by tokio-tungstenite.
//!
//! Each connection runs in its own task. The task owns the socket and is
//! fed outbound frames through an unbounded queue, so `send` never blocks
//! the tracker.

use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};

use super::{ConnectionId, EventSink, Transport};
use walktrack_types::TransportError;

/// Close code reported when the peer closed without a status.
const CLOSE_NO_STATUS: u16 = 1005;
const CLOSE_NORMAL: u16 = 1000;
/// How long a client-initiated close waits for the server's reply.
const CLOSE_REPLY_WAIT: Duration = Duration::from_secs(1);

#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

#[derive(Debug)]
struct ConnectionTask {
    outbound: mpsc::UnboundedSender<Outbound>,
    task: JoinHandle<()>,
}

#[derive(Debug, Default)]
pub struct WebSocketTransport {
    connections: HashMap<ConnectionId, ConnectionTask>,
    closing: Vec<JoinHandle<()>>,
}

impl WebSocketTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for WebSocketTransport {
    fn open(&mut self, address: &str, sink: EventSink) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let connection = sink.connection();
        let task = tokio::spawn(run_connection(address.to_string(), sink, rx));
        self.connections.insert(connection, ConnectionTask { outbound, task });
    }

    fn send(&mut self, connection: ConnectionId, text: String) -> Result<(), TransportError> {
        let entry = self.connections.get(&connection).ok_or(TransportError::NotConnected)?;
        entry.outbound.send(Outbound::Text(text)).map_err(|_| TransportError::SendFailed {
            message: format!("connection {} is gone", connection),
        })
    }

    fn close(&mut self, connection: ConnectionId) {
        if let Some(entry) = self.connections.remove(&connection) {
            let _ = entry.outbound.send(Outbound::Close);
            self.closing.retain(|task| !task.is_finished());
            self.closing.push(entry.task);
        }
    }

    fn closing_tasks(&mut self) -> Vec<JoinHandle<()>> {
        std::mem::take(&mut self.closing)
    }
}

async fn run_connection(
    address: String,
    sink: EventSink,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) {
    let connection = sink.connection();
    let mut ws = match connect_async(address.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(e) => {
            sink.error(
                TransportError::ConnectFailed { address, message: e.to_string() }.to_string(),
            );
            return;
        }
    };
    debug!("WebSocket {} connected to {}", connection, address);
    sink.opened();

    loop {
        tokio::select! {
            out = outbound.recv() => match out {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = ws.send(Message::Text(text)).await {
                        sink.error(TransportError::SendFailed { message: e.to_string() }.to_string());
                        return;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = ws.close(None).await;
                    // Drain until the server acknowledges, bounded.
                    let _ = tokio::time::timeout(CLOSE_REPLY_WAIT, async {
                        while let Some(Ok(_)) = ws.next().await {}
                    })
                    .await;
                    sink.closed(CLOSE_NORMAL, "client closed");
                    info!("WebSocket {} closed by client", connection);
                    return;
                }
            },
            inbound = ws.next() => match inbound {
                Some(Ok(Message::Text(text))) => sink.message(text),
                Some(Ok(Message::Close(frame))) => {
                    // Tungstenite queues the close reply; push it out before dropping the socket.
                    let _ = ws.flush().await;
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.into_owned()))
                        .unwrap_or((CLOSE_NO_STATUS, String::new()));
                    sink.closed(code, reason);
                    return;
                }
                // Ping/pong are answered by tungstenite; binary frames are not part of the protocol.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    sink.error(e.to_string());
                    return;
                }
                None => {
                    sink.error("connection reset without close frame");
                    return;
                }
            },
        }
    }
}
