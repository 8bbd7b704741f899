use super::*;
use crate::transport::{MockTransport, TransportCall};
use tokio::time::{timeout, Instant};

fn manager(max_attempts: u32) -> (ConnectionManager<MockTransport>, MockTransport) {
    let transport = MockTransport::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(
        transport.clone(),
        "ws://localhost:8080",
        RetryConfig { max_attempts, delay_ms: 3000 },
        tx,
    );
    (manager, transport)
}

fn event(manager: &ConnectionManager<MockTransport>, kind: TransportEventKind) -> TransportEvent {
    TransportEvent { connection: manager.current().unwrap_or(ConnectionId(0)), kind }
}

fn error(manager: &ConnectionManager<MockTransport>) -> TransportEvent {
    event(manager, TransportEventKind::Error("boom".to_string()))
}

#[tokio::test]
async fn test_ensure_connected_is_idempotent() {
    let (mut manager, transport) = manager(20);

    assert!(manager.ensure_connected());
    assert_eq!(manager.state(), ConnectionState::Connecting);
    assert!(!manager.ensure_connected());
    assert_eq!(transport.open_count(), 1);

    let open = event(&manager, TransportEventKind::Open);
    manager.handle_event(open);
    assert!(!manager.ensure_connected());
    assert_eq!(transport.open_count(), 1);
}

#[tokio::test]
async fn test_open_sends_handshake_and_resets_attempts() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();
    manager.retry.attempt_count = 4;

    let open = event(&manager, TransportEventKind::Open);
    assert_eq!(manager.handle_event(open), Some(ConnectionUpdate::Opened));
    assert_eq!(manager.state(), ConnectionState::Open);
    assert_eq!(manager.retry_state().attempt_count, 0);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("Client established connection at "));
}

#[tokio::test]
async fn test_stale_events_ignored() {
    let (mut manager, _transport) = manager(20);
    manager.ensure_connected();
    let stale = TransportEvent { connection: ConnectionId(99), kind: TransportEventKind::Open };
    assert_eq!(manager.handle_event(stale), None);
    assert_eq!(manager.state(), ConnectionState::Connecting);
}

#[tokio::test(start_paused = true)]
async fn test_error_schedules_single_retry() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();

    let err = error(&manager);
    assert_eq!(manager.handle_event(err), Some(ConnectionUpdate::Dropped));
    assert_eq!(manager.state(), ConnectionState::Closed);
    assert!(manager.retry_state().pending_retry_scheduled);
    assert_eq!(manager.retry_state().attempt_count, 0);

    let start = Instant::now();
    manager.retry_due().await;
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
    manager.fire_retry();

    assert_eq!(manager.retry_state().attempt_count, 1);
    assert!(!manager.retry_state().pending_retry_scheduled);
    assert_eq!(manager.state(), ConnectionState::Connecting);
    assert_eq!(transport.open_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_errors_keep_one_pending_retry() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();
    let first = error(&manager);
    let connection = first.connection;
    manager.handle_event(first);

    // Late error from the same (already dropped) connection changes nothing.
    let late = TransportEvent { connection, kind: TransportEventKind::Error("again".to_string()) };
    assert_eq!(manager.handle_event(late), None);

    // A send failure while closed does not arm a second timer either.
    assert_eq!(manager.send("x".to_string()), Err(TransportError::NotConnected));

    manager.retry_due().await;
    manager.fire_retry();
    assert_eq!(transport.open_count(), 2);
    assert!(timeout(Duration::from_secs(10), manager.retry_due()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_retries_stop_after_max_attempts() {
    let (mut manager, transport) = manager(3);
    manager.ensure_connected();

    for _ in 0..3 {
        let err = error(&manager);
        manager.handle_event(err);
        manager.retry_due().await;
        manager.fire_retry();
    }
    assert_eq!(manager.retry_state().attempt_count, 3);
    assert_eq!(transport.open_count(), 1 + 3);

    let err = error(&manager);
    manager.handle_event(err);
    assert!(manager.retry_state().is_exhausted());
    assert!(!manager.retry_state().pending_retry_scheduled);
    assert!(timeout(Duration::from_secs(60), manager.retry_due()).await.is_err());
    assert_eq!(manager.state(), ConnectionState::Closed);
    assert_eq!(transport.open_count(), 4);

    // External re-trigger resumes with a fresh budget.
    assert!(manager.ensure_connected());
    assert_eq!(manager.retry_state().attempt_count, 0);
    assert_eq!(transport.open_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_explicit_connect_cancels_pending_retry() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();
    let err = error(&manager);
    manager.handle_event(err);

    assert!(manager.ensure_connected());
    assert!(!manager.retry_state().pending_retry_scheduled);
    assert!(timeout(Duration::from_secs(10), manager.retry_due()).await.is_err());
    assert_eq!(transport.open_count(), 2);
}

#[tokio::test]
async fn test_clean_close_does_not_retry() {
    let (mut manager, _transport) = manager(20);
    manager.ensure_connected();
    let open = event(&manager, TransportEventKind::Open);
    manager.handle_event(open);

    let closed = event(&manager, TransportEventKind::Closed { code: 1000, reason: "bye".to_string() });
    assert_eq!(manager.handle_event(closed), Some(ConnectionUpdate::Closed));
    assert_eq!(manager.state(), ConnectionState::Closed);
    assert!(!manager.retry_state().pending_retry_scheduled);
}

#[tokio::test]
async fn test_send_failure_drops_and_schedules_retry() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();
    let open = event(&manager, TransportEventKind::Open);
    manager.handle_event(open);

    transport.fail_sends(true);
    assert!(matches!(manager.send("payload".to_string()), Err(TransportError::SendFailed { .. })));
    assert_eq!(manager.state(), ConnectionState::Closed);
    assert!(manager.retry_state().pending_retry_scheduled);
}

#[tokio::test]
async fn test_teardown_closes_and_cancels() {
    let (mut manager, transport) = manager(20);
    manager.ensure_connected();
    let connection = manager.current();
    let err = error(&manager);
    manager.handle_event(err);
    manager.ensure_connected();
    let reopened = manager.current();

    manager.teardown();
    assert_eq!(manager.state(), ConnectionState::Closed);
    assert_eq!(manager.current(), None);
    assert!(!manager.retry_state().pending_retry_scheduled);

    let calls = transport.calls();
    assert!(calls.contains(&TransportCall::Close { connection: connection.unwrap() }));
    assert_eq!(calls.last(), Some(&TransportCall::Close { connection: reopened.unwrap() }));
}
