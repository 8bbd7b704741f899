//! Inbound server messages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;

/// Status code the server uses to acknowledge a location sample.
pub const ACK_STATUS: i64 = 1;

/// A parsed server frame: `{"status": int, "timestamp": int, ...}`.
///
/// Unknown fields are kept in `extra`; the original text is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    raw: String,
}

/// Classification of a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The server accepted the sample captured at `timestamp`
    Ack { timestamp: i64 },
    /// Reserved status code, stored but not acted on
    Other { status: i64 },
}

impl ServerMessage {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut message: Self =
            serde_json::from_str(text).map_err(|e| ParseError::from_json_error(&e))?;
        if message.status == ACK_STATUS && message.timestamp.is_none() {
            return Err(ParseError::MissingTimestamp);
        }
        message.raw = text.to_string();
        Ok(message)
    }

    pub fn kind(&self) -> MessageKind {
        match (self.status, self.timestamp) {
            (ACK_STATUS, Some(timestamp)) => MessageKind::Ack { timestamp },
            (status, _) => MessageKind::Other { status },
        }
    }

    /// Frame text as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_classification() {
        let msg = ServerMessage::parse(r#"{"status":1,"timestamp":1700000000000}"#).unwrap();
        assert_eq!(msg.kind(), MessageKind::Ack { timestamp: 1_700_000_000_000 });
        assert_eq!(msg.raw(), r#"{"status":1,"timestamp":1700000000000}"#);
    }

    #[test]
    fn test_unknown_status_is_other() {
        let msg = ServerMessage::parse(r#"{"status":7,"timestamp":5,"note":"later"}"#).unwrap();
        assert_eq!(msg.kind(), MessageKind::Other { status: 7 });
        assert_eq!(msg.extra.get("note"), Some(&Value::String("later".to_string())));
    }

    #[test]
    fn test_malformed_frames_rejected() {
        assert!(matches!(
            ServerMessage::parse("not-json"),
            Err(ParseError::InvalidJson { .. })
        ));
        assert!(matches!(
            ServerMessage::parse(r#"{"timestamp":5}"#),
            Err(ParseError::InvalidJson { .. })
        ));
        assert!(matches!(ServerMessage::parse("[1,2]"), Err(ParseError::InvalidJson { .. })));
        assert_eq!(ServerMessage::parse(r#"{"status":1}"#), Err(ParseError::MissingTimestamp));
    }
}
