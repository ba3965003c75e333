//! Messages received from the Gotify stream.

use serde::{Deserialize, Serialize};

use crate::WireError;

/// A message pushed by Gotify over `/stream`.
///
/// Gotify sends one JSON object per WebSocket frame. Fields added by newer
/// server versions (such as `extras`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Message identifier
    pub id: u32,
    /// Identifier of the application that sent the message
    pub appid: u32,
    /// Message body
    pub message: String,
    /// Message title
    pub title: String,
    /// Priority assigned by the sending application
    pub priority: u32,
    /// Creation timestamp, formatted by the server
    pub date: String,
}

impl InboundEvent {
    /// Decode an event from the text of a stream frame.
    pub fn from_json(text: &str) -> Result<Self, WireError> {
        serde_json::from_str(text).map_err(WireError::Deserialization)
    }

    /// Decode an event from the bytes of a binary stream frame.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, WireError> {
        serde_json::from_slice(bytes).map_err(WireError::Deserialization)
    }

    /// Encode to a JSON string.
    pub fn to_json(&self) -> Result<String, WireError> {
        serde_json::to_string(self).map_err(WireError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOTIFY_FRAME: &str = r#"{
        "id": 25,
        "appid": 5,
        "message": "Backup finished",
        "title": "nightly",
        "priority": 2,
        "date": "2024-03-01T02:00:11.417+01:00"
    }"#;

    #[test]
    fn decodes_gotify_frame() {
        let event = InboundEvent::from_json(GOTIFY_FRAME).unwrap();

        assert_eq!(event.id, 25);
        assert_eq!(event.appid, 5);
        assert_eq!(event.message, "Backup finished");
        assert_eq!(event.title, "nightly");
        assert_eq!(event.priority, 2);
        assert_eq!(event.date, "2024-03-01T02:00:11.417+01:00");
    }

    #[test]
    fn ignores_unknown_fields() {
        let frame = r#"{"id":1,"appid":2,"message":"m","title":"t","priority":0,
            "date":"d","extras":{"client::display":{"contentType":"text/markdown"}}}"#;

        let event = InboundEvent::from_json(frame).unwrap();
        assert_eq!(event.title, "t");
    }

    #[test]
    fn decodes_from_binary_frame() {
        let event = InboundEvent::from_slice(GOTIFY_FRAME.as_bytes()).unwrap();
        assert_eq!(event.id, 25);
    }

    #[test]
    fn missing_field_is_rejected() {
        let result = InboundEvent::from_json(r#"{"id":1,"appid":2,"message":"m"}"#);
        assert!(matches!(result, Err(WireError::Deserialization(_))));
    }

    #[test]
    fn negative_id_is_rejected() {
        let frame = r#"{"id":-1,"appid":2,"message":"m","title":"t","priority":0,"date":"d"}"#;
        assert!(InboundEvent::from_json(frame).is_err());
    }

    #[test]
    fn not_json_is_rejected() {
        assert!(InboundEvent::from_json("ping").is_err());
    }

    #[test]
    fn encode_preserves_fields() {
        let event = InboundEvent::from_json(GOTIFY_FRAME).unwrap();
        let json = event.to_json().unwrap();
        assert_eq!(InboundEvent::from_json(&json).unwrap(), event);
    }
}
