//! Gateway result envelope
//!
//! Every gateway operation returns a [`GatewayResult`]: a status from a
//! closed set, an optional payload, and an optional error message. The
//! calling transport owns the result and is the only layer that renders
//! it into an exit code or HTTP status.

use serde::Serialize;

/// Closed status set carried by every gateway result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStatus {
    Success,
    /// Backend unreachable or unauthenticated
    Connection,
    /// Statement reached the backend and failed
    Execution,
    /// Bucket mismatch or missing key
    NotFound,
    /// Reserved; no current producer, but transports must keep it mapped
    PermissionDenied,
    /// Missing or empty required argument
    InvalidInput,
    /// Allocation failure while buffering or encoding
    OutOfMemory,
}

/// Response payload: bytes plus their declared content type.
#[derive(Debug)]
pub struct Payload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Uniform return value of every gateway operation.
#[derive(Debug)]
pub struct GatewayResult {
    pub status: GatewayStatus,
    pub payload: Option<Payload>,
    pub error_message: Option<String>,
}

impl GatewayResult {
    /// Successful result carrying raw bytes.
    pub fn success(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            status: GatewayStatus::Success,
            payload: Some(Payload {
                data,
                content_type: content_type.into(),
            }),
            error_message: None,
        }
    }

    /// Successful result carrying a JSON document.
    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(data) => Self::success(data, "application/json"),
            Err(e) => Self::error(
                GatewayStatus::Execution,
                format!("failed to encode response: {e}"),
            ),
        }
    }

    /// Failed result with a human-readable message.
    pub fn error(status: GatewayStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: None,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == GatewayStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_carries_payload() {
        let result = GatewayResult::success(b"hello".to_vec(), "text/plain");
        assert!(result.is_success());
        let payload = result.payload.unwrap();
        assert_eq!(payload.data, b"hello");
        assert_eq!(payload.content_type, "text/plain");
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_json_sets_content_type() {
        let result = GatewayResult::json(&serde_json::json!({"ok": true}));
        let payload = result.payload.unwrap();
        assert_eq!(payload.content_type, "application/json");
        assert_eq!(payload.data, br#"{"ok":true}"#);
    }

    #[test]
    fn test_error_has_no_payload() {
        let result = GatewayResult::error(GatewayStatus::NotFound, "Object not found");
        assert!(!result.is_success());
        assert!(result.payload.is_none());
        assert_eq!(result.error_message.as_deref(), Some("Object not found"));
    }
}
