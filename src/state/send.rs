/// Delivery settings and the transmission lifecycle
///
/// SendConfig mirrors the endpoint form: how to serialize the request body,
/// which key carries the image, and where to POST it. TransmissionResult is
/// the four-state lifecycle of a send: Idle until the first attempt, Pending
/// while the request is in flight, then Success or Failure with the message
/// shown in the result panel.

use serde::{Deserialize, Serialize};

/// Default verification endpoint; override per-session in the UI or with
/// the FACE_CAPTURE_ENDPOINT environment variable.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/verify-face-base64";

/// How the request body is serialized.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMethod {
    /// JSON object with the data URL under the configured field name
    Json,
    /// multipart/form-data with the decoded bytes as a file part
    Multipart,
}

/// User-editable delivery settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SendConfig {
    pub method: SendMethod,
    /// Body key (JSON) or part name (multipart) carrying the image
    pub field_name: String,
    pub endpoint: String,
}

impl Default for SendConfig {
    fn default() -> Self {
        Self {
            method: SendMethod::Json,
            field_name: "image".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Lifecycle of the most recent send.
///
/// Transitions strictly Idle → Pending → {Success, Failure}, and back to
/// Pending on the next send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransmissionResult {
    Idle,
    Pending,
    Success(String),
    Failure(String),
}

impl TransmissionResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, TransmissionResult::Pending)
    }

    /// The message to show in the result panel, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            TransmissionResult::Idle => None,
            TransmissionResult::Pending => Some("Sending..."),
            TransmissionResult::Success(message) | TransmissionResult::Failure(message) => {
                Some(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_the_verification_endpoint() {
        let config = SendConfig::default();
        assert_eq!(config.method, SendMethod::Json);
        assert_eq!(config.field_name, "image");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn result_messages() {
        assert_eq!(TransmissionResult::Idle.message(), None);
        assert!(TransmissionResult::Pending.is_pending());
        assert_eq!(
            TransmissionResult::Success("ok".to_string()).message(),
            Some("ok")
        );
        assert_eq!(
            TransmissionResult::Failure("boom".to_string()).message(),
            Some("boom")
        );
    }
}
