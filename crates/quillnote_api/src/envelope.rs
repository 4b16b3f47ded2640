//! Response envelope and status-code mapping.

use quillnote_core::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Body returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: ResponseStatus,
    pub message: String,
    /// `null` on every error.
    pub data: Option<Value>,
}

/// Envelope plus the status code a transport should send with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: Envelope,
}

impl ApiResponse {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            status_code: 200,
            body: Envelope {
                status: ResponseStatus::Success,
                message: message.into(),
                data: Some(data),
            },
        }
    }

    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Envelope {
                status: ResponseStatus::Error,
                message: message.into(),
                data: None,
            },
        }
    }

    /// Serialized envelope body.
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| {
            r#"{"status":"error","message":"failed to encode response","data":null}"#.to_string()
        })
    }
}

/// Maps a failure category onto its response status code.
pub const fn status_code_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict | ErrorKind::Validation => 400,
        ErrorKind::Unauthorized => 401,
        ErrorKind::Internal => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::{status_code_for, ApiResponse};
    use quillnote_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(status_code_for(ErrorKind::NotFound), 404);
        assert_eq!(status_code_for(ErrorKind::Conflict), 400);
        assert_eq!(status_code_for(ErrorKind::Validation), 400);
        assert_eq!(status_code_for(ErrorKind::Unauthorized), 401);
        assert_eq!(status_code_for(ErrorKind::Internal), 500);
    }

    #[test]
    fn error_envelope_serializes_null_data() {
        let response = ApiResponse::failure(404, "notes not found");
        let body: serde_json::Value = serde_json::from_str(&response.body_json()).unwrap();
        assert_eq!(
            body,
            json!({"status": "error", "message": "notes not found", "data": null})
        );
    }
}
