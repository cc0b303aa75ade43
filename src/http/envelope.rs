//! Wire envelope shared by every backend endpoint.
//!
//! ```text
//! { "success": bool, "message": string?, "data": T?, "error": payload?,
//!   "statusCode": int?, "timestamp": string?, "path": string? }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Standard response wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T = Value> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Absent on failures and on calls without a payload.
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorPayload>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope wrapping `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
            status_code: Some(200),
            timestamp: None,
            path: None,
        }
    }
}

/// Error payload of a failed envelope.
///
/// The backend sends a bare string, an object with a `message`, or
/// occasionally an arbitrary structure (field validation maps).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Text(String),
    Detailed {
        message: String,
        #[serde(flatten)]
        details: Map<String, Value>,
    },
    Other(Value),
}

impl ErrorPayload {
    /// Human-readable message for this payload.
    pub fn message(&self) -> String {
        match self {
            ErrorPayload::Text(text) => text.clone(),
            ErrorPayload::Detailed { message, .. } => message.clone(),
            ErrorPayload::Other(value) => value.to_string(),
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// True when `value` is a JSON object that announces itself as an envelope.
pub fn looks_like_envelope(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| obj.contains_key("success"))
}
