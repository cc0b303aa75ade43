//! User-facing error messages.
//!
//! Priority: explicit domain error → envelope message → canned message for
//! the HTTP status → transport text → generic fallback.

use serde_json::Value;

use super::ApiError;
use crate::http::envelope::ErrorPayload;

pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const FORBIDDEN: &str = "You do not have permission to perform this action.";
pub const NOT_FOUND: &str = "The requested resource was not found.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const GENERIC: &str = "An unexpected error occurred.";

/// Canned message for the statuses the UI special-cases.
pub fn status_message(status: u16) -> Option<&'static str> {
    match status {
        401 => Some(SESSION_EXPIRED),
        403 => Some(FORBIDDEN),
        404 => Some(NOT_FOUND),
        500 => Some(SERVER_ERROR),
        _ => None,
    }
}

/// Map any client failure to one string for presentation code.
pub fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Domain {
            status,
            payload,
            message,
        } => payload
            .as_ref()
            .and_then(payload_message)
            .or_else(|| non_blank(message.as_deref()))
            .or_else(|| status_message(*status).map(str::to_string))
            .unwrap_or_else(|| GENERIC.to_string()),
        ApiError::Http { status, body } => body
            .as_deref()
            .and_then(body_message)
            .or_else(|| status_message(*status).map(str::to_string))
            .unwrap_or_else(|| err.to_string()),
        ApiError::RefreshFailed(_) | ApiError::LoggedOut => SESSION_EXPIRED.to_string(),
        ApiError::Network(text) => non_blank(Some(text.as_str())).unwrap_or_else(|| GENERIC.to_string()),
        ApiError::Malformed(_) | ApiError::Abandoned => GENERIC.to_string(),
        ApiError::Config(_) => err.to_string(),
    }
}

fn payload_message(payload: &ErrorPayload) -> Option<String> {
    match payload {
        ErrorPayload::Other(Value::Null) => None,
        other => non_blank(Some(other.message().as_str())),
    }
}

/// `message` field of a non-envelope JSON error body (framework default errors).
fn body_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    non_blank(value.get("message")?.as_str())
}

fn non_blank(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
