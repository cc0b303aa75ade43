//! Response classification.
//!
//! # Outcomes
//! ```text
//! transport error                        → OtherError(Network)
//! HTTP 401, request not yet retried      → AuthExpired
//! HTTP 401, request already retried      → OtherError(Http 401)   (terminal)
//! envelope, success=true, 2xx            → Success(data)
//! envelope, success=false                → DomainError(error, statusCode)
//! envelope that does not decode          → OtherError(Malformed)
//! 2xx without envelope                   → Success(raw body)
//! anything else                          → OtherError(Http status)
//! ```
//!
//! Only the transport status can trigger a refresh. An envelope reporting
//! `statusCode: 401` inside a 2xx response is a domain error.

use serde_json::Value;

use crate::errors::ApiError;
use crate::http::envelope::{looks_like_envelope, Envelope, ErrorPayload};
use crate::http::request::RequestDescriptor;
use crate::http::transport::{RawResponse, TransportError};

/// HTTP status that signals an expired access credential.
pub const UNAUTHORIZED: u16 = 401;

/// Classified result of one request attempt.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Unwrapped envelope data (or the raw body when no envelope was sent).
    Success(Value),
    /// The backend answered with `success=false`.
    DomainError {
        payload: Option<ErrorPayload>,
        status: u16,
        message: Option<String>,
    },
    /// Credential expired and the request is still eligible for one refresh.
    AuthExpired,
    /// Terminal failure not handled by this layer.
    OtherError(ApiError),
}

impl Outcome {
    /// Collapse into a caller-facing result. `AuthExpired` becomes a terminal 401.
    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::DomainError {
                payload,
                status,
                message,
            } => Err(ApiError::Domain {
                status,
                payload,
                message,
            }),
            Outcome::AuthExpired => Err(ApiError::Http {
                status: UNAUTHORIZED,
                body: None,
            }),
            Outcome::OtherError(err) => Err(err),
        }
    }
}

/// Classify the result of sending `request`.
pub fn classify(request: &RequestDescriptor, result: Result<RawResponse, TransportError>) -> Outcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => return Outcome::OtherError(ApiError::Network(e.to_string())),
    };

    if response.status == UNAUTHORIZED {
        if !request.retried {
            return Outcome::AuthExpired;
        }
        tracing::debug!(request_id = %request.id, "401 after refresh retry, giving up");
        return Outcome::OtherError(ApiError::Http {
            status: UNAUTHORIZED,
            body: non_empty(&response.body),
        });
    }

    let parsed = if response.body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(&response.body).ok()
    };

    match parsed {
        Some(value) if looks_like_envelope(&value) => unwrap_envelope(value, response.status),
        Some(value) if response.is_success() => Outcome::Success(value),
        None if response.is_success() => {
            if response.body.trim().is_empty() {
                Outcome::Success(Value::Null)
            } else {
                Outcome::Success(Value::String(response.body))
            }
        }
        _ => Outcome::OtherError(ApiError::Http {
            status: response.status,
            body: non_empty(&response.body),
        }),
    }
}

fn unwrap_envelope(value: Value, http_status: u16) -> Outcome {
    let envelope: Envelope = match serde_json::from_value(value) {
        Ok(env) => env,
        Err(e) => return Outcome::OtherError(ApiError::Malformed(e.to_string())),
    };

    if envelope.success && (200..300).contains(&http_status) {
        return Outcome::Success(envelope.data.unwrap_or(Value::Null));
    }

    Outcome::DomainError {
        payload: envelope.error,
        status: envelope.status_code.unwrap_or(http_status),
        message: envelope.message,
    }
}

fn non_empty(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}
