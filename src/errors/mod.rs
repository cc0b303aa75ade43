//! Error taxonomy for the session client.
//!
//! # Categories
//! - `AuthExpired` never leaves the client; it is recovered by a refresh
//! - `RefreshFailed` / `LoggedOut` are terminal and accompanied by a hard logout
//! - `Domain` carries the backend's envelope error to the caller
//! - `Network` / `Http` / `Malformed` surface as generic failures, never retried
//!
//! Presentation code turns any of these into one string via
//! [`normalize::user_message`].

pub mod normalize;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::http::envelope::ErrorPayload;

pub use normalize::user_message;

/// Failure of the refresh-protocol call.
///
/// `Clone` so a single failure can be handed to every queued request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    /// Backend rejected the refresh token (non-2xx or `success=false`).
    #[error("refresh rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The refresh endpoint answered with something that is not a credential pair.
    #[error("malformed refresh response: {0}")]
    Malformed(String),

    /// The refresh call never produced a response.
    #[error("refresh request failed: {0}")]
    Network(String),
}

/// Errors returned to callers of [`crate::ApiClient`].
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Envelope with `success=false`.
    #[error("request failed with status {status}{}", detail(.payload, .message))]
    Domain {
        status: u16,
        payload: Option<ErrorPayload>,
        /// Top-level envelope `message`, if the backend sent one.
        message: Option<String>,
    },

    /// Non-success HTTP status without an envelope, or a 401 after the one retry.
    #[error("unexpected HTTP status {status}")]
    Http { status: u16, body: Option<String> },

    /// Connection, timeout or other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// A body claimed to be an envelope but could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The refresh protocol failed; credentials were cleared.
    #[error("session refresh failed: {0}")]
    RefreshFailed(RefreshError),

    /// No refresh token was available; credentials were cleared.
    #[error("not logged in")]
    LoggedOut,

    /// The refresh this request was waiting on was torn down before it settled.
    #[error("request abandoned before the session refresh settled")]
    Abandoned,

    /// Client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

fn detail(payload: &Option<ErrorPayload>, message: &Option<String>) -> String {
    payload
        .as_ref()
        .map(ErrorPayload::message)
        .or_else(|| message.clone())
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl ApiError {
    /// HTTP status most relevant to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Domain { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::RefreshFailed(RefreshError::Rejected { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// True for failures that ended the session.
    pub fn is_hard_logout(&self) -> bool {
        matches!(self, ApiError::RefreshFailed(_) | ApiError::LoggedOut)
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ApiError>;
