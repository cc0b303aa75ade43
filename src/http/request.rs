//! Outbound request descriptors and credential tagging.
//!
//! A [`RequestDescriptor`] holds everything needed to (re)submit a call,
//! so a request that failed with 401 can be replayed after a refresh.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use crate::credentials::CredentialPair;

/// Header carrying the per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A replayable outbound request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Correlation ID, stable across the retry of the same request.
    pub id: Uuid,
    pub method: Method,
    /// Path relative to the configured base URL (e.g. `/orders`).
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    /// One-shot guard: set once the request has been handed to the refresh path.
    pub retried: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header; invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Ignoring invalid request header"),
        }
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any previous value.
    ///
    /// Returns false (and leaves the request untouched) when the token is not
    /// a legal header value.
    pub fn authorize(&mut self, access_token: &str) -> bool {
        match HeaderValue::from_str(&format!("Bearer {}", access_token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
                true
            }
            Err(_) => {
                tracing::warn!(request_id = %self.id, "Access token is not a valid header value, sending untagged");
                false
            }
        }
    }

    /// Current bearer token on the request, if any.
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }
}

/// Attach the current access token, if any, to an outbound request.
pub fn tag(request: &mut RequestDescriptor, credentials: Option<&CredentialPair>) {
    if let Some(pair) = credentials {
        request.authorize(&pair.access_token);
    }
}
