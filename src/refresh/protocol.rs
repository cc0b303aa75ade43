//! Refresh-protocol call.
//!
//! `POST {base}/auth/refresh-token` with `{ "refreshToken": ... }`, answered
//! by an `Envelope<AuthResponse>`. The call goes straight to the raw
//! [`Transport`]: no tagging, no classification, so a 401 here can never
//! recurse into another refresh.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::types::{AuthResponse, RefreshTokenRequest};
use crate::credentials::CredentialPair;
use crate::errors::RefreshError;
use crate::http::envelope::Envelope;
use crate::http::request::RequestDescriptor;
use crate::http::transport::Transport;

/// Exchanges a refresh token for a new credential pair.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError>;
}

/// [`TokenRefresher`] speaking the backend's refresh endpoint.
pub struct HttpRefresher {
    transport: Arc<dyn Transport>,
    path: String,
}

impl HttpRefresher {
    pub fn new(transport: Arc<dyn Transport>, path: impl Into<String>) -> Self {
        Self {
            transport,
            path: path.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<CredentialPair, RefreshError> {
        let body = serde_json::to_value(RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        })
        .map_err(|e| RefreshError::Malformed(e.to_string()))?;
        let request = RequestDescriptor::post(self.path.clone(), body);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| RefreshError::Network(e.to_string()))?;

        let envelope: Option<Envelope<AuthResponse>> = serde_json::from_str(&response.body).ok();

        if !response.is_success() {
            let message = envelope
                .and_then(|env| env.error.map(|e| e.message()).or(env.message))
                .unwrap_or_else(|| format!("HTTP {}", response.status));
            return Err(RefreshError::Rejected {
                status: response.status,
                message,
            });
        }

        let envelope = envelope.ok_or_else(|| {
            RefreshError::Malformed("refresh response is not an auth envelope".to_string())
        })?;

        if !envelope.success {
            return Err(RefreshError::Rejected {
                status: envelope.status_code.unwrap_or(response.status),
                message: envelope
                    .error
                    .map(|e| e.message())
                    .or(envelope.message)
                    .unwrap_or_else(|| "refresh rejected".to_string()),
            });
        }

        let auth = envelope
            .data
            .ok_or_else(|| RefreshError::Malformed("refresh response carries no data".to_string()))?;
        if auth.access_token.is_empty() || auth.refresh_token.is_empty() {
            return Err(RefreshError::Malformed("refresh response carries an empty token".to_string()));
        }

        Ok(CredentialPair::new(auth.access_token, auth.refresh_token))
    }
}
