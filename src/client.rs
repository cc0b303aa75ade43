//! Client facade.
//!
//! # Data Flow
//! ```text
//! caller → send(request)
//!     → tag (current access token, if any)
//!     → transport.send
//!     → classify
//!         Success / DomainError / OtherError → caller
//!         AuthExpired → coordinator.on_auth_expired
//!             → Retry { request } → transport.send → classify → caller
//!             → RefreshFailed / LoggedOut / Abandoned → caller
//! ```
//!
//! A resubmitted request carries `retried = true`, so a second 401 is
//! classified as a terminal `Http` error instead of re-entering the refresh.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::credentials::CredentialStore;
use crate::errors::{ApiError, ApiResult};
use crate::http::classifier::{classify, Outcome};
use crate::http::request::{tag, RequestDescriptor};
use crate::http::transport::{ReqwestTransport, Transport};
use crate::lifecycle::{LogoutEvent, LogoutSignal};
use crate::observability::metrics;
use crate::refresh::{HttpRefresher, RefreshCoordinator, TokenRefresher};

/// HTTP client that recovers from expired access tokens transparently.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    store: CredentialStore,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Build a client around an existing transport and store. The refresh
    /// call goes through the same transport.
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>, store: CredentialStore) -> Self {
        let refresher = Arc::new(HttpRefresher::new(
            transport.clone(),
            config.api.refresh_path.clone(),
        ));
        let logout = LogoutSignal::new(config.api.login_redirect.clone());
        Self::with_refresher(transport, store, refresher, logout)
    }

    pub fn with_refresher(
        transport: Arc<dyn Transport>,
        store: CredentialStore,
        refresher: Arc<dyn TokenRefresher>,
        logout: LogoutSignal,
    ) -> Self {
        let coordinator = Arc::new(RefreshCoordinator::new(store.clone(), refresher, logout));
        Self {
            transport,
            store,
            coordinator,
        }
    }

    /// Build the reqwest transport and the configured credential backend.
    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        let transport = ReqwestTransport::new(&config.api).map_err(|e| ApiError::Config(e.to_string()))?;
        let store = CredentialStore::from_config(&config.credentials)
            .map_err(|e| ApiError::Config(format!("credential store: {}", e)))?;

        tracing::debug!(base_url = %transport.base_url(), "API client ready");
        Ok(Self::new(config, Arc::new(transport), store))
    }

    /// Send a request and return the unwrapped envelope data.
    pub async fn send(&self, mut request: RequestDescriptor) -> ApiResult<Value> {
        let start = Instant::now();
        let method = request.method.to_string();
        let request_id = request.id;
        let path = request.path.clone();

        tag(&mut request, self.store.get().as_ref());
        let result = self.transport.send(&request).await;

        let outcome = match classify(&request, result) {
            Outcome::AuthExpired => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "Access token rejected");
                match self.coordinator.on_auth_expired(request).await {
                    Ok(retry) => {
                        let result = self.transport.send(&retry.request).await;
                        classify(&retry.request, result)
                    }
                    Err(e) => Outcome::OtherError(e),
                }
            }
            outcome => outcome,
        };

        let label = outcome_label(&outcome);
        metrics::record_request(&method, label, start);
        match &outcome {
            Outcome::Success(_) => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "Request succeeded");
            }
            Outcome::DomainError { status, .. } => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, status, "Request rejected by backend");
            }
            _ => {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, outcome = label, "Request failed");
            }
        }

        outcome.into_result()
    }

    /// [`send`](Self::send) and deserialize the data into `T`.
    pub async fn send_as<T: DeserializeOwned>(&self, request: RequestDescriptor) -> ApiResult<T> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.send(RequestDescriptor::get(path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.send(RequestDescriptor::post(path, body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.send(RequestDescriptor::put(path, body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.send(RequestDescriptor::delete(path)).await
    }

    /// Receive an event whenever the session is force-ended.
    pub fn subscribe_logout(&self) -> broadcast::Receiver<LogoutEvent> {
        self.coordinator.logout_signal().subscribe()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.store
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }
}

fn outcome_label(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Success(_) => "success",
        Outcome::DomainError { .. } => "domain_error",
        Outcome::AuthExpired => "auth_expired",
        Outcome::OtherError(e) if e.is_hard_logout() => "logged_out",
        Outcome::OtherError(ApiError::Network(_)) => "network_error",
        Outcome::OtherError(_) => "error",
    }
}
