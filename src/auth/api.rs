//! Authentication endpoints.
//!
//! These go through the same pipeline as every other request; only the
//! refresh call bypasses it.

use reqwest::Method;

use crate::auth::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::client::ApiClient;
use crate::errors::{ApiError, ApiResult};
use crate::http::request::RequestDescriptor;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const ME_PATH: &str = "/auth/me";
pub const LOGOUT_PATH: &str = "/auth/logout";

impl ApiClient {
    /// Authenticate and store the returned credential pair.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.authenticate(LOGIN_PATH, request).await
    }

    /// Create an account and store the returned credential pair.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.authenticate(REGISTER_PATH, request).await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.send_as(RequestDescriptor::get(ME_PATH)).await
    }

    /// Tell the backend to revoke the session, then clear local credentials.
    ///
    /// Backend failures are logged and otherwise ignored.
    pub async fn logout(&self) {
        if let Err(e) = self.send(RequestDescriptor::new(Method::POST, LOGOUT_PATH)).await {
            tracing::warn!(error = %e, "Backend logout failed, clearing local session anyway");
        }
        self.credentials().clear();
        tracing::info!("Logged out");
    }

    async fn authenticate<B: serde::Serialize>(&self, path: &str, body: &B) -> ApiResult<AuthResponse> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Malformed(e.to_string()))?;
        let auth: AuthResponse = self.send_as(RequestDescriptor::post(path, body)).await?;

        self.credentials().set(&auth.credentials());
        tracing::info!(
            user = auth.user.as_ref().map(|u| u.email.as_str()).unwrap_or("-"),
            "Session established"
        );
        Ok(auth)
    }
}
