//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the session client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend API settings.
    pub api: ApiConfig,

    /// Where the credential pair is kept.
    pub credentials: CredentialConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every request path is appended to.
    pub base_url: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    /// Refresh-protocol endpoint, relative to `base_url`.
    pub refresh_path: String,

    /// Login entry point announced with a hard logout.
    pub login_redirect: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
            refresh_path: "/auth/refresh-token".to_string(),
            login_redirect: "/login".to_string(),
        }
    }
}

/// Credential storage backend.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process lifetime only.
    #[default]
    Memory,
    /// JSON file, survives restarts.
    File,
}

/// Credential store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CredentialConfig {
    pub backend: StoreBackend,

    /// File path for the `file` backend.
    pub path: Option<String>,

    /// Key holding the access token.
    pub access_key: String,

    /// Key holding the refresh token.
    pub refresh_key: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: None,
            access_key: "access_token".to_string(),
            refresh_key: "refresh_token".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus recorder.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
        }
    }
}
