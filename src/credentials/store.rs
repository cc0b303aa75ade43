//! Credential pair storage on top of a key-value backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::config::{CredentialConfig, StoreBackend};
use crate::credentials::{FileStore, MemoryStore};

/// Access + refresh token pair. Both are opaque strings.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl CredentialPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Process-wide credential store.
///
/// Reads only ever yield both tokens or neither.
#[derive(Clone)]
pub struct CredentialStore {
    backend: Arc<dyn KeyValueStore>,
    access_key: String,
    refresh_key: String,
}

impl CredentialStore {
    /// Create a store using the default key names.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_keys(backend, "access_token", "refresh_token")
    }

    pub fn with_keys(
        backend: Arc<dyn KeyValueStore>,
        access_key: impl Into<String>,
        refresh_key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            access_key: access_key.into(),
            refresh_key: refresh_key.into(),
        }
    }

    /// Create a store for the configured backend.
    pub fn from_config(config: &CredentialConfig) -> io::Result<Self> {
        let backend: Arc<dyn KeyValueStore> = match (config.backend, &config.path) {
            (StoreBackend::File, Some(path)) => Arc::new(FileStore::open(path)?),
            (StoreBackend::File, None) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file credential store requires a path",
                ))
            }
            (StoreBackend::Memory, _) => Arc::new(MemoryStore::new()),
        };
        Ok(Self::with_keys(backend, &config.access_key, &config.refresh_key))
    }

    pub fn get(&self) -> Option<CredentialPair> {
        let access_token = self.backend.get(&self.access_key)?;
        let refresh_token = self.backend.get(&self.refresh_key)?;
        Some(CredentialPair {
            access_token,
            refresh_token,
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.get().map(|pair| pair.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.get().map(|pair| pair.refresh_token)
    }

    pub fn set(&self, pair: &CredentialPair) {
        let result = self
            .backend
            .set(&self.access_key, &pair.access_token)
            .and_then(|_| self.backend.set(&self.refresh_key, &pair.refresh_token));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist credentials");
        }
    }

    /// Remove both tokens. Idempotent.
    pub fn clear(&self) {
        for key in [&self.access_key, &self.refresh_key] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(error = %e, key = %key, "Failed to remove credential");
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("access_key", &self.access_key)
            .field("refresh_key", &self.refresh_key)
            .field("present", &!self.is_empty())
            .finish()
    }
}
