//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeout > 0, URL scheme, path shape)
//! - Check that the credential keys and backend are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::{ClientConfig, StoreBackend};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("api.base_url '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("api.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("{field} must start with '/' (got '{value}')")]
    RelativePath { field: &'static str, value: String },

    #[error("credentials.{0} must not be empty")]
    EmptyKey(&'static str),

    #[error("credentials.access_key and credentials.refresh_key must differ")]
    DuplicateKeys,

    #[error("credentials.path is required for the file backend")]
    MissingStorePath,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.api.base_url.clone())),
    }

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    for (field, value) in [
        ("api.refresh_path", &config.api.refresh_path),
        ("api.login_redirect", &config.api.login_redirect),
    ] {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field,
                value: value.clone(),
            });
        }
    }

    let creds = &config.credentials;
    if creds.access_key.trim().is_empty() {
        errors.push(ValidationError::EmptyKey("access_key"));
    }
    if creds.refresh_key.trim().is_empty() {
        errors.push(ValidationError::EmptyKey("refresh_key"));
    }
    if !creds.access_key.is_empty() && creds.access_key == creds.refresh_key {
        errors.push(ValidationError::DuplicateKeys);
    }
    if creds.backend == StoreBackend::File
        && creds.path.as_deref().map_or(true, |p| p.trim().is_empty())
    {
        errors.push(ValidationError::MissingStorePath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://example.com".into();
        config.api.timeout_secs = 0;
        config.api.refresh_path = "auth/refresh-token".into();
        config.credentials.refresh_key = "access_token".into();
        config.credentials.backend = StoreBackend::File;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ValidationError::ZeroTimeout));
        assert!(errors.contains(&ValidationError::DuplicateKeys));
        assert!(errors.contains(&ValidationError::MissingStorePath));
        assert!(errors.contains(&ValidationError::InvalidBaseUrl("ftp://example.com".into())));
    }

    #[test]
    fn test_empty_keys() {
        let mut config = ClientConfig::default();
        config.credentials.access_key = " ".into();
        config.credentials.refresh_key = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::EmptyKey("access_key")));
        assert!(errors.contains(&ValidationError::EmptyKey("refresh_key")));
        assert!(!errors.contains(&ValidationError::DuplicateKeys));
    }
}
