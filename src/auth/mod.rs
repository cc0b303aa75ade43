//! Authentication API and payloads.
//!
//! # Data Flow
//! ```text
//! login / register → AuthResponse → CredentialStore::set
//! current_user     → GET /auth/me
//! logout           → POST /auth/logout (best effort) → CredentialStore::clear
//! ```

pub mod api;
pub mod types;

pub use types::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest, User};
