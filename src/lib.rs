//! Session-aware HTTP API client.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller
//!       │ RequestDescriptor
//!       ▼
//!   ┌────────┐   tag    ┌─────────────┐   send   ┌───────────┐
//!   │ client │────────▶│ credentials │          │ transport │────▶ backend
//!   │        │─────────────────────────────────▶│ (reqwest) │
//!   └───┬────┘                                  └─────┬─────┘
//!       │◀──────────── classify (envelope) ───────────┘
//!       │
//!       │ AuthExpired
//!       ▼
//!   ┌─────────────┐  one call  ┌──────────────────┐
//!   │ coordinator │───────────▶│ refresh protocol │────▶ POST /auth/refresh-token
//!   │ single-flight│◀───────────│                  │
//!   └──────┬──────┘            └──────────────────┘
//!          │ success: store pair, Retry each queued request once
//!          │ failure: clear store, reject queue, LogoutSignal
//!          ▼
//!      caller (data, domain error, or terminal error)
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod refresh;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{CredentialPair, CredentialStore};
pub use errors::{user_message, ApiError, ApiResult, RefreshError};
pub use http::RequestDescriptor;
pub use lifecycle::{LogoutEvent, LogoutReason, LogoutSignal};
