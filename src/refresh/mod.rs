//! Credential refresh subsystem.
//!
//! # Data Flow
//! ```text
//! classifier → AuthExpired(request)
//!     → coordinator.rs (leader or queued follower)
//!     → protocol.rs (one POST /auth/refresh-token, raw transport)
//!     → coordinator.rs (store pair / clear + hard logout)
//!     → Retry { request } back to the client, one resubmission each
//! ```

pub mod coordinator;
pub mod protocol;

pub use coordinator::{RefreshCoordinator, Retry};
pub use protocol::{HttpRefresher, TokenRefresher};
