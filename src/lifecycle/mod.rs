//! Session lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Refresh coordinator (refresh failed / no refresh token)
//!     → logout.rs (LogoutSignal::trigger)
//!     → broadcast to subscribers (CLI, UI shell)
//!     → subscribers navigate to the login entry point
//! ```
//!
//! # Design Decisions
//! - Exactly one event per ended session, regardless of queued requests
//! - The signal carries no return channel; callers already got their error

pub mod logout;

pub use logout::{LogoutEvent, LogoutReason, LogoutSignal};
