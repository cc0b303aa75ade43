//! Credential storage subsystem.
//!
//! # Data Flow
//! ```text
//! login / register / refresh success
//!     → CredentialStore::set (both tokens)
//!     → KeyValueStore backend (memory.rs or file.rs)
//!
//! logout / refresh failure / missing refresh token
//!     → CredentialStore::clear (idempotent)
//! ```
//!
//! # Design Decisions
//! - Tokens are opaque; no parsing or expiry checks
//! - A half-present pair reads as absent
//! - Only the refresh coordinator and the auth API mutate the store

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{CredentialPair, CredentialStore, KeyValueStore};
