//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! RequestDescriptor
//!     → request.rs (attach bearer token, request ID)
//!     → transport.rs (reqwest call, raw status + body)
//!     → envelope.rs (decode { success, data, error, statusCode })
//!     → classifier.rs (Success / DomainError / AuthExpired / OtherError)
//!     → [refresh coordinator on AuthExpired]
//! ```
//!
//! # Design Decisions
//! - Descriptors are cloneable so a failed request can be replayed
//! - The transport never interprets status codes; the classifier does
//! - Only a transport-level 401 counts as an expired credential

pub mod classifier;
pub mod envelope;
pub mod request;
pub mod transport;

pub use classifier::{classify, Outcome};
pub use envelope::{Envelope, ErrorPayload};
pub use request::{tag, RequestDescriptor, REQUEST_ID_HEADER};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
