//! # tlbridge Client - Callback Bridge over a Scheduler-Bound Actor
//!
//! ## Purpose
//!
//! Exposes an [`RpcActor`](tlbridge_actors::RpcActor) to callers that cannot
//! run its scheduler: typed requests from any thread, continuations that
//! fire exactly once, and a flat C surface over framed TL bytes.
//!
//! ## Data Flow
//!
//! ```text
//! bytes ─► boundary::run_bytes ─► decode ─► Client::send ─► scheduler ─► actor
//!                                                                          │
//! caller ◄── ExecutionResult ◄── Frame ◄── encode / encode_error ◄─────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Every submitted request completes exactly once, even when it never
//!   reaches the actor ([`PendingRequest`] fires `Cancelled` on drop)
//! - Every buffer-returning entry point returns a well-formed frame
//! - Dropping a [`Client`] drains requests already posted before joining

pub mod boundary;
pub mod client;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod pending;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::Client;
pub use error::BridgeError;
pub use ffi::{release_response, Callback, ExecutionResult, ResponseHandle};
pub use logging::init_tracing;
pub use pending::{Continuation, PendingRequest};
pub use stats::{BridgeStats, StatsSnapshot};

#[doc(hidden)]
pub use paste;
