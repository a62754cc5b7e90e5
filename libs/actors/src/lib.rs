//! # tlbridge Actors - Single-Threaded Scheduler and Request Actors
//!
//! Runs the stateful half of a wrapped client on one dedicated thread.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐        ┌─────────────────────────────────┐
//! │   Caller threads     │  jobs  │   Scheduler thread (LocalSet)   │
//! │                      │ ─────► │                                 │
//! │  run_in_context      │  FIFO  │  SchedulerContext ─ ActorOwn    │
//! │  run_in_context_ext. │        │                       │         │
//! └──────────────────────┘        │                 ActorTask ──►   │
//!                                 │                 reply futures   │
//!                                 └─────────────────────────────────┘
//! ```
//!
//! - [`WorkerRuntime`] owns the thread and its job queue
//! - [`RpcActor`] is the contract a wrapped client implements
//! - [`ActorOwn`] spawns an actor on the scheduler and feeds its mailbox
//!
//! Actors never leave the scheduler thread, so they need not be `Send`.

pub mod actor;
pub mod error;
pub mod runtime;
pub mod system;

pub use actor::{ActorId, Reply, RpcActor};
pub use error::{Result, RuntimeError};
pub use runtime::{Job, RuntimeState, RuntimeStats, SchedulerContext, WorkerRuntime};
pub use system::{ActorMetrics, ActorOwn, ReplyTo};
