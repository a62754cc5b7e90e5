//! Scheduler and actor error types

use crate::runtime::RuntimeState;
use thiserror::Error;

/// Failures of the scheduler runtime and its actors
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to spawn scheduler thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to build scheduler runtime: {0}")]
    RuntimeBuild(String),

    #[error("Scheduler is not accepting work (state: {state:?})")]
    NotRunning { state: RuntimeState },

    /// The job was dropped before it produced a result
    #[error("Scheduler stopped before the job completed")]
    Stopped,

    #[error("{operation} must not be called from the scheduler thread")]
    ReentrantCall { operation: &'static str },

    #[error("Scheduler thread panicked")]
    WorkerPanicked,

    #[error("Actor {actor_id} is no longer accepting requests")]
    ActorStopped { actor_id: String },
}

impl RuntimeError {
    pub fn reentrant(operation: &'static str) -> Self {
        Self::ReentrantCall { operation }
    }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
