//! Exactly-once continuation guard
//!
//! A [`PendingRequest`] pairs one request with its continuation. It is
//! completed at most once by [`PendingRequest::complete`]; if it is dropped
//! first, wherever that happens (a refused job, a closed mailbox, a scheduler
//! shutting down), the continuation fires with [`BridgeError::Cancelled`].

use crate::error::BridgeError;
use crate::stats::BridgeStats;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Continuation for one request
pub type Continuation<T> = Box<dyn FnOnce(Result<T, BridgeError>) + Send + 'static>;

pub struct PendingRequest<T> {
    request_type: &'static str,
    continuation: Option<Continuation<T>>,
    stats: Arc<BridgeStats>,
}

impl<T> PendingRequest<T> {
    pub(crate) fn new<C>(request_type: &'static str, stats: Arc<BridgeStats>, continuation: C) -> Self
    where
        C: FnOnce(Result<T, BridgeError>) + Send + 'static,
    {
        stats.record_submitted();
        Self {
            request_type,
            continuation: Some(Box::new(continuation)),
            stats,
        }
    }

    pub fn request_type(&self) -> &'static str {
        self.request_type
    }

    pub fn complete(mut self, result: Result<T, BridgeError>) {
        self.fire(result);
    }

    fn fire(&mut self, result: Result<T, BridgeError>) {
        let Some(continuation) = self.continuation.take() else {
            return;
        };
        let cancelled = matches!(result, Err(BridgeError::Cancelled));
        self.stats.record_finished(result.is_ok(), cancelled);
        trace!(
            request_type = self.request_type,
            ok = result.is_ok(),
            "Firing continuation"
        );
        continuation(result);
    }
}

impl<T> Drop for PendingRequest<T> {
    fn drop(&mut self) {
        if self.continuation.is_some() {
            debug!(
                request_type = self.request_type,
                "Pending request dropped before completion"
            );
            self.fire(Err(BridgeError::Cancelled));
        }
    }
}

impl<T> fmt::Debug for PendingRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRequest")
            .field("request_type", &self.request_type)
            .field("completed", &self.continuation.is_none())
            .finish()
    }
}
