//! Request/response actor contract
//!
//! An [`RpcActor`] owns the state of a wrapped client and lives on the
//! scheduler thread. Each request is handed to [`RpcActor::handle`], which
//! returns a future resolving to the response. Replies may complete in any
//! order. Requests that need no actor state are answered by the associated
//! [`RpcActor::handle_now`] from whatever thread asks.

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::fmt;
use tlbridge_codec::{ApiError, TlBoxed};
use uuid::Uuid;

/// Pending reply to one request
pub type Reply<T> = LocalBoxFuture<'static, Result<T, ApiError>>;

/// Client state driven by the scheduler
#[async_trait(?Send)]
pub trait RpcActor: 'static {
    /// Request catalog
    type Function: TlBoxed + Send + 'static;
    /// Response catalog
    type Object: TlBoxed + Send + 'static;

    /// Accept one request; the returned future must not borrow `self`
    fn handle(&mut self, request: Self::Function) -> Reply<Self::Object>;

    /// Answer a request that needs no actor state
    ///
    /// Only called for requests where [`is_context_free`](Self::is_context_free)
    /// holds; must be safe on any thread.
    fn handle_now(request: Self::Function) -> Result<Self::Object, ApiError>;

    fn is_context_free(request: &Self::Function) -> bool;

    /// Called once on the scheduler thread before the first request
    async fn on_start(&mut self) -> Result<(), ApiError> {
        Ok(())
    }

    /// Called once after the last request was accepted
    async fn on_stop(&mut self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Unique actor identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorId {
    id: Uuid,
}

impl ActorId {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn uuid(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.id.simple())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}
