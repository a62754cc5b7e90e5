//! Actor Task Runner
//!
//! [`ActorOwn`] spawns an [`RpcActor`] as a local task on the scheduler
//! thread and owns the sending half of its mailbox. The task accepts requests
//! in mailbox order and spawns each reply future separately, so slow requests
//! do not hold back fast ones.
//!
//! Dropping the handle closes the mailbox. Requests already queued are still
//! accepted, then `on_stop` runs and the task exits; reply futures that are
//! still pending finish on the `LocalSet` while the scheduler drains.

use crate::actor::{ActorId, RpcActor};
use crate::error::{Result, RuntimeError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tlbridge_codec::{ApiError, TlBoxed};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

/// Completion callback for one request
pub type ReplyTo<T> = Box<dyn FnOnce(Result<T, ApiError>) + Send + 'static>;

struct Envelope<A: RpcActor> {
    request: A::Function,
    reply_to: ReplyTo<A::Object>,
}

/// Per-actor counters
#[derive(Debug, Default)]
pub struct ActorMetrics {
    requests_accepted: AtomicU64,
    replies_ok: AtomicU64,
    replies_failed: AtomicU64,
}

impl ActorMetrics {
    pub fn requests_accepted(&self) -> u64 {
        self.requests_accepted.load(Ordering::Relaxed)
    }

    pub fn replies_ok(&self) -> u64 {
        self.replies_ok.load(Ordering::Relaxed)
    }

    pub fn replies_failed(&self) -> u64 {
        self.replies_failed.load(Ordering::Relaxed)
    }

    fn record_reply<T>(&self, result: &Result<T, ApiError>) {
        let counter = if result.is_ok() {
            &self.replies_ok
        } else {
            &self.replies_failed
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Owning handle to a running actor
pub struct ActorOwn<A: RpcActor> {
    id: ActorId,
    mailbox: mpsc::UnboundedSender<Envelope<A>>,
    metrics: Arc<ActorMetrics>,
}

impl<A: RpcActor> ActorOwn<A> {
    /// Spawn `actor` on the current `LocalSet`
    ///
    /// Must be called from a scheduler job.
    pub fn spawn(actor: A) -> Self {
        let id = ActorId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let metrics = Arc::new(ActorMetrics::default());

        let task = ActorTask {
            id: id.clone(),
            actor,
            mailbox: rx,
            metrics: Arc::clone(&metrics),
        };
        tokio::task::spawn_local(task.run());

        debug!(
            actor_id = %id,
            actor_type = std::any::type_name::<A>(),
            "Actor spawned"
        );

        Self {
            id,
            mailbox: tx,
            metrics,
        }
    }

    pub fn id(&self) -> &ActorId {
        &self.id
    }

    pub fn metrics(&self) -> &ActorMetrics {
        &self.metrics
    }

    /// Queue `request`; `reply_to` is called once with the outcome
    ///
    /// On error the request and `reply_to` are dropped without a call.
    pub fn send<F>(&self, request: A::Function, reply_to: F) -> Result<()>
    where
        F: FnOnce(Result<A::Object, ApiError>) + Send + 'static,
    {
        self.mailbox
            .send(Envelope {
                request,
                reply_to: Box::new(reply_to),
            })
            .map_err(|_| RuntimeError::ActorStopped {
                actor_id: self.id.to_string(),
            })
    }

    /// True once the actor task has exited
    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }
}

impl<A: RpcActor> Drop for ActorOwn<A> {
    fn drop(&mut self) {
        debug!(actor_id = %self.id, "Actor handle released");
    }
}

struct ActorTask<A: RpcActor> {
    id: ActorId,
    actor: A,
    mailbox: mpsc::UnboundedReceiver<Envelope<A>>,
    metrics: Arc<ActorMetrics>,
}

impl<A: RpcActor> ActorTask<A> {
    async fn run(mut self) {
        let task_start = Instant::now();
        info!(
            actor_id = %self.id,
            task_type = "ActorTask",
            "Starting actor task execution"
        );

        if let Err(e) = self.actor.on_start().await {
            error!(
                actor_id = %self.id,
                error = %e,
                startup_duration_ms = task_start.elapsed().as_millis(),
                "Actor failed to start during initialization"
            );
            return;
        }

        while let Some(Envelope { request, reply_to }) = self.mailbox.recv().await {
            let request_type = request.type_name();
            trace!(actor_id = %self.id, request_type, "Dispatching request");
            self.metrics.requests_accepted.fetch_add(1, Ordering::Relaxed);

            let reply = self.actor.handle(request);
            let metrics = Arc::clone(&self.metrics);
            let actor_id = self.id.clone();
            tokio::task::spawn_local(async move {
                let result = reply.await;
                if let Err(e) = &result {
                    debug!(
                        actor_id = %actor_id,
                        request_type,
                        code = e.code,
                        message = %e.message,
                        "Request failed"
                    );
                }
                metrics.record_reply(&result);
                reply_to(result);
            });
        }

        if let Err(e) = self.actor.on_stop().await {
            warn!(
                actor_id = %self.id,
                error = %e,
                "Actor failed to stop cleanly during shutdown"
            );
        }

        info!(
            actor_id = %self.id,
            requests_accepted = self.metrics.requests_accepted(),
            total_runtime_ms = task_start.elapsed().as_millis(),
            "Actor task execution completed"
        );
    }
}
