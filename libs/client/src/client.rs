//! Client Bridge
//!
//! [`Client`] owns one scheduler thread and one long-lived actor. Any thread
//! may submit requests with [`Client::send`]; the continuation fires exactly
//! once with the actor's result, on the scheduler thread, or synchronously
//! on the caller's thread when the request is refused up front.
//!
//! ## Lifecycle
//!
//! - Construction starts the scheduler and blocks until the actor exists
//! - Dropping the client releases the actor inside the scheduler, lets every
//!   request already posted finish, then joins the thread

use crate::error::BridgeError;
use crate::pending::PendingRequest;
use crate::stats::{BridgeStats, StatsSnapshot};
use std::sync::Arc;
use tlbridge_actors::{ActorId, ActorOwn, RpcActor, RuntimeError, WorkerRuntime};
use tlbridge_codec::TlBoxed;
use tlbridge_config::BridgeConfig;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Bridge to one actor running on a dedicated scheduler thread
pub struct Client<A: RpcActor> {
    runtime: WorkerRuntime<ActorOwn<A>>,
    stats: Arc<BridgeStats>,
    actor_id: ActorId,
    closed: bool,
}

impl<A: RpcActor> Client<A> {
    /// Start a client with default scheduler settings
    pub fn new<F>(factory: F) -> Result<Self, BridgeError>
    where
        F: FnOnce() -> A + Send + 'static,
    {
        Self::with_config(factory, &BridgeConfig::default())
    }

    /// Start a client; `factory` runs on the scheduler thread
    pub fn with_config<F>(factory: F, config: &BridgeConfig) -> Result<Self, BridgeError>
    where
        F: FnOnce() -> A + Send + 'static,
    {
        let runtime = WorkerRuntime::start(&config.scheduler)?;
        let actor_id = runtime.run_in_context(move |cx| {
            let actor = ActorOwn::spawn(factory());
            let id = actor.id().clone();
            cx.install(actor);
            id
        })?;

        info!(
            actor_id = %actor_id,
            thread = runtime.thread_name(),
            "Client created"
        );

        Ok(Self {
            runtime,
            stats: Arc::new(BridgeStats::default()),
            actor_id,
            closed: false,
        })
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Submit a request; never blocks
    ///
    /// An absent request fails immediately with `InvalidRequest` on the
    /// calling thread. Requests from one thread reach the actor in the order
    /// they were sent.
    pub fn send<C>(&self, request: Option<A::Function>, continuation: C)
    where
        C: FnOnce(Result<A::Object, BridgeError>) + Send + 'static,
    {
        let Some(request) = request else {
            self.stats.record_rejected();
            debug!(actor_id = %self.actor_id, "Rejecting absent request");
            continuation(Err(BridgeError::InvalidRequest));
            return;
        };

        let request_type = request.type_name();
        let pending = PendingRequest::new(request_type, Arc::clone(&self.stats), continuation);
        debug!(actor_id = %self.actor_id, request_type, "Submitting request");

        let posted = self.runtime.run_in_context_external(move |cx| {
            let Some(actor) = cx.get() else {
                return;
            };
            // The mailbox only closes on this thread, so the check holds for the send
            if actor.is_closed() {
                let error = RuntimeError::ActorStopped {
                    actor_id: actor.id().to_string(),
                };
                warn!(actor_id = %actor.id(), request_type, error = %error, "Actor is not running");
                pending.complete(Err(BridgeError::Runtime(error)));
                return;
            }
            if let Err(e) = actor.send(request, move |result| {
                pending.complete(result.map_err(BridgeError::Dispatch));
            }) {
                warn!(actor_id = %actor.id(), request_type, error = %e, "Actor refused request");
            }
        });

        if let Err(e) = posted {
            warn!(
                actor_id = %self.actor_id,
                request_type,
                error = %e,
                "Scheduler refused request"
            );
        }
    }

    /// Submit a request and await its result
    pub async fn request(&self, request: A::Function) -> Result<A::Object, BridgeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Some(request), move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or(Err(BridgeError::Cancelled))
    }

    /// Answer a context-free request on the calling thread
    ///
    /// Never touches the scheduler or the actor.
    pub fn execute(request: A::Function) -> Result<A::Object, BridgeError> {
        if !A::is_context_free(&request) {
            return Err(BridgeError::NotContextFree {
                type_name: request.type_name(),
            });
        }
        A::handle_now(request).map_err(BridgeError::Dispatch)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Requests submitted whose continuation has not fired yet
    pub fn pending(&self) -> u64 {
        self.stats.pending()
    }

    pub(crate) fn record_rejected(&self) {
        self.stats.record_rejected();
    }

    /// Shut down explicitly, reporting failures that `Drop` can only log
    pub fn close(mut self) -> Result<(), BridgeError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), BridgeError> {
        self.closed = true;
        let pending = self.stats.pending();
        if pending > 0 {
            warn!(
                actor_id = %self.actor_id,
                pending,
                "Client destroyed with pending requests, draining"
            );
        }
        self.runtime.shutdown()?;
        info!(actor_id = %self.actor_id, "Client destroyed");
        Ok(())
    }
}

impl<A: RpcActor> Drop for Client<A> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.shutdown() {
            error!(actor_id = %self.actor_id, error = %e, "Client shutdown failed");
        }
    }
}

impl<A: RpcActor> std::fmt::Debug for Client<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("actor_id", &self.actor_id)
            .field("runtime", &self.runtime)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Add, CountingActor, Fail, Function, Hold, Object, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tlbridge_codec::ApiError;

    type Outcome = Result<Object, BridgeError>;

    fn client() -> Client<CountingActor> {
        Client::new(CountingActor::default).unwrap()
    }

    fn value(outcome: Outcome) -> i32 {
        match outcome {
            Ok(Object::Value(Value { value })) => value,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_absent_request_fails_synchronously() {
        let client = client();
        let caller = thread::current().id();
        let (tx, rx) = mpsc::channel();

        client.send(None, move |result: Outcome| {
            let _ = tx.send((thread::current().id(), result));
        });

        let (fired_on, result) = rx.try_recv().unwrap();
        assert_eq!(fired_on, caller);
        assert!(matches!(result, Err(BridgeError::InvalidRequest)));
        assert_eq!(client.stats().rejected, 1);
        assert_eq!(client.stats().submitted, 0);
    }

    #[test]
    fn test_concurrent_sends_complete_exactly_once() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;

        let client = Arc::new(client());
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();

        let workers: Vec<_> = (0..THREADS)
            .map(|t| {
                let client = Arc::clone(&client);
                let fired = Arc::clone(&fired);
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let fired = Arc::clone(&fired);
                        let tx = tx.clone();
                        let tag = (t * PER_THREAD + i) as i32;
                        client.send(Some(Function::Hold(Hold { ms: 0, tag })), move |result| {
                            fired.fetch_add(1, Ordering::SeqCst);
                            let _ = tx.send(result.is_ok());
                        });
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        drop(tx);

        let outcomes: Vec<bool> = rx.iter().take(THREADS * PER_THREAD).collect();
        assert_eq!(outcomes.len(), THREADS * PER_THREAD);
        assert!(outcomes.iter().all(|ok| *ok));

        drop(client);
        assert_eq!(fired.load(Ordering::SeqCst), THREADS * PER_THREAD);
    }

    #[test]
    fn test_sends_from_one_thread_keep_order() {
        let client = client();
        let (tx, rx) = mpsc::channel();

        for tag in 1..=20 {
            let tx = tx.clone();
            client.send(Some(Function::Hold(Hold { ms: 0, tag })), move |result| {
                let _ = tx.send(value(result));
            });
        }

        let mut seen: Vec<i32> = (0..20)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        seen.sort_unstable();
        // Each value is tag * 1000 + arrival position at the actor
        for (index, value) in seen.iter().enumerate() {
            let tag = index as i32 + 1;
            assert_eq!(*value, tag * 1000 + tag);
        }
    }

    #[test]
    fn test_actor_error_is_passed_through() {
        let client = client();
        let (tx, rx) = mpsc::channel();

        client.send(Some(Function::Fail(Fail { code: 418 })), move |result| {
            let _ = tx.send(result);
        });

        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            Err(BridgeError::Dispatch(error)) => {
                assert_eq!(error, ApiError::new(418, "requested failure"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(client.stats().failed, 1);
    }

    #[test]
    fn test_execute_is_synchronous_and_context_free_only() {
        let add = Function::Add(Add { a: 2, b: 40 });
        assert_eq!(value(Client::<CountingActor>::execute(add.clone())), 42);
        assert_eq!(
            Client::<CountingActor>::execute(add.clone()).unwrap(),
            Client::<CountingActor>::execute(add).unwrap()
        );

        let err = Client::<CountingActor>::execute(Function::Hold(Hold { ms: 0, tag: 1 }))
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::NotContextFree {
                type_name: "test.hold"
            }
        ));
    }

    #[test]
    fn test_drop_drains_pending_requests() {
        let client = client();
        let (tx, rx) = mpsc::channel();

        client.send(Some(Function::Hold(Hold { ms: 50, tag: 9 })), move |result| {
            let _ = tx.send(result);
        });
        assert_eq!(client.pending(), 1);
        drop(client);

        assert_eq!(value(rx.try_recv().unwrap()), 9001);
    }

    #[test]
    fn test_close_reports_clean_shutdown() {
        let client = client();
        let actor_id = client.actor_id().to_string();
        assert!(actor_id.starts_with("actor-"));
        client.close().unwrap();
    }

    #[test]
    fn test_stopped_actor_reports_runtime_error() {
        let client = Client::new(CountingActor::refusing_start).unwrap();
        let (tx, rx) = mpsc::channel();

        // on_start fails asynchronously; resend until the mailbox is seen closed
        let mut outcome = None;
        for _ in 0..100 {
            let tx = tx.clone();
            client.send(Some(Function::Hold(Hold { ms: 0, tag: 1 })), move |result| {
                let _ = tx.send(result);
            });
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                Err(BridgeError::Cancelled) => thread::sleep(Duration::from_millis(10)),
                other => {
                    outcome = Some(other);
                    break;
                }
            }
        }

        match outcome {
            Some(Err(BridgeError::Runtime(RuntimeError::ActorStopped { actor_id }))) => {
                assert_eq!(actor_id, client.actor_id().to_string());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(client.pending(), 0);
    }

    #[tokio::test]
    async fn test_request_awaits_result() {
        let client = client();
        let outcome = client
            .request(Function::Hold(Hold { ms: 5, tag: 3 }))
            .await;
        assert_eq!(value(outcome), 3001);

        let outcome = client.request(Function::Add(Add { a: 1, b: 1 })).await;
        assert_eq!(value(outcome), 2);

        let stats = client.stats();
        assert_eq!(stats.submitted, 2);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 0);
    }
}
