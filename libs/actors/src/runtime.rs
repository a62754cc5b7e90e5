//! Scheduler Runtime
//!
//! Owns one dedicated OS thread running a current-thread tokio runtime and a
//! `LocalSet`. Work submitted from any thread is queued as a job and executed
//! on that thread, one job at a time, in submission order. Jobs receive the
//! [`SchedulerContext`], which holds the single value (usually an actor
//! handle) that lives on the scheduler thread.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized → Running → Stopping → Stopped
//! ```
//!
//! Shutdown releases the context slot from inside the scheduler, stops the
//! job loop, drops jobs that arrive late, and drains every task spawned on the
//! `LocalSet` before the thread is joined. Jobs that never run are dropped,
//! so anything they own is released exactly once.

use crate::error::{Result, RuntimeError};
use futures::channel::oneshot;
use futures::executor::block_on;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tlbridge_config::SchedulerConfig;
use tokio::sync::mpsc;
use tokio::task::LocalSet;
use tracing::{debug, error, info, warn};

/// Scheduler lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum RuntimeState {
    Uninitialized = 0,
    Running = 1,
    Stopping = 2,
    Stopped = 3,
}

/// Unit of work executed on the scheduler thread
pub type Job<S> = Box<dyn FnOnce(&mut SchedulerContext<S>) + Send + 'static>;

#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new(state: RuntimeState) -> Self {
        Self(AtomicU8::new(state.into()))
    }

    fn load(&self) -> RuntimeState {
        RuntimeState::try_from(self.0.load(Ordering::Acquire)).unwrap_or(RuntimeState::Stopped)
    }

    fn store(&self, state: RuntimeState) {
        self.0.store(state.into(), Ordering::Release);
    }

    fn transition(&self, from: RuntimeState, to: RuntimeState) -> bool {
        self.0
            .compare_exchange(from.into(), to.into(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Marks the scheduler stopped when the thread exits, including by panic
struct StoppedOnExit(Arc<StateCell>);

impl Drop for StoppedOnExit {
    fn drop(&mut self) {
        self.0.store(RuntimeState::Stopped);
    }
}

/// Job counters
#[derive(Debug, Default)]
pub struct RuntimeStats {
    jobs_submitted: AtomicU64,
    jobs_executed: AtomicU64,
    jobs_discarded: AtomicU64,
}

impl RuntimeStats {
    pub fn jobs_submitted(&self) -> u64 {
        self.jobs_submitted.load(Ordering::Relaxed)
    }

    pub fn jobs_executed(&self) -> u64 {
        self.jobs_executed.load(Ordering::Relaxed)
    }

    /// Jobs dropped unexecuted because they arrived after the stop signal
    pub fn jobs_discarded(&self) -> u64 {
        self.jobs_discarded.load(Ordering::Relaxed)
    }
}

/// State visible to jobs on the scheduler thread
///
/// Holds at most one value of type `S`. The value is created, used and
/// dropped on the scheduler thread only, so `S` need not be `Send`.
pub struct SchedulerContext<S> {
    slot: Option<S>,
    stop_requested: bool,
}

impl<S> SchedulerContext<S> {
    fn new() -> Self {
        Self {
            slot: None,
            stop_requested: false,
        }
    }

    /// Install `value`, returning the previous occupant
    pub fn install(&mut self, value: S) -> Option<S> {
        self.slot.replace(value)
    }

    pub fn get(&self) -> Option<&S> {
        self.slot.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.slot.as_mut()
    }

    pub fn release(&mut self) -> Option<S> {
        self.slot.take()
    }

    pub fn is_installed(&self) -> bool {
        self.slot.is_some()
    }

    /// Spawn a task on the scheduler's `LocalSet`
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + 'static,
    {
        tokio::task::spawn_local(future);
    }

    /// End the job loop after the current job
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stopping(&self) -> bool {
        self.stop_requested
    }
}

/// Handle to the dedicated scheduler thread
pub struct WorkerRuntime<S: 'static> {
    name: String,
    jobs: mpsc::UnboundedSender<Job<S>>,
    state: Arc<StateCell>,
    stats: Arc<RuntimeStats>,
    thread_id: ThreadId,
    thread: Option<JoinHandle<()>>,
}

impl<S: 'static> WorkerRuntime<S> {
    /// Spawn the scheduler thread and wait until it accepts jobs
    pub fn start(config: &SchedulerConfig) -> Result<Self> {
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel::<Job<S>>();
        let state = Arc::new(StateCell::new(RuntimeState::Uninitialized));
        let stats = Arc::new(RuntimeStats::default());
        let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let worker_state = Arc::clone(&state);
        let worker_stats = Arc::clone(&stats);
        let thread = builder
            .spawn(move || scheduler_main(jobs_rx, worker_state, worker_stats, ready_tx))
            .map_err(RuntimeError::Spawn)?;

        let startup = block_on(ready_rx).unwrap_or(Err(RuntimeError::WorkerPanicked));
        if let Err(e) = startup {
            error!(thread = %config.thread_name, error = %e, "Scheduler failed to start");
            let _ = thread.join();
            return Err(e);
        }

        info!(
            thread = %config.thread_name,
            stack_size = ?config.stack_size,
            "Scheduler started"
        );

        Ok(Self {
            name: config.thread_name.clone(),
            jobs: jobs_tx,
            state,
            stats,
            thread_id: thread.thread().id(),
            thread: Some(thread),
        })
    }

    pub fn state(&self) -> RuntimeState {
        self.state.load()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn thread_name(&self) -> &str {
        &self.name
    }

    /// True when called from the scheduler thread itself
    pub fn is_scheduler_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Run `f` on the scheduler thread and block until it returns
    ///
    /// Fails with `ReentrantCall` when invoked from the scheduler thread,
    /// which would otherwise deadlock.
    pub fn run_in_context<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut SchedulerContext<S>) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.ensure_off_scheduler("run_in_context")?;

        let (tx, rx) = oneshot::channel();
        self.run_in_context_external(move |cx| {
            let _ = tx.send(f(cx));
        })?;

        block_on(rx).map_err(|_| RuntimeError::Stopped)
    }

    /// Queue `f` for the scheduler thread without waiting
    ///
    /// Usable from any thread, including the scheduler thread. When the
    /// scheduler is not running, `f` is dropped unexecuted.
    pub fn run_in_context_external<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut SchedulerContext<S>) + Send + 'static,
    {
        let state = self.state.load();
        if state != RuntimeState::Running {
            debug!(thread = %self.name, ?state, "Refusing job, scheduler not running");
            return Err(RuntimeError::NotRunning { state });
        }
        self.post(Box::new(f))
    }

    /// Stop the scheduler and join its thread; idempotent
    pub fn shutdown(&mut self) -> Result<()> {
        if self.thread.is_none() {
            return Ok(());
        }
        self.ensure_off_scheduler("shutdown")?;
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        self.state
            .transition(RuntimeState::Running, RuntimeState::Stopping);
        info!(thread = %self.name, "Stopping scheduler");

        // Queued ahead of this job, earlier work still runs first
        let _ = self.post(Box::new(|cx: &mut SchedulerContext<S>| {
            drop(cx.release());
            cx.stop();
        }));

        let joined = thread.join();
        self.state.store(RuntimeState::Stopped);

        match joined {
            Ok(()) => {
                info!(
                    thread = %self.name,
                    jobs_executed = self.stats.jobs_executed(),
                    jobs_discarded = self.stats.jobs_discarded(),
                    "Scheduler stopped"
                );
                Ok(())
            }
            Err(_) => {
                error!(thread = %self.name, "Scheduler thread panicked");
                Err(RuntimeError::WorkerPanicked)
            }
        }
    }

    fn post(&self, job: Job<S>) -> Result<()> {
        self.jobs.send(job).map_err(|_| RuntimeError::Stopped)?;
        self.stats.jobs_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn ensure_off_scheduler(&self, operation: &'static str) -> Result<()> {
        if self.is_scheduler_thread() {
            warn!(thread = %self.name, operation, "Blocking call from the scheduler thread");
            return Err(RuntimeError::reentrant(operation));
        }
        Ok(())
    }
}

impl<S: 'static> fmt::Debug for WorkerRuntime<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerRuntime")
            .field("name", &self.name)
            .field("state", &self.state.load())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<S: 'static> Drop for WorkerRuntime<S> {
    fn drop(&mut self) {
        if self.thread.is_none() {
            return;
        }
        if let Err(e) = self.shutdown() {
            // From the scheduler thread the join handle is detached; closing
            // the job queue still ends the loop once the current job returns
            error!(thread = %self.name, error = %e, "Scheduler shutdown during drop failed");
        }
    }
}

fn scheduler_main<S: 'static>(
    mut jobs: mpsc::UnboundedReceiver<Job<S>>,
    state: Arc<StateCell>,
    stats: Arc<RuntimeStats>,
    ready: oneshot::Sender<Result<()>>,
) {
    let _exit = StoppedOnExit(Arc::clone(&state));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let _ = ready.send(Err(RuntimeError::RuntimeBuild(e.to_string())));
            return;
        }
    };
    let local = LocalSet::new();
    let mut context = SchedulerContext::<S>::new();

    state.store(RuntimeState::Running);
    let _ = ready.send(Ok(()));
    debug!("Scheduler loop entered");

    local.block_on(&runtime, async {
        while let Some(job) = jobs.recv().await {
            job(&mut context);
            stats.jobs_executed.fetch_add(1, Ordering::Relaxed);
            if context.is_stopping() {
                break;
            }
        }
    });

    state.store(RuntimeState::Stopping);
    drop(context);

    jobs.close();
    let mut discarded = 0u64;
    while let Ok(job) = jobs.try_recv() {
        drop(job);
        discarded += 1;
    }
    if discarded > 0 {
        stats.jobs_discarded.fetch_add(discarded, Ordering::Relaxed);
        warn!(discarded, "Dropped jobs submitted after the stop signal");
    }

    // Let in-flight local tasks finish
    runtime.block_on(local);
    debug!("Scheduler loop drained");
}
