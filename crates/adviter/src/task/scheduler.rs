//! Dispatch of blocking units of work onto a worker pool.
//!
//! A [`Scheduler`] accepts a closure and returns a [`Task`], a future resolving to the closure's
//! result. The provided implementation, [`TokioScheduler`], runs work on tokio's blocking
//! thread pool. [`WorkerPool`] owns a dedicated runtime for callers that are not already inside
//! one and want an explicit start/shutdown lifecycle.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Submits units of work and hands back futures of their results.
pub trait Scheduler {
    /// Runs a fallible unit of work off the calling thread.
    ///
    /// The returned task resolves to the work's own `Result`, or to
    /// [`Error::TaskPanicked`]/[`Error::TaskCancelled`] when it never completed.
    fn spawn_try<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static;

    /// Runs an infallible unit of work off the calling thread.
    fn spawn<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.spawn_try(move || Ok(work()))
    }
}

impl<S: Scheduler> Scheduler for &S {
    fn spawn_try<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        (**self).spawn_try(work)
    }
}

impl<S: Scheduler> Scheduler for Arc<S> {
    fn spawn_try<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        (**self).spawn_try(work)
    }
}

/// Future of a unit of work submitted to a [`Scheduler`].
///
/// Dropping a `Task` detaches it; the work still runs to completion.
#[must_use = "tasks report their result only when awaited"]
#[derive(Debug)]
pub struct Task<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T> Task<T> {
    fn new(handle: JoinHandle<Result<T>>) -> Self {
        Self { handle }
    }

    /// Returns `true` once the unit of work has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Requests cancellation. Work that already started on a blocking thread still completes,
    /// but awaiting the task then reports [`Error::TaskCancelled`] if it had not begun.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl<T> Future for Task<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(err)) => Poll::Ready(Err(join_failure(err))),
        }
    }
}

fn join_failure(err: JoinError) -> Error {
    if err.is_panic() {
        Error::TaskPanicked {
            message: panic_message(err.into_panic()),
        }
    } else {
        Error::TaskCancelled
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => match payload.downcast::<&'static str>() {
            Ok(message) => (*message).to_string(),
            Err(_) => "non-string panic payload".to_string(),
        },
    }
}

/// Scheduler backed by a tokio runtime's blocking thread pool.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler that submits work through `handle`.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// [`Error::NoRuntime`] when called outside of a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| Error::NoRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn spawn_try<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        trace!(
            result = std::any::type_name::<T>(),
            "dispatching unit of work to blocking pool"
        );
        Task::new(self.handle.spawn_blocking(work))
    }
}

/// Settings for a dedicated [`WorkerPool`].
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of async worker threads. `None` uses one per core.
    pub worker_threads: Option<usize>,
    /// Upper bound on blocking threads used for submitted work. `None` uses tokio's default.
    pub max_blocking_threads: Option<usize>,
    /// How long an idle blocking thread is kept alive. `None` uses tokio's default.
    pub keep_alive: Option<Duration>,
    /// Name given to every pool thread.
    pub thread_name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_blocking_threads: None,
            keep_alive: None,
            thread_name: "adviter-worker".to_string(),
        }
    }
}

/// A process-wide worker pool with an explicit lifecycle.
///
/// Create one at startup, hand out [`WorkerPool::scheduler`] clones, and call
/// [`WorkerPool::shutdown`] before exit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use adviter::{AsyncSeqExt, PoolConfig, WorkerPool};
///
/// let pool = WorkerPool::new(&PoolConfig::default())?;
/// let scheduler = pool.scheduler();
/// let found = pool.block_on(vec![1, 1, 2].contains_exactly_async(&scheduler, 1, 2))?;
/// assert!(found);
/// pool.shutdown(Duration::from_secs(1));
/// # Ok::<(), adviter::Error>(())
/// ```
#[derive(Debug)]
pub struct WorkerPool {
    runtime: Runtime,
}

impl WorkerPool {
    /// Starts a multi-threaded runtime configured by `config`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] when a thread count is zero.
    /// * [`Error::Runtime`] when the operating system refuses to start the threads.
    pub fn new(config: &PoolConfig) -> Result<Self> {
        let mut builder = Builder::new_multi_thread();
        builder.thread_name(config.thread_name.clone()).enable_all();

        if let Some(workers) = config.worker_threads {
            if workers == 0 {
                return Err(Error::invalid_argument("worker_threads", "must be greater than zero"));
            }
            builder.worker_threads(workers);
        }
        if let Some(blocking) = config.max_blocking_threads {
            if blocking == 0 {
                return Err(Error::invalid_argument(
                    "max_blocking_threads",
                    "must be greater than zero",
                ));
            }
            builder.max_blocking_threads(blocking);
        }
        if let Some(keep_alive) = config.keep_alive {
            builder.thread_keep_alive(keep_alive);
        }

        let runtime = builder.build()?;
        debug!(
            worker_threads = ?config.worker_threads,
            max_blocking_threads = ?config.max_blocking_threads,
            "worker pool started"
        );
        Ok(Self { runtime })
    }

    /// Returns a scheduler submitting work to this pool.
    pub fn scheduler(&self) -> TokioScheduler {
        TokioScheduler::new(self.runtime.handle().clone())
    }

    /// Drives `future` to completion on this pool, blocking the calling thread.
    ///
    /// Must not be called from within an async context.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Stops the pool, waiting up to `timeout` for running work to finish.
    pub fn shutdown(self, timeout: Duration) {
        debug!(?timeout, "shutting down worker pool");
        self.runtime.shutdown_timeout(timeout);
    }
}

impl Scheduler for WorkerPool {
    fn spawn_try<T, F>(&self, work: F) -> Task<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        Task::new(self.runtime.spawn_blocking(work))
    }
}
