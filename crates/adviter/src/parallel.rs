//! Data-parallel `for_each` loops over arbitrary sequences.
//!
//! The loops hand elements to Rayon through `par_bridge`, so any `Send` iterator can be used as
//! a source; chunking, work stealing, and thread management are Rayon's. On top of that these
//! wrappers add the loop-control vocabulary callers expect from a parallel `for_each`:
//!
//! - [`LoopState::stop`] ends the loop as soon as possible.
//! - [`LoopState::break_loop`] lets lower indices finish and starts no higher ones.
//! - A [`CancellationToken`] in [`ParallelOptions`] aborts the loop with [`Error::Cancelled`].
//! - Thread-local accumulation through an init/body/finally triple.
//!
//! Indices are assigned in source order before elements are distributed, so an element's index
//! equals its position in the sequence. Without the `parallel` feature the same API runs
//! serially on the calling thread.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::parallel::*;

const NO_BREAK: u64 = u64::MAX;

/// Configuration shared by every parallel loop.
#[derive(Debug, Clone, Default)]
pub struct ParallelOptions {
    /// Maximum number of worker threads. `None` uses the global Rayon pool.
    pub max_degree_of_parallelism: Option<usize>,
    /// Token observed before every iteration.
    pub cancellation: Option<CancellationToken>,
}

impl ParallelOptions {
    /// Options limiting the loop to `threads` workers.
    pub fn with_max_degree(threads: usize) -> Self {
        Self {
            max_degree_of_parallelism: Some(threads),
            ..Self::default()
        }
    }

    /// Options observing `token`.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancellation: Some(token),
            ..Self::default()
        }
    }
}

/// Outcome of a parallel loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelLoopResult {
    /// `true` when every iteration ran and neither stop nor break was requested.
    pub completed: bool,
    /// Lowest index from which [`LoopState::break_loop`] was called, if any.
    pub lowest_break_iteration: Option<u64>,
}

/// Shared control flags for one loop invocation.
#[derive(Debug)]
struct LoopControl {
    stopped: AtomicBool,
    lowest_break: AtomicU64,
    cancellation: Option<CancellationToken>,
}

impl LoopControl {
    fn new(options: &ParallelOptions) -> Self {
        Self {
            stopped: AtomicBool::new(false),
            lowest_break: AtomicU64::new(NO_BREAK),
            cancellation: options.cancellation.clone(),
        }
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn lowest_break(&self) -> Option<u64> {
        match self.lowest_break.load(Ordering::Acquire) {
            NO_BREAK => None,
            index => Some(index),
        }
    }

    /// Decides whether the iteration at `index` may run. `Err` ends the whole loop.
    ///
    /// Indices are handed out in pull order, so once one lies past the lowest break every
    /// element still in the source does too.
    fn admit(&self, index: u64) -> std::result::Result<(), LoopExit> {
        if self.is_stopped()
            || self.is_cancelled()
            || index > self.lowest_break.load(Ordering::Acquire)
        {
            return Err(LoopExit);
        }
        Ok(())
    }

    fn after_body(&self) -> std::result::Result<(), LoopExit> {
        if self.is_stopped() || self.is_cancelled() {
            Err(LoopExit)
        } else {
            Ok(())
        }
    }

    fn finish(&self) -> Result<ParallelLoopResult> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let lowest_break_iteration = self.lowest_break();
        let result = ParallelLoopResult {
            completed: !self.is_stopped() && lowest_break_iteration.is_none(),
            lowest_break_iteration,
        };
        debug!(
            completed = result.completed,
            lowest_break = ?result.lowest_break_iteration,
            "parallel loop finished"
        );
        Ok(result)
    }
}

#[derive(Debug)]
struct LoopExit;

/// Per-iteration handle for controlling a running parallel loop.
#[derive(Debug, Clone, Copy)]
pub struct LoopState<'a> {
    control: &'a LoopControl,
    index: u64,
}

impl LoopState<'_> {
    /// Requests that the loop end as soon as possible. Iterations already running finish.
    pub fn stop(&self) {
        self.control.stopped.store(true, Ordering::Release);
    }

    /// Requests that no iteration after the current one start.
    ///
    /// Iterations with a lower index are unaffected.
    pub fn break_loop(&self) {
        self.control
            .lowest_break
            .fetch_min(self.index, Ordering::AcqRel);
    }

    /// Whether any iteration has called [`LoopState::stop`].
    pub fn is_stopped(&self) -> bool {
        self.control.is_stopped()
    }

    /// Lowest index that has called [`LoopState::break_loop`] so far.
    pub fn lowest_break_iteration(&self) -> Option<u64> {
        self.control.lowest_break()
    }

    /// Whether long-running bodies should return early.
    pub fn should_exit_current_iteration(&self) -> bool {
        self.control.is_stopped()
            || self.control.is_cancelled()
            || self.index > self.control.lowest_break.load(Ordering::Acquire)
    }

    /// Zero-based position of the current element in the source.
    pub fn iteration(&self) -> u64 {
        self.index
    }
}

fn run_loop<I, F>(source: I, options: &ParallelOptions, body: F) -> Result<ParallelLoopResult>
where
    I: IntoIterator,
    I::IntoIter: Send,
    I::Item: Send,
    F: Fn(I::Item, LoopState<'_>) + Sync + Send,
{
    let control = LoopControl::new(options);
    if control.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let iter = source.into_iter();
    let outcome = run_on_pool(options.max_degree_of_parallelism, || {
        iter.enumerate()
            .par_bridge()
            .try_for_each(|(position, item)| {
                let index = position as u64;
                control.admit(index)?;
                body(
                    item,
                    LoopState {
                        control: &control,
                        index,
                    },
                );
                control.after_body()
            })
    })?;
    if outcome.is_err() {
        debug!("parallel loop exited early");
    }
    control.finish()
}

fn run_local_loop<I, L, Init, B, Fin>(
    source: I,
    options: &ParallelOptions,
    init: Init,
    body: B,
    finally: Fin,
) -> Result<ParallelLoopResult>
where
    I: IntoIterator,
    I::IntoIter: Send,
    I::Item: Send,
    L: Send,
    Init: Fn() -> L + Sync + Send,
    B: Fn(I::Item, LoopState<'_>, L) -> L + Sync + Send,
    Fin: Fn(L) + Sync + Send,
{
    let control = LoopControl::new(options);
    if control.is_cancelled() {
        return Err(Error::Cancelled);
    }
    let iter = source.into_iter();
    run_on_pool(options.max_degree_of_parallelism, || {
        iter.enumerate()
            .par_bridge()
            .try_fold_local(&init, |local, (position, item)| {
                let index = position as u64;
                if control.admit(index).is_err() {
                    return ControlFlow::Break(local);
                }
                let local = body(
                    item,
                    LoopState {
                        control: &control,
                        index,
                    },
                    local,
                );
                match control.after_body() {
                    Ok(()) => ControlFlow::Continue(local),
                    Err(LoopExit) => ControlFlow::Break(local),
                }
            })
            .for_each(|flow| match flow {
                ControlFlow::Continue(local) | ControlFlow::Break(local) => finally(local),
            });
    })?;
    control.finish()
}

/// Parallel `for_each` wrappers for any sendable sequence.
///
/// Every method forwards to Rayon and returns once all admitted iterations have finished.
///
/// # Errors
///
/// * [`Error::Cancelled`] when the options' token is cancelled before or during the loop.
/// * [`Error::InvalidArgument`] when `max_degree_of_parallelism` is zero.
/// * [`Error::ThreadPool`] when a dedicated pool cannot be created.
pub trait ParallelSeqExt: IntoIterator + Sized {
    /// Runs `body` for every element in parallel.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use adviter::{ParallelOptions, ParallelSeqExt};
    ///
    /// let total = AtomicU32::new(0);
    /// let result = (1..=10u32).for_each_parallel(&ParallelOptions::default(), |n| {
    ///     total.fetch_add(n, Ordering::Relaxed);
    /// })?;
    /// assert!(result.completed);
    /// assert_eq!(total.into_inner(), 55);
    /// # Ok::<(), adviter::Error>(())
    /// ```
    fn for_each_parallel<F>(self, options: &ParallelOptions, body: F) -> Result<ParallelLoopResult>
    where
        Self::IntoIter: Send,
        Self::Item: Send,
        F: Fn(Self::Item) + Sync + Send,
    {
        run_loop(self, options, |item, _| body(item))
    }

    /// Runs `body` for every element in parallel, with access to the loop state.
    fn for_each_parallel_with_state<F>(
        self,
        options: &ParallelOptions,
        body: F,
    ) -> Result<ParallelLoopResult>
    where
        Self::IntoIter: Send,
        Self::Item: Send,
        F: Fn(Self::Item, LoopState<'_>) + Sync + Send,
    {
        run_loop(self, options, body)
    }

    /// Runs `body` for every element in parallel, passing the element's 64-bit index.
    fn for_each_parallel_indexed<F>(
        self,
        options: &ParallelOptions,
        body: F,
    ) -> Result<ParallelLoopResult>
    where
        Self::IntoIter: Send,
        Self::Item: Send,
        F: Fn(Self::Item, LoopState<'_>, u64) + Sync + Send,
    {
        run_loop(self, options, |item, state| {
            body(item, state, state.iteration())
        })
    }

    /// Runs a parallel loop with thread-local state.
    ///
    /// `init` creates a local value for each partition, `body` threads it through the
    /// partition's elements, and `finally` receives each partition's final value.
    fn for_each_parallel_local<L, Init, B, Fin>(
        self,
        options: &ParallelOptions,
        init: Init,
        body: B,
        finally: Fin,
    ) -> Result<ParallelLoopResult>
    where
        Self::IntoIter: Send,
        Self::Item: Send,
        L: Send,
        Init: Fn() -> L + Sync + Send,
        B: Fn(Self::Item, LoopState<'_>, L) -> L + Sync + Send,
        Fin: Fn(L) + Sync + Send,
    {
        run_local_loop(self, options, init, body, finally)
    }

    /// Like [`ParallelSeqExt::for_each_parallel_local`], passing the element's 64-bit index.
    fn for_each_parallel_local_indexed<L, Init, B, Fin>(
        self,
        options: &ParallelOptions,
        init: Init,
        body: B,
        finally: Fin,
    ) -> Result<ParallelLoopResult>
    where
        Self::IntoIter: Send,
        Self::Item: Send,
        L: Send,
        Init: Fn() -> L + Sync + Send,
        B: Fn(Self::Item, LoopState<'_>, u64, L) -> L + Sync + Send,
        Fin: Fn(L) + Sync + Send,
    {
        run_local_loop(
            self,
            options,
            init,
            |item, state, local| body(item, state, state.iteration(), local),
            finally,
        )
    }
}

impl<S: IntoIterator> ParallelSeqExt for S {}
