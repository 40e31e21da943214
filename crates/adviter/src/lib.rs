//! # AdvIter
//!
//! **AdvIter** is a library of extension operators for Rust sequences. It adds the checks and adapters that come up repeatedly in application code but are missing from `Iterator`, offers async wrappers that move blocking sequence work onto a worker pool, and provides parallel `for_each` loops with cooperative stop and break. Every operator validates its arguments up front and reports failures through a single typed [`Error`].
//!
//! ## Features
//!
//! - **Bounded occurrence checks** – `contains_exactly`, `contains_at_least`, and `contains_at_most` stop reading the source as soon as the answer is known, so they work on very long and even unbounded sequences.
//! - **Lazy adapters** – Conditional projection (`select_if`), multi-sequence concatenation, flattening with an optional selector, and set difference, all exposed through [`SeqExt`] and composable with the standard iterator adapters.
//! - **Checked aggregation** – Averages that report [`Error::EmptySequence`] and [`Error::Overflow`] instead of dividing by zero or wrapping.
//! - **Async wrappers** – [`AsyncSeqExt`] runs any sequence operation on a [`Scheduler`] and returns an awaitable [`Task`]; [`WorkerPool`] gives applications an explicit pool lifecycle.
//! - **Parallel loops** – [`ParallelSeqExt`] drives a body over any sendable sequence on a Rayon pool with degree-of-parallelism limits, cancellation, and thread-local accumulation.

mod comparer;
mod error;
mod parallel;
mod seq;
mod task;
mod utils;

pub use comparer::{AsciiCaseInsensitive, DefaultComparer, EqualityComparer, KeyComparer};
pub use error::{Error, Result, require};
pub use parallel::{LoopState, ParallelLoopResult, ParallelOptions, ParallelSeqExt};
pub use seq::{
    Accumulator, Averageable, ConcatWith, Except, ExceptBy, FlattenWith, OccurrenceBound, SelectIf,
    SelectIfIndexed, SeqExt, TrySelectIf, concat_all,
};
pub use task::{
    AsyncSeqExt, PoolConfig, Scheduler, Task, TokioScheduler, WorkerPool, when_all, when_all_by,
    when_any, when_any_by,
};
