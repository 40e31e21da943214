//! Off-thread execution of sequence operations.
//!
//! [`Scheduler`] is the seam between the operations and whatever pool executes them. The
//! `*_async` methods of [`AsyncSeqExt`] take a scheduler explicitly rather than reaching for a
//! global, and the task combinators ([`when_all`], [`when_any`]) work with any [`Task`].

mod ext;
mod scheduler;

pub use scheduler::{PoolConfig, Scheduler, Task, TokioScheduler, WorkerPool};

pub use ext::{AsyncSeqExt, when_all, when_all_by, when_any, when_any_by};
