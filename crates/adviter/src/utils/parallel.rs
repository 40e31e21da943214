//! Abstraction layer for parallel iteration.
//!
//! When the `parallel` feature is enabled, this module exports the Rayon primitives the loop
//! wrappers are built on and a helper for running work on a pool of a given size. When disabled,
//! it provides serial fallbacks with the same method names, so the loop code is written once.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{ParallelBridge, ParallelIterator};

#[cfg(feature = "parallel")]
pub use self::rayon_support::*;

#[cfg(not(feature = "parallel"))]
pub use self::fallback::*;

use crate::error::{Error, Result};

fn reject_zero_threads(threads: Option<usize>) -> Result<()> {
    if threads == Some(0) {
        return Err(Error::invalid_argument(
            "max_degree_of_parallelism",
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(feature = "parallel")]
mod rayon_support {
    use std::ops::ControlFlow;

    use rayon::iter::{ParallelIterator, TryFold};

    use crate::error::Result;

    /// Per-split accumulation that a split can leave early by returning `Break`.
    ///
    /// Both arms carry the accumulator, so every split hands its value downstream whether it
    /// ran to the end or not.
    pub trait TryFoldLocal: ParallelIterator {
        fn try_fold_local<T, ID, F>(
            self,
            identity: ID,
            op: F,
        ) -> TryFold<Self, ControlFlow<T, T>, ID, F>
        where
            T: Send,
            ID: Fn() -> T + Sync + Send,
            F: Fn(T, Self::Item) -> ControlFlow<T, T> + Sync + Send,
        {
            self.try_fold(identity, op)
        }
    }

    impl<I: ParallelIterator> TryFoldLocal for I {}

    /// Runs `op` on the global pool, or on a dedicated pool of `threads` workers.
    pub fn run_on_pool<R, OP>(threads: Option<usize>, op: OP) -> Result<R>
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        super::reject_zero_threads(threads)?;
        match threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("adviter-loop-{index}"))
                    .build()?;
                Ok(pool.install(op))
            }
            None => Ok(op()),
        }
    }
}

#[cfg(not(feature = "parallel"))]
mod fallback {
    pub use std::iter::Iterator as ParallelIterator;

    use std::ops::ControlFlow;

    use crate::error::Result;

    /// Shim trait to allow `par_bridge()` on Iterators.
    pub trait ParallelBridge: Iterator {
        fn par_bridge(self) -> Self;
    }

    impl<T: Iterator> ParallelBridge for T {
        fn par_bridge(self) -> Self {
            self
        }
    }

    /// Shim trait mirroring Rayon's `try_fold`, producing a single accumulator.
    pub trait TryFoldLocal: Iterator {
        fn try_fold_local<T, ID, F>(
            mut self,
            identity: ID,
            op: F,
        ) -> std::iter::Once<ControlFlow<T, T>>
        where
            Self: Sized,
            ID: Fn() -> T,
            F: Fn(T, Self::Item) -> ControlFlow<T, T>,
        {
            std::iter::once(self.try_fold(identity(), op))
        }
    }

    impl<I: Iterator> TryFoldLocal for I {}

    /// Runs `op` on the calling thread. The thread count is validated but otherwise unused.
    pub fn run_on_pool<R, OP>(threads: Option<usize>, op: OP) -> Result<R>
    where
        OP: FnOnce() -> R,
    {
        super::reject_zero_threads(threads)?;
        Ok(op())
    }
}
