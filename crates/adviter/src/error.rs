//! Shared error type returned by every sequence, task, and parallel-loop operation.
//!
//! Argument validation happens eagerly, before a sequence is consumed. Failures raised while a
//! lazy iterator is being pulled are not represented here; they belong to the caller's own
//! error type and travel through the iterator items instead.

use std::borrow::Cow;

use thiserror::Error;

/// Error conditions surfaced by `adviter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A required sequence or function argument was absent.
    #[error("required argument '{argument}' was not supplied")]
    NullInput { argument: &'static str },

    /// A numeric argument violated its documented constraint.
    #[error("invalid value for '{argument}': {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: Cow<'static, str>,
    },

    /// An aggregation that needs at least one element received none.
    #[error("{operation} requires a non-empty sequence")]
    EmptySequence { operation: &'static str },

    /// Numeric accumulation left the representable range.
    #[error("arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },

    /// Two elements projected onto the same map key.
    #[error("an element with the key '{key}' has already been added")]
    DuplicateKey { key: String },

    /// A parallel loop observed its cancellation token before completing.
    #[error("the operation was cancelled")]
    Cancelled,

    /// The unit of work submitted to a scheduler panicked.
    #[error("background task panicked: {message}")]
    TaskPanicked { message: String },

    /// The runtime dropped the unit of work before it ran to completion.
    #[error("background task was cancelled before completion")]
    TaskCancelled,

    /// No tokio runtime is available on the calling thread.
    #[error("no async runtime is active on the current thread")]
    NoRuntime,

    /// The worker runtime could not be started.
    #[error("failed to start worker runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// A dedicated rayon pool could not be built.
    #[cfg(feature = "parallel")]
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Helper for constructing an [`Error::InvalidArgument`] variant.
    ///
    /// # Arguments
    ///
    /// * `argument` - Name of the offending parameter.
    /// * `reason` - Human-readable description of the violated constraint.
    pub fn invalid_argument(argument: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Helper for constructing an [`Error::DuplicateKey`] variant from any debuggable key.
    pub fn duplicate_key(key: &impl std::fmt::Debug) -> Self {
        Self::DuplicateKey {
            key: format!("{key:?}"),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Unwraps an optional argument, reporting [`Error::NullInput`] when it is absent.
///
/// Owned iterators cannot be null, but callers holding an `Option` of a sequence or closure
/// can funnel it through here to get the same failure the rest of the crate reports.
///
/// # Examples
///
/// ```
/// use adviter::{SeqExt, require};
///
/// let maybe: Option<Vec<i32>> = Some(vec![1, 1, 2]);
/// let found = require(maybe, "source")?.contains_exactly(&1, 2)?;
/// assert!(found);
/// # Ok::<(), adviter::Error>(())
/// ```
pub fn require<T>(value: Option<T>, argument: &'static str) -> Result<T> {
    value.ok_or(Error::NullInput { argument })
}

/// Converts a signed threshold into a count, rejecting negative values.
pub(crate) fn non_negative(argument: &'static str, value: i64) -> Result<usize> {
    if value < 0 {
        return Err(Error::invalid_argument(
            argument,
            format!("must be a non-negative integer, got {value}"),
        ));
    }
    usize::try_from(value).map_err(|_| {
        Error::invalid_argument(argument, format!("{value} exceeds the addressable range"))
    })
}
