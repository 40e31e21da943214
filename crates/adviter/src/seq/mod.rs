//! Synchronous sequence operators.
//!
//! This module groups the lazy adapters (conditional projection, concatenation, flattening,
//! set difference) and the eager checks (bounded occurrence counting, averaging). Everything is
//! reachable through the [`SeqExt`] extension trait; the adapter types are exported so callers
//! can name them in signatures.

mod average;
mod concat;
mod except;
mod ext;
mod occurrence;
mod select;

pub use average::{Accumulator, Averageable};

pub use concat::{ConcatWith, FlattenWith, concat_all};

pub use except::{Except, ExceptBy};

pub use occurrence::OccurrenceBound;

pub use select::{SelectIf, SelectIfIndexed, TrySelectIf};

pub use ext::SeqExt;

pub(crate) use occurrence::contains;
