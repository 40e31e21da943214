//! Bounded occurrence checks: does a value appear exactly, at least, or at most `n` times?
//!
//! Every check consumes the source at most once and stops pulling elements as soon as the
//! answer is decided. Thresholds are validated before the first element is requested, so an
//! invalid threshold never advances the iterator.

use tracing::trace;

use crate::comparer::EqualityComparer;
use crate::error::{Result, non_negative};

/// The kind of bound applied to an occurrence count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceBound {
    /// The value must occur exactly `n` times.
    Exactly(i64),
    /// The value must occur `n` times or more.
    AtLeast(i64),
    /// The value must occur `n` times or fewer.
    AtMost(i64),
}

impl OccurrenceBound {
    /// Evaluates the bound against `source`, comparing elements to `value` with `comparer`.
    ///
    /// # Arguments
    ///
    /// * `source` - Sequence to scan. Consumed at most once.
    /// * `value` - The value being counted.
    /// * `comparer` - Equality capability applied as `comparer.equals(element, value)`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` when the number of matching elements satisfies the bound.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] when the threshold is negative. The source is
    /// not touched in that case.
    pub fn check<I, C>(self, source: I, value: &I::Item, comparer: &C) -> Result<bool>
    where
        I: IntoIterator,
        C: EqualityComparer<I::Item> + ?Sized,
    {
        match self {
            Self::Exactly(n) => exactly(source, value, non_negative("occurrences", n)?, comparer),
            Self::AtLeast(n) => at_least(source, value, non_negative("occurrences", n)?, comparer),
            Self::AtMost(n) => at_most(source, value, non_negative("occurrences", n)?, comparer),
        }
    }

    /// Returns the raw threshold carried by the bound.
    pub fn threshold(&self) -> i64 {
        match *self {
            Self::Exactly(n) | Self::AtLeast(n) | Self::AtMost(n) => n,
        }
    }
}

/// Plain membership test, stopping at the first match.
pub(crate) fn contains<I, C>(source: I, value: &I::Item, comparer: &C) -> bool
where
    I: IntoIterator,
    C: EqualityComparer<I::Item> + ?Sized,
{
    source
        .into_iter()
        .any(|element| comparer.equals(&element, value))
}

fn exactly<I, C>(source: I, value: &I::Item, n: usize, comparer: &C) -> Result<bool>
where
    I: IntoIterator,
    C: EqualityComparer<I::Item> + ?Sized,
{
    let mut count = 0usize;
    for element in source {
        if comparer.equals(&element, value) {
            count += 1;
            if count > n {
                trace!(threshold = n, "exact occurrence check exceeded threshold");
                return Ok(false);
            }
        }
    }
    Ok(count == n)
}

fn at_least<I, C>(source: I, value: &I::Item, n: usize, comparer: &C) -> Result<bool>
where
    I: IntoIterator,
    C: EqualityComparer<I::Item> + ?Sized,
{
    match n {
        0 => Ok(true),
        1 => Ok(contains(source, value, comparer)),
        _ => {
            let mut count = 0usize;
            for element in source {
                if comparer.equals(&element, value) {
                    count += 1;
                    if count >= n {
                        trace!(threshold = n, "minimum occurrence check satisfied early");
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        }
    }
}

fn at_most<I, C>(source: I, value: &I::Item, n: usize, comparer: &C) -> Result<bool>
where
    I: IntoIterator,
    C: EqualityComparer<I::Item> + ?Sized,
{
    if n == 0 {
        return Ok(!contains(source, value, comparer));
    }

    let mut count = 0usize;
    for element in source {
        if comparer.equals(&element, value) {
            count += 1;
            if count > n {
                trace!(threshold = n, "maximum occurrence check exceeded threshold");
                return Ok(false);
            }
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::{DefaultComparer, KeyComparer};
    use crate::error::Error;
    use std::cell::Cell;

    /// Iterator that records how many elements were pulled from it.
    struct Counting<'a, I> {
        inner: I,
        pulled: &'a Cell<usize>,
    }

    impl<I: Iterator> Iterator for Counting<'_, I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<Self::Item> {
            let item = self.inner.next();
            if item.is_some() {
                self.pulled.set(self.pulled.get() + 1);
            }
            item
        }
    }

    fn count_of(values: &[i32], target: i32) -> i64 {
        values.iter().filter(|v| **v == target).count() as i64
    }

    const SAMPLES: &[&[i32]] = &[
        &[],
        &[1],
        &[2],
        &[1, 1, 1],
        &[1, 2, 1, 3, 1, 4],
        &[5, 5, 2, 5, 2, 2, 2],
        &[0, 0, 0, 0, 0, 0, 0, 0],
    ];

    #[test]
    fn exactly_is_true_only_for_the_actual_count() {
        for sample in SAMPLES {
            for target in 0..6 {
                let actual = count_of(sample, target);
                for n in 0..=actual + 2 {
                    let result = OccurrenceBound::Exactly(n)
                        .check(sample.iter().copied(), &target, &DefaultComparer)
                        .unwrap();
                    assert_eq!(
                        result,
                        n == actual,
                        "sample {sample:?} target {target} n {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn at_least_matches_count_comparison_including_boundary() {
        for sample in SAMPLES {
            for target in 0..6 {
                let actual = count_of(sample, target);
                for n in 0..=actual + 2 {
                    let result = OccurrenceBound::AtLeast(n)
                        .check(sample.iter().copied(), &target, &DefaultComparer)
                        .unwrap();
                    assert_eq!(
                        result,
                        actual >= n,
                        "sample {sample:?} target {target} n {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn at_most_matches_count_comparison() {
        for sample in SAMPLES {
            for target in 0..6 {
                let actual = count_of(sample, target);
                for n in 0..=actual + 2 {
                    let result = OccurrenceBound::AtMost(n)
                        .check(sample.iter().copied(), &target, &DefaultComparer)
                        .unwrap();
                    assert_eq!(
                        result,
                        actual <= n,
                        "sample {sample:?} target {target} n {n}"
                    );
                }
            }
        }
    }

    #[test]
    fn negative_threshold_fails_before_iteration() {
        let pulled = Cell::new(0);
        for bound in [
            OccurrenceBound::Exactly(-1),
            OccurrenceBound::AtLeast(-3),
            OccurrenceBound::AtMost(i64::MIN),
        ] {
            let source = Counting {
                inner: [1, 2, 3].into_iter(),
                pulled: &pulled,
            };
            let err = bound.check(source, &1, &DefaultComparer).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidArgument {
                    argument: "occurrences",
                    ..
                }
            ));
        }
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn at_least_zero_does_not_iterate() {
        let pulled = Cell::new(0);
        let source = Counting {
            inner: [1, 2, 3].into_iter(),
            pulled: &pulled,
        };

        let result = OccurrenceBound::AtLeast(0)
            .check(source, &9, &DefaultComparer)
            .unwrap();

        assert!(result);
        assert_eq!(pulled.get(), 0);
    }

    #[test]
    fn exactly_stops_once_threshold_is_exceeded() {
        let pulled = Cell::new(0);
        let source = Counting {
            inner: [7, 7, 7, 1, 2, 3, 4].into_iter(),
            pulled: &pulled,
        };

        let result = OccurrenceBound::Exactly(2)
            .check(source, &7, &DefaultComparer)
            .unwrap();

        assert!(!result);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn at_least_stops_once_threshold_is_reached() {
        let pulled = Cell::new(0);
        let source = Counting {
            inner: [4, 0, 4, 0, 0, 0].into_iter(),
            pulled: &pulled,
        };

        let result = OccurrenceBound::AtLeast(2)
            .check(source, &4, &DefaultComparer)
            .unwrap();

        assert!(result);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn at_most_zero_stops_at_first_match() {
        let pulled = Cell::new(0);
        let source = Counting {
            inner: [3, 8, 8, 8].into_iter(),
            pulled: &pulled,
        };

        let result = OccurrenceBound::AtMost(0)
            .check(source, &8, &DefaultComparer)
            .unwrap();

        assert!(!result);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn at_least_short_circuits_on_infinite_sequence() {
        let result = OccurrenceBound::AtLeast(3)
            .check((0..).map(|n| n % 4), &2, &DefaultComparer)
            .unwrap();

        assert!(result);
    }

    #[test]
    fn custom_comparer_is_applied_to_every_element() {
        let words = ["Apple", "apricot", "banana", "avocado"];
        let first_letter =
            KeyComparer::new(|w: &&str| w.chars().next().map(|c| c.to_ascii_lowercase()));

        let result = OccurrenceBound::Exactly(3)
            .check(words, &"a", &first_letter)
            .unwrap();

        assert!(result);
    }

    #[test]
    fn threshold_reports_raw_value() {
        assert_eq!(OccurrenceBound::AtMost(4).threshold(), 4);
        assert_eq!(OccurrenceBound::Exactly(-2).threshold(), -2);
    }
}
