//! Arithmetic mean with checked accumulation and an optional fallback for empty input.
//!
//! Integer elements are summed in a checked 64-bit accumulator and averaged as `f64`. `f32`
//! elements accumulate in `f64` and produce an `f32`. `Option` elements skip `None`, so a
//! sequence containing only `None` counts as empty.

use crate::error::{Error, Result};

const OPERATION: &str = "average";

/// Running sum and element count for a mean computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator<S> {
    sum: S,
    count: u64,
}

impl<S> Accumulator<S> {
    /// Number of values accumulated so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Current running sum.
    pub fn sum(&self) -> &S {
        &self.sum
    }
}

/// Element types that can be averaged.
pub trait Averageable: Sized {
    /// Accumulator representation for the running sum.
    type Sum: Default;
    /// Type of the resulting mean.
    type Output;

    /// Folds `self` into the accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Overflow`] when the running sum would leave the range of `Self::Sum`.
    fn accumulate(self, acc: &mut Accumulator<Self::Sum>) -> Result<()>;

    /// Computes the mean of a non-empty accumulator.
    fn mean(acc: &Accumulator<Self::Sum>) -> Self::Output;
}

macro_rules! impl_integer_average {
    ($($ty:ty => $sum:ty),* $(,)?) => {
        $(
            impl Averageable for $ty {
                type Sum = $sum;
                type Output = f64;

                fn accumulate(self, acc: &mut Accumulator<$sum>) -> Result<()> {
                    acc.sum = acc
                        .sum
                        .checked_add(<$sum>::from(self))
                        .ok_or(Error::Overflow { operation: OPERATION })?;
                    acc.count += 1;
                    Ok(())
                }

                fn mean(acc: &Accumulator<$sum>) -> f64 {
                    acc.sum as f64 / acc.count as f64
                }
            }
        )*
    };
}

impl_integer_average!(i32 => i64, i64 => i64, u32 => u64, u64 => u64);

impl Averageable for f32 {
    type Sum = f64;
    type Output = f32;

    fn accumulate(self, acc: &mut Accumulator<f64>) -> Result<()> {
        acc.sum += f64::from(self);
        acc.count += 1;
        Ok(())
    }

    fn mean(acc: &Accumulator<f64>) -> f32 {
        (acc.sum / acc.count as f64) as f32
    }
}

impl Averageable for f64 {
    type Sum = f64;
    type Output = f64;

    fn accumulate(self, acc: &mut Accumulator<f64>) -> Result<()> {
        acc.sum += self;
        acc.count += 1;
        Ok(())
    }

    fn mean(acc: &Accumulator<f64>) -> f64 {
        acc.sum / acc.count as f64
    }
}

impl<T: Averageable> Averageable for Option<T> {
    type Sum = T::Sum;
    type Output = T::Output;

    fn accumulate(self, acc: &mut Accumulator<T::Sum>) -> Result<()> {
        match self {
            Some(value) => value.accumulate(acc),
            None => Ok(()),
        }
    }

    fn mean(acc: &Accumulator<T::Sum>) -> T::Output {
        T::mean(acc)
    }
}

/// Computes the mean of `source`.
///
/// # Errors
///
/// * [`Error::EmptySequence`] when no value was accumulated.
/// * [`Error::Overflow`] when an integer sum overflows.
pub(crate) fn try_average<I>(source: I) -> Result<<I::Item as Averageable>::Output>
where
    I: IntoIterator,
    I::Item: Averageable,
{
    let mut acc = Accumulator::default();
    for value in source {
        value.accumulate(&mut acc)?;
    }
    if acc.count == 0 {
        return Err(Error::EmptySequence {
            operation: OPERATION,
        });
    }
    Ok(<I::Item as Averageable>::mean(&acc))
}

/// Computes the mean of `source`, returning `fallback` when nothing was accumulated.
pub(crate) fn average_or<I>(
    source: I,
    fallback: <I::Item as Averageable>::Output,
) -> Result<<I::Item as Averageable>::Output>
where
    I: IntoIterator,
    I::Item: Averageable,
{
    match try_average(source) {
        Err(Error::EmptySequence { .. }) => Ok(fallback),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_average_of_integers_is_exact() {
        assert_eq!(try_average([1, 2, 3, 4]).unwrap(), 2.5);
        assert_eq!(try_average([7u64]).unwrap(), 7.0);
    }

    #[test]
    fn try_average_of_empty_sequence_fails() {
        let err = try_average(Vec::<i32>::new()).unwrap_err();

        assert!(matches!(err, Error::EmptySequence { operation: "average" }));
    }

    #[test]
    fn try_average_detects_integer_overflow() {
        let err = try_average([i64::MAX, 1]).unwrap_err();

        assert!(matches!(err, Error::Overflow { operation: "average" }));
    }

    #[test]
    fn i32_values_do_not_overflow_their_wider_accumulator() {
        let mean = try_average([i32::MAX, i32::MAX]).unwrap();

        assert_eq!(mean, f64::from(i32::MAX));
    }

    #[test]
    fn f32_average_returns_f32() {
        let mean: f32 = try_average([1.0f32, 2.0, 4.5]).unwrap();

        assert!((mean - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn option_values_skip_none() {
        let mean = try_average([Some(2), None, Some(4), None]).unwrap();

        assert_eq!(mean, 3.0);
    }

    #[test]
    fn average_or_returns_fallback_for_empty_input() {
        assert_eq!(average_or(Vec::<f64>::new(), -1.0).unwrap(), -1.0);
        assert_eq!(average_or([None::<i32>, None], 9.5).unwrap(), 9.5);
    }

    #[test]
    fn average_or_still_reports_overflow() {
        let err = average_or([u64::MAX, 1], 0.0).unwrap_err();

        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn accumulator_tracks_sum_and_count() {
        let mut acc = Accumulator::default();
        5i32.accumulate(&mut acc).unwrap();
        None::<i32>.accumulate(&mut acc).unwrap();
        7i32.accumulate(&mut acc).unwrap();

        assert_eq!(acc.count(), 2);
        assert_eq!(*acc.sum(), 12i64);
    }
}
