//! The [`SeqExt`] extension trait, implemented for every `IntoIterator`.

use std::any::Any;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::Flatten;
use std::sync::Arc;

use crate::comparer::{DefaultComparer, EqualityComparer};
use crate::error::{Error, Result};

use super::average::{self, Averageable};
use super::concat::{self, ConcatWith, FlattenWith};
use super::except::{Except, ExceptBy};
use super::occurrence::OccurrenceBound;
use super::select::{SelectIf, SelectIfIndexed, TrySelectIf};

/// Synchronous extension methods for any sequence.
///
/// Methods that search for a value come in pairs: the plain form compares with the element's
/// `PartialEq`, the `_by` form takes an explicit [`EqualityComparer`].
pub trait SeqExt: IntoIterator + Sized {
    /// Returns `true` when `value` occurs exactly `occurrences` times.
    ///
    /// Stops as soon as the count exceeds `occurrences`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `occurrences` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use adviter::SeqExt;
    ///
    /// assert!([1, 1, 1].contains_exactly(&1, 3)?);
    /// assert!(![1, 1, 1].contains_exactly(&1, 2)?);
    /// # Ok::<(), adviter::Error>(())
    /// ```
    fn contains_exactly(self, value: &Self::Item, occurrences: i64) -> Result<bool>
    where
        Self::Item: PartialEq,
    {
        self.contains_exactly_by(value, occurrences, &DefaultComparer)
    }

    /// [`SeqExt::contains_exactly`] with an explicit comparer.
    fn contains_exactly_by<C>(
        self,
        value: &Self::Item,
        occurrences: i64,
        comparer: &C,
    ) -> Result<bool>
    where
        C: EqualityComparer<Self::Item> + ?Sized,
    {
        OccurrenceBound::Exactly(occurrences).check(self, value, comparer)
    }

    /// Returns `true` when `value` occurs at least `occurrences` times.
    ///
    /// A threshold of zero is always satisfied without touching the sequence.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `occurrences` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use adviter::SeqExt;
    ///
    /// assert!([1, 1, 1].contains_at_least(&1, 2)?);
    /// assert!([1, 1, 1].contains_at_least(&1, 3)?);
    /// # Ok::<(), adviter::Error>(())
    /// ```
    fn contains_at_least(self, value: &Self::Item, occurrences: i64) -> Result<bool>
    where
        Self::Item: PartialEq,
    {
        self.contains_at_least_by(value, occurrences, &DefaultComparer)
    }

    /// [`SeqExt::contains_at_least`] with an explicit comparer.
    fn contains_at_least_by<C>(
        self,
        value: &Self::Item,
        occurrences: i64,
        comparer: &C,
    ) -> Result<bool>
    where
        C: EqualityComparer<Self::Item> + ?Sized,
    {
        OccurrenceBound::AtLeast(occurrences).check(self, value, comparer)
    }

    /// Returns `true` when `value` occurs at most `occurrences` times.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when `occurrences` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use adviter::SeqExt;
    ///
    /// assert!(![1, 1, 1].contains_at_most(&1, 2)?);
    /// assert!([1, 2, 3].contains_at_most(&9, 0)?);
    /// # Ok::<(), adviter::Error>(())
    /// ```
    fn contains_at_most(self, value: &Self::Item, occurrences: i64) -> Result<bool>
    where
        Self::Item: PartialEq,
    {
        self.contains_at_most_by(value, occurrences, &DefaultComparer)
    }

    /// [`SeqExt::contains_at_most`] with an explicit comparer.
    fn contains_at_most_by<C>(
        self,
        value: &Self::Item,
        occurrences: i64,
        comparer: &C,
    ) -> Result<bool>
    where
        C: EqualityComparer<Self::Item> + ?Sized,
    {
        OccurrenceBound::AtMost(occurrences).check(self, value, comparer)
    }

    /// Projects each element with `on_true` when `predicate` holds, `on_false` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use adviter::SeqExt;
    ///
    /// let labels: Vec<&str> = [10, 70]
    ///     .select_if(|n| *n > 50, |_| "Bigger", |_| "Smaller")
    ///     .collect();
    /// assert_eq!(labels, ["Smaller", "Bigger"]);
    /// ```
    fn select_if<P, T, F, R>(
        self,
        predicate: P,
        on_true: T,
        on_false: F,
    ) -> SelectIf<Self::IntoIter, P, T, F>
    where
        P: FnMut(&Self::Item) -> bool,
        T: FnMut(Self::Item) -> R,
        F: FnMut(Self::Item) -> R,
    {
        SelectIf::new(self.into_iter(), predicate, on_true, on_false)
    }

    /// Like [`SeqExt::select_if`], passing the zero-based element index to the selectors.
    fn select_if_indexed<P, T, F, R>(
        self,
        predicate: P,
        on_true: T,
        on_false: F,
    ) -> SelectIfIndexed<Self::IntoIter, P, T, F>
    where
        P: FnMut(&Self::Item) -> bool,
        T: FnMut(Self::Item, usize) -> R,
        F: FnMut(Self::Item, usize) -> R,
    {
        SelectIfIndexed::new(self.into_iter(), predicate, on_true, on_false)
    }

    /// Fallible [`SeqExt::select_if`]. The first error is yielded and ends the sequence.
    fn try_select_if<P, T, F, R, E>(
        self,
        predicate: P,
        on_true: T,
        on_false: F,
    ) -> TrySelectIf<Self::IntoIter, P, T, F>
    where
        P: FnMut(&Self::Item) -> std::result::Result<bool, E>,
        T: FnMut(Self::Item) -> std::result::Result<R, E>,
        F: FnMut(Self::Item) -> std::result::Result<R, E>,
    {
        TrySelectIf::new(self.into_iter(), predicate, on_true, on_false)
    }

    /// Appends every sequence in `others` after `self`.
    fn concat_with<O>(self, others: O) -> ConcatWith<Self::IntoIter, O>
    where
        O: IntoIterator,
        O::Item: IntoIterator<Item = Self::Item>,
    {
        concat::concat_with(self.into_iter(), others)
    }

    /// Flattens a sequence of sequences.
    fn flatten_seq(self) -> Flatten<Self::IntoIter>
    where
        Self::Item: IntoIterator,
    {
        self.into_iter().flatten()
    }

    /// Flattens a sequence of sequences, projecting each inner element with `selector`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adviter::SeqExt;
    ///
    /// let flat: Vec<i32> = vec![vec![1, 2], vec![3], vec![]].flatten_with(|x| x * 10).collect();
    /// assert_eq!(flat, [10, 20, 30]);
    /// ```
    fn flatten_with<F, R>(self, selector: F) -> FlattenWith<Self::IntoIter, Self::Item, F>
    where
        Self::Item: IntoIterator,
        F: FnMut(<Self::Item as IntoIterator>::Item) -> R,
    {
        FlattenWith::new(self.into_iter(), selector)
    }

    /// Distinct elements of `self` that are not in `excluded`.
    fn except_values<E>(self, excluded: E) -> Except<Self::IntoIter>
    where
        E: IntoIterator<Item = Self::Item>,
        Self::Item: Eq + Hash + Clone,
    {
        Except::new(self.into_iter(), excluded)
    }

    /// Distinct elements of `self` that are not in `excluded`, compared with `comparer`.
    fn except_by<E, C>(self, excluded: E, comparer: C) -> ExceptBy<Self::IntoIter, C>
    where
        E: IntoIterator<Item = Self::Item>,
        Self::Item: Clone,
        C: EqualityComparer<Self::Item>,
    {
        ExceptBy::new(self.into_iter(), excluded, comparer)
    }

    /// Arithmetic mean of the sequence.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySequence`] for an empty sequence, [`Error::Overflow`] when an integer sum
    /// overflows.
    fn try_average(self) -> Result<<Self::Item as Averageable>::Output>
    where
        Self::Item: Averageable,
    {
        average::try_average(self)
    }

    /// Arithmetic mean of the sequence, or `fallback` when it is empty.
    ///
    /// # Errors
    ///
    /// [`Error::Overflow`] when an integer sum overflows.
    fn average_or(
        self,
        fallback: <Self::Item as Averageable>::Output,
    ) -> Result<<Self::Item as Averageable>::Output>
    where
        Self::Item: Averageable,
    {
        average::average_or(self, fallback)
    }

    /// Projects each element with `selector`, then behaves like [`SeqExt::average_or`].
    fn average_by_or<F, V>(self, selector: F, fallback: V::Output) -> Result<V::Output>
    where
        F: FnMut(Self::Item) -> V,
        V: Averageable,
    {
        average::average_or(self.into_iter().map(selector), fallback)
    }

    /// Returns `true` when every element is a `T`.
    fn all_of_type<T: Any>(self) -> bool
    where
        Self::Item: Borrow<dyn Any>,
    {
        self.into_iter()
            .all(|item| Borrow::<dyn Any>::borrow(&item).is::<T>())
    }

    /// Collects into an immutable shared slice.
    fn to_shared(self) -> Arc<[Self::Item]> {
        self.into_iter().collect()
    }

    /// Collects into a map keyed by `key`.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] when two elements produce the same key.
    fn to_map<K, F>(self, key: F) -> Result<HashMap<K, Self::Item>>
    where
        K: Eq + Hash + Debug,
        F: FnMut(&Self::Item) -> K,
    {
        self.to_map_with(key, |item| item)
    }

    /// Collects into a map keyed by `key`, storing `element(item)` as the value.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateKey`] when two elements produce the same key.
    fn to_map_with<K, V, F, G>(self, mut key: F, mut element: G) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash + Debug,
        F: FnMut(&Self::Item) -> K,
        G: FnMut(Self::Item) -> V,
    {
        let iter = self.into_iter();
        let mut map = HashMap::with_capacity(iter.size_hint().0);
        for item in iter {
            match map.entry(key(&item)) {
                Entry::Occupied(occupied) => return Err(Error::duplicate_key(occupied.key())),
                Entry::Vacant(vacant) => {
                    vacant.insert(element(item));
                }
            }
        }
        Ok(map)
    }
}

impl<S: IntoIterator> SeqExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::AsciiCaseInsensitive;

    #[test]
    fn occurrence_methods_match_reference_examples() {
        assert!([1, 1, 1].contains_exactly(&1, 3).unwrap());
        assert!(![1, 1, 1].contains_exactly(&1, 2).unwrap());
        assert!([1, 1, 1].contains_at_least(&1, 2).unwrap());
        assert!(![1, 1, 1].contains_at_most(&1, 2).unwrap());
    }

    #[test]
    fn at_least_one_equals_membership() {
        for sample in [vec![], vec![3], vec![1, 2], vec![2, 2, 5]] {
            let expected = sample.contains(&2);
            assert_eq!(sample.contains_at_least(&2, 1).unwrap(), expected);
        }
    }

    #[test]
    fn at_most_zero_equals_absence() {
        for sample in [vec![], vec![3], vec![1, 2], vec![2, 2, 5]] {
            let expected = !sample.contains(&2);
            assert_eq!(sample.contains_at_most(&2, 0).unwrap(), expected);
        }
    }

    #[test]
    fn negative_threshold_is_rejected_by_every_check() {
        assert!(matches!(
            [1].contains_exactly(&1, -1),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            [1].contains_at_least(&1, -1),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            [1].contains_at_most(&1, -1),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn by_variants_use_comparer() {
        let words = vec!["Yes", "yes", "YES", "no"];

        let cmp = AsciiCaseInsensitive;

        assert!(words.clone().contains_exactly_by(&"yes", 3, &cmp).unwrap());
        assert!(words.clone().contains_at_least_by(&"NO", 1, &cmp).unwrap());
        assert!(!words.contains_at_most_by(&"yEs", 2, &cmp).unwrap());
    }

    #[test]
    fn checks_work_on_borrowed_sequences() {
        let values = vec![4, 4, 8];

        assert!(values.iter().contains_exactly(&&4, 2).unwrap());
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn select_if_and_indexed_variant_are_available_on_collections() {
        let labels: Vec<&str> = vec![51, 50]
            .select_if(|n| *n > 50, |_| "Bigger", |_| "Smaller")
            .collect();
        let indexed: Vec<usize> = vec!['a', 'b', 'c']
            .select_if_indexed(|c| *c == 'b', |_, i| i * 100, |_, i| i)
            .collect();

        assert_eq!(labels, ["Bigger", "Smaller"]);
        assert_eq!(indexed, [0, 100, 2]);
    }

    #[test]
    fn concat_with_and_flatten_follow_source_order() {
        let joined: Vec<i32> = vec![1, 2].concat_with([vec![3], vec![], vec![4, 5]]).collect();
        let flat: Vec<i32> = vec![vec![1, 2], vec![3], vec![]].flatten_seq().collect();

        assert_eq!(joined, [1, 2, 3, 4, 5]);
        assert_eq!(flat, [1, 2, 3]);
    }

    #[test]
    fn except_values_matches_set_difference() {
        let out: Vec<i32> = vec![1, 2, 2, 3, 4].except_values([2]).collect();

        assert_eq!(out, [1, 3, 4]);
    }

    #[test]
    fn average_helpers_handle_empty_and_projected_input() {
        assert_eq!(Vec::<i32>::new().average_or(-1.0).unwrap(), -1.0);
        assert_eq!(vec![2i64, 4, 9].try_average().unwrap(), 5.0);

        let lengths = ["a", "abc"].average_by_or(|s| s.len() as u64, 0.0).unwrap();
        assert_eq!(lengths, 2.0);
    }

    #[test]
    fn all_of_type_inspects_dynamic_elements() {
        let mixed: Vec<Box<dyn Any>> = vec![Box::new(1u8), Box::new("two")];
        let uniform: Vec<Box<dyn Any>> = vec![Box::new(1u8), Box::new(2u8)];

        assert!(!mixed.all_of_type::<u8>());
        assert!(uniform.all_of_type::<u8>());
        assert!(Vec::<Box<dyn Any>>::new().all_of_type::<String>());
    }

    #[test]
    fn to_shared_collects_all_elements() {
        let shared = (1..=3).to_shared();

        assert_eq!(&*shared, &[1, 2, 3]);
    }

    #[test]
    fn to_map_rejects_duplicate_keys() {
        let err = ["apple", "avocado"].to_map(|s| s.chars().next()).unwrap_err();

        match err {
            Error::DuplicateKey { key } => assert_eq!(key, "Some('a')"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn to_map_with_projects_values() {
        let map = ["apple", "banana"]
            .to_map_with(|s| s.len(), |s| s.to_uppercase())
            .unwrap();

        assert_eq!(map.get(&5).map(String::as_str), Some("APPLE"));
        assert_eq!(map.get(&6).map(String::as_str), Some("BANANA"));
    }
}
