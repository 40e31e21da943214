//! Set difference against a list of excluded values.
//!
//! Both adapters yield the distinct elements of the source that do not appear in the excluded
//! list, in first-occurrence order. The excluded list is materialized up front, the source is
//! pulled lazily.

use std::collections::HashSet;
use std::hash::Hash;

use crate::comparer::EqualityComparer;

/// Lazy iterator returned by [`crate::SeqExt::except_values`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Except<I: Iterator> {
    iter: I,
    seen: HashSet<I::Item>,
}

impl<I> Except<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    pub(crate) fn new(iter: I, excluded: impl IntoIterator<Item = I::Item>) -> Self {
        Self {
            iter,
            seen: excluded.into_iter().collect(),
        }
    }
}

impl<I> Iterator for Except<I>
where
    I: Iterator,
    I::Item: Eq + Hash + Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        self.iter
            .by_ref()
            .find(|item| self.seen.insert(item.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}

/// Lazy iterator returned by [`crate::SeqExt::except_by`].
///
/// Lookups are linear because an arbitrary comparer offers no hash. Suitable for short
/// exclusion lists.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ExceptBy<I: Iterator, C> {
    iter: I,
    seen: Vec<I::Item>,
    comparer: C,
}

impl<I, C> ExceptBy<I, C>
where
    I: Iterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    pub(crate) fn new(iter: I, excluded: impl IntoIterator<Item = I::Item>, comparer: C) -> Self {
        Self {
            iter,
            seen: excluded.into_iter().collect(),
            comparer,
        }
    }
}

impl<I, C> Iterator for ExceptBy<I, C>
where
    I: Iterator,
    I::Item: Clone,
    C: EqualityComparer<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        for item in self.iter.by_ref() {
            if self.seen.iter().any(|s| self.comparer.equals(s, &item)) {
                continue;
            }
            self.seen.push(item.clone());
            return Some(item);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}
