//! Multi-sequence concatenation and flattening.
//!
//! Inner sequences are converted into iterators only when consumption reaches them, so
//! chaining a list of expensive or infinite sources never evaluates more than needed.

use std::iter::{Chain, Flatten, FusedIterator};

/// Concatenates every sequence produced by `sequences`, left to right.
///
/// Zero sequences produce an empty iterator.
///
/// # Examples
///
/// ```
/// let joined: Vec<i32> =
///     adviter::concat_all([vec![1, 2], vec![3], vec![], vec![4, 5]]).collect();
/// assert_eq!(joined, [1, 2, 3, 4, 5]);
/// ```
pub fn concat_all<S>(sequences: S) -> Flatten<S::IntoIter>
where
    S: IntoIterator,
    S::Item: IntoIterator,
{
    sequences.into_iter().flatten()
}

/// Iterator returned by [`crate::SeqExt::concat_with`].
pub type ConcatWith<I, O> = Chain<I, Flatten<<O as IntoIterator>::IntoIter>>;

pub(crate) fn concat_with<I, O>(first: I, others: O) -> ConcatWith<I, O>
where
    I: Iterator,
    O: IntoIterator,
    O::Item: IntoIterator<Item = I::Item>,
{
    first.chain(others.into_iter().flatten())
}

/// Lazy iterator returned by [`crate::SeqExt::flatten_with`].
///
/// Walks the outer sequence and, for each inner sequence, yields `selector(element)` for every
/// inner element in order.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FlattenWith<I, U, F>
where
    I: Iterator<Item = U>,
    U: IntoIterator,
{
    outer: I,
    inner: Option<U::IntoIter>,
    selector: F,
}

impl<I, U, F> FlattenWith<I, U, F>
where
    I: Iterator<Item = U>,
    U: IntoIterator,
{
    pub(crate) fn new<R>(outer: I, selector: F) -> Self
    where
        F: FnMut(U::Item) -> R,
    {
        Self {
            outer,
            inner: None,
            selector,
        }
    }
}

impl<I, U, F, R> Iterator for FlattenWith<I, U, F>
where
    I: Iterator<Item = U>,
    U: IntoIterator,
    F: FnMut(U::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(item) = inner.next() {
                    return Some((self.selector)(item));
                }
                self.inner = None;
            }
            self.inner = Some(self.outer.next()?.into_iter());
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self
            .inner
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint);
        match self.outer.size_hint() {
            (_, Some(0)) => (lower, upper),
            _ => (lower, None),
        }
    }
}

impl<I, U, F, R> FusedIterator for FlattenWith<I, U, F>
where
    I: FusedIterator<Item = U>,
    U: IntoIterator,
    F: FnMut(U::Item) -> R,
{
}

impl<I, U, F> Clone for FlattenWith<I, U, F>
where
    I: Iterator<Item = U> + Clone,
    U: IntoIterator,
    U::IntoIter: Clone,
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            outer: self.outer.clone(),
            inner: self.inner.clone(),
            selector: self.selector.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn concat_all_preserves_source_order() {
        let joined: Vec<i32> = concat_all([vec![1, 2], vec![3], vec![], vec![4, 5]]).collect();

        assert_eq!(joined, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn concat_all_of_nothing_is_empty() {
        let joined: Vec<i32> = concat_all(Vec::<Vec<i32>>::new()).collect();

        assert!(joined.is_empty());
    }

    #[test]
    fn concat_all_evaluates_sources_lazily() {
        let opened = RefCell::new(Vec::new());
        let sources = (0..3).map(|n| {
            opened.borrow_mut().push(n);
            vec![n; 2]
        });

        let mut joined = concat_all(sources);
        assert_eq!(joined.next(), Some(0));
        assert_eq!(*opened.borrow(), [0]);
        assert_eq!(joined.nth(1), Some(1));
        assert_eq!(*opened.borrow(), [0, 1]);
    }

    #[test]
    fn concat_with_appends_every_other_sequence() {
        let joined: Vec<char> =
            concat_with("ab".chars(), [vec!['c'], vec![], vec!['d', 'e']]).collect();

        assert_eq!(joined, ['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn flatten_with_applies_selector_in_nested_order() {
        let nested = vec![vec![1, 2], vec![3], vec![]];

        let flat: Vec<i32> = FlattenWith::new(nested.into_iter(), |x| x * 10).collect();

        assert_eq!(flat, [10, 20, 30]);
    }

    #[test]
    fn flatten_with_skips_leading_and_trailing_empty_inners() {
        let nested = vec![vec![], vec![], vec!["x"], vec![], vec!["y", "z"], vec![]];

        let flat: Vec<String> = FlattenWith::new(nested.into_iter(), str::to_uppercase).collect();

        assert_eq!(flat, ["X", "Y", "Z"]);
    }

    #[test]
    fn flatten_with_handles_infinite_outer_sequence() {
        let flat: Vec<u32> = FlattenWith::new((1..).map(|n| 0..n), |x| x)
            .take(6)
            .collect();

        assert_eq!(flat, [0, 0, 1, 0, 1, 2]);
    }

    #[test]
    fn flatten_with_size_hint_is_exact_once_outer_is_drained() {
        let mut iter = FlattenWith::new(vec![vec![1, 2, 3]].into_iter(), |x| x);

        assert_eq!(iter.size_hint(), (0, None));
        iter.next();
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }
}
