//! Conditional projection: map each element through one of two selectors.
//!
//! The adapters here are lazy. Nothing runs until an element is pulled, each pull evaluates the
//! predicate exactly once for that element, and no previous elements are retained.

use std::iter::FusedIterator;

/// Lazy iterator returned by [`crate::SeqExt::select_if`].
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SelectIf<I, P, T, F> {
    iter: I,
    predicate: P,
    on_true: T,
    on_false: F,
}

impl<I, P, T, F> SelectIf<I, P, T, F> {
    pub(crate) fn new<R>(iter: I, predicate: P, on_true: T, on_false: F) -> Self
    where
        I: Iterator,
        P: FnMut(&I::Item) -> bool,
        T: FnMut(I::Item) -> R,
        F: FnMut(I::Item) -> R,
    {
        Self {
            iter,
            predicate,
            on_true,
            on_false,
        }
    }
}

impl<I, P, T, F, R> Iterator for SelectIf<I, P, T, F>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item) -> R,
    F: FnMut(I::Item) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let item = self.iter.next()?;
        Some(if (self.predicate)(&item) {
            (self.on_true)(item)
        } else {
            (self.on_false)(item)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, P, T, F, R> DoubleEndedIterator for SelectIf<I, P, T, F>
where
    I: DoubleEndedIterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item) -> R,
    F: FnMut(I::Item) -> R,
{
    fn next_back(&mut self) -> Option<R> {
        let item = self.iter.next_back()?;
        Some(if (self.predicate)(&item) {
            (self.on_true)(item)
        } else {
            (self.on_false)(item)
        })
    }
}

impl<I, P, T, F, R> ExactSizeIterator for SelectIf<I, P, T, F>
where
    I: ExactSizeIterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item) -> R,
    F: FnMut(I::Item) -> R,
{
}

impl<I, P, T, F, R> FusedIterator for SelectIf<I, P, T, F>
where
    I: FusedIterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item) -> R,
    F: FnMut(I::Item) -> R,
{
}

/// Lazy iterator returned by [`crate::SeqExt::select_if_indexed`].
///
/// Both selectors receive the zero-based position of the element in the source.
#[derive(Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SelectIfIndexed<I, P, T, F> {
    iter: I,
    index: usize,
    predicate: P,
    on_true: T,
    on_false: F,
}

impl<I, P, T, F> SelectIfIndexed<I, P, T, F> {
    pub(crate) fn new<R>(iter: I, predicate: P, on_true: T, on_false: F) -> Self
    where
        I: Iterator,
        P: FnMut(&I::Item) -> bool,
        T: FnMut(I::Item, usize) -> R,
        F: FnMut(I::Item, usize) -> R,
    {
        Self {
            iter,
            index: 0,
            predicate,
            on_true,
            on_false,
        }
    }
}

impl<I, P, T, F, R> Iterator for SelectIfIndexed<I, P, T, F>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item, usize) -> R,
    F: FnMut(I::Item, usize) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let item = self.iter.next()?;
        let index = self.index;
        self.index += 1;
        Some(if (self.predicate)(&item) {
            (self.on_true)(item, index)
        } else {
            (self.on_false)(item, index)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I, P, T, F, R> ExactSizeIterator for SelectIfIndexed<I, P, T, F>
where
    I: ExactSizeIterator,
    P: FnMut(&I::Item) -> bool,
    T: FnMut(I::Item, usize) -> R,
    F: FnMut(I::Item, usize) -> R,
{
}

/// Lazy iterator returned by [`crate::SeqExt::try_select_if`].
///
/// Yields `Ok` projections until the predicate or a selector fails. The failing element is
/// reported as `Err` and the iterator is exhausted from then on.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct TrySelectIf<I, P, T, F> {
    iter: Option<I>,
    predicate: P,
    on_true: T,
    on_false: F,
}

impl<I, P, T, F> TrySelectIf<I, P, T, F> {
    pub(crate) fn new<R, E>(iter: I, predicate: P, on_true: T, on_false: F) -> Self
    where
        I: Iterator,
        P: FnMut(&I::Item) -> Result<bool, E>,
        T: FnMut(I::Item) -> Result<R, E>,
        F: FnMut(I::Item) -> Result<R, E>,
    {
        Self {
            iter: Some(iter),
            predicate,
            on_true,
            on_false,
        }
    }
}

impl<I, P, T, F, R, E> Iterator for TrySelectIf<I, P, T, F>
where
    I: Iterator,
    P: FnMut(&I::Item) -> Result<bool, E>,
    T: FnMut(I::Item) -> Result<R, E>,
    F: FnMut(I::Item) -> Result<R, E>,
{
    type Item = Result<R, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.as_mut()?.next()?;
        let projected = (self.predicate)(&item).and_then(|matched| {
            if matched {
                (self.on_true)(item)
            } else {
                (self.on_false)(item)
            }
        });
        if projected.is_err() {
            self.iter = None;
        }
        Some(projected)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.iter {
            Some(iter) => (0, iter.size_hint().1),
            None => (0, Some(0)),
        }
    }
}

impl<I, P, T, F, R, E> FusedIterator for TrySelectIf<I, P, T, F>
where
    I: FusedIterator,
    P: FnMut(&I::Item) -> Result<bool, E>,
    T: FnMut(I::Item) -> Result<R, E>,
    F: FnMut(I::Item) -> Result<R, E>,
{
}
