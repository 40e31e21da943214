//! Equality capabilities used by the occurrence checks and set-difference operators.
//!
//! Operations that accept a comparer come in two forms: a plain method relying on
//! [`DefaultComparer`] (the element type's `PartialEq`), and a `_by` method taking any
//! [`EqualityComparer`]. Closures of the shape `Fn(&T, &T) -> bool` are comparers too.

use std::marker::PhantomData;

/// Decides whether two elements should be treated as equal.
pub trait EqualityComparer<T: ?Sized> {
    /// Returns `true` when `a` and `b` are considered equal.
    fn equals(&self, a: &T, b: &T) -> bool;
}

/// Natural equality of the element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<T: PartialEq + ?Sized> EqualityComparer<T> for DefaultComparer {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T: ?Sized, F> EqualityComparer<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Compares elements by a projected key.
///
/// # Examples
///
/// ```
/// use adviter::{EqualityComparer, KeyComparer};
///
/// let by_len = KeyComparer::new(|s: &&str| s.len());
/// assert!(by_len.equals(&"abc", &"xyz"));
/// assert!(!by_len.equals(&"ab", &"xyz"));
/// ```
pub struct KeyComparer<T: ?Sized, K, F> {
    key: F,
    _marker: PhantomData<fn(&T) -> K>,
}

impl<T: ?Sized, K, F> KeyComparer<T, K, F>
where
    F: Fn(&T) -> K,
    K: PartialEq,
{
    /// Creates a comparer that projects both sides through `key` before comparing.
    pub fn new(key: F) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, K, F> EqualityComparer<T> for KeyComparer<T, K, F>
where
    F: Fn(&T) -> K,
    K: PartialEq,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.key)(a) == (self.key)(b)
    }
}

impl<T: ?Sized, K, F: Clone> Clone for KeyComparer<T, K, F> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

/// Case-insensitive ASCII comparison for string-like elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiCaseInsensitive;

impl<T: AsRef<str> + ?Sized> EqualityComparer<T> for AsciiCaseInsensitive {
    fn equals(&self, a: &T, b: &T) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }
}
