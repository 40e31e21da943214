//! Asynchronous counterparts of the synchronous sequence operations.
//!
//! Each wrapper moves the sequence and its closures into a single unit of work, submits it to
//! the supplied [`Scheduler`], and returns the resulting [`Task`]. Semantics match the
//! synchronous operation exactly, argument validation included: an invalid threshold is
//! reported by the task, never by the call that created it.

use std::any::Any;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use futures::future::{select_all, try_join_all};

use crate::comparer::{DefaultComparer, EqualityComparer};
use crate::error::{Error, Result};
use crate::seq::{self, SeqExt};

use super::scheduler::{Scheduler, Task};

/// Asynchronous extension methods for any sendable sequence.
pub trait AsyncSeqExt: IntoIterator + Sized + Send + 'static {
    /// Determines on a worker whether the sequence contains `value`.
    fn contains_async<S>(self, scheduler: &S, value: Self::Item) -> Task<bool>
    where
        S: Scheduler,
        Self::Item: PartialEq + Send + 'static,
    {
        self.contains_by_async(scheduler, value, DefaultComparer)
    }

    /// [`AsyncSeqExt::contains_async`] with an explicit comparer.
    fn contains_by_async<S, C>(self, scheduler: &S, value: Self::Item, comparer: C) -> Task<bool>
    where
        S: Scheduler,
        C: EqualityComparer<Self::Item> + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn(move || seq::contains(self, &value, &comparer))
    }

    /// Runs [`SeqExt::contains_exactly`] on a worker.
    fn contains_exactly_async<S>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
    ) -> Task<bool>
    where
        S: Scheduler,
        Self::Item: PartialEq + Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_exactly(&value, occurrences))
    }

    /// Runs [`SeqExt::contains_exactly_by`] on a worker.
    fn contains_exactly_by_async<S, C>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
        comparer: C,
    ) -> Task<bool>
    where
        S: Scheduler,
        C: EqualityComparer<Self::Item> + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_exactly_by(&value, occurrences, &comparer))
    }

    /// Runs [`SeqExt::contains_at_least`] on a worker.
    fn contains_at_least_async<S>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
    ) -> Task<bool>
    where
        S: Scheduler,
        Self::Item: PartialEq + Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_at_least(&value, occurrences))
    }

    /// Runs [`SeqExt::contains_at_least_by`] on a worker.
    fn contains_at_least_by_async<S, C>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
        comparer: C,
    ) -> Task<bool>
    where
        S: Scheduler,
        C: EqualityComparer<Self::Item> + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_at_least_by(&value, occurrences, &comparer))
    }

    /// Runs [`SeqExt::contains_at_most`] on a worker.
    fn contains_at_most_async<S>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
    ) -> Task<bool>
    where
        S: Scheduler,
        Self::Item: PartialEq + Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_at_most(&value, occurrences))
    }

    /// Runs [`SeqExt::contains_at_most_by`] on a worker.
    fn contains_at_most_by_async<S, C>(
        self,
        scheduler: &S,
        value: Self::Item,
        occurrences: i64,
        comparer: C,
    ) -> Task<bool>
    where
        S: Scheduler,
        C: EqualityComparer<Self::Item> + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn_try(move || self.contains_at_most_by(&value, occurrences, &comparer))
    }

    /// Determines on a worker whether the sequence has any element.
    fn any_async<S: Scheduler>(self, scheduler: &S) -> Task<bool> {
        scheduler.spawn(move || self.into_iter().next().is_some())
    }

    /// Determines on a worker whether any element satisfies `predicate`.
    fn any_by_async<S, P>(self, scheduler: &S, predicate: P) -> Task<bool>
    where
        S: Scheduler,
        P: FnMut(Self::Item) -> bool + Send + 'static,
    {
        scheduler.spawn(move || self.into_iter().any(predicate))
    }

    /// Determines on a worker whether every element satisfies `predicate`.
    fn all_async<S, P>(self, scheduler: &S, predicate: P) -> Task<bool>
    where
        S: Scheduler,
        P: FnMut(Self::Item) -> bool + Send + 'static,
    {
        scheduler.spawn(move || self.into_iter().all(predicate))
    }

    /// Determines on a worker whether every element is a `T`.
    ///
    /// Elements cross threads, so they are inspected as `dyn Any + Send`.
    fn all_of_type_async<T, S>(self, scheduler: &S) -> Task<bool>
    where
        T: Any,
        S: Scheduler,
        Self::Item: Borrow<dyn Any + Send>,
    {
        scheduler.spawn(move || {
            self.into_iter()
                .all(|item| Borrow::<dyn Any + Send>::borrow(&item).is::<T>())
        })
    }

    /// Reduces the sequence with `func` on a worker.
    ///
    /// The task fails with [`Error::EmptySequence`] when there is nothing to reduce.
    fn aggregate_async<S, F>(self, scheduler: &S, func: F) -> Task<Self::Item>
    where
        S: Scheduler,
        F: FnMut(Self::Item, Self::Item) -> Self::Item + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn_try(move || {
            self.into_iter().reduce(func).ok_or(Error::EmptySequence {
                operation: "aggregate",
            })
        })
    }

    /// Folds the sequence into `seed` with `func` on a worker.
    fn fold_async<S, A, F>(self, scheduler: &S, seed: A, func: F) -> Task<A>
    where
        S: Scheduler,
        A: Send + 'static,
        F: FnMut(A, Self::Item) -> A + Send + 'static,
    {
        scheduler.spawn(move || self.into_iter().fold(seed, func))
    }

    /// Folds the sequence on a worker and maps the final accumulator with `result`.
    fn fold_map_async<S, A, R, F, G>(self, scheduler: &S, seed: A, func: F, result: G) -> Task<R>
    where
        S: Scheduler,
        A: Send + 'static,
        R: Send + 'static,
        F: FnMut(A, Self::Item) -> A + Send + 'static,
        G: FnOnce(A) -> R + Send + 'static,
    {
        scheduler.spawn(move || result(self.into_iter().fold(seed, func)))
    }

    /// Runs `action` for every element on a worker.
    ///
    /// The whole traversal happens on one worker; elements are not processed concurrently.
    fn for_each_async<S, F>(self, scheduler: &S, action: F) -> Task<()>
    where
        S: Scheduler,
        F: FnMut(Self::Item) + Send + 'static,
    {
        scheduler.spawn(move || self.into_iter().for_each(action))
    }

    /// Collects the sequence into a `Vec` on a worker.
    fn to_vec_async<S>(self, scheduler: &S) -> Task<Vec<Self::Item>>
    where
        S: Scheduler,
        Self::Item: Send + 'static,
    {
        scheduler.spawn(move || self.into_iter().collect())
    }

    /// Collects the sequence into an immutable shared slice on a worker.
    fn to_shared_async<S>(self, scheduler: &S) -> Task<Arc<[Self::Item]>>
    where
        S: Scheduler,
        Self::Item: Send + Sync + 'static,
    {
        scheduler.spawn(move || self.to_shared())
    }

    /// Runs [`SeqExt::to_map`] on a worker.
    fn to_map_async<S, K, F>(self, scheduler: &S, key: F) -> Task<HashMap<K, Self::Item>>
    where
        S: Scheduler,
        K: Eq + Hash + Debug + Send + 'static,
        F: FnMut(&Self::Item) -> K + Send + 'static,
        Self::Item: Send + 'static,
    {
        scheduler.spawn_try(move || self.to_map(key))
    }

    /// Runs [`SeqExt::to_map_with`] on a worker.
    fn to_map_with_async<S, K, V, F, G>(
        self,
        scheduler: &S,
        key: F,
        element: G,
    ) -> Task<HashMap<K, V>>
    where
        S: Scheduler,
        K: Eq + Hash + Debug + Send + 'static,
        V: Send + 'static,
        F: FnMut(&Self::Item) -> K + Send + 'static,
        G: FnMut(Self::Item) -> V + Send + 'static,
    {
        scheduler.spawn_try(move || self.to_map_with(key, element))
    }
}

impl<I: IntoIterator + Send + 'static> AsyncSeqExt for I {}

/// Waits for every task, returning their outputs in submission order.
///
/// Fails with the first error reported by any task. An empty input resolves to an empty `Vec`.
pub async fn when_all<I, T>(tasks: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Task<T>>,
{
    try_join_all(tasks).await
}

/// Maps every element of `source` to a task with `to_task`, then behaves like [`when_all`].
pub async fn when_all_by<I, F, T>(source: I, to_task: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Task<T>,
{
    when_all(source.into_iter().map(to_task)).await
}

/// Waits for the first task to finish and returns its position and output.
///
/// Tasks that have not finished keep running detached.
///
/// # Errors
///
/// [`Error::EmptySequence`] when `tasks` is empty; otherwise the first finished task's error.
pub async fn when_any<I, T>(tasks: I) -> Result<(usize, T)>
where
    I: IntoIterator<Item = Task<T>>,
{
    let tasks: Vec<Task<T>> = tasks.into_iter().collect();
    if tasks.is_empty() {
        return Err(Error::EmptySequence {
            operation: "when_any",
        });
    }
    let (output, index, _pending) = select_all(tasks).await;
    Ok((index, output?))
}

/// Maps every element of `source` to a task with `to_task`, then behaves like [`when_any`].
pub async fn when_any_by<I, F, T>(source: I, to_task: F) -> Result<(usize, T)>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Task<T>,
{
    when_any(source.into_iter().map(to_task)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::AsciiCaseInsensitive;
    use crate::task::scheduler::TokioScheduler;
    use std::sync::Mutex;
    use std::time::Duration;

    fn scheduler() -> TokioScheduler {
        TokioScheduler::current().unwrap()
    }

    #[tokio::test]
    async fn occurrence_checks_match_synchronous_results() {
        let s = scheduler();
        let ones = || vec![1, 1, 1];

        assert!(ones().contains_exactly_async(&s, 1, 3).await.unwrap());
        assert!(!ones().contains_exactly_async(&s, 1, 2).await.unwrap());
        assert!(ones().contains_at_least_async(&s, 1, 2).await.unwrap());
        assert!(!ones().contains_at_most_async(&s, 1, 2).await.unwrap());
        assert!(vec![1, 2].contains_async(&s, 2).await.unwrap());
    }

    #[tokio::test]
    async fn all_of_type_async_inspects_elements_on_worker() {
        let s = scheduler();
        let uniform: Vec<Box<dyn Any + Send>> = vec![Box::new(1u8), Box::new(2u8)];
        let mixed: Vec<Box<dyn Any + Send>> = vec![Box::new(1u8), Box::new("two")];
        let empty: Vec<Box<dyn Any + Send>> = Vec::new();

        assert!(uniform.all_of_type_async::<u8, _>(&s).await.unwrap());
        assert!(!mixed.all_of_type_async::<u8, _>(&s).await.unwrap());
        assert!(empty.all_of_type_async::<String, _>(&s).await.unwrap());
    }

    #[tokio::test]
    async fn invalid_threshold_fails_through_the_task() {
        let s = scheduler();

        let task = vec![1].contains_at_least_async(&s, 1, -5);
        let err = task.await.unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn comparer_variants_use_comparer() {
        let s = scheduler();
        let words = vec!["A", "a", "b"];

        assert!(
            words
                .clone()
                .contains_exactly_by_async(&s, "A", 2, AsciiCaseInsensitive)
                .await
                .unwrap()
        );
        assert!(
            words
                .clone()
                .contains_at_least_by_async(&s, "B", 1, AsciiCaseInsensitive)
                .await
                .unwrap()
        );
        assert!(
            words
                .clone()
                .contains_at_most_by_async(&s, "c", 0, AsciiCaseInsensitive)
                .await
                .unwrap()
        );
        assert!(
            words
                .contains_by_async(&s, "B", AsciiCaseInsensitive)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn predicates_and_folds_run_on_worker() {
        let s = scheduler();

        assert!(!Vec::<u8>::new().any_async(&s).await.unwrap());
        assert!((1..5).any_by_async(&s, |n| n == 4).await.unwrap());
        assert!((1..5).all_async(&s, |n| n < 5).await.unwrap());
        assert_eq!((1..=4).aggregate_async(&s, |a, b| a * b).await.unwrap(), 24);
        assert_eq!((1..=4).fold_async(&s, 10, |a, b| a + b).await.unwrap(), 20);
        assert_eq!(
            (1..=4)
                .fold_map_async(&s, 0, |a, b| a + b, |sum| format!("sum={sum}"))
                .await
                .unwrap(),
            "sum=10"
        );
    }

    #[tokio::test]
    async fn aggregate_of_empty_sequence_fails() {
        let err = Vec::<i32>::new()
            .aggregate_async(&scheduler(), |a, b| a + b)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::EmptySequence {
                operation: "aggregate"
            }
        ));
    }

    #[tokio::test]
    async fn for_each_async_visits_every_element_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        vec!['x', 'y', 'z']
            .for_each_async(&scheduler(), move |c| sink.lock().unwrap().push(c))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), ['x', 'y', 'z']);
    }

    #[tokio::test]
    async fn materialization_wrappers_collect_everything() {
        let s = scheduler();

        assert_eq!((0..3).to_vec_async(&s).await.unwrap(), [0, 1, 2]);
        assert_eq!(&*(0..3).to_shared_async(&s).await.unwrap(), &[0, 1, 2]);

        let map = vec!["one", "three"]
            .to_map_with_async(&s, |w| w.len(), |w| w.to_string())
            .await
            .unwrap();
        assert_eq!(map[&3], "one");
        assert_eq!(map[&5], "three");

        let err = vec![1, 11].to_map_async(&s, |n| n % 10).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn when_all_preserves_submission_order() {
        let s = scheduler();
        let tasks = (0..5u64).map(|n| {
            s.spawn(move || {
                std::thread::sleep(Duration::from_millis(5 * (5 - n)));
                n * n
            })
        });

        assert_eq!(when_all(tasks).await.unwrap(), [0, 1, 4, 9, 16]);
    }

    #[tokio::test]
    async fn when_all_by_reports_first_error() {
        let s = scheduler();

        let sources = vec![vec![1], vec![]];
        let err = when_all_by(sources, |v| v.aggregate_async(&s, |a, b| a + b))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptySequence { .. }));
    }

    #[tokio::test]
    async fn when_any_returns_first_finished_task() {
        let s = scheduler();
        let slow = s.spawn(|| {
            std::thread::sleep(Duration::from_millis(200));
            "slow"
        });
        let fast = s.spawn(|| "fast");

        let (index, value) = when_any([slow, fast]).await.unwrap();

        assert_eq!((index, value), (1, "fast"));
    }

    #[tokio::test]
    async fn when_any_by_maps_source_to_tasks() {
        let s = scheduler();

        let (index, value) = when_any_by([7], |n| s.spawn(move || n + 1)).await.unwrap();

        assert_eq!((index, value), (0, 8));
    }

    #[tokio::test]
    async fn when_any_of_nothing_fails() {
        let err = when_any(Vec::<Task<()>>::new()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::EmptySequence {
                operation: "when_any"
            }
        ));
    }
}
