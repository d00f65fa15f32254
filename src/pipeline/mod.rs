//! The lazy operator pipeline.
//!
//! Every method here takes `&self`, captures a clone of the handle, and
//! returns a new [`Sequence`] whose generator wraps a fresh upstream pass in
//! one of the [`stages`]. Nothing is pulled until the returned sequence is
//! iterated.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::Sequence;
//!
//! let result = Sequence::naturals()
//!     .filter(|value, _| value % 3 == 0)
//!     .map(|value, _| value * value)
//!     .take(4)
//!     .to_vec();
//! assert_eq!(result, vec![0, 9, 36, 81]);
//! ```

pub mod stages;

use std::rc::Rc;

use crate::sequence::Sequence;

use stages::{
    Concat, DefaultIfEmpty, Deferred, Distinct, DistinctHashed, Reverse, Select, SelectMany,
    SkipWhile, Take, TakeWhile, Where, Zip,
};

impl<T: 'static> Sequence<T> {
    /// Keeps the elements for which `predicate(element, index)` holds.
    ///
    /// `index` counts upstream elements, including rejected ones.
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Self::from_fn(move || Where::new(upstream.iter(), Rc::clone(&predicate)))
    }

    /// Applies `predicate` only when `condition` is true.
    ///
    /// When `condition` is false the result replays this sequence unchanged.
    pub fn conditional_filter<P>(&self, condition: bool, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        if condition {
            self.filter(predicate)
        } else {
            self.filter(|_, _| true)
        }
    }

    /// Maps each element through `selector(element, index)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let labels = Sequence::from(vec!["a", "b"]).map(|value, index| format!("{index}:{value}"));
    /// assert_eq!(labels.to_vec(), vec!["0:a", "1:b"]);
    /// ```
    pub fn map<U, F>(&self, selector: F) -> Sequence<U>
    where
        U: 'static,
        F: Fn(T, usize) -> U + 'static,
    {
        let upstream = self.clone();
        let selector = Rc::new(selector);
        Sequence::from_fn(move || Select::new(upstream.iter(), Rc::clone(&selector)))
    }

    /// Maps each element to a collection and flattens one level.
    ///
    /// A selector that conceptually yields a single value can return
    /// `Some(value)` or `std::iter::once(value)`.
    pub fn select_many<C, F>(&self, selector: F) -> Sequence<C::Item>
    where
        T: Clone,
        C: IntoIterator + 'static,
        C::IntoIter: 'static,
        C::Item: 'static,
        F: Fn(T, usize) -> C + 'static,
    {
        self.select_many_with(selector, |_, inner| inner)
    }

    /// Like [`select_many`](Self::select_many), passing every flattened value
    /// through `result_selector(&source_element, inner_value)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let owners = Sequence::from(vec![("ann", vec!["cat", "dog"]), ("bo", vec![])]);
    /// let pets = owners.select_many_with(
    ///     |(_, pets), _| pets,
    ///     |(owner, _), pet| format!("{owner}:{pet}"),
    /// );
    /// assert_eq!(pets.to_vec(), vec!["ann:cat", "ann:dog"]);
    /// ```
    pub fn select_many_with<C, F, R, U>(&self, selector: F, result_selector: R) -> Sequence<U>
    where
        T: Clone,
        C: IntoIterator + 'static,
        C::IntoIter: 'static,
        U: 'static,
        F: Fn(T, usize) -> C + 'static,
        R: Fn(&T, C::Item) -> U + 'static,
    {
        let upstream = self.clone();
        let selector = Rc::new(selector);
        let result_selector = Rc::new(result_selector);
        Sequence::from_fn(move || {
            SelectMany::new(
                upstream.iter(),
                Rc::clone(&selector),
                Rc::clone(&result_selector),
            )
        })
    }

    /// Yields at most `count` elements and then stops pulling upstream.
    ///
    /// `take(0)` is empty and never touches the source.
    pub fn take(&self, count: usize) -> Self {
        let upstream = self.clone();
        Self::from_fn(move || Take::new(upstream.iter(), count))
    }

    /// Skips the first `count` elements.
    pub fn skip(&self, count: usize) -> Self {
        self.skip_while(move |_, index| index < count)
    }

    /// Yields while `predicate(element, index)` holds; stops at the first
    /// failure even if later elements would pass again.
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Self::from_fn(move || TakeWhile::new(upstream.iter(), Rc::clone(&predicate)))
    }

    /// Yields until `predicate` first holds.
    pub fn take_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        self.take_while(move |element, index| !predicate(element, index))
    }

    /// Discards the leading run for which `predicate` holds, then yields the
    /// remainder unconditionally.
    pub fn skip_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        let upstream = self.clone();
        let predicate = Rc::new(predicate);
        Self::from_fn(move || SkipWhile::new(upstream.iter(), Rc::clone(&predicate)))
    }

    /// Discards elements until `predicate` first holds.
    pub fn skip_until<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T, usize) -> bool + 'static,
    {
        self.skip_while(move |element, index| !predicate(element, index))
    }

    /// Yields this sequence followed by `other`.
    ///
    /// A pass over `other` is only opened once this sequence is exhausted.
    pub fn concat(&self, other: &Self) -> Self {
        let first = self.clone();
        let second = other.clone();
        Self::from_fn(move || {
            let second = second.clone();
            Concat::new(first.iter(), Deferred::new(move || second.iter()))
        })
    }

    /// Removes duplicates using `==`, keeping first occurrences.
    ///
    /// Each candidate is compared against every element already yielded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let unique = Sequence::from(vec![1, 2, 3, 3, 4, 7, 9, 9, 12]).distinct();
    /// assert_eq!(unique.to_vec(), vec![1, 2, 3, 4, 7, 9, 12]);
    /// ```
    pub fn distinct(&self) -> Self
    where
        T: Clone + PartialEq,
    {
        self.distinct_by(|left, right| left == right)
    }

    /// Removes duplicates under a caller-supplied equality.
    pub fn distinct_by<E>(&self, equality: E) -> Self
    where
        T: Clone,
        E: Fn(&T, &T) -> bool + 'static,
    {
        let upstream = self.clone();
        let equality = Rc::new(equality);
        Self::from_fn(move || Distinct::new(upstream.iter(), Rc::clone(&equality)))
    }

    /// Hash-based [`distinct`](Self::distinct) for `Eq + Hash` elements.
    ///
    /// Yields exactly what `distinct` yields, without the quadratic scan.
    pub fn distinct_hashed(&self) -> Self
    where
        T: Clone + Eq + std::hash::Hash,
    {
        let upstream = self.clone();
        Self::from_fn(move || DistinctHashed::new(upstream.iter()))
    }

    /// `concat` followed by `distinct`.
    pub fn union(&self, other: &Self) -> Self
    where
        T: Clone + PartialEq,
    {
        self.concat(other).distinct()
    }

    /// `concat` followed by `distinct_by(equality)`.
    pub fn union_by<E>(&self, other: &Self, equality: E) -> Self
    where
        T: Clone,
        E: Fn(&T, &T) -> bool + 'static,
    {
        self.concat(other).distinct_by(equality)
    }

    /// Combines elements pairwise, stopping when either side is exhausted.
    pub fn zip<U, R, F>(&self, other: &Sequence<U>, combine: F) -> Sequence<R>
    where
        U: 'static,
        R: 'static,
        F: Fn(T, U) -> R + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        let combine = Rc::new(combine);
        Sequence::from_fn(move || Zip::new(left.iter(), right.iter(), Rc::clone(&combine)))
    }

    /// Yields the elements back to front.
    ///
    /// The first pull materializes the whole upstream.
    pub fn reverse(&self) -> Self {
        let upstream = self.clone();
        Self::from_fn(move || Reverse::new(upstream.iter()))
    }

    /// Replays this sequence, or yields `fallback` alone if it is empty.
    pub fn default_if_empty(&self, fallback: T) -> Self
    where
        T: Clone,
    {
        let upstream = self.clone();
        Self::from_fn(move || DefaultIfEmpty::new(upstream.iter(), fallback.clone()))
    }
}

impl<C> Sequence<C>
where
    C: IntoIterator + Clone + 'static,
    C::IntoIter: 'static,
    C::Item: 'static,
{
    /// Flattens a sequence of collections by one level.
    pub fn flatten(&self) -> Sequence<C::Item> {
        self.select_many(|inner, _| inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_operators_do_not_run_until_iterated() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mapped = Sequence::from(vec![1, 2, 3]).map(move |value, _| {
            counter.set(counter.get() + 1);
            value
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(mapped.to_vec(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(2, vec![1, 2])]
    #[case(10, vec![1, 2, 3])]
    fn test_take(#[case] count: usize, #[case] expected: Vec<i32>) {
        assert_eq!(Sequence::from(vec![1, 2, 3]).take(count).to_vec(), expected);
    }

    #[rstest]
    #[case(0, vec![1, 2, 3])]
    #[case(2, vec![3])]
    #[case(5, vec![])]
    fn test_skip(#[case] count: usize, #[case] expected: Vec<i32>) {
        assert_eq!(Sequence::from(vec![1, 2, 3]).skip(count).to_vec(), expected);
    }

    #[rstest]
    fn test_take_until_and_skip_until() {
        let sequence = Sequence::from(vec![1, 2, 3, 4, 1]);
        assert_eq!(sequence.take_until(|value, _| *value == 3).to_vec(), vec![1, 2]);
        assert_eq!(sequence.skip_until(|value, _| *value == 3).to_vec(), vec![3, 4, 1]);
    }

    #[rstest]
    fn test_conditional_filter() {
        let sequence = Sequence::from(vec![1, 2, 3, 4]);
        assert_eq!(
            sequence.conditional_filter(true, |value, _| value % 2 == 0).to_vec(),
            vec![2, 4]
        );
        assert_eq!(
            sequence.conditional_filter(false, |value, _| value % 2 == 0).to_vec(),
            vec![1, 2, 3, 4]
        );
    }

    #[rstest]
    fn test_union_by_custom_equality() {
        let left = Sequence::from(vec!["a", "B"]);
        let right = Sequence::from(vec!["b", "C"]);
        let merged = left.union_by(&right, |x, y| x.eq_ignore_ascii_case(y));
        assert_eq!(merged.to_vec(), vec!["a", "B", "C"]);
    }

    #[rstest]
    fn test_flatten() {
        let nested = Sequence::from(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(nested.flatten().to_vec(), vec![1, 2, 3]);
    }
}
