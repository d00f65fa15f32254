//! Grouping, joins and set operations keyed by caller-supplied equality.
//!
//! Every operator here finds "the existing key equal to this one" by a
//! linear scan under an equality closure rather than by hashing, because a
//! custom equality need not agree with any `Hash` implementation.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::Sequence;
//!
//! let sums = Sequence::from(vec![1, 2, 3, 4])
//!     .join(&Sequence::from(vec![2, 3]), |x| *x, |x| *x, |a, b| a + b);
//! assert_eq!(sums.to_vec(), vec![4, 6]);
//!
//! let common = Sequence::from(vec![44, 26, 92, 30, 71, 38])
//!     .intersect(&Sequence::from(vec![39, 59, 83, 47, 26, 4, 30]));
//! assert_eq!(common.to_vec(), vec![26, 30]);
//! ```

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::pipeline::stages::Deferred;
use crate::sequence::{Sequence, SequenceIter};

type KeySelector<T, K> = Rc<dyn Fn(&T) -> K>;
type KeyEquality<K> = Rc<dyn Fn(&K, &K) -> bool>;

/// The key projections and key equality shared by the join stages.
struct JoinKeys<T, U, K> {
    outer: KeySelector<T, K>,
    inner: KeySelector<U, K>,
    equality: KeyEquality<K>,
}

/// Nested-loop inner join: for each outer element, rescans the inner
/// sequence and yields one result per key match.
pub struct Join<T, U, K, R> {
    outer: SequenceIter<T>,
    inner: Sequence<U>,
    keys: Rc<JoinKeys<T, U, K>>,
    result_selector: Rc<dyn Fn(&T, &U) -> R>,
    current: Option<(T, K, SequenceIter<U>)>,
}

impl<T: 'static, U: 'static, K, R> Iterator for Join<T, U, K, R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        loop {
            if let Some((outer, outer_key, inner)) = &mut self.current {
                for candidate in inner.by_ref() {
                    if (self.keys.equality)(outer_key, &(self.keys.inner)(&candidate)) {
                        return Some((self.result_selector)(outer, &candidate));
                    }
                }
                self.current = None;
            }
            let outer = self.outer.next()?;
            let outer_key = (self.keys.outer)(&outer);
            self.current = Some((outer, outer_key, self.inner.iter()));
        }
    }
}

/// Yields `result_selector(outer_key, matching_inner)` for every outer
/// element, where `matching_inner` is a lazy view over the inner sequence.
pub struct GroupJoin<T, U, K, R> {
    outer: SequenceIter<T>,
    inner: Sequence<U>,
    keys: Rc<JoinKeys<T, U, K>>,
    result_selector: Rc<dyn Fn(K, Sequence<U>) -> R>,
}

impl<T, U, K, R> Iterator for GroupJoin<T, U, K, R>
where
    T: 'static,
    U: 'static,
    K: Clone + 'static,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let outer = self.outer.next()?;
        let outer_key = (self.keys.outer)(&outer);
        let keys = Rc::clone(&self.keys);
        let matched_key = outer_key.clone();
        let group = self
            .inner
            .filter(move |candidate, _| (keys.equality)(&matched_key, &(keys.inner)(candidate)));
        Some((self.result_selector)(outer_key, group))
    }
}

/// Which elements a [`Membership`] stage keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Absent,
    Present,
}

/// Filters the outer sequence by membership in the inner one.
///
/// The inner sequence is materialized once, on the first pull.
struct Membership<T> {
    outer: SequenceIter<T>,
    inner: Option<Sequence<T>>,
    realized: Vec<T>,
    equality: KeyEquality<T>,
    keep: Keep,
}

impl<T: 'static> Membership<T> {
    fn new(
        outer: SequenceIter<T>,
        inner: Sequence<T>,
        equality: KeyEquality<T>,
        keep: Keep,
    ) -> Self {
        Self {
            outer,
            inner: Some(inner),
            realized: Vec::new(),
            equality,
            keep,
        }
    }
}

impl<T: 'static> Iterator for Membership<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if let Some(inner) = self.inner.take() {
            self.realized = inner.to_vec();
            tracing::trace!(
                length = self.realized.len(),
                keep = ?self.keep,
                "set operation materialized inner"
            );
        }
        for candidate in self.outer.by_ref() {
            let present = self
                .realized
                .iter()
                .any(|member| (self.equality)(&candidate, member));
            if present == (self.keep == Keep::Present) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Outer elements with no equal counterpart in the inner sequence.
pub struct Except<T>(Membership<T>);

impl<T: 'static> Iterator for Except<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next()
    }
}

/// Outer elements with at least one equal counterpart in the inner sequence.
pub struct Intersect<T>(Membership<T>);

impl<T: 'static> Iterator for Intersect<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.next()
    }
}

/// A key together with the elements that mapped to it, in input order.
///
/// Dereferences to the [`Sequence`] of its elements.
///
/// # Examples
///
/// ```rust
/// use lazyseq::Sequence;
///
/// let groups = Sequence::from(vec![1, 2, 3, 4, 5]).group_by(|value| value % 2);
/// let first = groups.first().unwrap();
/// assert_eq!(*first.key(), 1);
/// assert_eq!(first.to_vec(), vec![1, 3, 5]);
/// ```
pub struct Grouping<K, E> {
    key: K,
    elements: Sequence<E>,
}

impl<K, E> Grouping<K, E> {
    /// Returns the group key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Splits the grouping into its key and element sequence.
    pub fn into_parts(self) -> (K, Sequence<E>) {
        (self.key, self.elements)
    }
}

impl<K: Clone, E> Clone for Grouping<K, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            elements: self.elements.clone(),
        }
    }
}

impl<K, E> Deref for Grouping<K, E> {
    type Target = Sequence<E>;

    fn deref(&self) -> &Sequence<E> {
        &self.elements
    }
}

impl<K: fmt::Debug, E> fmt::Debug for Grouping<K, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Grouping")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn collect_groups<T, K, E>(
    elements: SequenceIter<T>,
    key_selector: &dyn Fn(&T) -> K,
    element_selector: &dyn Fn(T) -> E,
    key_equality: &dyn Fn(&K, &K) -> bool,
) -> Vec<(K, Vec<E>)> {
    let mut groups: Vec<(K, Vec<E>)> = Vec::new();
    for element in elements {
        let key = key_selector(&element);
        let value = element_selector(element);
        match groups
            .iter_mut()
            .find(|(existing, _)| key_equality(existing, &key))
        {
            Some((_, members)) => members.push(value),
            None => groups.push((key, vec![value])),
        }
    }
    tracing::trace!(groups = groups.len(), "group_by built key map");
    groups
}

impl<T: 'static> Sequence<T> {
    /// Groups elements by key using `==` on keys.
    pub fn group_by<K, F>(&self, key_selector: F) -> Sequence<Grouping<K, T>>
    where
        T: Clone,
        K: PartialEq + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.group_by_with(
            key_selector,
            |element| element,
            |key, elements| Grouping { key, elements },
            |left: &K, right: &K| left == right,
        )
    }

    /// Groups projected elements by key using `==` on keys.
    pub fn group_by_element<K, E, F, G>(
        &self,
        key_selector: F,
        element_selector: G,
    ) -> Sequence<Grouping<K, E>>
    where
        K: PartialEq + 'static,
        E: Clone + 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
    {
        self.group_by_with(
            key_selector,
            element_selector,
            |key, elements| Grouping { key, elements },
            |left: &K, right: &K| left == right,
        )
    }

    /// Groups projected elements by key and maps each group through
    /// `result_selector(key, elements)`.
    pub fn group_by_result<K, E, R, F, G, H>(
        &self,
        key_selector: F,
        element_selector: G,
        result_selector: H,
    ) -> Sequence<R>
    where
        K: PartialEq + 'static,
        E: Clone + 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
        H: Fn(K, Sequence<E>) -> R + 'static,
    {
        self.group_by_with(
            key_selector,
            element_selector,
            result_selector,
            |left: &K, right: &K| left == right,
        )
    }

    /// The general form of grouping: keys are merged whenever
    /// `key_equality` says they are equal, even if they are distinct values.
    ///
    /// Grouping happens on the first pull of each pass and scans the whole
    /// upstream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let words = Sequence::from(vec!["Apple", "avocado", "Banana", "blueberry"]);
    /// let counts = words.group_by_with(
    ///     |word| word.chars().next().unwrap_or_default(),
    ///     |word| word.len(),
    ///     |key, lengths| (key, lengths.count()),
    ///     |left: &char, right: &char| left.eq_ignore_ascii_case(right),
    /// );
    /// assert_eq!(counts.to_vec(), vec![('A', 2), ('B', 2)]);
    /// ```
    pub fn group_by_with<K, E, R, F, G, H, Q>(
        &self,
        key_selector: F,
        element_selector: G,
        result_selector: H,
        key_equality: Q,
    ) -> Sequence<R>
    where
        K: 'static,
        E: Clone + 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(T) -> E + 'static,
        H: Fn(K, Sequence<E>) -> R + 'static,
        Q: Fn(&K, &K) -> bool + 'static,
    {
        let upstream = self.clone();
        let selectors = Rc::new((key_selector, element_selector, result_selector, key_equality));
        Sequence::from_fn(move || {
            let upstream = upstream.clone();
            let selectors = Rc::clone(&selectors);
            Deferred::new(move || {
                let (key_selector, element_selector, result_selector, key_equality) = &*selectors;
                let groups =
                    collect_groups(upstream.iter(), key_selector, element_selector, key_equality);
                groups
                    .into_iter()
                    .map(|(key, members)| result_selector(key, Sequence::from(members)))
                    .collect::<Vec<_>>()
                    .into_iter()
            })
        })
    }

    /// Inner join on `==` between projected keys.
    pub fn join<U, K, R, F, G, H>(
        &self,
        inner: &Sequence<U>,
        outer_key_selector: F,
        inner_key_selector: G,
        result_selector: H,
    ) -> Sequence<R>
    where
        U: 'static,
        K: PartialEq + 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(&U) -> K + 'static,
        H: Fn(&T, &U) -> R + 'static,
    {
        self.join_by(
            inner,
            outer_key_selector,
            inner_key_selector,
            result_selector,
            |left: &K, right: &K| left == right,
        )
    }

    /// Nested-loop inner join under a custom key equality.
    ///
    /// Every outer element rescans the inner sequence: O(n·m) comparisons,
    /// no index.
    pub fn join_by<U, K, R, F, G, H, Q>(
        &self,
        inner: &Sequence<U>,
        outer_key_selector: F,
        inner_key_selector: G,
        result_selector: H,
        key_equality: Q,
    ) -> Sequence<R>
    where
        U: 'static,
        K: 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(&U) -> K + 'static,
        H: Fn(&T, &U) -> R + 'static,
        Q: Fn(&K, &K) -> bool + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let keys = Rc::new(JoinKeys {
            outer: Rc::new(outer_key_selector) as KeySelector<T, K>,
            inner: Rc::new(inner_key_selector) as KeySelector<U, K>,
            equality: Rc::new(key_equality) as KeyEquality<K>,
        });
        let result_selector: Rc<dyn Fn(&T, &U) -> R> = Rc::new(result_selector);
        Sequence::from_fn(move || Join {
            outer: outer.iter(),
            inner: inner.clone(),
            keys: Rc::clone(&keys),
            result_selector: Rc::clone(&result_selector),
            current: None,
        })
    }

    /// Pairs each outer key with the lazy sequence of matching inner elements.
    pub fn group_join<U, K, R, F, G, H>(
        &self,
        inner: &Sequence<U>,
        outer_key_selector: F,
        inner_key_selector: G,
        result_selector: H,
    ) -> Sequence<R>
    where
        U: 'static,
        K: Clone + PartialEq + 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(&U) -> K + 'static,
        H: Fn(K, Sequence<U>) -> R + 'static,
    {
        self.group_join_by(
            inner,
            outer_key_selector,
            inner_key_selector,
            result_selector,
            |left: &K, right: &K| left == right,
        )
    }

    /// [`group_join`](Self::group_join) under a custom key equality.
    pub fn group_join_by<U, K, R, F, G, H, Q>(
        &self,
        inner: &Sequence<U>,
        outer_key_selector: F,
        inner_key_selector: G,
        result_selector: H,
        key_equality: Q,
    ) -> Sequence<R>
    where
        U: 'static,
        K: Clone + 'static,
        R: 'static,
        F: Fn(&T) -> K + 'static,
        G: Fn(&U) -> K + 'static,
        H: Fn(K, Sequence<U>) -> R + 'static,
        Q: Fn(&K, &K) -> bool + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let keys = Rc::new(JoinKeys {
            outer: Rc::new(outer_key_selector) as KeySelector<T, K>,
            inner: Rc::new(inner_key_selector) as KeySelector<U, K>,
            equality: Rc::new(key_equality) as KeyEquality<K>,
        });
        let result_selector: Rc<dyn Fn(K, Sequence<U>) -> R> = Rc::new(result_selector);
        Sequence::from_fn(move || GroupJoin {
            outer: outer.iter(),
            inner: inner.clone(),
            keys: Rc::clone(&keys),
            result_selector: Rc::clone(&result_selector),
        })
    }

    /// Outer elements not equal (`==`) to any element of `inner`.
    pub fn except(&self, inner: &Self) -> Self
    where
        T: PartialEq,
    {
        self.except_by(inner, |left, right| left == right)
    }

    /// Outer elements with no counterpart in `inner` under `equality`.
    pub fn except_by<Q>(&self, inner: &Self, equality: Q) -> Self
    where
        Q: Fn(&T, &T) -> bool + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let equality: KeyEquality<T> = Rc::new(equality);
        Self::from_fn(move || {
            Except(Membership::new(
                outer.iter(),
                inner.clone(),
                Rc::clone(&equality),
                Keep::Absent,
            ))
        })
    }

    /// Outer elements equal (`==`) to at least one element of `inner`.
    ///
    /// Duplicates in the outer sequence are kept.
    pub fn intersect(&self, inner: &Self) -> Self
    where
        T: PartialEq,
    {
        self.intersect_by(inner, |left, right| left == right)
    }

    /// Outer elements with a counterpart in `inner` under `equality`.
    pub fn intersect_by<Q>(&self, inner: &Self, equality: Q) -> Self
    where
        Q: Fn(&T, &T) -> bool + 'static,
    {
        let outer = self.clone();
        let inner = inner.clone();
        let equality: KeyEquality<T> = Rc::new(equality);
        Self::from_fn(move || {
            Intersect(Membership::new(
                outer.iter(),
                inner.clone(),
                Rc::clone(&equality),
                Keep::Present,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    #[rstest]
    fn test_group_by_preserves_first_key_order() {
        let groups = Sequence::from(vec!["bb", "a", "cc", "d"]).group_by(|word| word.len());
        let summary: Vec<(usize, Vec<&str>)> = groups
            .iter()
            .map(|group| (*group.key(), group.to_vec()))
            .collect();
        assert_eq!(summary, vec![(2, vec!["bb", "cc"]), (1, vec!["a", "d"])]);
    }

    #[rstest]
    fn test_group_by_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let groups = Sequence::from(vec![1, 2, 3]).group_by(move |value| {
            counter.set(counter.get() + 1);
            value % 2
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(groups.iter().count(), 2);
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn test_group_by_element_projects_members() {
        let groups = Sequence::from(vec![(1, 'a'), (2, 'b'), (1, 'c')])
            .group_by_element(|(key, _)| *key, |(_, tag)| tag);
        let tags: Vec<Vec<char>> = groups.iter().map(|group| group.to_vec()).collect();
        assert_eq!(tags, vec![vec!['a', 'c'], vec!['b']]);
    }

    #[rstest]
    fn test_group_by_result_maps_groups() {
        let totals = Sequence::from(vec![1, 2, 3, 4, 5, 6]).group_by_result(
            |value| value % 3,
            |value| value,
            |key, members| (key, members.iter().sum::<i32>()),
        );
        assert_eq!(totals.to_vec(), vec![(1, 5), (2, 7), (0, 9)]);
    }

    #[rstest]
    fn test_join_yields_every_matching_pair() {
        let outer = Sequence::from(vec![1, 2, 2]);
        let inner = Sequence::from(vec![(2, 'x'), (2, 'y'), (3, 'z')]);
        let joined = outer.join(&inner, |value| *value, |(key, _)| *key, |value, (_, tag)| {
            format!("{value}{tag}")
        });
        assert_eq!(joined.to_vec(), vec!["2x", "2y", "2x", "2y"]);
    }

    #[rstest]
    fn test_join_by_custom_equality() {
        let outer = Sequence::from(vec!["A", "b"]);
        let inner = Sequence::from(vec!["a", "B"]);
        let joined = outer.join_by(
            &inner,
            |value| value.to_string(),
            |value| value.to_string(),
            |left, right| format!("{left}{right}"),
            |left: &String, right: &String| left.eq_ignore_ascii_case(right),
        );
        assert_eq!(joined.to_vec(), vec!["Aa", "bB"]);
    }

    #[rstest]
    fn test_group_join_includes_empty_groups() {
        let owners = Sequence::from(vec![1, 2]);
        let pets = Sequence::from(vec![(1, "rex"), (1, "tom")]);
        let result = owners.group_join(&pets, |owner| *owner, |(owner, _)| *owner, |owner, pets| {
            (owner, pets.map(|(_, name), _| name).to_vec())
        });
        assert_eq!(result.to_vec(), vec![(1, vec!["rex", "tom"]), (2, vec![])]);
    }

    #[rstest]
    fn test_except() {
        let result = Sequence::from(vec![1, 2, 3, 4]).except(&Sequence::from(vec![2, 4, 6]));
        assert_eq!(result.to_vec(), vec![1, 3]);
    }

    #[rstest]
    fn test_except_materializes_inner_once_per_pass() {
        let pulls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulls);
        let inner = Sequence::from(vec![2, 3]).map(move |value, _| {
            counter.set(counter.get() + 1);
            value
        });
        let result = Sequence::from(vec![1, 2, 3, 4, 5]).except(&inner);
        assert_eq!(pulls.get(), 0);
        assert_eq!(result.to_vec(), vec![1, 4, 5]);
        assert_eq!(pulls.get(), 2);
    }

    #[rstest]
    fn test_intersect_by_custom_equality() {
        let result = Sequence::from(vec!["x", "Y", "z"])
            .intersect_by(&Sequence::from(vec!["y", "Z"]), |left, right| {
                left.eq_ignore_ascii_case(right)
            });
        assert_eq!(result.to_vec(), vec!["Y", "z"]);
    }
}
