//! Eager terminal operators.
//!
//! These force a pass over the pipeline (or a bounded prefix of it) and
//! return a concrete value. Operators that need an element report an empty
//! sequence as [`SequenceError::Empty`]; the `*_or_default` and `*_or`
//! variants return a fallback instead.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::{Sequence, SequenceError};
//!
//! let numbers = Sequence::from(vec![1, 2, 3]);
//! assert_eq!(numbers.aggregate(|a, b| a + b), Ok(6));
//! assert_eq!(numbers.aggregate_seeded(0, |a, b| a + b), 6);
//!
//! let empty: Sequence<i32> = Sequence::empty();
//! assert!(empty.first().is_err());
//! assert_eq!(empty.first_or_default(), 0);
//! assert_eq!(
//!     Sequence::from(vec![1, 2]).single(),
//!     Err(SequenceError::MoreThanOne { operation: "single" })
//! );
//! ```

mod dictionary;
mod math;

pub use dictionary::Dictionary;

use crate::error::{SequenceError, SequenceResult};
use crate::sequence::Sequence;

impl<T: 'static> Sequence<T> {
    /// Runs `action(element, index)` for every element.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(T, usize),
    {
        for (index, element) in self.iter().enumerate() {
            action(element, index);
        }
    }

    /// Folds the elements with `function`, using the first element as seed.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if the sequence has no elements.
    pub fn aggregate<F>(&self, function: F) -> SequenceResult<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.iter()
            .reduce(function)
            .ok_or(SequenceError::Empty {
                operation: "aggregate",
            })
    }

    /// Folds the elements into `seed` with `function`.
    ///
    /// Never fails: an empty sequence yields `seed`.
    pub fn aggregate_seeded<A, F>(&self, seed: A, function: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.iter().fold(seed, function)
    }

    /// Folds into `seed` and maps the final accumulator through
    /// `result_transform`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let fruits = Sequence::from(vec!["apple", "mango", "orange", "passionfruit", "grape"]);
    /// let longest = fruits.aggregate_with_result(
    ///     "banana",
    ///     |longest, next| if next.len() > longest.len() { next } else { longest },
    ///     str::to_uppercase,
    /// );
    /// assert_eq!(longest, "PASSIONFRUIT");
    /// ```
    pub fn aggregate_with_result<A, R, F, G>(&self, seed: A, function: F, result_transform: G) -> R
    where
        F: FnMut(A, T) -> A,
        G: FnOnce(A) -> R,
    {
        result_transform(self.aggregate_seeded(seed, function))
    }

    /// Counts every element.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Counts the elements for which `predicate` holds.
    pub fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.iter().filter(|element| predicate(element)).count()
    }

    /// Returns `true` if the sequence has at least one element.
    ///
    /// Pulls at most one element.
    pub fn any(&self) -> bool {
        self.iter().next().is_some()
    }

    /// Returns `true` if any element satisfies `predicate`.
    pub fn any_where<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.iter().any(|element| predicate(&element))
    }

    /// Returns `true` if every element satisfies `predicate`.
    ///
    /// An empty sequence satisfies any predicate.
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool,
    {
        self.iter().all(|element| predicate(&element))
    }

    /// Returns `true` if some element equals `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.contains_by(value, |left, right| left == right)
    }

    /// Returns `true` if some element equals `value` under `equality`.
    pub fn contains_by<Q>(&self, value: &T, equality: Q) -> bool
    where
        Q: Fn(&T, &T) -> bool,
    {
        self.iter().any(|element| equality(&element, value))
    }

    /// Returns the position of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|element| element == *value)
    }

    /// Returns the position of the last element equal to `value`.
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter()
            .enumerate()
            .filter(|(_, element)| element == value)
            .last()
            .map(|(index, _)| index)
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if the sequence is shorter
    /// than `index + 1`.
    pub fn element_at(&self, index: usize) -> SequenceResult<T> {
        let mut length = 0;
        for element in self.iter() {
            if length == index {
                return Ok(element);
            }
            length += 1;
        }
        Err(SequenceError::IndexOutOfRange {
            operation: "element_at",
            index,
            length,
        })
    }

    /// Returns the element at `index`, or `T::default()` if out of range.
    pub fn element_at_or_default(&self, index: usize) -> T
    where
        T: Default,
    {
        self.iter().nth(index).unwrap_or_default()
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if the sequence has no elements.
    pub fn first(&self) -> SequenceResult<T> {
        self.iter()
            .next()
            .ok_or(SequenceError::Empty { operation: "first" })
    }

    /// Returns the first element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if no element matches.
    pub fn first_where<P>(&self, predicate: P) -> SequenceResult<T>
    where
        P: Fn(&T) -> bool,
    {
        self.iter()
            .find(|element| predicate(element))
            .ok_or(SequenceError::Empty {
                operation: "first_where",
            })
    }

    /// Returns the first element, or `T::default()` if there is none.
    pub fn first_or_default(&self) -> T
    where
        T: Default,
    {
        self.first_or(T::default())
    }

    /// Returns the first element, or `fallback` if there is none.
    pub fn first_or(&self, fallback: T) -> T {
        self.iter().next().unwrap_or(fallback)
    }

    /// Returns the last element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if the sequence has no elements.
    pub fn last(&self) -> SequenceResult<T> {
        self.iter()
            .last()
            .ok_or(SequenceError::Empty { operation: "last" })
    }

    /// Returns the last element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if no element matches.
    pub fn last_where<P>(&self, predicate: P) -> SequenceResult<T>
    where
        P: Fn(&T) -> bool,
    {
        self.iter()
            .filter(|element| predicate(element))
            .last()
            .ok_or(SequenceError::Empty {
                operation: "last_where",
            })
    }

    /// Returns the last element, or `T::default()` if there is none.
    pub fn last_or_default(&self) -> T
    where
        T: Default,
    {
        self.last_or(T::default())
    }

    /// Returns the last element, or `fallback` if there is none.
    pub fn last_or(&self, fallback: T) -> T {
        self.iter().last().unwrap_or(fallback)
    }

    /// Returns the only element.
    ///
    /// Pulls at most two elements.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence and
    /// [`SequenceError::MoreThanOne`] if a second element exists.
    pub fn single(&self) -> SequenceResult<T> {
        only(self.iter(), "single")?.ok_or(SequenceError::Empty {
            operation: "single",
        })
    }

    /// Returns the only element satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] if nothing matches and
    /// [`SequenceError::MoreThanOne`] if several elements match.
    pub fn single_where<P>(&self, predicate: P) -> SequenceResult<T>
    where
        P: Fn(&T) -> bool,
    {
        only(self.iter().filter(|element| predicate(element)), "single_where")?.ok_or(
            SequenceError::Empty {
                operation: "single_where",
            },
        )
    }

    /// Returns the only element, or `T::default()` for an empty sequence.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::MoreThanOne`] if a second element exists.
    pub fn single_or_default(&self) -> SequenceResult<T>
    where
        T: Default,
    {
        Ok(only(self.iter(), "single_or_default")?.unwrap_or_default())
    }

    /// Returns `true` if both sequences have equal elements in equal order.
    pub fn sequence_equal(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self.sequence_equal_by(other, |left, right| left == right)
    }

    /// Returns `true` if both sequences have the same length and
    /// `equality` holds pairwise.
    pub fn sequence_equal_by<Q>(&self, other: &Self, equality: Q) -> bool
    where
        Q: Fn(&T, &T) -> bool,
    {
        let mut left = self.iter();
        let mut right = other.iter();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(expected), Some(actual)) if equality(&expected, &actual) => {}
                _ => return false,
            }
        }
    }
}

/// Returns the sole element of `elements`, `None` if empty, or an error if
/// a second element exists.
fn only<T>(
    mut elements: impl Iterator<Item = T>,
    operation: &'static str,
) -> SequenceResult<Option<T>> {
    let first = elements.next();
    if first.is_some() && elements.next().is_some() {
        return Err(SequenceError::MoreThanOne { operation });
    }
    Ok(first)
}
