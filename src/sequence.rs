//! The re-iterable sequence handle and its source adapters.
//!
//! A [`Sequence`] is a cheap, reference-counted handle to a *generator*: a
//! closure that produces a fresh iterator every time the sequence is
//! iterated. Every lazy operator builds a new generator that captures its
//! upstream handle, so pipelines form a chain from consumer to producer and
//! no work happens until something pulls values.
//!
//! # Sources
//!
//! | Constructor | Re-iteration behavior |
//! |-------------|-----------------------|
//! | [`Sequence::from_iterable`] | replays the container (cloned per pass) |
//! | [`Sequence::from_fn`] | invokes the generator closure again |
//! | [`Sequence::from_iter_once`] | advances on pulls only; empty once drained |
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::Sequence;
//!
//! let numbers = Sequence::from(vec![1, 2, 3]);
//! assert_eq!(numbers.to_vec(), vec![1, 2, 3]);
//! assert_eq!(numbers.to_vec(), vec![1, 2, 3]); // replays
//!
//! let once = Sequence::from_iter_once(vec![1, 2, 3].into_iter());
//! assert_eq!(once.to_vec(), vec![1, 2, 3]);
//! assert!(once.to_vec().is_empty()); // single-use source
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{SequenceError, SequenceResult};

/// The iterator type produced by one pass over a [`Sequence`].
pub type SequenceIter<T> = Box<dyn Iterator<Item = T>>;

/// A re-invocable producer of fresh iterators.
pub(crate) type Generator<T> = Rc<dyn Fn() -> SequenceIter<T>>;

/// A lazily evaluated, re-iterable sequence of `T`.
///
/// Cloning a `Sequence` clones the handle, not the elements: both handles
/// share the same backing source. The mutating operators ([`add`],
/// [`insert`], [`remove`]) swap that shared source, so the change is
/// visible through every clone and every stage built on top of it.
///
/// `Sequence` is neither `Send` nor `Sync`.
///
/// [`add`]: Sequence::add
/// [`insert`]: Sequence::insert
/// [`remove`]: Sequence::remove
pub struct Sequence<T> {
    source: Rc<RefCell<Generator<T>>>,
}

static_assertions::assert_not_impl_any!(Sequence<i32>: Send, Sync);

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<T: 'static> Sequence<T> {
    /// Creates a sequence from a generator closure.
    ///
    /// The closure is invoked once per pass. It must itself be re-invocable
    /// for the sequence to replay; if it hands out a single-use iterator,
    /// later passes see whatever that iterator has left.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let evens = Sequence::from_fn(|| (0..).step_by(2));
    /// assert_eq!(evens.take(3).to_vec(), vec![0, 2, 4]);
    /// ```
    pub fn from_fn<F, I>(generator: F) -> Self
    where
        F: Fn() -> I + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let generator: Generator<T> =
            Rc::new(move || -> SequenceIter<T> { Box::new(generator().into_iter()) });
        Self {
            source: Rc::new(RefCell::new(generator)),
        }
    }

    /// Creates a sequence that replays a finite container.
    ///
    /// The container is cloned at the start of every pass, so each pass
    /// yields the same elements in the same order.
    pub fn from_iterable<C>(container: C) -> Self
    where
        C: IntoIterator<Item = T> + Clone + 'static,
        C::IntoIter: 'static,
    {
        Self::from_fn(move || container.clone())
    }

    /// Creates a sequence over a single-use iterator.
    ///
    /// The iterator stays in a shared slot and only advances when a pass
    /// pulls from it. Once it reports exhaustion every later pass is empty.
    pub fn from_iter_once<I>(iterator: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        let shared = Rc::new(RefCell::new(Some(iterator)));
        Self::from_fn(move || {
            let shared = Rc::clone(&shared);
            std::iter::from_fn(move || {
                let mut slot = shared.borrow_mut();
                let element = slot.as_mut()?.next();
                if element.is_none() {
                    *slot = None;
                }
                element
            })
        })
    }

    /// Creates an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_fn(std::iter::empty)
    }

    /// Returns a fresh iterator for one pass over this sequence.
    ///
    /// Nothing upstream runs until the returned iterator is advanced.
    pub fn iter(&self) -> SequenceIter<T> {
        let generator = self.generator();
        generator()
    }

    /// Returns the generator currently backing this handle.
    pub(crate) fn generator(&self) -> Generator<T> {
        Rc::clone(&*self.source.borrow())
    }

    /// Drains one full pass into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    fn replace_source(&self, values: Vec<T>)
    where
        T: Clone,
    {
        let generator: Generator<T> =
            Rc::new(move || -> SequenceIter<T> { Box::new(values.clone().into_iter()) });
        *self.source.borrow_mut() = generator;
    }

    /// Appends `value`, replacing the backing source with a materialized copy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let numbers = Sequence::from(vec![1, 2]);
    /// let doubled = numbers.map(|value, _| value * 2);
    /// numbers.add(3);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn add(&self, value: T)
    where
        T: Clone,
    {
        let mut values = self.to_vec();
        values.push(value);
        tracing::trace!(length = values.len(), "sequence source replaced by add");
        self.replace_source(values);
    }

    /// Inserts `value` at `index`, replacing the backing source.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] if `index` is greater than
    /// the current length. The source is left untouched in that case.
    pub fn insert(&self, value: T, index: usize) -> SequenceResult<()>
    where
        T: Clone,
    {
        let mut values = self.to_vec();
        if index > values.len() {
            return Err(SequenceError::IndexOutOfRange {
                operation: "insert",
                index,
                length: values.len(),
            });
        }
        values.insert(index, value);
        tracing::trace!(index, length = values.len(), "sequence source replaced by insert");
        self.replace_source(values);
        Ok(())
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether an element was removed. The backing source is only
    /// replaced when something was removed.
    pub fn remove(&self, value: &T) -> bool
    where
        T: Clone + PartialEq,
    {
        let mut values = self.to_vec();
        let Some(position) = values.iter().position(|element| element == value) else {
            return false;
        };
        values.remove(position);
        tracing::trace!(position, length = values.len(), "sequence source replaced by remove");
        self.replace_source(values);
        true
    }
}

impl Sequence<i64> {
    /// Creates the sequence `start, start + 1, ..., start + count - 1`.
    ///
    /// The sequence stops at `i64::MAX` instead of overflowing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// assert_eq!(Sequence::range(3, 4).to_vec(), vec![3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn range(start: i64, count: usize) -> Self {
        Self::from_fn(move || {
            std::iter::successors(Some(start), |value: &i64| value.checked_add(1)).take(count)
        })
    }

    /// Creates the infinite sequence `0, 1, 2, ...`.
    ///
    /// Only ever consume it through a bounding operator such as `take`.
    #[must_use]
    pub fn naturals() -> Self {
        Self::from_fn(|| 0_i64..)
    }
}

impl<T: Clone + 'static> Sequence<T> {
    /// Creates a sequence that yields `value` exactly `count` times.
    pub fn repeat(value: T, count: usize) -> Self {
        Self::from_fn(move || std::iter::repeat_n(value.clone(), count))
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Sequence<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_iterable(values)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: 'static> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = SequenceIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: 'static> IntoIterator for &Sequence<T> {
    type Item = T;
    type IntoIter = SequenceIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Sequence").finish_non_exhaustive()
    }
}
