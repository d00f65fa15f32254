//! Stable, lazy multi-key ordering.
//!
//! [`OrderedSequence`] pairs an upstream [`Sequence`] with an accumulated
//! [`Comparator`]. Iterating it materializes the upstream, builds a
//! [`PartialSortHeap`] and extracts one element per pull, so
//! `order_by(..).take(k)` only pays for `k` extractions.
//!
//! `then_by*` composes a secondary comparator that is only consulted when
//! everything before it ties. Each call returns a new `OrderedSequence`;
//! the receiver keeps its own comparator.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::Sequence;
//!
//! let people = Sequence::from(vec![("ann", 31), ("bob", 25), ("cid", 31), ("dee", 25)]);
//! let ordered = people
//!     .order_by_descending(|(_, age)| *age)
//!     .then_by(|(name, _)| *name)
//!     .map(|(name, _), _| name);
//! assert_eq!(ordered.to_vec(), vec!["ann", "cid", "bob", "dee"]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::heap::PartialSortHeap;
use crate::pipeline::stages::Deferred;
use crate::sequence::{Generator, Sequence};

/// A shared three-way comparison over `T`.
pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// A sequence whose iteration is a streaming heap sort under an accumulated
/// comparator.
///
/// Dereferences to [`Sequence`], so every lazy and terminal operator chains
/// directly after an ordering.
pub struct OrderedSequence<T> {
    ordered: Sequence<T>,
    upstream: Sequence<T>,
    sorter: Generator<T>,
    comparator: Comparator<T>,
}

impl<T> Clone for OrderedSequence<T> {
    fn clone(&self) -> Self {
        Self {
            ordered: self.ordered.clone(),
            upstream: self.upstream.clone(),
            sorter: Rc::clone(&self.sorter),
            comparator: Rc::clone(&self.comparator),
        }
    }
}

impl<T: 'static> OrderedSequence<T> {
    /// Orders `upstream` by `comparator`.
    pub fn new(upstream: &Sequence<T>, comparator: Comparator<T>) -> Self {
        let source = upstream.clone();
        let heap_comparator = Rc::clone(&comparator);
        let ordered = Sequence::from_fn(move || {
            let source = source.clone();
            let comparator = Rc::clone(&heap_comparator);
            Deferred::new(move || {
                let values = source.to_vec();
                tracing::trace!(length = values.len(), "ordered sequence materialized upstream");
                PartialSortHeap::new(values, move |left: &T, right: &T| comparator(left, right))
            })
        });
        let sorter = ordered.generator();
        Self {
            ordered,
            upstream: upstream.clone(),
            sorter,
            comparator,
        }
    }

    /// Returns the accumulated comparator.
    pub fn comparator(&self) -> Comparator<T> {
        Rc::clone(&self.comparator)
    }

    /// Returns the ordered view as a plain [`Sequence`].
    pub fn to_sequence(&self) -> Sequence<T> {
        self.ordered.clone()
    }

    fn then_with(&self, additional: Comparator<T>) -> Self {
        let current = Rc::clone(&self.comparator);
        let composed: Comparator<T> = Rc::new(move |left: &T, right: &T| {
            current(left, right).then_with(|| additional(left, right))
        });
        Self::new(self.tie_break_source(), composed)
    }

    /// The source a refined ordering sorts.
    ///
    /// Normally the pre-sort upstream. Once the ordered view itself has been
    /// mutated it no longer reads from the heap, and its materialized
    /// contents are sorted instead. Those are already in this ordering's
    /// stable order, so the refinement still ends up stable.
    fn tie_break_source(&self) -> &Sequence<T> {
        if Rc::ptr_eq(&self.ordered.generator(), &self.sorter) {
            &self.upstream
        } else {
            &self.ordered
        }
    }

    /// Breaks ties by ascending `key_selector`.
    pub fn then_by<K, F>(&self, key_selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_with(key_comparator(key_selector, K::cmp, false))
    }

    /// Breaks ties by ascending `key_selector` under `comparator`.
    pub fn then_by_with<K, F, C>(&self, key_selector: F, comparator: C) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        self.then_with(key_comparator(key_selector, comparator, false))
    }

    /// Breaks ties by descending `key_selector`.
    pub fn then_by_descending<K, F>(&self, key_selector: F) -> Self
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        self.then_with(key_comparator(key_selector, K::cmp, true))
    }

    /// Breaks ties by descending `key_selector` under `comparator`.
    pub fn then_by_descending_with<K, F, C>(&self, key_selector: F, comparator: C) -> Self
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        self.then_with(key_comparator(key_selector, comparator, true))
    }
}

impl<T> Deref for OrderedSequence<T> {
    type Target = Sequence<T>;

    fn deref(&self) -> &Sequence<T> {
        &self.ordered
    }
}

impl<T: 'static> IntoIterator for OrderedSequence<T> {
    type Item = T;
    type IntoIter = crate::sequence::SequenceIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}

impl<T> fmt::Debug for OrderedSequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OrderedSequence")
            .finish_non_exhaustive()
    }
}

fn key_comparator<T, K, F, C>(key_selector: F, comparator: C, descending: bool) -> Comparator<T>
where
    T: 'static,
    K: 'static,
    F: Fn(&T) -> K + 'static,
    C: Fn(&K, &K) -> Ordering + 'static,
{
    Rc::new(move |left: &T, right: &T| {
        let ordering = comparator(&key_selector(left), &key_selector(right));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    })
}

impl<T: 'static> Sequence<T> {
    /// Orders ascending by `key_selector`.
    pub fn order_by<K, F>(&self, key_selector: F) -> OrderedSequence<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        OrderedSequence::new(self, key_comparator(key_selector, K::cmp, false))
    }

    /// Orders ascending by `key_selector` under a custom key comparator.
    pub fn order_by_with<K, F, C>(&self, key_selector: F, comparator: C) -> OrderedSequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        OrderedSequence::new(self, key_comparator(key_selector, comparator, false))
    }

    /// Orders descending by `key_selector`.
    ///
    /// Equal keys keep their input order.
    pub fn order_by_descending<K, F>(&self, key_selector: F) -> OrderedSequence<T>
    where
        K: Ord + 'static,
        F: Fn(&T) -> K + 'static,
    {
        OrderedSequence::new(self, key_comparator(key_selector, K::cmp, true))
    }

    /// Orders descending by `key_selector` under a custom key comparator.
    pub fn order_by_descending_with<K, F, C>(
        &self,
        key_selector: F,
        comparator: C,
    ) -> OrderedSequence<T>
    where
        K: 'static,
        F: Fn(&T) -> K + 'static,
        C: Fn(&K, &K) -> Ordering + 'static,
    {
        OrderedSequence::new(self, key_comparator(key_selector, comparator, true))
    }

    /// Orders the elements themselves ascending.
    pub fn order(&self) -> OrderedSequence<T>
    where
        T: Ord + Clone,
    {
        self.order_by(T::clone)
    }

    /// Orders the elements themselves descending.
    pub fn order_descending(&self) -> OrderedSequence<T>
    where
        T: Ord + Clone,
    {
        self.order_by_descending(T::clone)
    }
}

#[cfg(feature = "shuffle")]
mod shuffle {
    use std::cell::RefCell;
    use std::cmp::Ordering;
    use std::rc::Rc;

    use rand::Rng;

    use super::{Comparator, OrderedSequence};
    use crate::sequence::{Generator, Sequence};

    const fn ordering_from(draw: u8) -> Ordering {
        match draw {
            0 => Ordering::Less,
            1 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }

    impl<T: 'static> Sequence<T> {
        /// Orders by a comparator that answers each comparison at random.
        ///
        /// The permutation is approximate and not uniformly distributed.
        pub fn shuffle(&self) -> OrderedSequence<T> {
            let comparator: Comparator<T> =
                Rc::new(|_: &T, _: &T| ordering_from(rand::random_range(0..3)));
            OrderedSequence::new(self, comparator)
        }

        /// Like [`shuffle`](Self::shuffle), drawing from `rng`.
        ///
        /// The generator state carries over between passes, so each pass
        /// may produce a different permutation.
        pub fn shuffle_with_rng<R>(&self, rng: R) -> OrderedSequence<T>
        where
            R: Rng + 'static,
        {
            let rng = RefCell::new(rng);
            let comparator: Comparator<T> =
                Rc::new(move |_: &T, _: &T| ordering_from(rng.borrow_mut().random_range(0..3)));
            OrderedSequence::new(self, comparator)
        }
    }
}
