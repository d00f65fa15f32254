//! A partially-sorted binary heap that drives lazy ordering.
//!
//! [`PartialSortHeap`] heapifies a `Vec` in place in O(n) and then hands out
//! the extreme element one extraction at a time, so consuming the first `k`
//! elements of an ordering costs O(n + k log n) rather than a full sort.
//!
//! # Stability
//!
//! Ties under the supplied comparator are broken by each element's original
//! position in the input, ascending. Draining the heap therefore produces the
//! same order as a stable sort.
//!
//! The input `Vec` becomes the heap storage as is; values are never
//! wrapped. Original positions live in a side table and are recorded
//! lazily: a slot only gets its origin right before it first moves. A slot
//! that has never moved still sits at its input position, so that position
//! *is* its origin.
//!
//! # Examples
//!
//! ```rust
//! use lazyseq::heap::PartialSortHeap;
//!
//! let mut heap = PartialSortHeap::new(vec![5, 1, 4, 1, 3], |a: &i32, b: &i32| a.cmp(b));
//! assert_eq!(heap.extract_top(), Some(1));
//! assert_eq!(heap.extract_top(), Some(1));
//! assert_eq!(heap.peek(), Some(&3));
//!
//! let descending: Vec<i32> =
//!     PartialSortHeap::max_heap(vec![2, 9, 4], |a: &i32, b: &i32| a.cmp(b)).collect();
//! assert_eq!(descending, vec![9, 4, 2]);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

/// Which end of the comparator order sits at the top of the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapOrientation {
    /// The smallest element under the comparator is extracted first.
    Min,
    /// The largest element under the comparator is extracted first.
    Max,
}

impl HeapOrientation {
    /// Maps a comparator result into heap priority order.
    #[must_use]
    pub const fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Min => ordering,
            Self::Max => ordering.reverse(),
        }
    }
}

/// A binary heap over a `Vec`, ordered by a caller-supplied comparator with
/// stable tie-breaking.
///
/// # Time Complexity
///
/// | Operation     | Complexity |
/// |---------------|------------|
/// | `new`         | O(n)       |
/// | `peek`        | O(1)       |
/// | `extract_top` | O(log n)   |
pub struct PartialSortHeap<T, C> {
    values: Vec<T>,
    origins: Vec<Option<usize>>,
    comparator: C,
    orientation: HeapOrientation,
}

impl<T, C> PartialSortHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Builds a min-heap: the smallest element under `comparator` is on top.
    pub fn new(values: Vec<T>, comparator: C) -> Self {
        Self::with_orientation(values, comparator, HeapOrientation::Min)
    }

    /// Builds a max-heap by reversing the sign of `comparator`.
    ///
    /// Equal elements still come out in their original order.
    pub fn max_heap(values: Vec<T>, comparator: C) -> Self {
        Self::with_orientation(values, comparator, HeapOrientation::Max)
    }

    /// Builds a heap with an explicit orientation.
    pub fn with_orientation(values: Vec<T>, comparator: C, orientation: HeapOrientation) -> Self {
        let origins = vec![None; values.len()];
        let mut heap = Self {
            values,
            origins,
            comparator,
            orientation,
        };
        heap.heapify();
        tracing::trace!(length = heap.len(), ?orientation, "heap constructed");
        heap
    }

    /// Returns the number of elements still in the heap.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` once every element has been extracted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if an element is available for extraction.
    pub fn has_top(&self) -> bool {
        !self.is_empty()
    }

    /// Returns the element that the next [`extract_top`](Self::extract_top)
    /// would yield.
    pub fn peek(&self) -> Option<&T> {
        self.values.first()
    }

    /// Removes and returns the top element, restoring heap order.
    ///
    /// Returns `None` on an empty heap.
    pub fn extract_top(&mut self) -> Option<T> {
        if self.values.len() <= 1 {
            self.origins.pop();
            return self.values.pop();
        }
        let last = self.values.len() - 1;
        self.exchange(0, last);
        self.origins.pop();
        let top = self.values.pop()?;
        self.sift_down(0);
        Some(top)
    }

    /// Returns the remaining values in heap (not sorted) order.
    pub fn elements(&self) -> &[T] {
        &self.values
    }

    /// Drains the heap into a `Vec` in extraction order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.collect()
    }

    fn heapify(&mut self) {
        for position in (0..=self.values.len() / 2).rev() {
            self.sift_down(position);
        }
    }

    fn origin(&self, position: usize) -> usize {
        self.origins[position].unwrap_or(position)
    }

    /// Swaps two slots, pinning each one's origin before it leaves home.
    fn exchange(&mut self, left: usize, right: usize) {
        self.origins[left].get_or_insert(left);
        self.origins[right].get_or_insert(right);
        self.values.swap(left, right);
        self.origins.swap(left, right);
    }

    fn precedes(&self, left: usize, right: usize) -> bool {
        self.orientation
            .orient((self.comparator)(&self.values[left], &self.values[right]))
            .then(self.origin(left).cmp(&self.origin(right)))
            == Ordering::Less
    }

    fn sift_down(&mut self, mut position: usize) {
        let length = self.values.len();
        while position < length {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut best = position;
            if left < length && self.precedes(left, best) {
                best = left;
            }
            if right < length && self.precedes(right, best) {
                best = right;
            }
            if best == position {
                break;
            }
            self.exchange(position, best);
            position = best;
        }
    }
}

impl<T, C> Iterator for PartialSortHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.extract_top()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl<T, C> ExactSizeIterator for PartialSortHeap<T, C> where C: Fn(&T, &T) -> Ordering {}

impl<T, C> FusedIterator for PartialSortHeap<T, C> where C: Fn(&T, &T) -> Ordering {}

impl<T: fmt::Debug, C> fmt::Debug for PartialSortHeap<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PartialSortHeap")
            .field("values", &self.values)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}
