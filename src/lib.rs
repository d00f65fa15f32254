//! # lazyseq
//!
//! Lazy, composable sequence operators over any re-iterable source.
//!
//! ## Overview
//!
//! A [`Sequence`] is a cheap handle to a generator of iterators. Operators
//! such as `filter`, `map`, `join` or `order_by` return new sequences that
//! describe work without doing it; values only flow when a terminal
//! operator (`to_vec`, `first`, `aggregate`, plain iteration, ...) pulls
//! them, one element at a time.
//!
//! - **Sources**: containers, generator closures, single-use iterators,
//!   `range`, `repeat`, `naturals`, `empty`
//! - **Pipeline**: filtering, projection, flattening, slicing, `concat`,
//!   `union`, `distinct`, `zip`, `reverse`
//! - **Ordering**: stable multi-key `order_by`/`then_by` driven by a
//!   partially-sorted heap, so taking a prefix is cheaper than a full sort
//! - **Grouping**: `group_by`, `join`, `group_join`, `except`, `intersect`
//!   under default or custom key equality
//! - **Terminals**: access, search, aggregation, math, `to_dictionary`
//!
//! ## Feature Flags
//!
//! - `ordering`: heap-based ordering (`order_by`, `then_by`, ...)
//! - `grouping`: grouping, joins and set operations
//! - `shuffle`: randomized ordering via `rand`
//! - `fxhash`: use `rustc-hash` for `distinct_hashed`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lazyseq::prelude::*;
//!
//! let first_squares = Sequence::naturals()
//!     .map(|value, _| value * value)
//!     .filter(|square, _| square % 2 == 1)
//!     .take(3);
//! assert_eq!(first_squares.to_vec(), vec![1, 9, 25]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::should_implement_trait)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use lazyseq::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{SequenceError, SequenceResult};
    pub use crate::sequence::{Sequence, SequenceIter};
    pub use crate::terminal::Dictionary;

    #[cfg(feature = "ordering")]
    pub use crate::heap::{HeapOrientation, PartialSortHeap};
    #[cfg(feature = "ordering")]
    pub use crate::ordering::{Comparator, OrderedSequence};

    #[cfg(feature = "grouping")]
    pub use crate::grouping::Grouping;
}

pub mod error;
pub mod pipeline;
pub mod sequence;
pub mod terminal;

#[cfg(feature = "ordering")]
pub mod heap;

#[cfg(feature = "ordering")]
pub mod ordering;

#[cfg(feature = "grouping")]
pub mod grouping;

pub use error::{SequenceError, SequenceResult};
pub use sequence::{Sequence, SequenceIter};
