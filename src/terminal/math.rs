//! Numeric reductions: `min`, `max`, `sum`, `average`.
//!
//! Each one is a projection (`map`) followed by an unseeded `aggregate`, so
//! an empty sequence is always an error rather than a zero.

use std::ops::Add;

use crate::error::{SequenceError, SequenceResult};
use crate::sequence::Sequence;

fn relabel(error: SequenceError, operation: &'static str) -> SequenceError {
    match error {
        SequenceError::Empty { .. } => SequenceError::Empty { operation },
        other => other,
    }
}

impl<T: 'static> Sequence<T> {
    /// Returns the smallest element; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn min(&self) -> SequenceResult<T>
    where
        T: PartialOrd,
    {
        self.aggregate(|best, next| if next < best { next } else { best })
            .map_err(|error| relabel(error, "min"))
    }

    /// Returns the largest element; the first one wins among equals.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn max(&self) -> SequenceResult<T>
    where
        T: PartialOrd,
    {
        self.aggregate(|best, next| if next > best { next } else { best })
            .map_err(|error| relabel(error, "max"))
    }

    /// Returns the smallest projected value.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn min_by<K, F>(&self, selector: F) -> SequenceResult<K>
    where
        K: PartialOrd + 'static,
        F: Fn(T) -> K + 'static,
    {
        self.map(move |element, _| selector(element))
            .min()
            .map_err(|error| relabel(error, "min_by"))
    }

    /// Returns the largest projected value.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn max_by<K, F>(&self, selector: F) -> SequenceResult<K>
    where
        K: PartialOrd + 'static,
        F: Fn(T) -> K + 'static,
    {
        self.map(move |element, _| selector(element))
            .max()
            .map_err(|error| relabel(error, "max_by"))
    }

    /// Adds up every element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn sum(&self) -> SequenceResult<T>
    where
        T: Add<Output = T>,
    {
        self.aggregate(|total, next| total + next)
            .map_err(|error| relabel(error, "sum"))
    }

    /// Adds up the projected values.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn sum_by<K, F>(&self, selector: F) -> SequenceResult<K>
    where
        K: Add<Output = K> + 'static,
        F: Fn(T) -> K + 'static,
    {
        self.map(move |element, _| selector(element))
            .sum()
            .map_err(|error| relabel(error, "sum_by"))
    }

    /// Returns the arithmetic mean of the elements.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    pub fn average(&self) -> SequenceResult<f64>
    where
        T: Into<f64>,
    {
        self.average_by(|element| element.into())
            .map_err(|error| relabel(error, "average"))
    }

    /// Returns the arithmetic mean of the projected values.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::Empty`] for an empty sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazyseq::Sequence;
    ///
    /// let lengths = Sequence::from(vec!["a", "abc"]);
    /// assert_eq!(lengths.average_by(|word| word.len() as f64), Ok(2.0));
    /// ```
    #[allow(clippy::cast_precision_loss)]
    pub fn average_by<F>(&self, selector: F) -> SequenceResult<f64>
    where
        F: Fn(T) -> f64 + 'static,
    {
        let (total, count) = self
            .map(move |element, _| (selector(element), 1_usize))
            .aggregate(|(total, count), (value, one)| (total + value, count + one))
            .map_err(|error| relabel(error, "average_by"))?;
        Ok(total / count as f64)
    }
}
