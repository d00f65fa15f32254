//! Error types for sequence operators.
//!
//! Lazy operators never fail: they only describe work. Errors surface from
//! terminal operators (and from the two argument checks the type system
//! cannot rule out), always as a [`SequenceError`] returned to the immediate
//! caller. There is no retry or partial-result behavior anywhere.

use thiserror::Error;

/// Represents the ways a terminal operator can fail.
///
/// # Examples
///
/// ```rust
/// use lazyseq::{Sequence, SequenceError};
///
/// let empty: Sequence<i32> = Sequence::empty();
/// assert_eq!(empty.first(), Err(SequenceError::Empty { operation: "first" }));
/// assert_eq!(
///     format!("{}", SequenceError::Empty { operation: "first" }),
///     "first: sequence contains no elements"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SequenceError {
    /// The operator needs at least one element and the sequence had none.
    #[error("{operation}: sequence contains no elements")]
    Empty {
        /// The operator that failed.
        operation: &'static str,
    },

    /// The operator needs exactly one (matching) element and found more.
    #[error("{operation}: sequence contains more than one matching element")]
    MoreThanOne {
        /// The operator that failed.
        operation: &'static str,
    },

    /// Two elements produced keys that the key equality considers equal.
    #[error("{operation}: an element with the same key has already been added")]
    DuplicateKey {
        /// The operator that failed.
        operation: &'static str,
    },

    /// An index argument fell outside the valid range.
    #[error("{operation}: index {index} is out of range for length {length}")]
    IndexOutOfRange {
        /// The operator that failed.
        operation: &'static str,
        /// The offending index.
        index: usize,
        /// The length the index was checked against.
        length: usize,
    },
}

/// Shorthand for results produced by terminal operators.
pub type SequenceResult<T> = Result<T, SequenceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SequenceError::Empty { operation: "last" }, "last: sequence contains no elements")]
    #[case(
        SequenceError::MoreThanOne { operation: "single" },
        "single: sequence contains more than one matching element"
    )]
    #[case(
        SequenceError::DuplicateKey { operation: "to_dictionary" },
        "to_dictionary: an element with the same key has already been added"
    )]
    #[case(
        SequenceError::IndexOutOfRange { operation: "insert", index: 7, length: 3 },
        "insert: index 7 is out of range for length 3"
    )]
    fn test_error_display(#[case] error: SequenceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&SequenceError::Empty { operation: "min" });
    }
}
