//! Property-based tests for the pipeline operators.
//!
//! Each operator is compared against the equivalent eager computation on a
//! plain `Vec`.

use lazyseq::Sequence;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Generates a vector of small integers so that duplicates are common.
fn small_values(max_size: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-10..10_i32, 0..max_size)
}

/// Reference implementation of first-occurrence deduplication.
fn dedupe(values: &[i32]) -> Vec<i32> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(value) {
            seen.push(*value);
        }
    }
    seen
}

proptest! {
    // =========================================================================
    // Replay
    // =========================================================================

    #[test]
    fn prop_to_vec_is_idempotent(values in small_values(40)) {
        let sequence = Sequence::from(values.clone()).filter(|value, _| value % 2 == 0);
        prop_assert_eq!(sequence.to_vec(), sequence.to_vec());
    }

    #[test]
    fn prop_identity_pipeline_replays_source(values in small_values(40)) {
        prop_assert_eq!(Sequence::from(values.clone()).to_vec(), values);
    }

    // =========================================================================
    // Projection and filtering
    // =========================================================================

    #[test]
    fn prop_map_matches_vec_map(values in small_values(40)) {
        let expected: Vec<i64> = values.iter().map(|value| i64::from(*value) * 3).collect();
        let actual = Sequence::from(values).map(|value, _| i64::from(value) * 3).to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_filter_matches_vec_filter(values in small_values(40)) {
        let expected: Vec<i32> = values.iter().copied().filter(|value| *value > 0).collect();
        let actual = Sequence::from(values).filter(|value, _| *value > 0).to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_map_composition(values in small_values(40)) {
        let sequence = Sequence::from(values);
        let composed = sequence.map(|value, _| (value + 1) * 2).to_vec();
        let chained = sequence.map(|value, _| value + 1).map(|value, _| value * 2).to_vec();
        prop_assert_eq!(composed, chained);
    }

    // =========================================================================
    // Slicing
    // =========================================================================

    #[test]
    fn prop_skip_and_take_partition(values in small_values(40), count in 0..50_usize) {
        let sequence = Sequence::from(values.clone());
        let mut rejoined = sequence.take(count).to_vec();
        rejoined.extend(sequence.skip(count).to_vec());
        prop_assert_eq!(rejoined, values);
    }

    #[test]
    fn prop_take_while_and_skip_while_partition(values in small_values(40), bound in -10..10_i32) {
        let sequence = Sequence::from(values.clone());
        let mut rejoined = sequence.take_while(move |value, _| *value < bound).to_vec();
        rejoined.extend(sequence.skip_while(move |value, _| *value < bound).to_vec());
        prop_assert_eq!(rejoined, values);
    }

    #[test]
    fn prop_take_on_naturals_yields_prefix(count in 0..200_usize) {
        let expected: Vec<i64> = (0..).take(count).collect();
        prop_assert_eq!(Sequence::naturals().take(count).to_vec(), expected);
    }

    // =========================================================================
    // Set-like operators
    // =========================================================================

    #[test]
    fn prop_distinct_matches_reference(values in small_values(60)) {
        let expected = dedupe(&values);
        prop_assert_eq!(Sequence::from(values).distinct().to_vec(), expected);
    }

    #[test]
    fn prop_distinct_hashed_matches_distinct(values in small_values(60)) {
        let sequence = Sequence::from(values);
        prop_assert_eq!(sequence.distinct_hashed().to_vec(), sequence.distinct().to_vec());
    }

    #[test]
    fn prop_union_is_distinct_concat(left in small_values(30), right in small_values(30)) {
        let mut joined = left.clone();
        joined.extend(right.iter().copied());
        let expected = dedupe(&joined);
        let actual = Sequence::from(left).union(&Sequence::from(right)).to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_concat_length_is_sum(left in small_values(30), right in small_values(30)) {
        let expected = left.len() + right.len();
        prop_assert_eq!(Sequence::from(left).concat(&Sequence::from(right)).count(), expected);
    }

    // =========================================================================
    // Structural
    // =========================================================================

    #[test]
    fn prop_reverse_is_involutive(values in small_values(40)) {
        let sequence = Sequence::from(values.clone());
        prop_assert_eq!(sequence.reverse().reverse().to_vec(), values);
    }

    #[test]
    fn prop_zip_length_is_minimum(left in small_values(30), right in small_values(30)) {
        let expected = left.len().min(right.len());
        let zipped = Sequence::from(left).zip(&Sequence::from(right), |a, b| (a, b));
        prop_assert_eq!(zipped.count(), expected);
    }
}
