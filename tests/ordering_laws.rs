//! Property-based tests for ordering and the partially-sorted heap.
//!
//! Every ordering must agree with `slice::sort_by`, which is stable, on the
//! same comparator.

use lazyseq::prelude::*;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Generates `(key, tag)` pairs whose keys collide often; tags are unique so
/// stability violations are observable.
fn tagged_entries(max_size: usize) -> impl Strategy<Value = Vec<(u8, usize)>> {
    prop::collection::vec(0..5_u8, 0..max_size).prop_map(|keys| {
        keys.into_iter()
            .enumerate()
            .map(|(tag, key)| (key, tag))
            .collect()
    })
}

/// Generates triples for multi-key ordering.
fn records(max_size: usize) -> impl Strategy<Value = Vec<(u8, i8, usize)>> {
    prop::collection::vec((0..3_u8, -2..2_i8), 0..max_size).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(tag, (primary, secondary))| (primary, secondary, tag))
            .collect()
    })
}

proptest! {
    // =========================================================================
    // Heap
    // =========================================================================

    #[test]
    fn prop_heap_drain_matches_stable_sort(entries in tagged_entries(64)) {
        let mut expected = entries.clone();
        expected.sort_by(|left, right| left.0.cmp(&right.0));
        let heap = PartialSortHeap::new(entries, |left: &(u8, usize), right: &(u8, usize)| {
            left.0.cmp(&right.0)
        });
        prop_assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn prop_max_heap_drain_matches_stable_reverse_sort(entries in tagged_entries(64)) {
        let mut expected = entries.clone();
        expected.sort_by(|left, right| right.0.cmp(&left.0));
        let heap = PartialSortHeap::max_heap(entries, |left: &(u8, usize), right: &(u8, usize)| {
            left.0.cmp(&right.0)
        });
        prop_assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn prop_heap_len_decreases_by_one_per_extraction(values in prop::collection::vec(any::<i32>(), 0..40)) {
        let mut heap = PartialSortHeap::new(values.clone(), i32::cmp);
        for remaining in (0..values.len()).rev() {
            prop_assert!(heap.extract_top().is_some());
            prop_assert_eq!(heap.len(), remaining);
        }
        prop_assert_eq!(heap.extract_top(), None);
    }

    #[test]
    fn prop_peek_agrees_with_extract(values in prop::collection::vec(any::<i16>(), 1..40)) {
        let mut heap = PartialSortHeap::new(values, i16::cmp);
        while let Some(peeked) = heap.peek().copied() {
            prop_assert_eq!(heap.extract_top(), Some(peeked));
        }
    }

    // =========================================================================
    // Ordered sequences
    // =========================================================================

    #[test]
    fn prop_order_by_is_stable(entries in tagged_entries(64)) {
        let mut expected = entries.clone();
        expected.sort_by_key(|entry| entry.0);
        let actual = Sequence::from(entries).order_by(|entry| entry.0).to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_order_by_descending_is_stable(entries in tagged_entries(64)) {
        let mut expected = entries.clone();
        expected.sort_by(|left, right| right.0.cmp(&left.0));
        let actual = Sequence::from(entries).order_by_descending(|entry| entry.0).to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_then_by_matches_lexicographic_sort(entries in records(64)) {
        let mut expected = entries.clone();
        expected.sort_by(|left, right| left.0.cmp(&right.0).then(right.1.cmp(&left.1)));
        let actual = Sequence::from(entries)
            .order_by(|record| record.0)
            .then_by_descending(|record| record.1)
            .to_vec();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_prefix_matches_sorted_prefix(entries in tagged_entries(64), count in 0..70_usize) {
        let mut expected = entries.clone();
        expected.sort_by_key(|entry| entry.0);
        expected.truncate(count);
        let actual = Sequence::from(entries).order_by(|entry| entry.0).take(count).to_vec();
        prop_assert_eq!(actual, expected);
    }
}
