//! Unit tests for Sequence sources and the mutating operators.
//!
//! These tests cover the three source shapes, re-iteration behavior, and
//! how `add`/`insert`/`remove` propagate through downstream stages.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use lazyseq::{Sequence, SequenceError};
use rstest::rstest;

// =============================================================================
// Cycle 1: Container sources
// =============================================================================

#[rstest]
fn test_vec_source_is_reiterable() {
    let sequence = Sequence::from(vec![3, 1, 2]);
    assert_eq!(sequence.to_vec(), sequence.to_vec());
}

#[rstest]
fn test_set_source_replays_in_set_order() {
    let set: BTreeSet<i32> = [5, 1, 3].into_iter().collect();
    let sequence = Sequence::from_iterable(set);
    assert_eq!(sequence.to_vec(), vec![1, 3, 5]);
    assert_eq!(sequence.to_vec(), vec![1, 3, 5]);
}

#[rstest]
fn test_map_source_yields_pairs() {
    let map: BTreeMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
    let sequence = Sequence::from_iterable(map);
    assert_eq!(sequence.to_vec(), vec![("a", 1), ("b", 2)]);
}

#[rstest]
fn test_collect_into_sequence() {
    let sequence: Sequence<i32> = (1..=4).collect();
    assert_eq!(sequence.count(), 4);
}

#[rstest]
fn test_for_loop_over_reference() {
    let sequence = Sequence::from(vec![1, 2, 3]);
    let mut total = 0;
    for value in &sequence {
        total += value;
    }
    assert_eq!(total, 6);
}

// =============================================================================
// Cycle 2: Generator sources
// =============================================================================

#[rstest]
fn test_generator_source_is_invoked_per_pass() {
    let invocations = Rc::new(Cell::new(0));
    let counter = Rc::clone(&invocations);
    let sequence = Sequence::from_fn(move || {
        counter.set(counter.get() + 1);
        0..3
    });
    let filtered = sequence.filter(|value, _| *value > 0);
    assert_eq!(invocations.get(), 0);
    assert_eq!(filtered.to_vec(), vec![1, 2]);
    assert_eq!(filtered.to_vec(), vec![1, 2]);
    assert_eq!(invocations.get(), 2);
}

#[rstest]
fn test_single_use_source_through_pipeline() {
    let sequence = Sequence::from_iter_once(vec![1, 2, 3, 4].into_iter());
    let evens = sequence.filter(|value, _| value % 2 == 0);
    assert_eq!(evens.to_vec(), vec![2, 4]);
    assert!(evens.to_vec().is_empty());
}

#[rstest]
fn test_single_use_source_partially_consumed() {
    let sequence = Sequence::from_iter_once(vec![1, 2, 3, 4].into_iter());
    assert_eq!(sequence.take(1).to_vec(), vec![1]);
    assert_eq!(sequence.to_vec(), vec![2, 3, 4]);
    assert!(sequence.to_vec().is_empty());
}

#[rstest]
fn test_take_zero_leaves_single_use_source_intact() {
    let sequence = Sequence::from_iter_once(vec![1, 2, 3].into_iter());
    assert!(sequence.take(0).to_vec().is_empty());
    assert_eq!(sequence.to_vec(), vec![1, 2, 3]);
}

#[rstest]
fn test_concat_leaves_unreached_single_use_source_intact() {
    let first = Sequence::from(vec![1, 2]);
    let second = Sequence::from_iter_once(vec![7, 8].into_iter());
    assert_eq!(first.concat(&second).take(1).to_vec(), vec![1]);
    assert_eq!(second.to_vec(), vec![7, 8]);
}

#[rstest]
fn test_concat_pulls_second_single_use_source_only_as_needed() {
    let first = Sequence::from(vec![1]);
    let second = Sequence::from_iter_once(vec![7, 8].into_iter());
    assert_eq!(first.concat(&second).take(2).to_vec(), vec![1, 7]);
    assert_eq!(second.to_vec(), vec![8]);
}

// =============================================================================
// Cycle 3: Infinite sources and laziness
// =============================================================================

#[rstest]
fn test_take_from_naturals_touches_source_k_times() {
    let touches = Rc::new(Cell::new(0));
    let counter = Rc::clone(&touches);
    let naturals = Sequence::from_fn(move || {
        let counter = Rc::clone(&counter);
        (0_u64..).inspect(move |_| counter.set(counter.get() + 1))
    });
    assert_eq!(naturals.take(5).to_vec(), vec![0, 1, 2, 3, 4]);
    assert_eq!(touches.get(), 5);
}

#[rstest]
fn test_first_on_infinite_source_terminates() {
    let first_big = Sequence::naturals().first_where(|value| *value > 1_000);
    assert_eq!(first_big, Ok(1_001));
}

#[rstest]
#[case(i64::MAX, 1, vec![i64::MAX])]
#[case(i64::MAX - 2, 3, vec![i64::MAX - 2, i64::MAX - 1, i64::MAX])]
#[case(i64::MIN, 2, vec![i64::MIN, i64::MIN + 1])]
fn test_range_reaching_the_integer_bounds(
    #[case] start: i64,
    #[case] count: usize,
    #[case] expected: Vec<i64>,
) {
    assert_eq!(Sequence::range(start, count).to_vec(), expected);
}

#[rstest]
fn test_repeat_and_range_compose() {
    let sequence = Sequence::range(1, 3).concat(&Sequence::repeat(0, 2));
    assert_eq!(sequence.to_vec(), vec![1, 2, 3, 0, 0]);
}

// =============================================================================
// Cycle 4: Mutation
// =============================================================================

#[rstest]
fn test_add_is_visible_downstream() {
    let numbers = Sequence::from(vec![1, 2]);
    let evens = numbers.filter(|value, _| value % 2 == 0);
    numbers.add(4);
    assert_eq!(evens.to_vec(), vec![2, 4]);
}

#[rstest]
#[case(0, vec![9, 1, 2, 3])]
#[case(1, vec![1, 9, 2, 3])]
#[case(3, vec![1, 2, 3, 9])]
fn test_insert_positions(#[case] index: usize, #[case] expected: Vec<i32>) {
    let numbers = Sequence::from(vec![1, 2, 3]);
    assert_eq!(numbers.insert(9, index), Ok(()));
    assert_eq!(numbers.to_vec(), expected);
}

#[rstest]
fn test_insert_out_of_range_reports_length() {
    let numbers = Sequence::from(vec![1]);
    assert_eq!(
        numbers.insert(0, 4),
        Err(SequenceError::IndexOutOfRange {
            operation: "insert",
            index: 4,
            length: 1
        })
    );
}

#[rstest]
fn test_remove_uses_structural_equality() {
    let points = Sequence::from(vec![(1, 2), (3, 4), (1, 2)]);
    assert!(points.remove(&(1, 2)));
    assert_eq!(points.to_vec(), vec![(3, 4), (1, 2)]);
}

#[rstest]
fn test_mutating_a_derived_sequence_detaches_it() {
    let numbers = Sequence::from(vec![1, 2, 3]);
    let doubled = numbers.map(|value, _| value * 2);
    doubled.add(100);
    numbers.add(4);
    assert_eq!(doubled.to_vec(), vec![2, 4, 6, 100]);
    assert_eq!(numbers.to_vec(), vec![1, 2, 3, 4]);
}
