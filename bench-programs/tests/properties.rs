// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bench_programs::{
    accumulator::{run_closed_form, run_iterative, Accumulation, GuardedLoop, Step},
    oracle,
    selector::derived_tree,
    sink::RecordingSink,
    select, Sextuple,
};
use proptest::prelude::*;

fn sextuple() -> impl Strategy<Value = Sextuple> {
    prop::array::uniform6(any::<i32>()).prop_map(Sextuple::from)
}

/// Few distinct values, so that ties are common.
fn crowded_sextuple() -> impl Strategy<Value = Sextuple> {
    prop::array::uniform6(-2i32..=2).prop_map(Sextuple::from)
}

fn wrapped_reference(initial: i32, count: u64, delta: i32) -> i32 {
    let exact = i128::from(initial) + i128::from(count) * i128::from(delta);
    exact.rem_euclid(1 << 32) as u32 as i32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn selection_matches_true_extrema(inputs in sextuple()) {
        let values = inputs.values();
        let [a, b, c, d, e, f] = *values;
        let expected = (
            values.iter().copied().max().unwrap(),
            values.iter().copied().min().unwrap(),
        );
        prop_assert_eq!(select(a, b, c, d, e, f), expected);
    }

    #[test]
    fn ties_never_break_the_postcondition(inputs in crowded_sextuple()) {
        let selection = derived_tree().select(&inputs);
        let mut sink = RecordingSink::new();
        prop_assert!(oracle::check(&inputs, &selection.result, &mut sink).holds());
        prop_assert!(!sink.is_reached());
    }

    #[test]
    fn selected_leaf_names_the_returned_values(inputs in sextuple()) {
        let selection = derived_tree().select(&inputs);
        prop_assert_eq!(inputs.get(selection.leaf.max), selection.result.max);
        prop_assert_eq!(inputs.get(selection.leaf.min), selection.result.min);
    }

    #[test]
    fn selection_is_idempotent(inputs in sextuple()) {
        prop_assert_eq!(derived_tree().select(&inputs), derived_tree().select(&inputs));
    }

    #[test]
    fn closed_form_agrees_with_iteration(
        initial in any::<i32>(),
        steps in prop::collection::vec((0u64..2_000, any::<i32>()), 0..4),
    ) {
        let steps: Vec<Step> = steps
            .into_iter()
            .map(|(count, delta)| Step::new(count, delta))
            .collect();
        prop_assert_eq!(run_closed_form(initial, &steps), run_iterative(initial, &steps));
    }

    #[test]
    fn closed_form_wraps_for_any_count(
        initial in any::<i32>(),
        count in any::<u64>(),
        delta in any::<i32>(),
    ) {
        let summary = Accumulation::new(initial).then(count, delta).run(0).unwrap();
        prop_assert_eq!(summary.value, wrapped_reference(initial, count, delta));
    }

    #[test]
    fn guarded_loop_summary_matches_execution(
        start in -1_000i32..1_000,
        bound in -1_000i32..1_000,
        delta in 1i32..8,
        exit in prop::option::of(-1_000i32..1_010),
    ) {
        let mut guarded = GuardedLoop::while_below(bound, delta);
        if let Some(exit) = exit {
            guarded = guarded.with_break_at(exit);
        }
        let summary = guarded.run(start, u64::MAX).unwrap();
        prop_assert!(summary.cross_checked);
        prop_assert_eq!(summary.value, guarded.execute(start));
    }

    #[test]
    fn descending_loop_summary_matches_execution(
        start in -1_000i32..1_000,
        bound in -1_000i32..1_000,
        delta in -7i32..0,
    ) {
        let guarded = GuardedLoop::while_above(bound, delta);
        let iterations = guarded.iterations(start).unwrap();
        let summary = Accumulation::new(start).then(iterations, delta).run(u64::MAX).unwrap();
        prop_assert_eq!(summary.value, guarded.execute(start));
    }
}
