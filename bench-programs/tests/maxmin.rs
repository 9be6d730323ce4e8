// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bench_programs::{
    nondet::{BoundarySource, FixedSource, RandomSource, SextupleGrid},
    select,
    sink::{LoggingSink, RecordingSink},
    ComparisonFault, DecisionTree, Leaf, MaxMinHarness, Position, SelectionResult, Sextuple,
};
use std::sync::Once;

static INIT: Once = Once::new();

/// Setup function that is only run once, even if called multiple times.
fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[test]
fn documented_counterexample_passes_on_derived_tree() {
    setup();
    assert_eq!(select(1, -3, 0, -2, -1, -2), (1, -3));

    let harness = MaxMinHarness::new();
    let mut source = FixedSource::new(vec![1, -3, 0, -2, -1, -2]);
    let mut sink = RecordingSink::new();
    let case = harness.run_once(&mut source, &mut sink);
    assert_eq!(case.selection.result, SelectionResult { max: 1, min: -3 });
    assert!(case.verdict.holds());
    assert!(!sink.is_reached());
}

#[test]
fn all_equal_inputs_pass() {
    setup();
    assert_eq!(select(5, 5, 5, 5, 5, 5), (5, 5));

    let mut sink = RecordingSink::new();
    let case = MaxMinHarness::new().check(&Sextuple::new(5, 5, 5, 5, 5, 5), &mut sink);
    assert!(case.verdict.holds());
    assert!(!sink.is_reached());
}

#[test]
fn ko2_fault_reproduces_published_wrong_answer() {
    setup();
    let harness = MaxMinHarness::with_fault(&ComparisonFault::maxmin6_ko2()).unwrap();
    let mut sink = RecordingSink::new();
    let case = harness.check(&ComparisonFault::maxmin6_ko2_counterexample(), &mut sink);

    assert_eq!(case.selection.result, SelectionResult { max: 0, min: -3 });
    assert_eq!(
        case.selection.leaf,
        Leaf {
            max: Position::C,
            min: Position::B
        }
    );
    assert!(!case.verdict.holds());
    assert_eq!(sink.records().len(), 1);
    assert_eq!(sink.records()[0].location, "maxmin6::ERROR");
    assert!(sink.records()[0].message.contains("max >= a"));
}

#[test]
fn reporting_does_not_alter_the_selection() {
    setup();
    let faulty = DecisionTree::derive()
        .with_fault(&ComparisonFault::maxmin6_ko2())
        .unwrap();
    let inputs = ComparisonFault::maxmin6_ko2_counterexample();
    let before = faulty.select(&inputs);
    let mut sink = LoggingSink::new();
    let case = MaxMinHarness::with_tree(faulty.clone()).check(&inputs, &mut sink);
    assert_eq!(case.selection, before);
    assert_eq!(sink.reached(), 1);
}

#[test]
fn every_leaf_is_reachable() {
    setup();
    let tree = DecisionTree::derive();
    for leaf in tree.leaves() {
        let mut values = [0; 6];
        values[leaf.max.index()] = 10;
        values[leaf.min.index()] = -10;
        let inputs = Sextuple::from(values);
        let selection = tree.select(&inputs);
        assert_eq!(selection.leaf, leaf, "witness {} missed its leaf", inputs);
        assert_eq!(selection.result, SelectionResult { max: 10, min: -10 });
    }
}

#[test]
fn exhaustive_sweep_covers_every_leaf_without_violation() {
    setup();
    let harness = MaxMinHarness::new();
    let mut sink = RecordingSink::new();
    let report = harness.sweep(SextupleGrid::new(-2..=2), &mut sink, false);
    assert_eq!(report.cases, 15_625);
    assert!(report.is_success());
    assert_eq!(report.first_counterexample, None);
    assert!(report.uncovered_leaves(harness.tree()).is_empty());
    assert_eq!(report.coverage_table().len(), 30);
    assert!(!sink.is_reached());
}

#[test]
fn exhaustive_sweep_finds_injected_fault() {
    setup();
    let harness = MaxMinHarness::with_fault(&ComparisonFault::maxmin6_ko2()).unwrap();
    let mut sink = RecordingSink::new();
    let report = harness.sweep(SextupleGrid::new(-3..=1), &mut sink, true);
    assert_eq!(report.violations, 1);
    let counterexample = report.first_counterexample.unwrap();
    let (max, _) = select(
        counterexample.get(Position::A),
        counterexample.get(Position::B),
        counterexample.get(Position::C),
        counterexample.get(Position::D),
        counterexample.get(Position::E),
        counterexample.get(Position::F),
    );
    assert_ne!(harness.tree().select(&counterexample).result.max, max);
    assert_eq!(sink.records().len(), 1);
}

#[test]
fn every_single_conjunct_fault_in_max_guard_of_a_is_caught() {
    setup();
    let derived = DecisionTree::derive();
    for conjunct in 0..5 {
        for lhs in Position::ALL {
            for rhs in Position::ALL {
                let fault = ComparisonFault {
                    site: bench_programs::FaultSite::MaxGuard {
                        candidate: Position::A,
                    },
                    conjunct,
                    replacement: bench_programs::selector::Comparison::new(lhs, rhs),
                };
                let faulty = derived.with_fault(&fault).unwrap();
                let original = derived.max_cascade().branches[0].guard[conjunct];
                let harness = MaxMinHarness::with_tree(faulty);
                let report =
                    harness.sweep(SextupleGrid::new(-1..=1), &mut RecordingSink::new(), true);
                if original == fault.replacement {
                    assert!(report.is_success(), "identity replacement {} flagged", fault);
                } else {
                    assert!(!report.is_success(), "fault {} went unnoticed", fault);
                }
            }
        }
    }
}

#[test]
fn selection_is_idempotent() {
    setup();
    let tree = DecisionTree::derive();
    let mut source = RandomSource::seeded(3).within(-4..=4);
    for _ in 0..200 {
        let inputs = Sextuple::from_source(&mut source);
        assert_eq!(tree.select(&inputs), tree.select(&inputs));
    }
}

#[test]
fn boundary_values_never_violate() {
    setup();
    let harness = MaxMinHarness::new();
    let mut source = BoundarySource::new();
    let mut sink = RecordingSink::new();
    let report = harness.campaign(&mut source, 500, &mut sink, false);
    assert_eq!(report.cases, 500);
    assert!(report.is_success());
    assert_eq!(
        select(i32::MIN, i32::MAX, i32::MIN, i32::MAX, 0, -1),
        (i32::MAX, i32::MIN)
    );
}
