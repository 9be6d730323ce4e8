// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use bench_programs::{
    fixtures::{self, Expectation},
    nondet::FixedSource,
    CheckResult,
};
use std::sync::Once;

static INIT: Once = Once::new();

fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

const ITERATION_LIMIT: u64 = 1_000_000;

#[test]
fn every_fixture_meets_its_expectation() {
    setup();
    for fixture in fixtures::all() {
        let result = fixture.check_witness(ITERATION_LIMIT).unwrap();
        assert!(
            fixture.matches_expectation(&result),
            "{} expected {:?}, got {:?}",
            fixture.name,
            fixture.expectation,
            result
        );
    }
}

#[test]
fn verdicts_do_not_depend_on_cross_checking() {
    setup();
    for fixture in fixtures::all() {
        let checked = fixture.check_witness(ITERATION_LIMIT).unwrap();
        let summarised = fixture.check_witness(0).unwrap();
        assert_eq!(checked.exit_code(), summarised.exit_code(), "{}", fixture.name);
    }
}

#[test]
fn parity_after_two_billion_steps_is_even() {
    setup();
    let fixture = fixtures::find("multiple_loops_parity").unwrap();
    match fixture.check_witness(ITERATION_LIMIT).unwrap() {
        CheckResult::Violated(records) => {
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].location, "multiple_loops_parity::reach_error");
            assert!(records[0].message.contains("x = 999998"));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn overflow_keeps_odd_parity() {
    setup();
    let fixture = fixtures::find("overflowing_odd_parity").unwrap();
    assert_eq!(fixture.check_witness(ITERATION_LIMIT).unwrap(), CheckResult::Holds);
}

#[test]
fn nondet_fixtures_are_safe_above_the_bound() {
    setup();
    for name in &["nondet_bound_saturation", "nested_nondet_loop"] {
        let fixture = fixtures::find(name).unwrap();
        for x in [1_000_000, 1_000_001, i32::MAX] {
            let result = fixture.check(&mut FixedSource::new(vec![x]), ITERATION_LIMIT).unwrap();
            assert_eq!(result, CheckResult::Holds, "{} with x = {}", name, x);
        }
    }
}

#[test]
fn nondet_fixtures_reach_error_below_the_bound() {
    setup();
    for name in &["nondet_bound_saturation", "nested_nondet_loop"] {
        let fixture = fixtures::find(name).unwrap();
        for x in [i32::MIN, -1, 0, 999_999] {
            let result = fixture.check(&mut FixedSource::new(vec![x]), 0).unwrap();
            assert_eq!(result.exit_code(), 1, "{} with x = {}", name, x);
        }
    }
}

#[test]
fn malformed_fixtures_are_flagged() {
    setup();
    let invalid: Vec<_> = fixtures::all()
        .iter()
        .filter(|fixture| fixture.expectation == Expectation::Invalid)
        .collect();
    assert_eq!(invalid.len(), 2);
    for fixture in invalid {
        match fixture.check_witness(ITERATION_LIMIT).unwrap() {
            CheckResult::InvalidFixture(reason) => {
                assert!(reason.contains(fixture.name));
                assert_eq!(CheckResult::InvalidFixture(reason).exit_code(), 2);
            }
            other => panic!("{} ran and gave {:?}", fixture.name, other),
        }
    }
}
