// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The loop-summarization benchmark programs.
//!
//! Each fixture is written against the accumulator harness: loops are reduced
//! to [`Step`]s and cross-checked by iteration when they are small enough, and
//! every `__VERIFIER_assert` becomes an [`assert_scalar`] against the fixture's
//! `reach_error` location. Two programs of the corpus do not parse (a `:` where
//! an assignment is expected); they are kept as [`FixtureBody::Invalid`] and
//! refuse to run instead of guessing what was meant.

use crate::{
    accumulator::{assert_scalar, Accumulation, GuardedLoop, Progression, ScalarPredicate, Step},
    errors::{ErrorKind, Result},
    nondet::{FixedSource, NondetSource},
    oracle::Verdict,
    sink::{ErrorLocation, ErrorSink, RecordingSink},
    CheckResult,
};
use serde::{Deserialize, Serialize};

/// What a verifier should conclude about a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expectation {
    /// `reach_error` is unreachable for every input.
    Safe,
    /// `reach_error` is reachable; the fixture's witness inputs reach it.
    ErrorReachable,
    /// The program is malformed and cannot be analysed.
    Invalid,
}

pub type FixtureProgram = fn(&mut FixtureContext) -> Result<()>;

#[derive(Clone, Copy)]
pub enum FixtureBody {
    Program(FixtureProgram),
    Invalid(&'static str),
}

pub struct LoopFixture {
    pub name: &'static str,
    pub description: &'static str,
    pub expectation: Expectation,
    /// Nondeterministic inputs under which the expected verdict is observed.
    pub witness: &'static [i32],
    pub body: FixtureBody,
}

/// What a fixture program can do: draw nondeterministic values, summarise
/// loops and assert.
pub struct FixtureContext<'a> {
    location: ErrorLocation,
    source: &'a mut dyn NondetSource,
    sink: &'a mut dyn ErrorSink,
    iteration_limit: u64,
}

impl<'a> FixtureContext<'a> {
    pub fn nondet(&mut self) -> i32 {
        self.source.next_int()
    }

    pub fn accumulate(&self, accumulation: &Accumulation) -> Result<i32> {
        Ok(accumulation.run(self.iteration_limit)?.value)
    }

    pub fn run_loop(&self, guarded: &GuardedLoop, start: i32) -> Result<i32> {
        Ok(guarded.run(start, self.iteration_limit)?.value)
    }

    pub fn assert(&mut self, variable: &str, predicate: ScalarPredicate, value: i32) -> Verdict {
        assert_scalar(self.location, variable, predicate, value, self.sink)
    }
}

impl LoopFixture {
    pub fn location(&self) -> ErrorLocation {
        ErrorLocation::new(self.name, "reach_error")
    }

    /// Runs the program, reporting failed assertions to `sink`.
    pub fn run(
        &self,
        source: &mut dyn NondetSource,
        sink: &mut dyn ErrorSink,
        iteration_limit: u64,
    ) -> Result<()> {
        match self.body {
            FixtureBody::Program(program) => {
                let mut context = FixtureContext {
                    location: self.location(),
                    source,
                    sink,
                    iteration_limit,
                };
                program(&mut context)
            }
            FixtureBody::Invalid(reason) => bail!(ErrorKind::InvalidFixture(
                self.name.to_string(),
                reason.to_string()
            )),
        }
    }

    /// Runs the program with `source` and collects the outcome. Malformed
    /// fixtures give [`CheckResult::InvalidFixture`]; loops that cannot be
    /// summarised are errors.
    pub fn check(
        &self,
        source: &mut dyn NondetSource,
        iteration_limit: u64,
    ) -> Result<CheckResult> {
        let mut sink = RecordingSink::new();
        match self.run(source, &mut sink, iteration_limit) {
            Ok(()) => Ok(CheckResult::from_records(sink.into_records())),
            Err(err) if matches!(err.kind(), ErrorKind::InvalidFixture(..)) => {
                Ok(CheckResult::InvalidFixture(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Runs the program on its witness inputs.
    pub fn check_witness(&self, iteration_limit: u64) -> Result<CheckResult> {
        let mut source = FixedSource::new(self.witness.iter().copied());
        self.check(&mut source, iteration_limit)
    }

    pub fn matches_expectation(&self, result: &CheckResult) -> bool {
        matches!(
            (self.expectation, result),
            (Expectation::Safe, CheckResult::Holds)
                | (Expectation::ErrorReachable, CheckResult::Violated(_))
                | (Expectation::Invalid, CheckResult::InvalidFixture(_))
        )
    }
}

static FIXTURES: [LoopFixture; 9] = [
    LoopFixture {
        name: "multiple_loops_parity",
        description: "x counts to 1000000 in steps of 2, then takes 2^31-1 more steps of 2; \
                      asserts x even, then x odd",
        expectation: Expectation::ErrorReachable,
        witness: &[],
        body: FixtureBody::Program(multiple_loops_parity),
    },
    LoopFixture {
        name: "countdown_with_companion",
        description: "x counts down to -10000000 while y grows by 2 per step",
        expectation: Expectation::Safe,
        witness: &[],
        body: FixtureBody::Program(countdown_with_companion),
    },
    LoopFixture {
        name: "overflowing_odd_parity",
        description: "x = INT_MAX - 100 takes 100 steps of 2 through the overflow; asserts x odd",
        expectation: Expectation::Safe,
        witness: &[],
        body: FixtureBody::Program(overflowing_odd_parity),
    },
    LoopFixture {
        name: "transformed_even_parity",
        description: "hand-summarised loop x = (n - 1) * 2 + x starting from INT_MAX - 1000000; \
                      asserts x even",
        expectation: Expectation::ErrorReachable,
        witness: &[],
        body: FixtureBody::Program(transformed_even_parity),
    },
    LoopFixture {
        name: "nondet_bound_saturation",
        description: "nondet x below 1000000 is raised to 1000000, then to 100000000; \
                      asserts x == 1000000, then x != 100000000",
        expectation: Expectation::ErrorReachable,
        witness: &[0],
        body: FixtureBody::Program(nondet_bound_saturation),
    },
    LoopFixture {
        name: "nested_nondet_loop",
        description: "outer loop over nondet x with inner loops of +5001 and -5000 steps; \
                      asserts x != 1000000 after every outer iteration",
        expectation: Expectation::ErrorReachable,
        witness: &[999_999],
        body: FixtureBody::Program(nested_nondet_loop),
    },
    LoopFixture {
        name: "while_break",
        description: "counter loop bounded by 5 that breaks once the counter reaches 4",
        expectation: Expectation::Safe,
        witness: &[],
        body: FixtureBody::Program(while_break),
    },
    LoopFixture {
        name: "plusminus_transformed",
        description: "hand-summarised plus/minus loop starting from INT_MAX - 2000000",
        expectation: Expectation::Invalid,
        witness: &[],
        body: FixtureBody::Invalid("statement `x-=2:` ends in ':' where ';' is expected"),
    },
    LoopFixture {
        name: "complex_loop_predicates",
        description: "loop over x + i + y < 6000000 with three counters",
        expectation: Expectation::Invalid,
        witness: &[],
        body: FixtureBody::Invalid("statement `i += 1:` ends in ':' where ';' is expected"),
    },
];

pub fn all() -> &'static [LoopFixture] {
    &FIXTURES
}

pub fn find(name: &str) -> Result<&'static LoopFixture> {
    FIXTURES
        .iter()
        .find(|fixture| fixture.name == name)
        .ok_or_else(|| ErrorKind::UnknownFixture(name.to_string()).into())
}

fn multiple_loops_parity(cx: &mut FixtureContext) -> Result<()> {
    let x = cx.run_loop(&GuardedLoop::while_below(1_000_000, 2), 0)?;
    cx.assert("x", ScalarPredicate::Even, x);

    // The second loop runs on its own counter `i`; `x` only rides along.
    let iterations = GuardedLoop::while_below(i32::MAX, 1).iterations(0)?;
    let x = cx.accumulate(&Accumulation::new(x).then(iterations, 2))?;
    cx.assert("x", ScalarPredicate::Odd, x);
    Ok(())
}

fn countdown_with_companion(cx: &mut FixtureContext) -> Result<()> {
    let iterations = GuardedLoop::while_above(-10_000_000, -1).iterations(0)?;
    let x = cx.accumulate(&Accumulation::new(0).then(iterations, -1))?;
    let y = cx.accumulate(&Accumulation::new(0).then(iterations, 2))?;
    cx.assert("x", ScalarPredicate::Equals(-10_000_000), x);
    cx.assert("y", ScalarPredicate::Equals(20_000_000), y);
    Ok(())
}

fn overflowing_odd_parity(cx: &mut FixtureContext) -> Result<()> {
    // Both arms of the branch inside the loop add 2.
    let iterations = GuardedLoop::while_below(100, 1).iterations(0)?;
    let x = cx.accumulate(&Accumulation::new(i32::MAX - 100).then(iterations, 2))?;
    cx.assert("x", ScalarPredicate::Odd, x);
    Ok(())
}

fn transformed_even_parity(cx: &mut FixtureContext) -> Result<()> {
    let i: i64 = 1;
    let x = cx.accumulate(&Accumulation::new(i32::MAX - 1_000_000).then(1, 2))?;
    let iterations_amount = 1_000_000 - i;
    // x = (iterations_amount - 1) * 2 + x, truncated back to int
    let remaining = Step::new((iterations_amount - 1) as u64, 2);
    let x = cx.accumulate(&Accumulation::new(x).then_step(remaining))?;
    cx.assert("x", ScalarPredicate::Even, x);
    Ok(())
}

fn nondet_bound_saturation(cx: &mut FixtureContext) -> Result<()> {
    let x = cx.nondet();
    if x < 1_000_000 {
        let x = cx.run_loop(&GuardedLoop::while_below(1_000_000, 1), x)?;
        cx.assert("x", ScalarPredicate::Equals(1_000_000), x);
        let x = cx.run_loop(&GuardedLoop::while_below(100_000_000, 1), x)?;
        cx.assert("x", ScalarPredicate::NotEquals(100_000_000), x);
    }
    Ok(())
}

fn nested_nondet_loop(cx: &mut FixtureContext) -> Result<()> {
    let x = cx.nondet();
    if x >= 1_000_000 {
        return Ok(());
    }
    // Net effect of one outer iteration: 5001 increments, then 5000 decrements.
    let net = cx.accumulate(&Accumulation::new(0).then(5_000 + 1, 1).then(5_000, -1))?;
    let outer = GuardedLoop::while_below(1_000_000, net);
    let iterations = outer.iterations(x)?;
    let after_each = Progression {
        start: x,
        delta: net,
        count: iterations,
    };
    let final_x = cx.run_loop(&outer, x)?;
    if after_each.contains(1_000_000) {
        cx.assert("x", ScalarPredicate::NotEquals(1_000_000), 1_000_000);
    } else {
        cx.assert("x", ScalarPredicate::NotEquals(1_000_000), final_x);
    }
    Ok(())
}

fn while_break(cx: &mut FixtureContext) -> Result<()> {
    let counter = cx.run_loop(&GuardedLoop::while_below(5, 1).with_break_at(4), 0)?;
    debug!("while_break leaves the loop with counter = {}", counter);
    Ok(())
}
