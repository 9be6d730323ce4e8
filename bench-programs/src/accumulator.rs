// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Loop-accumulator harness.
//!
//! Every loop of the loop-summarization benchmarks adds a constant to a counter
//! a fixed number of times, so it reduces to a closed form. The harness
//! computes that closed form and, when the loop is small enough to execute,
//! cross-checks it against the literal iteration.
//!
//! All arithmetic is `i32` two's-complement wraparound: `count` additions of
//! `delta` equal one addition of `(count mod 2^32) * delta (mod 2^32)`. Several
//! parity benchmarks depend on exactly this behaviour.

use crate::{
    errors::{ErrorKind, Result},
    oracle::{PostconditionViolation, Verdict},
    sink::{ErrorLocation, ErrorSink},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `count` times `x += delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub count: u64,
    pub delta: i32,
}

impl Step {
    pub fn new(count: u64, delta: i32) -> Self {
        Step { count, delta }
    }

    /// The net change of the whole step, wrapped to `i32`.
    pub fn net(&self) -> i32 {
        // Truncating the count keeps exactly its residue modulo 2^32.
        (self.count as u32 as i32).wrapping_mul(self.delta)
    }
}

pub fn run_iterative(initial: i32, steps: &[Step]) -> i32 {
    let mut value = initial;
    for step in steps {
        for _ in 0..step.count {
            value = value.wrapping_add(step.delta);
        }
    }
    value
}

pub fn run_closed_form(initial: i32, steps: &[Step]) -> i32 {
    steps
        .iter()
        .fold(initial, |value, step| value.wrapping_add(step.net()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub value: i32,
    /// Whether the closed form was confirmed by literal iteration.
    pub cross_checked: bool,
}

/// An accumulator together with the steps applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulation {
    pub initial: i32,
    pub steps: Vec<Step>,
}

impl Accumulation {
    pub fn new(initial: i32) -> Self {
        Accumulation {
            initial,
            steps: Vec::new(),
        }
    }

    #[must_use]
    pub fn then(mut self, count: u64, delta: i32) -> Self {
        self.steps.push(Step::new(count, delta));
        self
    }

    #[must_use]
    pub fn then_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn total_iterations(&self) -> u64 {
        self.steps
            .iter()
            .fold(0u64, |total, step| total.saturating_add(step.count))
    }

    /// Computes the final value in closed form. If at most `iteration_limit`
    /// iterations are involved, the loops are also executed and both results
    /// must agree.
    pub fn run(&self, iteration_limit: u64) -> Result<Summary> {
        let closed_form = run_closed_form(self.initial, &self.steps);
        let total = self.total_iterations();
        if total > iteration_limit {
            debug!(
                "summarised {} iterations from {} to {} without cross-check",
                total, self.initial, closed_form
            );
            return Ok(Summary {
                value: closed_form,
                cross_checked: false,
            });
        }
        let iterated = run_iterative(self.initial, &self.steps);
        if iterated != closed_form {
            bail!(ErrorKind::SummaryMismatch(iterated, closed_form));
        }
        debug!(
            "cross-checked {} iterations from {} to {}",
            total, self.initial, closed_form
        );
        Ok(Summary {
            value: closed_form,
            cross_checked: true,
        })
    }
}

/// Loop condition over the counter `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Guard {
    /// `while (x < bound)`
    Below(i32),
    /// `while (bound < x)`
    Above(i32),
}

impl Guard {
    pub fn holds(&self, value: i32) -> bool {
        match *self {
            Guard::Below(bound) => value < bound,
            Guard::Above(bound) => bound < value,
        }
    }
}

/// `while (guard) { x += delta; if (x == break_at) break; }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardedLoop {
    pub guard: Guard,
    pub delta: i32,
    pub break_at: Option<i32>,
}

impl GuardedLoop {
    pub fn while_below(bound: i32, delta: i32) -> Self {
        GuardedLoop {
            guard: Guard::Below(bound),
            delta,
            break_at: None,
        }
    }

    pub fn while_above(bound: i32, delta: i32) -> Self {
        GuardedLoop {
            guard: Guard::Above(bound),
            delta,
            break_at: None,
        }
    }

    #[must_use]
    pub fn with_break_at(mut self, value: i32) -> Self {
        self.break_at = Some(value);
        self
    }

    /// Number of times the body runs when the counter starts at `start`.
    pub fn iterations(&self, start: i32) -> Result<u64> {
        if !self.guard.holds(start) {
            return Ok(0);
        }
        let (distance, speed) = match self.guard {
            Guard::Below(bound) if self.delta > 0 => {
                (i64::from(bound) - i64::from(start), i64::from(self.delta))
            }
            Guard::Above(bound) if self.delta < 0 => {
                (i64::from(start) - i64::from(bound), -i64::from(self.delta))
            }
            _ => bail!(ErrorKind::NonTerminatingLoop(self.to_string())),
        };
        let to_guard = (distance + speed - 1) / speed;
        let count = match self.break_at {
            Some(exit) => {
                let offset = i64::from(exit) - i64::from(start);
                let delta = i64::from(self.delta);
                if offset % delta == 0 && (1..=to_guard).contains(&(offset / delta)) {
                    offset / delta
                } else {
                    to_guard
                }
            }
            None => to_guard,
        };
        let last = i64::from(start) + count * i64::from(self.delta);
        if i32::try_from(last).is_err() {
            bail!(ErrorKind::OverflowingSummary(self.to_string()));
        }
        // `count` is positive and bounded by the width of the i32 range.
        Ok(count as u64)
    }

    pub fn summarize(&self, start: i32) -> Result<Step> {
        Ok(Step::new(self.iterations(start)?, self.delta))
    }

    /// The counter's value after the loop, with the summary cross-checked when
    /// it involves at most `iteration_limit` iterations.
    pub fn run(&self, start: i32, iteration_limit: u64) -> Result<Summary> {
        let summary = Accumulation::new(start)
            .then_step(self.summarize(start)?)
            .run(iteration_limit)?;
        if summary.cross_checked {
            debug_assert_eq!(summary.value, self.execute(start));
        }
        Ok(summary)
    }

    /// Literal execution of the loop. Only meant for loops known to terminate
    /// quickly.
    pub fn execute(&self, start: i32) -> i32 {
        let mut value = start;
        while self.guard.holds(value) {
            value = value.wrapping_add(self.delta);
            if self.break_at == Some(value) {
                break;
            }
        }
        value
    }
}

impl fmt::Display for GuardedLoop {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.guard {
            Guard::Below(bound) => write!(f, "while (x < {bound}) x += {}", self.delta)?,
            Guard::Above(bound) => write!(f, "while ({bound} < x) x += {}", self.delta)?,
        }
        if let Some(exit) = self.break_at {
            write!(f, "; break at {exit}")?;
        }
        Ok(())
    }
}

/// The values `start + k * delta` for `k` in `1..=count`, i.e. the counter
/// after each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub start: i32,
    pub delta: i32,
    pub count: u64,
}

impl Progression {
    pub fn contains(&self, value: i32) -> bool {
        if self.count == 0 {
            return false;
        }
        let offset = i64::from(value) - i64::from(self.start);
        let delta = i64::from(self.delta);
        if delta == 0 {
            return offset == 0;
        }
        offset % delta == 0 && {
            let k = offset / delta;
            k >= 1 && (k as u64) <= self.count
        }
    }
}

/// A single-variable assertion of the loop benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarPredicate {
    /// `x % 2 == 0`
    Even,
    /// `x % 2 != 0`
    Odd,
    Equals(i32),
    NotEquals(i32),
}

impl ScalarPredicate {
    pub fn holds(&self, value: i32) -> bool {
        // `%` truncates like C, so odd negatives leave -1.
        match *self {
            ScalarPredicate::Even => value % 2 == 0,
            ScalarPredicate::Odd => value % 2 != 0,
            ScalarPredicate::Equals(expected) => value == expected,
            ScalarPredicate::NotEquals(excluded) => value != excluded,
        }
    }

    pub fn render(&self, variable: &str) -> String {
        match *self {
            ScalarPredicate::Even => format!("{variable} % 2 == 0"),
            ScalarPredicate::Odd => format!("{variable} % 2 != 0"),
            ScalarPredicate::Equals(expected) => format!("{variable} == {expected}"),
            ScalarPredicate::NotEquals(excluded) => format!("{variable} != {excluded}"),
        }
    }
}

/// `__VERIFIER_assert(predicate(variable))`: reaches `location` iff the
/// predicate is false for `value`.
pub fn assert_scalar(
    location: ErrorLocation,
    variable: &str,
    predicate: ScalarPredicate,
    value: i32,
    sink: &mut dyn ErrorSink,
) -> Verdict {
    let verdict = if predicate.holds(value) {
        Verdict::Holds
    } else {
        Verdict::Violated(PostconditionViolation {
            location: location.to_string(),
            failed: vec![predicate.render(variable)],
            state: format!("{variable} = {value}"),
        })
    };
    verdict.report(location, sink)
}
