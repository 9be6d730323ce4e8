// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Postcondition oracle of the max/min benchmark.
//!
//! The oracle only observes: the selection has already been computed when it
//! runs, and reporting a violation never changes that selection.

use crate::{
    sink::{ErrorLocation, ErrorSink},
    Position, SelectionResult, Sextuple,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `ERROR:` label of the max/min benchmark.
pub const MAXMIN6_ERROR: ErrorLocation = ErrorLocation::new("maxmin6", "ERROR");

/// A postcondition that did not hold, with the conjuncts that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostconditionViolation {
    pub location: String,
    pub failed: Vec<String>,
    pub state: String,
}

impl fmt::Display for PostconditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: ({}) does not hold for {}",
            self.location,
            self.failed.join(") && ("),
            self.state
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Holds,
    Violated(PostconditionViolation),
}

impl Verdict {
    pub fn holds(&self) -> bool {
        matches!(self, Verdict::Holds)
    }

    /// Signals `sink` if the verdict is a violation and hands the verdict back.
    pub(crate) fn report(self, location: ErrorLocation, sink: &mut dyn ErrorSink) -> Self {
        if let Verdict::Violated(violation) = &self {
            sink.reach_error(location, &violation.to_string());
        }
        self
    }
}

/// The conjuncts of `max >= a && ... && min <= f` that are false.
pub fn failed_conjuncts(inputs: &Sextuple, result: &SelectionResult) -> Vec<String> {
    let upper = inputs
        .iter()
        .filter(|&(_, value)| result.max < value)
        .map(|(position, _)| format!("max >= {position}"));
    let lower = inputs
        .iter()
        .filter(|&(_, value)| result.min > value)
        .map(|(position, _)| format!("min <= {position}"));
    upper.chain(lower).collect()
}

pub fn postcondition_holds(inputs: &Sextuple, result: &SelectionResult) -> bool {
    Position::ALL.iter().all(|&position| {
        let value = inputs.get(position);
        result.max >= value && result.min <= value
    })
}

/// Evaluates the postcondition and reaches [`MAXMIN6_ERROR`] iff it is false.
pub fn check(
    inputs: &Sextuple,
    result: &SelectionResult,
    sink: &mut dyn ErrorSink,
) -> Verdict {
    let verdict = if postcondition_holds(inputs, result) {
        Verdict::Holds
    } else {
        Verdict::Violated(PostconditionViolation {
            location: MAXMIN6_ERROR.to_string(),
            failed: failed_conjuncts(inputs, result),
            state: format!("inputs ({inputs}) with {result}"),
        })
    };
    verdict.report(MAXMIN6_ERROR, sink)
}

/// [`check`] with the benchmark's flat argument list.
#[allow(clippy::too_many_arguments)]
pub fn check_values(
    a: i32,
    b: i32,
    c: i32,
    d: i32,
    e: i32,
    f: i32,
    max: i32,
    min: i32,
    sink: &mut dyn ErrorSink,
) -> Verdict {
    check(
        &Sextuple::new(a, b, c, d, e, f),
        &SelectionResult { max, min },
        sink,
    )
}
