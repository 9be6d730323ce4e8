// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unused_must_use)]

use bench_common::{CampaignSummary, CheckDetails, CheckResponse, FixtureOutcome};
use bench_programs::{
    errors::{ErrorKind, Result},
    CaseReport, CheckResult, ComparisonFault, Sextuple, Verdict,
};
use std::fmt::Write;

/// Exit status for usage errors, malformed inputs and fixtures that cannot run.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Accepts either six separate integers or one `a,b,c,d,e,f` list.
pub fn parse_inputs(values: &[&str]) -> Result<Sextuple> {
    match values {
        [single] => single.parse(),
        [a, b, c, d, e, f] => Ok(Sextuple::new(
            a.trim().parse()?,
            b.trim().parse()?,
            c.trim().parse()?,
            d.trim().parse()?,
            e.trim().parse()?,
            f.trim().parse()?,
        )),
        _ => Err(ErrorKind::InvalidSextuple(values.join(" ")).into()),
    }
}

pub fn parse_fault(text: Option<&str>) -> Result<Option<ComparisonFault>> {
    text.map(str::parse).transpose()
}

/// Parses a comma-separated list of nondeterministic values.
pub fn parse_values(text: &str) -> Result<Vec<i32>> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Ok(part.parse()?))
        .collect()
}

/// Human-readable rendering of a response, one finding per line.
pub fn render_text(response: &CheckResponse) -> String {
    let mut out = String::new();
    match &response.details {
        CheckDetails::Case(case) => render_case(&mut out, case),
        CheckDetails::Campaign(summary) => render_campaign(&mut out, summary),
        CheckDetails::Fixtures(outcomes) => {
            for outcome in outcomes {
                render_fixture(&mut out, outcome);
            }
        }
    }
    writeln!(out, "result: {}", describe(&response.result)).unwrap();
    out
}

fn render_case(out: &mut String, case: &CaseReport) {
    writeln!(
        out,
        "maxmin6({}) = {} [leaf {}]",
        case.inputs, case.selection.result, case.selection.leaf
    )
    .unwrap();
    match &case.verdict {
        Verdict::Holds => writeln!(out, "postcondition holds").unwrap(),
        Verdict::Violated(violation) => writeln!(out, "{violation}").unwrap(),
    }
}

fn render_campaign(out: &mut String, summary: &CampaignSummary) {
    if let Some(fault) = &summary.fault {
        writeln!(out, "fault: {fault}").unwrap();
    }
    writeln!(
        out,
        "checked {} case(s), {} violation(s)",
        summary.cases, summary.violations
    )
    .unwrap();
    if let Some(inputs) = &summary.first_counterexample {
        writeln!(out, "first counterexample: ({inputs})").unwrap();
    }
    let leaves = summary.coverage.len() + summary.uncovered.len();
    writeln!(out, "coverage: {}/{} leaves", summary.coverage.len(), leaves).unwrap();
    for leaf in &summary.coverage {
        writeln!(out, "    {:<14} {}", leaf.leaf, leaf.hits).unwrap();
    }
    for leaf in &summary.uncovered {
        writeln!(out, "    {:<14} never reached", leaf).unwrap();
    }
}

fn render_fixture(out: &mut String, outcome: &FixtureOutcome) {
    writeln!(
        out,
        "{}: expected {:?}, {} [{}]",
        outcome.name,
        outcome.expectation,
        describe(&outcome.result),
        if outcome.as_expected { "ok" } else { "MISMATCH" }
    )
    .unwrap();
}

fn describe(result: &CheckResult) -> String {
    match result {
        CheckResult::Holds => "error location unreachable".to_string(),
        CheckResult::Violated(records) => {
            format!("error location reached ({} report(s))", records.len())
        }
        CheckResult::InvalidFixture(reason) => format!("not runnable: {reason}"),
    }
}
