// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    config,
    errors::{ErrorKind, Result},
    report::log,
};
use bench_programs::{
    fixtures::{self, Expectation, LoopFixture},
    nondet::{BoundarySource, FixedSource, Interleave, RandomSource, SextupleGrid},
    sink::{LoggingSink, RecordingSink, TeeSink},
    CampaignReport, CaseReport, CheckResult, ComparisonFault, MaxMinHarness, Sextuple,
    ViolationRecord,
};
use serde::{Deserialize, Serialize};

/// Every this many drawn values, a random campaign takes a boundary value
/// instead of a random one.
const BOUNDARY_PERIOD: usize = 4;

pub trait CheckService {
    fn check(&self, request: &CheckRequest) -> Result<CheckResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckRequest {
    /// One run of the max/min benchmark on fixed inputs.
    MaxMin {
        inputs: Sextuple,
        fault: Option<ComparisonFault>,
    },
    /// Every sextuple over `[min, max]^6`.
    Sweep {
        min: i32,
        max: i32,
        fault: Option<ComparisonFault>,
        fail_fast: bool,
    },
    /// Seeded random sextuples mixed with boundary values.
    Random {
        cases: u64,
        seed: u64,
        fault: Option<ComparisonFault>,
        fail_fast: bool,
    },
    /// One loop fixture, on the given nondeterministic inputs or on its
    /// witness.
    Fixture {
        name: String,
        inputs: Option<Vec<i32>>,
    },
    /// Every loop fixture on its witness, compared with its expectation.
    AllFixtures,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub result: CheckResult,
    pub details: CheckDetails,
}

impl CheckResponse {
    pub fn exit_code(&self) -> i32 {
        self.result.exit_code()
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum CheckDetails {
    Case(CaseReport),
    Campaign(CampaignSummary),
    Fixtures(Vec<FixtureOutcome>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafCoverage {
    pub leaf: String,
    pub hits: u64,
}

/// A [`CampaignReport`] together with the tree it ran against, ready to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub fault: Option<String>,
    pub cases: u64,
    pub violations: u64,
    pub first_counterexample: Option<Sextuple>,
    pub coverage: Vec<LeafCoverage>,
    pub uncovered: Vec<String>,
}

impl CampaignSummary {
    fn new(harness: &MaxMinHarness, report: &CampaignReport) -> Self {
        CampaignSummary {
            fault: harness.tree().fault().map(ToString::to_string),
            cases: report.cases,
            violations: report.violations,
            first_counterexample: report.first_counterexample,
            coverage: report
                .coverage_table()
                .into_iter()
                .map(|(leaf, hits)| LeafCoverage {
                    leaf: leaf.to_string(),
                    hits,
                })
                .collect(),
            uncovered: report
                .uncovered_leaves(harness.tree())
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub name: String,
    pub expectation: Expectation,
    pub result: CheckResult,
    pub as_expected: bool,
}

impl FixtureOutcome {
    fn new(fixture: &LoopFixture, result: CheckResult) -> Self {
        FixtureOutcome {
            name: fixture.name.to_string(),
            expectation: fixture.expectation,
            as_expected: fixture.matches_expectation(&result),
            result,
        }
    }
}

/// Runs every check in the current process.
#[derive(Debug, Clone)]
pub struct LocalCheckService {
    iteration_limit: u64,
}

impl LocalCheckService {
    pub fn new() -> Self {
        LocalCheckService {
            iteration_limit: config::iteration_limit(),
        }
    }

    #[must_use]
    pub fn with_iteration_limit(mut self, iteration_limit: u64) -> Self {
        self.iteration_limit = iteration_limit;
        self
    }

    fn harness(fault: &Option<ComparisonFault>) -> Result<MaxMinHarness> {
        Ok(match fault {
            Some(fault) => MaxMinHarness::with_fault(fault)?,
            None => MaxMinHarness::new(),
        })
    }

    fn campaign_response(
        harness: &MaxMinHarness,
        report: &CampaignReport,
        sink: RecordingSink,
        report_name: &str,
    ) -> CheckResponse {
        let summary = CampaignSummary::new(harness, report);
        if let Err(err) = log::report_json("campaigns", report_name, &summary) {
            warn!("could not dump campaign report {}: {}", report_name, err);
        }
        CheckResponse {
            result: CheckResult::from_records(sink.into_records()),
            details: CheckDetails::Campaign(summary),
        }
    }

    fn check_fixture(
        &self,
        fixture: &LoopFixture,
        inputs: &Option<Vec<i32>>,
    ) -> Result<CheckResult> {
        Ok(match inputs {
            Some(values) => {
                let mut source = FixedSource::new(values.iter().copied());
                fixture.check(&mut source, self.iteration_limit)?
            }
            None => fixture.check_witness(self.iteration_limit)?,
        })
    }
}

impl Default for LocalCheckService {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckService for LocalCheckService {
    fn check(&self, request: &CheckRequest) -> Result<CheckResponse> {
        match request {
            CheckRequest::MaxMin { inputs, fault } => {
                let harness = Self::harness(fault)?;
                let mut sink = RecordingSink::new();
                let mut logged = LoggingSink::new();
                let case = harness.check(inputs, &mut TeeSink::new(&mut sink, &mut logged));
                Ok(CheckResponse {
                    result: CheckResult::from_records(sink.into_records()),
                    details: CheckDetails::Case(case),
                })
            }

            CheckRequest::Sweep {
                min,
                max,
                fault,
                fail_fast,
            } => {
                let grid = SextupleGrid::new(*min..=*max);
                if grid.is_empty() || grid.checked_len().is_none() {
                    bail!(ErrorKind::InvalidDomain(*min, *max));
                }
                let harness = Self::harness(fault)?;
                let mut sink = RecordingSink::new();
                let description = format!("sweep over {} sextuple(s)", grid.len());
                run_timed!(description,
                    let report = harness.sweep(grid, &mut sink, *fail_fast);
                );
                let name = format!("sweep_{min}_{max}.json");
                Ok(Self::campaign_response(&harness, &report, sink, &name))
            }

            CheckRequest::Random {
                cases,
                seed,
                fault,
                fail_fast,
            } => {
                let harness = Self::harness(fault)?;
                let mut source = Interleave::new(
                    RandomSource::seeded(*seed),
                    BoundarySource::new(),
                    BOUNDARY_PERIOD,
                );
                let mut sink = RecordingSink::new();
                run_timed!(format!("random campaign of {cases} case(s), seed {seed}"),
                    let report = harness.campaign(&mut source, *cases, &mut sink, *fail_fast);
                );
                let name = format!("random_{seed}.json");
                Ok(Self::campaign_response(&harness, &report, sink, &name))
            }

            CheckRequest::Fixture { name, inputs } => {
                let fixture = fixtures::find(name)?;
                let result = self.check_fixture(fixture, inputs)?;
                let outcome = FixtureOutcome::new(fixture, result.clone());
                Ok(CheckResponse {
                    result,
                    details: CheckDetails::Fixtures(vec![outcome]),
                })
            }

            CheckRequest::AllFixtures => {
                let outcomes = fixtures::all()
                    .iter()
                    .map(|fixture| {
                        Ok(FixtureOutcome::new(fixture, self.check_fixture(fixture, &None)?))
                    })
                    .collect::<Result<Vec<FixtureOutcome>>>()?;
                let mismatches = fixtures::all()
                    .iter()
                    .zip(&outcomes)
                    .filter(|(_, outcome)| !outcome.as_expected)
                    .map(|(fixture, outcome)| ViolationRecord {
                        location: fixture.location().to_string(),
                        message: format!(
                            "expected {:?}, got exit status {}",
                            outcome.expectation,
                            outcome.result.exit_code()
                        ),
                    })
                    .collect();
                if let Err(err) = log::report_json("fixtures", "all.json", &outcomes) {
                    warn!("could not dump fixture report: {}", err);
                }
                Ok(CheckResponse {
                    result: CheckResult::from_records(mismatches),
                    details: CheckDetails::Fixtures(outcomes),
                })
            }
        }
    }
}
