// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    errors::Result,
    fault::ComparisonFault,
    nondet::NondetSource,
    oracle::{self, Verdict},
    selector::{DecisionTree, Leaf, Selection},
    sink::ErrorSink,
    Sextuple,
};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// One run of the max/min benchmark: inputs, the tree's answer and the
/// oracle's verdict on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    pub inputs: Sextuple,
    pub selection: Selection,
    pub verdict: Verdict,
}

/// Aggregate of many cases run against the same tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CampaignReport {
    pub cases: u64,
    pub violations: u64,
    pub first_counterexample: Option<Sextuple>,
    #[serde(skip)]
    pub coverage: FxHashMap<Leaf, u64>,
}

impl CampaignReport {
    pub fn is_success(&self) -> bool {
        self.violations == 0
    }

    fn record(&mut self, case: &CaseReport) {
        self.cases += 1;
        *self.coverage.entry(case.selection.leaf).or_insert(0) += 1;
        if !case.verdict.holds() {
            self.violations += 1;
            self.first_counterexample.get_or_insert(case.inputs);
        }
    }

    /// Hit count per leaf, in leaf order.
    pub fn coverage_table(&self) -> Vec<(Leaf, u64)> {
        self.coverage
            .iter()
            .map(|(&leaf, &hits)| (leaf, hits))
            .sorted()
            .collect()
    }

    /// Leaves of `tree` that no case reached.
    pub fn uncovered_leaves(&self, tree: &DecisionTree) -> Vec<Leaf> {
        tree.leaves()
            .into_iter()
            .filter(|leaf| !self.coverage.contains_key(leaf))
            .collect()
    }
}

/// Wires a nondeterministic source, a decision tree, the oracle and an error
/// sink together.
#[derive(Debug, Clone, Default)]
pub struct MaxMinHarness {
    tree: DecisionTree,
}

impl MaxMinHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(tree: DecisionTree) -> Self {
        MaxMinHarness { tree }
    }

    pub fn with_fault(fault: &ComparisonFault) -> Result<Self> {
        Ok(Self::with_tree(DecisionTree::derive().with_fault(fault)?))
    }

    pub fn tree(&self) -> &DecisionTree {
        &self.tree
    }

    pub fn check(&self, inputs: &Sextuple, sink: &mut dyn ErrorSink) -> CaseReport {
        let selection = self.tree.select(inputs);
        let verdict = oracle::check(inputs, &selection.result, sink);
        CaseReport {
            inputs: *inputs,
            selection,
            verdict,
        }
    }

    /// `foo(nondet(), nondet(), nondet(), nondet(), nondet(), nondet())`
    pub fn run_once(&self, source: &mut dyn NondetSource, sink: &mut dyn ErrorSink) -> CaseReport {
        let inputs = Sextuple::from_source(source);
        self.check(&inputs, sink)
    }

    /// Checks every sextuple of `cases`, stopping at the first violation if
    /// `fail_fast` is set.
    pub fn sweep<I>(&self, cases: I, sink: &mut dyn ErrorSink, fail_fast: bool) -> CampaignReport
    where
        I: IntoIterator<Item = Sextuple>,
    {
        let mut report = CampaignReport::default();
        for inputs in cases {
            let case = self.check(&inputs, sink);
            report.record(&case);
            if fail_fast && !case.verdict.holds() {
                break;
            }
        }
        info!(
            "checked {} case(s), {} violation(s), {} leaf/leaves reached",
            report.cases,
            report.violations,
            report.coverage.len()
        );
        report
    }

    /// Draws `cases` sextuples from `source` and checks each of them.
    pub fn campaign(
        &self,
        source: &mut dyn NondetSource,
        cases: u64,
        sink: &mut dyn ErrorSink,
        fail_fast: bool,
    ) -> CampaignReport {
        let inputs = std::iter::repeat_with(|| Sextuple::from_source(source)).take(cases as usize);
        self.sweep(inputs, sink, fail_fast)
    }
}
