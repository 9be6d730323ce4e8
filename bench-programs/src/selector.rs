// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The order-statistics decision tree of the six-value max/min benchmark.
//!
//! The tree first decides which position holds the maximum and then, among the
//! five remaining positions, which holds the minimum. Each decision is a
//! [`Cascade`]: an `if / else if / ... / else` chain over an ordered candidate
//! list. The guards are derived from the candidate list instead of being written
//! out per variable, so a mistyped comparator can only enter the tree through an
//! explicit [`ComparisonFault`](crate::fault::ComparisonFault).
//!
//! The guard of a candidate compares it against every candidate *after* it. For
//! the first candidate that is "all other values"; later candidates are only
//! tested once all earlier ones have been ruled out, so they only need to beat
//! what follows. Under ties this picks the last occurrence of the extremum, and
//! the final candidate is accepted without a test.

use crate::{fault::ComparisonFault, Position, SelectionResult, Sextuple};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref DERIVED_TREE: DecisionTree = DecisionTree::derive();
}

/// Returns `(max, min)` of the six values using the derived decision tree.
pub fn select(a: i32, b: i32, c: i32, d: i32, e: i32, f: i32) -> (i32, i32) {
    let selection = DERIVED_TREE.select(&Sextuple::new(a, b, c, d, e, f));
    (selection.result.max, selection.result.min)
}

/// The derived decision tree, shared by all callers.
pub fn derived_tree() -> &'static DecisionTree {
    &DERIVED_TREE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extremum {
    Max,
    Min,
}

impl Extremum {
    /// Strict comparison used by the guards of this extremum.
    pub fn prefers(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Extremum::Max => lhs > rhs,
            Extremum::Min => lhs < rhs,
        }
    }

    pub fn operator(self) -> &'static str {
        match self {
            Extremum::Max => ">",
            Extremum::Min => "<",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Extremum::Max => "max",
            Extremum::Min => "min",
        }
    }
}

/// One conjunct `lhs > rhs` (or `lhs < rhs` in a min cascade) of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comparison {
    pub lhs: Position,
    pub rhs: Position,
}

impl Comparison {
    pub fn new(lhs: Position, rhs: Position) -> Self {
        Comparison { lhs, rhs }
    }

    pub fn holds(&self, extremum: Extremum, values: &Sextuple) -> bool {
        extremum.prefers(values.get(self.lhs), values.get(self.rhs))
    }
}

/// A guarded branch of a cascade: `if (guard) { candidate is the extremum }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub candidate: Position,
    pub guard: Vec<Comparison>,
}

impl Branch {
    fn accepts(&self, extremum: Extremum, values: &Sextuple) -> bool {
        self.guard
            .iter()
            .all(|comparison| comparison.holds(extremum, values))
    }
}

/// A chain of mutually exclusive branches ending in an unguarded fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    pub extremum: Extremum,
    pub branches: Vec<Branch>,
    pub fallback: Position,
}

impl Cascade {
    /// Builds the cascade over `candidates` (in precedence order) followed by
    /// `fallback`.
    pub fn derive(extremum: Extremum, candidates: &[Position], fallback: Position) -> Self {
        let branches = candidates
            .iter()
            .enumerate()
            .map(|(index, &candidate)| Branch {
                candidate,
                guard: candidates[index + 1..]
                    .iter()
                    .chain(std::iter::once(&fallback))
                    .map(|&later| Comparison::new(candidate, later))
                    .collect(),
            })
            .collect();
        Cascade {
            extremum,
            branches,
            fallback,
        }
    }

    /// Picks the first branch whose guard holds, or the fallback.
    pub fn resolve(&self, values: &Sextuple) -> Position {
        self.branches
            .iter()
            .find(|branch| branch.accepts(self.extremum, values))
            .map_or(self.fallback, |branch| branch.candidate)
    }

    /// All positions the cascade can return, in precedence order.
    pub fn outcomes(&self) -> impl Iterator<Item = Position> + '_ {
        self.branches
            .iter()
            .map(|branch| branch.candidate)
            .chain(std::iter::once(self.fallback))
    }

    pub(crate) fn branch_mut(&mut self, candidate: Position) -> Option<&mut Branch> {
        self.branches
            .iter_mut()
            .find(|branch| branch.candidate == candidate)
    }
}

/// Which max branch and which min branch fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Leaf {
    pub max: Position,
    pub min: Position,
}

impl fmt::Display for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "max={}/min={}", self.max, self.min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub result: SelectionResult,
    pub leaf: Leaf,
}

/// The max cascade followed by one min cascade per possible maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionTree {
    pub(crate) max: Cascade,
    /// Indexed by the position chosen as maximum.
    pub(crate) min: Vec<Cascade>,
    pub(crate) fault: Option<ComparisonFault>,
}

impl DecisionTree {
    /// The correct tree: precedence order `a..f` for both decisions, the
    /// maximum's position excluded from the minimum's candidates.
    pub fn derive() -> Self {
        let (&max_fallback, max_candidates) = split_fallback(&Position::ALL);
        let max = Cascade::derive(Extremum::Max, max_candidates, max_fallback);
        let min = Position::ALL
            .iter()
            .map(|&chosen| {
                let remaining: Vec<Position> = Position::ALL
                    .iter()
                    .copied()
                    .filter(|&position| position != chosen)
                    .collect();
                let (&min_fallback, min_candidates) = split_fallback(&remaining);
                Cascade::derive(Extremum::Min, min_candidates, min_fallback)
            })
            .collect();
        DecisionTree {
            max,
            min,
            fault: None,
        }
    }

    pub fn select(&self, values: &Sextuple) -> Selection {
        let max = self.max.resolve(values);
        let min = self.min[max.index()].resolve(values);
        let leaf = Leaf { max, min };
        debug!("maxmin6({}) took leaf {}", values, leaf);
        Selection {
            result: SelectionResult {
                max: values.get(max),
                min: values.get(min),
            },
            leaf,
        }
    }

    /// Every leaf of the tree in branch order.
    pub fn leaves(&self) -> Vec<Leaf> {
        self.max
            .outcomes()
            .flat_map(|max| {
                self.min[max.index()]
                    .outcomes()
                    .map(move |min| Leaf { max, min })
            })
            .collect()
    }

    pub fn max_cascade(&self) -> &Cascade {
        &self.max
    }

    pub fn min_cascade(&self, max: Position) -> &Cascade {
        &self.min[max.index()]
    }

    /// The fault this tree was built with, if any.
    pub fn fault(&self) -> Option<&ComparisonFault> {
        self.fault.as_ref()
    }
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::derive()
    }
}

/// Six positions (or five after removing the maximum) always leave a fallback.
fn split_fallback(candidates: &[Position]) -> (&Position, &[Position]) {
    match candidates.split_last() {
        Some(split) => split,
        None => unreachable!("cascades are derived from non-empty candidate lists"),
    }
}

impl fmt::Display for DecisionTree {
    /// Renders the tree as nested C-style `if`/`else` blocks.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_cascade(f, &self.max, 0, &|f, max, depth| {
            writeln!(f, "{}max = {};", indent(depth), max)?;
            write_cascade(f, &self.min[max.index()], depth, &|f, min, depth| {
                writeln!(f, "{}min = {};", indent(depth), min)
            })
        })
    }
}

type LeafWriter<'a> = dyn Fn(&mut fmt::Formatter, Position, usize) -> fmt::Result + 'a;

fn write_cascade(
    f: &mut fmt::Formatter,
    cascade: &Cascade,
    depth: usize,
    body: &LeafWriter<'_>,
) -> fmt::Result {
    let mut depth = depth;
    for branch in &cascade.branches {
        let guard = branch
            .guard
            .iter()
            .map(|comparison| {
                format!(
                    "({}{}{})",
                    comparison.lhs,
                    cascade.extremum.operator(),
                    comparison.rhs
                )
            })
            .join(" && ");
        writeln!(f, "{}if ({}) {{", indent(depth), guard)?;
        body(f, branch.candidate, depth + 1)?;
        writeln!(f, "{}}} else {{", indent(depth))?;
        depth += 1;
    }
    body(f, cascade.fallback, depth)?;
    for level in (0..cascade.branches.len()).rev() {
        writeln!(f, "{}}}", indent(depth - (cascade.branches.len() - level)))?;
    }
    Ok(())
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}
