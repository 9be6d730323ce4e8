// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fault injection into the derived decision tree.
//!
//! A fault replaces exactly one conjunct of one guard, which is the bug class
//! of the fault-localization benchmark: the published faulty program tests
//! `b>d` where the guard of `a` needs `a>d`.

use crate::{
    errors::{ErrorKind, Result},
    selector::{Comparison, DecisionTree, Extremum},
    Position, Sextuple,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The guard a fault is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultSite {
    /// The guard of `candidate` in the max cascade.
    MaxGuard { candidate: Position },
    /// The guard of `candidate` in the min cascade taken after `max` was
    /// chosen.
    MinGuard { max: Position, candidate: Position },
}

impl FaultSite {
    pub fn candidate(&self) -> Position {
        match *self {
            FaultSite::MaxGuard { candidate } | FaultSite::MinGuard { candidate, .. } => candidate,
        }
    }

    pub fn extremum(&self) -> Extremum {
        match self {
            FaultSite::MaxGuard { .. } => Extremum::Max,
            FaultSite::MinGuard { .. } => Extremum::Min,
        }
    }
}

impl fmt::Display for FaultSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FaultSite::MaxGuard { candidate } => write!(f, "max guard of {candidate}"),
            FaultSite::MinGuard { max, candidate } => {
                write!(f, "min guard of {candidate} (max={max})")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonFault {
    pub site: FaultSite,
    /// Zero-based index of the replaced conjunct within the guard.
    pub conjunct: usize,
    pub replacement: Comparison,
}

impl ComparisonFault {
    /// `Maxmin6varKO2`: the third conjunct of the guard of `a` reads `b>d`.
    pub fn maxmin6_ko2() -> Self {
        ComparisonFault {
            site: FaultSite::MaxGuard {
                candidate: Position::A,
            },
            conjunct: 2,
            replacement: Comparison::new(Position::B, Position::D),
        }
    }

    /// The published counterexample of [`ComparisonFault::maxmin6_ko2`]: the
    /// faulty tree answers `max=0` instead of `max=1`.
    pub fn maxmin6_ko2_counterexample() -> Sextuple {
        Sextuple::new(1, -3, 0, -2, -1, -2)
    }
}

impl fmt::Display for ComparisonFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "conjunct {} of the {} replaced by ({}{}{})",
            self.conjunct,
            self.site,
            self.replacement.lhs,
            self.site.extremum().operator(),
            self.replacement.rhs
        )
    }
}

impl FromStr for ComparisonFault {
    type Err = crate::errors::Error;

    /// Accepts `ko2`, `max:<candidate>:<conjunct>:<lhs>><rhs>` and
    /// `min:<max>:<candidate>:<conjunct>:<lhs><<rhs>`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ErrorKind::InvalidFault(s.to_string());
        let text = s.trim();
        if text.eq_ignore_ascii_case("ko2") || text.eq_ignore_ascii_case("maxmin6-ko2") {
            return Ok(Self::maxmin6_ko2());
        }
        let parts: Vec<&str> = text.split(':').collect();
        let (site, conjunct, comparison) = match parts.as_slice() {
            ["max", candidate, conjunct, comparison] => (
                FaultSite::MaxGuard {
                    candidate: candidate.parse()?,
                },
                conjunct,
                comparison,
            ),
            ["min", max, candidate, conjunct, comparison] => (
                FaultSite::MinGuard {
                    max: max.parse()?,
                    candidate: candidate.parse()?,
                },
                conjunct,
                comparison,
            ),
            _ => bail!(invalid()),
        };
        let conjunct = conjunct.parse().map_err(|_| invalid())?;
        let (lhs, rhs) = comparison
            .split_once(site.extremum().operator())
            .ok_or_else(invalid)?;
        Ok(ComparisonFault {
            site,
            conjunct,
            replacement: Comparison::new(lhs.parse()?, rhs.parse()?),
        })
    }
}

impl DecisionTree {
    /// Returns a copy of this tree with one guard conjunct replaced.
    pub fn with_fault(&self, fault: &ComparisonFault) -> Result<DecisionTree> {
        let mut tree = self.clone();
        let cascade = match fault.site {
            FaultSite::MaxGuard { .. } => &mut tree.max,
            FaultSite::MinGuard { max, .. } => &mut tree.min[max.index()],
        };
        let branch = cascade
            .branch_mut(fault.site.candidate())
            .ok_or_else(|| ErrorKind::UnknownFaultSite(fault.site.to_string()))?;
        let len = branch.guard.len();
        let conjunct = branch.guard.get_mut(fault.conjunct).ok_or_else(|| {
            ErrorKind::ConjunctOutOfRange(fault.site.to_string(), fault.conjunct, len)
        })?;
        *conjunct = fault.replacement;
        info!("injected fault: {}", fault);
        tree.fault = Some(*fault);
        Ok(tree)
    }
}
