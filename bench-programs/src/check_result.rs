// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// The result of checking one benchmark program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckResult {
    /// The error location was not reached.
    Holds,
    /// The error location was reached.
    Violated(Vec<ViolationRecord>),
    /// The program could not be run at all.
    InvalidFixture(String),
}

impl CheckResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Holds)
    }

    pub fn from_records(records: Vec<ViolationRecord>) -> Self {
        if records.is_empty() {
            CheckResult::Holds
        } else {
            CheckResult::Violated(records)
        }
    }

    /// Process exit status of the driver: `0` unreachable error, `1` reached,
    /// `2` not runnable.
    pub fn exit_code(&self) -> i32 {
        match self {
            CheckResult::Holds => 0,
            CheckResult::Violated(_) => 1,
            CheckResult::InvalidFixture(_) => 2,
        }
    }
}

/// One report delivered to an error sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// `program::label` of the reached location.
    pub location: String,
    pub message: String,
}
