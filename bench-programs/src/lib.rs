// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#![deny(unused_must_use)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod accumulator;
mod check_result;
pub mod errors;
pub mod fault;
pub mod fixtures;
mod harness;
pub mod nondet;
pub mod oracle;
pub mod selector;
mod sextuple;
pub mod sink;

pub use check_result::*;
pub use fault::{ComparisonFault, FaultSite};
pub use harness::*;
pub use nondet::NondetSource;
pub use oracle::{PostconditionViolation, Verdict};
pub use selector::{select, DecisionTree, Extremum, Leaf, Selection};
pub use sextuple::*;
pub use sink::{ErrorLocation, ErrorSink};
