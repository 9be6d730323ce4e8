// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Operational errors of the benchmark programs.
//!
//! A violated postcondition is *not* an error: it is reported to an
//! [`ErrorSink`](crate::sink::ErrorSink) and returned as a
//! [`Verdict`](crate::oracle::Verdict).

error_chain! {
    foreign_links {
        ParseInt(::std::num::ParseIntError);
    }

    errors {
        InvalidSextuple(text: String) {
            description("invalid sextuple"),
            display("invalid sextuple '{}': expected six comma-separated integers", text),
        }
        InvalidPosition(text: String) {
            description("invalid position"),
            display("invalid position '{}': expected one of a, b, c, d, e, f", text),
        }
        InvalidFault(text: String) {
            description("invalid fault description"),
            display("invalid fault description '{}'", text),
        }
        UnknownFaultSite(site: String) {
            description("fault site does not exist in the decision tree"),
            display("fault site {} does not exist in the decision tree", site),
        }
        ConjunctOutOfRange(site: String, conjunct: usize, len: usize) {
            description("conjunct index out of range"),
            display("guard of {} has {} conjunct(s), cannot replace conjunct {}", site, len, conjunct),
        }
        InvalidFixture(name: String, reason: String) {
            description("invalid benchmark fixture"),
            display("fixture '{}' is invalid: {}", name, reason),
        }
        UnknownFixture(name: String) {
            description("unknown benchmark fixture"),
            display("no fixture named '{}'", name),
        }
        SummaryMismatch(iterated: i32, closed_form: i32) {
            description("iterated and closed-form accumulation disagree"),
            display("iterated accumulation gave {} but the closed form gave {}", iterated, closed_form),
        }
        NonTerminatingLoop(loop_text: String) {
            description("loop step does not approach its guard"),
            display("loop '{}' never reaches its exit condition", loop_text),
        }
        OverflowingSummary(loop_text: String) {
            description("loop summary leaves the i32 range"),
            display("summary of loop '{}' overflows before the guard is reached", loop_text),
        }
    }
}
