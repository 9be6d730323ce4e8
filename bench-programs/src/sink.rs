// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error sinks stand in for the `ERROR:` label of the benchmark programs.
//!
//! A program calls [`ErrorSink::reach_error`] exactly when its modeled
//! postcondition is false, so the observable contract of a benchmark is
//! whether its sink was ever reached.

use crate::ViolationRecord;
use std::fmt;

/// Stable identifier of an error location: the program it belongs to and the
/// label inside that program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorLocation {
    pub program: &'static str,
    pub label: &'static str,
}

impl ErrorLocation {
    pub const fn new(program: &'static str, label: &'static str) -> Self {
        ErrorLocation { program, label }
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.program, self.label)
    }
}

pub trait ErrorSink {
    /// Records that `location` was reached. `detail` describes the failing
    /// state and is only used for reporting.
    fn reach_error(&mut self, location: ErrorLocation, detail: &str);
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn reach_error(&mut self, location: ErrorLocation, detail: &str) {
        (**self).reach_error(location, detail)
    }
}

/// Keeps every report in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Vec<ViolationRecord>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reached(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn records(&self) -> &[ViolationRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ViolationRecord> {
        self.records
    }
}

impl ErrorSink for RecordingSink {
    fn reach_error(&mut self, location: ErrorLocation, detail: &str) {
        self.records.push(ViolationRecord {
            location: location.to_string(),
            message: detail.to_string(),
        });
    }
}

/// Reports through the `log` facade and counts the reports.
#[derive(Debug, Default)]
pub struct LoggingSink {
    reached: usize,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reached(&self) -> usize {
        self.reached
    }
}

impl ErrorSink for LoggingSink {
    fn reach_error(&mut self, location: ErrorLocation, detail: &str) {
        self.reached += 1;
        error!("{} reached: {}", location, detail);
    }
}

/// Forwards every report to two sinks.
pub struct TeeSink<'a, 'b> {
    first: &'a mut dyn ErrorSink,
    second: &'b mut dyn ErrorSink,
}

impl<'a, 'b> TeeSink<'a, 'b> {
    pub fn new(first: &'a mut dyn ErrorSink, second: &'b mut dyn ErrorSink) -> Self {
        TeeSink { first, second }
    }
}

impl ErrorSink for TeeSink<'_, '_> {
    fn reach_error(&mut self, location: ErrorLocation, detail: &str) {
        self.first.reach_error(location, detail);
        self.second.reach_error(location, detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCATION: ErrorLocation = ErrorLocation::new("unit", "ERROR");

    #[test]
    fn recording_sink_keeps_reports_in_order() {
        let mut sink = RecordingSink::new();
        assert!(!sink.is_reached());
        sink.reach_error(LOCATION, "first");
        sink.reach_error(LOCATION, "second");
        let messages: Vec<&str> = sink.records().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(sink.records()[0].location, "unit::ERROR");
    }

    #[test]
    fn tee_sink_reaches_both() {
        let mut recording = RecordingSink::new();
        let mut logging = LoggingSink::new();
        {
            let mut tee = TeeSink::new(&mut recording, &mut logging);
            tee.reach_error(LOCATION, "detail");
        }
        assert!(recording.is_reached());
        assert_eq!(logging.reached(), 1);
    }
}
