// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{
    errors::{ErrorKind, Result},
    nondet::NondetSource,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the six argument slots `a..f` of the max/min benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::A,
        Position::B,
        Position::C,
        Position::D,
        Position::E,
        Position::F,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::A => "a",
            Position::B => "b",
            Position::C => "c",
            Position::D => "d",
            Position::E => "e",
            Position::F => "f",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Position {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self> {
        Position::ALL
            .iter()
            .copied()
            .find(|position| position.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ErrorKind::InvalidPosition(s.to_string()).into())
    }
}

/// Six signed integers labelled `a..f`. Duplicates and negative values are
/// valid inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sextuple([i32; 6]);

impl Sextuple {
    pub fn new(a: i32, b: i32, c: i32, d: i32, e: i32, f: i32) -> Self {
        Sextuple([a, b, c, d, e, f])
    }

    /// Draws the six values in order `a..f` from `source`.
    pub fn from_source(source: &mut dyn NondetSource) -> Self {
        let mut values = [0; 6];
        for value in values.iter_mut() {
            *value = source.next_int();
        }
        Sextuple(values)
    }

    pub fn get(&self, position: Position) -> i32 {
        self.0[position.index()]
    }

    pub fn values(&self) -> &[i32; 6] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, i32)> + '_ {
        Position::ALL.iter().map(move |&position| (position, self.get(position)))
    }
}

impl From<[i32; 6]> for Sextuple {
    fn from(values: [i32; 6]) -> Self {
        Sextuple(values)
    }
}

impl fmt::Display for Sextuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a},{b},{c},{d},{e},{g}")
    }
}

impl FromStr for Sextuple {
    type Err = crate::errors::Error;

    /// Parses `1,-3,0,-2,-1,-2`. Surrounding parentheses and whitespace are
    /// accepted.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() != 6 {
            bail!(ErrorKind::InvalidSextuple(s.to_string()));
        }
        let mut values = [0; 6];
        for (value, part) in values.iter_mut().zip(parts) {
            *value = part
                .parse()
                .map_err(|_| ErrorKind::InvalidSextuple(s.to_string()))?;
        }
        Ok(Sextuple(values))
    }
}

/// The `(max, min)` pair computed by a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionResult {
    pub max: i32,
    pub min: i32,
}

impl fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "max={}, min={}", self.max, self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_counterexample() {
        let sextuple: Sextuple = "1,-3,0,-2,-1,-2".parse().unwrap();
        assert_eq!(sextuple, Sextuple::new(1, -3, 0, -2, -1, -2));
        assert_eq!(sextuple.to_string(), "1,-3,0,-2,-1,-2");
    }

    #[test]
    fn parses_parenthesised_input_with_spaces() {
        let sextuple: Sextuple = " (5, 5, 5, 5, 5, 5) ".parse().unwrap();
        assert_eq!(sextuple, Sextuple::new(5, 5, 5, 5, 5, 5));
    }

    #[test]
    fn rejects_wrong_arity_and_garbage() {
        assert!("1,2,3".parse::<Sextuple>().is_err());
        assert!("1,2,3,4,5,6,7".parse::<Sextuple>().is_err());
        assert!("1,2,x,4,5,6".parse::<Sextuple>().is_err());
        assert!("1,2,3,4,5,99999999999".parse::<Sextuple>().is_err());
    }

    #[test]
    fn positions_round_trip_through_names() {
        for position in Position::ALL {
            assert_eq!(position.name().parse::<Position>().unwrap(), position);
        }
        assert!("g".parse::<Position>().is_err());
    }
}
