// © 2024, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sources of nondeterministic integers.
//!
//! The benchmark programs never assume anything about the values they receive:
//! a source may produce negative numbers, zero, duplicates or the extrema of the
//! `i32` range. Regression tests use [`FixedSource`] to replay documented
//! counterexamples, property campaigns use [`RandomSource`] and
//! [`BoundarySource`], and exhaustive checks enumerate a [`SextupleGrid`].

use crate::Sextuple;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Supplies one signed integer per call.
pub trait NondetSource {
    fn next_int(&mut self) -> i32;
}

impl<S: NondetSource + ?Sized> NondetSource for &mut S {
    fn next_int(&mut self) -> i32 {
        (**self).next_int()
    }
}

/// Replays a fixed list of literals, starting over once it is exhausted.
#[derive(Debug, Clone)]
pub struct FixedSource {
    values: Vec<i32>,
    cursor: usize,
}

impl FixedSource {
    /// An empty list yields zeros.
    pub fn new<I: IntoIterator<Item = i32>>(values: I) -> Self {
        FixedSource {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    pub fn from_sextuple(sextuple: &Sextuple) -> Self {
        Self::new(sextuple.values().iter().copied())
    }
}

impl NondetSource for FixedSource {
    fn next_int(&mut self) -> i32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Uniformly random `i32`s from a seeded generator, optionally narrowed to a
/// range so that ties become likely.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    range: Option<RangeInclusive<i32>>,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        RandomSource {
            rng: StdRng::seed_from_u64(seed),
            range: None,
        }
    }

    #[must_use]
    pub fn within(mut self, range: RangeInclusive<i32>) -> Self {
        self.range = Some(range);
        self
    }
}

impl NondetSource for RandomSource {
    fn next_int(&mut self) -> i32 {
        match &self.range {
            Some(range) => self.rng.gen_range(range.clone()),
            None => self.rng.gen(),
        }
    }
}

/// Cycles through the values most likely to expose comparison mistakes.
#[derive(Debug, Clone, Default)]
pub struct BoundarySource {
    cursor: usize,
}

impl BoundarySource {
    pub const VALUES: [i32; 9] = [0, 1, -1, i32::MIN, i32::MAX, i32::MIN + 1, i32::MAX - 1, 2, -2];

    pub fn new() -> Self {
        Self::default()
    }
}

impl NondetSource for BoundarySource {
    fn next_int(&mut self) -> i32 {
        let value = Self::VALUES[self.cursor % Self::VALUES.len()];
        self.cursor += 1;
        value
    }
}

/// Draws from `primary`, except that every `period`-th value comes from
/// `secondary`.
#[derive(Debug, Clone)]
pub struct Interleave<A, B> {
    primary: A,
    secondary: B,
    period: usize,
    drawn: usize,
}

impl<A: NondetSource, B: NondetSource> Interleave<A, B> {
    /// A `period` of zero or one draws from `secondary` only.
    pub fn new(primary: A, secondary: B, period: usize) -> Self {
        Interleave {
            primary,
            secondary,
            period: period.max(1),
            drawn: 0,
        }
    }
}

impl<A: NondetSource, B: NondetSource> NondetSource for Interleave<A, B> {
    fn next_int(&mut self) -> i32 {
        self.drawn += 1;
        if self.drawn % self.period == 0 {
            self.secondary.next_int()
        } else {
            self.primary.next_int()
        }
    }
}

/// Enumerates every sextuple over `domain^6` in lexicographic order.
#[derive(Debug, Clone)]
pub struct SextupleGrid {
    start: i32,
    width: u64,
    digits: [u64; 6],
    done: bool,
}

impl SextupleGrid {
    pub fn new(domain: RangeInclusive<i32>) -> Self {
        let (start, end) = domain.into_inner();
        let width = u64::try_from(i64::from(end) - i64::from(start) + 1).unwrap_or(0);
        SextupleGrid {
            start,
            width,
            digits: [0; 6],
            done: width == 0,
        }
    }

    /// Number of sextuples the grid yields in total, saturating at `u64::MAX`.
    pub fn len(&self) -> u64 {
        self.width.saturating_pow(6)
    }

    /// Like [`SextupleGrid::len`], but `None` when the count does not fit a
    /// `u64`.
    pub fn checked_len(&self) -> Option<u64> {
        self.width.checked_pow(6)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0
    }

    fn value(&self, digit: u64) -> i32 {
        // `digit < width`, so the sum stays within `start..=end`.
        (i64::from(self.start) + digit as i64) as i32
    }
}

impl Iterator for SextupleGrid {
    type Item = Sextuple;

    fn next(&mut self) -> Option<Sextuple> {
        if self.done {
            return None;
        }
        let mut values = [0; 6];
        for (value, &digit) in values.iter_mut().zip(self.digits.iter()) {
            *value = self.value(digit);
        }
        // Odometer increment, least significant slot last.
        self.done = true;
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < self.width {
                self.done = false;
                break;
            }
            *digit = 0;
        }
        Some(Sextuple::from(values))
    }
}
