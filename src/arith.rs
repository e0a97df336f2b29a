// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Small integer helpers: tabulated square roots and row gcd.

use num_integer::Integer;

use crate::Int;

/// A table of rounded down square roots.
///
/// The table covers all integers in `0..len()` and only grows:
/// the search radius of lattice shells is queried many times
/// for the same small norms, so each lookup is an array access
/// once the table is large enough.
#[derive(Clone, Debug)]
pub struct SqrtTable {
    // roots[n] = floor(sqrt(n))
    roots: Vec<u64>,
    // Largest root present in the table.
    // The table length is always (max + 1)^2.
    max: u64,
}

impl Default for SqrtTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SqrtTable {
    pub fn new() -> Self {
        SqrtTable {
            roots: vec![0],
            max: 0,
        }
    }

    /// Number of integers covered by the table.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Extend the table until it covers n.
    pub fn extend_to(&mut self, n: u64) {
        // Root r is the square root of exactly 2r+1 integers
        // r^2 ..= r^2 + 2r
        while (self.max + 2) * self.max < n {
            self.max += 1;
            let r = self.max;
            self.roots
                .extend(std::iter::repeat(r).take(2 * r as usize + 1));
        }
        debug_assert_eq!(self.roots.len() as u64, (self.max + 1) * (self.max + 1));
    }

    /// Rounded down square root of n, extending the table if needed.
    pub fn floor_sqrt(&mut self, n: u64) -> u64 {
        self.extend_to(n);
        self.roots[n as usize]
    }

    /// Lookup without extension. The caller must have called
    /// `extend_to` with a bound at least n.
    pub(crate) fn get(&self, n: u64) -> u64 {
        debug_assert!((n as usize) < self.roots.len());
        self.roots[n as usize]
    }
}

/// Greatest common divisor of the entries of a row.
/// The gcd of an empty or all-zero row is zero.
pub fn row_gcd(row: &[Int]) -> Int {
    row.iter().fold(0, |acc: Int, &x| acc.gcd(&x)).abs()
}
