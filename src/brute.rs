// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Exhaustive enumeration of normalized matrices.
//!
//! This walks the whole lattice shell of dimension n^2 and reshapes
//! each vector as a square matrix, keeping those whose columns start
//! with a positive entry and are in decreasing lexicographic order.
//! No elementary or gcd filtering is applied.
//!
//! It is much slower than the row-by-row assembler and is only used
//! to cross-check it on small dimensions.

use crate::arith::SqrtTable;
use crate::matrix::{matrix_has_positive_rows, rows_are_in_lex_order, transpose};
use crate::shell::ShellWalk;
use crate::{Int, Matrix};

/// Returns whether columns are positive and in non-increasing
/// lexicographic order.
pub fn columns_are_normalized(m: &[Vec<Int>]) -> bool {
    let t = transpose(m);
    matrix_has_positive_rows(&t) && rows_are_in_lex_order(&t)
}

/// Enumeration state for a range of weights.
pub struct BruteSweep {
    size: usize,
    end: u64,
    walk: ShellWalk,
}

impl BruteSweep {
    pub fn new(size: usize, start: u64, end: u64) -> Self {
        BruteSweep {
            size,
            end,
            walk: ShellWalk::new(size * size, start),
        }
    }

    pub fn weight(&self) -> u64 {
        self.walk.norm()
    }

    pub fn advance(&mut self, roots: &mut SqrtTable) -> Option<Matrix> {
        let n = self.size;
        while self.weight() <= self.end {
            roots.extend_to(self.weight());
            while let Some(v) = self.walk.advance(roots) {
                let m: Matrix = v.chunks(n).map(|r| r.to_vec()).collect();
                if columns_are_normalized(&m) {
                    return Some(m);
                }
            }
            if self.weight() == self.end {
                break;
            }
            self.walk = ShellWalk::new(n * n, self.weight() + 1);
        }
        None
    }
}

/// All matrices of given size and weight with normalized columns.
pub fn matrices(roots: &mut SqrtTable, size: usize, weight: u64) -> Vec<Matrix> {
    let mut sweep = BruteSweep::new(size, weight, weight);
    std::iter::from_fn(|| sweep.advance(roots)).collect()
}
