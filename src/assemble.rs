// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Assembly of normalized matrices from canonical rows.
//!
//! A matrix with R rows and weight w is obtained by choosing the
//! weight i < w of its last R-1 rows (a normalized submatrix) and
//! prepending a canonical row of norm w - i which is lexicographically
//! greater than or equal to the first row of the submatrix.
//!
//! Unrolling this recursion, a matrix is described by a chain of
//! cumulative weights 0 = t[0] < t[1] < ... < t[R] = w where the row
//! at depth k (counted from the bottom) has norm t[k+1] - t[k].
//! Chains are enumerated with t[R-1] as the most significant digit
//! (in increasing order), and for each chain, row choices are enumerated
//! with the bottom row as the most significant digit, in cache order.
//! This is exactly the order of the recursive definition.
//!
//! Nothing is materialized except the cached row lists: the state of the
//! enumeration is a chain and one index per row.

use std::rc::Rc;

use crate::matrix::rows_in_lex_order;
use crate::rows::{GoodRows, RowCache, RowFilter};
use crate::shell::LatticeShell;
use crate::{Matrix, Row, Verbosity};

/// Enumeration state for normalized matrices of a given shape and weight.
///
/// The state does not own the row cache: each step borrows it, so that
/// several enumerations can share a session.
pub struct MatrixShell {
    columns: usize,
    // bounds[k] = cumulative weight of rows at depth < k.
    bounds: Vec<u64>,
    // Candidate rows at each depth for the current chain.
    lists: Vec<Rc<[Row]>>,
    // Index of the chosen row at each depth.
    picks: Vec<usize>,
    state: State,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    Running,
    Done,
}

impl MatrixShell {
    pub fn new(columns: usize, rows: usize, weight: u64) -> Self {
        let mut bounds: Vec<u64> = (0..=rows as u64).collect();
        bounds[rows] = weight;
        MatrixShell {
            columns,
            bounds,
            lists: vec![],
            picks: vec![0; rows],
            state: State::Start,
        }
    }

    pub fn rows(&self) -> usize {
        self.picks.len()
    }

    pub fn weight(&self) -> u64 {
        self.bounds[self.rows()]
    }

    /// Produce the next matrix, filling the cache as needed.
    pub fn advance(&mut self, cache: &mut RowCache) -> Option<Matrix> {
        let found = match self.state {
            State::Done => return None,
            State::Start => {
                self.state = State::Running;
                let r = self.rows();
                if r == 0 {
                    // Only the empty matrix has no rows.
                    if self.weight() == 0 {
                        self.state = State::Done;
                        return Some(vec![]);
                    }
                    false
                } else if self.weight() < r as u64 {
                    // Each row has norm at least 1.
                    false
                } else {
                    self.enter_chain(cache)
                }
            }
            State::Running => {
                let top = self.rows() - 1;
                self.picks[top] += 1;
                self.fill_rows(top) || (self.next_chain() && self.enter_chain(cache))
            }
        };
        if !found {
            self.state = State::Done;
            return None;
        }
        Some(self.current())
    }

    // Find the first valid row choice for the current chain,
    // moving to the next chains if there is none.
    fn enter_chain(&mut self, cache: &mut RowCache) -> bool {
        loop {
            if self.load_lists(cache) {
                self.picks.fill(0);
                if self.fill_rows(0) {
                    return true;
                }
            }
            if !self.next_chain() {
                return false;
            }
        }
    }

    // Fetch candidate rows for the current chain, bottom first.
    // Returns false as soon as some depth has no candidate.
    fn load_lists(&mut self, cache: &mut RowCache) -> bool {
        self.lists.clear();
        for k in 0..self.rows() {
            let rows = cache.rows(self.columns, self.bounds[k + 1] - self.bounds[k]);
            if rows.is_empty() {
                return false;
            }
            self.lists.push(rows);
        }
        true
    }

    // Complete row choices from the given depth, starting from the
    // current pick at that depth. Depths below are fixed.
    fn fill_rows(&mut self, mut depth: usize) -> bool {
        let r = self.rows();
        loop {
            let list = &self.lists[depth];
            let mut j = self.picks[depth];
            if depth > 0 {
                let below = &self.lists[depth - 1][self.picks[depth - 1]];
                while j < list.len() && !rows_in_lex_order(&list[j], below) {
                    j += 1;
                }
            }
            if j < list.len() {
                self.picks[depth] = j;
                depth += 1;
                if depth == r {
                    return true;
                }
                self.picks[depth] = 0;
            } else {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
                self.picks[depth] += 1;
            }
        }
    }

    // Next chain of cumulative weights (least significant digit first).
    fn next_chain(&mut self) -> bool {
        let r = self.rows();
        for k in 1..r {
            if self.bounds[k] + 1 < self.bounds[k + 1] {
                self.bounds[k] += 1;
                for j in 1..k {
                    self.bounds[j] = j as u64;
                }
                return true;
            }
        }
        false
    }

    fn current(&self) -> Matrix {
        (0..self.rows())
            .rev()
            .map(|k| self.lists[k][self.picks[k]].clone())
            .collect()
    }
}

/// Enumeration state for square matrices over a range of weights.
pub struct WeightSweep {
    size: usize,
    end: u64,
    shell: MatrixShell,
}

impl WeightSweep {
    pub fn new(size: usize, start: u64, end: u64) -> Self {
        WeightSweep {
            size,
            end,
            shell: MatrixShell::new(size, size, start),
        }
    }

    /// The weight currently being enumerated.
    pub fn weight(&self) -> u64 {
        self.shell.weight()
    }

    pub fn advance(&mut self, cache: &mut RowCache) -> Option<Matrix> {
        loop {
            if self.shell.weight() > self.end {
                return None;
            }
            if let Some(m) = self.shell.advance(cache) {
                return Some(m);
            }
            let w = self.shell.weight();
            if w >= self.end {
                return None;
            }
            self.shell = MatrixShell::new(self.size, self.size, w + 1);
        }
    }
}

/// An enumeration session: owns the row cache and square root table
/// shared by all enumerations performed through it.
pub struct Session {
    cache: RowCache,
}

impl Session {
    pub fn new(filter: RowFilter, verbosity: Verbosity) -> Self {
        Session {
            cache: RowCache::new(filter, verbosity),
        }
    }

    pub fn cache(&self) -> &RowCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RowCache {
        &mut self.cache
    }

    pub fn floor_sqrt(&mut self, n: u64) -> u64 {
        self.cache.roots().floor_sqrt(n)
    }

    /// All integer vectors of given length and squared norm.
    pub fn shell(&mut self, length: usize, norm: u64) -> LatticeShell<'_> {
        LatticeShell::new(self.cache.roots(), length, norm)
    }

    /// Canonical rows of given length and norm.
    pub fn good_rows(&mut self, length: usize, norm: u64) -> GoodRows {
        self.cache.good_rows(length, norm)
    }

    /// Normalized matrices of given shape and weight.
    pub fn matrices(&mut self, columns: usize, rows: usize, weight: u64) -> Matrices<'_> {
        Matrices {
            cache: &mut self.cache,
            shell: MatrixShell::new(columns, rows, weight),
        }
    }

    /// Normalized square matrices with weights in start..=end.
    pub fn all_matrices(&mut self, size: usize, start: u64, end: u64) -> AllMatrices<'_> {
        AllMatrices {
            cache: &mut self.cache,
            sweep: WeightSweep::new(size, start, end),
        }
    }
}

pub struct Matrices<'a> {
    cache: &'a mut RowCache,
    shell: MatrixShell,
}

impl<'a> Iterator for Matrices<'a> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        self.shell.advance(self.cache)
    }
}

pub struct AllMatrices<'a> {
    cache: &'a mut RowCache,
    sweep: WeightSweep,
}

impl<'a> Iterator for AllMatrices<'a> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        self.sweep.advance(self.cache)
    }
}
