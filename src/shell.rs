// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Enumeration of lattice shells: integer vectors of a given length
//! whose squared Euclidean norm is a given integer.
//!
//! Vectors are produced in a fixed order, which is the order
//! of the following recursive definition:
//!
//! ```text
//! shell(0, t) = [[]] if t == 0 else []
//! shell(n, t) = for i in sqrt(t) down to 0:
//!                   for v in shell(n-1, t - i^2):
//!                       yield [i] + v
//!                       yield [-i] + v  (if i > 0)
//! ```
//!
//! The recursion is unrolled into a depth-first walk over magnitude
//! vectors (first coordinate is the outermost loop) followed by a binary
//! counter over the signs of nonzero coordinates, where the first
//! coordinate is the least significant bit and a clear bit means
//! a positive sign.

use crate::arith::SqrtTable;
use crate::{Int, Row};

/// Resumable enumeration state for a lattice shell.
///
/// Each step borrows a square root table covering the target norm.
#[derive(Clone, Debug)]
pub struct ShellWalk {
    // Absolute values of current coordinates.
    mags: Vec<u64>,
    // rems[k] is the norm left for coordinates k..
    // rems[len] must be zero for a valid vector.
    rems: Vec<u64>,
    // Sign of each nonzero coordinate.
    negs: Vec<bool>,
    started: bool,
    done: bool,
}

impl ShellWalk {
    pub fn new(length: usize, norm: u64) -> Self {
        let mut rems = vec![0; length + 1];
        rems[0] = norm;
        ShellWalk {
            mags: vec![0; length],
            rems,
            negs: vec![false; length],
            started: false,
            done: false,
        }
    }

    /// The squared norm of enumerated vectors.
    pub fn norm(&self) -> u64 {
        self.rems[0]
    }

    fn len(&self) -> usize {
        self.mags.len()
    }

    /// Produce the next vector of the shell.
    pub fn advance(&mut self, roots: &SqrtTable) -> Option<Row> {
        if self.done {
            return None;
        }
        let found = if !self.started {
            self.started = true;
            self.search(roots, 0)
        } else if self.flip() {
            true
        } else {
            match self.retreat() {
                Some(k) => self.search(roots, k + 1),
                None => false,
            }
        };
        if !found {
            self.done = true;
            return None;
        }
        Some(self.current())
    }

    // Greedily assign the largest magnitudes to coordinates from..len,
    // backtracking until the norm is exactly consumed.
    fn search(&mut self, roots: &SqrtTable, mut from: usize) -> bool {
        let len = self.len();
        loop {
            for k in from..len {
                let m = roots.get(self.rems[k]);
                self.mags[k] = m;
                self.rems[k + 1] = self.rems[k] - m * m;
            }
            if self.rems[len] == 0 {
                self.negs.fill(false);
                return true;
            }
            match self.retreat() {
                Some(k) => from = k + 1,
                None => return false,
            }
        }
    }

    // Decrement the deepest nonzero magnitude.
    fn retreat(&mut self) -> Option<usize> {
        let k = self.mags.iter().rposition(|&m| m > 0)?;
        self.mags[k] -= 1;
        let m = self.mags[k];
        self.rems[k + 1] = self.rems[k] - m * m;
        Some(k)
    }

    // Next sign pattern for the current magnitudes.
    fn flip(&mut self) -> bool {
        for k in 0..self.len() {
            if self.mags[k] == 0 {
                continue;
            }
            if !self.negs[k] {
                self.negs[k] = true;
                return true;
            }
            self.negs[k] = false;
        }
        false
    }

    fn current(&self) -> Row {
        self.mags
            .iter()
            .zip(&self.negs)
            .map(|(&m, &neg)| if neg { -(m as Int) } else { m as Int })
            .collect()
    }
}

/// Iterator over the lattice shell of vectors of a given length
/// and squared norm.
pub struct LatticeShell<'a> {
    roots: &'a SqrtTable,
    walk: ShellWalk,
}

impl<'a> LatticeShell<'a> {
    /// Prepare an enumeration of the shell, extending the square root
    /// table as needed. The returned iterator only borrows the table.
    pub fn new(roots: &'a mut SqrtTable, length: usize, norm: u64) -> Self {
        roots.extend_to(norm);
        LatticeShell {
            roots,
            walk: ShellWalk::new(length, norm),
        }
    }
}

impl<'a> Iterator for LatticeShell<'a> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.walk.advance(self.roots)
    }
}

/// Squared Euclidean norm of a vector.
pub fn norm(v: &[Int]) -> u64 {
    v.iter().map(|&x| (x * x) as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(length: usize, norm: u64) -> Vec<Row> {
        let mut t = SqrtTable::new();
        LatticeShell::new(&mut t, length, norm).collect()
    }

    #[test]
    fn test_shell_order() {
        assert_eq!(
            shell(2, 5),
            vec![
                vec![2, 1],
                vec![-2, 1],
                vec![2, -1],
                vec![-2, -1],
                vec![1, 2],
                vec![-1, 2],
                vec![1, -2],
                vec![-1, -2],
            ]
        );
        assert_eq!(
            shell(2, 1),
            vec![vec![1, 0], vec![-1, 0], vec![0, 1], vec![0, -1]]
        );
        assert_eq!(
            shell(3, 2),
            vec![
                vec![1, 1, 0],
                vec![-1, 1, 0],
                vec![1, -1, 0],
                vec![-1, -1, 0],
                vec![1, 0, 1],
                vec![-1, 0, 1],
                vec![1, 0, -1],
                vec![-1, 0, -1],
                vec![0, 1, 1],
                vec![0, -1, 1],
                vec![0, 1, -1],
                vec![0, -1, -1],
            ]
        );
    }

    #[test]
    fn test_shell_edge_cases() {
        // Length 0: only the empty vector, only at norm 0.
        assert_eq!(shell(0, 0), vec![Vec::<Int>::new()]);
        assert!(shell(0, 3).is_empty());
        assert_eq!(shell(3, 0), vec![vec![0, 0, 0]]);
        assert_eq!(shell(1, 9), vec![vec![3], vec![-3]]);
        assert!(shell(1, 8).is_empty());
        // 3 and 7 are not sums of 2 squares.
        assert!(shell(2, 3).is_empty());
        assert!(shell(2, 7).is_empty());
    }

    #[test]
    fn test_shell_counts() {
        // Number of representations as sums of 2 and 4 squares.
        let r2 = [1, 4, 4, 0, 4, 8, 0, 0, 4, 4, 8, 0, 0, 8, 0, 0, 4];
        for (n, &r) in r2.iter().enumerate() {
            assert_eq!(shell(2, n as u64).len(), r, "r2({n})");
        }
        // Jacobi: r4(n) = 8 sum(d | n, 4 !| d) d
        for n in 1..40u64 {
            let sigma: u64 = (1..=n).filter(|d| n % d == 0 && d % 4 != 0).sum();
            assert_eq!(shell(4, n).len() as u64, 8 * sigma, "r4({n})");
        }
    }

    #[test]
    fn test_shell_norms() {
        let mut t = SqrtTable::new();
        for n in 0..30 {
            let vs: Vec<Row> = LatticeShell::new(&mut t, 3, n).collect();
            for v in &vs {
                assert_eq!(v.len(), 3);
                assert_eq!(norm(v), n);
            }
            // No duplicates
            let mut sorted = vs.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), vs.len());
        }
    }

    #[test]
    fn test_shell_restartable() {
        let mut t = SqrtTable::new();
        let a: Vec<Row> = LatticeShell::new(&mut t, 3, 11).collect();
        let partial: Vec<Row> = LatticeShell::new(&mut t, 3, 11).take(5).collect();
        let b: Vec<Row> = LatticeShell::new(&mut t, 3, 11).collect();
        assert_eq!(a, b);
        assert_eq!(&a[..5], &partial[..]);
    }
}
