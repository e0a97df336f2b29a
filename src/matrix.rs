// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Small dense integer matrices, stored as lists of rows.
//!
//! Determinants are computed exactly by cofactor expansion. This is
//! factorial in the dimension but the matrices of interest are tiny
//! (dimension 5 or less) and no division is ever performed.

use num_traits::Signed;

use crate::rows::row_is_positive;
use crate::shell::norm;
use crate::{Int, Matrix};

/// Returns whether a >= b in lexicographic order.
pub fn rows_in_lex_order(a: &[Int], b: &[Int]) -> bool {
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return false;
        } else if x > y {
            break;
        }
    }
    true
}

/// Returns whether rows are in non-increasing lexicographic order.
pub fn rows_are_in_lex_order(m: &[Vec<Int>]) -> bool {
    m.windows(2).all(|w| rows_in_lex_order(&w[0], &w[1]))
}

pub fn matrix_has_positive_rows(m: &[Vec<Int>]) -> bool {
    m.iter().all(|r| row_is_positive(r))
}

/// Sum of squared norms of rows.
pub fn weight(m: &[Vec<Int>]) -> u64 {
    m.iter().map(|r| norm(r)).sum()
}

pub fn transpose(m: &[Vec<Int>]) -> Matrix {
    let ncols = m.first().map_or(0, |r| r.len());
    (0..ncols)
        .map(|j| m.iter().map(|r| r[j]).collect())
        .collect()
}

/// Exact determinant of a square matrix, by Laplace expansion
/// along the first column. The empty matrix has determinant 1.
pub fn determinant<T: Signed + Copy>(m: &[Vec<T>]) -> T {
    let rows: Vec<usize> = (0..m.len()).collect();
    cofactor(m, &rows, 0)
}

// Determinant of the minor made of the given rows and the
// last rows.len() columns.
fn cofactor<T: Signed + Copy>(m: &[Vec<T>], rows: &[usize], col: usize) -> T {
    match rows.len() {
        0 => T::one(),
        1 => m[rows[0]][col],
        2 => {
            let (a, b) = (&m[rows[0]], &m[rows[1]]);
            a[col] * b[col + 1] - a[col + 1] * b[col]
        }
        n => {
            let mut det = T::zero();
            let mut minor = Vec::with_capacity(n - 1);
            for (idx, &i) in rows.iter().enumerate() {
                let x = m[i][col];
                if x.is_zero() {
                    continue;
                }
                minor.clear();
                minor.extend_from_slice(&rows[..idx]);
                minor.extend_from_slice(&rows[idx + 1..]);
                let c = x * cofactor(m, &minor, col + 1);
                if idx % 2 == 0 {
                    det = det + c;
                } else {
                    det = det - c;
                }
            }
            det
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_lex_order() {
        assert!(rows_in_lex_order(&[2, 1], &[1, 5]));
        assert!(rows_in_lex_order(&[1, 2], &[1, 1]));
        assert!(!rows_in_lex_order(&[1, -2], &[1, -1]));
        assert!(!rows_in_lex_order(&[0, 9], &[1, 0]));
        // Non-strict: equal rows are in order.
        assert!(rows_in_lex_order(&[1, 1], &[1, 1]));
        assert!(rows_in_lex_order(&[], &[]));
        assert!(rows_are_in_lex_order(&[vec![2, 1], vec![1, 1], vec![1, 1]]));
        assert!(!rows_are_in_lex_order(&[vec![1, 1], vec![2, 1]]));
    }

    #[test]
    fn test_lex_order_random() {
        // rows_in_lex_order is exactly >= on vectors.
        let mut rng = rand::thread_rng();
        for _ in 0..2000 {
            let a: Vec<Int> = (0..4).map(|_| rng.gen_range(-2..=2)).collect();
            let b: Vec<Int> = (0..4).map(|_| rng.gen_range(-2..=2)).collect();
            assert_eq!(rows_in_lex_order(&a, &b), a >= b, "{a:?} {b:?}");
        }
    }

    #[test]
    fn test_transpose() {
        let m = vec![vec![1, 2, 3], vec![4, 5, 6]];
        assert_eq!(transpose(&m), vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(transpose(&transpose(&m)), m);
        assert_eq!(transpose(&[]), Matrix::new());
    }

    #[test]
    fn test_determinant_small() {
        assert_eq!(determinant::<Int>(&[]), 1);
        assert_eq!(determinant(&[vec![-7]]), -7);
        assert_eq!(determinant(&[vec![1, 0], vec![0, 1]]), 1);
        assert_eq!(determinant(&[vec![0, 1], vec![1, 0]]), -1);
        assert_eq!(determinant(&[vec![2, 1], vec![1, 1]]), 1);
        assert_eq!(
            determinant(&[vec![2, 0, 1], vec![1, 3, 2], vec![1, 1, 1]]),
            1
        );
        assert_eq!(
            determinant(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]),
            0
        );
        // Vandermonde 1, 2, 3, 4: product of differences = 12
        let v: Vec<Vec<i128>> = (1..=4)
            .map(|x: i128| (0..4).map(|k| x.pow(k)).collect())
            .collect();
        assert_eq!(determinant(&v), 12);
    }

    #[test]
    fn test_determinant_random() {
        let mut rng = rand::thread_rng();
        for n in 1..=5 {
            for _ in 0..50 {
                let a: Matrix = (0..n)
                    .map(|_| (0..n).map(|_| rng.gen_range(-3..=3)).collect())
                    .collect();
                let b: Matrix = (0..n)
                    .map(|_| (0..n).map(|_| rng.gen_range(-3..=3)).collect())
                    .collect();
                let ab: Matrix = (0..n)
                    .map(|i| (0..n).map(|j| (0..n).map(|k| a[i][k] * b[k][j]).sum()).collect())
                    .collect();
                assert_eq!(determinant(&ab), determinant(&a) * determinant(&b));
                assert_eq!(determinant(&transpose(&a)), determinant(&a));
                if n >= 2 {
                    let mut swapped = a.clone();
                    swapped.swap(0, n - 1);
                    assert_eq!(determinant(&swapped), -determinant(&a));
                }
            }
        }
    }

    #[test]
    fn test_weight() {
        assert_eq!(weight(&[vec![2, 1], vec![1, -1]]), 7);
        assert_eq!(weight(&[]), 0);
        assert!(matrix_has_positive_rows(&[vec![0, 1], vec![3, -4]]));
        assert!(!matrix_has_positive_rows(&[vec![0, 1], vec![0, -4]]));
    }
}
