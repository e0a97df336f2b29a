// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Canonical rows and their cache.
//!
//! A row is canonical when its first nonzero entry is positive and it is
//! not elementary (a single entry equal to 1, all others zero).
//! With the primitive filter, the gcd of its entries must also be 1.
//!
//! The matrix assembler requests the rows of a given (length, norm)
//! many times, so the filtered lists are computed once and shared.

use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use crate::arith::{row_gcd, SqrtTable};
use crate::shell::LatticeShell;
use crate::{Error, Int, Row, Verbosity};

/// Which rows are admitted in normalized matrices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowFilter {
    /// Positive, non-elementary rows with coprime entries.
    #[default]
    Primitive,
    /// Positive, non-elementary rows.
    Plain,
}

impl FromStr for RowFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "primitive" => Ok(RowFilter::Primitive),
            "plain" => Ok(RowFilter::Plain),
            _ => Err(Error::UnknownRowFilter(s.into())),
        }
    }
}

impl RowFilter {
    pub fn accepts(&self, row: &[Int]) -> bool {
        if !row_is_positive(row) || row_is_elementary(row) {
            return false;
        }
        match self {
            // A zero gcd (all-zero row) is not primitive.
            RowFilter::Primitive => row_gcd(row) == 1,
            RowFilter::Plain => true,
        }
    }
}

/// Returns whether the first nonzero entry of a row is positive.
/// The all-zero row is considered positive.
pub fn row_is_positive(row: &[Int]) -> bool {
    for &x in row {
        if x < 0 {
            return false;
        } else if x > 0 {
            break;
        }
    }
    true
}

/// Returns whether a row is a standard basis vector: exactly one entry
/// equal to 1 and all other entries zero.
///
/// Entries equal to -1 are not recognized: such rows are already
/// rejected by the positivity test.
pub fn row_is_elementary(row: &[Int]) -> bool {
    let zeros = row.iter().filter(|&&x| x == 0).count();
    let ones = row.iter().filter(|&&x| x == 1).count();
    zeros + 1 == row.len() && ones == 1
}

/// Memoized lists of canonical rows, keyed by (length, norm).
///
/// Entries are filled by draining a whole lattice shell and are never
/// modified or evicted afterwards.
pub struct RowCache {
    roots: SqrtTable,
    filter: RowFilter,
    verbosity: Verbosity,
    rows: HashMap<(usize, u64), Rc<[Row]>>,
    // Number of lattice shells scanned so far.
    scans: usize,
}

impl RowCache {
    pub fn new(filter: RowFilter, verbosity: Verbosity) -> Self {
        RowCache {
            roots: SqrtTable::new(),
            filter,
            verbosity,
            rows: HashMap::new(),
            scans: 0,
        }
    }

    pub fn filter(&self) -> RowFilter {
        self.filter
    }

    /// Number of lattice shells which were enumerated to fill the cache.
    pub fn scans(&self) -> usize {
        self.scans
    }

    /// Number of cached (length, norm) entries.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn roots(&mut self) -> &mut SqrtTable {
        &mut self.roots
    }

    /// The list of canonical rows of given length and norm,
    /// in lattice shell order.
    pub fn rows(&mut self, length: usize, norm: u64) -> Rc<[Row]> {
        if let Some(rows) = self.rows.get(&(length, norm)) {
            return rows.clone();
        }
        let filter = self.filter;
        let mut scanned = 0;
        let rows: Rc<[Row]> = LatticeShell::new(&mut self.roots, length, norm)
            .inspect(|_| scanned += 1)
            .filter(|r| filter.accepts(r))
            .collect();
        self.scans += 1;
        if self.verbosity >= Verbosity::Debug {
            eprintln!(
                "Cached {} rows of length {length} and norm {norm} ({scanned} lattice points)",
                rows.len()
            );
        }
        self.rows.insert((length, norm), rows.clone());
        rows
    }

    /// Iterate over canonical rows of given length and norm.
    /// The iterator does not borrow the cache.
    pub fn good_rows(&mut self, length: usize, norm: u64) -> GoodRows {
        GoodRows {
            rows: self.rows(length, norm),
            idx: 0,
        }
    }
}

/// Iterator over a cached list of canonical rows.
pub struct GoodRows {
    rows: Rc<[Row]>,
    idx: usize,
}

impl Iterator for GoodRows {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let r = self.rows.get(self.idx)?;
        self.idx += 1;
        Some(r.clone())
    }
}
