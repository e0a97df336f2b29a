// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Enumeration of integer matrices with a given determinant (usually ±1),
//! by increasing weight (sum of squares of entries).
//!
//! Matrices are normalized to avoid trivial duplicates: each column starts
//! with a positive number, columns are in decreasing lexicographic order,
//! no column is a standard basis vector and (by default) each column
//! has coprime entries. Internally matrices are built row by row, and
//! transposed when reported.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

pub mod arith;
pub mod assemble;
pub mod brute;
pub mod format;
pub mod matrix;
pub mod params;
pub mod rows;
pub mod shell;

pub use assemble::Session;
pub use params::Request;
pub use rows::RowFilter;

/// Matrix entries.
pub type Int = i64;
pub type Row = Vec<Int>;
pub type Matrix = Vec<Row>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent,
    #[default]
    Info,
    Verbose,
    Debug,
}

impl FromStr for Verbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "silent" => Ok(Verbosity::Silent),
            "info" => Ok(Verbosity::Info),
            "verbose" => Ok(Verbosity::Verbose),
            "debug" => Ok(Verbosity::Debug),
            _ => Err(Error::UnknownVerbosity(s.into())),
        }
    }
}

/// Enumeration method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// Row by row assembly from cached canonical rows.
    #[default]
    Engine,
    /// Exhaustive walk over the lattice shell of all entries.
    Brute,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "engine" => Ok(Method::Engine),
            "brute" => Ok(Method::Brute),
            _ => Err(Error::UnknownMethod(s.into())),
        }
    }
}

#[derive(Default)]
pub struct Preferences {
    pub verbosity: Verbosity,
    pub rows: RowFilter,
    pub method: Method,
    // Polled between candidates.
    pub should_abort: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl Preferences {
    pub fn verbose(&self, v: Verbosity) -> bool {
        self.verbosity >= v
    }

    pub fn abort(&self) -> bool {
        self.should_abort.as_ref().map_or(false, |f| f())
    }
}

/// Invalid inputs, detected before enumeration starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    InvalidDimension(usize),
    InvalidDeterminant(Int),
    InvalidWeightRange { min: u64, max: u64 },
    InvalidOption { name: String, value: String },
    UnknownFormat(String),
    UnknownVerbosity(String),
    UnknownRowFilter(String),
    UnknownMethod(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimension(n) => write!(f, "invalid matrix dimension {n}"),
            Error::InvalidDeterminant(d) => {
                write!(f, "invalid determinant {d} (must be positive)")
            }
            Error::InvalidWeightRange { min, max } => {
                write!(f, "invalid weight range {min}..{max}")
            }
            Error::InvalidOption { name, value } => {
                write!(f, "invalid value {value:?} for --{name}")
            }
            Error::UnknownFormat(s) => write!(f, "unknown output format {s:?}"),
            Error::UnknownVerbosity(s) => write!(f, "unknown verbosity {s:?}"),
            Error::UnknownRowFilter(s) => write!(f, "unknown row filter {s:?}"),
            Error::UnknownMethod(s) => write!(f, "unknown method {s:?}"),
        }
    }
}

impl std::error::Error for Error {}

/// Counters for a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    pub dim: usize,
    pub det: Int,
    pub min_weight: u64,
    pub max_weight: u64,
    pub max_count: Option<usize>,
    pub generated: usize,
    pub valid: usize,
}

enum Source {
    Engine(assemble::WeightSweep),
    Brute(brute::BruteSweep),
}

/// A search for normalized matrices with determinant ±det.
///
/// Accepted matrices are yielded in column form (transposed with
/// respect to the assembler's rows).
pub struct Search<'a> {
    prefs: &'a Preferences,
    session: Session,
    source: Source,
    stats: Stats,
    // Counters for the weight being enumerated.
    weight: u64,
    weight_generated: usize,
    weight_valid: usize,
    start: Instant,
    done: bool,
}

impl<'a> Search<'a> {
    pub fn new(req: &Request, prefs: &'a Preferences) -> Result<Self, Error> {
        req.validate()?;
        if prefs.verbose(Verbosity::Info) {
            eprintln!(
                "Enumerating {}x{} matrices with determinant ±{}, weights {}..={} ({:?} rows, {:?})",
                req.dim,
                req.dim,
                req.det,
                req.min_weight,
                req.max_weight,
                prefs.rows,
                prefs.method,
            );
        }
        let source = match prefs.method {
            Method::Engine => Source::Engine(assemble::WeightSweep::new(
                req.dim,
                req.min_weight,
                req.max_weight,
            )),
            Method::Brute => Source::Brute(brute::BruteSweep::new(
                req.dim,
                req.min_weight,
                req.max_weight,
            )),
        };
        Ok(Search {
            prefs,
            session: Session::new(prefs.rows, prefs.verbosity),
            source,
            stats: Stats {
                dim: req.dim,
                det: req.det,
                min_weight: req.min_weight,
                max_weight: req.max_weight,
                max_count: req.max_count,
                generated: 0,
                valid: 0,
            },
            weight: req.min_weight,
            weight_generated: 0,
            weight_valid: 0,
            start: Instant::now(),
            done: false,
        })
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn candidate(&mut self) -> Option<(Matrix, u64)> {
        match &mut self.source {
            Source::Engine(s) => {
                let m = s.advance(self.session.cache_mut())?;
                // The assembler builds rows, report columns.
                Some((matrix::transpose(&m), s.weight()))
            }
            Source::Brute(s) => {
                let m = s.advance(self.session.cache_mut().roots())?;
                Some((m, s.weight()))
            }
        }
    }

    fn report_weight(&self) {
        if self.prefs.verbose(Verbosity::Verbose) {
            eprintln!(
                "Weight {}: {} candidates, {} valid (elapsed {:.3}s)",
                self.weight,
                self.weight_generated,
                self.weight_valid,
                self.start.elapsed().as_secs_f64()
            );
        }
    }

    // Report finished weights up to (excluding) w.
    fn close_weights(&mut self, w: u64) {
        while self.weight < w {
            self.report_weight();
            self.weight += 1;
            self.weight_generated = 0;
            self.weight_valid = 0;
        }
    }

    // All weights up to max_weight (inclusive) are done.
    fn exhausted(&mut self) {
        self.close_weights(self.stats.max_weight);
        self.report_weight();
        self.finish();
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        if self.prefs.verbose(Verbosity::Info) {
            eprintln!(
                "Found {} valid matrices out of {} candidates in {:.3}s",
                self.stats.valid,
                self.stats.generated,
                self.start.elapsed().as_secs_f64()
            );
        }
    }
}

impl<'a> Iterator for Search<'a> {
    type Item = Matrix;

    fn next(&mut self) -> Option<Matrix> {
        if self.done {
            return None;
        }
        if let Some(max) = self.stats.max_count {
            if self.stats.valid >= max {
                self.finish();
                return None;
            }
        }
        loop {
            if self.prefs.abort() {
                if self.prefs.verbose(Verbosity::Info) {
                    eprintln!("Search interrupted at weight {}", self.weight);
                }
                self.finish();
                return None;
            }
            let Some((m, w)) = self.candidate() else {
                self.exhausted();
                return None;
            };
            self.close_weights(w);
            self.stats.generated += 1;
            self.weight_generated += 1;
            if matrix::determinant(&m).abs() == self.stats.det {
                self.stats.valid += 1;
                self.weight_valid += 1;
                return Some(m);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent() -> Preferences {
        Preferences {
            verbosity: Verbosity::Silent,
            ..Preferences::default()
        }
    }

    fn request(dim: usize, min_weight: u64, max_weight: u64) -> Request {
        Request {
            dim,
            det: 1,
            min_weight,
            max_weight,
            max_count: None,
        }
    }

    #[test]
    fn test_search_dim2() {
        let prefs = silent();
        let mut s = Search::new(&request(2, 7, 7), &prefs).unwrap();
        let found: Vec<Matrix> = s.by_ref().collect();
        assert_eq!(
            found,
            vec![
                vec![vec![2, 1], vec![1, 1]],
                vec![vec![1, 1], vec![2, 1]],
                vec![vec![2, 1], vec![-1, -1]],
                vec![vec![1, 1], vec![-1, -2]],
            ]
        );
        assert_eq!(s.stats().generated, 8);
        assert_eq!(s.stats().valid, 4);
        let cache = s.session().cache();
        assert_eq!(cache.filter(), RowFilter::Primitive);
        assert!(cache.scans() > 0);
        // Exhausted searches stay exhausted.
        assert_eq!(s.next(), None);
    }

    #[test]
    fn test_search_det2() {
        let prefs = silent();
        let req = Request {
            det: 2,
            ..request(2, 4, 4)
        };
        let found: Vec<Matrix> = Search::new(&req, &prefs).unwrap().collect();
        // [[1,1],[1,-1]] transposed
        assert_eq!(found, vec![vec![vec![1, 1], vec![1, -1]]]);
    }

    #[test]
    fn test_search_max_count() {
        let prefs = silent();
        let full: Vec<Matrix> = Search::new(&request(3, 7, 12), &prefs).unwrap().collect();
        assert!(full.len() > 5);
        let req = Request {
            max_count: Some(5),
            ..request(3, 7, 12)
        };
        let mut s = Search::new(&req, &prefs).unwrap();
        let head: Vec<Matrix> = s.by_ref().collect();
        assert_eq!(&head[..], &full[..5]);
        assert_eq!(s.stats().valid, 5);
        let mut uncapped = Search::new(&request(3, 7, 12), &prefs).unwrap();
        uncapped.by_ref().count();
        assert!(s.stats().generated < uncapped.stats().generated);
        assert_eq!(s.stats().max_count, Some(5));
    }

    #[test]
    fn test_search_brute() {
        let engine_prefs = silent();
        let brute_prefs = Preferences {
            method: Method::Brute,
            ..silent()
        };
        let req = request(2, 0, 12);
        let engine: Vec<Matrix> = Search::new(&req, &engine_prefs).unwrap().collect();
        let mut brute: Vec<Matrix> = Search::new(&req, &brute_prefs)
            .unwrap()
            .filter(|m| {
                matrix::transpose(m)
                    .iter()
                    .all(|c| RowFilter::Primitive.accepts(c))
            })
            .collect();
        let mut engine_sorted = engine.clone();
        engine_sorted.sort();
        brute.sort();
        assert_eq!(engine_sorted, brute);
    }

    #[test]
    fn test_search_last_weight() {
        let prefs = Preferences {
            verbosity: Verbosity::Verbose,
            ..Preferences::default()
        };
        let req = request(2, u64::MAX - 2, u64::MAX);
        let mut s = Search::new(&req, &prefs).unwrap();
        s.exhausted();
        assert_eq!(s.weight, u64::MAX);
        assert_eq!(s.next(), None);
        assert_eq!(s.stats().generated, 0);
    }

    #[test]
    fn test_search_abort() {
        let prefs = Preferences {
            should_abort: Some(Box::new(|| true)),
            ..silent()
        };
        let mut s = Search::new(&request(3, 7, 12), &prefs).unwrap();
        assert_eq!(s.next(), None);
        assert_eq!(s.stats().generated, 0);
    }

    #[test]
    fn test_search_invalid() {
        let prefs = silent();
        assert_eq!(
            Search::new(&request(0, 1, 1), &prefs).err(),
            Some(Error::InvalidDimension(0))
        );
        assert_eq!(
            Search::new(&request(2, 9, 8), &prefs).err(),
            Some(Error::InvalidWeightRange { min: 9, max: 8 })
        );
        let req = Request {
            det: 0,
            ..request(2, 1, 1)
        };
        assert_eq!(
            Search::new(&req, &prefs).err(),
            Some(Error::InvalidDeterminant(0))
        );
    }

    #[test]
    fn test_parse_prefs() {
        assert_eq!("debug".parse::<Verbosity>(), Ok(Verbosity::Debug));
        assert!(Verbosity::Verbose > Verbosity::Info);
        assert!("loud".parse::<Verbosity>().is_err());
        assert_eq!("brute".parse::<Method>(), Ok(Method::Brute));
        assert_eq!(
            "fast".parse::<Method>(),
            Err(Error::UnknownMethod("fast".into()))
        );
        let e = Error::InvalidOption {
            name: "dim".into(),
            value: "-2".into(),
        };
        assert_eq!(e.to_string(), "invalid value \"-2\" for --dim");
    }
}
