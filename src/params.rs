// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::str::FromStr;

use crate::{Error, Int};

pub const DEFAULT_DIM: usize = 3;
pub const DEFAULT_DET: Int = 1;

/// Parameters of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub dim: usize,
    /// Accepted matrices have determinant det or -det.
    pub det: Int,
    pub min_weight: u64,
    pub max_weight: u64,
    /// Stop after this number of accepted matrices.
    pub max_count: Option<usize>,
}

impl Default for Request {
    fn default() -> Self {
        Request::new(DEFAULT_DIM, DEFAULT_DET, None, None, 0)
    }
}

impl Request {
    /// Build a request, filling missing weights with defaults.
    /// A zero max_count means no limit.
    pub fn new(
        dim: usize,
        det: Int,
        min_weight: Option<u64>,
        max_weight: Option<u64>,
        max_count: usize,
    ) -> Self {
        let min_weight = min_weight.unwrap_or(default_min_weight(dim));
        Request {
            dim,
            det,
            min_weight,
            max_weight: max_weight.unwrap_or(min_weight),
            max_count: Some(max_count).filter(|&c| c > 0),
        }
    }

    /// Build a request from command line options
    /// (--dim, --det, --min-weight, --max-weight, --max-count).
    pub fn from_args(arg: &arguments::Arguments) -> Result<Self, Error> {
        let req = Request::new(
            get_option(arg, "dim")?.unwrap_or(DEFAULT_DIM),
            get_option(arg, "det")?.unwrap_or(DEFAULT_DET),
            get_option(arg, "min-weight")?,
            get_option(arg, "max-weight")?,
            get_option(arg, "max-count")?.unwrap_or(0),
        );
        req.validate()?;
        Ok(req)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.dim == 0 {
            return Err(Error::InvalidDimension(self.dim));
        }
        if self.det <= 0 {
            return Err(Error::InvalidDeterminant(self.det));
        }
        if self.min_weight > self.max_weight {
            return Err(Error::InvalidWeightRange {
                min: self.min_weight,
                max: self.max_weight,
            });
        }
        Ok(())
    }
}

/// Read the last value of an option. A missing option is None,
/// a value which does not parse is an error.
pub fn get_option<T: FromStr>(
    arg: &arguments::Arguments,
    name: &str,
) -> Result<Option<T>, Error> {
    let Some(value) = arg.get::<String>(name) else {
        return Ok(None);
    };
    match value.parse() {
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(Error::InvalidOption {
            name: name.into(),
            value,
        }),
    }
}

/// Read --timeout as a number of seconds.
pub fn timeout_from_args(arg: &arguments::Arguments) -> Result<Option<f64>, Error> {
    match get_option::<f64>(arg, "timeout")? {
        Some(t) if !(t.is_finite() && t >= 0.0) => Err(Error::InvalidOption {
            name: "timeout".into(),
            value: t.to_string(),
        }),
        t => Ok(t),
    }
}

/// Default starting weight 2n+1, which should give the first
/// non-trivial matrices.
pub fn default_min_weight(dim: usize) -> u64 {
    2 * dim as u64 + 1
}

#[test]
fn test_request_defaults() {
    let r = Request::default();
    assert_eq!(r.dim, 3);
    assert_eq!(r.det, 1);
    assert_eq!((r.min_weight, r.max_weight), (7, 7));
    assert_eq!(r.max_count, None);
    assert!(r.validate().is_ok());

    let r = Request::new(4, 2, Some(3), None, 10);
    assert_eq!((r.min_weight, r.max_weight), (3, 3));
    assert_eq!(r.max_count, Some(10));

    let r = Request::new(2, 1, None, Some(12), 0);
    assert_eq!((r.min_weight, r.max_weight), (5, 12));

    let r = Request::new(2, 1, Some(12), Some(5), 0);
    assert_eq!(
        r.validate(),
        Err(Error::InvalidWeightRange { min: 12, max: 5 })
    );
    assert_eq!(
        Request::new(0, 1, None, None, 0).validate(),
        Err(Error::InvalidDimension(0))
    );
    assert_eq!(
        Request::new(2, -1, None, None, 0).validate(),
        Err(Error::InvalidDeterminant(-1))
    );
}

#[cfg(test)]
fn parse_args(args: &[&str]) -> arguments::Arguments {
    let argv = std::iter::once("glnzlist").chain(args.iter().copied());
    arguments::parse(argv.map(String::from)).unwrap()
}

#[test]
fn test_request_from_args() {
    let r = Request::from_args(&parse_args(&[])).unwrap();
    assert_eq!(r, Request::default());

    let arg = parse_args(&[
        "--dim",
        "2",
        "--det",
        "2",
        "--max-weight",
        "9",
        "--max-count",
        "4",
    ]);
    let r = Request::from_args(&arg).unwrap();
    assert_eq!(r, Request::new(2, 2, Some(5), Some(9), 4));

    // Malformed values are errors, not defaults.
    let bad = |args: &[&str], name: &str, value: &str| {
        assert_eq!(
            Request::from_args(&parse_args(args)),
            Err(Error::InvalidOption {
                name: name.into(),
                value: value.into()
            })
        );
    };
    bad(&["--dim", "-2", "--max-count", "1"], "dim", "-2");
    bad(&["--dim", "abc"], "dim", "abc");
    bad(&["--dim", "2", "--min-weight", "-3"], "min-weight", "-3");
    bad(&["--det", "1.5"], "det", "1.5");
    bad(&["--max-count", "-1"], "max-count", "-1");
    // A bare option reads as "true".
    bad(&["--max-weight"], "max-weight", "true");

    // Well-formed but invalid values fail validation.
    assert_eq!(
        Request::from_args(&parse_args(&["--dim", "0"])),
        Err(Error::InvalidDimension(0))
    );
    assert_eq!(
        Request::from_args(&parse_args(&["--det", "-1"])),
        Err(Error::InvalidDeterminant(-1))
    );
}

#[test]
fn test_options() {
    let arg = parse_args(&[
        "--stats",
        "false",
        "--verbose",
        "debug",
        "--timeout",
        "2.5",
    ]);
    assert_eq!(get_option::<bool>(&arg, "stats"), Ok(Some(false)));
    assert_eq!(get_option::<bool>(&parse_args(&["--stats"]), "stats"), Ok(Some(true)));
    assert_eq!(get_option::<bool>(&parse_args(&[]), "stats"), Ok(None));
    assert_eq!(
        get_option::<String>(&arg, "verbose"),
        Ok(Some("debug".to_string()))
    );
    assert_eq!(timeout_from_args(&arg), Ok(Some(2.5)));
    assert_eq!(timeout_from_args(&parse_args(&[])), Ok(None));
    for t in ["soon", "-1", "nan", "inf"] {
        assert!(timeout_from_args(&parse_args(&["--timeout", t])).is_err());
    }
}
