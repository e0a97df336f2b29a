// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Output of matrix lists, either as aligned grids
//! or as a Python-style dictionary.

use std::fmt::Write as _;
use std::io;
use std::str::FromStr;

use crate::{Error, Int, Search, Stats};

pub trait Formatter {
    fn start_output(&self) -> String {
        String::new()
    }
    fn end_output(&self) -> String {
        String::new()
    }
    fn start_list(&self) -> String {
        String::new()
    }
    fn end_list(&self) -> String {
        String::new()
    }
    fn matrix(&self, m: &[Vec<Int>]) -> String;
    fn stats(&self, s: &Stats) -> String;
}

/// Human readable output.
pub struct Pretty;

/// A dictionary with a list of matrices and optional statistics.
pub struct List;

impl Formatter for Pretty {
    fn matrix(&self, m: &[Vec<Int>]) -> String {
        let mut out = String::new();
        for row in m {
            out.push_str("| ");
            for x in row {
                let _ = write!(out, "{x:>3} ");
            }
            out.push_str("|\n");
        }
        out.push('\n');
        out
    }

    fn stats(&self, s: &Stats) -> String {
        let mut lines = vec![
            format!("Matrix dimension: {}", s.dim),
            format!("Matrix determinant: {}", s.det),
            format!("Starting weight: {}", s.min_weight),
            format!("Ending weight: {}", s.max_weight),
        ];
        if let Some(c) = s.max_count {
            lines.push(format!("Maximum to list: {c}"));
        }
        lines.push(format!("Total matrices generated: {}", s.generated));
        lines.push(format!("Valid matrices generated: {}", s.valid));
        lines.join("\n") + "\n"
    }
}

impl Formatter for List {
    fn start_output(&self) -> String {
        "{\n".into()
    }
    fn end_output(&self) -> String {
        "}\n".into()
    }
    fn start_list(&self) -> String {
        "'matrix_list': [\n".into()
    }
    fn end_list(&self) -> String {
        "],\n".into()
    }

    fn matrix(&self, m: &[Vec<Int>]) -> String {
        format!("\t{m:?},\n")
    }

    fn stats(&self, s: &Stats) -> String {
        let mut fields = vec![
            format!("'dim': {}", s.dim),
            format!("'det': {}", s.det),
            format!("'min_weight': {}", s.min_weight),
            format!("'max_weight': {}", s.max_weight),
        ];
        if let Some(c) = s.max_count {
            fields.push(format!("'max_count': {c}"));
        }
        fields.push(format!("'generated_matrix_count': {}", s.generated));
        fields.push(format!("'valid_matrix_count': {}", s.valid));
        format!("'stats': {{{}}},\n", fields.join(", "))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Pretty,
    List,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "pretty" | "p" => Ok(Format::Pretty),
            "list" | "l" => Ok(Format::List),
            _ => Err(Error::UnknownFormat(s.into())),
        }
    }
}

impl Format {
    pub fn formatter(self) -> &'static dyn Formatter {
        match self {
            Format::Pretty => &Pretty,
            Format::List => &List,
        }
    }
}

/// Run a search to completion, writing accepted matrices
/// and optionally statistics.
pub fn write_search<W: io::Write>(
    out: &mut W,
    search: &mut Search,
    f: &dyn Formatter,
    with_stats: bool,
) -> io::Result<()> {
    out.write_all(f.start_output().as_bytes())?;
    out.write_all(f.start_list().as_bytes())?;
    for m in search.by_ref() {
        out.write_all(f.matrix(&m).as_bytes())?;
    }
    out.write_all(f.end_list().as_bytes())?;
    if with_stats {
        out.write_all(f.stats(search.stats()).as_bytes())?;
    }
    out.write_all(f.end_output().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Preferences, Request, Verbosity};

    fn run(format: Format, req: &Request, with_stats: bool) -> String {
        let prefs = Preferences {
            verbosity: Verbosity::Silent,
            ..Preferences::default()
        };
        let mut s = Search::new(req, &prefs).unwrap();
        let mut out = vec![];
        write_search(&mut out, &mut s, format.formatter(), with_stats).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_pretty() {
        let req = Request::new(2, 1, Some(7), None, 2);
        assert_eq!(
            run(Format::Pretty, &req, true),
            "|   2   1 |\n|   1   1 |\n\n\
             |   1   1 |\n|   2   1 |\n\n\
             Matrix dimension: 2\n\
             Matrix determinant: 1\n\
             Starting weight: 7\n\
             Ending weight: 7\n\
             Maximum to list: 2\n\
             Total matrices generated: 3\n\
             Valid matrices generated: 2\n"
        );
    }

    #[test]
    fn test_list() {
        let req = Request::new(2, 1, Some(7), None, 0);
        assert_eq!(
            run(Format::List, &req, true),
            "{\n'matrix_list': [\n\
             \t[[2, 1], [1, 1]],\n\
             \t[[1, 1], [2, 1]],\n\
             \t[[2, 1], [-1, -1]],\n\
             \t[[1, 1], [-1, -2]],\n\
             ],\n\
             'stats': {'dim': 2, 'det': 1, 'min_weight': 7, 'max_weight': 7, \
             'generated_matrix_count': 8, 'valid_matrix_count': 4},\n\
             }\n"
        );
        let req = Request::new(2, 1, Some(5), None, 0);
        assert_eq!(run(Format::List, &req, false), "{\n'matrix_list': [\n],\n}\n");
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("p".parse::<Format>(), Ok(Format::Pretty));
        assert_eq!("list".parse::<Format>(), Ok(Format::List));
        assert_eq!(
            "json".parse::<Format>(),
            Err(Error::UnknownFormat("json".into()))
        );
    }
}
