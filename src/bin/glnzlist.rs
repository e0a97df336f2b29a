// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Enumerates integer matrices of determinant ±1 (or ±D), ordered by
//! increasing distance-squared weight.
//!
//! Normalizations and eliminations:
//! - each column starts with a positive number
//! - columns are listed in decreasing lexicographic order
//! - the GCD of each column is 1 (unless --rows plain)
//! - no column is a standard basis vector

use std::io::{self, Write};
use std::time::Instant;

use glnz::format::{write_search, Format};
use glnz::params::{get_option, timeout_from_args};
use glnz::{Error, Method, Preferences, Request, RowFilter, Search, Verbosity};

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.get::<bool>("help").is_some() {
        eprintln!("Usage: glnzlist [OPTIONS]");
        eprintln!("");
        eprintln!("Options:");
        eprintln!("  --help                    show this help");
        eprintln!("  --version                 show version");
        eprintln!("  --dim N                   matrix dimension (default 3)");
        eprintln!("  --det D                   desired determinant of matrix (default 1)");
        eprintln!("  --min-weight A            starting matrix weight (default 2N+1)");
        eprintln!("  --max-weight Z            ending matrix weight (default A)");
        eprintln!("  --max-count C             maximum number of matrices to generate");
        eprintln!("  --stats                   print some stats when done");
        eprintln!("  --format pretty|list      output format");
        eprintln!("  --rows primitive|plain    require coprime column entries or not");
        eprintln!("  --mode engine|brute       enumeration method");
        eprintln!("  --timeout SECS            stop enumeration after SECS seconds");
        eprintln!("  --verbose silent|info|verbose|debug");
        return;
    }
    if arg.get::<bool>("version").is_some() {
        println!("glnzlist, v{}", env!("CARGO_PKG_VERSION"));
        return;
    }
    if let Err(e) = run(&arg) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(arg: &arguments::Arguments) -> Result<(), Error> {
    let req = Request::from_args(arg)?;
    let format: Format = get_option::<String>(arg, "format")?
        .unwrap_or("pretty".into())
        .parse()?;
    let v = get_option::<String>(arg, "verbose")?.unwrap_or("info".into());
    let rows = get_option::<String>(arg, "rows")?.unwrap_or("primitive".into());
    let mode = get_option::<String>(arg, "mode")?.unwrap_or("engine".into());
    let with_stats = get_option::<bool>(arg, "stats")?.unwrap_or(false);

    let mut prefs = Preferences::default();
    prefs.verbosity = v.parse::<Verbosity>()?;
    prefs.rows = rows.parse::<RowFilter>()?;
    prefs.method = mode.parse::<Method>()?;
    if let Some(timeout) = timeout_from_args(arg)? {
        let start = Instant::now();
        prefs.should_abort = Some(Box::new(move || start.elapsed().as_secs_f64() > timeout));
    }

    let mut search = Search::new(&req, &prefs)?;
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let res = write_search(&mut out, &mut search, format.formatter(), with_stats)
        .and_then(|_| out.flush());
    if let Err(e) = res {
        // Typically a closed pipe.
        if prefs.verbose(Verbosity::Info) {
            eprintln!("Output interrupted: {e}");
        }
    }
    Ok(())
}
