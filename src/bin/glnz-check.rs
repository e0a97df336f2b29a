// Copyright 2023 Rémy Oudompheng. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Cross-check of the matrix assembler against exhaustive enumeration.
//!
//! Both methods are run on the same weight range, timed, and their
//! sets of accepted matrices are compared.

use std::time::Instant;

use glnz::matrix::transpose;
use glnz::params::{get_option, DEFAULT_DET, DEFAULT_DIM};
use glnz::{Error, Matrix, Method, Preferences, Request, RowFilter, Search, Verbosity};

fn main() {
    let arg = arguments::parse(std::env::args()).unwrap();
    if arg.get::<bool>("help").is_some() {
        eprintln!("Usage: glnz-check [OPTIONS]");
        eprintln!("");
        eprintln!("Options:");
        eprintln!("  --help                    show this help");
        eprintln!("  --dim N                   matrix dimension (default 3)");
        eprintln!("  --det D                   desired determinant (default 1)");
        eprintln!("  --start A --stop B        weights A..B (default 1..10)");
        eprintln!("  --rows primitive|plain    row filter of the assembler");
        return;
    }
    if let Err(e) = run(&arg) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(arg: &arguments::Arguments) -> Result<(), Error> {
    let dim = get_option(arg, "dim")?.unwrap_or(DEFAULT_DIM);
    let det = get_option(arg, "det")?.unwrap_or(DEFAULT_DET);
    let start = get_option(arg, "start")?.unwrap_or(1);
    let stop = get_option(arg, "stop")?.unwrap_or(10);
    let filter: RowFilter = get_option::<String>(arg, "rows")?
        .unwrap_or("primitive".into())
        .parse()?;
    if stop <= start {
        return Err(Error::InvalidWeightRange {
            min: start,
            max: stop,
        });
    }
    let req = Request::new(dim, det, Some(start), Some(stop - 1), 0);
    req.validate()?;
    eprintln!("Testing matrix generation: dim {dim}, start {start}, stop {stop}");

    let mut results = vec![];
    for method in [Method::Engine, Method::Brute] {
        let prefs = Preferences {
            verbosity: Verbosity::Silent,
            rows: filter,
            method,
            should_abort: None,
        };
        let t0 = Instant::now();
        let mut search = Search::new(&req, &prefs)?;
        let mut found: Vec<Matrix> = search.by_ref().collect();
        let elapsed = t0.elapsed().as_secs_f64();
        let stats = search.stats();
        eprintln!("{method:?}: {elapsed:.3}s");
        eprintln!("{} generated", stats.generated);
        eprintln!("{} with det +/-{det}", stats.valid);
        if method == Method::Brute {
            // Exhaustive search does not eliminate degenerate columns.
            found.retain(|m| transpose(m).iter().all(|c| filter.accepts(c)));
            eprintln!("{} with canonical columns", found.len());
        }
        found.sort();
        results.push(found);
    }
    if results[0] != results[1] {
        eprintln!("ERROR: methods disagree");
        for m in results[0].iter().filter(|m| !results[1].contains(m)) {
            eprintln!("only in engine: {m:?}");
        }
        for m in results[1].iter().filter(|m| !results[0].contains(m)) {
            eprintln!("only in brute: {m:?}");
        }
        std::process::exit(1);
    }
    eprintln!("OK: {} matrices", results[0].len());
    Ok(())
}
