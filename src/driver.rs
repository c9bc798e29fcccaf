// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The CLI driver: reads a file, lexes and parses it, picks a strategy,
//! runs it, and reports diagnostics/errors the way `rinha <file>` promises.
//! Distinct error texture from the core on purpose: file IO and environment
//! configuration are "ambient" failures the driver owns, so they get a
//! `snafu`-derived enum instead of the core's hand-rolled `EvalError`.

use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::info;
use snafu::{ResultExt, Snafu};

use crate::diagnostics::Diagnostics;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::sink::StdoutSink;
use crate::strategy::Strategy;

#[derive(Debug, Snafu)]
pub enum DriverError {
    #[snafu(display("Could not read {}: {}", path.display(), source))]
    ReadFile { path: PathBuf, source: io::Error },

    #[snafu(display("{}", message))]
    BadStrategy { message: String },
}

/// Runs the file at `path` under `strategy`. Parse diagnostics carry a
/// `(line, column)` and are printed to stdout exactly as `rinha`'s CLI
/// contract promises; an uncaught interpreter error carries no position
/// (per the design, line/column are available for parse errors only) and is
/// printed to stderr, matching the reference implementation's own
/// uncaught-exception handler. Returns the process exit code (0 success, 1
/// otherwise) — it never panics on a malformed *program*; only a
/// driver-level problem (unreadable file, bad `RINHA_EXEC_STRATEGY`) is a
/// `DriverError`.
pub fn run_file(path: &Path, strategy: Strategy) -> Result<i32, DriverError> {
    info!("loading {}", path.display());
    let source = std::fs::read_to_string(path).context(ReadFileSnafu { path: path.to_path_buf() })?;

    let mut diagnostics = Diagnostics::new();
    let tokens = Lexer::new(&source).tokenize(&mut diagnostics);
    let term = Parser::new(&source, tokens, &mut diagnostics).parse_program();

    if !diagnostics.is_empty() {
        for diagnostic in diagnostics.iter() {
            println!("{}", diagnostic);
        }
    }
    if diagnostics.has_error() {
        return Ok(1);
    }

    let term = term.expect("parser reported no errors but produced no AST");
    match strategy.run(&term, Rc::new(StdoutSink)) {
        Ok(_value) => Ok(0),
        Err(err) => {
            eprintln!("Error: {}", err);
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_a_driver_error() {
        let result = run_file(Path::new("/no/such/file.rinha"), Strategy::TreeWalker);
        assert!(result.is_err());
    }

    #[test]
    fn successful_run_returns_zero() {
        let mut file = tempfile();
        writeln!(file, "1 + 2").unwrap();
        let result = run_file(file.path(), Strategy::TreeWalker).unwrap();
        assert_eq!(result, 0);
    }

    #[test]
    fn syntax_error_returns_one() {
        let mut file = tempfile();
        writeln!(file, "let = 1; x").unwrap();
        let result = run_file(file.path(), Strategy::TreeWalker).unwrap();
        assert_eq!(result, 1);
    }

    #[test]
    fn uncaught_interpreter_error_returns_one() {
        let mut file = tempfile();
        writeln!(file, "x").unwrap();
        let result = run_file(file.path(), Strategy::TreeWalker).unwrap();
        assert_eq!(result, 1);
    }

    // A minimal stand-in for a named temp file, since this crate does not
    // otherwise depend on a temp-file crate.
    struct TempFile {
        path: PathBuf,
    }

    impl TempFile {
        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl io::Write for TempFile {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?
                .write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn tempfile() -> TempFile {
        let mut path = std::env::temp_dir();
        path.push(format!("rinha-driver-test-{}-{}.rinha", std::process::id(), next_id()));
        TempFile { path }
    }

    fn next_id() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}
