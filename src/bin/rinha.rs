// rinha -- an interpreter for the Rinha language
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.

//! `rinha` runs a single source file with one of the two interchangeable
//! evaluation strategies (see `rinha::strategy`), selected by the
//! `RINHA_EXEC_STRATEGY` environment variable.

use std::path::PathBuf;
use std::process::exit;

use structopt::StructOpt;

use rinha::driver;
use rinha::strategy::Strategy;

#[derive(Debug, StructOpt)]
#[structopt(name = "rinha", about = "An interpreter for the Rinha language")]
struct Opt {
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,

    /// The source file to run.
    #[structopt(parse(from_os_str))]
    file: PathBuf,
}

fn main() {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        log::Level::Trace
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level).unwrap();

    let strategy = match Strategy::from_env() {
        Ok(strategy) => strategy,
        Err(message) => {
            eprintln!("{}", message);
            exit(1);
        }
    };

    match driver::run_file(&opt.file, strategy) {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("{}", err);
            exit(1);
        }
    }
}
