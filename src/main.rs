// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use smtlib_sortcheck::config::Config;
use smtlib_sortcheck::exec::Execution;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    #[arg(long)]
    /// Do not load the core theory implicitly
    no_core: bool,

    #[arg(long, default_value = "theories")]
    /// Directory of theory declarations
    theories: PathBuf,

    #[arg(long, default_value = "logics")]
    /// Directory of logic declarations
    logics: PathBuf,

    #[arg(long, default_value = ".smt2")]
    /// Extension of theory files
    theory_ext: String,

    #[arg(long, default_value = ".smt2")]
    /// Extension of logic files
    logic_ext: String,

    #[arg(required = true)]
    /// Scripts, theories or logics to check
    files: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = Config::default()
        .with_theories_dir(args.theories)
        .with_logics_dir(args.logics)
        .with_theory_ext(args.theory_ext)
        .with_logic_ext(args.logic_ext)
        .with_core(!args.no_core);
    let exec = Execution::new(config);

    let mut failed = false;
    for file in &args.files {
        match exec.check_file(file) {
            Ok(()) => debug!("{} passed", file.display()),
            Err(e) => {
                failed = true;
                println!("{}", e);
            }
        }
    }
    if failed {
        process::exit(1);
    }
}
