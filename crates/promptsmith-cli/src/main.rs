//! `promptsmith` command-line interface.
//!
//! ```bash
//! promptsmith generate face_sheet --state state.json --prune
//! promptsmith sections pose_reference
//! promptsmith kinds
//! promptsmith check --catalog ./templates
//! promptsmith render sheet --vars vars.yaml --library ./library
//! ```
//!
//! Logs go to stderr so documents on stdout can be piped. Set `RUST_LOG`
//! or pass `-v` for more detail.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
