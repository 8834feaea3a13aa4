#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use tyinfer::cli::args::CliArgs;
use tyinfer::cli::driver;

fn main() -> Result<()> {
    // Initialize tracing if TYINFER_LOG or RUST_LOG is set.
    // Supports TYINFER_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    tyinfer::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let pretty = args
        .pretty
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    if !pretty {
        colored::control::set_override(false);
    }

    let output = driver::run(&args, pretty)?;
    print!("{output}");
    Ok(())
}
