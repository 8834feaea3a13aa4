use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tyinfer binary.
#[derive(Parser, Debug)]
#[command(
    name = "tyinfer",
    version,
    about = "Infer generic type arguments and rank overloads for the calls in a scenario file"
)]
pub struct CliArgs {
    /// Scenario file (JSON) declaring classes, methods and calls.
    pub scenario: PathBuf,

    /// Report format.
    #[arg(long, value_enum, ignore_case = true, default_value = "text")]
    pub format: OutputFormat,

    /// Only rank the named calls. May be repeated.
    #[arg(long = "call", value_name = "ID")]
    pub calls: Vec<String>,

    /// Guess from context the way completion does, overriding the file.
    #[arg(long = "bestEffort", alias = "best-effort")]
    pub best_effort: bool,

    /// Do not consult enclosing calls for context, overriding the file.
    #[arg(long = "noOuterContext", alias = "no-outer-context")]
    pub no_outer_context: bool,

    /// Enable color and formatting in text output. Defaults to whether
    /// stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
