use clap::Parser;
use std::path::PathBuf;

use super::commands::Commands;

/// Pick an element in an HTML file and list stable, ranked selectors for it.
///
/// Pattern rules and synthesis bounds come from a YAML file and can be
/// overridden with `SELECTOR_PICKER_*` environment variables.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// YAML file with `synth` bounds and `patterns` overrides
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset: trace, debug, info, warn or error
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log at debug level, including each strategy and rejected candidate
    #[arg(short, long)]
    pub debug: bool,

    /// Write stderr logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// How results are printed on stdout
    #[arg(short, long, default_value = "human")]
    pub output: crate::cli::output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}
