//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Culture-aware date conversion.
///
/// Records are written to stdout in request order, one line each. Logs go
/// to stderr.
#[derive(Debug, Parser)]
#[command(name = "cultureconv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `<culture>.toml` definitions.
    #[arg(long, global = true, value_name = "DIR")]
    pub data: Option<PathBuf>,

    /// Log pipeline progress at debug level.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file. Required to exist when given.
    #[arg(long, global = true, env = "CULTURECONV_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Stop at the first failed request and exit with status 1.
    #[arg(long, global = true)]
    pub fail_fast: bool,

    /// Print Prometheus metrics to stderr on exit.
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert inputs under one culture.
    Convert {
        /// Culture id, e.g. `gregorian` or `en-US`.
        culture: String,

        /// Dates, datetimes or Julian Day Numbers.
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output format: `jdn`, `json` or a strftime pattern.
        #[arg(long, short = 'f')]
        format: Option<String>,
    },

    /// Convert newline-delimited JSON records read from stdin.
    ///
    /// Each line is `{"culture": ..., "input": ..., "format"?: ...}`.
    /// A blank line ends the stream.
    Pipe,
}
