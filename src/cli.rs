//! Command-line interface for the Fleaux transpiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fleaux::logging::LogFormat;

#[derive(Parser)]
#[command(name = "fleaux")]
#[command(about = "Fleaux pipeline language transpiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Transpile a program and its imports to Python modules
    Compile {
        /// Root source file
        file: PathBuf,

        /// Directory to write the generated `.py` files to (stdout if omitted)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Transpile a program and evaluate it with the reference interpreter
    Run {
        /// Root source file
        file: PathBuf,

        /// Arguments passed through to `GetArgs`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
