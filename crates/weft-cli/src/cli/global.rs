//! Flags accepted by every subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain text without ANSI colours (also set by NO_COLOR)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Extra configuration file, applied after the user and project files
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format; `auto` picks human on a terminal and plain otherwise
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Auto,
    /// Coloured, with spinners
    Human,
    Plain,
    /// One JSON document per command on stdout
    Json,
}
