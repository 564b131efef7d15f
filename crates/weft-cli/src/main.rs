//! # Weft CLI
//!
//! Weaves MVVM view models, views and navigation wiring into an existing
//! solution tree.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults + file + env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  0   | Success                 |
//! |  1   | Internal / system error |
//! |  2   | User / input error      |
//! |  3   | Resource not found      |
//! |  4   | Configuration error     |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;

fn main() -> ExitCode {
    // .env is optional; real environment variables win.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here, with exit code 0.
            let _ = e.print();
            return ExitCode::from(e.exit_code().clamp(0, 255) as u8);
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(e, cli.global.verbose > 0),
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);
    let verbose = cli.global.verbose > 0;

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    match run(cli, config, output) {
        Ok(()) => {
            info!("Weft completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        Commands::Generate(cmd) => commands::generate::execute(cmd, cli.global, config, output),
        Commands::Names(cmd) => commands::names::execute(cmd, config, output),
        Commands::Dependency(cmd) => commands::dependency::execute(cmd, config, output),
        Commands::Init(cmd) => commands::init::execute(cmd, output),
        Commands::Completions(cmd) => commands::completions::execute(cmd),
        Commands::Config(cmd) => commands::config::execute(cmd, config, output),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
