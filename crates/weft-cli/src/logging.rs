//! Tracing subscriber initialisation.
//!
//! Only the CLI crate calls [`init_logging`]; `weft-core` and
//! `weft-adapters` only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)  | Filter level |
//! |----------|--------------|
//! | (none)   | WARN         |
//! | `-v`     | INFO         |
//! | `-vv`    | DEBUG        |
//! | `-vvv`   | TRACE        |
//! | `--quiet`| ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.  With
//! `--output-format json` events are written as JSON lines.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{GlobalArgs, OutputFormat};

/// Crates whose events pass the verbosity filter.
const LOG_TARGETS: [&str; 4] = ["weft", "weft_cli", "weft_core", "weft_adapters"];

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(derive_level(args))));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let (json_layer, text_layer) = if args.output_format == OutputFormat::Json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr);
        (Some(layer), None)
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(use_ansi)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Translate the verbosity counter + quiet flag to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_directives(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
