//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use weft_adapters::TracingStatusSink;
use weft_core::application::ports::StatusSink;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    ///
    /// The `--output-format` flag wins over `output.format` unless it is
    /// left at `auto`.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let requested = match args.output_format {
            OutputFormat::Auto => parse_format(&config.output.format),
            explicit => explicit,
        };

        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if requested == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            requested
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Error indicator: `✗ <msg>`.  Not suppressed in quiet mode.
    pub fn error(&self, msg: &str) -> io::Result<()> {
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document on stdout.  Written even in quiet mode, since
    /// JSON output is asked for explicitly.
    pub fn json<T: Serialize>(&self, value: &T) -> CliResult<()> {
        let text = serde_json::to_string_pretty(value).map_err(|e| CliError::IoError {
            message: "failed to serialise JSON output".into(),
            source: io::Error::other(e),
        })?;
        self.term.write_line(&text)?;
        Ok(())
    }

    /// Status sink for a long-running operation.
    ///
    /// Shows a spinner only for human output on a terminal; notices are
    /// always forwarded to the log.
    pub fn status_sink(&self) -> SpinnerStatusSink {
        let bar = if self.quiet || self.resolved_format != OutputFormat::Human {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        };
        SpinnerStatusSink {
            bar,
            log: TracingStatusSink,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    /// `true` when commands should emit a JSON document instead of lines.
    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }
}

fn parse_format(value: &str) -> OutputFormat {
    match value.to_ascii_lowercase().as_str() {
        "human" => OutputFormat::Human,
        "plain" => OutputFormat::Plain,
        "json" => OutputFormat::Json,
        _ => OutputFormat::Auto,
    }
}

/// Status sink driving an `indicatif` spinner.
///
/// Clones share the same spinner; call [`SpinnerStatusSink::finish`] on one
/// of them once the run is over.
#[derive(Clone)]
pub struct SpinnerStatusSink {
    bar: ProgressBar,
    log: TracingStatusSink,
}

impl SpinnerStatusSink {
    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl StatusSink for SpinnerStatusSink {
    fn write_status(&self, text: &str) {
        self.log.write_status(text);
        self.bar.set_message(text.to_string());
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
