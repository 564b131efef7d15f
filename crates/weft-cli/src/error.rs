//! Error handling for the Weft CLI.
//!
//! Every failure maps to a category, and the category fixes the process
//! exit code. Reports carry suggestions the user can act on.

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use weft_core::error::{ErrorCategory as CoreCategory, WeftError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The solution root does not exist or is not a directory.
    #[error("Solution root not found: {path}")]
    RootNotFound { path: PathBuf },

    /// No project in the solution matches.
    #[error("No project matching '{pattern}' under {root}")]
    ProjectNotFound { pattern: String, root: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `weft-core` or an adapter.
    #[error("Weaving failed: {0}")]
    Core(#[from] WeftError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not available (e.g., interactive mode without feature flag).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::RootNotFound { path } => vec![
                format!("'{}' is not a directory", path.display()),
                "Pass the solution directory with --root".into(),
            ],

            Self::ProjectNotFound { pattern, .. } => vec![
                format!("Every project is a top-level directory; none matches '{}'", pattern),
                "Name the project explicitly with --project".into(),
                "Or adjust weave.core_project_suffix in your configuration".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Use 'weft init --force' to recreate a default config".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                "Pass --yes to skip the confirmation prompt".into(),
                format!("Or install with the feature enabled: cargo install weft-cli --features {}", feature),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::RootNotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectNotFound { .. } => ErrorCategory::NotFound,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::UserError,
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Messages of every error in the `source()` chain, outermost first.
    fn causes(&self) -> Vec<String> {
        std::iter::successors(self.source(), |&err| err.source())
            .map(ToString::to_string)
            .collect()
    }

    /// Coloured report for a terminal: headline, causes when `verbose`,
    /// then suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut out = format!(
            "\n{} {}\n\n  {}\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold(),
            self.to_string().red()
        );

        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("\n  {} {}\n", "\u{2192}".dimmed(), cause.dimmed()));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str(&format!(
                "\n{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }
        out
    }

    /// Same report as [`Self::format_colored`] without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nError: {self}\n");

        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("  Caused by: {cause}\n"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for suggestion in &suggestions {
                out.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }
        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        for cause in self.causes() {
            tracing::debug!(%cause, "Caused by");
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Converts foreign error types into [`CliError`] at call-sites with a
/// descriptive context message.
///
/// Concrete impls only; a blanket impl would overlap with both.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, WeftError> {
    /// Core errors already carry their context; the message is dropped.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use weft_core::{application::ApplicationError, domain::DomainError};

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn project_not_found_suggests_flag() {
        let err = CliError::ProjectNotFound {
            pattern: "*.Core".into(),
            root: PathBuf::from("/tmp/sln"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--project")));
    }

    #[test]
    fn core_suggestions_are_forwarded() {
        let err = CliError::Core(
            DomainError::InstallTokenMissing {
                pattern: "Install-Package".into(),
                token: "%s".into(),
            }
            .into(),
        );
        assert!(err.suggestions().iter().any(|s| s.contains("%s")));
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            2
        );
        let validation: WeftError = DomainError::MissingRequiredField { field: "view_model" }.into();
        assert_eq!(CliError::Core(validation).exit_code(), 2);
    }

    #[test]
    fn exit_code_not_found() {
        assert_eq!(
            CliError::RootNotFound {
                path: PathBuf::from("/nope")
            }
            .exit_code(),
            3
        );
        let missing: WeftError = ApplicationError::SnippetUnavailable {
            name: "ViewModel".into(),
            reason: "gone".into(),
        }
        .into();
        assert_eq!(CliError::Core(missing).exit_code(), 3);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::RootNotFound {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "writing config".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading descriptor");
        assert!(matches!(cli, Err(CliError::IoError { ref message, .. }) if message == "reading descriptor"));
    }
}
