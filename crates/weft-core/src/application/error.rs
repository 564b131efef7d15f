//! Application layer errors.
//!
//! These errors represent collaborator failures, not resolution misses.
//! A missing artifact or member is a `WeaveOutcome`, never an error.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A snippet template could not be loaded.
    #[error("Snippet '{name}' could not be loaded: {reason}")]
    SnippetUnavailable { name: String, reason: String },

    /// The source tree failed to perform an operation.
    #[error("Source tree operation '{operation}' failed: {reason}")]
    SourceTree { operation: &'static str, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Artifact creation failed.
    #[error("Could not create artifact '{name}': {reason}")]
    ArtifactCreation { name: String, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Source tree lock poisoned")]
    LockPoisoned,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SnippetUnavailable { name, .. } => vec![
                format!("Snippet '{}' is missing or unreadable", name),
                "Check weave.snippet_dir in your configuration".into(),
                "Remove the setting to fall back to the built-in snippets".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the solution root exists".into(),
            ],
            Self::ArtifactCreation { name, .. } => vec![
                format!("'{}' could not be written", name),
                "Check that the target project directory exists".into(),
            ],
            Self::LockPoisoned => vec![
                "A previous operation panicked while holding the source tree".into(),
                "Restart the run".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SnippetUnavailable { .. } => ErrorCategory::NotFound,
            Self::SourceTree { .. } | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::ArtifactCreation { .. } => ErrorCategory::Internal,
            Self::LockPoisoned => ErrorCategory::Internal,
            Self::ValidationFailed(_) => ErrorCategory::Validation,
        }
    }
}
