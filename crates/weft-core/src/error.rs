//! Crate-level error: either a malformed input rejected by the domain or a
//! collaborator failure reported by the application layer.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Shared by every layer, so the CLI maps one set of categories to exit codes.
pub use crate::domain::ErrorCategory;

pub type WeftResult<T> = Result<T, WeftError>;

#[derive(Debug, Error, Clone)]
pub enum WeftError {
    /// Rendered as the wrapped error; callers add their own prefix.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Broken engine invariant rather than bad input.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WeftError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "Re-run with -vv to capture the failing step".into(),
                "Include that log when reporting the problem".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category(),
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}
