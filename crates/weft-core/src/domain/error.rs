// ============================================================================
// domain/error.rs - WEAVING DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Resolution misses (artifact or member not found) and the idempotence
/// short-circuit are *outcomes*, not errors; see [`crate::domain::WeaveOutcome`].
/// Only malformed inputs end up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid symbolic name '{name}': {reason}")]
    InvalidSymbolicName { name: String, reason: String },

    #[error("Invalid placeholder syntax: {0}")]
    InvalidPlaceholderSyntax(String),

    #[error("Install command template '{pattern}' does not contain the package token '{token}'")]
    InstallTokenMissing { pattern: String, token: String },

    #[error("Dependency descriptor is invalid: {0}")]
    InvalidDescriptor(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidSymbolicName { name, .. } => vec![
                format!("'{}' cannot be used as a component name", name),
                "Names must be non-empty identifiers such as OrdersViewModel".into(),
            ],
            Self::InstallTokenMissing { token, .. } => vec![
                format!("Add '{}' where the package identifier belongs", token),
                "Example: Install-Package %s -ProjectName".into(),
            ],
            Self::InvalidDescriptor(msg) => vec![
                "Check the dependency descriptor file".into(),
                format!("Details: {}", msg),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSymbolicName { .. }
            | Self::InvalidPlaceholderSyntax(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::InstallTokenMissing { .. } | Self::InvalidDescriptor(_) => {
                ErrorCategory::Configuration
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
