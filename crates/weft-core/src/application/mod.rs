//! Application layer for Weft.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (ScaffoldService, DependencyService, CodeWeaver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All naming, rendering and strategy rules live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CodeWeaver, DependencyService,
    DependencySetup, // DTO for dependency processing results
    ScaffoldService, WeaveSettings,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ItemCreated, ItemCreatedHandler, SnippetSource, SourceTree, StatusSink, SubscriptionId,
};

pub use error::ApplicationError;
