//! Weft Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Weft
//! code weaving engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            weft-cli (CLI)               │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ScaffoldService, DependencyService)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Driven: SourceTree, Snippets, Status)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     weft-adapters (Infrastructure)      │
//! │ (LocalSourceTree, FileSnippetSource, ..)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (NameDeriver, SnippetRenderer, Resolver)│
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weft_core::{
//!     application::{ScaffoldService, WeaveSettings},
//!     domain::{ArtifactRequest, GenerationRequest},
//! };
//!
//! // 1. Describe the run
//! let request = GenerationRequest::new("OrdersViewModel")
//!     .with_artifact(ArtifactRequest::new("App.Core", "OrdersViewModel", "ViewModel"))
//!     .initiated_from("HomeViewModel");
//!
//! // 2. Use application service (with injected adapters)
//! let service = ScaffoldService::new(tree, snippets, status, WeaveSettings::default());
//! let outcome = service.generate(&request).unwrap();
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CodeWeaver, DependencyService, DependencySetup, ScaffoldService, WeaveSettings,
        ports::{ItemCreated, ItemCreatedHandler, SnippetSource, SourceTree, StatusSink, SubscriptionId},
    };
    pub use crate::domain::{
        ArtifactHandle, ArtifactRequest, DependencyContext, DependencyDescriptor, DependencyPolicy,
        DependencyResolver, GenerationOutcome, GenerationRequest, InsertPosition, MemberHandle,
        NameDeriver, OutcomeMessages, PlaceholderSyntax, ReferenceCopy, ReplacementVariables,
        SnippetRenderer, SnippetTemplate, Strategy, TestFramework, WeaveOutcome, WeaveTarget,
    };
    pub use crate::error::{WeftError, WeftResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
