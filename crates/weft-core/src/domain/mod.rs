// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Weft.
//!
//! Pure string transformations and decisions. All I/O and every source-tree
//! access is handled through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Total functions**: naming, rendering and strategy selection never fail
//!   on well-typed input
//!
pub mod dependency;
pub mod error;
pub mod naming;
pub mod render;
pub mod request;
pub mod snippet;
pub mod testing;
pub mod weave;

pub use dependency::{
    CodeDependency, CopyPlan, DependencyContext, DependencyDescriptor, DependencyPolicy,
    DependencyResolver, InstallCommandTemplate, ReferenceCopy, Resolution, Strategy,
};
pub use error::{DomainError, ErrorCategory};
pub use naming::{NameDeriver, UNKNOWN_COMMAND, lower_first};
pub use render::SnippetRenderer;
pub use request::{ArtifactRequest, GenerationOutcome, GenerationRequest, OutcomeMessages};
pub use snippet::{PlaceholderSyntax, ReplacementVariable, ReplacementVariables, SnippetTemplate};
pub use testing::{TestAdaptation, TestFramework};
pub use weave::{
    ArtifactHandle, InsertPosition, MemberHandle, WeaveOutcome, WeaveTarget, contains_snippet,
};
