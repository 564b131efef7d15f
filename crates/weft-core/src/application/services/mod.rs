//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a view model" or "set up a plugin".

pub mod code_weaver;
pub mod dependency_service;
pub mod scaffold_service;

pub use code_weaver::CodeWeaver;
pub use dependency_service::{DependencyService, DependencySetup};
pub use scaffold_service::{ScaffoldService, WeaveSettings};
