//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `weft-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `SourceTree`: Projects, artifacts, members and references
//!   - `SnippetSource`: Snippet template loading
//!   - `StatusSink`: Status-bar style notices
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    ItemCreated, ItemCreatedHandler, SnippetSource, SourceTree, StatusSink, SubscriptionId,
};

#[cfg(test)]
pub use output::MockSourceTree;
