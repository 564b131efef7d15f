//! Infrastructure adapters for Weft.
//!
//! This crate implements the ports defined in `weft-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_snippets;
pub mod descriptor_loader;
pub mod snippets;
pub mod source_tree;
pub mod status;

// Re-export commonly used adapters
pub use descriptor_loader::load_descriptor;
pub use snippets::{FileSnippetSource, MemorySnippetSource};
pub use source_tree::{LocalSourceTree, MemorySourceTree};
pub use status::{RecordingStatusSink, TracingStatusSink};
