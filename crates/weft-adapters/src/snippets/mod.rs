//! Snippet source adapters.

mod file;
mod memory;

pub use file::{FileSnippetSource, SNIPPET_EXTENSION};
pub use memory::MemorySnippetSource;
