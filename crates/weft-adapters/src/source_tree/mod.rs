//! Source tree adapters.

pub mod locator;
mod local;
mod memory;

pub use local::{ARTIFACT_EXTENSION, LocalSourceTree, REFERENCE_MANIFEST};
pub use memory::MemorySourceTree;
