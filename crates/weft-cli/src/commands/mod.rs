//! Command handlers.
//!
//! Each handler translates parsed arguments into core calls and renders the
//! result.  No business logic lives here.

pub mod completions;
pub mod config;
pub mod dependency;
pub mod generate;
pub mod init;
pub mod names;
