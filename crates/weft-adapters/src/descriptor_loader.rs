//! Dependency descriptor loading.
//!
//! Descriptors are TOML or JSON, chosen by file extension:
//!
//! ```toml
//! package = "MvvmCross.Plugin.File"
//! references = ["Cirrious.MvvmCross.Plugins.File.dll"]
//! bootstrap_override = "FilePluginBootstrap.cs"   # optional
//!
//! [[code_dependencies]]
//! project_suffix = ".Core"
//! class = "App"
//! method = "Initialize"
//! code = "Mvx.RegisterType<IFileStore, MvxFileStore>();"
//! ```

use std::{fs, path::Path};

use tracing::{debug, instrument};
use weft_core::{
    application::ApplicationError,
    domain::{DependencyDescriptor, DomainError},
    error::WeftResult,
};

/// Read, parse and validate a descriptor file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_descriptor(path: &Path) -> WeftResult<DependencyDescriptor> {
    let text = fs::read_to_string(path).map_err(|e| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to read descriptor: {e}"),
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let descriptor = match extension.as_deref() {
        Some("toml") => parse_toml(&text)?,
        Some("json") => parse_json(&text)?,
        other => {
            return Err(DomainError::InvalidDescriptor(format!(
                "unsupported descriptor format '{}' (expected .toml or .json)",
                other.unwrap_or("")
            ))
            .into());
        }
    };

    descriptor.validate()?;
    debug!(
        references = descriptor.references.len(),
        code_dependencies = descriptor.code_dependencies.len(),
        "Descriptor loaded"
    );
    Ok(descriptor)
}

pub fn parse_toml(text: &str) -> Result<DependencyDescriptor, DomainError> {
    toml::from_str(text).map_err(|e| DomainError::InvalidDescriptor(e.to_string()))
}

pub fn parse_json(text: &str) -> Result<DependencyDescriptor, DomainError> {
    serde_json::from_str(text).map_err(|e| DomainError::InvalidDescriptor(e.to_string()))
}
