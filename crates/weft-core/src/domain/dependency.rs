//! Dependency acquisition: bundled copy vs. package-manager install.
//!
//! ## Strategy table
//!
//! | `use_package_manager` | package declared | Strategy         | Unsatisfiable |
//! |-----------------------|------------------|------------------|---------------|
//! | false                 | no               | `LocalCopy`      | false         |
//! | false                 | yes              | `LocalCopy`      | false         |
//! | true                  | no               | `LocalCopy`      | **true**      |
//! | true                  | yes              | `PackageInstall` | false         |
//!
//! Callers must check [`DependencyResolver::is_unsatisfiable`] before acting on
//! the strategy; the resolver never silently downgrades a conflict on its own.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Reference kind recorded for bundled copies.
pub const LIB_REFERENCE_KIND: &str = "Lib";

/// Appended to the friendly name when no bootstrap override is given.
pub const BOOTSTRAP_SUFFIX: &str = "PluginBootstrap";

/// Extension of generated bootstrap files.
pub const BOOTSTRAP_EXTENSION: &str = ".cs";

/// Explicit project position inside an install command pattern.
pub const PROJECT_SLOT: &str = "{Project}";

/// Per-artifact dependency declaration, read-only to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    /// Package-manager identifier, e.g. `Acme.Lib`.
    #[serde(default)]
    pub package: Option<String>,

    /// Relative paths of bundled files, in copy order.
    #[serde(default)]
    pub references: Vec<String>,

    /// Replaces the default bootstrap file name verbatim.
    #[serde(default)]
    pub bootstrap_override: Option<String>,

    /// Snippets to weave once the dependency is in place.
    #[serde(default)]
    pub code_dependencies: Vec<CodeDependency>,
}

impl DependencyDescriptor {
    /// Non-empty package identifier, if declared.
    pub fn package_identifier(&self) -> Option<&str> {
        self.package.as_deref().filter(|p| !p.is_empty())
    }

    /// Non-empty bootstrap override, if declared.
    pub fn bootstrap_override(&self) -> Option<&str> {
        self.bootstrap_override.as_deref().filter(|b| !b.is_empty())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(empty) = self.references.iter().position(|r| r.trim().is_empty()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "reference #{} is empty",
                empty + 1
            )));
        }
        if let Some(r) = self.references.iter().find(|r| Path::new(r).is_absolute()) {
            return Err(DomainError::InvalidDescriptor(format!(
                "reference '{r}' must be relative"
            )));
        }
        for dep in &self.code_dependencies {
            dep.validate()?;
        }
        Ok(())
    }
}

/// A snippet woven into `class.method` of the project ending in `project_suffix`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDependency {
    pub project_suffix: String,
    pub class: String,
    pub method: String,
    pub code: String,
}

impl CodeDependency {
    fn validate(&self) -> Result<(), DomainError> {
        if self.class.is_empty() {
            return Err(DomainError::InvalidDescriptor(
                "code dependency is missing 'class'".into(),
            ));
        }
        if self.method.is_empty() {
            return Err(DomainError::InvalidDescriptor(format!(
                "code dependency for '{}' is missing 'method'",
                self.class
            )));
        }
        Ok(())
    }
}

/// Package-manager command with a single package token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallCommandTemplate {
    pub pattern: String,
    #[serde(default = "default_token")]
    pub token: String,
}

fn default_token() -> String {
    "%s".into()
}

impl InstallCommandTemplate {
    pub fn new(pattern: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            token: token.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.token.is_empty() || !self.pattern.contains(&self.token) {
            return Err(DomainError::InstallTokenMissing {
                pattern: self.pattern.clone(),
                token: self.token.clone(),
            });
        }
        Ok(())
    }

    /// Substitute the package, then the project.
    ///
    /// The project goes into a `{Project}` slot when the pattern has one and
    /// is appended as a trailing argument otherwise.
    pub fn build(&self, package: &str, project: &str) -> String {
        let command = if self.token.is_empty() {
            self.pattern.clone()
        } else {
            self.pattern.replace(&self.token, package)
        };
        if command.contains(PROJECT_SLOT) {
            command.replace(PROJECT_SLOT, project)
        } else {
            format!("{command} {project}")
        }
    }
}

impl Default for InstallCommandTemplate {
    fn default() -> Self {
        Self::new("Install-Package %s -ProjectName", default_token())
    }
}

/// Global acquisition policy, passed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyPolicy {
    pub use_package_manager: bool,
    /// Record references under the conventional library folder.
    pub include_lib_folder: bool,
    /// Physically copy bundled files into the library folder.
    pub copy_to_lib_folder: bool,
    pub install_command: InstallCommandTemplate,
}

/// Where a resolution applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyContext {
    pub project: String,
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
}

impl DependencyContext {
    pub fn new(
        project: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        destination_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project: project.into(),
            source_dir: source_dir.into(),
            destination_dir: destination_dir.into(),
        }
    }
}

/// Chosen acquisition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    LocalCopy,
    PackageInstall,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalCopy => f.write_str("local-copy"),
            Self::PackageInstall => f.write_str("package-install"),
        }
    }
}

/// One reference to add, as handed to the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceCopy {
    pub kind: String,
    pub destination: PathBuf,
    pub source: PathBuf,
    pub record_in_lib_folder: bool,
    pub copy_physically: bool,
}

/// Ordered copy plan for the `LocalCopy` strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyPlan {
    pub entries: Vec<ReferenceCopy>,
}

impl CopyPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strategy plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    LocalCopy(CopyPlan),
    PackageInstall { command: String },
}

impl Resolution {
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::LocalCopy(_) => Strategy::LocalCopy,
            Self::PackageInstall { .. } => Strategy::PackageInstall,
        }
    }
}

/// Pure strategy decisions over descriptors and policy flags.
pub struct DependencyResolver;

impl DependencyResolver {
    pub fn resolve_strategy(descriptor: &DependencyDescriptor, use_package_manager: bool) -> Strategy {
        match (use_package_manager, descriptor.package_identifier()) {
            (true, Some(_)) => Strategy::PackageInstall,
            _ => Strategy::LocalCopy,
        }
    }

    /// Policy demands a package but none is declared.
    pub fn is_unsatisfiable(descriptor: &DependencyDescriptor, use_package_manager: bool) -> bool {
        use_package_manager && descriptor.package_identifier().is_none()
    }

    pub fn copy_plan(
        descriptor: &DependencyDescriptor,
        source_dir: &Path,
        destination_dir: &Path,
        policy: &DependencyPolicy,
    ) -> CopyPlan {
        let entries = descriptor
            .references
            .iter()
            .map(|reference| ReferenceCopy {
                kind: LIB_REFERENCE_KIND.to_string(),
                destination: destination_dir.join(reference),
                source: source_dir.join(reference),
                record_in_lib_folder: policy.include_lib_folder,
                copy_physically: policy.copy_to_lib_folder,
            })
            .collect();

        CopyPlan { entries }
    }

    /// `None` when no package is declared.
    pub fn install_command(
        descriptor: &DependencyDescriptor,
        template: &InstallCommandTemplate,
        project: &str,
    ) -> Option<String> {
        descriptor
            .package_identifier()
            .map(|package| template.build(package, project))
    }

    pub fn resolve(
        descriptor: &DependencyDescriptor,
        policy: &DependencyPolicy,
        context: &DependencyContext,
    ) -> Resolution {
        let strategy = Self::resolve_strategy(descriptor, policy.use_package_manager);
        let command = Self::install_command(descriptor, &policy.install_command, &context.project);

        match (strategy, command) {
            (Strategy::PackageInstall, Some(command)) => Resolution::PackageInstall { command },
            _ => Resolution::LocalCopy(Self::copy_plan(
                descriptor,
                &context.source_dir,
                &context.destination_dir,
                policy,
            )),
        }
    }

    pub fn bootstrap_file_name(descriptor: &DependencyDescriptor, friendly_name: &str) -> String {
        match descriptor.bootstrap_override() {
            Some(name) => name.to_string(),
            None => format!("{friendly_name}{BOOTSTRAP_SUFFIX}{BOOTSTRAP_EXTENSION}"),
        }
    }
}
