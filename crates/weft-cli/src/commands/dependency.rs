//! `weft dependency`: resolve how a plugin dependency is acquired.
//!
//! Package-manager commands are printed, never run.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use weft_adapters::{LocalSourceTree, load_descriptor};
use weft_core::{
    application::{DependencyService, DependencySetup},
    domain::DependencyContext,
};

use crate::{
    cli::DependencyArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Library folder under the solution root, used when `--destination-dir`
/// is not given.
const DEFAULT_LIB_DIR: &str = "lib";

#[derive(Debug, Serialize)]
struct DependencyReport<'a> {
    friendly_name: &'a str,
    #[serde(flatten)]
    setup: &'a DependencySetup,
    code_changes: &'a [String],
}

#[instrument(skip_all, fields(descriptor = %args.descriptor.display(), project = %args.project))]
pub fn execute(args: DependencyArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.root.is_dir() {
        return Err(CliError::RootNotFound { path: args.root });
    }

    let descriptor = load_descriptor(&args.descriptor)?;
    let friendly_name = match args.friendly_name {
        Some(name) => name,
        None => default_friendly_name(&args.descriptor)?,
    };

    let policy = config.dependency_policy(args.use_package_manager);
    let context = DependencyContext::new(
        args.project.as_str(),
        args.source_dir
            .unwrap_or_else(|| descriptor_dir(&args.descriptor)),
        args.destination_dir
            .unwrap_or_else(|| args.root.join(DEFAULT_LIB_DIR)),
    );

    let service = DependencyService::new(Box::new(LocalSourceTree::new(&args.root)));
    let setup = service.process(&descriptor, &policy, &context, &friendly_name)?;

    let code_changes = if args.apply_code {
        service
            .apply_code_dependencies(&descriptor, config.weave.insert_position)?
            .into_vec()
    } else {
        Vec::new()
    };
    info!(strategy = %setup.strategy, code_changes = code_changes.len(), "Dependency processed");

    if output.is_json() {
        return output.json(&DependencyReport {
            friendly_name: &friendly_name,
            setup: &setup,
            code_changes: &code_changes,
        });
    }

    output.header(&format!("Dependency {friendly_name}"))?;
    output.print(&format!("  Strategy:       {}", setup.strategy))?;
    output.print(&format!("  Bootstrap file: {}", setup.bootstrap_file))?;

    if setup.unsatisfiable {
        output.warning(
            "The package manager is preferred but the descriptor declares no package; \
             falling back to the bundled references.",
        )?;
    }

    if let Some(command) = &setup.install_command {
        output.info("Run this in the package manager console:")?;
        output.print(&format!("  {command}"))?;
    }

    for reference in &setup.references_added {
        output.print(&format!(
            "  {} {} -> {}",
            reference.kind,
            reference.source.display(),
            reference.destination.display()
        ))?;
    }
    if !setup.references_added.is_empty() {
        output.success(&format!("{} reference(s) added.", setup.references_added.len()))?;
    }

    for message in &code_changes {
        output.print(message)?;
    }

    Ok(())
}

/// Descriptor file stem, e.g. `Acme` for `plugins/Acme.toml`.
fn default_friendly_name(descriptor: &Path) -> CliResult<String> {
    descriptor
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!(
                "cannot derive a friendly name from '{}'; pass --friendly-name",
                descriptor.display()
            ),
            source: None,
        })
}

/// Bundled references sit next to their descriptor.
fn descriptor_dir(descriptor: &Path) -> PathBuf {
    descriptor
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
