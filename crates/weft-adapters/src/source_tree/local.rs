//! Directory-backed source tree.
//!
//! Layout:
//!
//! ```text
//! <root>/
//! ├── App.Core/                 ← project (top-level directory)
//! │   └── ViewModels/
//! │       └── HomeViewModel.cs  ← artifact "HomeViewModel"
//! ├── App.Core.Tests/
//! │   └── TestHomeViewModel.cs
//! └── weft-references.txt       ← reference manifest
//! ```
//!
//! Projects are visited in name order and artifacts in walk order, so
//! lookups are deterministic.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use weft_core::{
    application::{
        ApplicationError,
        ports::{ItemCreated, ItemCreatedHandler, SourceTree, SubscriptionId},
    },
    domain::{ArtifactHandle, ArtifactRequest, InsertPosition, MemberHandle, ReferenceCopy},
    error::{WeftError, WeftResult},
};

use super::locator;

/// Extension of artifact files.
pub const ARTIFACT_EXTENSION: &str = "cs";

/// Reference manifest written at the tree root.
pub const REFERENCE_MANIFEST: &str = "weft-references.txt";

/// Production source tree over a solution directory.
#[derive(Clone)]
pub struct LocalSourceTree {
    root: PathBuf,
    handlers: Arc<RwLock<Vec<(SubscriptionId, ItemCreatedHandler)>>>,
}

impl LocalSourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            handlers: Arc::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project directory names, sorted.
    pub fn projects(&self) -> WeftResult<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|e| io_error(&self.root, e, "list projects"))?;

        let mut projects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.root, e, "read directory entry"))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    if !name.starts_with('.') {
                        projects.push(name.to_string());
                    }
                }
            }
        }
        projects.sort();
        Ok(projects)
    }

    fn artifact_path(&self, project: &str, name: &str) -> Option<PathBuf> {
        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");
        WalkDir::new(self.root.join(project))
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .find(|e| e.file_type().is_file() && e.file_name().to_str() == Some(file_name.as_str()))
            .map(|e| e.into_path())
    }

    fn resolve(&self, artifact: &ArtifactHandle, operation: &'static str) -> WeftResult<PathBuf> {
        self.artifact_path(&artifact.project, &artifact.name)
            .ok_or_else(|| {
                ApplicationError::SourceTree {
                    operation,
                    reason: format!("{artifact} no longer exists"),
                }
                .into()
            })
    }

    fn read_text(&self, path: &Path) -> WeftResult<String> {
        fs::read_to_string(path).map_err(|e| io_error(path, e, "read artifact"))
    }

    fn write_text(&self, path: &Path, text: &str) -> WeftResult<()> {
        fs::write(path, text).map_err(|e| io_error(path, e, "write artifact"))
    }

    fn notify(&self, event: &ItemCreated) -> WeftResult<()> {
        let handlers = self
            .handlers
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?
            .clone();
        for (_, handler) in &handlers {
            handler(event);
        }
        Ok(())
    }
}

impl SourceTree for LocalSourceTree {
    fn find_artifact_by_name(&self, name: &str) -> WeftResult<Option<ArtifactHandle>> {
        for project in self.projects()? {
            if self.artifact_path(&project, name).is_some() {
                return Ok(Some(ArtifactHandle::new(project, name)));
            }
        }
        Ok(None)
    }

    fn find_artifact_by_suffix(
        &self,
        project_suffix: &str,
        name: &str,
    ) -> WeftResult<Option<ArtifactHandle>> {
        let Some(project) = self
            .projects()?
            .into_iter()
            .find(|p| p.ends_with(project_suffix))
        else {
            return Ok(None);
        };

        Ok(self
            .artifact_path(&project, name)
            .map(|_| ArtifactHandle::new(project, name)))
    }

    fn get_member(
        &self,
        artifact: &ArtifactHandle,
        member: &str,
    ) -> WeftResult<Option<MemberHandle>> {
        let Some(path) = self.artifact_path(&artifact.project, &artifact.name) else {
            return Ok(None);
        };
        let text = self.read_text(&path)?;
        Ok(locator::find_member_body(&text, member).map(|_| MemberHandle::new(artifact.clone(), member)))
    }

    fn read_body(&self, member: &MemberHandle) -> WeftResult<String> {
        let path = self.resolve(&member.artifact, "read_body")?;
        let text = self.read_text(&path)?;
        locator::find_member_body(&text, &member.name)
            .map(|span| span.slice(&text).to_string())
            .ok_or_else(|| member_gone("read_body", member))
    }

    #[instrument(skip_all, fields(member = %member))]
    fn insert_code(
        &self,
        member: &MemberHandle,
        code: &str,
        position: InsertPosition,
    ) -> WeftResult<()> {
        let path = self.resolve(&member.artifact, "insert_code")?;
        let text = self.read_text(&path)?;
        let span = locator::find_member_body(&text, &member.name)
            .ok_or_else(|| member_gone("insert_code", member))?;

        self.write_text(&path, &locator::insert_into_body(&text, span, code, position))?;
        debug!(path = %path.display(), "Code inserted");
        Ok(())
    }

    fn read_artifact(&self, artifact: &ArtifactHandle) -> WeftResult<String> {
        let path = self.resolve(artifact, "read_artifact")?;
        self.read_text(&path)
    }

    fn write_artifact(&self, artifact: &ArtifactHandle, text: &str) -> WeftResult<()> {
        let path = self.resolve(artifact, "write_artifact")?;
        self.write_text(&path, text)
    }

    /// Copies the file when asked to and records it in the manifest.
    /// A line already in the manifest is not written twice.
    fn add_reference(&self, reference: &ReferenceCopy) -> WeftResult<()> {
        if reference.copy_physically {
            if let Some(parent) = reference.destination.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error(parent, e, "create directory"))?;
            }
            fs::copy(&reference.source, &reference.destination)
                .map_err(|e| io_error(&reference.source, e, "copy reference"))?;
        }

        let manifest = self.root.join(REFERENCE_MANIFEST);
        let entry = manifest_line(reference);
        let existing = match fs::read_to_string(&manifest) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(io_error(&manifest, e, "read reference manifest")),
        };
        if existing.lines().any(|line| line == entry) {
            debug!(destination = %reference.destination.display(), "Reference already recorded");
            return Ok(());
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&manifest)
            .map_err(|e| io_error(&manifest, e, "open reference manifest"))?;
        writeln!(file, "{entry}").map_err(|e| io_error(&manifest, e, "write reference manifest"))?;

        debug!(destination = %reference.destination.display(), "Reference recorded");
        Ok(())
    }

    #[instrument(skip_all, fields(count = requests.len()))]
    fn create_artifacts(&self, requests: &[ArtifactRequest]) -> WeftResult<Vec<String>> {
        let mut messages = Vec::new();

        for request in requests {
            let project_dir = self.root.join(&request.project);
            if !project_dir.is_dir() {
                return Err(ApplicationError::ArtifactCreation {
                    name: request.name.clone(),
                    reason: format!("project '{}' does not exist", request.project),
                }
                .into());
            }

            if self.artifact_path(&request.project, &request.name).is_some() {
                messages.push(format!(
                    "{} already exists in project {}.",
                    request.name, request.project
                ));
                continue;
            }

            let path = project_dir.join(format!("{}.{ARTIFACT_EXTENSION}", request.name));
            fs::write(&path, &request.template).map_err(|e| ApplicationError::ArtifactCreation {
                name: request.name.clone(),
                reason: e.to_string(),
            })?;
            info!(path = %path.display(), "Artifact created");

            self.notify(&ItemCreated {
                project: request.project.clone(),
                name: request.name.clone(),
            })?;
            messages.push(format!("{} added to project {}.", request.name, request.project));
        }

        Ok(messages)
    }

    fn subscribe_item_created(&self, handler: ItemCreatedHandler) -> SubscriptionId {
        let id = SubscriptionId::new();
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.push((id, handler));
        }
        id
    }

    fn unsubscribe_item_created(&self, id: SubscriptionId) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers.retain(|(existing, _)| *existing != id);
        }
    }
}

/// `kind<TAB>destination<TAB>source<TAB>lib|-`
fn manifest_line(reference: &ReferenceCopy) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        reference.kind,
        reference.destination.display(),
        reference.source.display(),
        if reference.record_in_lib_folder { "lib" } else { "-" }
    )
}

fn member_gone(operation: &'static str, member: &MemberHandle) -> WeftError {
    ApplicationError::SourceTree {
        operation,
        reason: format!("{member} no longer exists"),
    }
    .into()
}

fn io_error(path: &Path, e: io::Error, operation: &str) -> WeftError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
