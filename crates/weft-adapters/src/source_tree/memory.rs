//! In-memory source tree adapter for testing.

use std::sync::{Arc, RwLock};

use tracing::debug;
use weft_core::{
    application::{
        ApplicationError,
        ports::{ItemCreated, ItemCreatedHandler, SourceTree, SubscriptionId},
    },
    domain::{ArtifactHandle, ArtifactRequest, InsertPosition, MemberHandle, ReferenceCopy},
    error::WeftResult,
};

use super::locator;

/// In-memory project tree for testing.
///
/// Projects and artifacts keep insertion order, so "first match" lookups are
/// deterministic.
#[derive(Clone, Default)]
pub struct MemorySourceTree {
    inner: Arc<RwLock<MemorySourceTreeInner>>,
}

#[derive(Default)]
struct MemorySourceTreeInner {
    projects: Vec<MemoryProject>,
    references: Vec<ReferenceCopy>,
    handlers: Vec<(SubscriptionId, ItemCreatedHandler)>,
}

struct MemoryProject {
    name: String,
    artifacts: Vec<(String, String)>,
}

impl MemorySourceTreeInner {
    fn project(&self, name: &str) -> Option<&MemoryProject> {
        self.projects.iter().find(|p| p.name == name)
    }

    fn project_mut(&mut self, name: &str) -> Option<&mut MemoryProject> {
        self.projects.iter_mut().find(|p| p.name == name)
    }

    fn text(&self, artifact: &ArtifactHandle) -> Option<&String> {
        self.project(&artifact.project)?
            .artifacts
            .iter()
            .find(|(name, _)| *name == artifact.name)
            .map(|(_, text)| text)
    }

    fn text_mut(&mut self, artifact: &ArtifactHandle) -> Option<&mut String> {
        self.project_mut(&artifact.project)?
            .artifacts
            .iter_mut()
            .find(|(name, _)| *name == artifact.name)
            .map(|(_, text)| text)
    }
}

impl MemorySourceTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty project (builder style).
    pub fn with_project(self, name: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let name = name.into();
            if inner.project(&name).is_none() {
                inner.projects.push(MemoryProject {
                    name,
                    artifacts: Vec::new(),
                });
            }
        }
        self
    }

    /// Add or replace an artifact, creating its project if needed (builder style).
    pub fn with_artifact(
        self,
        project: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        let project = project.into();
        let this = self.with_project(project.clone());
        if let Ok(mut inner) = this.inner.write() {
            let name = name.into();
            let text = text.into();
            if let Some(p) = inner.project_mut(&project) {
                match p.artifacts.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, existing)) => *existing = text,
                    None => p.artifacts.push((name, text)),
                }
            }
        }
        this
    }

    /// Current text of the first artifact with this name (testing helper).
    pub fn artifact_text(&self, name: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .projects
            .iter()
            .flat_map(|p| p.artifacts.iter())
            .find(|(n, _)| n == name)
            .map(|(_, text)| text.clone())
    }

    /// References recorded so far, in order.
    pub fn references(&self) -> Vec<ReferenceCopy> {
        self.inner
            .read()
            .map(|inner| inner.references.clone())
            .unwrap_or_default()
    }

    /// Number of live item-created subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().map(|inner| inner.handlers.len()).unwrap_or(0)
    }

    fn read<T>(&self, f: impl FnOnce(&MemorySourceTreeInner) -> T) -> WeftResult<T> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(f(&inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut MemorySourceTreeInner) -> T) -> WeftResult<T> {
        let mut inner = self.inner.write().map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(f(&mut inner))
    }
}

fn missing(operation: &'static str, what: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::SourceTree {
        operation,
        reason: format!("{what} no longer exists"),
    }
}

impl SourceTree for MemorySourceTree {
    fn find_artifact_by_name(&self, name: &str) -> WeftResult<Option<ArtifactHandle>> {
        self.read(|inner| {
            inner.projects.iter().find_map(|p| {
                p.artifacts
                    .iter()
                    .any(|(n, _)| n == name)
                    .then(|| ArtifactHandle::new(p.name.as_str(), name))
            })
        })
    }

    fn find_artifact_by_suffix(
        &self,
        project_suffix: &str,
        name: &str,
    ) -> WeftResult<Option<ArtifactHandle>> {
        self.read(|inner| -> Option<ArtifactHandle> {
            let project = inner.projects.iter().find(|p| p.name.ends_with(project_suffix))?;
            project
                .artifacts
                .iter()
                .any(|(n, _)| n == name)
                .then(|| ArtifactHandle::new(project.name.as_str(), name))
        })
    }

    fn get_member(
        &self,
        artifact: &ArtifactHandle,
        member: &str,
    ) -> WeftResult<Option<MemberHandle>> {
        self.read(|inner| -> Option<MemberHandle> {
            let text = inner.text(artifact)?;
            locator::find_member_body(text, member)
                .map(|_| MemberHandle::new(artifact.clone(), member))
        })
    }

    fn read_body(&self, member: &MemberHandle) -> WeftResult<String> {
        self.read(|inner| -> Option<String> {
            let text = inner.text(&member.artifact)?;
            locator::find_member_body(text, &member.name).map(|span| span.slice(text).to_string())
        })?
        .ok_or_else(|| missing("read_body", member).into())
    }

    fn insert_code(
        &self,
        member: &MemberHandle,
        code: &str,
        position: InsertPosition,
    ) -> WeftResult<()> {
        self.write(|inner| -> Option<()> {
            let text = inner.text_mut(&member.artifact)?;
            let span = locator::find_member_body(text, &member.name)?;
            *text = locator::insert_into_body(text, span, code, position);
            Some(())
        })?
        .ok_or_else(|| missing("insert_code", member).into())
    }

    fn read_artifact(&self, artifact: &ArtifactHandle) -> WeftResult<String> {
        self.read(|inner| inner.text(artifact).cloned())?
            .ok_or_else(|| missing("read_artifact", artifact).into())
    }

    fn write_artifact(&self, artifact: &ArtifactHandle, text: &str) -> WeftResult<()> {
        self.write(|inner| {
            inner
                .text_mut(artifact)
                .map(|existing| *existing = text.to_string())
        })?
        .ok_or_else(|| missing("write_artifact", artifact).into())
    }

    fn add_reference(&self, reference: &ReferenceCopy) -> WeftResult<()> {
        self.write(|inner| {
            if !inner.references.contains(reference) {
                inner.references.push(reference.clone());
            }
        })
    }

    fn create_artifacts(&self, requests: &[ArtifactRequest]) -> WeftResult<Vec<String>> {
        let mut messages = Vec::new();

        for request in requests {
            let created = self.write(|inner| -> Result<_, ApplicationError> {
                let project = inner.project_mut(&request.project).ok_or_else(|| {
                    ApplicationError::ArtifactCreation {
                        name: request.name.clone(),
                        reason: format!("project '{}' does not exist", request.project),
                    }
                })?;
                if project.artifacts.iter().any(|(n, _)| *n == request.name) {
                    return Ok(None);
                }
                project
                    .artifacts
                    .push((request.name.clone(), request.template.clone()));
                Ok(Some(inner.handlers.clone()))
            })??;

            // Handlers run without the lock held.
            let Some(handlers) = created else {
                debug!(artifact = %request.name, "Artifact already exists");
                messages.push(format!(
                    "{} already exists in project {}.",
                    request.name, request.project
                ));
                continue;
            };

            let event = ItemCreated {
                project: request.project.clone(),
                name: request.name.clone(),
            };
            for (_, handler) in &handlers {
                handler(&event);
            }
            messages.push(format!("{} added to project {}.", request.name, request.project));
        }

        Ok(messages)
    }

    fn subscribe_item_created(&self, handler: ItemCreatedHandler) -> SubscriptionId {
        let id = SubscriptionId::new();
        if let Ok(mut inner) = self.inner.write() {
            inner.handlers.push((id, handler));
        }
        id
    }

    fn unsubscribe_item_created(&self, id: SubscriptionId) {
        if let Ok(mut inner) = self.inner.write() {
            inner.handlers.retain(|(existing, _)| *existing != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const HOME: &str = "public class HomeViewModel\n{\n    public void InitializeCommands()\n    {\n    }\n}\n";

    fn tree() -> MemorySourceTree {
        MemorySourceTree::new()
            .with_artifact("App.Core", "HomeViewModel", HOME)
            .with_project("App.Core.Tests")
    }

    #[test]
    fn lookups_by_name_and_suffix() {
        let tree = tree().with_artifact("App.Core.Tests", "TestHome", "class TestHome {}");

        assert_eq!(
            tree.find_artifact_by_name("HomeViewModel").unwrap(),
            Some(ArtifactHandle::new("App.Core", "HomeViewModel"))
        );
        assert_eq!(tree.find_artifact_by_name("Nope").unwrap(), None);
        assert_eq!(
            tree.find_artifact_by_suffix(".Tests", "TestHome").unwrap(),
            Some(ArtifactHandle::new("App.Core.Tests", "TestHome"))
        );
        assert_eq!(tree.find_artifact_by_suffix(".Tests", "HomeViewModel").unwrap(), None);
    }

    #[test]
    fn member_insert_and_read_back() {
        let tree = tree();
        let artifact = tree.find_artifact_by_name("HomeViewModel").unwrap().unwrap();
        let member = tree.get_member(&artifact, "InitializeCommands").unwrap().unwrap();

        tree.insert_code(&member, "Go();", InsertPosition::End).unwrap();

        assert!(tree.read_body(&member).unwrap().contains("Go();"));
        assert!(tree.get_member(&artifact, "Missing").unwrap().is_none());
    }

    #[test]
    fn creation_notifies_subscribers() {
        let tree = tree();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = tree.subscribe_item_created(Arc::new(move |item: &ItemCreated| {
            sink.lock().unwrap().push(item.name.clone());
        }));
        assert_eq!(tree.subscriber_count(), 1);

        let messages = tree
            .create_artifacts(&[
                ArtifactRequest::new("App.Core", "OrdersViewModel", "class OrdersViewModel {}"),
                ArtifactRequest::new("App.Core", "HomeViewModel", "ignored"),
            ])
            .unwrap();

        assert_eq!(
            messages,
            [
                "OrdersViewModel added to project App.Core.",
                "HomeViewModel already exists in project App.Core."
            ]
        );
        assert_eq!(*seen.lock().unwrap(), ["OrdersViewModel"]);
        assert_eq!(tree.artifact_text("HomeViewModel").as_deref(), Some(HOME));

        tree.unsubscribe_item_created(id);
        assert_eq!(tree.subscriber_count(), 0);
    }

    #[test]
    fn creation_in_unknown_project_fails() {
        let err = tree()
            .create_artifacts(&[ArtifactRequest::new("App.Droid", "HomeView", "")])
            .unwrap_err();
        assert!(err.to_string().contains("App.Droid"));
    }

    #[test]
    fn duplicate_references_are_kept_once() {
        let tree = tree();
        let reference = ReferenceCopy {
            kind: "Lib".into(),
            destination: "lib/Foo.dll".into(),
            source: "ext/Foo.dll".into(),
            record_in_lib_folder: true,
            copy_physically: true,
        };

        tree.add_reference(&reference).unwrap();
        tree.add_reference(&reference).unwrap();

        assert_eq!(tree.references(), [reference]);
    }
}
