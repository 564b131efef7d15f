//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `weft-adapters` crate provides implementations.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    ArtifactHandle, ArtifactRequest, InsertPosition, MemberHandle, ReferenceCopy, SnippetTemplate,
};
use crate::error::WeftResult;

/// Notification raised when the source tree creates an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCreated {
    pub project: String,
    pub name: String,
}

/// Callback registered for item-created notifications.
pub type ItemCreatedHandler = Arc<dyn Fn(&ItemCreated) + Send + Sync>;

/// Token returned by [`SourceTree::subscribe_item_created`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Port for the host's project tree.
///
/// Implemented by:
/// - `weft_adapters::source_tree::LocalSourceTree` (directory-backed)
/// - `weft_adapters::source_tree::MemorySourceTree` (testing)
///
/// ## Design Notes
///
/// - Lookups return `Ok(None)` for misses; `Err` is reserved for failures
/// - Where inserted code lands inside a body is the tree's decision,
///   guided by [`InsertPosition`]
/// - All methods take `&self`; implementations use interior mutability
#[cfg_attr(test, mockall::automock)]
pub trait SourceTree: Send + Sync {
    /// Find an artifact anywhere in the tree.
    fn find_artifact_by_name(&self, name: &str) -> WeftResult<Option<ArtifactHandle>>;

    /// Find an artifact inside the first project whose name ends with `project_suffix`.
    fn find_artifact_by_suffix(
        &self,
        project_suffix: &str,
        name: &str,
    ) -> WeftResult<Option<ArtifactHandle>>;

    /// Find a member of the artifact's first declared type.
    fn get_member(&self, artifact: &ArtifactHandle, member: &str)
    -> WeftResult<Option<MemberHandle>>;

    /// Current body text of a member.
    fn read_body(&self, member: &MemberHandle) -> WeftResult<String>;

    /// Insert code into a member body.
    fn insert_code(
        &self,
        member: &MemberHandle,
        code: &str,
        position: InsertPosition,
    ) -> WeftResult<()>;

    /// Whole text of an artifact.
    fn read_artifact(&self, artifact: &ArtifactHandle) -> WeftResult<String>;

    /// Replace the whole text of an artifact.
    fn write_artifact(&self, artifact: &ArtifactHandle, text: &str) -> WeftResult<()>;

    /// Record a reference and optionally copy it physically.
    fn add_reference(&self, reference: &ReferenceCopy) -> WeftResult<()>;

    /// Create artifacts from item templates; returns human-readable messages.
    fn create_artifacts(&self, requests: &[ArtifactRequest]) -> WeftResult<Vec<String>>;

    fn subscribe_item_created(&self, handler: ItemCreatedHandler) -> SubscriptionId;

    fn unsubscribe_item_created(&self, id: SubscriptionId);
}

/// Port for snippet template loading.
///
/// Templates are loaded on every request; caching is the source's concern.
pub trait SnippetSource: Send + Sync {
    fn load(&self, name: &str) -> WeftResult<SnippetTemplate>;
}

/// Port for status notices (a status bar in an IDE, a spinner in a terminal).
pub trait StatusSink: Send + Sync {
    fn write_status(&self, text: &str);
}
