//! Code Weaver - idempotent snippet insertion.
//!
//! Resolution misses are outcomes, not errors: callers decide whether a
//! skipped weave is worth reporting.

use tracing::{debug, instrument};

use crate::{
    application::ports::SourceTree,
    domain::{ArtifactHandle, InsertPosition, WeaveOutcome, WeaveTarget, contains_snippet},
    error::WeftResult,
};

/// Inserts rendered snippets into named members, at most once.
pub struct CodeWeaver;

impl CodeWeaver {
    /// Weave into an artifact found anywhere in the tree.
    #[instrument(skip_all, fields(artifact = %target.artifact, member = %target.member))]
    pub fn weave(
        tree: &dyn SourceTree,
        target: &WeaveTarget,
        position: InsertPosition,
    ) -> WeftResult<WeaveOutcome> {
        let artifact = tree.find_artifact_by_name(&target.artifact)?;
        Self::weave_resolved(tree, artifact, target, position)
    }

    /// Weave into an artifact of the project whose name ends with `project_suffix`.
    #[instrument(
        skip_all,
        fields(project = %project_suffix, artifact = %target.artifact, member = %target.member)
    )]
    pub fn weave_in_project(
        tree: &dyn SourceTree,
        project_suffix: &str,
        target: &WeaveTarget,
        position: InsertPosition,
    ) -> WeftResult<WeaveOutcome> {
        let artifact = tree.find_artifact_by_suffix(project_suffix, &target.artifact)?;
        Self::weave_resolved(tree, artifact, target, position)
    }

    /// Weave into an artifact the caller already looked up.
    pub fn weave_resolved(
        tree: &dyn SourceTree,
        artifact: Option<ArtifactHandle>,
        target: &WeaveTarget,
        position: InsertPosition,
    ) -> WeftResult<WeaveOutcome> {
        let Some(artifact) = artifact else {
            debug!("Artifact not found, skipping");
            return Ok(WeaveOutcome::ArtifactNotFound);
        };

        let Some(member) = tree.get_member(&artifact, &target.member)? else {
            debug!("Member not found, skipping");
            return Ok(WeaveOutcome::MemberNotFound);
        };

        let body = tree.read_body(&member)?;
        if contains_snippet(&body, &target.snippet) {
            debug!("Snippet already present");
            return Ok(WeaveOutcome::AlreadyPresent);
        }

        tree.insert_code(&member, &target.snippet, position)?;
        debug!(%position, "Snippet inserted");
        Ok(WeaveOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockSourceTree;
    use crate::domain::MemberHandle;
    use crate::error::WeftError;
    use mockall::predicate::*;

    fn target() -> WeaveTarget {
        WeaveTarget::new("HomeViewModel", "InitializeCommands", "ShowOrders();")
    }

    fn handle() -> ArtifactHandle {
        ArtifactHandle::new("App.Core", "HomeViewModel")
    }

    #[test]
    fn missing_artifact_is_skipped() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name()
            .with(eq("HomeViewModel"))
            .returning(|_| Ok(None));
        tree.expect_insert_code().never();

        let outcome = CodeWeaver::weave(&tree, &target(), InsertPosition::End).unwrap();
        assert_eq!(outcome, WeaveOutcome::ArtifactNotFound);
    }

    #[test]
    fn missing_member_is_skipped() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name()
            .returning(|_| Ok(Some(handle())));
        tree.expect_get_member().returning(|_, _| Ok(None));
        tree.expect_read_body().never();
        tree.expect_insert_code().never();

        let outcome = CodeWeaver::weave(&tree, &target(), InsertPosition::End).unwrap();
        assert_eq!(outcome, WeaveOutcome::MemberNotFound);
    }

    #[test]
    fn present_snippet_is_not_inserted() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name()
            .returning(|_| Ok(Some(handle())));
        tree.expect_get_member()
            .returning(|a, m| Ok(Some(MemberHandle::new(a.clone(), m))));
        tree.expect_read_body()
            .returning(|_| Ok("{\n    ShowOrders();\n}".into()));
        tree.expect_insert_code().never();

        let outcome = CodeWeaver::weave(&tree, &target(), InsertPosition::End).unwrap();
        assert_eq!(outcome, WeaveOutcome::AlreadyPresent);
    }

    #[test]
    fn absent_snippet_is_inserted_at_requested_position() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name()
            .returning(|_| Ok(Some(handle())));
        tree.expect_get_member()
            .returning(|a, m| Ok(Some(MemberHandle::new(a.clone(), m))));
        tree.expect_read_body().returning(|_| Ok("{\n}".into()));
        tree.expect_insert_code()
            .withf(|m, code, pos| {
                m.name == "InitializeCommands" && code == "ShowOrders();" && *pos == InsertPosition::Start
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let outcome = CodeWeaver::weave(&tree, &target(), InsertPosition::Start).unwrap();
        assert_eq!(outcome, WeaveOutcome::Inserted);
    }

    #[test]
    fn project_scoped_lookup_uses_suffix() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name().never();
        tree.expect_find_artifact_by_suffix()
            .with(eq(".Core"), eq("HomeViewModel"))
            .returning(|_, _| Ok(None));

        let outcome =
            CodeWeaver::weave_in_project(&tree, ".Core", &target(), InsertPosition::End).unwrap();
        assert_eq!(outcome, WeaveOutcome::ArtifactNotFound);
    }

    #[test]
    fn collaborator_failure_propagates() {
        let mut tree = MockSourceTree::new();
        tree.expect_find_artifact_by_name().returning(|_| {
            Err(WeftError::Internal {
                message: "tree offline".into(),
            })
        });

        let err = CodeWeaver::weave(&tree, &target(), InsertPosition::End).unwrap_err();
        assert!(matches!(err, WeftError::Internal { .. }));
    }
}
