//! Weaving vocabulary: targets, handles, outcomes and the containment rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An artifact resolved by the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactHandle {
    pub project: String,
    pub name: String,
}

impl ArtifactHandle {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.name)
    }
}

/// A member of an artifact's first declared type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberHandle {
    pub artifact: ArtifactHandle,
    pub name: String,
}

impl MemberHandle {
    pub fn new(artifact: ArtifactHandle, name: impl Into<String>) -> Self {
        Self {
            artifact,
            name: name.into(),
        }
    }
}

impl fmt::Display for MemberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.artifact, self.name)
    }
}

/// Transient description of one weave operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaveTarget {
    pub artifact: String,
    pub member: String,
    pub snippet: String,
}

impl WeaveTarget {
    pub fn new(
        artifact: impl Into<String>,
        member: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            artifact: artifact.into(),
            member: member.into(),
            snippet: snippet.into(),
        }
    }
}

/// Result of a weave. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaveOutcome {
    Inserted,
    AlreadyPresent,
    ArtifactNotFound,
    MemberNotFound,
}

impl WeaveOutcome {
    /// True when the member body was modified.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Inserted)
    }

    /// True when the target could not be resolved.
    pub fn is_skipped(self) -> bool {
        matches!(self, Self::ArtifactNotFound | Self::MemberNotFound)
    }
}

impl fmt::Display for WeaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Inserted => "inserted",
            Self::AlreadyPresent => "already present",
            Self::ArtifactNotFound => "artifact not found",
            Self::MemberNotFound => "member not found",
        };
        f.write_str(s)
    }
}

/// Where the source tree places inserted code inside a member body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Start,
    #[default]
    End,
}

impl fmt::Display for InsertPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// True when `body` already contains the trimmed `snippet`.
///
/// A whitespace-only snippet is trivially contained.
pub fn contains_snippet(body: &str, snippet: &str) -> bool {
    body.contains(snippet.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_ignores_surrounding_whitespace() {
        let body = "{\n    this.Load();\n    ShowOrders();\n}";
        assert!(contains_snippet(body, "\n\n   ShowOrders();  \n"));
        assert!(!contains_snippet(body, "ShowCustomers();"));
    }

    #[test]
    fn blank_snippet_is_contained() {
        assert!(contains_snippet("", "   \n"));
    }

    #[test]
    fn outcome_flags() {
        assert!(WeaveOutcome::Inserted.is_applied());
        assert!(!WeaveOutcome::AlreadyPresent.is_applied());
        assert!(WeaveOutcome::MemberNotFound.is_skipped());
        assert!(WeaveOutcome::ArtifactNotFound.is_skipped());
        assert!(!WeaveOutcome::AlreadyPresent.is_skipped());
    }

    #[test]
    fn handles_display() {
        let artifact = ArtifactHandle::new("App.Core", "OrdersViewModel");
        let member = MemberHandle::new(artifact.clone(), "Initialize");
        assert_eq!(artifact.to_string(), "App.Core/OrdersViewModel");
        assert_eq!(member.to_string(), "App.Core/OrdersViewModel::Initialize");
    }
}
