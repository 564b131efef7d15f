//! Generation requests and their accumulated outcome.

use serde::Serialize;

use crate::domain::error::DomainError;

/// One artifact to create from an item template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRequest {
    /// Project that receives the artifact.
    pub project: String,
    /// Artifact name, e.g. `OrdersViewModel` or `OrdersView`.
    pub name: String,
    /// Item template rendered into the new artifact.
    pub template: String,
}

impl ArtifactRequest {
    pub fn new(
        project: impl Into<String>,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            template: template.into(),
        }
    }
}

/// A multi-artifact generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub artifacts: Vec<ArtifactRequest>,
    pub view_model: String,
    pub adapt_tests: bool,
    pub initiated_from: Option<String>,
    pub navigate_to: Option<String>,
}

impl GenerationRequest {
    pub fn new(view_model: impl Into<String>) -> Self {
        Self {
            view_model: view_model.into(),
            ..Default::default()
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactRequest) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn with_artifacts(mut self, artifacts: impl IntoIterator<Item = ArtifactRequest>) -> Self {
        self.artifacts.extend(artifacts);
        self
    }

    pub fn adapt_tests(mut self, adapt: bool) -> Self {
        self.adapt_tests = adapt;
        self
    }

    /// Empty names are treated as absent.
    pub fn initiated_from(mut self, name: impl Into<String>) -> Self {
        self.initiated_from = non_empty(name.into());
        self
    }

    /// Empty names are treated as absent.
    pub fn navigate_to(mut self, name: impl Into<String>) -> Self {
        self.navigate_to = non_empty(name.into());
        self
    }

    pub fn initiated_from_name(&self) -> Option<&str> {
        self.initiated_from.as_deref().filter(|s| !s.is_empty())
    }

    pub fn navigate_to_name(&self) -> Option<&str> {
        self.navigate_to.as_deref().filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.view_model.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "view_model",
            });
        }
        if self.view_model.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidSymbolicName {
                name: self.view_model.clone(),
                reason: "contains whitespace".into(),
            });
        }
        Ok(())
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Append-only, ordered human-readable messages from one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutcomeMessages(Vec<String>);

impl OutcomeMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        self.0.extend(messages);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl IntoIterator for OutcomeMessages {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// What a generation run reports back to its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationOutcome {
    pub messages: OutcomeMessages,
    /// Artifact names observed through the item-created subscription.
    pub created_artifacts: Vec<String>,
}
