//! In-memory snippet source with the built-in templates.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use weft_core::{
    application::{ApplicationError, ports::SnippetSource},
    domain::SnippetTemplate,
    error::WeftResult,
};

use crate::builtin_snippets;

/// Thread-safe in-memory snippet source.
#[derive(Clone, Default)]
pub struct MemorySnippetSource {
    inner: Arc<RwLock<HashMap<String, SnippetTemplate>>>,
}

impl MemorySnippetSource {
    /// Create a new empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with the built-in templates loaded.
    pub fn with_builtin() -> Self {
        let source = Self::new();
        for template in builtin_snippets::all() {
            source.insert(template);
        }
        source
    }

    /// Add or replace a template.
    pub fn insert(&self, template: SnippetTemplate) {
        if let Ok(mut inner) = self.inner.write() {
            inner.insert(template.name().to_string(), template);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnippetSource for MemorySnippetSource {
    fn load(&self, name: &str) -> WeftResult<SnippetTemplate> {
        let inner = self.inner.read().map_err(|_| ApplicationError::LockPoisoned)?;
        inner.get(name).cloned().ok_or_else(|| {
            ApplicationError::SnippetUnavailable {
                name: name.to_string(),
                reason: "no template with this name".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_are_loadable() {
        let source = MemorySnippetSource::with_builtin();
        assert_eq!(source.len(), builtin_snippets::all().len());
        let nav = source.load(builtin_snippets::NAVIGATION).unwrap();
        assert!(nav.text().contains("{{CommandNameInstance}}"));
    }

    #[test]
    fn unknown_template_is_unavailable() {
        let err = MemorySnippetSource::new().load("Nope").unwrap_err();
        assert!(err.to_string().contains("Nope"));
    }
}
