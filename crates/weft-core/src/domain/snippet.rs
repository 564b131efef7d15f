//! Snippet data model: templates, placeholder syntax and replacement variables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Well-known variable keys bound into navigation snippets.
pub mod variables {
    pub const VIEW_MODEL_NAME: &str = "ViewModelName";
    pub const COMMAND_NAME: &str = "CommandName";
    pub const COMMAND_NAME_INSTANCE: &str = "CommandNameInstance";
}

/// A (placeholder key, substitution value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementVariable {
    pub key: String,
    pub value: String,
}

impl ReplacementVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered set of replacement variables, unique by key.
///
/// Keys are case-sensitive. Setting an existing key overwrites its value in
/// place, so each key is bound at most once per render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementVariables {
    entries: Vec<ReplacementVariable>,
}

impl ReplacementVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to `value`, consuming self.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Bind `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|v| v.key == key) {
            Some(existing) => existing.value = value,
            None => self.entries.push(ReplacementVariable { key, value }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplacementVariable> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ReplacementVariable> for ReplacementVariables {
    fn from_iter<I: IntoIterator<Item = ReplacementVariable>>(iter: I) -> Self {
        let mut vars = Self::new();
        for v in iter {
            vars.set(v.key, v.value);
        }
        vars
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ReplacementVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.set(k, v);
        }
        vars
    }
}

/// An immutable, named text blob containing placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetTemplate {
    name: String,
    text: String,
}

impl SnippetTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// How a key is written inside a template.
///
/// The token for key `K` is `open + K + close`. Both delimiters empty means
/// the key itself is the token (literal replacement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPlaceholderSyntax")]
pub struct PlaceholderSyntax {
    open: String,
    close: String,
}

/// Unchecked wire form; deserialisation goes through [`PlaceholderSyntax::new`].
#[derive(Deserialize)]
struct RawPlaceholderSyntax {
    open: String,
    close: String,
}

impl TryFrom<RawPlaceholderSyntax> for PlaceholderSyntax {
    type Error = DomainError;

    fn try_from(raw: RawPlaceholderSyntax) -> Result<Self, Self::Error> {
        Self::new(raw.open, raw.close)
    }
}

impl PlaceholderSyntax {
    /// Delimited syntax. Either both delimiters are set or neither is.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self, DomainError> {
        let open = open.into();
        let close = close.into();
        if open.is_empty() != close.is_empty() {
            return Err(DomainError::InvalidPlaceholderSyntax(format!(
                "delimiters must both be set or both be empty (open={open:?}, close={close:?})"
            )));
        }
        Ok(Self { open, close })
    }

    /// `{{KEY}}`.
    pub fn mustache() -> Self {
        Self {
            open: "{{".into(),
            close: "}}".into(),
        }
    }

    /// The key itself is the token.
    pub fn bare() -> Self {
        Self {
            open: String::new(),
            close: String::new(),
        }
    }

    /// `(open, close)`; both empty for the bare syntax.
    pub fn delimiters(&self) -> (&str, &str) {
        (&self.open, &self.close)
    }

    /// Token for `key`, or `None` when the token would be empty.
    pub fn token(&self, key: &str) -> Option<String> {
        let token = format!("{}{}{}", self.open, key, self.close);
        (!token.is_empty()).then_some(token)
    }
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self::mustache()
    }
}

impl fmt::Display for PlaceholderSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}KEY{}", self.open, self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_in_place() {
        let mut vars = ReplacementVariables::new()
            .with("A", "1")
            .with("B", "2");
        vars.set("A", "3");

        let keys: Vec<_> = vars.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(keys, ["A", "B"]);
        assert_eq!(vars.get("A"), Some("3"));
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let vars = ReplacementVariables::new()
            .with("FirstViewModel", "X")
            .with("firstViewModel", "y");
        assert_eq!(vars.len(), 2);
        assert_eq!(vars.get("FirstViewModel"), Some("X"));
        assert_eq!(vars.get("firstviewmodel"), None);
    }

    #[test]
    fn collects_from_pairs() {
        let vars: ReplacementVariables = [("K", "v"), ("K", "w")].into_iter().collect();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("K"), Some("w"));
    }

    #[test]
    fn syntax_tokens() {
        assert_eq!(PlaceholderSyntax::mustache().token("Name").unwrap(), "{{Name}}");
        assert_eq!(PlaceholderSyntax::bare().token("Name").unwrap(), "Name");
        assert_eq!(PlaceholderSyntax::bare().token(""), None);
        assert_eq!(
            PlaceholderSyntax::new("$", "$").unwrap().token("Name").unwrap(),
            "$Name$"
        );
    }

    #[test]
    fn asymmetric_syntax_rejected() {
        assert!(matches!(
            PlaceholderSyntax::new("$", ""),
            Err(DomainError::InvalidPlaceholderSyntax(_))
        ));
    }

    #[test]
    fn deserialising_checks_delimiters() {
        use serde::de::value::{Error as ValueError, MapDeserializer};

        fn parse(open: &'static str, close: &'static str) -> Result<PlaceholderSyntax, ValueError> {
            let fields = vec![("open", open), ("close", close)];
            PlaceholderSyntax::deserialize(MapDeserializer::<_, ValueError>::new(fields.into_iter()))
        }

        assert_eq!(parse("{{", "}}").unwrap(), PlaceholderSyntax::mustache());
        assert_eq!(parse("", "").unwrap(), PlaceholderSyntax::bare());
        let err = parse("{{", "").unwrap_err();
        assert!(err.to_string().contains("both be set"));
    }
}
