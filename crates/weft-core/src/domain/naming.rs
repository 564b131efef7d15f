//! Command-name derivation from "ViewModel"-suffixed symbolic names.
//!
//! | Input              | `derive_command_name` | `derive_instance_command_name` |
//! |--------------------|-----------------------|--------------------------------|
//! | `OrdersViewModel`  | `OrdersCommand`       | `ordersCommand`                |
//! | `HTTPViewModel`    | `HTTPCommand`         | `hTTPCommand`                  |
//! | `Orders`           | `UnknownCommand`      | `UnknownCommand`               |
//!
//! Derivation is total: every input yields either a derived name or the
//! [`UNKNOWN_COMMAND`] sentinel.

/// Default suffix token marking a view model.
pub const DEFAULT_SUFFIX: &str = "ViewModel";

/// Returned when the suffix token is absent.
pub const UNKNOWN_COMMAND: &str = "UnknownCommand";

const COMMAND: &str = "Command";

/// Derives command identifiers from symbolic names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameDeriver {
    suffix: String,
}

impl NameDeriver {
    /// Create a deriver for a custom suffix token.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// The suffix token this deriver looks for.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// `OrdersViewModel` → `OrdersCommand`.
    pub fn derive_command_name(&self, symbolic_name: &str) -> String {
        match self.stem(symbolic_name) {
            Some(stem) => format!("{stem}{COMMAND}"),
            None => UNKNOWN_COMMAND.to_string(),
        }
    }

    /// `OrdersViewModel` → `ordersCommand`.
    pub fn derive_instance_command_name(&self, symbolic_name: &str) -> String {
        match self.stem(symbolic_name) {
            Some(stem) => format!("{}{COMMAND}", lower_first(stem)),
            None => UNKNOWN_COMMAND.to_string(),
        }
    }

    /// Text preceding the first occurrence of the suffix.
    fn stem<'a>(&self, symbolic_name: &'a str) -> Option<&'a str> {
        // An empty suffix would match at 0 for every input.
        if self.suffix.is_empty() {
            return None;
        }
        symbolic_name
            .find(self.suffix.as_str())
            .map(|index| &symbolic_name[..index])
    }
}

impl Default for NameDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX)
    }
}

/// Lower-case the first character, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
