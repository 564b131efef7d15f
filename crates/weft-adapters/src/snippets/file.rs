//! Directory-backed snippet source.
//!
//! Each template is a file named `<name>.snippet` directly inside the
//! snippet directory. Files are read on every load.

use std::{fs, path::PathBuf};

use tracing::debug;
use weft_core::{
    application::{ApplicationError, ports::SnippetSource},
    domain::SnippetTemplate,
    error::WeftResult,
};

pub const SNIPPET_EXTENSION: &str = "snippet";

#[derive(Debug, Clone)]
pub struct FileSnippetSource {
    dir: PathBuf,
}

impl FileSnippetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{SNIPPET_EXTENSION}"))
    }
}

impl SnippetSource for FileSnippetSource {
    fn load(&self, name: &str) -> WeftResult<SnippetTemplate> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(ApplicationError::SnippetUnavailable {
                name: name.to_string(),
                reason: "not a plain template name".into(),
            }
            .into());
        }

        let path = self.path_for(name);
        debug!(path = %path.display(), "Loading snippet");
        let text = fs::read_to_string(&path).map_err(|e| ApplicationError::SnippetUnavailable {
            name: name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;

        Ok(SnippetTemplate::new(name, text))
    }
}
