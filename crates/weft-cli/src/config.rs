//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the explicit
//! [`WeaveSettings`] and [`DependencyPolicy`] built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `WEFT__SECTION__KEY`
//! 3. `--config FILE`, when given
//! 4. `.weft.toml` in the current directory
//! 5. The per-user config file (see [`AppConfig::config_path`])
//! 6. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;
use weft_core::{
    application::{
        WeaveSettings,
        services::scaffold_service::{
            DEFAULT_NAVIGATION_MEMBER, DEFAULT_NAVIGATION_SNIPPET, DEFAULT_TEST_ARTIFACT_PREFIX,
            DEFAULT_TEST_PROJECT_SUFFIX,
        },
    },
    domain::{
        DependencyPolicy, InsertPosition, InstallCommandTemplate, PlaceholderSyntax, TestFramework,
        naming::DEFAULT_SUFFIX, testing::DEFAULT_TEST_PLACEHOLDER,
    },
};

use crate::error::{CliError, CliResult};

/// File name of the per-directory configuration.
pub const LOCAL_CONFIG_FILE: &str = ".weft.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "WEFT";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generation and weaving settings.
    pub weave: WeaveConfig,
    /// Dependency acquisition policy.
    pub dependencies: DependencyConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaveConfig {
    pub suffix: String,
    pub navigation_snippet: String,
    pub navigation_member: String,
    pub insert_position: InsertPosition,
    pub placeholder_open: String,
    pub placeholder_close: String,
    pub test_framework: TestFramework,
    pub test_placeholder: String,
    pub test_artifact_prefix: String,
    pub test_project_suffix: String,
    /// Suffix of the project that receives new view models.
    pub core_project_suffix: String,
    /// Directory of `<name>.snippet` files; unset means the built-in snippets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub use_package_manager: bool,
    pub include_lib_folder: bool,
    pub copy_to_lib_folder: bool,
    pub install_command: String,
    pub install_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for WeaveConfig {
    fn default() -> Self {
        let syntax = PlaceholderSyntax::default();
        let (open, close) = syntax.delimiters();
        Self {
            suffix: DEFAULT_SUFFIX.into(),
            navigation_snippet: DEFAULT_NAVIGATION_SNIPPET.into(),
            navigation_member: DEFAULT_NAVIGATION_MEMBER.into(),
            insert_position: InsertPosition::default(),
            placeholder_open: open.into(),
            placeholder_close: close.into(),
            test_framework: TestFramework::default(),
            test_placeholder: DEFAULT_TEST_PLACEHOLDER.into(),
            test_artifact_prefix: DEFAULT_TEST_ARTIFACT_PREFIX.into(),
            test_project_suffix: DEFAULT_TEST_PROJECT_SUFFIX.into(),
            core_project_suffix: ".Core".into(),
            snippet_dir: None,
        }
    }
}

impl Default for DependencyConfig {
    fn default() -> Self {
        let install = InstallCommandTemplate::default();
        Self {
            use_package_manager: false,
            include_lib_folder: false,
            copy_to_lib_folder: false,
            install_command: install.pattern,
            install_token: install.token,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from every source, highest priority last.
    ///
    /// `config_file` is the path passed via `--config`; it must exist when
    /// given.  The default locations are optional.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default()).map_err(config_error)?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::from(Self::config_path()).required(false))
            .add_source(File::from(PathBuf::from(LOCAL_CONFIG_FILE)).required(false));

        if let Some(path) = config_file {
            debug!(path = %path.display(), "Using explicit config file");
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        config.try_deserialize().map_err(config_error)
    }

    /// Path to the per-user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.weft.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "weft", "weft")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Settings for one generation run.
    pub fn weave_settings(&self) -> CliResult<WeaveSettings> {
        let weave = &self.weave;
        let placeholder_syntax =
            PlaceholderSyntax::new(weave.placeholder_open.as_str(), weave.placeholder_close.as_str())
                .map_err(|e| CliError::ConfigError {
                    message: format!("weave.placeholder_open/close: {e}"),
                    source: Some(Box::new(e)),
                })?;

        Ok(WeaveSettings {
            suffix: weave.suffix.clone(),
            navigation_snippet: weave.navigation_snippet.clone(),
            navigation_member: weave.navigation_member.clone(),
            insert_position: weave.insert_position,
            placeholder_syntax,
            test_framework: weave.test_framework,
            test_project_suffix: weave.test_project_suffix.clone(),
            test_artifact_prefix: weave.test_artifact_prefix.clone(),
            test_placeholder: weave.test_placeholder.clone(),
        })
    }

    /// Dependency policy; `force_package_manager` mirrors the CLI flag.
    pub fn dependency_policy(&self, force_package_manager: bool) -> DependencyPolicy {
        let deps = &self.dependencies;
        DependencyPolicy {
            use_package_manager: deps.use_package_manager || force_package_manager,
            include_lib_folder: deps.include_lib_folder,
            copy_to_lib_folder: deps.copy_to_lib_folder,
            install_command: InstallCommandTemplate::new(
                deps.install_command.as_str(),
                deps.install_token.as_str(),
            ),
        }
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_core_settings() {
        let settings = AppConfig::default().weave_settings().unwrap();
        assert_eq!(settings, WeaveSettings::default());
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weft.toml");
        fs::write(
            &path,
            "[weave]\ntest_framework = \"xunit\"\ninsert_position = \"start\"\n\n\
             [dependencies]\nuse_package_manager = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.weave.test_framework, TestFramework::XUnit);
        assert_eq!(cfg.weave.insert_position, InsertPosition::Start);
        assert_eq!(cfg.weave.suffix, "ViewModel");
        assert!(cfg.dependency_policy(false).use_package_manager);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn half_delimited_placeholder_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.weave.placeholder_close = String::new();
        assert!(matches!(
            cfg.weave_settings(),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn package_manager_flag_forces_policy() {
        let cfg = AppConfig::default();
        assert!(!cfg.dependency_policy(false).use_package_manager);
        assert!(cfg.dependency_policy(true).use_package_manager);
        assert_eq!(
            cfg.dependency_policy(false).install_command,
            InstallCommandTemplate::default()
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
