//! `weft init`: create a default configuration file.

use std::path::{Path, PathBuf};

use crate::{
    cli::InitArgs,
    config::{AppConfig, LOCAL_CONFIG_FILE},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Create a default Weft configuration file.
pub fn execute(args: InitArgs, output: OutputManager) -> CliResult<()> {
    let config_path = if args.local {
        PathBuf::from(LOCAL_CONFIG_FILE)
    } else {
        AppConfig::config_path()
    };

    if config_path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            config_path.display(),
        ))?;
        return Ok(());
    }

    write_default(&config_path)?;

    output.success(&format!(
        "Configuration created at {}",
        config_path.display(),
    ))?;
    Ok(())
}

fn write_default(path: &Path) -> CliResult<()> {
    let toml = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_cli_context(|| format!("Failed to create config directory '{}'", parent.display()))?;
    }

    std::fs::write(path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_default_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[weave]"));
        assert!(text.contains("[dependencies]"));
        assert_eq!(AppConfig::load(Some(&path)).unwrap().weave, AppConfig::default().weave);
    }
}
