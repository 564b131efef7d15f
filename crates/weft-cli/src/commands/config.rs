//! `weft config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                return output.json(&config);
            }
            output.header("Current Configuration:")?;
            output.print(&to_toml(&config)?)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Look up a dotted key such as `weave.test_framework`.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };

    let root = toml::Value::try_from(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    let mut value = &root;
    for segment in key.split('.') {
        value = value.get(segment).ok_or_else(unknown)?;
    }

    Ok(match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
