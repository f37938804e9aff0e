//! `config` command

use crate::cli::commands::ConfigAction;
use crate::config::{example_config, load_config, redacted, ConfigOverrides};
use crate::error::{CliError, Result};
use crate::output::json_output;
use controlbus_client::DeployConfig;
use std::path::Path;

/// Handle `config show` and `config example`
pub fn handle_config(action: ConfigAction, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = match action {
        ConfigAction::Show => redacted(&load_config(config_path, &ConfigOverrides::default())?),
        ConfigAction::Example => example_config(),
    };

    if json {
        return json_output(&config);
    }
    print!("{}", render_toml(&config)?);
    Ok(())
}

fn render_toml(config: &DeployConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| CliError::output(format!("Failed to serialize config: {e}")))
}
