//! Configuration loading for the control bus deploy CLI
//!
//! Sources are layered, later ones winning:
//!
//! 1. built-in defaults
//! 2. the TOML file (`controlbus.toml` unless `--config` is given)
//! 3. `CONTROLBUS_` environment variables, `__` separating sections
//!    (`CONTROLBUS_CONTROL_BUS__HOST`, `CONTROLBUS_CREDENTIALS__PASSWORD`)
//! 4. command-line flags

use controlbus_client::{Credentials, DeployConfig};
use controlbus_common::ConfigurationError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file used when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "controlbus.toml";

/// Prefix of the environment variables read by the loader
pub const ENV_PREFIX: &str = "CONTROLBUS_";

/// Values set on the command line; `None` leaves the lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "ControlBusOverrides::is_empty")]
    pub control_bus: ControlBusOverrides,
    #[serde(skip_serializing_if = "ApplicationOverrides::is_empty")]
    pub application: ApplicationOverrides,
    #[serde(skip_serializing_if = "BuildOverrides::is_empty")]
    pub build: BuildOverrides,
    #[serde(skip_serializing_if = "CredentialOverrides::is_empty")]
    pub credentials: CredentialOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ControlBusOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl ControlBusOverrides {
    fn is_empty(&self) -> bool {
        self.host.is_none() && self.port.is_none() && self.request_timeout_secs.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplicationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ApplicationOverrides {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_path: Option<PathBuf>,
}

impl BuildOverrides {
    fn is_empty(&self) -> bool {
        self.output_directory.is_none()
            && self.jar_file.is_none()
            && self.lib_dir.is_none()
            && self.deployment_path.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CredentialOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CredentialOverrides {
    fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Load the effective deployment configuration.
///
/// A missing default file is fine; a missing file named with `--config` is
/// an error.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<DeployConfig, ConfigurationError> {
    let mut figment = Figment::from(Serialized::defaults(DeployConfig::default()));

    match path {
        Some(path) => {
            let path = expand_path(path);
            if !path.exists() {
                return Err(ConfigurationError::ParseError {
                    details: format!("configuration file {} not found", path.display()),
                });
            }
            debug!("Loading configuration from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                debug!("Loading configuration from: {}", default_path.display());
                figment = figment.merge(Toml::file(default_path));
            }
        }
    }

    figment = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Serialized::defaults(overrides));

    let mut config: DeployConfig = figment.extract().map_err(|e| ConfigurationError::ParseError {
        details: e.to_string(),
    })?;

    expand_build_paths(&mut config);
    Ok(config)
}

/// Configuration suitable for display: the password is masked
pub fn redacted(config: &DeployConfig) -> DeployConfig {
    let mut config = config.clone();
    if !config.credentials.password.is_empty() {
        config.credentials.password = "***".to_string();
    }
    config
}

/// Starting point printed by `config example`
pub fn example_config() -> DeployConfig {
    let mut config = DeployConfig::default();
    config.application.name = Some("my-application".to_string());
    config.application.description = Some("What the application does".to_string());
    config.build.output_directory = Some(PathBuf::from("target/classes"));
    config.build.lib_dir = Some(PathBuf::from("target/lib"));
    config.credentials = Credentials::new("deployer", "");
    config
}

fn expand_build_paths(config: &mut DeployConfig) {
    let build = &mut config.build;
    for path in [
        &mut build.output_directory,
        &mut build.jar_file,
        &mut build.lib_dir,
    ]
    .into_iter()
    .flatten()
    {
        *path = expand_path(path);
    }
}

fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(path_str) => PathBuf::from(shellexpand::tilde(path_str).as_ref()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("controlbus.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[control_bus]
host = "controlbus.internal"

[application]
name = "orders"

[build]
output_directory = "/srv/orders/classes"

[credentials]
username = "deployer"
password = "secret"
"#,
        );

        let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();

        assert_eq!(config.control_bus.host, "controlbus.internal");
        assert_eq!(config.control_bus.port, 45102);
        assert_eq!(config.application.name.as_deref(), Some("orders"));
        assert_eq!(
            config.build.output_directory,
            Some(PathBuf::from("/srv/orders/classes"))
        );
        assert_eq!(config.credentials.password, "secret");
    }

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[control_bus]
host = "controlbus.internal"
port = 9000
"#,
        );

        let overrides = ConfigOverrides {
            control_bus: ControlBusOverrides {
                port: Some(45200),
                ..Default::default()
            },
            build: BuildOverrides {
                jar_file: Some(PathBuf::from("/srv/orders/app.jar")),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();

        assert_eq!(config.control_bus.host, "controlbus.internal");
        assert_eq!(config.control_bus.port, 45200);
        assert_eq!(config.build.jar_file, Some(PathBuf::from("/srv/orders/app.jar")));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(
            Some(&dir.path().join("absent.toml")),
            &ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[control_bus]\nport = \"not a port\"\n");
        let result = load_config(Some(&path), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
    }

    #[test]
    fn test_redacted_masks_password() {
        let config = DeployConfig {
            credentials: Credentials::new("deployer", "secret"),
            ..Default::default()
        };
        let shown = toml::to_string(&redacted(&config)).unwrap();
        assert!(shown.contains("***"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_example_config_parses_back() {
        let rendered = toml::to_string_pretty(&example_config()).unwrap();
        let parsed: DeployConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.application.name.as_deref(), Some("my-application"));
        assert_eq!(parsed.build.lib_dir, Some(PathBuf::from("target/lib")));
    }
}
