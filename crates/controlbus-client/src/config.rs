//! Deployment configuration
//!
//! [`DeployConfig`] is the resolved configuration handed to the client by its
//! host (the CLI, or any other build tool). The client never reads ambient
//! configuration on its own.

use crate::auth::Credentials;
use controlbus_common::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default control bus host
pub const DEFAULT_CONTROL_BUS_HOST: &str = "localhost";

/// Default control bus port
pub const DEFAULT_CONTROL_BUS_PORT: u16 = 45102;

/// Default timeout in seconds for each control bus request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default location of the deployment manifest, relative to the output directory
pub const DEFAULT_DEPLOYMENT_PATH: &str = "weld-deployment.xml";

/// Complete configuration for one deployment attempt
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeployConfig {
    /// Where the control bus lives
    pub control_bus: ControlBusConfig,

    /// Application metadata
    pub application: ApplicationConfig,

    /// Build output locations
    pub build: BuildConfig,

    /// Credentials exchanged for a bearer token
    pub credentials: Credentials,
}

/// Control bus endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBusConfig {
    pub host: String,
    pub port: u16,
    /// Timeout applied to each request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ControlBusConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CONTROL_BUS_HOST.to_string(),
            port: DEFAULT_CONTROL_BUS_PORT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ControlBusConfig {
    /// `http://{host}:{port}`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Application metadata sent in the descriptor
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Application name; falls back to the project name when empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form description, sent verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Build output locations used to assemble the classpath
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Compiled classes directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,

    /// Packaged application jar; takes precedence over the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jar_file: Option<PathBuf>,

    /// Directory of dependency jars; replaces the supplied artifact list when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib_dir: Option<PathBuf>,

    /// Manifest location relative to the output directory
    pub deployment_path: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            jar_file: None,
            lib_dir: None,
            deployment_path: PathBuf::from(DEFAULT_DEPLOYMENT_PATH),
        }
    }
}

impl BuildConfig {
    pub fn output_directory(&self) -> Option<&Path> {
        non_empty(&self.output_directory)
    }

    pub fn jar_file(&self) -> Option<&Path> {
        non_empty(&self.jar_file)
    }

    pub fn lib_dir(&self) -> Option<&Path> {
        non_empty(&self.lib_dir)
    }

    /// The location that heads the classpath: the jar file if set, else the
    /// output directory.
    pub fn primary_artifact(&self) -> Result<&Path, ConfigurationError> {
        self.jar_file()
            .or_else(|| self.output_directory())
            .ok_or_else(|| {
                ConfigurationError::missing("build.output_directory or build.jar_file")
            })
    }
}

fn non_empty(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

impl DeployConfig {
    /// Check the settings that do not depend on the file system.
    ///
    /// The primary artifact location is checked when the classpath is resolved.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.control_bus.host.trim().is_empty() {
            return Err(ConfigurationError::missing("control_bus.host"));
        }
        if self.control_bus.port == 0 {
            return Err(ConfigurationError::invalid(
                "control_bus.port",
                "must be greater than 0",
            ));
        }
        if self.control_bus.request_timeout_secs == 0 {
            return Err(ConfigurationError::invalid(
                "control_bus.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        self.credentials.validate()
    }
}
