use crate::config::{
    ApplicationOverrides, BuildOverrides, ConfigOverrides, ControlBusOverrides,
    CredentialOverrides,
};
use clap::{Args, Subcommand};
use controlbus_client::{ArtifactRef, ArtifactScope};
use std::path::PathBuf;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register the application with the control bus
    Deploy(DeployOptions),

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Show the effective configuration (password masked)
    Show,

    /// Print an example configuration file
    Example,
}

/// Options for `deploy`
#[derive(Args, Debug, Clone, Default)]
pub struct DeployOptions {
    /// Control bus host
    #[arg(long)]
    pub host: Option<String>,

    /// Control bus port
    #[arg(long)]
    pub port: Option<u16>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Application name
    #[arg(long)]
    pub name: Option<String>,

    /// Application description
    #[arg(long)]
    pub description: Option<String>,

    /// Compiled classes directory
    #[arg(long, value_name = "DIR")]
    pub output_directory: Option<PathBuf>,

    /// Packaged application jar; takes precedence over --output-directory
    #[arg(long, value_name = "FILE")]
    pub jar_file: Option<PathBuf>,

    /// Directory of dependency jars; replaces --artifact when set
    #[arg(long, value_name = "DIR")]
    pub lib_dir: Option<PathBuf>,

    /// Manifest location relative to the output directory
    #[arg(long, value_name = "PATH")]
    pub deployment_path: Option<PathBuf>,

    /// Control bus username
    #[arg(long)]
    pub username: Option<String>,

    /// Control bus password (environment: CONTROLBUS_CREDENTIALS__PASSWORD)
    #[arg(long)]
    pub password: Option<String>,

    /// Project name used when no application name is configured
    #[arg(long)]
    pub project_name: Option<String>,

    /// Dependency artifact as SCOPE=PATH or PATH (compile scope)
    #[arg(long = "artifact", value_name = "SCOPE=PATH", value_parser = parse_artifact)]
    pub artifacts: Vec<ArtifactRef>,

    /// Deployment manifest to copy into the output directory
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

impl DeployOptions {
    /// Configuration values set by these flags
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            control_bus: ControlBusOverrides {
                host: self.host.clone(),
                port: self.port,
                request_timeout_secs: self.timeout,
            },
            application: ApplicationOverrides {
                name: self.name.clone(),
                description: self.description.clone(),
            },
            build: BuildOverrides {
                output_directory: self.output_directory.clone(),
                jar_file: self.jar_file.clone(),
                lib_dir: self.lib_dir.clone(),
                deployment_path: self.deployment_path.clone(),
            },
            credentials: CredentialOverrides {
                username: self.username.clone(),
                password: self.password.clone(),
            },
        }
    }
}

fn parse_artifact(value: &str) -> Result<ArtifactRef, String> {
    let (scope, path) = match value.split_once('=') {
        Some((scope, path)) => (ArtifactScope::from(scope), path),
        None => (ArtifactScope::Compile, value),
    };
    if path.is_empty() {
        return Err(format!("missing path in artifact '{value}'"));
    }
    Ok(ArtifactRef::new(path, scope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artifact() {
        let artifact = parse_artifact("provided=lib/servlet-api.jar").unwrap();
        assert_eq!(artifact.scope, ArtifactScope::Provided);
        assert_eq!(artifact.path, PathBuf::from("lib/servlet-api.jar"));

        let artifact = parse_artifact("lib/util.jar").unwrap();
        assert_eq!(artifact.scope, ArtifactScope::Compile);

        assert!(parse_artifact("runtime=").is_err());
    }

    #[test]
    fn test_overrides_only_carry_given_flags() {
        let options = DeployOptions {
            host: Some("controlbus.internal".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        let overrides = options.overrides();
        assert_eq!(overrides.control_bus.host.as_deref(), Some("controlbus.internal"));
        assert_eq!(overrides.control_bus.port, None);
        assert_eq!(overrides.credentials.password.as_deref(), Some("secret"));
        assert_eq!(overrides.credentials.username, None);
    }
}
