//! Error types for the control bus deploy CLI

use controlbus_client::DeployError;
use controlbus_common::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is incomplete
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// The deployment attempt failed
    #[error("{0}")]
    Deploy(#[from] DeployError),

    /// An input file named on the command line could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be rendered
    #[error("Failed to render output: {0}")]
    Output(String),
}

impl CliError {
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
