//! Error types for the control bus deployment client

use crate::classpath::EncodingError;
use crate::codec::CodecError;
use controlbus_common::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deployment operations
pub type Result<T> = std::result::Result<T, DeployError>;

/// Everything that can end a deployment attempt.
///
/// Every variant is terminal for the attempt; nothing is retried.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Invalid or incomplete configuration, raised before any network call
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The primary artifact location could not be expressed as a URL
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A control bus payload could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// `/auth` answered with something other than 201
    #[error("Authentication failed: {reason}\n{body}")]
    Authentication { reason: String, body: String },

    /// `/apps` answered with something other than 201
    #[error("Deployment failed: {reason}\n{body}")]
    Deployment { reason: String, body: String },

    /// Transport failure or request timeout
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The HTTP client itself could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The deployment manifest could not be copied into the build output
    #[error("Failure to write a deployment file {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// Stable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DeployError::Configuration(_) => "CONTROLBUS_CONFIG_ERROR",
            DeployError::Encoding(_) => "CONTROLBUS_ENCODING_ERROR",
            DeployError::Codec(_) => "CONTROLBUS_CODEC_ERROR",
            DeployError::Authentication { .. } => "CONTROLBUS_AUTH_ERROR",
            DeployError::Deployment { .. } => "CONTROLBUS_DEPLOY_ERROR",
            DeployError::Network(e) if e.is_timeout() => "CONTROLBUS_TIMEOUT",
            DeployError::Network(_) => "CONTROLBUS_NETWORK_ERROR",
            DeployError::HttpClient(_) => "CONTROLBUS_HTTP_CLIENT_ERROR",
            DeployError::Manifest { .. } => "CONTROLBUS_MANIFEST_ERROR",
        }
    }

    /// Check if the request expired before the control bus answered
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeployError::Network(e) if e.is_timeout())
    }

    /// Check if the failure was reported by the control bus itself
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DeployError::Authentication { .. } | DeployError::Deployment { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DeployError::Configuration(ConfigurationError::missing("build.output_directory"));
        assert_eq!(err.error_code(), "CONTROLBUS_CONFIG_ERROR");

        let err = DeployError::Deployment {
            reason: "Conflict".to_string(),
            body: "already deployed".to_string(),
        };
        assert_eq!(err.error_code(), "CONTROLBUS_DEPLOY_ERROR");
        assert!(err.is_remote());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_remote_failures_carry_reason_and_body() {
        let err = DeployError::Authentication {
            reason: "Forbidden".to_string(),
            body: "bad credentials".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Authentication failed: Forbidden\nbad credentials"
        );
    }
}
