//! Configuration errors shared across crates

use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A required setting was not provided or was empty
    #[error("Missing required configuration: {field}")]
    MissingField { field: String },

    /// A setting was provided but cannot be used
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// The configuration sources could not be parsed or merged
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },
}

impl ConfigurationError {
    /// Shorthand for [`ConfigurationError::MissingField`]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Shorthand for [`ConfigurationError::InvalidValue`]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
