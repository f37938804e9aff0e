//! Credential exchange with the control bus
//!
//! `POST /auth` trades a username and password for an opaque bearer token.
//! The token lives for one deployment attempt; it is never cached, refreshed
//! or stored.

use crate::client::{failure_diagnostic, ControlBusClient};
use crate::codec::{self, AuthResponse};
use crate::error::{DeployError, Result};
use controlbus_common::ConfigurationError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Path of the authentication endpoint
pub const AUTH_PATH: &str = "/auth";

/// Username and password for the control bus
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are required
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.username.is_empty() {
            return Err(ConfigurationError::missing("credentials.username"));
        }
        if self.password.is_empty() {
            return Err(ConfigurationError::missing("credentials.password"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Opaque bearer token returned by `/auth`
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header carrying this token
    pub fn authorization_header(&self) -> String {
        format!("Token {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

impl ControlBusClient {
    /// Exchange credentials for a bearer token.
    ///
    /// Only `201 Created` counts as success. Any other status fails with the
    /// reason phrase and raw body of the reply.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthToken> {
        debug!(username = %credentials.username, "Authenticating with control bus");
        let response = self.post_edn(AUTH_PATH, credentials, None).await?;

        if response.status() != StatusCode::CREATED {
            let (reason, body) = failure_diagnostic(response).await;
            return Err(DeployError::Authentication { reason, body });
        }

        let body = response.text().await.map_err(DeployError::Network)?;
        let AuthResponse { token } = codec::decode(&body)?;
        info!("success authentication");
        Ok(AuthToken::new(token))
    }
}
