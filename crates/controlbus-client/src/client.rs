//! HTTP client for the control bus
//!
//! [`ControlBusClient`] talks to the two control bus endpoints:
//!
//! - `POST /auth` exchanges credentials for a bearer token
//!   ([`ControlBusClient::authenticate`])
//! - `POST /apps` registers or updates an application
//!   ([`ControlBusClient::deploy`])
//!
//! Both bodies are EDN documents. The token is always passed explicitly from
//! one call to the next; the client keeps no state between requests.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use controlbus_client::{ApplicationDescriptor, ClientBuilder, Credentials};
//! use std::time::Duration;
//!
//! # async fn example() -> controlbus_client::Result<()> {
//! let client = ClientBuilder::default()
//!     .host("controlbus.internal")
//!     .port(45102)
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let token = client
//!     .authenticate(&Credentials::new("deployer", "secret"))
//!     .await?;
//! let descriptor = ApplicationDescriptor::new(
//!     Some("orders".to_string()),
//!     None,
//!     vec!["file:///srv/orders/app.jar".to_string()],
//! );
//! client.deploy(&token, &descriptor).await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::AuthToken;
use crate::codec::{self, EdnEncode, EDN_MEDIA_TYPE};
use crate::config::{
    ControlBusConfig, DEFAULT_CONTROL_BUS_HOST, DEFAULT_CONTROL_BUS_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::error::{DeployError, Result};
use controlbus_common::ConfigurationError;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Response;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for one control bus
#[derive(Debug, Clone)]
pub struct ControlBusClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ControlBusClient {
    /// Create a new client (private - use ClientBuilder instead)
    fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(connect_timeout) = connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http_client = builder.build().map_err(DeployError::HttpClient)?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST an EDN payload, optionally carrying a bearer token
    pub(crate) async fn post_edn<B: EdnEncode + ?Sized>(
        &self,
        path: &str,
        payload: &B,
        token: Option<&AuthToken>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, EDN_MEDIA_TYPE)
            .header(ACCEPT, EDN_MEDIA_TYPE)
            .body(codec::encode(payload));

        if let Some(token) = token {
            request = request.header(AUTHORIZATION, token.authorization_header());
        }

        debug!(%url, "POST");
        let response = request.send().await.map_err(DeployError::Network)?;
        debug!(%url, status = %response.status(), "Control bus replied");
        Ok(response)
    }
}

/// Reason phrase and raw body of a failed reply
pub(crate) async fn failure_diagnostic(response: Response) -> (String, String) {
    let status = response.status();
    let reason = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());
    let body = response.text().await.unwrap_or_default();
    (reason, body)
}

/// Builder for constructing a ControlBusClient with custom configuration
#[derive(Debug, Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Builder preloaded from the control bus section of a [`crate::DeployConfig`]
    pub fn from_config(config: &ControlBusConfig) -> Self {
        Self::default()
            .host(config.host.clone())
            .port(config.port)
            .timeout(config.request_timeout())
    }

    /// Set the full base URL; overrides host and port
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ControlBusClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => format!(
                "http://{}:{}",
                self.host
                    .unwrap_or_else(|| DEFAULT_CONTROL_BUS_HOST.to_string()),
                self.port.unwrap_or(DEFAULT_CONTROL_BUS_PORT)
            ),
        };

        let parsed = Url::parse(&base_url)
            .map_err(|e| ConfigurationError::invalid("control_bus", format!("{base_url}: {e}")))?;
        if parsed.host_str().is_none() {
            return Err(
                ConfigurationError::invalid("control_bus", format!("{base_url}: missing host"))
                    .into(),
            );
        }

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        ControlBusClient::new(
            base_url.trim_end_matches('/'),
            timeout,
            self.connect_timeout,
        )
    }
}
