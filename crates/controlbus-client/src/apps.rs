//! Application registration (`POST /apps`)

use crate::auth::AuthToken;
use crate::client::{failure_diagnostic, ControlBusClient};
use crate::descriptor::ApplicationDescriptor;
use crate::error::{DeployError, Result};
use crate::types::DeploymentReceipt;
use reqwest::StatusCode;
use tracing::{debug, info};

/// Path of the application registration endpoint
pub const APPS_PATH: &str = "/apps";

impl ControlBusClient {
    /// Register or update an application.
    ///
    /// Only `201 Created` counts as success; anything else is fatal for this
    /// attempt and is not retried.
    pub async fn deploy(
        &self,
        token: &AuthToken,
        descriptor: &ApplicationDescriptor,
    ) -> Result<DeploymentReceipt> {
        debug!(
            name = descriptor.name().unwrap_or("<unnamed>"),
            classpaths = descriptor.classpaths().len(),
            "Submitting application descriptor"
        );
        let response = self.post_edn(APPS_PATH, descriptor, Some(token)).await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let (reason, body) = failure_diagnostic(response).await;
            return Err(DeployError::Deployment { reason, body });
        }

        let body = response.text().await.map_err(DeployError::Network)?;
        info!("success deploy");
        Ok(DeploymentReceipt {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientBuilder;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn descriptor() -> ApplicationDescriptor {
        ApplicationDescriptor::new(
            Some("orders".to_string()),
            Some("Order service".to_string()),
            vec!["file:///srv/orders/app.jar".to_string()],
        )
    }

    #[tokio::test]
    async fn test_deploy_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apps"))
            .and(header("Authorization", "Token test-token"))
            .and(header("Content-Type", "application/edn"))
            .and(body_string(
                r#"{:name "orders" :description "Order service" :classpaths ["file:///srv/orders/app.jar"]}"#,
            ))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{:result "ok"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default()
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let receipt = client
            .deploy(&AuthToken::new("test-token"), &descriptor())
            .await
            .unwrap();

        assert_eq!(receipt.status, 201);
        assert_eq!(receipt.body, r#"{:result "ok"}"#);
    }

    #[tokio::test]
    async fn test_deploy_failure_carries_diagnostics() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/apps"))
            .respond_with(ResponseTemplate::new(409).set_body_string("application is running"))
            .mount(&mock_server)
            .await;

        let client = ClientBuilder::default()
            .base_url(mock_server.uri())
            .build()
            .unwrap();
        let err = client
            .deploy(&AuthToken::new("test-token"), &descriptor())
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "CONTROLBUS_DEPLOY_ERROR");
        assert_eq!(
            err.to_string(),
            "Deployment failed: Conflict\napplication is running"
        );
    }
}
