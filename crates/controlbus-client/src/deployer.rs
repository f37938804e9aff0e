//! Deployment orchestration
//!
//! [`Deployer`] runs one deployment attempt end to end:
//!
//! 1. validate the configuration
//! 2. resolve the classpath
//! 3. copy the deployment manifest into the build output, if one was supplied
//! 4. build the application descriptor
//! 5. authenticate
//! 6. register the application
//!
//! Stages run strictly in order. The first failure ends the attempt and
//! nothing is retried.

use crate::auth::AuthToken;
use crate::classpath::{self, ArtifactRef};
use crate::client::{ClientBuilder, ControlBusClient};
use crate::config::DeployConfig;
use crate::descriptor::{build_descriptor, ApplicationDescriptor};
use crate::error::Result;
use crate::manifest::write_manifest;
use crate::types::{DeploymentReceipt, DeploymentReport, DeploymentStage, DeploymentWarning};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// What the build environment knows about the project being deployed
#[derive(Debug, Clone, Default)]
pub struct BuildInputs {
    /// Fallback application name
    pub project_name: Option<String>,
    /// Dependency artifacts; ignored when a library directory is configured
    pub artifacts: Vec<ArtifactRef>,
    /// Deployment manifest to copy into the output directory
    pub manifest: Option<Vec<u8>>,
}

/// Runs deployment attempts against one control bus
#[derive(Debug, Clone)]
pub struct Deployer {
    config: DeployConfig,
    client: ControlBusClient,
}

impl Deployer {
    /// Create a deployer from a validated configuration
    pub fn new(config: DeployConfig) -> Result<Self> {
        config.validate()?;
        let client = ClientBuilder::from_config(&config.control_bus).build()?;
        Ok(Self { config, client })
    }

    /// Run one deployment attempt
    pub async fn run(&self, inputs: BuildInputs) -> Result<DeploymentReport> {
        info!(control_bus = %self.client.base_url(), "Starting deployment");
        let mut warnings = Vec::new();

        let stage = DeploymentStage::ResolveClasspaths;
        let resolution = classpath::resolve(&self.config.build, &inputs.artifacts)
            .inspect_err(|e| error!(%stage, "{e}"))?;
        warnings.extend(
            resolution
                .warnings
                .into_iter()
                .map(DeploymentWarning::from),
        );

        let manifest_path = match inputs.manifest.as_deref() {
            Some(contents) => self.copy_manifest(contents, &mut warnings).await?,
            None => None,
        };

        let stage = DeploymentStage::BuildDescriptor;
        let descriptor = build_descriptor(
            &self.config.application,
            resolution.entries,
            inputs.project_name.as_deref(),
        );
        debug!(
            %stage,
            name = descriptor.name().unwrap_or("<unnamed>"),
            classpaths = ?descriptor.classpaths(),
            "Built application descriptor"
        );

        let token = self.authenticate().await?;
        let receipt = self.register(&token, &descriptor).await?;

        info!(
            application = descriptor.name().unwrap_or("<unnamed>"),
            warnings = warnings.len(),
            "Deployment complete"
        );
        Ok(DeploymentReport {
            application: descriptor.name().map(str::to_string),
            classpaths: descriptor.classpaths().to_vec(),
            manifest_path,
            receipt,
            warnings,
        })
    }

    async fn copy_manifest(
        &self,
        contents: &[u8],
        warnings: &mut Vec<DeploymentWarning>,
    ) -> Result<Option<PathBuf>> {
        let stage = DeploymentStage::WriteManifest;
        let Some(output_dir) = self.config.build.output_directory() else {
            let warning = DeploymentWarning::ManifestSkipped;
            warn!(%stage, "{warning}");
            warnings.push(warning);
            return Ok(None);
        };

        let path = write_manifest(output_dir, &self.config.build.deployment_path, contents)
            .await
            .inspect_err(|e| error!(%stage, "{e}"))?;
        Ok(Some(path))
    }

    async fn authenticate(&self) -> Result<AuthToken> {
        let stage = DeploymentStage::Authenticate;
        debug!(%stage, "Requesting token");
        self.client
            .authenticate(&self.config.credentials)
            .await
            .inspect_err(|e| error!(%stage, "{e}"))
    }

    async fn register(
        &self,
        token: &AuthToken,
        descriptor: &ApplicationDescriptor,
    ) -> Result<DeploymentReceipt> {
        let stage = DeploymentStage::Deploy;
        debug!(%stage, "Registering application");
        self.client
            .deploy(token, descriptor)
            .await
            .inspect_err(|e| error!(%stage, "{e}"))
    }
}

/// Run a single deployment attempt with `config`
pub async fn run_deployment(config: &DeployConfig, inputs: BuildInputs) -> Result<DeploymentReport> {
    Deployer::new(config.clone())?.run(inputs).await
}
