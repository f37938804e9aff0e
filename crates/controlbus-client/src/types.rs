//! Type definitions shared by the deployment steps

use crate::classpath::ResolutionWarning;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Reply to a successful `/apps` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentReceipt {
    pub status: u16,
    /// Raw reply body, kept for logging
    pub body: String,
}

/// Stages of one deployment attempt, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentStage {
    ResolveClasspaths,
    WriteManifest,
    BuildDescriptor,
    Authenticate,
    Deploy,
}

impl fmt::Display for DeploymentStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            DeploymentStage::ResolveClasspaths => "resolve-classpaths",
            DeploymentStage::WriteManifest => "write-manifest",
            DeploymentStage::BuildDescriptor => "build-descriptor",
            DeploymentStage::Authenticate => "authenticate",
            DeploymentStage::Deploy => "deploy",
        };
        f.write_str(stage)
    }
}

/// Problems that did not stop the deployment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeploymentWarning {
    #[error(transparent)]
    Classpath(#[from] ResolutionWarning),

    #[error("No output directory configured; deployment manifest not written")]
    ManifestSkipped,
}

/// Outcome of a successful deployment
#[derive(Debug, Clone)]
pub struct DeploymentReport {
    /// Name sent to the control bus, if any
    pub application: Option<String>,
    pub classpaths: Vec<String>,
    /// Where the deployment manifest was written
    pub manifest_path: Option<PathBuf>,
    pub receipt: DeploymentReceipt,
    pub warnings: Vec<DeploymentWarning>,
}
