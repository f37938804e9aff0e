//! # Control Bus Client
//!
//! Registers a JVM application with a control bus service. A deployment
//! attempt resolves the application's classpath from build outputs, trades
//! credentials for a bearer token at `POST /auth`, and submits an application
//! descriptor to `POST /apps`. Both bodies are EDN documents.
//!
//! ## Architecture
//!
//! - [`classpath`] resolves the ordered classpath entry URLs
//! - [`descriptor`] assembles the application descriptor
//! - [`codec`] reads and writes the EDN wire format
//! - [`ControlBusClient`] performs the two HTTP exchanges
//! - [`Deployer`] drives one attempt through every stage in order

pub mod apps;
pub mod auth;
pub mod classpath;
pub mod client;
pub mod codec;
pub mod config;
pub mod deployer;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod types;

pub use auth::{AuthToken, Credentials};
pub use classpath::{resolve, ArtifactRef, ArtifactScope, ClasspathResolution, ResolutionWarning};
pub use client::{ClientBuilder, ControlBusClient};
pub use config::{ApplicationConfig, BuildConfig, ControlBusConfig, DeployConfig};
pub use deployer::{run_deployment, BuildInputs, Deployer};
pub use descriptor::{build_descriptor, ApplicationDescriptor};
pub use error::{DeployError, Result};
pub use manifest::write_manifest;
pub use types::{DeploymentReceipt, DeploymentReport, DeploymentStage, DeploymentWarning};
