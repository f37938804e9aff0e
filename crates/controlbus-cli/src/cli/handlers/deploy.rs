//! `deploy` command

use crate::cli::commands::DeployOptions;
use crate::config::load_config;
use crate::error::{CliError, Result};
use crate::output::{json_output, print_info, print_success, print_warning};
use controlbus_client::{run_deployment, BuildInputs, DeploymentReport};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Summary printed with `--json`
#[derive(Debug, Serialize)]
struct DeploySummary<'a> {
    application: Option<&'a str>,
    classpaths: &'a [String],
    manifest: Option<&'a Path>,
    warnings: Vec<String>,
}

impl<'a> From<&'a DeploymentReport> for DeploySummary<'a> {
    fn from(report: &'a DeploymentReport) -> Self {
        Self {
            application: report.application.as_deref(),
            classpaths: &report.classpaths,
            manifest: report.manifest_path.as_deref(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Handle `deploy`
pub async fn handle_deploy(
    options: DeployOptions,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, &options.overrides())?;
    debug!(?config, "Effective configuration");

    let inputs = build_inputs(options).await?;
    let report = run_deployment(&config, inputs).await?;

    if json {
        return json_output(&DeploySummary::from(&report));
    }

    for warning in &report.warnings {
        print_warning(&warning.to_string());
    }
    if let Some(path) = &report.manifest_path {
        print_info(&format!("Deployment manifest written to {}", path.display()));
    }
    print_info(&format!("{} classpath entries", report.classpaths.len()));
    print_success(&format!(
        "Deployed {} to {}",
        report.application.as_deref().unwrap_or("application"),
        config.control_bus.base_url()
    ));
    Ok(())
}

async fn build_inputs(options: DeployOptions) -> Result<BuildInputs> {
    let manifest = match options.manifest {
        Some(path) => Some(
            tokio::fs::read(&path)
                .await
                .map_err(|source| CliError::Input { path, source })?,
        ),
        None => None,
    };

    Ok(BuildInputs {
        project_name: options.project_name,
        artifacts: options.artifacts,
        manifest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_inputs_reads_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("beans.xml");
        std::fs::write(&manifest, b"<beans/>").unwrap();

        let inputs = build_inputs(DeployOptions {
            project_name: Some("orders".to_string()),
            manifest: Some(manifest),
            ..Default::default()
        })
        .await
        .unwrap();

        assert_eq!(inputs.project_name.as_deref(), Some("orders"));
        assert_eq!(inputs.manifest.as_deref(), Some(b"<beans/>".as_slice()));
    }

    #[tokio::test]
    async fn test_build_inputs_missing_manifest() {
        let err = build_inputs(DeployOptions {
            manifest: Some(PathBuf::from("/nonexistent/beans.xml")),
            ..Default::default()
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CliError::Input { .. }));
    }
}
