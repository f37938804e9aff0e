//! Deployment manifest copy
//!
//! The build environment may supply a deployment manifest (bean discovery
//! descriptor). It is copied into the build output so it lands in the
//! deployed classpath.

use crate::error::{DeployError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Write `contents` to `output_dir/deployment_path`, creating parent
/// directories as needed. Returns the written path.
pub async fn write_manifest(
    output_dir: &Path,
    deployment_path: &Path,
    contents: &[u8],
) -> Result<PathBuf> {
    let target = output_dir.join(deployment_path);

    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| DeployError::Manifest {
                path: target.clone(),
                source,
            })?;
    }

    tokio::fs::write(&target, contents)
        .await
        .map_err(|source| DeployError::Manifest {
            path: target.clone(),
            source,
        })?;

    debug!(path = %target.display(), bytes = contents.len(), "Wrote deployment manifest");
    Ok(target)
}
