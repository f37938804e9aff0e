//! Classpath resolution
//!
//! Produces the ordered list of classpath entry URLs for an application. The
//! primary artifact location (jar file, else output directory) always comes
//! first. Dependencies follow, taken either from a library directory or from
//! the artifact list supplied by the build environment.

use crate::config::BuildConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// File name suffixes accepted from a library directory
const LIBRARY_SUFFIXES: [&str; 2] = [".jar", ".zip"];

/// Dependency scope as reported by the build environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactScope {
    Compile,
    Runtime,
    Provided,
    Test,
    System,
    Import,
    Other(String),
}

impl ArtifactScope {
    /// Only compile and runtime dependencies are shipped with the application
    pub fn is_deployable(&self) -> bool {
        matches!(self, ArtifactScope::Compile | ArtifactScope::Runtime)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArtifactScope::Compile => "compile",
            ArtifactScope::Runtime => "runtime",
            ArtifactScope::Provided => "provided",
            ArtifactScope::Test => "test",
            ArtifactScope::System => "system",
            ArtifactScope::Import => "import",
            ArtifactScope::Other(scope) => scope,
        }
    }
}

impl From<&str> for ArtifactScope {
    fn from(scope: &str) -> Self {
        match scope {
            "compile" => ArtifactScope::Compile,
            "runtime" => ArtifactScope::Runtime,
            "provided" => ArtifactScope::Provided,
            "test" => ArtifactScope::Test,
            "system" => ArtifactScope::System,
            "import" => ArtifactScope::Import,
            other => ArtifactScope::Other(other.to_string()),
        }
    }
}

impl From<String> for ArtifactScope {
    fn from(scope: String) -> Self {
        ArtifactScope::from(scope.as_str())
    }
}

impl From<ArtifactScope> for String {
    fn from(scope: ArtifactScope) -> Self {
        scope.as_str().to_string()
    }
}

impl FromStr for ArtifactScope {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(ArtifactScope::from(s))
    }
}

impl fmt::Display for ArtifactScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved dependency of the project being deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub scope: ArtifactScope,
}

impl ArtifactRef {
    pub fn new(path: impl Into<PathBuf>, scope: impl Into<ArtifactScope>) -> Self {
        Self {
            path: path.into(),
            scope: scope.into(),
        }
    }
}

/// A path that could not be expressed as a `file://` URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Can't resolve {} to a URL: {reason}", .path.display())]
pub struct EncodingError {
    pub path: PathBuf,
    pub reason: String,
}

impl EncodingError {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal problems met while resolving; the affected entries are left out
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionWarning {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("Can't list library directory {}: {reason}", .path.display())]
    UnreadableLibDir { path: PathBuf, reason: String },
}

/// Output of [`resolve`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClasspathResolution {
    /// Entry URLs; the primary artifact is always at index 0
    pub entries: Vec<String>,
    pub warnings: Vec<ResolutionWarning>,
}

/// Resolve the ordered classpath for a deployment.
///
/// Fails with a configuration error when neither a jar file nor an output
/// directory is configured, and with an encoding error when the primary
/// location has no URL form. Secondary entries that cannot be converted are
/// dropped and reported as warnings.
pub fn resolve(build: &BuildConfig, artifacts: &[ArtifactRef]) -> Result<ClasspathResolution> {
    let primary = build.primary_artifact()?;
    let primary_url = file_url(primary)?;
    debug!(primary = %primary_url, "Resolved primary classpath entry");

    let mut resolution = ClasspathResolution {
        entries: vec![primary_url.to_string()],
        warnings: Vec::new(),
    };

    let secondary = match build.lib_dir() {
        Some(lib_dir) => match library_entries(lib_dir) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Can't list library directory {}: {}", lib_dir.display(), e);
                resolution.warnings.push(ResolutionWarning::UnreadableLibDir {
                    path: lib_dir.to_path_buf(),
                    reason: e.to_string(),
                });
                Vec::new()
            }
        },
        None => deployable_artifacts(artifacts),
    };

    for path in secondary {
        match file_url(&path) {
            Ok(url) => resolution.entries.push(url.to_string()),
            Err(e) => {
                warn!("{}", e);
                resolution.warnings.push(e.into());
            }
        }
    }

    debug!(
        entries = resolution.entries.len(),
        warnings = resolution.warnings.len(),
        "Resolved classpath"
    );
    Ok(resolution)
}

/// Convert a path to its absolute `file://` URL.
///
/// Relative paths are anchored at the current directory. Existing directories
/// get a trailing slash.
pub fn file_url(path: &Path) -> std::result::Result<Url, EncodingError> {
    let absolute = std::path::absolute(path).map_err(|e| EncodingError::new(path, e.to_string()))?;

    let url = if absolute.is_dir() {
        Url::from_directory_path(&absolute)
    } else {
        Url::from_file_path(&absolute)
    };

    url.map_err(|()| EncodingError::new(path, "path has no file URL form"))
}

/// Jar and zip files directly inside `dir`, in listing order
fn library_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.as_encoded_bytes();
        if !LIBRARY_SUFFIXES
            .iter()
            .any(|suffix| name.ends_with(suffix.as_bytes()))
        {
            continue;
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        paths.push(entry.path());
    }
    Ok(paths)
}

fn deployable_artifacts(artifacts: &[ArtifactRef]) -> Vec<PathBuf> {
    artifacts
        .iter()
        .filter(|artifact| {
            let keep = artifact.scope.is_deployable();
            if !keep {
                debug!(
                    "Skipping {} dependency {}",
                    artifact.scope,
                    artifact.path.display()
                );
            }
            keep
        })
        .map(|artifact| artifact.path.clone())
        .collect()
}
