//! Application descriptor sent to `/apps`

use crate::config::ApplicationConfig;

/// Describes the application being registered. Built once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    name: Option<String>,
    description: Option<String>,
    classpaths: Vec<String>,
}

impl ApplicationDescriptor {
    pub fn new(
        name: Option<String>,
        description: Option<String>,
        classpaths: Vec<String>,
    ) -> Self {
        Self {
            name,
            description,
            classpaths,
        }
    }

    /// `None` means the name is left out of the document entirely
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn classpaths(&self) -> &[String] {
        &self.classpaths
    }
}

/// Assemble the descriptor from configuration and the resolved classpath.
///
/// The configured name wins; otherwise the project name supplied by the build
/// environment is used. Empty names count as absent.
pub fn build_descriptor(
    application: &ApplicationConfig,
    classpaths: Vec<String>,
    fallback_name: Option<&str>,
) -> ApplicationDescriptor {
    let name = application
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| fallback_name.filter(|name| !name.is_empty()))
        .map(str::to_string);

    ApplicationDescriptor::new(name, application.description.clone(), classpaths)
}
