//! Publish configuration from YAML, environment, and flag overrides

use crate::core::RegistryConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables consulted by [`PublishConfig::apply_env`]
pub const ENV_REGION: &str = "REGPUSH_REGION";
pub const ENV_PROJECT: &str = "REGPUSH_PROJECT";
pub const ENV_REPOSITORY: &str = "REGPUSH_REPOSITORY";
pub const ENV_BASE_IMAGE: &str = "REGPUSH_BASE_IMAGE";

/// What to do when a build or push reports failure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, record it in the run report, and keep going.
    /// A failed build still gets its push attempt and its success
    /// notice; only the run report carries the real outcome.
    #[default]
    Continue,

    /// Stop the run at the first failed build or push
    Halt,
}

/// Top-level publish configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Registry the images are pushed to
    pub registry: RegistryConfig,

    /// Ordered list of service names; each doubles as a build-context
    /// directory relative to the working directory
    pub services: Vec<String>,

    /// Failure policy for build/push errors
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Path to the container CLI binary (defaults to "docker" on PATH)
    #[serde(default)]
    pub docker_path: Option<String>,

    /// Timeout for each build/push invocation, in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl PublishConfig {
    /// Load publish configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse publish configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PublishConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the publish configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("registry.region", &self.registry.region),
            ("registry.project", &self.registry.project),
            ("registry.repository", &self.registry.repository),
            ("registry.base_image", &self.registry.base_image),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("Missing required config field: {}", field);
            }
        }

        if self.services.is_empty() {
            anyhow::bail!("Service list is empty - nothing to publish");
        }

        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if service.trim().is_empty() {
                anyhow::bail!("Service names must not be empty");
            }
            // Service names double as relative build-context directories
            if service.contains('/') || service.contains('\\') || service.contains(char::is_whitespace) {
                anyhow::bail!(
                    "Invalid service name '{}': must be a plain directory name",
                    service
                );
            }
            if !seen.insert(service) {
                anyhow::bail!("Duplicate service name: {}", service);
            }
        }

        Ok(())
    }

    /// Overlay registry coordinates from the process environment.
    ///
    /// Only variables that are set replace the file-provided values.
    pub fn apply_env(&mut self) {
        for (var, field) in [
            (ENV_REGION, &mut self.registry.region),
            (ENV_PROJECT, &mut self.registry.project),
            (ENV_REPOSITORY, &mut self.registry.repository),
            (ENV_BASE_IMAGE, &mut self.registry.base_image),
        ] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    *field = value;
                }
            }
        }
    }
}
