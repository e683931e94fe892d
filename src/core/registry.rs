//! Registry coordinates and image tag derivation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinates of the remote artifact registry images are pushed to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Registry region, e.g. "asia-south1"
    pub region: String,

    /// Project identifier within the registry
    pub project: String,

    /// Repository name within the project
    pub repository: String,

    /// Base image name prefixed to every service image
    #[serde(rename = "base_image")]
    pub base_image: String,
}

impl RegistryConfig {
    /// Derive the fully qualified tag for a service image.
    ///
    /// Pure function of the registry coordinates and the service name:
    /// `{region}-docker.pkg.dev/{project}/{repo}/{base}_{service}:latest`
    pub fn image_tag(&self, service: &str) -> ImageTag {
        ImageTag(format!(
            "{}-docker.pkg.dev/{}/{}/{}_{}:latest",
            self.region, self.project, self.repository, self.base_image, service
        ))
    }
}

/// A fully qualified, versioned image name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ImageTag(String);

impl ImageTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::ffi::OsStr> for ImageTag {
    fn as_ref(&self) -> &std::ffi::OsStr {
        self.0.as_ref()
    }
}
