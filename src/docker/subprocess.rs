//! Docker CLI subprocess client

use crate::core::ImageTag;
use crate::docker::{ContainerCli, ContainerError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default per-invocation timeout. Image builds can be slow; pushes of
/// large layers over WAN links even slower.
pub const DEFAULT_TIMEOUT_SECS: u64 = 1800;

/// Client that shells out to the docker CLI for builds and pushes
#[derive(Debug, Clone)]
pub struct DockerCli {
    /// Path to the docker executable
    docker_path: String,

    /// Timeout for each invocation in seconds
    timeout_secs: u64,
}

impl DockerCli {
    /// Create a new docker subprocess client
    ///
    /// # Arguments
    /// * `docker_path` - Path to the docker executable (e.g., "docker", "/usr/bin/podman")
    /// * `timeout_secs` - Timeout for each invocation in seconds
    pub fn new(docker_path: String, timeout_secs: u64) -> Self {
        Self {
            docker_path,
            timeout_secs,
        }
    }

    #[cfg(test)]
    pub fn docker_path(&self) -> &str {
        &self.docker_path
    }

    /// Run one docker invocation and map its exit status to a result.
    ///
    /// Stdout/stderr are inherited so the tool's own progress and
    /// diagnostics reach the console directly.
    async fn run(&self, args: &[&std::ffi::OsStr]) -> Result<(), ContainerError> {
        debug!("Spawning {} {:?}", self.docker_path, args);

        let timeout_duration = Duration::from_secs(self.timeout_secs);

        let result = timeout(
            timeout_duration,
            Command::new(&self.docker_path)
                .args(args)
                .kill_on_drop(true)
                .status(),
        )
        .await
        .map_err(|_| ContainerError::Timeout(self.timeout_secs))?;

        let status = result.map_err(|e| ContainerError::Spawn(e.to_string()))?;

        if !status.success() {
            let code = status.code().unwrap_or(-1);
            warn!("{} exited with code {}", self.docker_path, code);
            return Err(ContainerError::NonZeroExit { code });
        }

        Ok(())
    }
}

#[async_trait]
impl ContainerCli for DockerCli {
    async fn build(&self, tag: &ImageTag, context_dir: &Path) -> Result<(), ContainerError> {
        let args: Vec<&std::ffi::OsStr> = vec![
            "build".as_ref(),
            "-t".as_ref(),
            tag.as_ref(),
            context_dir.as_os_str(),
        ];
        self.run(&args).await
    }

    async fn push(&self, tag: &ImageTag) -> Result<(), ContainerError> {
        let args: Vec<&std::ffi::OsStr> = vec!["push".as_ref(), tag.as_ref()];
        self.run(&args).await
    }
}
