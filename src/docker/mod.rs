//! Container build/push tool invoked as an opaque external collaborator

pub mod subprocess;

use crate::core::ImageTag;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use subprocess::DockerCli;

/// Error types for container tool invocations
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("failed to spawn container tool: {0}")]
    Spawn(String),

    #[error("container tool exited with code {code}")]
    NonZeroExit { code: i32 },

    #[error("container tool timed out after {0} seconds")]
    Timeout(u64),
}

/// Trait for the external build/push tool - allows for different implementations
#[async_trait]
pub trait ContainerCli: Send + Sync {
    /// Produce a local image named `tag` from the contents of `context_dir`
    async fn build(&self, tag: &ImageTag, context_dir: &Path) -> Result<(), ContainerError>;

    /// Upload the previously built image `tag` to the remote registry
    async fn push(&self, tag: &ImageTag) -> Result<(), ContainerError>;
}
