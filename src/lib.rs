//! regpush - batch-build and push container images for a list of services

pub mod cli;
pub mod core;
pub mod docker;
pub mod publish;

// Re-export commonly used types
pub use core::{FailurePolicy, ImageTag, PublishConfig, RegistryConfig, RunReport, ServiceOutcome};
pub use docker::{ContainerCli, ContainerError, DockerCli};
pub use publish::{PublishEvent, PublishStrategy, Publisher};
