//! CLI command definitions

use crate::core::FailurePolicy;
use clap::Args;

/// Build and push every configured service image
#[derive(Debug, Args, Clone)]
pub struct PublishCommand {
    /// Path to publish config YAML file
    #[arg(short, long, default_value = "publish.yaml")]
    pub file: String,

    /// Override the registry region
    #[arg(long)]
    pub region: Option<String>,

    /// Override the registry project identifier
    #[arg(long)]
    pub project: Option<String>,

    /// Override the repository name
    #[arg(long)]
    pub repository: Option<String>,

    /// Override the base image name
    #[arg(long)]
    pub base_image: Option<String>,

    /// Path to the container CLI binary
    #[arg(long)]
    pub docker: Option<String>,

    /// Directory containing the service build contexts
    #[arg(long)]
    pub workdir: Option<String>,

    /// Maximum build/push sequences in flight (1 = sequential)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// What to do when a build or push fails
    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicyArg>,

    /// Resolve and print tags without invoking the container tool
    #[arg(long)]
    pub dry_run: bool,
}

/// Validate a publish configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to publish config YAML file
    #[arg(short, long, default_value = "publish.yaml")]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Print the derived image tag for every configured service
#[derive(Debug, Args, Clone)]
pub struct TagsCommand {
    /// Path to publish config YAML file
    #[arg(short, long, default_value = "publish.yaml")]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Failure policy argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FailurePolicyArg {
    Continue,
    Halt,
}

impl From<FailurePolicyArg> for FailurePolicy {
    fn from(arg: FailurePolicyArg) -> Self {
        match arg {
            FailurePolicyArg::Continue => FailurePolicy::Continue,
            FailurePolicyArg::Halt => FailurePolicy::Halt,
        }
    }
}
