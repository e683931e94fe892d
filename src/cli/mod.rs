//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{PublishCommand, TagsCommand, ValidateCommand};

/// Batch container image build-and-push tool
#[derive(Debug, Parser, Clone)]
#[command(name = "regpush")]
#[command(author = "regpush Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Build and push a container image per configured service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build and push every configured service image
    Publish(PublishCommand),

    /// Validate a publish configuration
    Validate(ValidateCommand),

    /// Print the derived image tag for every configured service
    Tags(TagsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
