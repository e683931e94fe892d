mod cli;
mod core;
mod docker;
mod publish;

use anyhow::{Context, Result};
use cli::commands::{PublishCommand, TagsCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use core::PublishConfig;
use docker::{subprocess::DEFAULT_TIMEOUT_SECS, DockerCli};
use publish::{PublishStrategy, Publisher};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Publish(cmd) => publish_services(cmd).await?,
        Command::Validate(cmd) => validate_config(cmd)?,
        Command::Tags(cmd) => print_tags(cmd)?,
    }

    Ok(())
}

/// Load the config file and layer environment and flag overrides on top
fn load_config(file: &str, cmd: Option<&PublishCommand>) -> Result<PublishConfig> {
    let mut config = PublishConfig::from_file(file)
        .with_context(|| format!("Failed to load publish config from {}", file))?;

    config.apply_env();

    if let Some(cmd) = cmd {
        if let Some(region) = &cmd.region {
            config.registry.region = region.clone();
        }
        if let Some(project) = &cmd.project {
            config.registry.project = project.clone();
        }
        if let Some(repository) = &cmd.repository {
            config.registry.repository = repository.clone();
        }
        if let Some(base_image) = &cmd.base_image {
            config.registry.base_image = base_image.clone();
        }
        if let Some(docker) = &cmd.docker {
            config.docker_path = Some(docker.clone());
        }
        if let Some(policy) = cmd.on_failure {
            config.on_failure = policy.into();
        }
    }

    // Overrides may have blanked a field; check again
    config.validate()?;
    Ok(config)
}

async fn publish_services(cmd: &PublishCommand) -> Result<()> {
    let config = load_config(&cmd.file, Some(cmd))?;

    println!(
        "{} Loaded publish config: {} ({} services)",
        INFO,
        style(&cmd.file).bold(),
        style(config.services.len()).cyan()
    );

    if cmd.dry_run {
        let workdir = std::path::Path::new(cmd.workdir.as_deref().unwrap_or("."));
        for service in &config.services {
            let tag = config.registry.image_tag(service);
            if workdir.join(service).is_dir() {
                println!("  {} {}", style(service).bold(), style(tag).green());
            } else {
                println!(
                    "  {} {} {}",
                    style(service).bold(),
                    style(tag).dim(),
                    style("(directory missing, would skip)").yellow()
                );
            }
        }
        return Ok(());
    }

    let client = DockerCli::new(
        config.docker_path.clone().unwrap_or_else(|| "docker".to_string()),
        config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    let strategy = if cmd.jobs > 1 {
        PublishStrategy::LimitedParallel(cmd.jobs)
    } else {
        PublishStrategy::Sequential
    };

    let mut publisher = Publisher::new(client, strategy);
    if let Some(workdir) = &cmd.workdir {
        publisher = publisher.with_workdir(workdir);
    }

    // Console output contract is rendered from publish events
    publisher
        .add_event_handler(|event| {
            if let Some(line) = format_publish_event(&event) {
                println!("{}", line);
            }
        })
        .await;

    println!();
    let report = publisher.execute(&config).await;

    // A halted run is the only failing exit; under the default Continue
    // policy the run always exits successfully
    if report.halted {
        std::process::exit(1);
    }

    Ok(())
}

fn validate_config(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating publish config...", INFO);

    match load_config(&cmd.file, None) {
        Ok(config) => {
            println!("{} Publish configuration is valid!", CHECK);
            println!("  Registry: {}", style(config.registry.image_tag("<service>")).bold());
            println!("  Services: {}", style(config.services.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn print_tags(cmd: &TagsCommand) -> Result<()> {
    let config = load_config(&cmd.file, None)?;

    if cmd.json {
        let tags: Vec<_> = config
            .services
            .iter()
            .map(|service| {
                serde_json::json!({
                    "service": service,
                    "tag": config.registry.image_tag(service),
                })
            })
            .collect();
        let data = serde_json::json!({ "tags": tags });
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        for service in &config.services {
            println!(
                "{} {}",
                style(format!("{:>20}", service)).bold(),
                config.registry.image_tag(service)
            );
        }
    }

    Ok(())
}
