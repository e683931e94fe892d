//! Test utility functions for regpush scenarios

use regpush::core::{FailurePolicy, ImageTag, PublishConfig, RegistryConfig, RunReport};
use regpush::docker::{ContainerCli, ContainerError};
use regpush::publish::{PublishEvent, PublishStrategy, Publisher};

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One recorded call against the mock container tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Build { tag: String, context: PathBuf },
    Push { tag: String },
}

/// Mock container tool that records invocations and fails on demand
pub struct MockDocker {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    fail_build_for: HashSet<String>,
    fail_push_for: HashSet<String>,
}

impl MockDocker {
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            fail_build_for: HashSet::new(),
            fail_push_for: HashSet::new(),
        }
    }

    /// Make builds fail for the given service name
    pub fn fail_build_on(mut self, service: &str) -> Self {
        self.fail_build_for.insert(service.to_string());
        self
    }

    /// Make pushes fail for the given service name
    pub fn fail_push_on(mut self, service: &str) -> Self {
        self.fail_push_for.insert(service.to_string());
        self
    }

    /// Handle to the shared invocation log; keep one before handing the
    /// mock to the publisher
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        self.invocations.clone()
    }

    fn matches(&self, set: &HashSet<String>, tag: &ImageTag) -> bool {
        set.iter()
            .any(|service| tag.as_str().contains(&format!("_{}:", service)))
    }
}

#[async_trait]
impl ContainerCli for MockDocker {
    async fn build(&self, tag: &ImageTag, context_dir: &Path) -> Result<(), ContainerError> {
        self.invocations.lock().unwrap().push(Invocation::Build {
            tag: tag.as_str().to_string(),
            context: context_dir.to_path_buf(),
        });

        if self.matches(&self.fail_build_for, tag) {
            return Err(ContainerError::NonZeroExit { code: 1 });
        }
        Ok(())
    }

    async fn push(&self, tag: &ImageTag) -> Result<(), ContainerError> {
        self.invocations.lock().unwrap().push(Invocation::Push {
            tag: tag.as_str().to_string(),
        });

        if self.matches(&self.fail_push_for, tag) {
            return Err(ContainerError::NonZeroExit { code: 1 });
        }
        Ok(())
    }
}

/// Registry used across scenarios
pub fn demo_registry() -> RegistryConfig {
    RegistryConfig {
        region: "asia-south1".to_string(),
        project: "demo-project".to_string(),
        repository: "demo-repo".to_string(),
        base_image: "observability-demo".to_string(),
    }
}

/// Expected fully qualified tag for a service under [`demo_registry`]
pub fn demo_tag(service: &str) -> String {
    format!(
        "asia-south1-docker.pkg.dev/demo-project/demo-repo/observability-demo_{}:latest",
        service
    )
}

/// Publish config naming the given services, default policy
pub fn config_for(services: &[&str]) -> PublishConfig {
    config_with_policy(services, FailurePolicy::Continue)
}

pub fn config_with_policy(services: &[&str], on_failure: FailurePolicy) -> PublishConfig {
    PublishConfig {
        registry: demo_registry(),
        services: services.iter().map(|s| s.to_string()).collect(),
        on_failure,
        docker_path: None,
        timeout_secs: None,
    }
}

/// Scratch working directory containing only the named service directories
pub fn workspace_with_dirs(dirs: &[&str]) -> TempDir {
    let workdir = TempDir::new().unwrap();
    for dir in dirs {
        std::fs::create_dir(workdir.path().join(dir)).unwrap();
    }
    workdir
}

/// Run the publisher over `config` with the mock tool, collecting every
/// emitted event alongside the run report
pub async fn run_publisher(
    mock: MockDocker,
    config: &PublishConfig,
    strategy: PublishStrategy,
    workdir: &Path,
) -> (RunReport, Vec<PublishEvent>) {
    let events: Arc<Mutex<Vec<PublishEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let publisher = Publisher::new(mock, strategy).with_workdir(workdir);
    publisher
        .add_event_handler(move |event| {
            sink.lock().unwrap().push(event);
        })
        .await;

    let report = publisher.execute(config).await;
    let events = events.lock().unwrap().clone();
    (report, events)
}

/// Services named by `ServicePublished` events, in emission order
pub fn published_services(events: &[PublishEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            PublishEvent::ServicePublished { service, .. } => Some(service.clone()),
            _ => None,
        })
        .collect()
}

/// Services named by `ServiceSkipped` events, in emission order
pub fn skipped_services(events: &[PublishEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            PublishEvent::ServiceSkipped { service, .. } => Some(service.clone()),
            _ => None,
        })
        .collect()
}

/// True when exactly one `RunCompleted` event was emitted, as the last event
pub fn completed_last(events: &[PublishEvent]) -> bool {
    let count = events
        .iter()
        .filter(|event| matches!(event, PublishEvent::RunCompleted { .. }))
        .count();
    count == 1 && matches!(events.last(), Some(PublishEvent::RunCompleted { .. }))
}
