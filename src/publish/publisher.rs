//! Main publisher engine - walks the service list and drives build/push

use crate::{
    core::{FailurePolicy, ImageTag, PublishConfig, RegistryConfig, RunReport, ServiceOutcome, ServiceReport},
    docker::ContainerCli,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

/// Events that can occur during a publisher run
#[derive(Debug, Clone)]
pub enum PublishEvent {
    RunStarted {
        run_id: Uuid,
        total: usize,
    },
    ServiceStarted {
        service: String,
    },
    ServiceSkipped {
        service: String,
    },
    ImageBuilt {
        service: String,
        tag: ImageTag,
    },
    BuildFailed {
        service: String,
        tag: ImageTag,
        error: String,
    },
    ImagePushed {
        service: String,
        tag: ImageTag,
    },
    PushFailed {
        service: String,
        tag: ImageTag,
        error: String,
    },
    /// The optimistic per-service success notice. Under the default
    /// `Continue` policy this fires even after a failed build or push;
    /// the run report records the real outcome.
    ServicePublished {
        service: String,
        tag: ImageTag,
    },
    RunCompleted {
        run_id: Uuid,
        published: usize,
        skipped: usize,
        failed: usize,
        halted: bool,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(PublishEvent) + Send + Sync>;

/// How services are walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishStrategy {
    /// One service at a time, in configured order (the default; preserves
    /// console output ordering)
    #[default]
    Sequential,

    /// At most N build/push sequences in flight at once. Per-service
    /// console output may interleave; the run report keeps configured order.
    LimitedParallel(usize),
}

/// Batch image publisher
pub struct Publisher<C> {
    client: Arc<C>,
    strategy: PublishStrategy,
    workdir: PathBuf,
    event_handlers: Arc<Mutex<Vec<EventHandler>>>,
}

impl<C: ContainerCli + 'static> Publisher<C> {
    pub fn new(client: C, strategy: PublishStrategy) -> Self {
        Self {
            client: Arc::new(client),
            strategy,
            workdir: PathBuf::from("."),
            event_handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolve service directories against `workdir` instead of the
    /// current working directory
    pub fn with_workdir<P: Into<PathBuf>>(mut self, workdir: P) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Add an event handler
    pub async fn add_event_handler<F>(&self, handler: F)
    where
        F: Fn(PublishEvent) + Send + Sync + 'static,
    {
        self.event_handlers.lock().await.push(Arc::new(handler));
    }

    /// Process every configured service and report the run.
    ///
    /// The run always terminates and always emits `RunCompleted`; whether a
    /// failed build or push cuts the walk short is decided by the config's
    /// failure policy.
    pub async fn execute(&self, config: &PublishConfig) -> RunReport {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let policy = config.on_failure;

        // Halting mid-run only has a defined order sequentially
        let strategy = match (self.strategy, policy) {
            (PublishStrategy::LimitedParallel(_), FailurePolicy::Halt) => {
                warn!("Halt policy forces sequential processing");
                PublishStrategy::Sequential
            }
            (strategy, _) => strategy,
        };

        info!(
            "Starting publisher run {} ({} services)",
            run_id,
            config.services.len()
        );
        emit(
            &self.event_handlers,
            PublishEvent::RunStarted {
                run_id,
                total: config.services.len(),
            },
        )
        .await;

        let (services, halted) = match strategy {
            PublishStrategy::Sequential => self.run_sequential(config, policy).await,
            PublishStrategy::LimitedParallel(max) => {
                (self.run_parallel(config, policy, max).await, false)
            }
        };

        let report = RunReport {
            run_id,
            started_at,
            completed_at: chrono::Utc::now(),
            services,
            halted,
        };

        info!(
            "Publisher run {} finished: {} published, {} skipped, {} failed",
            run_id,
            report.published(),
            report.skipped(),
            report.failed()
        );
        emit(
            &self.event_handlers,
            PublishEvent::RunCompleted {
                run_id,
                published: report.published(),
                skipped: report.skipped(),
                failed: report.failed(),
                halted,
            },
        )
        .await;

        report
    }

    async fn run_sequential(
        &self,
        config: &PublishConfig,
        policy: FailurePolicy,
    ) -> (Vec<ServiceReport>, bool) {
        let mut reports = Vec::with_capacity(config.services.len());

        for service in &config.services {
            let report = publish_service(
                self.client.clone(),
                self.event_handlers.clone(),
                config.registry.clone(),
                self.workdir.clone(),
                service.clone(),
                policy,
            )
            .await;

            let failed = report.outcome.is_failure();
            reports.push(report);

            if failed && policy == FailurePolicy::Halt {
                return (reports, true);
            }
        }

        (reports, false)
    }

    async fn run_parallel(
        &self,
        config: &PublishConfig,
        policy: FailurePolicy,
        max: usize,
    ) -> Vec<ServiceReport> {
        let semaphore = Arc::new(Semaphore::new(max.max(1)));
        let mut set = JoinSet::new();

        for (index, service) in config.services.iter().enumerate() {
            let client = self.client.clone();
            let handlers = self.event_handlers.clone();
            let registry = config.registry.clone();
            let workdir = self.workdir.clone();
            let service = service.clone();
            let semaphore = semaphore.clone();

            set.spawn(async move {
                // The semaphore is never closed, so acquire cannot fail
                let _permit = semaphore.acquire_owned().await;
                let report =
                    publish_service(client, handlers, registry, workdir, service, policy).await;
                (index, report)
            });
        }

        let mut slots: Vec<Option<ServiceReport>> = Vec::new();
        slots.resize_with(config.services.len(), || None);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, report)) => slots[index] = Some(report),
                Err(e) => warn!("Publish task panicked: {}", e),
            }
        }

        // Restore configured order; a panicked task dropped its report,
        // so its slot is filled with a failure entry rather than letting
        // the service vanish from the run
        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    let service = config.services[index].clone();
                    let tag = config.registry.image_tag(&service);
                    let now = chrono::Utc::now();
                    ServiceReport {
                        service,
                        outcome: ServiceOutcome::BuildFailed {
                            tag,
                            error: "publish task panicked".to_string(),
                        },
                        started_at: now,
                        finished_at: now,
                    }
                })
            })
            .collect()
    }
}

/// Process one service: fresh directory check, then build and push.
async fn publish_service<C: ContainerCli>(
    client: Arc<C>,
    handlers: Arc<Mutex<Vec<EventHandler>>>,
    registry: RegistryConfig,
    workdir: PathBuf,
    service: String,
    policy: FailurePolicy,
) -> ServiceReport {
    let started_at = chrono::Utc::now();

    emit(
        &handlers,
        PublishEvent::ServiceStarted {
            service: service.clone(),
        },
    )
    .await;

    // Existence is re-checked fresh on every run, never cached
    let context_dir = workdir.join(&service);
    if !context_dir.is_dir() {
        info!("Skipping {}: no such directory", service);
        emit(
            &handlers,
            PublishEvent::ServiceSkipped {
                service: service.clone(),
            },
        )
        .await;
        return ServiceReport {
            service,
            outcome: ServiceOutcome::Skipped,
            started_at,
            finished_at: chrono::Utc::now(),
        };
    }

    let tag = registry.image_tag(&service);

    let build_error = match client.build(&tag, &context_dir).await {
        Ok(()) => {
            emit(
                &handlers,
                PublishEvent::ImageBuilt {
                    service: service.clone(),
                    tag: tag.clone(),
                },
            )
            .await;
            None
        }
        Err(e) => {
            warn!("Build failed for {}: {}", service, e);
            emit(
                &handlers,
                PublishEvent::BuildFailed {
                    service: service.clone(),
                    tag: tag.clone(),
                    error: e.to_string(),
                },
            )
            .await;
            Some(e.to_string())
        }
    };

    // Under Halt a failed build ends the service right here. Under
    // Continue the push is still attempted anyway.
    if let Some(error) = &build_error {
        if policy == FailurePolicy::Halt {
            return ServiceReport {
                service,
                outcome: ServiceOutcome::BuildFailed {
                    tag,
                    error: error.clone(),
                },
                started_at,
                finished_at: chrono::Utc::now(),
            };
        }
    }

    let push_error = match client.push(&tag).await {
        Ok(()) => {
            emit(
                &handlers,
                PublishEvent::ImagePushed {
                    service: service.clone(),
                    tag: tag.clone(),
                },
            )
            .await;
            None
        }
        Err(e) => {
            warn!("Push failed for {}: {}", service, e);
            emit(
                &handlers,
                PublishEvent::PushFailed {
                    service: service.clone(),
                    tag: tag.clone(),
                    error: e.to_string(),
                },
            )
            .await;
            Some(e.to_string())
        }
    };

    let outcome = match (build_error, push_error) {
        (Some(error), _) => ServiceOutcome::BuildFailed { tag: tag.clone(), error },
        (None, Some(error)) => ServiceOutcome::PushFailed { tag: tag.clone(), error },
        (None, None) => ServiceOutcome::Published { tag: tag.clone() },
    };

    // The optimistic success notice is part of the console contract under
    // Continue; under Halt only a real publish earns it.
    if policy == FailurePolicy::Continue || !outcome.is_failure() {
        emit(
            &handlers,
            PublishEvent::ServicePublished {
                service: service.clone(),
                tag,
            },
        )
        .await;
    }

    ServiceReport {
        service,
        outcome,
        started_at,
        finished_at: chrono::Utc::now(),
    }
}

/// Emit an event to all handlers
async fn emit(handlers: &Mutex<Vec<EventHandler>>, event: PublishEvent) {
    let handlers = handlers.lock().await;
    for handler in handlers.iter() {
        handler(event.clone());
    }
}
