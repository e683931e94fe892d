//! Per-service outcomes and the overall run report

use crate::core::ImageTag;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Terminal outcome of processing one service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ServiceOutcome {
    /// No same-named directory existed; nothing was invoked
    Skipped,

    /// Build and push both reported success
    Published { tag: ImageTag },

    /// The build command reported failure
    BuildFailed { tag: ImageTag, error: String },

    /// The build succeeded but the push command reported failure
    PushFailed { tag: ImageTag, error: String },
}

impl ServiceOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ServiceOutcome::BuildFailed { .. } | ServiceOutcome::PushFailed { .. }
        )
    }
}

/// Record of one processed service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReport {
    pub service: String,
    #[serde(flatten)]
    pub outcome: ServiceOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Summary of a whole publisher run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// One entry per processed service, in configured order
    pub services: Vec<ServiceReport>,

    /// True when a Halt policy stopped the run before the end of the list
    pub halted: bool,
}

impl RunReport {
    pub fn published(&self) -> usize {
        self.services
            .iter()
            .filter(|r| matches!(r.outcome, ServiceOutcome::Published { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.services
            .iter()
            .filter(|r| matches!(r.outcome, ServiceOutcome::Skipped))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.services.iter().filter(|r| r.outcome.is_failure()).count()
    }
}
