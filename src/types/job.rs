//! Asynchronous job records for Monte Carlo and economics runs
//!
//! Lifecycle: `Queued -> Running -> {Completed, Failed}`. The two terminal
//! states admit no further transitions, and there is no cancellation. A job
//! record is written only by the background task that owns it; pollers read
//! concurrently and may observe `Running` with stale progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::decline::PercentileBand;
use super::economics::EconomicsRunResult;

/// What kind of work a job carries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    MonteCarlo,
    Economics,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::MonteCarlo => write!(f, "monte_carlo"),
            JobKind::Economics => write!(f, "economics"),
        }
    }
}

/// Job lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// Completed and Failed admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "QUEUED"),
            JobStatus::Running => write!(f, "RUNNING"),
            JobStatus::Completed => write!(f, "COMPLETED"),
            JobStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// Successful output of a job, by kind
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum JobResult {
    Band(PercentileBand),
    Economics(Box<EconomicsRunResult>),
}

/// A submitted simulation/valuation job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationJob {
    pub id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    /// 0-100; checkpoints at 10 (started), 50 (midpoint), 100 (done)
    pub progress: u8,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SimulationJob {
    /// Fresh record in the `Queued` state
    pub fn queued(id: String, kind: JobKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            status: JobStatus::Queued,
            progress: 0,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}
