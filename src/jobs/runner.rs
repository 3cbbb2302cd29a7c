//! Channel-backed job runner
//!
//! Lifecycle per job: `Queued` (on submit) -> `Running` (progress 10) ->
//! midpoint checkpoint (progress 50) -> `Completed` (progress 100, result
//! set) or `Failed` (error message set). Terminal states never transition
//! again, and failures never propagate to the submitter — a panic inside the
//! compute is caught at the blocking-task join and recorded like any other
//! error.
//!
//! Each work order is consumed exactly once from the channel (at-most-once
//! execution). A job's record is written only by the task executing it;
//! pollers take read locks and may observe `Running` with stale progress.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::decline::MonteCarloSimulator;
use crate::economics::ValuationEngine;
use crate::types::{
    DeclineCurveModel, EconomicsScenarioInput, JobKind, JobResult, JobStatus, SimulationJob,
};

/// Status-query failures
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job not found: {0}")]
    NotFound(String),
}

/// Work carried by a submitted job
#[derive(Debug, Clone)]
pub enum JobPayload {
    MonteCarlo {
        model: DeclineCurveModel,
        start: DateTime<Utc>,
        iterations: u32,
        horizon_months: u32,
        /// `None` seeds from entropy
        seed: Option<u64>,
    },
    Economics {
        input: Box<EconomicsScenarioInput>,
    },
}

impl JobPayload {
    fn kind(&self) -> JobKind {
        match self {
            JobPayload::MonteCarlo { .. } => JobKind::MonteCarlo,
            JobPayload::Economics { .. } => JobKind::Economics,
        }
    }
}

type Registry = Arc<RwLock<HashMap<String, SimulationJob>>>;

struct WorkOrder {
    id: String,
    payload: JobPayload,
}

/// Fire-and-forget job execution with a polled status registry
#[derive(Clone)]
pub struct JobRunner {
    registry: Registry,
    tx: mpsc::UnboundedSender<WorkOrder>,
}

impl JobRunner {
    /// Start the dispatcher. Must be called from within a tokio runtime.
    pub fn new(cfg: EngineConfig) -> Self {
        let registry: Registry = Arc::new(RwLock::new(HashMap::new()));
        let (tx, mut rx) = mpsc::unbounded_channel::<WorkOrder>();

        let dispatcher_registry = registry.clone();
        tokio::spawn(async move {
            while let Some(order) = rx.recv().await {
                let registry = dispatcher_registry.clone();
                tokio::spawn(execute(registry, order, cfg));
            }
            debug!("Job dispatcher channel closed");
        });

        Self { registry, tx }
    }

    /// Queue a job and return its record immediately, without blocking on the
    /// execution.
    pub fn submit(&self, payload: JobPayload) -> SimulationJob {
        let id = Uuid::new_v4().to_string();
        let job = SimulationJob::queued(id.clone(), payload.kind());

        if let Ok(mut guard) = self.registry.write() {
            guard.insert(id.clone(), job.clone());
        }

        info!(job_id = %id, kind = %payload.kind(), "Job submitted");

        if self.tx.send(WorkOrder { id: id.clone(), payload }).is_err() {
            // dispatcher is gone; record the failure instead of dropping the job
            error!(job_id = %id, "Job dispatcher unavailable");
            update(&self.registry, &id, |job| {
                job.status = JobStatus::Failed;
                job.error = Some("job dispatcher unavailable".to_string());
            });
        }

        self.snapshot(&id).unwrap_or(job)
    }

    /// Current record for a job id.
    pub fn get_status(&self, id: &str) -> Result<SimulationJob, JobError> {
        self.snapshot(id).ok_or_else(|| JobError::NotFound(id.to_string()))
    }

    fn snapshot(&self, id: &str) -> Option<SimulationJob> {
        self.registry.read().ok()?.get(id).cloned()
    }
}

/// Run one job to a terminal state. Never returns an error to the caller —
/// every failure path ends in a `Failed` record.
async fn execute(registry: Registry, order: WorkOrder, cfg: EngineConfig) {
    let WorkOrder { id, payload } = order;

    update(&registry, &id, |job| {
        job.status = JobStatus::Running;
        job.progress = 10;
    });

    let compute_registry = registry.clone();
    let compute_id = id.clone();
    let joined = tokio::task::spawn_blocking(move || {
        run_payload(&compute_registry, &compute_id, payload, cfg)
    })
    .await;

    match joined {
        Ok(Ok(result)) => {
            update(&registry, &id, |job| {
                job.status = JobStatus::Completed;
                job.progress = 100;
                job.result = Some(result);
            });
            info!(job_id = %id, "Job completed");
        }
        Ok(Err(message)) => {
            update(&registry, &id, |job| {
                job.status = JobStatus::Failed;
                job.error = Some(message.clone());
            });
            warn!(job_id = %id, error = %message, "Job failed");
        }
        Err(join_error) => {
            // compute panicked; capture it like any other failure
            let message = format!("job panicked: {}", join_error);
            update(&registry, &id, |job| {
                job.status = JobStatus::Failed;
                job.error = Some(message.clone());
            });
            error!(job_id = %id, error = %message, "Job panicked");
        }
    }
}

/// The CPU-bound work, executed on the blocking pool.
fn run_payload(
    registry: &Registry,
    id: &str,
    payload: JobPayload,
    cfg: EngineConfig,
) -> Result<JobResult, String> {
    match payload {
        JobPayload::MonteCarlo {
            model,
            start,
            iterations,
            horizon_months,
            seed,
        } => {
            let mut simulator = MonteCarloSimulator::with_config(seed, cfg.monte_carlo);
            let band = simulator
                .run_with_progress(&model, start, iterations, horizon_months, |progress| {
                    update(registry, id, |job| job.progress = progress);
                })
                .map_err(|e| e.to_string())?;
            Ok(JobResult::Band(band))
        }
        JobPayload::Economics { input } => {
            update(registry, id, |job| job.progress = 50);
            let result = ValuationEngine::with_config(cfg.irr)
                .run(&input)
                .map_err(|e| e.to_string())?;
            Ok(JobResult::Economics(Box::new(result)))
        }
    }
}

/// Apply a mutation to a job record and stamp `updated_at`.
fn update<F: FnOnce(&mut SimulationJob)>(registry: &Registry, id: &str, mutate: F) {
    match registry.write() {
        Ok(mut guard) => {
            if let Some(job) = guard.get_mut(id) {
                mutate(job);
                job.updated_at = Utc::now();
            }
        }
        Err(_) => warn!(job_id = %id, "Job registry lock poisoned — update dropped"),
    }
}
