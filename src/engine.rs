//! Engine facade — asset-level operations over an injected repository
//!
//! Wires the fitter, detector, valuation engine, and job runner against a
//! `ProductionStore`. Callers that already hold series/models in hand can use
//! the component APIs directly; this facade covers the common path of
//! operating on stored assets by id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::anomaly::AnomalyDetector;
use crate::config::EngineConfig;
use crate::decline::{CurveFitter, FitError, Forecaster};
use crate::economics::{ScenarioError, ValuationEngine};
use crate::jobs::{JobError, JobPayload, JobRunner};
use crate::storage::{ProductionStore, StoreError};
use crate::types::{
    Anomaly, DeclineCurveKind, DeclineCurveModel, EconomicsRunResult, EconomicsScenarioInput,
    ForecastPoint, MeasurementKind, SimulationJob,
};

/// Facade-level failures
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Asset-level forecasting & valuation operations
pub struct ForecastEngine {
    store: Arc<dyn ProductionStore>,
    cfg: EngineConfig,
    fitter: CurveFitter,
    detector: AnomalyDetector,
    jobs: JobRunner,
}

impl ForecastEngine {
    /// Must be called from within a tokio runtime (the job dispatcher is
    /// spawned here).
    pub fn new(store: Arc<dyn ProductionStore>, cfg: EngineConfig) -> Self {
        info!(backend = store.backend_name(), "Forecast engine starting");
        Self {
            store,
            cfg,
            fitter: CurveFitter::with_config(cfg.fit),
            detector: AnomalyDetector::with_config(cfg.anomaly),
            jobs: JobRunner::new(cfg),
        }
    }

    /// Fit a decline model to an asset's stored series and persist it.
    pub fn fit_asset(
        &self,
        asset_id: &str,
        kind: MeasurementKind,
        curve: DeclineCurveKind,
    ) -> Result<DeclineCurveModel, EngineError> {
        let series = self.store.rate_series(asset_id, kind)?;
        let model = self.fitter.fit(asset_id, &series, curve)?;
        self.store.store_model(&model)?;

        info!(
            asset_id,
            model_id = %model.id,
            r2 = model.quality.r2,
            "Decline model fitted"
        );
        Ok(model)
    }

    /// Deterministic forecast from a stored model.
    pub fn forecast_model(
        &self,
        model_id: &str,
        start: DateTime<Utc>,
        horizon_months: u32,
    ) -> Result<Vec<ForecastPoint>, EngineError> {
        let model = self.lookup_model(model_id)?;
        Ok(Forecaster::forecast(&model, start, horizon_months).collect())
    }

    /// Scan an asset's stored series for anomalies and persist any findings.
    pub fn scan_asset(
        &self,
        asset_id: &str,
        kind: MeasurementKind,
    ) -> Result<Vec<Anomaly>, EngineError> {
        let series = self.store.rate_series(asset_id, kind)?;
        let anomalies = self.detector.detect(asset_id, &series);
        if !anomalies.is_empty() {
            self.store.store_anomalies(&anomalies)?;
            info!(asset_id, count = anomalies.len(), "Anomalies flagged");
        }
        Ok(anomalies)
    }

    /// Queue a Monte Carlo band simulation for a stored model.
    pub fn submit_simulation(
        &self,
        model_id: &str,
        start: DateTime<Utc>,
        iterations: Option<u32>,
        horizon_months: u32,
        seed: Option<u64>,
    ) -> Result<SimulationJob, EngineError> {
        let model = self.lookup_model(model_id)?;
        let iterations = iterations.unwrap_or(self.cfg.monte_carlo.default_iterations);

        Ok(self.jobs.submit(JobPayload::MonteCarlo {
            model,
            start,
            iterations,
            horizon_months,
            seed,
        }))
    }

    /// Queue an economics run (same submit/poll pattern as simulations).
    pub fn submit_valuation(&self, input: EconomicsScenarioInput) -> SimulationJob {
        self.jobs.submit(JobPayload::Economics {
            input: Box::new(input),
        })
    }

    /// Synchronous valuation, for callers that don't need the job wrapper.
    pub fn run_valuation(
        &self,
        input: &EconomicsScenarioInput,
    ) -> Result<EconomicsRunResult, EngineError> {
        Ok(ValuationEngine::with_config(self.cfg.irr).run(input)?)
    }

    /// Poll a submitted job.
    pub fn job_status(&self, id: &str) -> Result<SimulationJob, EngineError> {
        Ok(self.jobs.get_status(id)?)
    }

    fn lookup_model(&self, model_id: &str) -> Result<DeclineCurveModel, EngineError> {
        self.store
            .get_model(model_id)?
            .ok_or_else(|| EngineError::ModelNotFound(model_id.to_string()))
    }
}
