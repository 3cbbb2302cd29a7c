//! Petrocast: Production Forecasting & Economic Valuation
//!
//! Decline-curve analysis and discounted-cash-flow valuation for oil & gas
//! assets.
//!
//! ## Architecture
//!
//! - **Decline**: curve fitting (OLS in log space), deterministic forecasting,
//!   Monte Carlo percentile bands
//! - **Anomaly**: z-score outlier detection on rate series
//! - **Economics**: scenario -> cash-flow schedule -> NPV/IRR/payout KPIs
//! - **Jobs**: fire-and-forget execution with a polled status registry
//! - **Storage**: injected repository trait with an in-memory backend

pub mod anomaly;
pub mod config;
pub mod decline;
pub mod economics;
pub mod engine;
pub mod jobs;
pub mod storage;
pub mod types;

// Re-export engine configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    Anomaly, AnomalyKind, AnomalySeverity, CashFlowRow, DeclineCurveKind, DeclineCurveModel,
    DeclineParams, EconomicsRunResult, EconomicsScenarioInput, FitQuality, ForecastPoint,
    IrrResult, JobKind, JobResult, JobStatus, Kpis, MeasurementKind, PercentileBand,
    RateObservation, SimulationJob,
};

// Re-export components
pub use anomaly::AnomalyDetector;
pub use decline::{CurveFitter, FitError, ForecastSeries, Forecaster, MonteCarloSimulator};
pub use economics::{ScenarioError, ValuationEngine};
pub use engine::{EngineError, ForecastEngine};
pub use jobs::{JobError, JobPayload, JobRunner};

// Re-export storage
pub use storage::{InMemoryStore, ProductionStore, StoreError};
