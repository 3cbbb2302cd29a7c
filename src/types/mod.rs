//! Shared data structures for the forecasting & valuation engine
//!
//! Split by concern, mirroring the pipeline stages:
//! - `series`: raw production-rate observations (engine input)
//! - `decline`: fitted decline models, forecast points, percentile bands
//! - `anomaly`: statistical outlier records
//! - `job`: asynchronous simulation/valuation job records
//! - `economics`: scenario inputs, cash-flow rows, valuation KPIs

pub mod anomaly;
pub mod decline;
pub mod economics;
pub mod job;
pub mod series;

pub use anomaly::{Anomaly, AnomalyKind, AnomalySeverity};
pub use decline::{
    DeclineCurveKind, DeclineCurveModel, DeclineParams, FitQuality, ForecastPoint, PercentileBand,
};
pub use economics::{
    CashFlowRow, CostAssumptions, EconomicsRunResult, EconomicsScenarioInput, GeneralAssumptions,
    IrrResult, Kpis, PriceModel, PricingAssumptions, ProductionAssumptions, ProductionCurveKind,
};
pub use job::{JobKind, JobResult, JobStatus, SimulationJob};
pub use series::{MeasurementKind, RateObservation};
