//! Production-rate time series observations
//!
//! Read-only engine input, produced by an external time-series source
//! (historian, SCADA export, allocation system).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Measured phase of a production-rate observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    #[default]
    Oil,
    Gas,
    Water,
}

impl std::fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasurementKind::Oil => write!(f, "oil"),
            MeasurementKind::Gas => write!(f, "gas"),
            MeasurementKind::Water => write!(f, "water"),
        }
    }
}

/// A single production-rate measurement
///
/// Immutable once recorded. Rates are daily averages in the source system's
/// native unit (bbl/d for oil, Mcf/d for gas).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateObservation {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub kind: MeasurementKind,
}

impl RateObservation {
    pub fn new(timestamp: DateTime<Utc>, value: f64, kind: MeasurementKind) -> Self {
        Self {
            timestamp,
            value,
            kind,
        }
    }
}
