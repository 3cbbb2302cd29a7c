//! Statistical anomaly records for production-rate series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::series::MeasurementKind;

/// Direction of the flagged deviation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnomalyKind {
    /// Value sits above the series mean (positive z-score)
    Spike,
    /// Value sits below the series mean (negative z-score)
    Drop,
}

impl std::fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyKind::Spike => write!(f, "SPIKE"),
            AnomalyKind::Drop => write!(f, "DROP"),
        }
    }
}

/// Severity graded from the z-score magnitude: >5σ HIGH, >4σ MEDIUM, else LOW
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalySeverity::Low => write!(f, "LOW"),
            AnomalySeverity::Medium => write!(f, "MEDIUM"),
            AnomalySeverity::High => write!(f, "HIGH"),
        }
    }
}

/// A flagged outlier in a rate series. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    pub id: String,
    pub asset_id: String,
    pub series: MeasurementKind,
    pub timestamp: DateTime<Utc>,
    pub severity: AnomalySeverity,
    pub kind: AnomalyKind,
    /// Human-readable trace: carries the z-score and series mean
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_low_to_high() {
        assert!(AnomalySeverity::Low < AnomalySeverity::Medium);
        assert!(AnomalySeverity::Medium < AnomalySeverity::High);
    }
}
