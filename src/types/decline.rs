//! Decline-curve models and forecast outputs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parametric family of the fitted decline model
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeclineCurveKind {
    /// Arps exponential decline: `q(t) = qi * exp(-di * t)`
    #[default]
    Exponential,
    /// Arps hyperbolic decline: `q(t) = qi / (1 + b * di * t)^(1/b)`
    Hyperbolic,
}

impl std::fmt::Display for DeclineCurveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclineCurveKind::Exponential => write!(f, "EXPONENTIAL"),
            DeclineCurveKind::Hyperbolic => write!(f, "HYPERBOLIC"),
        }
    }
}

/// Fitted Arps parameters
///
/// `qi` is anchored to the last observed time of the fit window, so the model
/// represents the current rate and forecasts start "now". `di` is the nominal
/// decline in 1/day. `b` is only present for hyperbolic models.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DeclineParams {
    pub qi: f64,
    pub di: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
}

/// Goodness-of-fit diagnostics, computed in log space against the fitted line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FitQuality {
    pub r2: f64,
    pub rmse: f64,
    /// Two-sided significance of the regression slope (Student's t, df = n-2)
    pub p_value: f64,
}

/// A fitted decline-curve model
///
/// Immutable once created — refitting an asset produces a new model record
/// with a fresh id rather than mutating an old one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeclineCurveModel {
    pub id: String,
    pub asset_id: String,
    pub kind: DeclineCurveKind,
    pub params: DeclineParams,
    pub quality: FitQuality,
    pub created_at: DateTime<Utc>,
}

/// One month of a forecast, keyed by calendar period ("YYYY-MM")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub period: String,
    pub value: f64,
}

/// Probabilistic forecast band from Monte Carlo resampling
///
/// Follows the oil & gas reserves convention: P90 is the conservative/low
/// outcome and P10 the optimistic/high outcome. For every period index,
/// `p90 <= p50 <= p10` holds by construction (ascending sorted selection).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PercentileBand {
    pub p10: Vec<ForecastPoint>,
    pub p50: Vec<ForecastPoint>,
    pub p90: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyperbolic_b_is_omitted_from_json_when_absent() {
        let params = DeclineParams {
            qi: 850.0,
            di: 0.002,
            b: None,
        };
        let json = serde_json::to_string(&params).unwrap();
        assert!(!json.contains("\"b\""));

        let with_b = DeclineParams {
            b: Some(0.1),
            ..params
        };
        let json = serde_json::to_string(&with_b).unwrap();
        assert!(json.contains("\"b\":0.1"));
    }

    #[test]
    fn kind_serializes_in_upper_case() {
        let json = serde_json::to_string(&DeclineCurveKind::Hyperbolic).unwrap();
        assert_eq!(json, "\"HYPERBOLIC\"");
    }
}
