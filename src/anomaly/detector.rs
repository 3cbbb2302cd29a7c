//! Z-score outlier detection
//!
//! Flags points whose z-score against the series' population mean/std exceeds
//! a threshold. Severity grades at 3σ (LOW, default flag threshold), 4σ
//! (MEDIUM), and 5σ (HIGH). Series shorter than the minimum sample count and
//! constant series produce no anomalies — there is no meaningful baseline to
//! deviate from.

use tracing::debug;
use uuid::Uuid;

use crate::config::AnomalyConfig;
use crate::types::{Anomaly, AnomalyKind, AnomalySeverity, MeasurementKind, RateObservation};

/// Scans rate series for statistical outliers
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    cfg: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: AnomalyConfig) -> Self {
        Self { cfg }
    }

    /// Scan with the default threshold (3σ).
    pub fn detect(&self, asset_id: &str, series: &[RateObservation]) -> Vec<Anomaly> {
        self.detect_with_threshold(asset_id, series, self.cfg.default_threshold_z)
    }

    /// Scan with an explicit |z| threshold.
    ///
    /// Returns one `Anomaly` per flagged point, in series order. The
    /// explanation carries the z-score and the series mean so a flag can be
    /// traced back to the statistics that produced it.
    pub fn detect_with_threshold(
        &self,
        asset_id: &str,
        series: &[RateObservation],
        threshold_z: f64,
    ) -> Vec<Anomaly> {
        if series.len() < self.cfg.min_samples {
            debug!(
                asset_id,
                have = series.len(),
                need = self.cfg.min_samples,
                "Series too short for anomaly scan"
            );
            return Vec::new();
        }

        let n = series.len() as f64;
        let mean = series.iter().map(|obs| obs.value).sum::<f64>() / n;
        let variance = series
            .iter()
            .map(|obs| (obs.value - mean) * (obs.value - mean))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        if std_dev <= f64::EPSILON {
            // constant series
            return Vec::new();
        }

        let series_kind = series
            .first()
            .map(|obs| obs.kind)
            .unwrap_or(MeasurementKind::Oil);

        series
            .iter()
            .filter_map(|obs| {
                let z = (obs.value - mean) / std_dev;
                if z.abs() <= threshold_z {
                    return None;
                }

                Some(Anomaly {
                    id: Uuid::new_v4().to_string(),
                    asset_id: asset_id.to_string(),
                    series: series_kind,
                    timestamp: obs.timestamp,
                    severity: self.grade(z),
                    kind: if z > 0.0 {
                        AnomalyKind::Spike
                    } else {
                        AnomalyKind::Drop
                    },
                    explanation: format!(
                        "rate {:.2} deviates {:.2} sigma from series mean {:.2}",
                        obs.value, z, mean
                    ),
                })
            })
            .collect()
    }

    fn grade(&self, z: f64) -> AnomalySeverity {
        let magnitude = z.abs();
        if magnitude > self.cfg.high_sigma {
            AnomalySeverity::High
        } else if magnitude > self.cfg.medium_sigma {
            AnomalySeverity::Medium
        } else {
            AnomalySeverity::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn series_of(values: &[f64]) -> Vec<RateObservation> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(day, &v)| {
                RateObservation::new(start + Duration::days(day as i64), v, MeasurementKind::Oil)
            })
            .collect()
    }

    #[test]
    fn short_series_yields_nothing() {
        let series = series_of(&[100.0; 9]);
        assert!(AnomalyDetector::new().detect("well-7", &series).is_empty());
    }

    #[test]
    fn constant_series_yields_nothing() {
        let series = series_of(&[100.0; 30]);
        assert!(AnomalyDetector::new().detect("well-7", &series).is_empty());
    }

    #[test]
    fn single_extreme_spike_is_flagged_high() {
        let mut values = vec![100.0; 30];
        values.push(1000.0);
        let series = series_of(&values);

        let anomalies = AnomalyDetector::new().detect("well-7", &series);
        assert_eq!(anomalies.len(), 1);

        let a = &anomalies[0];
        assert_eq!(a.kind, AnomalyKind::Spike);
        assert_eq!(a.severity, AnomalySeverity::High);
        assert_eq!(a.asset_id, "well-7");
        // explanation carries z-score and mean
        assert!(a.explanation.contains("sigma"));
        assert!(a.explanation.contains("mean"));
    }

    #[test]
    fn negative_outlier_is_a_drop() {
        let mut values = vec![500.0; 30];
        values.push(0.0);
        let series = series_of(&values);

        let anomalies = AnomalyDetector::new().detect("well-7", &series);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].kind, AnomalyKind::Drop);
    }

    #[test]
    fn threshold_is_respected() {
        // 15 constant points plus one outlier puts the outlier at
        // z = sqrt(15) ~= 3.87: flagged at 3 (LOW), ignored at 4
        let mut values = vec![100.0; 15];
        values.push(150.0);
        let series = series_of(&values);

        let detector = AnomalyDetector::new();
        let at_3 = detector.detect_with_threshold("well-7", &series, 3.0);
        let at_4 = detector.detect_with_threshold("well-7", &series, 4.0);
        assert_eq!(at_3.len(), 1);
        assert_eq!(at_3[0].severity, AnomalySeverity::Low);
        assert!(at_4.is_empty());
    }
}
