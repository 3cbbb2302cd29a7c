//! Decline-curve fitting
//!
//! Fits Arps decline models to historical rate series by ordinary least
//! squares in log space. An exponential decline is linear in log space:
//!
//! ```text
//! q(t) = qi * exp(-di * t)   =>   ln q = ln qi - di * t
//! ```
//!
//! so the slope of `ln q` against elapsed days gives `-di` directly. The
//! hyperbolic path reuses the same regression and pins the `b` exponent
//! (see `fit_hyperbolic`).

use chrono::Utc;
use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::FitConfig;
use crate::types::{
    DeclineCurveKind, DeclineCurveModel, DeclineParams, FitQuality, RateObservation,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fitting failures
#[derive(Debug, Error)]
pub enum FitError {
    #[error("insufficient data: {have} observations, need at least {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("singular regression: normal-equation denominator {denominator:e} is degenerate")]
    SingularFit { denominator: f64 },
}

/// Fits decline-curve models to rate series
#[derive(Debug, Clone, Default)]
pub struct CurveFitter {
    cfg: FitConfig,
}

impl CurveFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(cfg: FitConfig) -> Self {
        Self { cfg }
    }

    /// Fit a decline model of the requested kind to a historical series.
    ///
    /// Requires at least two observations. Timestamps are converted to
    /// fractional days since the first observation; values are floored at the
    /// configured minimum (default 0.1) before taking logs so a zero rate
    /// cannot produce `-inf`.
    ///
    /// The returned `qi` is re-anchored to the *last* observed time, so the
    /// model represents the current rate and a forecast can start "now".
    pub fn fit(
        &self,
        asset_id: &str,
        series: &[RateObservation],
        kind: DeclineCurveKind,
    ) -> Result<DeclineCurveModel, FitError> {
        match kind {
            DeclineCurveKind::Exponential => self.fit_exponential(asset_id, series),
            DeclineCurveKind::Hyperbolic => self.fit_hyperbolic(asset_id, series),
        }
    }

    /// Exponential fit: OLS of `ln q` on elapsed days.
    fn fit_exponential(
        &self,
        asset_id: &str,
        series: &[RateObservation],
    ) -> Result<DeclineCurveModel, FitError> {
        let (params, quality) = self.regress(series)?;

        Ok(self.build_model(asset_id, DeclineCurveKind::Exponential, params, quality))
    }

    /// Hyperbolic fit.
    ///
    /// Reuses the exponential regression and pins `b` at the configured value
    /// (default 0.1) instead of solving the nonlinear problem. The pinned `b`
    /// is part of the model contract; callers relying on a true hyperbolic
    /// tail should treat `quality` accordingly.
    fn fit_hyperbolic(
        &self,
        asset_id: &str,
        series: &[RateObservation],
    ) -> Result<DeclineCurveModel, FitError> {
        let (mut params, quality) = self.regress(series)?;
        params.b = Some(self.cfg.hyperbolic_b);

        Ok(self.build_model(asset_id, DeclineCurveKind::Hyperbolic, params, quality))
    }

    /// Shared log-space OLS core.
    fn regress(&self, series: &[RateObservation]) -> Result<(DeclineParams, FitQuality), FitError> {
        let n = series.len();
        if n < 2 {
            return Err(FitError::InsufficientData { have: n, need: 2 });
        }

        let t0 = series[0].timestamp;
        let t: Vec<f64> = series
            .iter()
            .map(|obs| (obs.timestamp - t0).num_seconds() as f64 / SECONDS_PER_DAY)
            .collect();
        let y: Vec<f64> = series
            .iter()
            .map(|obs| obs.value.max(self.cfg.value_floor).ln())
            .collect();

        let nf = n as f64;
        let sum_t: f64 = t.iter().sum();
        let sum_y: f64 = y.iter().sum();
        let sum_tt: f64 = t.iter().map(|v| v * v).sum();
        let sum_ty: f64 = t.iter().zip(y.iter()).map(|(a, b)| a * b).sum();

        let denominator = nf * sum_tt - sum_t * sum_t;
        if denominator.abs() < self.cfg.singular_epsilon {
            // e.g. every observation shares one timestamp
            return Err(FitError::SingularFit { denominator });
        }

        let slope = (nf * sum_ty - sum_t * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_t) / nf;

        let di = -slope;
        let t_last = t[n - 1];
        // Re-anchor the initial rate to the last observed time
        let qi = intercept.exp() * (-di * t_last).exp();

        let quality = Self::log_space_quality(&t, &y, slope, intercept);

        debug!(
            n,
            di,
            qi,
            r2 = quality.r2,
            "Decline regression complete"
        );

        Ok((DeclineParams { qi, di, b: None }, quality))
    }

    /// R², RMSE, and slope p-value against the fitted line, in log space.
    fn log_space_quality(t: &[f64], y: &[f64], slope: f64, intercept: f64) -> FitQuality {
        let n = y.len() as f64;
        let mean_y = y.iter().sum::<f64>() / n;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (ti, yi) in t.iter().zip(y.iter()) {
            let predicted = intercept + slope * ti;
            ss_res += (yi - predicted) * (yi - predicted);
            ss_tot += (yi - mean_y) * (yi - mean_y);
        }

        let r2 = if ss_tot < 1e-12 {
            // constant series in log space: exact if residuals vanish
            if ss_res < 1e-12 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        let rmse = (ss_res / n).sqrt();
        let p_value = Self::slope_p_value(r2, y.len());

        FitQuality { r2, rmse, p_value }
    }

    /// Two-tailed significance of the regression slope.
    ///
    /// Formula: t = r * sqrt(n-2) / sqrt(1 - r²), with n-2 degrees of freedom.
    fn slope_p_value(r2: f64, n: usize) -> f64 {
        if n < 3 {
            return 1.0;
        }
        let r = r2.max(0.0).sqrt();
        if r >= 0.9999 {
            return 0.0;
        }

        let df = (n - 2) as f64;
        let t_stat = r * df.sqrt() / (1.0 - r * r).sqrt();

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t_stat.abs())),
            Err(_) => 1.0,
        }
    }

    fn build_model(
        &self,
        asset_id: &str,
        kind: DeclineCurveKind,
        params: DeclineParams,
        quality: FitQuality,
    ) -> DeclineCurveModel {
        DeclineCurveModel {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            kind,
            params,
            quality,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasurementKind;
    use chrono::{Duration, TimeZone, Utc};

    /// Noiseless exponential series: q(t) = q0 * exp(-d * t), one point per day.
    fn exponential_series(q0: f64, d: f64, days: usize) -> Vec<RateObservation> {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        (0..days)
            .map(|day| {
                let t = day as f64;
                RateObservation::new(
                    start + Duration::days(day as i64),
                    q0 * (-d * t).exp(),
                    MeasurementKind::Oil,
                )
            })
            .collect()
    }

    #[test]
    fn recovers_noiseless_exponential() {
        let d = 0.0015; // per day
        let series = exponential_series(1200.0, d, 120);

        let model = CurveFitter::new()
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap();

        assert!((model.params.di - d).abs() < 1e-9, "di = {}", model.params.di);
        assert!(model.quality.r2 > 0.999999);
        assert!(model.quality.rmse < 1e-9);
        assert!(model.quality.p_value < 0.001);
        assert!(model.params.b.is_none());

        // qi is anchored to the last observation, not the first
        let expected_qi = 1200.0 * (-d * 119.0).exp();
        assert!((model.params.qi - expected_qi).abs() < 1e-6);
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        let series = exponential_series(1000.0, 0.001, 1);
        let err = CurveFitter::new()
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap_err();
        assert!(matches!(
            err,
            FitError::InsufficientData { have: 1, need: 2 }
        ));
    }

    #[test]
    fn identical_timestamps_are_singular() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let series = vec![
            RateObservation::new(ts, 900.0, MeasurementKind::Oil),
            RateObservation::new(ts, 850.0, MeasurementKind::Oil),
            RateObservation::new(ts, 820.0, MeasurementKind::Oil),
        ];

        let err = CurveFitter::new()
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap_err();
        assert!(matches!(err, FitError::SingularFit { .. }));
    }

    #[test]
    fn zero_rates_are_floored_not_infinite() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let series: Vec<_> = (0..10)
            .map(|day| {
                RateObservation::new(start + Duration::days(day), 0.0, MeasurementKind::Oil)
            })
            .collect();

        let model = CurveFitter::new()
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap();
        assert!(model.params.qi.is_finite());
        assert!(model.params.di.is_finite());
        assert!(model.quality.rmse.is_finite());
    }

    #[test]
    fn hyperbolic_delegates_and_pins_b() {
        let series = exponential_series(1000.0, 0.002, 90);
        let fitter = CurveFitter::new();

        let exp = fitter
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap();
        let hyp = fitter
            .fit("well-7", &series, DeclineCurveKind::Hyperbolic)
            .unwrap();

        assert_eq!(hyp.kind, DeclineCurveKind::Hyperbolic);
        assert_eq!(hyp.params.b, Some(0.1));
        // same regression underneath
        assert!((hyp.params.qi - exp.params.qi).abs() < 1e-12);
        assert!((hyp.params.di - exp.params.di).abs() < 1e-12);
    }

    #[test]
    fn each_fit_produces_a_fresh_model() {
        let series = exponential_series(1000.0, 0.002, 30);
        let fitter = CurveFitter::new();
        let a = fitter
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap();
        let b = fitter
            .fit("well-7", &series, DeclineCurveKind::Exponential)
            .unwrap();
        assert_ne!(a.id, b.id);
    }
}
