//! Deterministic forecasting from a fitted decline model
//!
//! A forecast is a finite monthly sequence. `ForecastSeries` is lazy (one
//! point per `next()`) and restartable: cloning an unconsumed series, or
//! calling `Forecaster::forecast` again, yields an independent identical pass.

use chrono::{DateTime, Months, Utc};

use crate::types::{DeclineCurveKind, DeclineCurveModel, DeclineParams, ForecastPoint};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Below this |b| the hyperbolic law degenerates; fall back to exponential to
/// avoid the 1/b exponent blowing up.
const B_EPSILON: f64 = 1e-3;

/// Evaluates fitted decline models over monthly horizons
pub struct Forecaster;

impl Forecaster {
    /// Forecast `horizon_months` months starting at `start` (month 0).
    ///
    /// Month `m` evaluates the rate law at the calendar date `start + m`
    /// months, with `t` the fractional days elapsed since `start`. A horizon
    /// of 0 yields an empty sequence; a horizon of 1 yields exactly the point
    /// at `t = 0`, valued `qi`.
    pub fn forecast(
        model: &DeclineCurveModel,
        start: DateTime<Utc>,
        horizon_months: u32,
    ) -> ForecastSeries {
        ForecastSeries::new(model.kind, model.params, start, horizon_months)
    }
}

/// Evaluate the decline rate law at `t` days from the model's anchor time.
pub(crate) fn rate_at(kind: DeclineCurveKind, params: &DeclineParams, t_days: f64) -> f64 {
    let qi = params.qi;
    let di = params.di;

    match kind {
        DeclineCurveKind::Exponential => qi * (-di * t_days).exp(),
        DeclineCurveKind::Hyperbolic => {
            let b = params.b.unwrap_or(0.0);
            if b.abs() < B_EPSILON {
                return qi * (-di * t_days).exp();
            }
            let base = 1.0 + b * di * t_days;
            if base <= 0.0 {
                // inclining fits can drive the base negative far out in time
                return 0.0;
            }
            qi / base.powf(1.0 / b)
        }
    }
}

/// Lazy, finite, restartable monthly forecast sequence
#[derive(Debug, Clone)]
pub struct ForecastSeries {
    kind: DeclineCurveKind,
    params: DeclineParams,
    start: DateTime<Utc>,
    horizon_months: u32,
    month: u32,
}

impl ForecastSeries {
    pub(crate) fn new(
        kind: DeclineCurveKind,
        params: DeclineParams,
        start: DateTime<Utc>,
        horizon_months: u32,
    ) -> Self {
        Self {
            kind,
            params,
            start,
            horizon_months,
            month: 0,
        }
    }
}

impl Iterator for ForecastSeries {
    type Item = ForecastPoint;

    fn next(&mut self) -> Option<ForecastPoint> {
        if self.month >= self.horizon_months {
            return None;
        }

        let date = self.start.checked_add_months(Months::new(self.month))?;
        let t_days = (date - self.start).num_seconds() as f64 / SECONDS_PER_DAY;

        self.month += 1;

        Some(ForecastPoint {
            period: date.format("%Y-%m").to_string(),
            value: rate_at(self.kind, &self.params, t_days),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.horizon_months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ForecastSeries {}
