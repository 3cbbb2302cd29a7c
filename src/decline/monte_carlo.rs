//! Monte Carlo forecast uncertainty
//!
//! Repeatedly perturbs a fitted model's parameters and re-forecasts the full
//! horizon to build P10/P50/P90 bands. Each trial draws one uniform factor in
//! [0.9, 1.1] per parameter and applies the same perturbed triple to every
//! month of that trial — parameters are correlated within a trial and
//! independent across trials, which shapes the band.
//!
//! The simulator is deterministic for a fixed seed: all random factors are
//! drawn sequentially from the owned `StdRng` before the trial forecasts are
//! fanned out to rayon, so thread scheduling cannot reorder the draws.

use rand::prelude::*;
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;

use chrono::{DateTime, Utc};

use crate::config::MonteCarloConfig;
use crate::types::{DeclineCurveModel, DeclineParams, ForecastPoint, PercentileBand};

use super::forecaster::ForecastSeries;

/// Simulation failures
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("monte carlo requires at least one iteration")]
    ZeroIterations,
}

/// Per-trial perturbation factors, one per model parameter
#[derive(Debug, Clone, Copy)]
struct TrialFactors {
    qi: f64,
    di: f64,
    b: Option<f64>,
}

/// Monte Carlo decline-forecast simulator
pub struct MonteCarloSimulator {
    rng: StdRng,
    cfg: MonteCarloConfig,
}

impl MonteCarloSimulator {
    /// Seeded for reproducible bands; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_config(seed, MonteCarloConfig::default())
    }

    pub fn with_config(seed: Option<u64>, cfg: MonteCarloConfig) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self { rng, cfg }
    }

    /// Run `iterations` perturbation trials over `horizon_months` months.
    pub fn run(
        &mut self,
        model: &DeclineCurveModel,
        start: DateTime<Utc>,
        iterations: u32,
        horizon_months: u32,
    ) -> Result<PercentileBand, SimulationError> {
        self.run_with_progress(model, start, iterations, horizon_months, |_| {})
    }

    /// As `run`, reporting a midpoint checkpoint (50) to `on_progress`.
    ///
    /// The checkpoint fires once, after half the trials have completed. The
    /// job layer uses it; the pure `run` wrapper discards it.
    pub fn run_with_progress(
        &mut self,
        model: &DeclineCurveModel,
        start: DateTime<Utc>,
        iterations: u32,
        horizon_months: u32,
        mut on_progress: impl FnMut(u8),
    ) -> Result<PercentileBand, SimulationError> {
        if iterations == 0 {
            return Err(SimulationError::ZeroIterations);
        }

        // Period labels come from an unperturbed pass over the horizon
        let periods: Vec<String> = ForecastSeries::new(model.kind, model.params, start, horizon_months)
            .map(|p| p.period)
            .collect();

        // Draw all factors up front so the seed fully determines the result
        let factors: Vec<TrialFactors> = (0..iterations).map(|_| self.draw_factors(model)).collect();

        let midpoint = factors.len() / 2;
        let (front, back) = factors.split_at(midpoint);

        let mut trials = Self::forecast_trials(model, start, horizon_months, front);
        on_progress(50);
        trials.extend(Self::forecast_trials(model, start, horizon_months, back));

        debug!(
            iterations,
            horizon_months,
            model_id = %model.id,
            "Monte carlo trials complete"
        );

        Ok(Self::extract_band(&periods, &trials))
    }

    fn draw_factors(&mut self, model: &DeclineCurveModel) -> TrialFactors {
        let min = self.cfg.factor_min;
        let max = self.cfg.factor_max;
        TrialFactors {
            qi: self.rng.gen_range(min..=max),
            di: self.rng.gen_range(min..=max),
            b: model.params.b.map(|_| self.rng.gen_range(min..=max)),
        }
    }

    /// Forecast one full horizon per factor set, in parallel.
    fn forecast_trials(
        model: &DeclineCurveModel,
        start: DateTime<Utc>,
        horizon_months: u32,
        factors: &[TrialFactors],
    ) -> Vec<Vec<f64>> {
        factors
            .par_iter()
            .map(|f| {
                let perturbed = DeclineParams {
                    qi: model.params.qi * f.qi,
                    di: model.params.di * f.di,
                    b: match (model.params.b, f.b) {
                        (Some(b), Some(fb)) => Some(b * fb),
                        (b, _) => b,
                    },
                };
                ForecastSeries::new(model.kind, perturbed, start, horizon_months)
                    .map(|p| p.value)
                    .collect()
            })
            .collect()
    }

    /// Sorted-ascending selection per period.
    ///
    /// Oil & gas convention: P90 is the conservative/low pick at index
    /// floor(0.1*n), P10 the optimistic/high pick at floor(0.9*n). With one
    /// iteration all three collapse to the same trial.
    fn extract_band(periods: &[String], trials: &[Vec<f64>]) -> PercentileBand {
        let n = trials.len();
        let idx_p90 = ((0.1 * n as f64).floor() as usize).min(n - 1);
        let idx_p50 = ((0.5 * n as f64).floor() as usize).min(n - 1);
        let idx_p10 = ((0.9 * n as f64).floor() as usize).min(n - 1);

        let mut p10 = Vec::with_capacity(periods.len());
        let mut p50 = Vec::with_capacity(periods.len());
        let mut p90 = Vec::with_capacity(periods.len());

        for (month, period) in periods.iter().enumerate() {
            let mut values: Vec<f64> = trials.iter().map(|trial| trial[month]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            p90.push(ForecastPoint {
                period: period.clone(),
                value: values[idx_p90],
            });
            p50.push(ForecastPoint {
                period: period.clone(),
                value: values[idx_p50],
            });
            p10.push(ForecastPoint {
                period: period.clone(),
                value: values[idx_p10],
            });
        }

        PercentileBand { p10, p50, p90 }
    }
}
