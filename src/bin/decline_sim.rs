//! Synthetic decline-curve exercise tool
//!
//! Generates a noisy exponential production history, fits a decline model,
//! forecasts the requested horizon, and runs a Monte Carlo band — printing
//! the lot as JSON. Useful for smoke-testing the engine and producing demo
//! payloads without a historian connection.
//!
//! ```bash
//! decline-sim --seed 42 --days 180 --horizon 24 --iterations 500
//! ```

use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tracing::info;

use petrocast::{
    CurveFitter, DeclineCurveKind, DeclineCurveModel, ForecastPoint, Forecaster, MeasurementKind,
    MonteCarloSimulator, PercentileBand, RateObservation,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CurveArg {
    Exponential,
    Hyperbolic,
}

impl From<CurveArg> for DeclineCurveKind {
    fn from(arg: CurveArg) -> Self {
        match arg {
            CurveArg::Exponential => DeclineCurveKind::Exponential,
            CurveArg::Hyperbolic => DeclineCurveKind::Hyperbolic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "decline-sim")]
#[command(about = "Generate a synthetic decline history and exercise the forecasting engine")]
#[command(version)]
struct CliArgs {
    /// RNG seed for the series noise and the Monte Carlo draws
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Days of synthetic history to generate
    #[arg(long, default_value = "180")]
    days: u32,

    /// Initial daily rate of the synthetic well
    #[arg(long, default_value = "1200.0")]
    initial_rate: f64,

    /// Nominal daily decline of the synthetic well
    #[arg(long, default_value = "0.002")]
    decline: f64,

    /// Multiplicative noise sigma applied to each observation
    #[arg(long, default_value = "0.05")]
    noise: f64,

    /// Decline-model family to fit
    #[arg(long, value_enum, default_value = "exponential")]
    kind: CurveArg,

    /// Forecast horizon in months
    #[arg(long, default_value = "24")]
    horizon: u32,

    /// Monte Carlo iterations
    #[arg(long, default_value = "500")]
    iterations: u32,
}

#[derive(Serialize)]
struct SimOutput {
    model: DeclineCurveModel,
    forecast: Vec<ForecastPoint>,
    band: PercentileBand,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let series = synthetic_series(&args)?;
    info!(observations = series.len(), "Synthetic history generated");

    let model = CurveFitter::new()
        .fit("sim-well", &series, args.kind.into())
        .context("decline fit failed")?;

    let start = series
        .last()
        .map(|obs| obs.timestamp)
        .unwrap_or_else(Utc::now);

    let forecast: Vec<ForecastPoint> = Forecaster::forecast(&model, start, args.horizon).collect();

    let band = MonteCarloSimulator::new(Some(args.seed))
        .run(&model, start, args.iterations, args.horizon)
        .context("monte carlo simulation failed")?;

    let output = SimOutput {
        model,
        forecast,
        band,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Noisy exponential history: q(t) = q0 * exp(-d*t) * (1 + noise)
fn synthetic_series(args: &CliArgs) -> Result<Vec<RateObservation>> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let noise = Normal::new(0.0, args.noise.abs()).context("invalid noise sigma")?;

    let start = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);

    Ok((0..args.days)
        .map(|day| {
            let t = f64::from(day);
            let clean = args.initial_rate * (-args.decline * t).exp();
            let value = (clean * (1.0 + noise.sample(&mut rng))).max(0.0);
            RateObservation::new(
                start + Duration::days(i64::from(day)),
                value,
                MeasurementKind::Oil,
            )
        })
        .collect())
}
