//! Decline-curve analysis: fitting, forecasting, Monte Carlo resampling
//!
//! The flow mirrors how the engine is driven by callers:
//! 1. `fitter`: fit an Arps model to a historical rate series (OLS in log space)
//! 2. `forecaster`: evaluate the fitted model over a monthly horizon
//! 3. `monte_carlo`: perturb the fitted parameters and extract P10/P50/P90 bands

pub mod fitter;
pub mod forecaster;
pub mod monte_carlo;

pub use fitter::{CurveFitter, FitError};
pub use forecaster::{ForecastSeries, Forecaster};
pub use monte_carlo::{MonteCarloSimulator, SimulationError};
