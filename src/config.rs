//! Engine configuration
//!
//! Numeric tolerances and defaults for the fitting, simulation, anomaly, and
//! IRR components, loaded from TOML with built-in defaults matching the
//! engine's contract constants.
//!
//! ## Loading order
//!
//! 1. `PETROCAST_CONFIG` environment variable (path to a TOML file)
//! 2. `petrocast.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is an explicitly constructed value handed to each component's
//! constructor — there is no global. Components default to
//! `EngineConfig::default()` when none is supplied.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Curve-fitting tolerances
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FitConfig {
    /// Rates are floored at this value before taking logs
    pub value_floor: f64,
    /// OLS normal-equation denominators within this of zero are singular
    pub singular_epsilon: f64,
    /// Hyperbolic exponent pinned by the simplified hyperbolic fit
    pub hyperbolic_b: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            value_floor: 0.1,
            singular_epsilon: 1e-9,
            hyperbolic_b: 0.1,
        }
    }
}

/// Monte Carlo simulation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Trials when the caller does not specify a count
    pub default_iterations: u32,
    /// Lower bound of the per-parameter uniform perturbation factor
    pub factor_min: f64,
    /// Upper bound of the per-parameter uniform perturbation factor
    pub factor_max: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            default_iterations: 500,
            factor_min: 0.9,
            factor_max: 1.1,
        }
    }
}

/// Anomaly detection thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Series shorter than this are not scanned
    pub min_samples: usize,
    /// Default |z| flag threshold
    pub default_threshold_z: f64,
    /// |z| above this grades MEDIUM
    pub medium_sigma: f64,
    /// |z| above this grades HIGH
    pub high_sigma: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_samples: 10,
            default_threshold_z: 3.0,
            medium_sigma: 4.0,
            high_sigma: 5.0,
        }
    }
}

/// IRR root-finder parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IrrConfig {
    /// Initial monthly-rate guess for Newton-Raphson
    pub initial_guess: f64,
    pub max_iterations: u32,
    /// Convergence when the step magnitude falls below this
    pub tolerance: f64,
    /// Derivative magnitudes below this abort the search
    pub derivative_floor: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 50,
            tolerance: 1e-5,
            derivative_floor: 1e-9,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub fit: FitConfig,
    pub monte_carlo: MonteCarloConfig,
    pub anomaly: AnomalyConfig,
    pub irr: IrrConfig,
}

impl EngineConfig {
    /// Load following the documented order; falls back to defaults on any
    /// missing or unreadable file.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PETROCAST_CONFIG") {
            match Self::from_file(&path) {
                Ok(cfg) => {
                    info!(path = %path, "Loaded engine config from PETROCAST_CONFIG");
                    return cfg;
                }
                Err(e) => {
                    warn!(path = %path, error = %e, "PETROCAST_CONFIG unreadable — trying defaults");
                }
            }
        }

        let local = Path::new("petrocast.toml");
        if local.exists() {
            match Self::from_file(local) {
                Ok(cfg) => {
                    info!("Loaded engine config from ./petrocast.toml");
                    return cfg;
                }
                Err(e) => {
                    warn!(error = %e, "./petrocast.toml unreadable — using defaults");
                }
            }
        }

        debug!("Using built-in engine config defaults");
        Self::default()
    }

    /// Parse a specific TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
