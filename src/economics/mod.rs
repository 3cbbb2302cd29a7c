//! Economic valuation: scenario -> cash-flow schedule -> KPI summary
//!
//! `ValuationEngine::run` validates a caller-supplied scenario, expands it
//! into a monthly cash-flow schedule (`schedule`), and derives the valuation
//! KPIs (`valuation`): NPV, IRR, payout period, ROI, and breakeven price.
//!
//! The IRR search result is surfaced as an explicit outcome
//! (`IrrResult::{Converged, NotConverged, DivisionByZero}`) — a failed root
//! search is reported, never masked as a zero rate.

pub mod schedule;
pub mod valuation;

use thiserror::Error;
use tracing::info;

use crate::config::IrrConfig;
use crate::types::{
    EconomicsRunResult, EconomicsScenarioInput, Kpis, PriceModel, ProductionCurveKind,
};

pub use schedule::ScheduleTotals;

/// Scenario validation failures
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("empty profile: {0} requires at least one entry")]
    EmptyProfile(&'static str),
}

/// Converts a validated scenario into cash flows and KPIs
#[derive(Debug, Clone, Default)]
pub struct ValuationEngine {
    irr_cfg: IrrConfig,
}

impl ValuationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(irr_cfg: IrrConfig) -> Self {
        Self { irr_cfg }
    }

    /// Run the full valuation.
    pub fn run(&self, input: &EconomicsScenarioInput) -> Result<EconomicsRunResult, ScenarioError> {
        validate(input)?;

        let (cashflows, totals) = schedule::build(input);

        let net: Vec<f64> = cashflows.iter().map(|row| row.net_cash_flow).collect();
        let monthly_rate =
            valuation::monthly_discount_rate(input.general.discount_rate_percent / 100.0);

        let npv = valuation::npv(&net, monthly_rate);
        let irr = valuation::irr(&net, &self.irr_cfg);
        let payout_period_months = valuation::payout_period(&cashflows);
        let roi_percent = valuation::roi_percent(&net, totals.capex);
        let breakeven_price = valuation::breakeven_price(&totals);

        info!(
            months = cashflows.len(),
            npv,
            ?irr,
            "Valuation run complete"
        );

        Ok(EconomicsRunResult {
            kpis: Kpis {
                npv,
                irr,
                payout_period_months,
                breakeven_price,
                total_revenue: totals.revenue,
                total_capex: totals.capex,
                total_opex: totals.opex,
                roi_percent,
            },
            cashflows,
        })
    }
}

/// Structural validation, before any arithmetic runs.
fn validate(input: &EconomicsScenarioInput) -> Result<(), ScenarioError> {
    if input.general.duration_years == 0 {
        return Err(ScenarioError::InvalidValue {
            field: "general.duration_years",
            reason: "must be at least 1".into(),
        });
    }
    if input.general.discount_rate_percent <= -100.0 {
        return Err(ScenarioError::InvalidValue {
            field: "general.discount_rate_percent",
            reason: "must be greater than -100".into(),
        });
    }
    if input.production.initial_rate < 0.0 {
        return Err(ScenarioError::InvalidValue {
            field: "production.initial_rate",
            reason: "must be non-negative".into(),
        });
    }

    match input.production.curve_kind {
        ProductionCurveKind::Decline => {
            let pct = input
                .production
                .decline_rate_percent
                .ok_or(ScenarioError::MissingField("production.decline_rate_percent"))?;
            if !(0.0..100.0).contains(&pct) {
                return Err(ScenarioError::InvalidValue {
                    field: "production.decline_rate_percent",
                    reason: "must be in [0, 100)".into(),
                });
            }
        }
        ProductionCurveKind::Custom => {
            let rates = input
                .production
                .monthly_rates
                .as_ref()
                .ok_or(ScenarioError::MissingField("production.monthly_rates"))?;
            if rates.is_empty() {
                return Err(ScenarioError::EmptyProfile("production.monthly_rates"));
            }
        }
        ProductionCurveKind::Flat => {}
    }

    match input.pricing.price_model {
        PriceModel::Flat => {
            let price = input
                .pricing
                .flat_price
                .ok_or(ScenarioError::MissingField("pricing.flat_price"))?;
            if price < 0.0 {
                return Err(ScenarioError::InvalidValue {
                    field: "pricing.flat_price",
                    reason: "must be non-negative".into(),
                });
            }
        }
        PriceModel::Curve => {
            let prices = input
                .pricing
                .monthly_prices
                .as_ref()
                .ok_or(ScenarioError::MissingField("pricing.monthly_prices"))?;
            if prices.is_empty() {
                return Err(ScenarioError::EmptyProfile("pricing.monthly_prices"));
            }
        }
    }

    Ok(())
}
