//! Economic scenario inputs and valuation outputs
//!
//! The scenario input is a caller-supplied, JSON-shaped structure; it is
//! validated by `economics::ValuationEngine` before any arithmetic runs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Scenario input
// ============================================================================

/// Shape of the production profile over the project horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductionCurveKind {
    /// Constant rate every month
    Flat,
    /// Exponential decline from an effective annual decline percentage
    #[default]
    Decline,
    /// Caller-supplied monthly rates (`monthly_rates`)
    Custom,
}

/// How the commodity price evolves over the horizon
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceModel {
    /// Flat price, optionally escalated annually (compounded monthly)
    #[default]
    Flat,
    /// Caller-supplied monthly prices (`monthly_prices`)
    Curve,
}

/// Project-level assumptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralAssumptions {
    pub start_date: NaiveDate,
    pub duration_years: u32,
    pub currency: String,
    pub discount_rate_percent: f64,
}

/// Production profile assumptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionAssumptions {
    pub curve_kind: ProductionCurveKind,
    /// Daily rate at month 0
    pub initial_rate: f64,
    /// Effective annual decline, percent (required for `Decline`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_rate_percent: Option<f64>,
    /// Explicit daily rates per month (required for `Custom`); the last entry
    /// extends through any remaining months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_rates: Option<Vec<f64>>,
}

/// Pricing assumptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingAssumptions {
    pub price_model: PriceModel,
    /// Unit price (required for `Flat`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flat_price: Option<f64>,
    /// Annual escalation percent, compounded monthly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation_percent: Option<f64>,
    /// Explicit unit prices per month (required for `Curve`); the last entry
    /// extends through any remaining months
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_prices: Option<Vec<f64>>,
}

/// Cost and fiscal assumptions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostAssumptions {
    pub opex_fixed_monthly: f64,
    pub opex_variable_per_unit: f64,
    pub capex_initial: f64,
    pub capex_abandonment: f64,
    pub tax_rate_percent: f64,
    pub royalty_rate_percent: f64,
}

/// Complete valuation scenario, as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomicsScenarioInput {
    pub general: GeneralAssumptions,
    pub production: ProductionAssumptions,
    pub pricing: PricingAssumptions,
    pub costs: CostAssumptions,
}

// ============================================================================
// Valuation output
// ============================================================================

/// One month of the project cash-flow schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowRow {
    /// Calendar period, "YYYY-MM"
    pub period: String,
    pub revenue: f64,
    pub opex: f64,
    pub capex: f64,
    pub royalties: f64,
    pub taxes: f64,
    pub net_cash_flow: f64,
    /// Running sum of `net_cash_flow` in chronological order
    pub cumulative_cash_flow: f64,
}

/// Outcome of the IRR root search
///
/// The search either converges to an annualized rate, exhausts its iteration
/// budget, or hits a stationary point of the NPV curve where the Newton step
/// would divide by a vanishing derivative. The degenerate outcomes are
/// reported as-is instead of being masked by a numeric placeholder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum IrrResult {
    /// Annualized IRR, percent
    Converged(f64),
    NotConverged,
    DivisionByZero,
}

impl IrrResult {
    /// The annualized rate, if the search converged
    pub fn converged_value(&self) -> Option<f64> {
        match self {
            IrrResult::Converged(v) => Some(*v),
            _ => None,
        }
    }
}

/// Valuation KPI summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kpis {
    pub npv: f64,
    pub irr: IrrResult,
    /// 1-based month of cumulative payback, 0 if never recovered
    pub payout_period_months: u32,
    pub breakeven_price: f64,
    pub total_revenue: f64,
    pub total_capex: f64,
    pub total_opex: f64,
    pub roi_percent: f64,
}

/// Full output of a valuation run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomicsRunResult {
    pub kpis: Kpis,
    pub cashflows: Vec<CashFlowRow>,
}
