//! Monthly cash-flow schedule generation
//!
//! Expands a validated scenario into one `CashFlowRow` per month of the
//! project horizon. Volumes use the 30.44 day/month convention. Initial capex
//! lands in month 0 and abandonment capex in the final month; taxes apply
//! only to positive taxable income.

use chrono::{Datelike, Months};

use crate::types::{CashFlowRow, EconomicsScenarioInput, PriceModel, ProductionCurveKind};

/// Average days per calendar month
const DAYS_PER_MONTH: f64 = 30.44;

/// Undiscounted totals accumulated while building the schedule
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleTotals {
    pub revenue: f64,
    pub opex: f64,
    pub capex: f64,
    /// Produced volume over the horizon, in rate units x days
    pub volume: f64,
}

/// Build the full schedule. Assumes the input has passed validation.
pub fn build(input: &EconomicsScenarioInput) -> (Vec<CashFlowRow>, ScheduleTotals) {
    let months = input.general.duration_years * 12;
    let royalty_rate = input.costs.royalty_rate_percent / 100.0;
    let tax_rate = input.costs.tax_rate_percent / 100.0;

    let mut rows = Vec::with_capacity(months as usize);
    let mut totals = ScheduleTotals::default();
    let mut cumulative = 0.0;

    for m in 0..months {
        let volume = production_rate(input, m) * DAYS_PER_MONTH;
        let price = unit_price(input, m);

        let revenue = volume * price;
        let opex = input.costs.opex_fixed_monthly + input.costs.opex_variable_per_unit * volume;
        let royalties = revenue * royalty_rate;

        let mut capex = 0.0;
        if m == 0 {
            capex += input.costs.capex_initial;
        }
        if m == months - 1 {
            capex += input.costs.capex_abandonment;
        }

        let taxable_income = revenue - royalties - opex - capex;
        let taxes = taxable_income.max(0.0) * tax_rate;
        let net_cash_flow = revenue - royalties - opex - capex - taxes;
        cumulative += net_cash_flow;

        totals.revenue += revenue;
        totals.opex += opex;
        totals.capex += capex;
        totals.volume += volume;

        rows.push(CashFlowRow {
            period: period_label(input, m),
            revenue,
            opex,
            capex,
            royalties,
            taxes,
            net_cash_flow,
            cumulative_cash_flow: cumulative,
        });
    }

    (rows, totals)
}

/// Daily production rate for month `m`.
///
/// Decline converts the effective annual decline to a nominal one
/// (`d_nom = -ln(1 - d_eff)`), so the rate loses exactly `d_eff` of itself
/// over each year: `rate(12) = initial * (1 - d_eff)`.
fn production_rate(input: &EconomicsScenarioInput, m: u32) -> f64 {
    let initial = input.production.initial_rate;
    match input.production.curve_kind {
        ProductionCurveKind::Flat => initial,
        ProductionCurveKind::Decline => {
            let d_eff = input.production.decline_rate_percent.unwrap_or(0.0) / 100.0;
            let d_nom = -(1.0 - d_eff).ln();
            initial * (-d_nom * f64::from(m) / 12.0).exp()
        }
        ProductionCurveKind::Custom => extend_profile(&input.production.monthly_rates, m, initial),
    }
}

/// Unit price for month `m`. Flat escalation compounds monthly from an
/// annual percentage.
fn unit_price(input: &EconomicsScenarioInput, m: u32) -> f64 {
    match input.pricing.price_model {
        PriceModel::Flat => {
            let base = input.pricing.flat_price.unwrap_or(0.0);
            let escalation = input.pricing.escalation_percent.unwrap_or(0.0) / 100.0;
            base * (1.0 + escalation).powf(f64::from(m) / 12.0)
        }
        PriceModel::Curve => extend_profile(&input.pricing.monthly_prices, m, 0.0),
    }
}

/// Index into an explicit monthly profile; the last entry extends through any
/// remaining months.
fn extend_profile(profile: &Option<Vec<f64>>, m: u32, fallback: f64) -> f64 {
    match profile.as_deref() {
        Some([]) | None => fallback,
        Some(values) => values[(m as usize).min(values.len() - 1)],
    }
}

fn period_label(input: &EconomicsScenarioInput, m: u32) -> String {
    match input.general.start_date.checked_add_months(Months::new(m)) {
        Some(date) => format!("{:04}-{:02}", date.year(), date.month()),
        None => format!("month-{}", m),
    }
}
