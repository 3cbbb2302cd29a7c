//! Discounted cash-flow KPI derivation
//!
//! All functions operate on the monthly net cash-flow stream produced by
//! `schedule::build`. Discounting places every cash flow at the *end* of its
//! period: month `i` discounts at `t = i + 1`. This delays the month-0 capex
//! outlay by one period relative to a textbook `t = 0` convention and is part
//! of the engine's contract.

use crate::config::IrrConfig;
use crate::types::{CashFlowRow, IrrResult};

use super::ScheduleTotals;

/// Convert an annual discount rate (fraction) to its monthly equivalent.
///
/// Formula: `r_m = (1 + r_annual)^(1/12) - 1`
pub fn monthly_discount_rate(annual: f64) -> f64 {
    (1.0 + annual).powf(1.0 / 12.0) - 1.0
}

/// Net present value of a monthly stream at a monthly rate.
///
/// Formula: `NPV = sum( cf[i] / (1 + r)^(i+1) )`
pub fn npv(cashflows: &[f64], monthly_rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + monthly_rate).powi(i as i32 + 1))
        .sum()
}

/// d(NPV)/dr for the Newton step.
fn npv_derivative(cashflows: &[f64], monthly_rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(i, cf)| {
            let t = i as f64 + 1.0;
            -t * cf / (1.0 + monthly_rate).powi(i as i32 + 2)
        })
        .sum()
}

/// Newton-Raphson IRR search over the monthly stream.
///
/// Starts from the configured guess (default 0.10 monthly) and iterates until
/// the step shrinks below tolerance. The outcome is explicit: a vanishing
/// derivative aborts with `DivisionByZero`, and an exhausted iteration budget
/// returns `NotConverged`. A converged monthly root is annualized to
/// `(1 + r_m)^12 - 1`, in percent.
pub fn irr(cashflows: &[f64], cfg: &IrrConfig) -> IrrResult {
    let mut rate = cfg.initial_guess;

    for _ in 0..cfg.max_iterations {
        let f = npv(cashflows, rate);
        let df = npv_derivative(cashflows, rate);

        if df.abs() < cfg.derivative_floor {
            return IrrResult::DivisionByZero;
        }

        let next = rate - f / df;
        if (next - rate).abs() < cfg.tolerance {
            return IrrResult::Converged(annualize_percent(next));
        }
        rate = next;
    }

    IrrResult::NotConverged
}

fn annualize_percent(monthly_rate: f64) -> f64 {
    ((1.0 + monthly_rate).powi(12) - 1.0) * 100.0
}

/// 1-based month in which cumulative cash flow first reaches zero; 0 if the
/// project never pays out.
pub fn payout_period(rows: &[CashFlowRow]) -> u32 {
    rows.iter()
        .position(|row| row.cumulative_cash_flow >= 0.0)
        .map(|i| i as u32 + 1)
        .unwrap_or(0)
}

/// Total net cash flow over total capex, in percent. Zero capex yields 0.
pub fn roi_percent(cashflows: &[f64], total_capex: f64) -> f64 {
    if total_capex <= 0.0 {
        return 0.0;
    }
    cashflows.iter().sum::<f64>() / total_capex * 100.0
}

/// Undiscounted unit cost: `(capex + opex) / volume`. Zero volume yields 0.
pub fn breakeven_price(totals: &ScheduleTotals) -> f64 {
    if totals.volume <= 0.0 {
        return 0.0;
    }
    (totals.capex + totals.opex) / totals.volume
}
