//! Job Runner Integration Tests
//!
//! Exercises the submit/poll lifecycle through the engine facade: Monte Carlo
//! and economics jobs reaching terminal states, failure capture across the
//! submit/poll boundary, and unknown-id handling.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use petrocast::{
    types::{
        CostAssumptions, GeneralAssumptions, PriceModel, PricingAssumptions,
        ProductionAssumptions, ProductionCurveKind,
    },
    DeclineCurveKind, EconomicsScenarioInput, EngineConfig, EngineError, ForecastEngine,
    InMemoryStore, JobResult, JobStatus, MeasurementKind, ProductionStore, RateObservation,
    SimulationJob,
};

fn seeded_engine() -> ForecastEngine {
    let store = Arc::new(InMemoryStore::new());
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let series: Vec<RateObservation> = (0..120)
        .map(|day| {
            RateObservation::new(
                start + ChronoDuration::days(day),
                950.0 * (-0.0025 * day as f64).exp(),
                MeasurementKind::Oil,
            )
        })
        .collect();
    store.append_observations("well-7", &series).unwrap();
    ForecastEngine::new(store, EngineConfig::default())
}

fn flat_scenario() -> EconomicsScenarioInput {
    EconomicsScenarioInput {
        general: GeneralAssumptions {
            start_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            duration_years: 1,
            currency: "USD".into(),
            discount_rate_percent: 10.0,
        },
        production: ProductionAssumptions {
            curve_kind: ProductionCurveKind::Flat,
            initial_rate: 400.0,
            decline_rate_percent: None,
            monthly_rates: None,
        },
        pricing: PricingAssumptions {
            price_model: PriceModel::Flat,
            flat_price: Some(70.0),
            escalation_percent: None,
            monthly_prices: None,
        },
        costs: CostAssumptions {
            opex_fixed_monthly: 10_000.0,
            opex_variable_per_unit: 2.0,
            capex_initial: 500_000.0,
            capex_abandonment: 25_000.0,
            tax_rate_percent: 21.0,
            royalty_rate_percent: 12.5,
        },
    }
}

async fn wait_terminal(engine: &ForecastEngine, id: &str) -> SimulationJob {
    for _ in 0..500 {
        let job = engine.job_status(id).unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal state", id);
}

#[tokio::test]
async fn monte_carlo_job_runs_to_completion() {
    let engine = seeded_engine();
    let model = engine
        .fit_asset("well-7", MeasurementKind::Oil, DeclineCurveKind::Exponential)
        .unwrap();

    let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let job = engine
        .submit_simulation(&model.id, start, Some(200), 18, Some(7))
        .unwrap();

    // submit returns without blocking on execution
    assert!(!job.status.is_terminal() || job.result.is_some());

    let done = wait_terminal(&engine, &job.id).await;
    assert_eq!(done.status, JobStatus::Completed);
    assert_eq!(done.progress, 100);
    match done.result {
        Some(JobResult::Band(band)) => {
            assert_eq!(band.p50.len(), 18);
            for i in 0..18 {
                assert!(band.p90[i].value <= band.p10[i].value);
            }
        }
        other => panic!("expected a band result, got {:?}", other),
    }
}

#[tokio::test]
async fn economics_job_runs_to_completion() {
    let engine = seeded_engine();
    let job = engine.submit_valuation(flat_scenario());

    let done = wait_terminal(&engine, &job.id).await;
    assert_eq!(done.status, JobStatus::Completed);
    match done.result {
        Some(JobResult::Economics(result)) => {
            assert_eq!(result.cashflows.len(), 12);
            assert!(result.kpis.total_revenue > 0.0);
        }
        other => panic!("expected an economics result, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_scenario_fails_inside_the_job_record() {
    let engine = seeded_engine();
    let mut scenario = flat_scenario();
    scenario.pricing.flat_price = None; // structurally invalid

    let job = engine.submit_valuation(scenario);
    let done = wait_terminal(&engine, &job.id).await;

    assert_eq!(done.status, JobStatus::Failed);
    assert!(done.result.is_none());
    let error = done.error.unwrap();
    assert!(error.contains("flat_price"), "error was: {}", error);
}

#[tokio::test]
async fn simulating_an_unknown_model_is_rejected_at_submit() {
    let engine = seeded_engine();
    let start = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
    let err = engine
        .submit_simulation("no-such-model", start, Some(10), 6, None)
        .unwrap_err();
    assert!(matches!(err, EngineError::ModelNotFound(_)));
}

#[tokio::test]
async fn unknown_job_id_is_not_found() {
    let engine = seeded_engine();
    let err = engine.job_status("missing").unwrap_err();
    assert!(matches!(err, EngineError::Job(_)));
}
