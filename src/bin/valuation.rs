//! Scenario valuation tool
//!
//! Reads an `EconomicsScenarioInput` JSON file, runs the valuation engine,
//! and prints the cash-flow schedule and KPI summary as JSON.
//!
//! ```bash
//! valuation scenario.json
//! valuation scenario.json --kpis-only
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use petrocast::{EconomicsScenarioInput, EngineConfig, ValuationEngine};

#[derive(Parser, Debug)]
#[command(name = "valuation")]
#[command(about = "Run the economic valuation engine on a scenario file")]
#[command(version)]
struct CliArgs {
    /// Path to the scenario JSON file
    scenario: String,

    /// Print only the KPI block, not the full schedule
    #[arg(long)]
    kpis_only: bool,
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
    let cfg = EngineConfig::load();

    let raw = std::fs::read_to_string(&args.scenario)
        .with_context(|| format!("could not read scenario file {}", args.scenario))?;
    let input: EconomicsScenarioInput =
        serde_json::from_str(&raw).context("scenario file is not a valid scenario")?;

    let result = ValuationEngine::with_config(cfg.irr)
        .run(&input)
        .context("valuation failed")?;

    info!(
        months = result.cashflows.len(),
        npv = result.kpis.npv,
        "Valuation complete"
    );

    if args.kpis_only {
        println!("{}", serde_json::to_string_pretty(&result.kpis)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
