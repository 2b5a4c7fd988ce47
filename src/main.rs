//! Runs the payout contract suite against the configured API
//!
//! Environment variables:
//!   QIWI_TOKEN        - bearer token
//!   AGENT_ID          - agent identifier (default: acme)
//!   POINT_ID          - point identifier (default: 00001)
//!   PAYOUT_BASE_URL   - API base URL
//!   PAYOUT_TIMEOUT_MS - per-request timeout (default: 10000)

use payout_contract::{ContractConfig, ContractSuite};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ContractConfig::from_env()?;
    info!("Payout API: {}", config.base_url);

    let suite = ContractSuite::new(&config)?;
    let report = suite.run().await;

    let warnings = report.warnings().count();
    let failures: Vec<_> = report.failures().collect();

    if failures.is_empty() {
        info!(
            "All {} scenarios passed ({} warnings)",
            report.outcomes.len(),
            warnings
        );
        return Ok(());
    }

    for outcome in &failures {
        error!("FAILED {}: {}", outcome.scenario, outcome.verdict);
    }
    error!(
        "{} of {} scenarios failed",
        failures.len(),
        report.outcomes.len()
    );
    std::process::exit(1);
}
