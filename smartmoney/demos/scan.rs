//! End-to-end scan: fetch with failover, detect, record, resolve.
//!
//! Real providers are used when their keys are present in the environment
//! (`TWELVEDATA_API_KEY`, `FINNHUB_API_KEY`, `ALPHAVANTAGE_API_KEY`); the
//! fixture provider is always registered last so the demo runs offline.
//!
//! Suggested: RUST_LOG=info,smartmoney=debug cargo run -p smartmoney --example scan --features tracing
use std::sync::Arc;

use smartmoney::{
    CalibrationConfig, CandleProvider, FetchStrategy, Orchestrator, Outcome, Scanner,
    SqliteEventStore,
};
use smartmoney_mock::MockProvider;
use smartmoney_providers::{ApiKey, AlphaVantageConnector, FinnhubConnector, TwelveDataConnector};
use tracing_subscriber::fmt::format::FmtSpan;

fn key(var: &str) -> Option<ApiKey> {
    std::env::var(var).ok().and_then(ApiKey::new)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    let mut providers: Vec<Arc<dyn CandleProvider>> = Vec::new();
    if let Some(k) = key("TWELVEDATA_API_KEY") {
        providers.push(Arc::new(TwelveDataConnector::new(Some(k))));
    }
    if let Some(k) = key("FINNHUB_API_KEY") {
        providers.push(Arc::new(FinnhubConnector::new(Some(k))));
    }
    if let Some(k) = key("ALPHAVANTAGE_API_KEY") {
        providers.push(Arc::new(AlphaVantageConnector::new(Some(k))));
    }
    providers.push(Arc::new(MockProvider::new()));

    let orchestrator = providers
        .into_iter()
        .fold(Orchestrator::builder(), |b, p| b.with_provider(p))
        .fetch_strategy(FetchStrategy::Race)
        .build()?;
    println!("provider order: {:?}", orchestrator.provider_order());

    let store = Arc::new(SqliteEventStore::open_in_memory(CalibrationConfig::default())?);
    let scanner = Scanner::new(orchestrator, store);

    let symbol = std::env::args().nth(1).unwrap_or_else(|| "XAUUSD".to_string());
    let scan = scanner.scan(&symbol, "1h", 200).await?;
    println!(
        "{} candles from {}: {} order blocks, {} fvg, {} sweeps",
        scan.candles,
        scan.provider,
        scan.report.order_blocks.len(),
        scan.report.fvg.len(),
        scan.report.sweeps.len(),
    );
    if let Some(c) = &scan.report.candidate {
        println!(
            "{:?} {}: entry {:.5} stop {:.5} target {:.5} (rr {:.2})",
            c.side, c.symbol, c.entry, c.stop, c.target, c.risk_reward
        );
    }

    if let Some(&id) = scan.recorded.first() {
        let resolution = scanner.resolve_event(id, Outcome::Win)?;
        println!("resolved event {id}; {} open siblings recalibrated", resolution.adjusted);
    }
    for (kind, stats) in scanner.stats(&symbol)? {
        println!("{kind}: {stats:?} win rate {:?}", stats.win_rate());
    }
    Ok(())
}
