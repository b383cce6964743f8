//! Deterministic candle providers for tests and demos.
//!
//! - [`MockProvider`] serves static fixtures and needs no network.
//! - [`ScriptedProvider`] defers every call to a [`ScriptedController`] so a
//!   test can decide per symbol whether to return, fail or hang.
use async_trait::async_trait;
use smartmoney_core::{
    CandleProvider, FetchError, FetchReason, Interval, Series, normalize,
};

mod dynamic;
mod fixtures;

pub use dynamic::{MockBehavior, ScriptedController, ScriptedProvider};
pub use fixtures::EPOCH;

/// Symbol that makes [`MockProvider`] fail with an upstream 503.
pub const FAIL: &str = "FAIL";
/// Symbol that makes [`MockProvider`] answer after [`MockProvider::SLOW_MS`].
pub const TIMEOUT: &str = "TIMEOUT";
/// Symbol that makes [`MockProvider`] return an empty series.
pub const EMPTY: &str = "EMPTY";

/// Fixture-backed provider for CI-safe demos.
///
/// `XAUUSD`, `EURUSD` and `NAS100` have fixtures; any other symbol fails with
/// `EmptySeries`. The special symbols [`FAIL`], [`TIMEOUT`] and [`EMPTY`]
/// exercise the orchestrator's failure paths.
pub struct MockProvider {
    name: &'static str,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Delay applied to the [`TIMEOUT`] symbol.
    pub const SLOW_MS: u64 = 200;

    #[must_use]
    pub const fn new() -> Self {
        Self::named("smartmoney-mock")
    }

    /// Same fixtures under another provider name, for failover setups.
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl CandleProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        symbol.trim().to_ascii_uppercase()
    }

    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Series, FetchError> {
        let symbol = self.normalize_symbol(symbol);
        match symbol.as_str() {
            FAIL => {
                return Err(FetchError::new(
                    self.name,
                    FetchReason::Upstream { status: 503 },
                    "forced failure",
                ));
            }
            TIMEOUT => tokio::time::sleep(std::time::Duration::from_millis(Self::SLOW_MS)).await,
            EMPTY => return Ok(Series::empty()),
            _ => {}
        }
        let lookup = if symbol == TIMEOUT { "XAUUSD" } else { symbol.as_str() };
        let raw = fixtures::by_symbol(lookup, interval).ok_or_else(|| FetchError::empty(self.name))?;
        let mut series = normalize(raw).series;
        series.keep_last(count);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_is_spaced_by_interval() {
        let s = MockProvider::new().fetch("xauusd", Interval::I1h, 100).await.unwrap();
        assert_eq!(s.len(), 10);
        let ts: Vec<i64> = s.iter().map(|c| c.ts).collect();
        assert_eq!(ts[0], EPOCH);
        assert_eq!(ts[1] - ts[0], 3_600);
        assert!(s.is_well_formed());
    }

    #[tokio::test]
    async fn count_keeps_most_recent() {
        let s = MockProvider::new().fetch("EURUSD", Interval::D1, 2).await.unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.last().map(|c| c.close), Some(1.42));
    }

    #[tokio::test]
    async fn special_symbols_drive_failure_paths() {
        let p = MockProvider::named("backup");
        let err = p.fetch(FAIL, Interval::I1h, 10).await.unwrap_err();
        assert_eq!(err.provider, "backup");
        assert_eq!(err.reason, FetchReason::Upstream { status: 503 });

        assert!(p.fetch(EMPTY, Interval::I1h, 10).await.unwrap().is_empty());

        let err = p.fetch("UNKNOWN", Interval::I1h, 10).await.unwrap_err();
        assert_eq!(err.reason, FetchReason::EmptySeries);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_symbol_is_slow_but_succeeds() {
        let started = tokio::time::Instant::now();
        let s = MockProvider::new().fetch(TIMEOUT, Interval::I1h, 10).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(MockProvider::SLOW_MS));
        assert!(!s.is_empty());
    }
}
