use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use smartmoney_core::{Candle, CandleProvider, FetchError, FetchReason, Interval, Series, normalize};

/// Instruction for how `fetch` should behave for a given symbol.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Normalize these candles and return them.
    Return(Vec<Candle>),
    /// Return the raw candles after sleeping.
    Delayed(Duration, Vec<Candle>),
    /// Fail immediately with this reason.
    Fail(FetchReason),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    fallback: Option<MockBehavior>,
    calls: HashMap<String, usize>,
}

/// Controller handle used by tests to drive a [`ScriptedProvider`] from the outside.
pub struct ScriptedController {
    state: Arc<Mutex<InternalState>>,
}

impl ScriptedController {
    /// Set the behavior for one symbol.
    pub async fn set_behavior(&self, symbol: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(symbol.to_string(), behavior);
    }

    /// Behavior for symbols without a rule of their own.
    pub async fn set_fallback(&self, behavior: MockBehavior) {
        self.state.lock().await.fallback = Some(behavior);
    }

    /// How many times `fetch` was entered for `symbol`.
    pub async fn calls(&self, symbol: &str) -> usize {
        let guard = self.state.lock().await;
        guard.calls.get(symbol).copied().unwrap_or(0)
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.fallback = None;
        guard.calls.clear();
    }
}

/// A provider that defers all behavior to an external controller.
///
/// Symbols with no rule and no fallback fail with `Unsupported`.
pub struct ScriptedProvider {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl ScriptedProvider {
    /// Create a scripted provider and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn CandleProvider>, ScriptedController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = ScriptedController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn CandleProvider>, controller)
    }

    fn series(raw: Vec<Candle>, count: usize) -> Series {
        let mut series = normalize(raw).series;
        series.keep_last(count);
        series
    }
}

#[async_trait]
impl CandleProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        symbol.to_string()
    }

    async fn fetch(
        &self,
        symbol: &str,
        _interval: Interval,
        count: usize,
    ) -> Result<Series, FetchError> {
        // Snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(symbol.to_string()).or_default() += 1;
            guard
                .rules
                .get(symbol)
                .cloned()
                .or_else(|| guard.fallback.clone())
        };

        match behavior {
            Some(MockBehavior::Return(raw)) => Ok(Self::series(raw, count)),
            Some(MockBehavior::Delayed(delay, raw)) => {
                tokio::time::sleep(delay).await;
                Ok(Self::series(raw, count))
            }
            Some(MockBehavior::Fail(reason)) => {
                Err(FetchError::new(self.name, reason, "scripted failure"))
            }
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(FetchError::new(
                self.name,
                FetchReason::Unsupported,
                format!("no behavior scripted for {symbol}"),
            )),
        }
    }
}
