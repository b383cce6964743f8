#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use smartmoney::{Candle, CandleProvider, FetchError, FetchReason, Interval, Series, normalize};

#[derive(Clone)]
enum Script {
    Ok(Vec<Candle>),
    Fail(FetchReason),
    Hang,
}

/// In-memory provider used by integration tests.
pub struct MockProvider {
    name: &'static str,
    delay: Duration,
    script: Script,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn builder() -> MockProviderBuilder {
        MockProviderBuilder::default()
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandleProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        symbol.to_string()
    }

    async fn fetch(
        &self,
        _symbol: &str,
        _interval: Interval,
        count: usize,
    ) -> Result<Series, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.script {
            Script::Ok(raw) => {
                let mut s = normalize(raw.clone()).series;
                s.keep_last(count);
                Ok(s)
            }
            Script::Fail(reason) => Err(FetchError::new(self.name, *reason, "mock failure")),
            Script::Hang => std::future::pending().await,
        }
    }
}

pub struct MockProviderBuilder {
    name: &'static str,
    delay: Duration,
    script: Script,
}

impl Default for MockProviderBuilder {
    fn default() -> Self {
        Self {
            name: "mock",
            delay: Duration::ZERO,
            script: Script::Fail(FetchReason::Unsupported),
        }
    }
}

impl MockProviderBuilder {
    pub fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn returns_ok(mut self, candles: Vec<Candle>) -> Self {
        self.script = Script::Ok(candles);
        self
    }

    pub fn returns_empty(mut self) -> Self {
        self.script = Script::Ok(Vec::new());
        self
    }

    pub fn fails(mut self, reason: FetchReason) -> Self {
        self.script = Script::Fail(reason);
        self
    }

    pub fn hangs(mut self) -> Self {
        self.script = Script::Hang;
        self
    }

    pub fn build(self) -> Arc<MockProvider> {
        Arc::new(MockProvider {
            name: self.name,
            delay: self.delay,
            script: self.script,
            calls: AtomicUsize::new(0),
        })
    }
}
