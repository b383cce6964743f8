use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use smartmoney_core::{FetchStrategy, Interval, ProviderKey, Series, SmartMoneyError};

use super::util::PriorityGate;
use crate::Orchestrator;
use crate::core::with_request_deadline;

/// Series served by the highest-priority provider that succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlesResponse {
    /// Provider that produced `series`.
    pub provider: ProviderKey,
    /// Cadence that was requested.
    pub interval: Interval,
    /// Normalized, non-empty candles, oldest first, at most `count` long.
    pub series: Series,
}

impl Orchestrator {
    /// Fetch the `count` most recent candles for `symbol`, failing over across providers.
    ///
    /// Behavior and trade-offs:
    /// - Providers are tried in priority order; an empty or ill-formed series
    ///   counts as that provider's failure and failover continues.
    /// - Each provider call is bounded by the per-provider timeout; no provider
    ///   is retried within one call.
    /// - Under `Race` every provider is asked at once, but a success is only
    ///   returned after all higher-priority providers have failed.
    ///
    /// # Errors
    /// - `InvalidArg` for an empty symbol, `count == 0` or an unknown interval,
    ///   before any provider is contacted.
    /// - `AllProvidersFailed` with one diagnostic per provider, in priority order.
    /// - `RequestTimeout` when the optional request deadline elapses first.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "smartmoney::router::candles", skip(self))
    )]
    pub async fn candles(
        &self,
        symbol: &str,
        interval: &str,
        count: usize,
    ) -> Result<CandlesResponse, SmartMoneyError> {
        let interval: Interval = interval.parse()?;
        self.candles_for(symbol, interval, count).await
    }

    /// Same as [`Orchestrator::candles`] with an already parsed interval.
    ///
    /// # Errors
    /// See [`Orchestrator::candles`].
    pub async fn candles_for(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<CandlesResponse, SmartMoneyError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(SmartMoneyError::invalid_arg("symbol must not be empty"));
        }
        if count == 0 {
            return Err(SmartMoneyError::invalid_arg("count must be at least 1"));
        }

        let fut = async {
            match self.cfg.fetch_strategy {
                FetchStrategy::Race => self.candles_race(symbol, interval, count).await,
                _ => self.candles_sequential(symbol, interval, count).await,
            }
        };
        let mut resp = with_request_deadline(self.cfg.request_timeout, "candles", fut).await?;
        resp.series.keep_last(count);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            provider = %resp.provider,
            candles = resp.series.len(),
            "candles served"
        );
        Ok(resp)
    }

    async fn candles_sequential(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<CandlesResponse, SmartMoneyError> {
        let mut errors = Vec::new();
        for p in self.ordered() {
            let fut = p.fetch(symbol, interval, count);
            match Self::provider_call_with_timeout(p.name(), self.cfg.provider_timeout, fut).await {
                Ok(series) => {
                    return Ok(CandlesResponse {
                        provider: p.key(),
                        interval,
                        series,
                    });
                }
                Err(e) => errors.push(e),
            }
        }
        Err(SmartMoneyError::AllProvidersFailed(errors))
    }

    async fn candles_race(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<CandlesResponse, SmartMoneyError> {
        let providers = self.ordered();
        let timeout = self.cfg.provider_timeout;
        let mut futs = FuturesUnordered::new();
        for (rank, p) in providers.iter().enumerate() {
            let name = p.name();
            let fut = p.fetch(symbol, interval, count);
            futs.push(async move {
                (rank, Self::provider_call_with_timeout(name, timeout, fut).await)
            });
        }

        let mut gate: PriorityGate<Series> = PriorityGate::new(providers.len());
        while let Some((rank, res)) = futs.next().await {
            if let Some((winner, series)) = gate.settle(rank, res) {
                // Dropping `futs` cancels the lower-priority stragglers.
                return Ok(CandlesResponse {
                    provider: providers[winner].key(),
                    interval,
                    series,
                });
            }
        }
        Err(SmartMoneyError::AllProvidersFailed(gate.into_errors()))
    }
}
