use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use smartmoney_core::{
    CandleProvider, FetchError, FetchReason, FetchStrategy, OrchestratorConfig, ProviderKey,
    Series, SmartMoneyError,
};

/// Orchestrator that routes candle requests across registered providers.
pub struct Orchestrator {
    pub(crate) providers: Vec<Arc<dyn CandleProvider>>,
    pub(crate) priority: Vec<ProviderKey>,
    pub(crate) cfg: OrchestratorConfig,
}

/// Builder for constructing an [`Orchestrator`] with custom configuration.
pub struct OrchestratorBuilder {
    providers: Vec<Arc<dyn CandleProvider>>,
    priority: Vec<ProviderKey>,
    cfg: OrchestratorConfig,
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no providers; you must register at least one via [`Self::with_provider`].
    /// - Defaults are conservative: sequential fallback, 15s per-provider timeout,
    ///   no overall request deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: vec![],
            priority: vec![],
            cfg: OrchestratorConfig::default(),
        }
    }

    /// Register a candle provider.
    ///
    /// Behavior and trade-offs:
    /// - Registration order is the priority order unless [`Self::prefer`] says otherwise.
    /// - Duplicates are not deduplicated; avoid registering the same provider twice.
    #[must_use]
    pub fn with_provider(mut self, p: Arc<dyn CandleProvider>) -> Self {
        self.providers.push(p);
        self
    }

    /// Set an explicit provider priority, highest first.
    ///
    /// Behavior and trade-offs:
    /// - An ordering hint, not a filter: unlisted providers keep their
    ///   registration order after the listed ones.
    /// - Keys that match no registered provider are dropped at [`Self::build`].
    #[must_use]
    pub fn prefer(mut self, keys_desc: &[ProviderKey]) -> Self {
        self.priority = keys_desc.to_vec();
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: OrchestratorConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Select the fetch strategy.
    ///
    /// Behavior and trade-offs:
    /// - `Sequential`: one provider at a time; economical on rate limits but
    ///   pays each failing provider's latency in turn.
    /// - `Race`: all providers at once; lower tail latency, more upstream load.
    ///   The answer is still the highest-priority success.
    #[must_use]
    pub const fn fetch_strategy(mut self, strategy: FetchStrategy) -> Self {
        self.cfg.fetch_strategy = strategy;
        self
    }

    /// Set the per-provider timeout, applied under both strategies.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Bound the whole `candles` call.
    ///
    /// When exceeded the call returns `RequestTimeout` instead of the
    /// per-provider diagnostics.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Build the [`Orchestrator`].
    ///
    /// # Errors
    /// Returns `InvalidArg` if no providers have been registered via [`Self::with_provider`].
    pub fn build(self) -> Result<Orchestrator, SmartMoneyError> {
        if self.providers.is_empty() {
            return Err(SmartMoneyError::invalid_arg(
                "no providers registered; add at least one via with_provider(...)",
            ));
        }

        // Drop unknown keys and duplicates.
        let known: std::collections::HashSet<ProviderKey> =
            self.providers.iter().map(|p| p.key()).collect();
        let mut seen = std::collections::HashSet::new();
        let priority = self
            .priority
            .into_iter()
            .filter(|k| known.contains(k) && seen.insert(*k))
            .collect();

        Ok(Orchestrator {
            providers: self.providers,
            priority,
            cfg: self.cfg,
        })
    }
}

impl Orchestrator {
    /// Start building a new `Orchestrator`.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use smartmoney::{FetchStrategy, Orchestrator};
    /// use smartmoney_providers::{ApiKey, FinnhubConnector, TwelveDataConnector};
    ///
    /// let td = Arc::new(TwelveDataConnector::new(ApiKey::new(td_key)));
    /// let fh = Arc::new(FinnhubConnector::new(ApiKey::new(fh_key)));
    ///
    /// let orchestrator = Orchestrator::builder()
    ///     .with_provider(td)
    ///     .with_provider(fh)
    ///     .prefer(&[FinnhubConnector::KEY])
    ///     .fetch_strategy(FetchStrategy::Race)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OrchestratorConfig {
        &self.cfg
    }

    /// Provider keys in the order they will be tried.
    #[must_use]
    pub fn provider_order(&self) -> Vec<ProviderKey> {
        self.ordered().iter().map(|p| p.key()).collect()
    }

    pub(crate) fn ordered(&self) -> Vec<Arc<dyn CandleProvider>> {
        let mut out: Vec<(usize, Arc<dyn CandleProvider>)> =
            self.providers.iter().cloned().enumerate().collect();
        if self.priority.is_empty() {
            return out.into_iter().map(|(_, p)| p).collect();
        }
        let pos: HashMap<_, _> = self
            .priority
            .iter()
            .enumerate()
            .map(|(i, k)| (*k, i))
            .collect();
        out.sort_by_key(|(orig_i, p)| (pos.get(&p.key()).copied().unwrap_or(usize::MAX), *orig_i));
        out.into_iter().map(|(_, p)| p).collect()
    }

    /// Wrap a provider future with a timeout and re-check what it returned.
    ///
    /// The diagnostic is always tagged with `provider_name`, whatever the
    /// adapter put in it, so aggregates carry one entry per provider.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "smartmoney::core::provider_call_with_timeout",
            skip(fut),
            fields(
                provider = provider_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<Fut>(
        provider_name: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<Series, FetchError>
    where
        Fut: core::future::Future<Output = Result<Series, FetchError>>,
    {
        let res = match tokio::time::timeout(timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(FetchError::timeout(
                provider_name,
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };
        let res = res
            .map_err(|e| FetchError {
                provider: provider_name.to_string(),
                ..e
            })
            .and_then(|series| accept(provider_name, series));

        #[cfg(feature = "tracing")]
        {
            if let Err(e) = &res {
                tracing::warn!(
                    provider = provider_name,
                    reason = %e.reason,
                    message = %e.message,
                    "provider failed"
                );
            }
        }
        res
    }
}

/// A series counts as a success only when it is non-empty and well formed.
fn accept(provider_name: &'static str, series: Series) -> Result<Series, FetchError> {
    if series.is_empty() {
        return Err(FetchError::empty(provider_name));
    }
    if !series.is_well_formed() {
        return Err(FetchError::new(
            provider_name,
            FetchReason::MalformedPayload,
            "timestamps not strictly increasing or candle invariants violated",
        ));
    }
    Ok(series)
}

/// Apply an optional overall deadline to `fut`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    capability: &'static str,
    fut: Fut,
) -> Result<T, SmartMoneyError>
where
    Fut: core::future::Future<Output = Result<T, SmartMoneyError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or_else(|_| Err(SmartMoneyError::request_timeout(capability))),
        None => fut.await,
    }
}
