use async_trait::async_trait;

use crate::{FetchError, Interval, Series};
pub use smartmoney_types::ProviderKey;

/// Uniform adapter contract for upstream candle providers.
///
/// Implementations translate one provider's request format, field names and
/// timestamp encoding into a normalized [`Series`]. They perform network I/O
/// only and hold no mutable shared state, so a single instance can serve
/// concurrent requests.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// A stable identifier used in priority lists and diagnostics (e.g. "twelvedata").
    fn name(&self) -> &'static str;

    /// Canonical provider key constructed from the static name.
    fn key(&self) -> ProviderKey {
        ProviderKey::new(self.name())
    }

    /// Rewrite a caller symbol into this provider's identifier format.
    ///
    /// Must be idempotent: `normalize_symbol(normalize_symbol(s)) == normalize_symbol(s)`.
    fn normalize_symbol(&self, symbol: &str) -> String;

    /// Fetch at most `count` of the most recent candles for `symbol`.
    ///
    /// # Errors
    /// Returns a [`FetchError`] tagged with this provider's name describing why
    /// no series could be produced.
    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Series, FetchError>;
}
