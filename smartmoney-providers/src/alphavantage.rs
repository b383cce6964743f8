use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use smartmoney_core::{
    Candle, CandleProvider, FetchError, FetchReason, Interval, ProviderKey, Series, epoch_from_str,
};

use crate::ApiKey;
use crate::http::{
    DEFAULT_TIMEOUT, default_client, get_json, http_options, into_series, loose_candle, malformed,
    number,
};
use crate::symbol::compact;

const NAME: &str = "alphavantage";
const COMPACT_ROWS: usize = 100;

/// Alpha Vantage `TIME_SERIES_*` connector.
///
/// Timestamps are read as UTC; the provider reports intraday series in its
/// own exchange time zone, so intraday candles may be offset by a fixed amount.
pub struct AlphaVantageConnector {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    timeout: Duration,
}

impl AlphaVantageConnector {
    /// Static provider key for priority configuration.
    pub const KEY: ProviderKey = ProviderKey::new(NAME);
    /// Production API root.
    pub const BASE_URL: &'static str = "https://www.alphavantage.co";

    /// Build with the production endpoint. A `None` key makes every fetch fail
    /// with `NoCredentials` without touching the network.
    #[must_use]
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            client: default_client(),
            base_url: Self::BASE_URL.to_string(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

http_options!(AlphaVantageConnector);

/// `(function, intraday interval)` for a cadence.
fn function_for(interval: Interval) -> Option<(&'static str, Option<&'static str>)> {
    let intraday = |iv| Some(("TIME_SERIES_INTRADAY", Some(iv)));
    match interval {
        Interval::I1m => intraday("1min"),
        Interval::I5m => intraday("5min"),
        Interval::I15m => intraday("15min"),
        Interval::I30m => intraday("30min"),
        Interval::I1h => intraday("60min"),
        Interval::D1 => Some(("TIME_SERIES_DAILY", None)),
        Interval::W1 => Some(("TIME_SERIES_WEEKLY", None)),
        _ => None,
    }
}

/// Decode the nested `"Time Series (...)"` object keyed by datetime strings.
pub(crate) fn decode(body: &Value) -> Result<Vec<Candle>, FetchError> {
    if let Some(msg) = body.get("Error Message").and_then(Value::as_str) {
        return Err(FetchError::new(
            NAME,
            FetchReason::Upstream { status: 400 },
            msg,
        ));
    }
    for throttle in ["Note", "Information"] {
        if let Some(msg) = body.get(throttle).and_then(Value::as_str) {
            return Err(FetchError::new(
                NAME,
                FetchReason::Upstream { status: 429 },
                msg,
            ));
        }
    }
    let series = body
        .as_object()
        .and_then(|o| {
            o.iter()
                .find(|(k, _)| k.contains("Time Series"))
                .and_then(|(_, v)| v.as_object())
        })
        .ok_or_else(|| malformed(NAME, "missing time series object"))?;

    Ok(series
        .iter()
        .map(|(stamp, row)| {
            loose_candle(
                epoch_from_str(stamp),
                number(row.get("1. open")),
                number(row.get("2. high")),
                number(row.get("3. low")),
                number(row.get("4. close")),
                number(row.get("5. volume")),
            )
        })
        .collect())
}

#[async_trait]
impl CandleProvider for AlphaVantageConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        compact(symbol)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "smartmoney_providers::alphavantage::fetch", skip(self))
    )]
    async fn fetch(
        &self,
        symbol: &str,
        interval: Interval,
        count: usize,
    ) -> Result<Series, FetchError> {
        let Some(key) = &self.api_key else {
            return Err(FetchError::no_credentials(NAME));
        };
        let Some((function, intraday)) = function_for(interval) else {
            return Err(FetchError::new(
                NAME,
                FetchReason::Unsupported,
                format!("interval {interval} not offered"),
            ));
        };
        let outputsize = if count <= COMPACT_ROWS { "compact" } else { "full" };
        let mut query = vec![
            ("function", function.to_string()),
            ("symbol", self.normalize_symbol(symbol)),
            ("outputsize", outputsize.to_string()),
            ("apikey", key.expose().to_string()),
        ];
        if let Some(iv) = intraday {
            query.push(("interval", iv.to_string()));
        }
        let url = format!("{}/query", self.base_url);
        let body = get_json(&self.client, NAME, &url, &query, self.timeout).await?;
        into_series(NAME, decode(&body)?, count)
    }
}
