use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use smartmoney_core::{
    CandleProvider, FetchError, FetchReason, Interval, ProviderKey, Series, epoch_from_str,
};

use crate::ApiKey;
use crate::http::{
    DEFAULT_TIMEOUT, default_client, get_json, http_options, into_series, loose_candle, malformed,
    number,
};
use crate::symbol::slash_pair;

const NAME: &str = "twelvedata";
const MAX_OUTPUTSIZE: usize = 5_000;

/// Twelve Data `/time_series` connector.
pub struct TwelveDataConnector {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    timeout: Duration,
}

impl TwelveDataConnector {
    /// Static provider key for priority configuration.
    pub const KEY: ProviderKey = ProviderKey::new(NAME);
    /// Production API root.
    pub const BASE_URL: &'static str = "https://api.twelvedata.com";

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

http_options!(TwelveDataConnector);

/// Decode a `/time_series` body. Values arrive newest first with string fields.
pub(crate) fn decode(body: &Value) -> Result<Vec<smartmoney_core::Candle>, FetchError> {
    if body.get("status").and_then(Value::as_str) == Some("error") {
        let code = body
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(400);
        let msg = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified error");
        return Err(FetchError::new(
            NAME,
            FetchReason::Upstream { status: code },
            msg,
        ));
    }
    let values = body
        .get("values")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(NAME, "missing 'values' array"))?;

    Ok(values
        .iter()
        .map(|row| {
            loose_candle(
                row.get("datetime").and_then(Value::as_str).and_then(epoch_from_str),
                number(row.get("open")),
                number(row.get("high")),
                number(row.get("low")),
                number(row.get("close")),
                number(row.get("volume")),
            )
        })
        .collect())
}

#[async_trait]
impl CandleProvider for TwelveDataConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        slash_pair(symbol)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "smartmoney_providers::twelvedata::fetch", skip(self))
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
        let query = [
            ("symbol", self.normalize_symbol(symbol)),
            ("interval", interval.as_str().to_string()),
            ("outputsize", count.min(MAX_OUTPUTSIZE).to_string()),
            ("format", "JSON".to_string()),
            ("apikey", key.expose().to_string()),
        ];
        let url = format!("{}/time_series", self.base_url);
        let body = get_json(&self.client, NAME, &url, &query, self.timeout).await?;
        into_series(NAME, decode(&body)?, count)
    }
}
