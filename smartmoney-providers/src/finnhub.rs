use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use smartmoney_core::{
    Candle, CandleProvider, FetchError, FetchReason, Interval, ProviderKey, Series,
    epoch_from_number,
};

use crate::ApiKey;
use crate::http::{
    DEFAULT_TIMEOUT, default_client, get_json, http_options, into_series, loose_candle, malformed,
    number,
};
use crate::symbol::{finnhub_composite, finnhub_market};

const NAME: &str = "finnhub";

/// Finnhub `/{forex,crypto,stock}/candle` connector.
pub struct FinnhubConnector {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    timeout: Duration,
}

impl FinnhubConnector {
    /// Static provider key for priority configuration.
    pub const KEY: ProviderKey = ProviderKey::new(NAME);
    /// Production API root.
    pub const BASE_URL: &'static str = "https://finnhub.io/api/v1";

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

http_options!(FinnhubConnector);

fn resolution(interval: Interval) -> Option<&'static str> {
    match interval {
        Interval::I1m => Some("1"),
        Interval::I5m => Some("5"),
        Interval::I15m => Some("15"),
        Interval::I30m => Some("30"),
        Interval::I1h => Some("60"),
        Interval::D1 => Some("D"),
        Interval::W1 => Some("W"),
        _ => None,
    }
}

/// Decode the column-array body (`s`, `t`, `o`, `h`, `l`, `c`, `v`).
pub(crate) fn decode(body: &Value) -> Result<Vec<Candle>, FetchError> {
    if let Some(msg) = body.get("error").and_then(Value::as_str) {
        return Err(FetchError::new(
            NAME,
            FetchReason::Upstream { status: 400 },
            msg,
        ));
    }
    match body.get("s").and_then(Value::as_str) {
        Some("ok") => {}
        Some("no_data") => return Err(FetchError::empty(NAME)),
        other => {
            return Err(malformed(
                NAME,
                format!("unexpected status field {other:?}"),
            ));
        }
    }
    let column = |k: &str| body.get(k).and_then(Value::as_array);
    let ts = column("t").ok_or_else(|| malformed(NAME, "missing 't' column"))?;
    let (o, h, l, c) = (column("o"), column("h"), column("l"), column("c"));
    let v = column("v");
    let at = |col: Option<&Vec<Value>>, i: usize| number(col.and_then(|a| a.get(i)));

    Ok(ts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            loose_candle(
                t.as_i64().map(epoch_from_number),
                at(o, i),
                at(h, i),
                at(l, i),
                at(c, i),
                at(v, i),
            )
        })
        .collect())
}

#[async_trait]
impl CandleProvider for FinnhubConnector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn normalize_symbol(&self, symbol: &str) -> String {
        finnhub_composite(symbol)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "smartmoney_providers::finnhub::fetch", skip(self))
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
        let Some(res) = resolution(interval) else {
            return Err(FetchError::new(
                NAME,
                FetchReason::Unsupported,
                format!("interval {interval} not offered"),
            ));
        };
        let composite = self.normalize_symbol(symbol);
        let market = finnhub_market(&composite);

        // One extra bucket so the window still covers `count` closed candles.
        let to = chrono::Utc::now().timestamp();
        let span = i64::try_from(count).unwrap_or(i64::MAX / 2).saturating_add(1);
        let from = to.saturating_sub(span.saturating_mul(interval.seconds()));

        let query = [
            ("symbol", composite),
            ("resolution", res.to_string()),
            ("from", from.to_string()),
            ("to", to.to_string()),
            ("token", key.expose().to_string()),
        ];
        let url = format!("{}/{}/candle", self.base_url, market.path());
        let body = get_json(&self.client, NAME, &url, &query, self.timeout).await?;
        into_series(NAME, decode(&body)?, count)
    }
}
