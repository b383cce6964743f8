//! Shared request and decoding plumbing for the HTTP providers.

use std::time::Duration;

use serde_json::Value;
use smartmoney_core::{Candle, FetchError, FetchReason, Series, normalize};

/// Default per-request HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const BODY_SNIPPET: usize = 200;

pub(crate) fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// GET `url` with `query` and decode the body as JSON.
///
/// Transport failures, non-2xx statuses and undecodable bodies are mapped to
/// the matching [`FetchReason`]. URLs are stripped from transport errors since
/// they carry the credential in the query string.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<Value, FetchError> {
    let resp = client
        .get(url)
        .query(query)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport(provider, e, timeout))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| transport(provider, e, timeout))?;

    if !status.is_success() {
        return Err(FetchError::new(
            provider,
            FetchReason::Upstream {
                status: status.as_u16(),
            },
            snippet(&body),
        ));
    }

    serde_json::from_str(&body).map_err(|e| {
        FetchError::new(
            provider,
            FetchReason::MalformedPayload,
            format!("invalid json: {e}"),
        )
    })
}

fn transport(provider: &'static str, e: reqwest::Error, timeout: Duration) -> FetchError {
    if e.is_timeout() {
        return FetchError::timeout(
            provider,
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        );
    }
    FetchError::new(provider, FetchReason::Transport, e.without_url().to_string())
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET).collect()
}

/// Read a price or volume that may arrive as a JSON number or numeric string.
pub(crate) fn number(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build a candle from loosely typed fields; missing prices become NaN so
/// normalization reports the row instead of silently fabricating it.
pub(crate) fn loose_candle(
    ts: Option<i64>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
) -> Candle {
    Candle {
        ts: ts.unwrap_or(0),
        open: open.unwrap_or(f64::NAN),
        high: high.unwrap_or(f64::NAN),
        low: low.unwrap_or(f64::NAN),
        close: close.unwrap_or(f64::NAN),
        volume,
    }
}

/// Normalize decoded rows, keep the `count` most recent and reject empty output.
pub(crate) fn into_series(
    provider: &'static str,
    raw: Vec<Candle>,
    count: usize,
) -> Result<Series, FetchError> {
    let out = normalize(raw);
    if !out.rejected.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            provider,
            rejected = out.rejected.len(),
            first = %out.rejected[0],
            "dropped malformed candles"
        );
    }
    let mut series = out.series;
    series.keep_last(count);
    if series.is_empty() {
        return Err(FetchError::empty(provider));
    }
    Ok(series)
}

pub(crate) fn malformed(provider: &'static str, msg: impl Into<String>) -> FetchError {
    FetchError::new(provider, FetchReason::MalformedPayload, msg)
}

/// Builder-style options shared by every HTTP connector.
macro_rules! http_options {
    ($ty:ty) => {
        impl $ty {
            /// Override the API root, e.g. to point at a mock server.
            #[must_use]
            pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
                self.base_url = base_url.into().trim_end_matches('/').to_string();
                self
            }

            /// Per-request HTTP timeout (default 15 s).
            #[must_use]
            pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
                self.timeout = timeout;
                self
            }

            /// Reuse an existing `reqwest` client (connection pool, proxy settings).
            #[must_use]
            pub fn with_client(mut self, client: reqwest::Client) -> Self {
                self.client = client;
                self
            }
        }
    };
}
pub(crate) use http_options;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_strings_and_numbers() {
        assert_eq!(number(Some(&json!("1.25"))), Some(1.25));
        assert_eq!(number(Some(&json!(2))), Some(2.0));
        assert_eq!(number(Some(&json!(null))), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn empty_after_normalization_is_empty_series() {
        let bad = loose_candle(Some(10), None, Some(1.0), Some(1.0), Some(1.0), None);
        let err = into_series("p", vec![bad], 10).unwrap_err();
        assert_eq!(err.reason, FetchReason::EmptySeries);
    }
}
