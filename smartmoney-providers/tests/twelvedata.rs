use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;
use smartmoney_core::{CandleProvider, FetchReason, Interval};
use smartmoney_providers::{ApiKey, TwelveDataConnector};

fn connector(server: &MockServer) -> TwelveDataConnector {
    TwelveDataConnector::new(ApiKey::new("td-key")).with_base_url(server.base_url())
}

#[tokio::test]
async fn newest_first_strings_become_ascending_series() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/time_series")
                .query_param("symbol", "XAU/USD")
                .query_param("interval", "1h")
                .query_param("outputsize", "2")
                .query_param("apikey", "td-key");
            then.status(200).json_body(json!({
                "meta": {"symbol": "XAU/USD", "interval": "1h"},
                "values": [
                    {"datetime": "2024-01-01 12:00:00", "open": "2050.0", "high": "2055.0", "low": "2049.0", "close": "2054.0"},
                    {"datetime": "2024-01-01 11:00:00", "open": "2045.0", "high": "2051.0", "low": "2044.0", "close": "2050.0"},
                    {"datetime": "2024-01-01 10:00:00", "open": "2040.0", "high": "2046.0", "low": "2039.0", "close": "2045.0"}
                ],
                "status": "ok"
            }));
        })
        .await;

    let series = connector(&server)
        .fetch("XAUUSD", Interval::I1h, 2)
        .await
        .expect("series");
    mock.assert_async().await;

    let ts: Vec<i64> = series.iter().map(|c| c.ts).collect();
    assert_eq!(ts, vec![1_704_106_800, 1_704_110_400]);
    assert!((series.last().unwrap().close - 2054.0).abs() < 1e-9);
}

#[tokio::test]
async fn server_error_maps_to_upstream_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/time_series");
            then.status(503).body("service unavailable");
        })
        .await;

    let err = connector(&server)
        .fetch("EUR/USD", Interval::I5m, 50)
        .await
        .unwrap_err();
    assert_eq!(err.provider, "twelvedata");
    assert_eq!(err.reason, FetchReason::Upstream { status: 503 });
}

#[tokio::test]
async fn garbage_body_is_malformed_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/time_series");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let err = connector(&server)
        .fetch("EUR/USD", Interval::I5m, 50)
        .await
        .unwrap_err();
    assert_eq!(err.reason, FetchReason::MalformedPayload);
}

#[tokio::test]
async fn in_band_error_is_upstream() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/time_series");
            then.status(200)
                .json_body(json!({"code": 429, "message": "run out of API credits", "status": "error"}));
        })
        .await;

    let err = connector(&server)
        .fetch("EUR/USD", Interval::I1m, 10)
        .await
        .unwrap_err();
    assert_eq!(err.reason, FetchReason::Upstream { status: 429 });
    assert!(err.reason.is_transient());
}

#[tokio::test]
async fn missing_key_fails_without_network() {
    // Port 9 (discard) is never served; reaching the network would yield Transport.
    let td = TwelveDataConnector::new(None).with_base_url("http://127.0.0.1:9");
    let err = td.fetch("XAUUSD", Interval::I1m, 10).await.unwrap_err();
    assert_eq!(err.reason, FetchReason::NoCredentials);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/time_series");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({"values": [], "status": "ok"}));
        })
        .await;

    let err = connector(&server)
        .with_timeout(Duration::from_millis(50))
        .fetch("XAUUSD", Interval::I1m, 10)
        .await
        .unwrap_err();
    assert_eq!(err.reason, FetchReason::Timeout);
}

#[test]
fn symbol_normalization_is_idempotent() {
    let td = TwelveDataConnector::new(None);
    for s in ["XAUUSD", "eur_usd", "OANDA:GBP_JPY", "BTC/USD", "AAPL"] {
        let once = td.normalize_symbol(s);
        assert_eq!(td.normalize_symbol(&once), once);
    }
    assert_eq!(td.normalize_symbol("XAUUSD"), "XAU/USD");
}
