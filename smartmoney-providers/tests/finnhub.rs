use httpmock::prelude::*;
use serde_json::json;
use smartmoney_core::{CandleProvider, FetchReason, Interval};
use smartmoney_providers::{ApiKey, FinnhubConnector};

fn connector(server: &MockServer) -> FinnhubConnector {
    FinnhubConnector::new(ApiKey::new("fh-key")).with_base_url(server.base_url())
}

#[tokio::test]
async fn forex_pair_hits_forex_endpoint_with_composite_symbol() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/forex/candle")
                .query_param("symbol", "OANDA:XAU_USD")
                .query_param("resolution", "15")
                .query_param("token", "fh-key");
            then.status(200).json_body(json!({
                "s": "ok",
                "t": [1_700_000_000, 1_700_000_900],
                "o": [1980.0, 1981.0],
                "h": [1982.0, 1983.5],
                "l": [1979.0, 1980.5],
                "c": [1981.0, 1983.0],
                "v": [10, 12]
            }));
        })
        .await;

    let series = connector(&server)
        .fetch("XAU/USD", Interval::I15m, 100)
        .await
        .expect("series");
    mock.assert_async().await;
    assert_eq!(series.len(), 2);
    assert_eq!(series.as_slice()[1].volume, Some(12.0));
}

#[tokio::test]
async fn epoch_millis_are_converted_to_seconds() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/crypto/candle");
            then.status(200).json_body(json!({
                "s": "ok",
                "t": [1_700_000_000_000i64],
                "o": [35000.0], "h": [35100.0], "l": [34900.0], "c": [35050.0]
            }));
        })
        .await;

    let series = connector(&server)
        .fetch("BTC/USDT", Interval::I1m, 10)
        .await
        .expect("series");
    assert_eq!(series.as_slice()[0].ts, 1_700_000_000);
}

#[tokio::test]
async fn no_data_is_empty_series() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/stock/candle");
            then.status(200).json_body(json!({"s": "no_data"}));
        })
        .await;

    let err = connector(&server)
        .fetch("AAPL", Interval::D1, 10)
        .await
        .unwrap_err();
    assert_eq!(err.reason, FetchReason::EmptySeries);
}

#[tokio::test]
async fn forbidden_maps_to_upstream() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/forex/candle");
            then.status(403).json_body(json!({"error": "You don't have access to this resource."}));
        })
        .await;

    let err = connector(&server)
        .fetch("EURUSD", Interval::I1h, 10)
        .await
        .unwrap_err();
    assert_eq!(err.reason, FetchReason::Upstream { status: 403 });
    assert!(!err.reason.is_transient());
}

#[tokio::test]
async fn unsupported_interval_and_missing_key_skip_network() {
    let offline = FinnhubConnector::new(ApiKey::new("k")).with_base_url("http://127.0.0.1:9");
    let err = offline.fetch("EURUSD", Interval::I4h, 10).await.unwrap_err();
    assert_eq!(err.reason, FetchReason::Unsupported);

    let keyless = FinnhubConnector::new(None).with_base_url("http://127.0.0.1:9");
    let err = keyless.fetch("EURUSD", Interval::I1h, 10).await.unwrap_err();
    assert_eq!(err.reason, FetchReason::NoCredentials);
}
