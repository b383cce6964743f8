//! smartmoney-providers
//!
//! HTTP candle providers implementing [`CandleProvider`] on top of `reqwest`:
//! Twelve Data, Finnhub and Alpha Vantage.
//!
//! Each connector:
//! - takes its credential as an [`ApiKey`] from the caller and never reads the
//!   environment; a missing key fails fast with `NoCredentials`,
//! - rewrites symbols into the provider's notation (see [`symbol`]),
//! - maps transport, status and payload problems to a tagged `FetchError`,
//! - normalizes rows into a `Series` and keeps the `count` most recent candles.
#![warn(missing_docs)]

mod alphavantage;
mod credentials;
mod finnhub;
mod http;
/// Symbol rewriting helpers used by the connectors.
pub mod symbol;
mod twelvedata;

pub use alphavantage::AlphaVantageConnector;
pub use credentials::ApiKey;
pub use finnhub::FinnhubConnector;
pub use http::DEFAULT_TIMEOUT;
pub use smartmoney_core::CandleProvider;
pub use twelvedata::TwelveDataConnector;
