//! smartmoney fetches candles from several unreliable providers, runs the ICT
//! pattern detectors over them and keeps a calibrated record of what it found.
//!
//! Overview
//! - [`Orchestrator`] routes a candle request across providers implementing
//!   [`CandleProvider`], in priority order, and returns the first usable series
//!   tagged with the provider that produced it.
//! - [`Scanner`] couples an orchestrator with an [`EventStore`]: fetch, detect,
//!   record, then feed realized outcomes back to recalibrate open events.
//!
//! Key behaviors and trade-offs
//! - Fetch strategy:
//!   - `Sequential`: deterministic order, per-provider timeout, aggregates
//!     errors; fewer requests but pays for each failing provider in turn.
//!   - `Race`: asks every provider at once but still prefers the
//!     highest-priority success; lower latency, more upstream load.
//! - Failures are data: when every provider fails the caller gets
//!   `AllProvidersFailed` with one diagnostic per provider, never a partial series.
//! - Nothing is cached between calls and no provider health is remembered.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use smartmoney::{Orchestrator, Scanner, SqliteEventStore, CalibrationConfig};
//! use smartmoney_providers::{ApiKey, TwelveDataConnector, FinnhubConnector};
//!
//! let orchestrator = Orchestrator::builder()
//!     .with_provider(Arc::new(TwelveDataConnector::new(ApiKey::new(td_key))))
//!     .with_provider(Arc::new(FinnhubConnector::new(ApiKey::new(fh_key))))
//!     .build()?;
//! let store = Arc::new(SqliteEventStore::open("events.db", CalibrationConfig::default())?);
//! let scanner = Scanner::new(orchestrator, store);
//!
//! let scan = scanner.scan("XAUUSD", "1h", 200).await?;
//! if let Some(c) = &scan.report.candidate {
//!     println!("{:?} entry {} stop {} target {}", c.side, c.entry, c.stop, c.target);
//! }
//! ```
//!
//! See `smartmoney/demos/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;
pub mod scanner;

pub use crate::core::{Orchestrator, OrchestratorBuilder};
pub use router::candles::CandlesResponse;
pub use scanner::{ScanReport, Scanner};

pub use smartmoney_store::{EventStore, MemoryEventStore, Resolution, SqliteEventStore};

// Re-export core types for convenience
pub use smartmoney_core::{
    CalibrationConfig, Candle, CandleProvider, DetectedEvent, DetectionReport, DetectorConfig,
    EventId, EventKind, FetchError, FetchReason, FetchStrategy, Interval, KindStats,
    MalformedCandle, MomentumConfig, NewEvent, OrchestratorConfig, OrderBlockConfig, Outcome,
    ProviderKey, Series, SmartMoneyError, StoreError, SweepConfig, ZoneExtent, detect_all,
    normalize, patterns,
};
