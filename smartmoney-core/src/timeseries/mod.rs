//! Time-series utilities shared by adapters and the orchestrator.
//!
//! - `normalize`: turn raw provider records into a validated [`crate::Series`]
//! - `epoch`: convert provider timestamps to unix seconds
/// Timestamp parsing for string, second and millisecond encodings.
pub mod epoch;
/// Validation, dedup and ordering of raw candles.
pub mod normalize;
