//! smartmoney-core
//!
//! Core types, traits, and detectors shared across the smartmoney workspace.
//!
//! - `series`: the validated, ascending [`Series`] container.
//! - `timeseries`: normalization of raw provider records and timestamp conversion.
//! - `connector`: the [`CandleProvider`] trait implemented by every adapter.
//! - `patterns`: swing points, order blocks, fair-value gaps, structure breaks,
//!   liquidity sweeps, turtle soup, momentum readings and trade-candidate
//!   generation.
//!
//! Detectors are pure functions over candle slices. They never panic on short
//! input and return empty results below their minimum window.
#![warn(missing_docs)]

/// Adapter trait implemented by candle providers.
pub mod connector;
/// Deterministic pattern detectors.
pub mod patterns;
/// Validated candle series.
pub mod series;
/// Normalization and timestamp helpers.
pub mod timeseries;

pub use connector::CandleProvider;
pub use patterns::{DetectionReport, detect_all};
pub use series::Series;
pub use smartmoney_types::*;
pub use timeseries::epoch::{epoch_from_number, epoch_from_str};
pub use timeseries::normalize::{Normalized, normalize};
