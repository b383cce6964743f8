//! Configuration types shared across the orchestrator, detectors and event store.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EventKind;

/// Strategy for walking the provider priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[non_exhaustive]
pub enum FetchStrategy {
    /// Call providers one at a time in priority order and stop at the first success.
    #[default]
    Sequential,
    /// Call every provider concurrently; the earliest-priority success still wins.
    Race,
}

/// Global configuration for the failover orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Strategy for fetching from multiple providers.
    pub fetch_strategy: FetchStrategy,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional deadline for the whole failover walk.
    pub request_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            fetch_strategy: FetchStrategy::default(),
            provider_timeout: Duration::from_secs(15),
            request_timeout: None,
        }
    }
}

/// Which part of the flagged candle delimits an order-block zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneExtent {
    /// `[min(open, close), max(open, close)]`.
    #[default]
    Body,
    /// `[min(open, close, low), max(open, close, high)]`.
    Wick,
}

/// Order-block detector thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBlockConfig {
    /// Number of trailing candles scanned.
    pub lookback: usize,
    /// Minimum body/range ratio of the impulse candle (exclusive).
    pub min_body_ratio: f64,
    /// Minimum close-to-close move of the impulse candle, as a fraction.
    pub min_move: f64,
    /// Zone reported as `zone_low`/`zone_high`. Defaults to the body, which is
    /// narrower than the wick-inclusive zone `[min(open, close, low),
    /// max(open, close, high)]`; select [`ZoneExtent::Wick`] for that one.
    /// Both extremes are carried on every block regardless.
    pub zone: ZoneExtent,
}

impl Default for OrderBlockConfig {
    fn default() -> Self {
        Self {
            lookback: 120,
            min_body_ratio: 0.4,
            min_move: 0.005,
            zone: ZoneExtent::Body,
        }
    }
}

/// Liquidity-sweep detector parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub lookback: usize,
    /// Fractional excursion beyond the swing level required to count as a sweep.
    pub tolerance: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            lookback: 120,
            tolerance: 0.0015,
        }
    }
}

/// Moving-average crossover and RSI thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Fast simple-moving-average period.
    pub fast: usize,
    /// Slow simple-moving-average period.
    pub slow: usize,
    pub rsi_period: usize,
    /// RSI strictly below this reads as oversold.
    pub oversold: f64,
    /// RSI strictly above this reads as overbought.
    pub overbought: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            fast: 9,
            slow: 21,
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

/// Parameters for a full detector pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Half-width of the swing-point window.
    pub swing_window: usize,
    pub order_block: OrderBlockConfig,
    /// Trailing candles scanned for fair-value gaps.
    pub fvg_lookback: usize,
    pub sweep: SweepConfig,
    /// Trailing candles scanned for turtle-soup reversals.
    pub turtle_lookback: usize,
    pub momentum: MomentumConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            swing_window: 3,
            order_block: OrderBlockConfig::default(),
            fvg_lookback: 120,
            sweep: SweepConfig::default(),
            turtle_lookback: 120,
            momentum: MomentumConfig::default(),
        }
    }
}

/// Online confidence calibration constants.
///
/// The deltas are heuristics, not estimates. Tune them here rather than in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Added to sibling confidences after a win.
    pub win_delta: f64,
    /// Subtracted from sibling confidences after a loss.
    pub loss_delta: f64,
    pub floor: f64,
    pub ceiling: f64,
    /// Initial confidence per event kind. Kinds without a prior are not persisted.
    pub priors: BTreeMap<EventKind, f64>,
}

impl CalibrationConfig {
    /// Prior for `kind`, if that kind is persisted.
    #[must_use]
    pub fn prior(&self, kind: EventKind) -> Option<f64> {
        self.priors.get(&kind).copied()
    }

    /// Clamp a confidence into `[floor, ceiling]`.
    #[must_use]
    pub fn clamp(&self, confidence: f64) -> f64 {
        confidence.clamp(self.floor, self.ceiling)
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            win_delta: 0.05,
            loss_delta: 0.07,
            floor: 0.01,
            ceiling: 1.0,
            priors: BTreeMap::from([
                (EventKind::OrderBlock, 0.6),
                (EventKind::LiquiditySweep, 0.45),
            ]),
        }
    }
}
