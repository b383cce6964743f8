//! ICT pattern detectors over a candle slice.
//!
//! Every detector is a pure function of its input and parameters. Short or
//! empty input yields an empty result, never an error.
use serde::{Deserialize, Serialize};

use crate::{DetectorConfig, Series};

/// Trade-candidate generation from detected order blocks.
pub mod candidate;
/// Fair-value-gap detection.
pub mod fvg;
/// Moving-average crossover and RSI readings.
pub mod momentum;
/// Market-structure-break detection.
pub mod msb;
/// Order-block detection.
pub mod order_block;
/// Liquidity-sweep detection.
pub mod sweep;
/// Swing-point enumeration.
pub mod swing;
/// Turtle-soup reversal detection.
pub mod turtle;

pub use candidate::{Side, TradeCandidate, build_candidate};
pub use fvg::{FairValueGap, detect_fvg};
pub use momentum::{Momentum, MomentumSignal, momentum, rsi, sma};
pub use msb::{StructureBreak, detect_msb};
pub use order_block::{OrderBlock, detect_order_blocks};
pub use sweep::{LiquiditySweep, SweepSide, detect_sweeps};
pub use swing::{SwingKind, SwingPoint, SwingPoints, swing_points};
pub use turtle::{TurtleSoup, detect_turtle_soup};

/// Directional bias of a detected pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Upward bias.
    Bullish,
    /// Downward bias.
    Bearish,
}

impl Direction {
    /// Serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }
}

/// Result of one [`detect_all`] pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Symbol the series belongs to.
    pub symbol: String,
    /// Order blocks, oldest first.
    pub order_blocks: Vec<OrderBlock>,
    /// Fair-value gaps, oldest first.
    pub fvg: Vec<FairValueGap>,
    /// At most one structure break from the latest swing point.
    pub msb: Option<StructureBreak>,
    /// Liquidity sweeps, oldest first.
    pub sweeps: Vec<LiquiditySweep>,
    /// Turtle-soup reversals, oldest first.
    pub turtle_soup: Vec<TurtleSoup>,
    /// Crossover and RSI readings on the last candle.
    pub momentum: Momentum,
    /// Candidate built from the most recent order block, if any.
    pub candidate: Option<TradeCandidate>,
}

impl DetectionReport {
    /// True when no detector produced anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order_blocks.is_empty()
            && self.fvg.is_empty()
            && self.msb.is_none()
            && self.sweeps.is_empty()
            && self.turtle_soup.is_empty()
            && self.momentum.signals.is_empty()
    }
}

/// Run every detector over `series` and compose a trade candidate.
#[must_use]
pub fn detect_all(series: &Series, symbol: &str, cfg: &DetectorConfig) -> DetectionReport {
    let candles = series.as_slice();
    let order_blocks = detect_order_blocks(candles, &cfg.order_block);
    let fvg = detect_fvg(candles, cfg.fvg_lookback);
    let msb = detect_msb(candles, cfg.swing_window);
    let sweeps = detect_sweeps(candles, cfg.swing_window, &cfg.sweep);
    let turtle_soup = detect_turtle_soup(candles, cfg.turtle_lookback);
    let momentum = momentum(candles, &cfg.momentum);
    let candidate = build_candidate(symbol, candles, &order_blocks, msb.as_ref());

    DetectionReport {
        symbol: symbol.to_string(),
        order_blocks,
        fvg,
        msb,
        sweeps,
        turtle_soup,
        momentum,
        candidate,
    }
}
