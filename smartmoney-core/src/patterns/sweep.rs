use serde::{Deserialize, Serialize};

use super::swing::{SwingKind, SwingPoint, swing_points};
use crate::{Candle, SweepConfig};

/// Shortest slice that can contain a sweep with half-window `window`.
#[must_use]
pub const fn min_len(window: usize) -> usize {
    window.saturating_mul(2).saturating_add(2)
}

/// Which pool of resting liquidity a sweep ran through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepSide {
    /// Wick above a prior swing high.
    SellSide,
    /// Wick below a prior swing low.
    BuySide,
}

impl SweepSide {
    /// Serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SellSide => "sell_side",
            Self::BuySide => "buy_side",
        }
    }
}

/// A candle that briefly traded beyond a recent swing extreme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquiditySweep {
    /// Position of the sweeping candle.
    pub index: usize,
    /// Timestamp of the sweeping candle.
    pub ts: i64,
    /// Side of the swept pool.
    pub side: SweepSide,
    /// Position of the swing point that was swept.
    pub swing_index: usize,
    /// Price of the swept swing point.
    pub level: f64,
    /// The sweeping candle's high (sell-side) or low (buy-side).
    pub extreme: f64,
}

/// Find liquidity sweeps among the trailing `cfg.lookback` candles, oldest first.
///
/// Each candle is compared with the most recent swing high and swing low whose
/// index is strictly lower. A candle may sweep both sides at once.
#[must_use]
pub fn detect_sweeps(candles: &[Candle], window: usize, cfg: &SweepConfig) -> Vec<LiquiditySweep> {
    let n = candles.len();
    if window == 0 || n < min_len(window) {
        return Vec::new();
    }
    let swings: Vec<SwingPoint> = swing_points(candles, window).collect();
    let start = n.saturating_sub(cfg.lookback);

    let mut out = Vec::new();
    let mut cursor = 0;
    let mut last_high: Option<SwingPoint> = None;
    let mut last_low: Option<SwingPoint> = None;

    for (i, c) in candles.iter().enumerate().skip(start) {
        while let Some(p) = swings.get(cursor).filter(|p| p.index < i) {
            match p.kind {
                SwingKind::High => last_high = Some(*p),
                SwingKind::Low => last_low = Some(*p),
            }
            cursor += 1;
        }
        if let Some(h) = last_high
            && c.high > h.price * (1.0 + cfg.tolerance)
        {
            out.push(LiquiditySweep {
                index: i,
                ts: c.ts,
                side: SweepSide::SellSide,
                swing_index: h.index,
                level: h.price,
                extreme: c.high,
            });
        }
        if let Some(l) = last_low
            && c.low < l.price * (1.0 - cfg.tolerance)
        {
            out.push(LiquiditySweep {
                index: i,
                ts: c.ts,
                side: SweepSide::BuySide,
                swing_index: l.index,
                level: l.price,
                extreme: c.low,
            });
        }
    }
    out
}
