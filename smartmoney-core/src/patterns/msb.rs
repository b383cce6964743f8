use serde::{Deserialize, Serialize};

use super::Direction;
use super::swing::{SwingKind, SwingPoint, min_len, swing_points};
use crate::Candle;

/// A new swing extreme beyond the previous one of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureBreak {
    /// Position of the breaking swing point.
    pub index: usize,
    /// Timestamp of the breaking swing point.
    pub ts: i64,
    /// Bullish for a higher high, bearish for a lower low.
    pub direction: Direction,
    /// Price of the breaking swing point.
    pub price: f64,
}

/// Detect at most one market-structure break from the most recent swing point.
///
/// If the latest swing is a high strictly above the previous swing high, the
/// break is bullish; if it is a low strictly below the previous swing low, it
/// is bearish. Anything else yields `None`.
#[must_use]
pub fn detect_msb(candles: &[Candle], window: usize) -> Option<StructureBreak> {
    if window == 0 || candles.len() < min_len(window) {
        return None;
    }
    let swings: Vec<SwingPoint> = swing_points(candles, window).collect();
    let (last, earlier) = swings.split_last()?;
    let prior = earlier.iter().rev().find(|p| p.kind == last.kind)?;
    let direction = match last.kind {
        SwingKind::High if last.price > prior.price => Direction::Bullish,
        SwingKind::Low if last.price < prior.price => Direction::Bearish,
        _ => return None,
    };
    Some(StructureBreak {
        index: last.index,
        ts: candles[last.index].ts,
        direction,
        price: last.price,
    })
}
