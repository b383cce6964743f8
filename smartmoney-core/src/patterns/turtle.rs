use serde::{Deserialize, Serialize};

use super::Direction;
use crate::Candle;

/// Shortest slice that can contain a reversal.
pub const MIN_LEN: usize = 3;

/// A false break of the prior candle's extreme that closes back through it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurtleSoup {
    /// Position of the confirming candle.
    pub index: usize,
    /// Timestamp of the confirming candle.
    pub ts: i64,
    /// Bullish after a failed break lower, bearish after a failed break higher.
    pub direction: Direction,
    /// The extreme of the first candle that was taken out.
    pub swept_level: f64,
    /// Close of the confirming candle.
    pub price: f64,
}

/// Find turtle-soup reversals among the trailing `lookback` candles, oldest first.
///
/// For each window `(A, B, C)` ending at `i`: bullish when `B.low < A.low` and
/// `C.close > B.open`; bearish when `B.high > A.high` and `C.close < B.open`.
#[must_use]
pub fn detect_turtle_soup(candles: &[Candle], lookback: usize) -> Vec<TurtleSoup> {
    let n = candles.len();
    if n < MIN_LEN {
        return Vec::new();
    }
    let start = n.saturating_sub(lookback).max(2);
    let mut out = Vec::new();
    for i in start..n {
        let (a, b, c) = (&candles[i - 2], &candles[i - 1], &candles[i]);
        if b.low < a.low && c.close > b.open {
            out.push(TurtleSoup {
                index: i,
                ts: c.ts,
                direction: Direction::Bullish,
                swept_level: a.low,
                price: c.close,
            });
        }
        if b.high > a.high && c.close < b.open {
            out.push(TurtleSoup {
                index: i,
                ts: c.ts,
                direction: Direction::Bearish,
                swept_level: a.high,
                price: c.close,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_break_lower_is_bullish() {
        let candles = vec![
            Candle::new(1, 10.0, 10.5, 9.5, 10.0),
            Candle::new(2, 10.0, 10.2, 9.0, 9.4),
            Candle::new(3, 9.4, 10.6, 9.3, 10.4),
        ];
        let soups = detect_turtle_soup(&candles, 120);
        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0].direction, Direction::Bullish);
        assert_eq!(soups[0].index, 2);
        assert!((soups[0].swept_level - 9.5).abs() < 1e-9);
        assert!((soups[0].price - 10.4).abs() < 1e-9);
    }

    #[test]
    fn failed_break_higher_is_bearish() {
        let candles = vec![
            Candle::new(1, 10.0, 10.5, 9.5, 10.0),
            Candle::new(2, 10.0, 11.0, 9.8, 10.8),
            Candle::new(3, 10.8, 10.9, 9.6, 9.7),
        ];
        let soups = detect_turtle_soup(&candles, 120);
        assert_eq!(soups.len(), 1);
        assert_eq!(soups[0].direction, Direction::Bearish);
        assert!((soups[0].swept_level - 10.5).abs() < 1e-9);
    }

    #[test]
    fn continuation_and_short_input_yield_nothing() {
        // Break lower that keeps falling.
        let candles = vec![
            Candle::new(1, 10.0, 10.5, 9.5, 10.0),
            Candle::new(2, 10.0, 10.2, 9.0, 9.4),
            Candle::new(3, 9.4, 9.5, 8.5, 8.6),
        ];
        assert!(detect_turtle_soup(&candles, 120).is_empty());
        assert!(detect_turtle_soup(&candles[..2], 120).is_empty());
        assert!(detect_turtle_soup(&[], 120).is_empty());
    }
}
