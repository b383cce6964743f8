use serde::{Deserialize, Serialize};

use super::Direction;
use crate::Candle;

/// Shortest slice that can contain a gap.
pub const MIN_LEN: usize = 3;

/// Price interval skipped by a three-candle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    /// Position of the middle candle.
    pub index: usize,
    /// Timestamp of the middle candle.
    pub ts: i64,
    /// Bullish gaps sit below price, bearish gaps above.
    pub direction: Direction,
    /// Lower edge of the unfilled interval.
    pub gap_low: f64,
    /// Upper edge of the unfilled interval.
    pub gap_high: f64,
}

/// Find fair-value gaps among the trailing `lookback` candles, oldest first.
///
/// For each window `(A, _, C)` centred on `i`: bullish when `C.low > A.high`
/// with gap `[A.high, C.low]`, bearish when `C.high < A.low` with gap
/// `[C.high, A.low]`.
#[must_use]
pub fn detect_fvg(candles: &[Candle], lookback: usize) -> Vec<FairValueGap> {
    let n = candles.len();
    if n < MIN_LEN {
        return Vec::new();
    }
    let start = n.saturating_sub(lookback).max(1);
    (start..n - 1)
        .filter_map(|i| {
            let (a, c) = (&candles[i - 1], &candles[i + 1]);
            let ts = candles[i].ts;
            if c.low > a.high {
                Some(FairValueGap {
                    index: i,
                    ts,
                    direction: Direction::Bullish,
                    gap_low: a.high,
                    gap_high: c.low,
                })
            } else if c.high < a.low {
                Some(FairValueGap {
                    index: i,
                    ts,
                    direction: Direction::Bearish,
                    gap_low: c.high,
                    gap_high: a.low,
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearish_gap_uses_c_high_and_a_low() {
        let candles = vec![
            Candle::new(1, 50.0, 52.0, 48.0, 49.0),
            Candle::new(2, 49.0, 49.5, 44.0, 44.5),
            Candle::new(3, 44.5, 45.0, 42.0, 43.0),
        ];
        let gaps = detect_fvg(&candles, 120);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].direction, Direction::Bearish);
        assert!((gaps[0].gap_low - 45.0).abs() < 1e-9);
        assert!((gaps[0].gap_high - 48.0).abs() < 1e-9);
    }

    #[test]
    fn lookback_limits_scanned_windows() {
        let mut candles = vec![
            Candle::new(1, 10.0, 10.0, 9.0, 10.0),
            Candle::new(2, 12.0, 13.0, 11.0, 12.0),
            Candle::new(3, 14.0, 15.0, 13.5, 14.0),
        ];
        candles.extend((4..10).map(|t| Candle::new(t, 14.0, 14.5, 12.9, 14.0)));
        assert_eq!(detect_fvg(&candles, 120).len(), 1);
        assert!(detect_fvg(&candles, 4).is_empty());
    }
}
