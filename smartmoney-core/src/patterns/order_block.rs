use serde::{Deserialize, Serialize};

use super::Direction;
use crate::{Candle, OrderBlockConfig, ZoneExtent};

/// Shortest slice that can contain an order block.
pub const MIN_LEN: usize = 4;

/// The last opposing candle before a strong directional move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBlock {
    /// Position of the flagged candle (the one before the impulse).
    pub index: usize,
    /// Timestamp of the flagged candle.
    pub ts: i64,
    /// Bullish blocks precede an up-move, bearish blocks a down-move.
    pub direction: Direction,
    /// Lower zone bound per the configured [`ZoneExtent`].
    pub zone_low: f64,
    /// Upper zone bound per the configured [`ZoneExtent`].
    pub zone_high: f64,
    /// `min(open, close)` of the flagged candle.
    pub body_low: f64,
    /// `max(open, close)` of the flagged candle.
    pub body_high: f64,
    /// `min(open, close, low)` of the flagged candle.
    pub wick_low: f64,
    /// `max(open, close, high)` of the flagged candle.
    pub wick_high: f64,
}

impl OrderBlock {
    /// `zone_high - zone_low`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.zone_high - self.zone_low
    }

    /// Midpoint of the zone.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        f64::midpoint(self.zone_low, self.zone_high)
    }
}

/// Scan the trailing `cfg.lookback` candles for order blocks, oldest first.
///
/// For each impulse candle `i` in `[max(1, n - lookback), n - 2)` whose body
/// exceeds `min_body_ratio` of its range and whose close moves at least
/// `min_move` beyond the previous close, candle `i - 1` is flagged.
#[must_use]
pub fn detect_order_blocks(candles: &[Candle], cfg: &OrderBlockConfig) -> Vec<OrderBlock> {
    let n = candles.len();
    if n < MIN_LEN {
        return Vec::new();
    }
    let start = n.saturating_sub(cfg.lookback).max(1);
    let mut out = Vec::new();

    for i in start..n - 2 {
        let impulse = &candles[i];
        let prev = &candles[i - 1];
        let range = impulse.range();
        if range <= 0.0 || impulse.body() <= cfg.min_body_ratio * range {
            continue;
        }
        let direction = if impulse.is_bullish() && impulse.close > prev.close * (1.0 + cfg.min_move)
        {
            Direction::Bullish
        } else if impulse.is_bearish() && impulse.close < prev.close * (1.0 - cfg.min_move) {
            Direction::Bearish
        } else {
            continue;
        };
        out.push(flag(i - 1, prev, direction, cfg.zone));
    }
    out
}

fn flag(index: usize, c: &Candle, direction: Direction, extent: ZoneExtent) -> OrderBlock {
    let (body_low, body_high) = (c.body_low(), c.body_high());
    let (wick_low, wick_high) = (body_low.min(c.low), body_high.max(c.high));
    let (zone_low, zone_high) = match extent {
        ZoneExtent::Body => (body_low, body_high),
        ZoneExtent::Wick => (wick_low, wick_high),
    };
    OrderBlock {
        index,
        ts: c.ts,
        direction,
        zone_low,
        zone_high,
        body_low,
        body_high,
        wick_low,
        wick_high,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ohlc(rows: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
        rows.iter()
            .enumerate()
            .map(|(i, &(o, h, l, c))| Candle::new(1_700_000_000 + i as i64 * 3_600, o, h, l, c))
            .collect()
    }

    #[test]
    fn bearish_impulse_flags_prior_candle() {
        let candles = ohlc(&[
            (20.0, 21.0, 19.0, 20.0),
            (20.0, 20.5, 19.5, 20.2),
            (20.0, 20.2, 17.0, 17.2),
            (17.2, 17.5, 16.8, 17.0),
            (17.0, 17.3, 16.9, 17.1),
        ]);
        let obs = detect_order_blocks(&candles, &OrderBlockConfig::default());
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].index, 1);
        assert_eq!(obs[0].direction, Direction::Bearish);
        assert!((obs[0].zone_low - 20.0).abs() < 1e-9);
        assert!((obs[0].zone_high - 20.2).abs() < 1e-9);
    }

    #[test]
    fn wick_extent_widens_zone() {
        let candles = ohlc(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 13.0, 10.0, 12.0),
            (12.0, 16.0, 11.0, 15.0),
            (15.0, 15.2, 13.0, 14.0),
            (14.0, 14.5, 13.5, 14.2),
        ]);
        let cfg = OrderBlockConfig {
            zone: ZoneExtent::Wick,
            ..OrderBlockConfig::default()
        };
        let obs = detect_order_blocks(&candles, &cfg);
        assert_eq!(obs.len(), 1);
        assert!((obs[0].zone_low - 10.0).abs() < 1e-9);
        assert!((obs[0].zone_high - 13.0).abs() < 1e-9);
        assert!((obs[0].body_low - 11.0).abs() < 1e-9);
    }

    #[test]
    fn weak_or_short_input_yields_nothing() {
        let candles = ohlc(&[
            (10.0, 12.0, 9.0, 11.0),
            (11.0, 13.0, 10.0, 12.0),
            (12.0, 16.0, 11.0, 15.0),
        ]);
        assert!(detect_order_blocks(&candles, &OrderBlockConfig::default()).is_empty());
        let flat = ohlc(&[(1.0, 1.0, 1.0, 1.0); 6]);
        assert!(detect_order_blocks(&flat, &OrderBlockConfig::default()).is_empty());
    }
}
