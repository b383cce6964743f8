use serde::{Deserialize, Serialize};

use super::Direction;
use super::msb::StructureBreak;
use super::order_block::OrderBlock;
use crate::Candle;

/// Trade direction of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Buy at the zone, stop below it.
    Long,
    /// Sell at the zone, stop above it.
    Short,
}

/// A suggested trade derived from the latest order block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeCandidate {
    /// Caller symbol the candles were fetched for.
    pub symbol: String,
    /// Long for bullish blocks, short for bearish ones.
    pub side: Side,
    /// Zone midpoint.
    pub entry: f64,
    /// Half a zone height beyond the far edge.
    pub stop: f64,
    /// Latest structure-break price, else a 2:1 projection from the last close.
    pub target: f64,
    /// `|target - entry| / |entry - stop|`, zero when entry equals stop.
    pub risk_reward: f64,
    /// The order block the candidate was built from.
    pub order_block: OrderBlock,
}

/// Compose the most recent order block into a trade candidate.
///
/// Returns `None` when there is no order block or no candles to take a close from.
#[must_use]
pub fn build_candidate(
    symbol: &str,
    candles: &[Candle],
    order_blocks: &[OrderBlock],
    msb: Option<&StructureBreak>,
) -> Option<TradeCandidate> {
    let ob = *order_blocks.last()?;
    let close = candles.last()?.close;
    let entry = ob.midpoint();
    let half = 0.5 * ob.height();

    let (side, stop) = match ob.direction {
        Direction::Bullish => (Side::Long, ob.zone_low - half),
        Direction::Bearish => (Side::Short, ob.zone_high + half),
    };
    let target = msb.map_or_else(
        || match side {
            Side::Long => close + 2.0 * (close - stop),
            Side::Short => close - 2.0 * (stop - close),
        },
        |m| m.price,
    );
    let risk = (entry - stop).abs();
    let risk_reward = if risk == 0.0 {
        0.0
    } else {
        (target - entry).abs() / risk
    };

    Some(TradeCandidate {
        symbol: symbol.to_string(),
        side,
        entry,
        stop,
        target,
        risk_reward,
        order_block: ob,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(direction: Direction, low: f64, high: f64) -> OrderBlock {
        OrderBlock {
            index: 1,
            ts: 100,
            direction,
            zone_low: low,
            zone_high: high,
            body_low: low,
            body_high: high,
            wick_low: low,
            wick_high: high,
        }
    }

    #[test]
    fn long_projects_two_to_one_without_msb() {
        let candles = vec![Candle::new(200, 14.0, 14.5, 13.5, 14.2)];
        let c = build_candidate("XAUUSD", &candles, &[block(Direction::Bullish, 11.0, 12.0)], None)
            .unwrap();
        assert_eq!(c.side, Side::Long);
        assert!((c.entry - 11.5).abs() < 1e-9);
        assert!((c.stop - 10.5).abs() < 1e-9);
        assert!((c.target - 21.6).abs() < 1e-9);
        assert!((c.risk_reward - 10.1).abs() < 1e-9);
    }

    #[test]
    fn short_targets_latest_structure_break() {
        let candles = vec![Candle::new(200, 18.0, 18.5, 17.5, 18.0)];
        let msb = StructureBreak {
            index: 5,
            ts: 150,
            direction: Direction::Bearish,
            price: 16.0,
        };
        let c = build_candidate(
            "EURUSD",
            &candles,
            &[block(Direction::Bullish, 1.0, 2.0), block(Direction::Bearish, 20.0, 22.0)],
            Some(&msb),
        )
        .unwrap();
        assert_eq!(c.side, Side::Short);
        assert!((c.stop - 23.0).abs() < 1e-9);
        assert!((c.target - 16.0).abs() < 1e-9);
        assert!((c.risk_reward - 2.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_zone_has_zero_risk_reward() {
        let candles = vec![Candle::new(200, 5.0, 5.0, 5.0, 5.0)];
        let c = build_candidate("X", &candles, &[block(Direction::Bullish, 5.0, 5.0)], None).unwrap();
        assert!(c.risk_reward.abs() < f64::EPSILON);
        assert!(build_candidate("X", &candles, &[], None).is_none());
    }
}
