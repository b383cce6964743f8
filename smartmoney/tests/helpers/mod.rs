#![allow(dead_code)]

// Re-export helpers so tests can `use helpers::*;`
pub mod mock_provider;

pub use mock_provider::MockProvider;

use smartmoney::Candle;

/// First bucket of every helper series.
pub const T0: i64 = 1_700_000_000;

/// Hourly candles closing at each value in `closes`, each opening at the previous close.
pub fn ramp(closes: &[f64]) -> Vec<Candle> {
    let mut prev = closes.first().copied().unwrap_or(1.0);
    (0_i64..)
        .zip(closes)
        .map(|(i, &c)| {
            let o = prev;
            prev = c;
            Candle::new(T0 + i * 3_600, o, o.max(c) + 0.1, o.min(c) - 0.1, c)
        })
        .collect()
}

/// `n` gently rising hourly candles.
#[allow(clippy::cast_precision_loss)]
pub fn rising(n: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..n).map(|i| 10.0 + i as f64 * 0.1).collect();
    ramp(&closes)
}
