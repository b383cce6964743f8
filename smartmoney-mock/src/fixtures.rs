use smartmoney_core::{Candle, Interval};

/// 2024-01-01T00:00:00Z; first bucket of every fixture.
pub const EPOCH: i64 = 1_704_067_200;

type Row = (f64, f64, f64, f64);

/// Swing high at 3, bullish order block at 6 and a sell-side sweep at 7.
const XAUUSD: &[Row] = &[
    (10.0, 10.5, 9.5, 10.2),
    (10.2, 10.8, 9.8, 10.4),
    (10.4, 11.0, 10.0, 10.6),
    (10.6, 12.0, 10.3, 11.0),
    (11.0, 11.5, 10.4, 10.8),
    (10.8, 11.2, 10.1, 10.5),
    (10.5, 11.0, 10.2, 10.7),
    (10.7, 12.6, 10.6, 11.9),
    (11.9, 12.0, 11.5, 11.6),
    (11.6, 11.8, 11.4, 11.7),
];

/// Five-candle impulse: bullish order block at 1.
const EURUSD: &[Row] = &[
    (1.0, 1.2, 0.9, 1.1),
    (1.1, 1.3, 1.0, 1.2),
    (1.2, 1.6, 1.1, 1.5),
    (1.5, 1.52, 1.3, 1.4),
    (1.4, 1.45, 1.35, 1.42),
];

/// Single bullish fair-value gap between 100 and 105.
const NAS100: &[Row] = &[
    (98.0, 100.0, 97.0, 99.5),
    (99.5, 106.0, 99.0, 105.5),
    (105.5, 108.0, 105.0, 107.0),
];

/// Raw fixture candles for `symbol`, spaced by `interval`.
pub fn by_symbol(symbol: &str, interval: Interval) -> Option<Vec<Candle>> {
    let rows = match symbol {
        "XAUUSD" | "XAU/USD" => XAUUSD,
        "EURUSD" | "EUR/USD" => EURUSD,
        "NAS100" => NAS100,
        _ => return None,
    };
    Some(build(rows, interval))
}

fn build(rows: &[Row], interval: Interval) -> Vec<Candle> {
    (0_i64..)
        .zip(rows)
        .map(|(i, &(o, h, l, c))| Candle::new(EPOCH + i * interval.seconds(), o, h, l, c))
        .collect()
}
