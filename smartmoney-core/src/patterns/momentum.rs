use serde::{Deserialize, Serialize};

use super::Side;
use crate::{Candle, MomentumConfig};

/// One momentum reading that suggests a side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MomentumSignal {
    /// The fast average crossed the slow one on the last candle.
    SmaCross {
        /// Long when the fast average crossed above.
        side: Side,
    },
    /// RSI beyond the oversold or overbought threshold.
    Rsi {
        /// Long when oversold, short when overbought.
        side: Side,
        /// RSI of the last candle.
        value: f64,
    },
}

/// Moving averages, RSI and the signals they produce for the last candle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Momentum {
    /// Last close.
    pub latest_price: Option<f64>,
    /// Fast simple moving average of closes.
    pub sma_fast: Option<f64>,
    /// Slow simple moving average of closes.
    pub sma_slow: Option<f64>,
    /// Simple-average RSI of closes.
    pub rsi: Option<f64>,
    /// Crossover first, then RSI.
    pub signals: Vec<MomentumSignal>,
}

/// Mean of the last `period` values; `None` when there are fewer.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let tail = &values[values.len() - period..];
    Some(tail.iter().sum::<f64>() / period as f64)
}

/// RSI over the last `period` close-to-close changes, using plain averages.
///
/// Needs `period + 1` closes. A window with no losses reads 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let window = &closes[closes.len() - period - 1..];
    let (gain, loss) = window
        .windows(2)
        .map(|w| w[1] - w[0])
        .fold((0.0, 0.0), |(g, l), d| if d > 0.0 { (g + d, l) } else { (g, l - d) });
    let (avg_gain, avg_loss) = (gain / period as f64, loss / period as f64);
    if avg_loss == 0.0 {
        return Some(100.0);
    }
    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
}

/// Evaluate the crossover and RSI thresholds on the last candle.
#[must_use]
pub fn momentum(candles: &[Candle], cfg: &MomentumConfig) -> Momentum {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let sma_fast = sma(&closes, cfg.fast);
    let sma_slow = sma(&closes, cfg.slow);
    let rsi = rsi(&closes, cfg.rsi_period);

    let mut signals = Vec::new();
    if let (Some(fast), Some(slow)) = (sma_fast, sma_slow)
        && let Some((_, prev)) = closes.split_last()
        && let (Some(prev_fast), Some(prev_slow)) = (sma(prev, cfg.fast), sma(prev, cfg.slow))
    {
        if prev_fast < prev_slow && fast > slow {
            signals.push(MomentumSignal::SmaCross { side: Side::Long });
        } else if prev_fast > prev_slow && fast < slow {
            signals.push(MomentumSignal::SmaCross { side: Side::Short });
        }
    }
    if let Some(value) = rsi {
        if value < cfg.oversold {
            signals.push(MomentumSignal::Rsi { side: Side::Long, value });
        } else if value > cfg.overbought {
            signals.push(MomentumSignal::Rsi { side: Side::Short, value });
        }
    }

    Momentum {
        latest_price: closes.last().copied(),
        sma_fast,
        sma_slow,
        rsi,
        signals,
    }
}
