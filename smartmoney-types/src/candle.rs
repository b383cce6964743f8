//! Canonical OHLC(V) record and candle cadence.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SmartMoneyError;

/// One OHLC(V) observation for a fixed time bucket.
///
/// `ts` is the bucket's opening time in unix seconds (UTC). Candles produced by
/// normalization always satisfy `low <= min(open, close) <= max(open, close) <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds, UTC.
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Traded volume, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    /// Construct a candle without volume.
    #[must_use]
    pub const fn new(ts: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            ts,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Attach a volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Absolute body size `|close - open|`.
    #[must_use]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full range `high - low`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Lower edge of the body.
    #[must_use]
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Upper edge of the body.
    #[must_use]
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Check the record against the canonical invariants.
    ///
    /// # Errors
    /// Returns a short reason when a price is non-finite, the timestamp is not
    /// positive, the OHLC ordering is violated, or volume is negative.
    pub fn check(&self) -> Result<(), String> {
        if self.ts <= 0 {
            return Err(format!("non-positive timestamp {}", self.ts));
        }
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price".to_string());
        }
        if !(self.low <= self.body_low() && self.body_high() <= self.high) {
            return Err(format!(
                "ohlc out of order: o={} h={} l={} c={}",
                self.open, self.high, self.low, self.close
            ));
        }
        if let Some(v) = self.volume
            && !(v.is_finite() && v >= 0.0)
        {
            return Err(format!("invalid volume {v}"));
        }
        Ok(())
    }
}

/// Candle cadence understood by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Interval {
    #[serde(rename = "1min")]
    I1m,
    #[serde(rename = "5min")]
    I5m,
    #[serde(rename = "15min")]
    I15m,
    #[serde(rename = "30min")]
    I30m,
    #[serde(rename = "1h")]
    I1h,
    #[serde(rename = "4h")]
    I4h,
    #[serde(rename = "1day")]
    D1,
    #[serde(rename = "1week")]
    W1,
}

impl Interval {
    /// Bucket length in seconds.
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::I1m => 60,
            Self::I5m => 300,
            Self::I15m => 900,
            Self::I30m => 1_800,
            Self::I1h => 3_600,
            Self::I4h => 14_400,
            Self::D1 => 86_400,
            Self::W1 => 604_800,
        }
    }

    /// Minutes for intraday intervals, `None` for daily and coarser.
    #[must_use]
    pub const fn minutes(self) -> Option<i64> {
        match self {
            Self::D1 | Self::W1 => None,
            other => Some(other.seconds() / 60),
        }
    }

    /// Canonical string form (`1min`, `1h`, `1day`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I1m => "1min",
            Self::I5m => "5min",
            Self::I15m => "15min",
            Self::I30m => "30min",
            Self::I1h => "1h",
            Self::I4h => "4h",
            Self::D1 => "1day",
            Self::W1 => "1week",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = SmartMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        let iv = match norm.as_str() {
            "1min" | "1m" | "1" => Self::I1m,
            "5min" | "5m" | "5" => Self::I5m,
            "15min" | "15m" | "15" => Self::I15m,
            "30min" | "30m" | "30" => Self::I30m,
            "1h" | "60min" | "60m" | "60" | "1hour" => Self::I1h,
            "4h" | "240min" | "240" | "4hour" => Self::I4h,
            "1day" | "1d" | "d" | "daily" => Self::D1,
            "1week" | "1w" | "w" | "weekly" => Self::W1,
            _ => {
                return Err(SmartMoneyError::invalid_arg(format!(
                    "unknown interval '{s}'"
                )));
            }
        };
        Ok(iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_rejects_inverted_wicks() {
        let c = Candle::new(1_700_000_000, 10.0, 9.0, 8.0, 9.5);
        assert!(c.check().is_err());
        let ok = Candle::new(1_700_000_000, 10.0, 12.0, 9.0, 11.0);
        assert!(ok.check().is_ok());
    }

    #[test]
    fn check_rejects_nan_and_negative_volume() {
        assert!(Candle::new(1, f64::NAN, 1.0, 1.0, 1.0).check().is_err());
        assert!(Candle::new(1, 1.0, 1.0, 1.0, 1.0).with_volume(-5.0).check().is_err());
        assert!(Candle::new(0, 1.0, 1.0, 1.0, 1.0).check().is_err());
    }

    #[test]
    fn interval_aliases_parse_to_same_variant() {
        for s in ["1h", "60min", "1H", " 60 "] {
            assert_eq!(s.parse::<Interval>().unwrap(), Interval::I1h);
        }
        assert_eq!("D".parse::<Interval>().unwrap(), Interval::D1);
        assert!("7min".parse::<Interval>().is_err());
    }

    #[test]
    fn interval_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Interval::I15m).unwrap();
        assert_eq!(json, "\"15min\"");
        let back: Interval = serde_json::from_str("\"1day\"").unwrap();
        assert_eq!(back, Interval::D1);
    }
}
