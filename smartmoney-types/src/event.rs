//! Persisted detection events and calibration outcomes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SmartMoneyError;

/// Row id of a stored event.
pub type EventId = i64;

/// Pattern family an event belongs to; confidence is calibrated per `(symbol, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OrderBlock,
    #[serde(rename = "fvg")]
    FairValueGap,
    #[serde(rename = "msb")]
    MarketStructureBreak,
    LiquiditySweep,
}

impl EventKind {
    /// Every kind, in a stable order.
    pub const ALL: [Self; 4] = [
        Self::OrderBlock,
        Self::FairValueGap,
        Self::MarketStructureBreak,
        Self::LiquiditySweep,
    ];

    /// Storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderBlock => "order_block",
            Self::FairValueGap => "fvg",
            Self::MarketStructureBreak => "msb",
            Self::LiquiditySweep => "liquidity_sweep",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = SmartMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SmartMoneyError::invalid_arg(format!("unknown event kind '{s}'")))
    }
}

/// Realized result of a resolved event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = SmartMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "loss" => Ok(Self::Loss),
            other => Err(SmartMoneyError::invalid_arg(format!(
                "unknown outcome '{other}'"
            ))),
        }
    }
}

/// An event about to be appended to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub symbol: String,
    pub kind: EventKind,
    /// Timestamp of the candle anchoring the event (unix seconds).
    pub ts: i64,
    /// Tells apart events of one kind anchored on the same candle, such as the
    /// two sides of a sweep. Part of the identity used by `append_if_absent`.
    #[serde(default)]
    pub variant: String,
    /// Detector-specific fields.
    pub payload: serde_json::Value,
    /// Prior confidence; clamped into the calibration bounds on insert.
    pub confidence: f64,
}

/// A stored detection event. Never deleted; mutated only by resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    pub id: EventId,
    pub symbol: String,
    pub kind: EventKind,
    pub ts: i64,
    #[serde(default)]
    pub variant: String,
    pub payload: serde_json::Value,
    pub confidence: f64,
    pub resolved: bool,
    pub outcome: Option<Outcome>,
}

/// Per-kind tallies for one symbol, for statistics and narrative collaborators.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KindStats {
    pub open: u64,
    pub wins: u64,
    pub losses: u64,
    /// Mean confidence of still-open events, `None` when there are none.
    pub mean_open_confidence: Option<f64>,
}

impl KindStats {
    /// Share of resolved events that were wins, `None` before any resolution.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> Option<f64> {
        let resolved = self.wins + self.losses;
        (resolved > 0).then(|| self.wins as f64 / resolved as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_round_trip() {
        for k in EventKind::ALL {
            assert_eq!(k.as_str().parse::<EventKind>().unwrap(), k);
            let json = serde_json::to_string(&k).unwrap();
            assert_eq!(json, format!("\"{}\"", k.as_str()));
        }
    }

    #[test]
    fn win_rate_needs_resolutions() {
        let mut s = KindStats::default();
        assert_eq!(s.win_rate(), None);
        s.wins = 3;
        s.losses = 1;
        assert_eq!(s.win_rate(), Some(0.75));
    }
}
