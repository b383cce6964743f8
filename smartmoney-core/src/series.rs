use serde::Serialize;

use crate::Candle;

/// Ordered candle sequence, ascending and strictly increasing by timestamp.
///
/// A non-empty `Series` can only be produced by [`crate::normalize`], so every
/// candle it holds satisfies [`Candle::check`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    /// Wrap candles that are already validated, sorted and unique.
    pub(crate) const fn from_sorted(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    /// An empty series.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            candles: Vec::new(),
        }
    }

    /// Candles, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    /// Number of candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True when the series holds no candles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// Drop all but the `count` most recent candles.
    pub fn keep_last(&mut self, count: usize) {
        let excess = self.candles.len().saturating_sub(count);
        if excess > 0 {
            self.candles.drain(..excess);
        }
    }

    /// Re-check ordering and candle invariants.
    ///
    /// Useful at trust boundaries where a series crossed a trait object.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.candles.iter().all(|c| c.check().is_ok())
            && self.candles.windows(2).all(|w| w[0].ts < w[1].ts)
    }

    /// Consume the series, returning the candles.
    #[must_use]
    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

impl AsRef<[Candle]> for Series {
    fn as_ref(&self) -> &[Candle] {
        &self.candles
    }
}
