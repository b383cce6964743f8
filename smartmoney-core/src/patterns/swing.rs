use serde::{Deserialize, Serialize};

use crate::Candle;

/// Whether a swing point is a local high or low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    /// Strict local maximum of `high`.
    High,
    /// Strict local minimum of `low`.
    Low,
}

/// A local extremum within a symmetric window. Derived per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// Position in the candle slice.
    pub index: usize,
    /// High or low.
    pub kind: SwingKind,
    /// `high` for swing highs, `low` for swing lows.
    pub price: f64,
}

/// Minimum candles for any swing point with half-window `window`.
#[must_use]
pub const fn min_len(window: usize) -> usize {
    window.saturating_mul(2).saturating_add(1)
}

/// Lazily enumerate swing points in `candles` with half-window `window`.
///
/// Index `i` is a swing high iff `high[i]` is strictly greater than every other
/// high in `[i - window, i + window]`; swing lows mirror on `low`. The first and
/// last `window` candles never qualify. A zero window yields nothing.
///
/// The iterator is ordered by index, high before low when one candle is both,
/// and is `Clone` so callers can restart it cheaply.
#[must_use]
pub fn swing_points(candles: &[Candle], window: usize) -> SwingPoints<'_> {
    let end = if window == 0 || candles.len() < min_len(window) {
        0
    } else {
        candles.len() - window
    };
    SwingPoints {
        candles,
        window,
        next: window,
        end,
        pending_low: None,
    }
}

/// Iterator returned by [`swing_points`].
#[derive(Debug, Clone)]
pub struct SwingPoints<'a> {
    candles: &'a [Candle],
    window: usize,
    next: usize,
    end: usize,
    pending_low: Option<SwingPoint>,
}

impl SwingPoints<'_> {
    fn neighbours(&self, i: usize) -> impl Iterator<Item = &Candle> {
        let w = self.window;
        self.candles[i - w..i]
            .iter()
            .chain(self.candles[i + 1..=i + w].iter())
    }

    fn is_high(&self, i: usize) -> bool {
        let h = self.candles[i].high;
        self.neighbours(i).all(|c| h > c.high)
    }

    fn is_low(&self, i: usize) -> bool {
        let l = self.candles[i].low;
        self.neighbours(i).all(|c| l < c.low)
    }
}

impl Iterator for SwingPoints<'_> {
    type Item = SwingPoint;

    fn next(&mut self) -> Option<SwingPoint> {
        if let Some(low) = self.pending_low.take() {
            return Some(low);
        }
        while self.next < self.end {
            let i = self.next;
            self.next += 1;
            let low = self.is_low(i).then(|| SwingPoint {
                index: i,
                kind: SwingKind::Low,
                price: self.candles[i].low,
            });
            if self.is_high(i) {
                self.pending_low = low;
                return Some(SwingPoint {
                    index: i,
                    kind: SwingKind::High,
                    price: self.candles[i].high,
                });
            }
            if low.is_some() {
                return low;
            }
        }
        None
    }
}

impl std::iter::FusedIterator for SwingPoints<'_> {}
