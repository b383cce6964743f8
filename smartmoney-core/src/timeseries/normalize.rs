use std::collections::{BTreeMap, btree_map::Entry};

use crate::{Candle, MalformedCandle, Series};

/// Output of [`normalize`]: the accepted series plus every rejected record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Validated candles, ascending by timestamp.
    pub series: Series,
    /// Records dropped because they failed [`Candle::check`].
    pub rejected: Vec<MalformedCandle>,
}

/// Build a [`Series`] from raw provider records.
///
/// - Records failing [`Candle::check`] are skipped and reported in `rejected`
///   with their input position.
/// - Candles are keyed by `ts`; the first valid appearance wins for duplicates.
/// - Output is sorted ascending regardless of input order.
///
/// A partial series is accepted: one bad row never fails the whole batch.
pub fn normalize<I>(raw: I) -> Normalized
where
    I: IntoIterator<Item = Candle>,
{
    let mut map: BTreeMap<i64, Candle> = BTreeMap::new();
    let mut rejected = Vec::new();

    for (index, c) in raw.into_iter().enumerate() {
        if let Err(reason) = c.check() {
            #[cfg(feature = "tracing")]
            tracing::warn!(index, ts = c.ts, %reason, "skipping malformed candle");
            rejected.push(MalformedCandle { index, reason });
            continue;
        }
        match map.entry(c.ts) {
            Entry::Vacant(v) => {
                v.insert(c);
            }
            Entry::Occupied(_) => {}
        }
    }

    Normalized {
        series: Series::from_sorted(map.into_values().collect()),
        rejected,
    }
}
