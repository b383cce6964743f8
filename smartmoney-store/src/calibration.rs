use std::collections::BTreeMap;

use smartmoney_types::{CalibrationConfig, DetectedEvent, EventKind, KindStats, Outcome};

/// Signed confidence step applied to open siblings after `outcome`.
pub(crate) fn delta(cfg: &CalibrationConfig, outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Win => cfg.win_delta,
        Outcome::Loss => -cfg.loss_delta,
    }
}

pub(crate) fn adjusted(cfg: &CalibrationConfig, confidence: f64, outcome: Outcome) -> f64 {
    cfg.clamp(confidence + delta(cfg, outcome))
}

/// Fold events into per-kind tallies.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn tally<I>(events: I) -> BTreeMap<EventKind, KindStats>
where
    I: IntoIterator<Item = (EventKind, bool, Option<Outcome>, f64)>,
{
    let mut out: BTreeMap<EventKind, (KindStats, f64)> = BTreeMap::new();
    for (kind, resolved, outcome, confidence) in events {
        let (stats, sum) = out.entry(kind).or_default();
        if resolved {
            match outcome {
                Some(Outcome::Win) => stats.wins += 1,
                Some(Outcome::Loss) => stats.losses += 1,
                None => {}
            }
        } else {
            stats.open += 1;
            *sum += confidence;
        }
    }
    out.into_iter()
        .map(|(kind, (mut stats, sum))| {
            if stats.open > 0 {
                stats.mean_open_confidence = Some(sum / stats.open as f64);
            }
            (kind, stats)
        })
        .collect()
}

pub(crate) fn tally_events(events: &[DetectedEvent]) -> BTreeMap<EventKind, KindStats> {
    tally(
        events
            .iter()
            .map(|e| (e.kind, e.resolved, e.outcome, e.confidence)),
    )
}
