use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use smartmoney_types::{
    CalibrationConfig, DetectedEvent, EventId, EventKind, KindStats, NewEvent, Outcome, StoreError,
};

use crate::calibration::{adjusted, tally_events};
use crate::{EventStore, Resolution};

/// In-process [`EventStore`] backed by a locked `Vec`. Contents die with the value.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<DetectedEvent>>,
    calibration: CalibrationConfig,
}

impl MemoryEventStore {
    /// Empty store with the given calibration constants.
    #[must_use]
    pub fn new(calibration: CalibrationConfig) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            calibration,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<DetectedEvent>>, StoreError> {
        self.events
            .lock()
            .map_err(|_| StoreError::Backend("event lock poisoned".into()))
    }

    fn insert(&self, events: &mut Vec<DetectedEvent>, e: NewEvent) -> EventId {
        let id = EventId::try_from(events.len()).map_or(EventId::MAX, |n| n + 1);
        events.push(DetectedEvent {
            id,
            symbol: e.symbol,
            kind: e.kind,
            ts: e.ts,
            variant: e.variant,
            payload: e.payload,
            confidence: self.calibration.clamp(e.confidence),
            resolved: false,
            outcome: None,
        });
        id
    }
}

impl EventStore for MemoryEventStore {
    fn append(&self, event: NewEvent) -> Result<EventId, StoreError> {
        let mut events = self.lock()?;
        Ok(self.insert(&mut events, event))
    }

    fn append_if_absent(&self, event: NewEvent) -> Result<Option<EventId>, StoreError> {
        let mut events = self.lock()?;
        let exists = events.iter().any(|e| {
            e.symbol == event.symbol
                && e.kind == event.kind
                && e.ts == event.ts
                && e.variant == event.variant
        });
        if exists {
            return Ok(None);
        }
        Ok(Some(self.insert(&mut events, event)))
    }

    fn get(&self, id: EventId) -> Result<Option<DetectedEvent>, StoreError> {
        Ok(self.lock()?.iter().find(|e| e.id == id).cloned())
    }

    fn resolve(&self, id: EventId, outcome: Outcome) -> Result<Resolution, StoreError> {
        let mut events = self.lock()?;
        let pos = events
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::EventNotFound { id })?;
        if events[pos].resolved {
            return Err(StoreError::AlreadyResolved { id });
        }
        events[pos].resolved = true;
        events[pos].outcome = Some(outcome);
        let (symbol, kind) = (events[pos].symbol.clone(), events[pos].kind);

        let mut count = 0;
        for e in events
            .iter_mut()
            .filter(|e| !e.resolved && e.kind == kind && e.symbol == symbol)
        {
            e.confidence = adjusted(&self.calibration, e.confidence, outcome);
            count += 1;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(id, %symbol, %kind, %outcome, adjusted = count, "calibrated open events");

        Ok(Resolution {
            event: events[pos].clone(),
            adjusted: count,
        })
    }

    fn query(&self, symbol: &str, since_ts: i64) -> Result<Vec<DetectedEvent>, StoreError> {
        let mut out: Vec<DetectedEvent> = self
            .lock()?
            .iter()
            .filter(|e| e.symbol == symbol && e.ts >= since_ts)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.ts.cmp(&a.ts).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    fn stats(&self, symbol: &str) -> Result<BTreeMap<EventKind, KindStats>, StoreError> {
        let events = self.lock()?;
        let mine: Vec<DetectedEvent> = events.iter().filter(|e| e.symbol == symbol).cloned().collect();
        Ok(tally_events(&mine))
    }
}
