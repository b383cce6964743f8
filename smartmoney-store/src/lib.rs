//! smartmoney-store
//!
//! Append-only store for detection events plus the online calibration loop
//! that nudges open events' confidence when a sibling resolves.
//!
//! Two engines implement [`EventStore`]:
//! - [`SqliteEventStore`]: `rusqlite`, file-backed or in-memory.
//! - [`MemoryEventStore`]: a locked `Vec`, for tests and ephemeral runs.
//!
//! Both serialise writers behind one lock and apply `resolve` atomically.
#![warn(missing_docs)]

mod calibration;
mod memory;
mod sqlite;

use std::collections::BTreeMap;

pub use memory::MemoryEventStore;
pub use smartmoney_types::{
    CalibrationConfig, DetectedEvent, EventId, EventKind, KindStats, NewEvent, Outcome, StoreError,
};
pub use sqlite::SqliteEventStore;

/// Result of a successful [`EventStore::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The event after being marked resolved.
    pub event: DetectedEvent,
    /// Number of open sibling events whose confidence was adjusted.
    pub adjusted: usize,
}

/// Persistent event storage shared by the scanner and outcome reporters.
pub trait EventStore: Send + Sync {
    /// Insert an unresolved event, clamping its confidence into the calibration bounds.
    ///
    /// # Errors
    /// Returns `StoreError` when the engine fails or the payload cannot be encoded.
    fn append(&self, event: NewEvent) -> Result<EventId, StoreError>;

    /// Insert unless an event with the same `(symbol, kind, ts, variant)` exists.
    ///
    /// Returns `None` when a matching event was already stored.
    ///
    /// # Errors
    /// Same as [`EventStore::append`].
    fn append_if_absent(&self, event: NewEvent) -> Result<Option<EventId>, StoreError>;

    /// Fetch one event by id.
    ///
    /// # Errors
    /// Returns `StoreError` when the engine fails or a row cannot be decoded.
    fn get(&self, id: EventId) -> Result<Option<DetectedEvent>, StoreError>;

    /// Mark an event resolved and recalibrate its open siblings.
    ///
    /// Every other unresolved event with the same `(symbol, kind)` moves by
    /// `+win_delta` on a win or `-loss_delta` on a loss, clamped to
    /// `[floor, ceiling]`.
    ///
    /// # Errors
    /// - `EventNotFound` for an unknown id.
    /// - `AlreadyResolved` if the event was resolved before; nothing changes.
    fn resolve(&self, id: EventId, outcome: Outcome) -> Result<Resolution, StoreError>;

    /// Events for `symbol` with `ts >= since_ts`, newest first (`ts` desc, then id desc).
    ///
    /// # Errors
    /// Returns `StoreError` when the engine fails or a row cannot be decoded.
    fn query(&self, symbol: &str, since_ts: i64) -> Result<Vec<DetectedEvent>, StoreError>;

    /// Per-kind tallies for `symbol`. Kinds with no events are omitted.
    ///
    /// # Errors
    /// Returns `StoreError` when the engine fails or a row cannot be decoded.
    fn stats(&self, symbol: &str) -> Result<BTreeMap<EventKind, KindStats>, StoreError>;
}
