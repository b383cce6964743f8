use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, params};
use smartmoney_types::{
    CalibrationConfig, DetectedEvent, EventId, EventKind, KindStats, NewEvent, Outcome, StoreError,
};

use crate::calibration::{delta, tally};
use crate::{EventStore, Resolution};

const SELECT_COLUMNS: &str =
    "SELECT id, symbol, ts, kind, details, confidence, resolved, outcome, variant FROM events";

fn backend(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn ensure_table(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
             id          INTEGER PRIMARY KEY AUTOINCREMENT,
             symbol      TEXT    NOT NULL,
             ts          INTEGER NOT NULL,
             kind        TEXT    NOT NULL,
             details     TEXT    NOT NULL,
             confidence  REAL    NOT NULL,
             resolved    INTEGER NOT NULL DEFAULT 0,
             outcome     TEXT,
             variant     TEXT    NOT NULL DEFAULT ''
         );
         CREATE INDEX IF NOT EXISTS idx_events_open ON events (symbol, kind, resolved);
         CREATE INDEX IF NOT EXISTS idx_events_recent ON events (symbol, ts);",
    )
    .map_err(backend)?;

    // Files created before `variant` existed get the column added in place.
    let has_variant: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('events') WHERE name = 'variant'",
            [],
            |r| r.get(0),
        )
        .map_err(backend)?;
    if !has_variant {
        conn.execute(
            "ALTER TABLE events ADD COLUMN variant TEXT NOT NULL DEFAULT ''",
            [],
        )
        .map_err(backend)?;
    }
    Ok(())
}

/// Raw column values; decoded outside the rusqlite row callback so that bad
/// labels surface as `Serialization` rather than a backend error.
struct RawRow {
    id: i64,
    symbol: String,
    ts: i64,
    kind: String,
    details: String,
    confidence: f64,
    resolved: bool,
    outcome: Option<String>,
    variant: String,
}

impl RawRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            symbol: row.get(1)?,
            ts: row.get(2)?,
            kind: row.get(3)?,
            details: row.get(4)?,
            confidence: row.get(5)?,
            resolved: row.get(6)?,
            outcome: row.get(7)?,
            variant: row.get(8)?,
        })
    }

    fn decode(self) -> Result<DetectedEvent, StoreError> {
        let ser = |e: &dyn std::fmt::Display| StoreError::Serialization(e.to_string());
        Ok(DetectedEvent {
            id: self.id,
            kind: self.kind.parse().map_err(|e| ser(&e))?,
            payload: serde_json::from_str(&self.details).map_err(|e| ser(&e))?,
            outcome: self
                .outcome
                .as_deref()
                .map(str::parse::<Outcome>)
                .transpose()
                .map_err(|e| ser(&e))?,
            symbol: self.symbol,
            ts: self.ts,
            variant: self.variant,
            confidence: self.confidence,
            resolved: self.resolved,
        })
    }
}

/// [`EventStore`] on SQLite via `rusqlite`.
///
/// One connection behind a mutex; `resolve` runs inside a single transaction.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
    calibration: CalibrationConfig,
}

impl SqliteEventStore {
    /// Open (or create) a database file and ensure the schema exists.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the file cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>, calibration: CalibrationConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(backend)?;
        Self::with_connection(conn, calibration)
    }

    /// Private in-memory database, discarded on drop.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if SQLite cannot allocate the database.
    pub fn open_in_memory(calibration: CalibrationConfig) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(conn, calibration)
    }

    fn with_connection(conn: Connection, calibration: CalibrationConfig) -> Result<Self, StoreError> {
        ensure_table(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            calibration,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("connection lock poisoned".into()))
    }

    fn insert(&self, conn: &Connection, e: &NewEvent) -> Result<EventId, StoreError> {
        let details = serde_json::to_string(&e.payload)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        conn.execute(
            "INSERT INTO events (symbol, ts, kind, details, confidence, resolved, variant)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![
                e.symbol,
                e.ts,
                e.kind.as_str(),
                details,
                self.calibration.clamp(e.confidence),
                e.variant
            ],
        )
        .map_err(backend)?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch(conn: &Connection, id: EventId) -> Result<Option<DetectedEvent>, StoreError> {
        conn.query_row(
            &format!("{SELECT_COLUMNS} WHERE id = ?1"),
            params![id],
            RawRow::read,
        )
        .optional()
        .map_err(backend)?
        .map(RawRow::decode)
        .transpose()
    }
}

impl EventStore for SqliteEventStore {
    fn append(&self, event: NewEvent) -> Result<EventId, StoreError> {
        let conn = self.lock()?;
        self.insert(&conn, &event)
    }

    fn append_if_absent(&self, event: NewEvent) -> Result<Option<EventId>, StoreError> {
        let conn = self.lock()?;
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM events
                 WHERE symbol = ?1 AND kind = ?2 AND ts = ?3 AND variant = ?4
                 LIMIT 1",
                params![event.symbol, event.kind.as_str(), event.ts, event.variant],
                |r| r.get(0),
            )
            .optional()
            .map_err(backend)?;
        if existing.is_some() {
            return Ok(None);
        }
        self.insert(&conn, &event).map(Some)
    }

    fn get(&self, id: EventId) -> Result<Option<DetectedEvent>, StoreError> {
        let conn = self.lock()?;
        Self::fetch(&conn, id)
    }

    fn resolve(&self, id: EventId, outcome: Outcome) -> Result<Resolution, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(backend)?;

        let Some(event) = Self::fetch(&tx, id)? else {
            return Err(StoreError::EventNotFound { id });
        };
        if event.resolved {
            return Err(StoreError::AlreadyResolved { id });
        }

        tx.execute(
            "UPDATE events SET resolved = 1, outcome = ?2 WHERE id = ?1",
            params![id, outcome.as_str()],
        )
        .map_err(backend)?;
        let adjusted = tx
            .execute(
                "UPDATE events
                 SET confidence = MIN(?4, MAX(?3, confidence + ?5))
                 WHERE symbol = ?1 AND kind = ?2 AND resolved = 0",
                params![
                    event.symbol,
                    event.kind.as_str(),
                    self.calibration.floor,
                    self.calibration.ceiling,
                    delta(&self.calibration, outcome)
                ],
            )
            .map_err(backend)?;
        tx.commit().map_err(backend)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            id,
            symbol = %event.symbol,
            kind = %event.kind,
            %outcome,
            adjusted,
            "calibrated open events"
        );

        Ok(Resolution {
            event: DetectedEvent {
                resolved: true,
                outcome: Some(outcome),
                ..event
            },
            adjusted,
        })
    }

    fn query(&self, symbol: &str, since_ts: i64) -> Result<Vec<DetectedEvent>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "{SELECT_COLUMNS} WHERE symbol = ?1 AND ts >= ?2 ORDER BY ts DESC, id DESC"
            ))
            .map_err(backend)?;
        let rows = stmt
            .query_map(params![symbol, since_ts], RawRow::read)
            .map_err(backend)?;
        rows.map(|r| r.map_err(backend).and_then(RawRow::decode))
            .collect()
    }

    fn stats(&self, symbol: &str) -> Result<BTreeMap<EventKind, KindStats>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} WHERE symbol = ?1"))
            .map_err(backend)?;
        let events = stmt
            .query_map(params![symbol], RawRow::read)
            .map_err(backend)?
            .map(|r| r.map_err(backend).and_then(RawRow::decode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tally(
            events
                .into_iter()
                .map(|e| (e.kind, e.resolved, e.outcome, e.confidence)),
        ))
    }
}
