//! Storage layer for the punch clock.
//!
//! Persists punches and the holiday calendar using `rusqlite`, and supplies
//! punches to the engine through [`PunchSource`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Share it behind a `Mutex` or open one `Database` per thread.
//!
//! # Schema
//!
//! ## Timestamp Format
//!
//! `occurred_at` is stored as TEXT in local wall-clock form with millisecond
//! precision (e.g., `2025-01-15T09:00:00.000`). The fixed width keeps
//! lexicographic ordering equal to chronological ordering, which the range
//! queries rely on.
//!
//! ## Soft Delete
//!
//! Punches are never removed. [`Database::deactivate_punch`] clears the
//! `active` flag, and every read used for reconstruction skips inactive rows.
//!
//! ## Holidays
//!
//! A holiday with an empty `location` applies to every work site.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use punch_core::{
    HolidaySet, PeriodFilter, PunchEvent, PunchSource, RawPunch, SubjectId, ValidationError,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use uuid::Uuid;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored punch no longer validates.
    #[error("invalid punch {punch_id}: {source}")]
    InvalidPunch {
        punch_id: String,
        #[source]
        source: ValidationError,
    },
    /// A stored holiday date could not be parsed.
    #[error("invalid holiday date: {0}")]
    InvalidHoliday(String),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";

const PUNCH_COLUMNS: &str = "id, subject_id, kind, occurred_at, category, location, active";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- kind: clock_in | break_start | break_end | clock_out
            -- occurred_at: local wall-clock time, e.g. '2025-01-15T09:00:00.000'
            CREATE TABLE IF NOT EXISTS punches (
                id TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                occurred_at TEXT NOT NULL,
                category TEXT,
                location TEXT,
                active INTEGER NOT NULL DEFAULT 1
            );

            CREATE INDEX IF NOT EXISTS idx_punches_subject_time ON punches(subject_id, occurred_at);
            CREATE INDEX IF NOT EXISTS idx_punches_time ON punches(occurred_at);

            CREATE TABLE IF NOT EXISTS holidays (
                date TEXT NOT NULL,
                location TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (date, location)
            );
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of punches, ignoring duplicates by ID.
    ///
    /// Punches without an ID are given a fresh UUID.
    pub fn insert_punches(&mut self, punches: &[PunchEvent]) -> Result<usize, DbError> {
        if punches.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO punches
                (id, subject_id, kind, occurred_at, category, location, active)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for punch in punches {
                let id = punch
                    .id
                    .as_ref()
                    .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);
                inserted += stmt.execute(params![
                    id,
                    punch.subject_id.as_str(),
                    punch.kind.as_str(),
                    format_timestamp(punch.occurred_at),
                    punch.category,
                    punch.location,
                    punch.active,
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(inserted, total = punches.len(), "inserted punches");
        Ok(inserted)
    }

    /// Marks a punch inactive. Returns false if no active punch had that ID.
    pub fn deactivate_punch(&self, id: &str) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE punches SET active = 0 WHERE id = ? AND active = 1",
            [id],
        )?;
        Ok(changed > 0)
    }

    /// Looks up a single punch by ID, active or not.
    pub fn get_punch(&self, id: &str) -> Result<Option<PunchEvent>, DbError> {
        let sql = format!("SELECT {PUNCH_COLUMNS} FROM punches WHERE id = ?");
        let raw = self
            .conn
            .query_row(&sql, [id], raw_punch_from_row)
            .optional()?;
        raw.map(validate).transpose()
    }

    /// Active punches for one employee within a period, ordered by time then ID.
    pub fn punches_for_subject(
        &self,
        subject: &SubjectId,
        period: &PeriodFilter,
    ) -> Result<Vec<PunchEvent>, DbError> {
        let (start, end) = sql_bounds(period);
        let sql = format!(
            "
            SELECT {PUNCH_COLUMNS}
            FROM punches
            WHERE active = 1 AND subject_id = ? AND occurred_at >= ? AND occurred_at < ?
            ORDER BY occurred_at ASC, id ASC
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![subject.as_str(), start, end], raw_punch_from_row)?;
        collect_punches(rows)
    }

    /// Active punches of every employee within a period.
    pub fn all_punches(&self, period: &PeriodFilter) -> Result<Vec<PunchEvent>, DbError> {
        let (start, end) = sql_bounds(period);
        let sql = format!(
            "
            SELECT {PUNCH_COLUMNS}
            FROM punches
            WHERE active = 1 AND occurred_at >= ? AND occurred_at < ?
            ORDER BY subject_id ASC, occurred_at ASC, id ASC
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![start, end], raw_punch_from_row)?;
        collect_punches(rows)
    }

    /// Adds a holiday. Returns false if it was already present.
    pub fn insert_holiday(&self, date: NaiveDate, location: Option<&str>) -> Result<bool, DbError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO holidays (date, location) VALUES (?, ?)",
            params![
                date.format(DATE_FORMAT).to_string(),
                location.unwrap_or_default()
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Lists holidays ordered by date then location.
    pub fn list_holidays(&self) -> Result<Vec<(NaiveDate, Option<String>)>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, location FROM holidays ORDER BY date ASC, location ASC")?;
        let rows = stmt.query_map([], |row| {
            let date: String = row.get(0)?;
            let location: String = row.get(1)?;
            Ok((date, location))
        })?;
        let mut holidays = Vec::new();
        for row in rows {
            let (date, location) = row?;
            let parsed = NaiveDate::parse_from_str(&date, DATE_FORMAT)
                .map_err(|_| DbError::InvalidHoliday(date.clone()))?;
            let location = (!location.is_empty()).then_some(location);
            holidays.push((parsed, location));
        }
        Ok(holidays)
    }

    /// The holiday calendar as an in-memory set for classification.
    pub fn holidays(&self) -> Result<HolidaySet, DbError> {
        Ok(self.list_holidays()?.into_iter().collect())
    }
}

impl PunchSource for Database {
    type Error = DbError;

    fn fetch(
        &self,
        subject: &SubjectId,
        period: &PeriodFilter,
    ) -> Result<Vec<PunchEvent>, Self::Error> {
        self.punches_for_subject(subject, period)
    }
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Query bounds for a period; unbounded periods span every representable timestamp.
fn sql_bounds(period: &PeriodFilter) -> (String, String) {
    period.bounds().map_or_else(
        || (String::new(), "~".to_string()),
        |(start, end)| (format_timestamp(start), format_timestamp(end)),
    )
}

fn raw_punch_from_row(row: &Row<'_>) -> rusqlite::Result<RawPunch> {
    Ok(RawPunch {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        kind: row.get(2)?,
        occurred_at: row.get(3)?,
        category: row.get(4)?,
        location: row.get(5)?,
        active: row.get(6)?,
    })
}

fn validate(raw: RawPunch) -> Result<PunchEvent, DbError> {
    let punch_id = raw.id.clone().unwrap_or_default();
    raw.validate()
        .map_err(|source| DbError::InvalidPunch { punch_id, source })
}

fn collect_punches(
    rows: impl Iterator<Item = rusqlite::Result<RawPunch>>,
) -> Result<Vec<PunchEvent>, DbError> {
    let mut punches = Vec::new();
    for row in rows {
        punches.push(validate(row?)?);
    }
    Ok(punches)
}
