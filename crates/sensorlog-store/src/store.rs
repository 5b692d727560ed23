//! Main store implementation.

use std::path::Path;

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{NewReading, SensorStats, StoredReading};
use crate::queries::HistoryFilter;
use crate::schema;

/// SQLite-based store for sensor readings.
///
/// The store is append-only: rows are inserted once and never updated or
/// deleted. Each append assigns a monotonically increasing row id that
/// reflects insertion order (client timestamps may arrive out of order).
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode lets readers proceed while a write is in flight
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Append one reading, returning its assigned row id.
    ///
    /// The write is a single INSERT: it either fully succeeds or fails with
    /// no row persisted.
    pub fn append(&self, reading: &NewReading) -> Result<i64> {
        let recorded_at = OffsetDateTime::now_utc().unix_timestamp();

        self.conn.execute(
            "INSERT INTO readings (sensor_id, value, timestamp, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                reading.sensor_id,
                reading.value,
                reading.timestamp,
                recorded_at
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Query reading history, newest first.
    pub fn query_history(&self, filter: &HistoryFilter) -> Result<Vec<StoredReading>> {
        let sql = filter.build_sql();
        let (_, params) = filter.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), map_reading_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Return the most recent reading for every distinct sensor, ordered by
    /// sensor id ascending.
    ///
    /// "Most recent" means the maximum timestamp; when several rows share
    /// that timestamp, the highest row id (the last one ingested) wins. The
    /// correlated subquery pins the whole winning row, so the returned
    /// value and timestamp always belong together.
    pub fn latest_per_sensor(&self) -> Result<Vec<StoredReading>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.id, r.sensor_id, r.value, r.timestamp, r.recorded_at
             FROM readings r
             WHERE r.id = (
                 SELECT r2.id FROM readings r2
                 WHERE r2.sensor_id = r.sensor_id
                 ORDER BY r2.timestamp DESC, r2.id DESC
                 LIMIT 1
             )
             ORDER BY r.sensor_id ASC",
        )?;

        let readings = stmt
            .query_map([], map_reading_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Aggregate statistics over all readings for one sensor.
    ///
    /// A sensor with no readings yields `count = 0` and `None` for the
    /// aggregates; zero is never fabricated for an empty set.
    pub fn stats(&self, sensor_id: &str) -> Result<SensorStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), AVG(value), MIN(value), MAX(value)
             FROM readings WHERE sensor_id = ?",
            [sensor_id],
            |row| {
                Ok(SensorStats {
                    count: row.get::<_, i64>(0)? as u64,
                    average: row.get(1)?,
                    min: row.get(2)?,
                    max: row.get(3)?,
                })
            },
        )?;

        Ok(stats)
    }

    /// Count readings, optionally restricted to one sensor.
    pub fn count_readings(&self, sensor_id: Option<&str>) -> Result<u64> {
        let count: i64 = match sensor_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM readings WHERE sensor_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

fn map_reading_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredReading> {
    Ok(StoredReading {
        id: row.get(0)?,
        sensor_id: row.get(1)?,
        value: row.get(2)?,
        timestamp: row.get(3)?,
        recorded_at: OffsetDateTime::from_unix_timestamp(row.get(4)?).unwrap(),
    })
}
