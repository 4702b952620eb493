//! SQLite storage layer for the climate datasets.
//!
//! Database schema:
//! - `co2` table: year, month, decimal, average, inter, trend, days
//! - `sealevel` table: date, sea_level, j1, j2, j3
//!
//! Neither table declares a key, so inserting the same readings twice stores
//! every row twice. Inserts stay in an open transaction until [`Database::commit`];
//! deletes commit immediately.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::models::{
    Co2Reading, Co2Readings, Co2Record, SeaLevelReading, SeaLevelReadings, SeaLevelRecord,
};

const CREATE_CO2_TABLE: &str = "CREATE TABLE IF NOT EXISTS co2 (
    year INTEGER,
    month INTEGER,
    decimal REAL,
    average REAL,
    inter REAL,
    trend REAL,
    days INTEGER
)";

const CREATE_SEA_LEVEL_TABLE: &str = "CREATE TABLE IF NOT EXISTS sealevel (
    date TEXT,
    sea_level REAL,
    j1 REAL,
    j2 REAL,
    j3 REAL
)";

/// Read a mandatory REAL column. SQLite stores NaN as NULL, so NULL reads back as NaN.
fn get_real(row: &Row, idx: usize) -> rusqlite::Result<f64> {
    Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(f64::NAN))
}

fn co2_from_row(row: &Row) -> rusqlite::Result<Co2Record> {
    Ok(Co2Record::new(
        row.get(0)?,
        row.get(1)?,
        Co2Reading {
            decimal: get_real(row, 2)?,
            average: get_real(row, 3)?,
            interpolated: get_real(row, 4)?,
            trend: get_real(row, 5)?,
            days: row.get(6)?,
        },
    ))
}

fn sea_level_from_row(row: &Row) -> rusqlite::Result<SeaLevelRecord> {
    Ok(SeaLevelRecord::new(
        row.get(0)?,
        SeaLevelReading {
            sea_level: get_real(row, 1)?,
            j1: row.get(2)?,
            j2: row.get(3)?,
            j3: row.get(4)?,
        },
    ))
}

/// Split a `YYYY-MM` key into its year and month
pub fn parse_month_key(key: &str) -> Result<(i64, i64)> {
    let (year, month) = key
        .split_once('-')
        .with_context(|| format!("Invalid CO2 date key {key:?}: expected YYYY-MM"))?;
    let year = year
        .trim()
        .parse()
        .with_context(|| format!("Invalid year in CO2 date key {key:?}"))?;
    let month = month
        .trim()
        .parse()
        .with_context(|| format!("Invalid month in CO2 date key {key:?}"))?;
    Ok((year, month))
}

/// Record store for both datasets, owning a single SQLite connection.
///
/// The connection is released by [`Database::close`], or when the value is
/// dropped. Dropping rolls back anything not yet committed.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {path:?}"))?;
        debug!(path = %path.display(), "Opened database");
        Ok(Database { conn })
    }

    /// Open a private in-memory database
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Ok(Database { conn })
    }

    /// Release the connection, reporting any error from closing it
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }

    /// Start a write transaction unless one is already open
    fn begin_if_needed(&self) -> Result<()> {
        if self.conn.is_autocommit() {
            self.conn
                .execute_batch("BEGIN")
                .context("Failed to begin transaction")?;
        }
        Ok(())
    }

    /// Create both tables if they do not exist yet
    pub fn initialize(&self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_CO2_TABLE)
            .context("Failed to create co2 table")?;
        println!("CO2 Table created");

        self.conn
            .execute_batch(CREATE_SEA_LEVEL_TABLE)
            .context("Failed to create sealevel table")?;
        println!("Sea Level Table created");
        Ok(())
    }

    /// Append one `co2` row per reading. Not committed until [`Database::commit`].
    pub fn insert_co2(&self, readings: &Co2Readings) -> Result<usize> {
        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO co2 (year, month, decimal, average, inter, trend, days) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        for (&(year, month), r) in readings {
            stmt.execute(params![
                year,
                month,
                r.decimal,
                r.average,
                r.interpolated,
                r.trend,
                r.days
            ])
            .with_context(|| format!("Failed to insert CO2 row for {year}-{month:02}"))?;
        }

        info!(rows = readings.len(), "Inserted CO2 rows");
        println!("CO2 Data inserted");
        Ok(readings.len())
    }

    /// Append one `sealevel` row per reading. Not committed until [`Database::commit`].
    pub fn insert_sea_level(&self, readings: &SeaLevelReadings) -> Result<usize> {
        self.begin_if_needed()?;
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO sealevel (date, sea_level, j1, j2, j3) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (date, r) in readings {
            stmt.execute(params![date, r.sea_level, r.j1, r.j2, r.j3])
                .with_context(|| format!("Failed to insert sea level row for {date}"))?;
        }

        info!(rows = readings.len(), "Inserted sea level rows");
        println!("Sea Level Data inserted");
        Ok(readings.len())
    }

    /// First `co2` row for the given month, if any
    pub fn find_co2(&self, year: i64, month: i64) -> Result<Option<Co2Record>> {
        self.conn
            .query_row(
                "SELECT year, month, decimal, average, inter, trend, days \
                 FROM co2 WHERE year = ?1 AND month = ?2",
                params![year, month],
                co2_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to look up CO2 data for {year}-{month:02}"))
    }

    /// First `sealevel` row for the given date key, if any
    pub fn find_sea_level(&self, date: &str) -> Result<Option<SeaLevelRecord>> {
        self.conn
            .query_row(
                "SELECT date, sea_level, j1, j2, j3 FROM sealevel WHERE date = ?1",
                [date],
                sea_level_from_row,
            )
            .optional()
            .with_context(|| format!("Failed to look up sea level data for {date}"))
    }

    /// Delete every `co2` row for a `YYYY-MM` key and commit
    pub fn delete_co2(&self, key: &str) -> Result<usize> {
        let (year, month) = parse_month_key(key)?;
        self.begin_if_needed()?;
        let deleted = self
            .conn
            .execute(
                "DELETE FROM co2 WHERE year = ?1 AND month = ?2",
                params![year, month],
            )
            .with_context(|| format!("Failed to delete CO2 data for {key}"))?;
        self.commit()?;

        info!(key, rows = deleted, "Deleted CO2 rows");
        println!("CO2 data for {key} deleted");
        Ok(deleted)
    }

    /// Delete every `sealevel` row for a date key and commit
    pub fn delete_sea_level(&self, date: &str) -> Result<usize> {
        self.begin_if_needed()?;
        let deleted = self
            .conn
            .execute("DELETE FROM sealevel WHERE date = ?1", [date])
            .with_context(|| format!("Failed to delete sea level data for {date}"))?;
        self.commit()?;

        info!(date, rows = deleted, "Deleted sea level rows");
        println!("Sea level data for {date} deleted");
        Ok(deleted)
    }

    /// Commit pending writes. A no-op when nothing is pending.
    pub fn commit(&self) -> Result<()> {
        if !self.conn.is_autocommit() {
            self.conn
                .execute_batch("COMMIT")
                .context("Failed to commit transaction")?;
            debug!("Committed transaction");
        }
        Ok(())
    }

    /// Number of rows in the `co2` table
    pub fn count_co2(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM co2", [], |row| row.get(0))
            .context("Failed to count co2 rows")
    }

    /// Number of rows in the `sealevel` table
    pub fn count_sea_level(&self) -> Result<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sealevel", [], |row| row.get(0))
            .context("Failed to count sealevel rows")
    }
}
