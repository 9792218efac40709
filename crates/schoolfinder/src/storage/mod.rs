//! Storage layer for schoolfinder.
//!
//! The service only needs two operations from a store, captured by the
//! [`SchoolStore`] trait. [`Storage`] implements it on top of `SQLite` and adds
//! the lookups used by the CLI.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::school::{NewSchool, School};

/// The record store the service writes to and ranks from.
///
/// Implementations persist records verbatim; validation has already happened
/// by the time `insert` is called.
pub trait SchoolStore {
    /// Persist a validated school and return its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be persisted.
    fn insert(&self, school: &NewSchool) -> Result<i64>;

    /// Fetch every stored school, unfiltered, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the records could not be read.
    fn fetch_all(&self) -> Result<Vec<School>>;
}

/// `SQLite`-backed school store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// Text layout of `SQLite`'s `datetime()`, with optional fractional seconds.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const SELECT_SCHOOLS: &str =
    "SELECT id, name, address, latitude, longitude, created_at FROM schools";

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a school by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<School>> {
        let result = self
            .conn
            .query_row(
                &format!("{SELECT_SCHOOLS} WHERE id = ?1"),
                [id],
                Self::row_to_school,
            )
            .optional()?;
        Ok(result)
    }

    /// Count stored schools.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM schools", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_schools = self.count()?;

        let (oldest, newest): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM schools",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let parse = |s: Option<String>| s.as_deref().and_then(parse_created_at);

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_schools,
            oldest_school: parse(oldest),
            newest_school: parse(newest),
            db_size_bytes,
        })
    }

    fn row_to_school(row: &rusqlite::Row) -> rusqlite::Result<School> {
        let id: i64 = row.get(0)?;
        let created_at_str: String = row.get(5)?;
        let created_at = parse_created_at(&created_at_str).unwrap_or_else(|| {
            warn!(
                id,
                created_at = %created_at_str,
                "Unrecognized created_at, defaulting to the Unix epoch"
            );
            DateTime::UNIX_EPOCH
        });

        Ok(School {
            id,
            name: row.get(1)?,
            address: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            created_at,
        })
    }
}

/// Parse a stored `created_at` value.
///
/// Rows written by this crate hold RFC 3339. Rows written directly with
/// `SQLite`'s `datetime('now')` hold `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, SQLITE_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

impl SchoolStore for Storage {
    fn insert(&self, school: &NewSchool) -> Result<i64> {
        let location = school.location();
        self.conn.execute(
            r"
            INSERT INTO schools (name, address, latitude, longitude)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                school.name(),
                school.address(),
                location.latitude,
                location.longitude,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, name = %school.name(), "Inserted school");
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<School>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SCHOOLS} ORDER BY id ASC"))?;

        let schools = stmt
            .query_map([], Self::row_to_school)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = schools.len(), "Fetched schools");
        Ok(schools)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of schools stored.
    pub total_schools: i64,
    /// Creation time of the oldest school.
    pub oldest_school: Option<DateTime<Utc>>,
    /// Creation time of the newest school.
    pub newest_school: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
