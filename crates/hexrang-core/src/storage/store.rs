//! Color record store
//!
//! The `ColorStore` owns the SQLite connection and exposes the operations
//! the sync layer depends on: insert, query by sync flag, and a durable
//! flag update. Records are never deleted here and `synced` is never reset.

use std::path::Path;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{ColorRecord, HexColor};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::{init_schema, needs_init};

/// Key in `app_state` for the one-time first-sync flag
const HAS_SYNCED_BEFORE: &str = "has_synced_before";

/// SQLite-backed store for color records
pub struct ColorStore {
    conn: Connection,
}

impl ColorStore {
    /// Open or create the database at the configured location
    pub fn open(config: &Config) -> StorageResult<Self> {
        Self::open_at(&config.sqlite_path())
    }

    /// Open or create the database at a specific path
    pub fn open_at(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        if needs_init(&conn) {
            init_schema(&conn)?;
        }

        Ok(Self { conn })
    }

    /// Insert a new record
    pub fn insert(&mut self, record: &ColorRecord) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO colors (id, hex, created_at, synced) VALUES (?, ?, ?, ?)",
            params![
                record.id.to_string(),
                record.hex.as_str(),
                record.created_at.timestamp_millis(),
                record.synced,
            ],
        )?;
        Ok(())
    }

    /// Get a record by ID
    pub fn get(&self, id: Uuid) -> StorageResult<Option<ColorRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, hex, created_at, synced FROM colors WHERE id = ?")?;
        let mut rows = stmt.query(params![id.to_string()])?;

        match rows.next()? {
            Some(row) => Ok(Some(hydrate_record(ColorRow::from_row(row)?)?)),
            None => Ok(None),
        }
    }

    /// Get all records, newest first
    pub fn get_all(&self) -> StorageResult<Vec<ColorRecord>> {
        self.query_records(
            "SELECT id, hex, created_at, synced FROM colors ORDER BY created_at DESC",
        )
    }

    /// Get every record that has not yet been confirmed on the remote,
    /// oldest first so the sweep replays them in creation order
    pub fn get_unsynced(&self) -> StorageResult<Vec<ColorRecord>> {
        self.query_records(
            "SELECT id, hex, created_at, synced FROM colors WHERE synced = 0 ORDER BY created_at",
        )
    }

    /// Flip the synced flag for the given records in one durable commit
    ///
    /// The flag is only ever set, never cleared; the batch sweep relies on
    /// this being all-or-nothing.
    pub fn mark_synced(&mut self, ids: &[Uuid]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE colors SET synced = 1 WHERE id = ?")?;
            for id in ids {
                stmt.execute(params![id.to_string()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Total record count
    pub fn count(&self) -> StorageResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM colors", [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Count of records not yet confirmed on the remote
    pub fn unsynced_count(&self) -> StorageResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM colors WHERE synced = 0", [], |row| {
                row.get(0)
            })
            .map_err(Into::into)
    }

    /// Whether any record has ever completed a sync
    pub fn has_synced_before(&self) -> StorageResult<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM app_state WHERE key = ?")?;
        let result: Result<String, _> = stmt.query_row(params![HAS_SYNCED_BEFORE], |row| row.get(0));

        match result {
            Ok(value) => Ok(value == "1"),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Record that a sync has completed at least once
    pub fn set_synced_before(&mut self) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?, '1')",
            params![HAS_SYNCED_BEFORE],
        )?;
        Ok(())
    }

    fn query_records(&self, sql: &str) -> StorageResult<Vec<ColorRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| ColorRow::from_row(row))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(hydrate_record(row?)?);
        }
        Ok(records)
    }
}

/// Raw row shape before hydration
struct ColorRow {
    id: String,
    hex: String,
    created_at: i64,
    synced: bool,
}

impl ColorRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            hex: row.get(1)?,
            created_at: row.get(2)?,
            synced: row.get(3)?,
        })
    }
}

fn hydrate_record(row: ColorRow) -> StorageResult<ColorRecord> {
    let id = Uuid::parse_str(&row.id).map_err(|e| StorageError::InvalidRecord {
        details: format!("bad UUID '{}': {}", row.id, e),
    })?;

    let hex = HexColor::parse(&row.hex).map_err(|e| StorageError::InvalidRecord {
        details: format!("bad hex value '{}': {}", row.hex, e),
    })?;

    let created_at =
        chrono::DateTime::from_timestamp_millis(row.created_at).unwrap_or_else(chrono::Utc::now);

    Ok(ColorRecord {
        id,
        hex,
        created_at,
        synced: row.synced,
    })
}
