use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::mode::Mode;

/// Key-value persistence for values that outlive a session
pub trait RecordStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile store, used in tests and when the database is unavailable
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordStore {
    values: HashMap<String, String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// SQLite-backed record store
#[derive(Debug)]
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open the database in the default state directory
    pub fn new() -> Result<Self> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("pairs_records.db"));
        Self::open(db_path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn read(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
    }

    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Remove every stored record
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM records", [])?;
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read(key)
            .inspect_err(|e| log::warn!("reading record {key}: {e}"))
            .ok()
            .flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = self.write(key, value) {
            log::warn!("writing record {key}: {e}");
        }
    }
}

/// What finishing a game changed in the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRecord {
    pub mode: Mode,
    pub elapsed_secs: u64,
    pub wins: u32,
    pub new_best: bool,
}

/// Best time and win count per mode, on top of a [`RecordStore`]
pub struct Records {
    store: Box<dyn RecordStore>,
}

impl Records {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn best_time(&self, mode: Mode) -> Option<u64> {
        self.read_number(mode.best_time_key())
    }

    pub fn wins(&self, mode: Mode) -> u32 {
        self.read_number(mode.wins_key()).unwrap_or(0)
    }

    /// Count a completed game and keep its time if it beats the stored best
    pub fn record_win(&mut self, mode: Mode, elapsed_secs: u64) -> WinRecord {
        let wins = self.wins(mode) + 1;
        self.store.set(mode.wins_key(), &wins.to_string());

        let new_best = match self.best_time(mode) {
            Some(best) => elapsed_secs < best,
            None => true,
        };
        if new_best {
            self.store
                .set(mode.best_time_key(), &elapsed_secs.to_string());
        }

        WinRecord {
            mode,
            elapsed_secs,
            wins,
            new_best,
        }
    }

    fn read_number<N: std::str::FromStr>(&self, key: &str) -> Option<N> {
        let raw = self.store.get(key)?;
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            log::warn!("ignoring unreadable record {key}={raw:?}");
        }
        parsed
    }
}

impl std::fmt::Debug for Records {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records")
            .field("normal_best", &self.best_time(Mode::Normal))
            .field("hard_best", &self.best_time(Mode::Hard))
            .finish()
    }
}
