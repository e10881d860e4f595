//! SQLite store for Sitework.
//!
//! Every write that touches more than one row runs in a transaction. The
//! store checks that referenced documents exist before storing their ids and
//! removes dependents explicitly on delete.

mod blueprints;
mod companies;
pub mod error;
mod projects;
mod reports;
mod sql;
mod tasks;
mod users;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use sitework_api::db::migrations::MIGRATIONS;

pub use error::{Result, StoreError};
pub use companies::CompanySummary;
pub use users::Credentials;

/// What a cascade delete removed, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Removed {
    pub projects: usize,
    pub tasks: usize,
    pub blueprints: usize,
    pub reports: usize,
    pub project_members: usize,
    pub users: usize,
}

impl Removed {
    fn add(&mut self, other: Removed) {
        self.projects += other.projects;
        self.tasks += other.tasks;
        self.blueprints += other.blueprints;
        self.reports += other.reports;
        self.project_members += other.project_members;
        self.users += other.users;
    }
}

/// Shared database handle. Cloning is cheap; all clones use one connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn)
    }

    /// Open the database file `sitework.db` inside `data_dir`.
    pub fn open_dir(data_dir: &Path) -> Result<Self> {
        Self::open_path(&data_dir.join("sitework.db"))
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Cheap liveness probe for the health endpoint.
    pub fn ping(&self) -> Result<()> {
        self.conn().query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
            [name],
            |row| row.get(0),
        )?;

        if !already_applied {
            conn.execute_batch(sql)?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("Applied migration: {name}");
        }
    }

    Ok(())
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
pub(crate) fn test_store() -> Store {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.keep().join("test.db");
    Store::open_path(&path).unwrap()
}
