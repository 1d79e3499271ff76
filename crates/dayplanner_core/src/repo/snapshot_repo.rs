//! Named snapshot repository contracts and implementations.
//!
//! # Responsibility
//! - Persist and fetch the store's serialized state as one named blob.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save_snapshot` replaces the whole blob for a name; there are no
//!   partial writes.
//! - Repositories treat payloads as opaque text and never inspect them.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence collaborator failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Backend refused the operation (quota exceeded, read-only medium).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named state snapshots.
pub trait SnapshotRepository {
    fn load_snapshot(&self, name: &str) -> RepoResult<Option<String>>;
    fn save_snapshot(&self, name: &str, payload: &str) -> RepoResult<()>;
}

impl<T: SnapshotRepository + ?Sized> SnapshotRepository for &T {
    fn load_snapshot(&self, name: &str) -> RepoResult<Option<String>> {
        (**self).load_snapshot(name)
    }

    fn save_snapshot(&self, name: &str, payload: &str) -> RepoResult<()> {
        (**self).save_snapshot(name, payload)
    }
}

/// SQLite-backed snapshot repository over the `snapshots` table.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_snapshot(&self, name: &str) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE name = ?1;",
                [name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_snapshot(&self, name: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (name, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![name, payload],
        )?;
        Ok(())
    }
}

/// In-process snapshot repository.
///
/// Counts successful saves so callers can observe write amplification.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    blobs: RefCell<BTreeMap<String, String>>,
    saves: Cell<usize>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one blob.
    pub fn with_snapshot(name: impl Into<String>, payload: impl Into<String>) -> Self {
        let repo = Self::default();
        repo.blobs.borrow_mut().insert(name.into(), payload.into());
        repo
    }

    /// Returns the current blob for a name.
    pub fn snapshot(&self, name: &str) -> Option<String> {
        self.blobs.borrow().get(name).cloned()
    }

    /// Number of successful `save_snapshot` calls.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn load_snapshot(&self, name: &str) -> RepoResult<Option<String>> {
        Ok(self.snapshot(name))
    }

    fn save_snapshot(&self, name: &str, payload: &str) -> RepoResult<()> {
        self.blobs
            .borrow_mut()
            .insert(name.to_string(), payload.to_string());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MemorySnapshotRepository, SnapshotRepository};

    #[test]
    fn memory_repository_replaces_blob_and_counts_saves() {
        let repo = MemorySnapshotRepository::new();
        assert_eq!(repo.load_snapshot("calendar-storage").unwrap(), None);

        repo.save_snapshot("calendar-storage", "{}").unwrap();
        repo.save_snapshot("calendar-storage", "{\"state\":{}}").unwrap();

        assert_eq!(
            repo.load_snapshot("calendar-storage").unwrap().as_deref(),
            Some("{\"state\":{}}")
        );
        assert_eq!(repo.save_count(), 2);
    }

    #[test]
    fn borrowed_repository_delegates() {
        let repo = MemorySnapshotRepository::with_snapshot("a", "1");
        let borrowed = &repo;
        assert_eq!(borrowed.load_snapshot("a").unwrap().as_deref(), Some("1"));
    }
}
