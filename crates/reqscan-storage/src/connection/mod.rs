//! Connection management: one serialized writer, one reader.

pub mod pragmas;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags};

use reqscan_core::errors::StorageError;

use self::pragmas::{apply_pragmas, apply_read_pragmas};
use crate::migrations;
use crate::to_storage_err;

/// Owns the database connections. In-memory databases cannot be shared
/// between connections, so reads go through the writer there.
pub struct DatabaseManager {
    writer: Mutex<Connection>,
    reader: Option<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl DatabaseManager {
    /// Open a database at `path`, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let writer = Connection::open(path).map_err(to_storage_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;

        let reader = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(to_storage_err)?;
        apply_read_pragmas(&reader)?;

        tracing::debug!(path = %path.display(), "database opened");
        Ok(Self {
            writer: Mutex::new(writer),
            reader: Some(Mutex::new(reader)),
            path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let writer = Connection::open_in_memory().map_err(to_storage_err)?;
        apply_pragmas(&writer)?;
        migrations::run_migrations(&writer)?;
        Ok(Self {
            writer: Mutex::new(writer),
            reader: None,
            path: None,
        })
    }

    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.writer.lock().map_err(|_| StorageError::LockPoisoned {
            what: "writer connection".to_string(),
        })?;
        f(&guard)
    }

    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        match &self.reader {
            Some(reader) => {
                let guard = reader.lock().map_err(|_| StorageError::LockPoisoned {
                    what: "reader connection".to_string(),
                })?;
                f(&guard)
            }
            None => self.with_writer(f),
        }
    }

    /// Database file path; `None` for in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
