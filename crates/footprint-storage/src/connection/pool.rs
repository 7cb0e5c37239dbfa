//! ReadPool: read-only connections shared by ranking and score lookups.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use footprint_core::errors::StorageError;
use rusqlite::{Connection, OpenFlags};

use super::pragmas::apply_read_pragmas;

const MAX_READERS: usize = 8;

/// Read-only connections handed out starting from a rotating cursor.
/// An idle connection is preferred; when all are busy the caller waits on
/// the one under the cursor.
pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers on `path`, clamped to `1..=8`.
    pub fn open(path: &Path, size: usize) -> Result<Self, StorageError> {
        let readers = (0..size.clamp(1, MAX_READERS))
            .map(|_| open_reader(path).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.acquire()?;
        f(&guard)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        let n = self.readers.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % n;
        for offset in 0..n {
            match self.readers[(start + offset) % n].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }
        self.readers[start].lock().map_err(|_| poisoned())
    }
}

fn open_reader(path: &Path) -> Result<Connection, StorageError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(StorageError::sqlite)?;
    apply_read_pragmas(&conn)?;
    Ok(conn)
}

fn poisoned() -> StorageError {
    StorageError::LockPoisoned {
        what: "read pool".to_string(),
    }
}
