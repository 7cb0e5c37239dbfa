//! Storage-layer errors for SQLite operations.

use super::error_code::{self, FootprintErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("{what} lock poisoned")]
    LockPoisoned { what: String },
}

impl StorageError {
    /// Shorthand used by every query module.
    pub fn sqlite(e: impl std::fmt::Display) -> Self {
        Self::SqliteError {
            message: e.to_string(),
        }
    }
}

impl FootprintErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SqliteError { message } if message.contains("database is locked") => {
                error_code::DB_BUSY
            }
            Self::SqliteError { .. } | Self::LockPoisoned { .. } => error_code::STORAGE_ERROR,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
        }
    }
}
