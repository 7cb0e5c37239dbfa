//! Database location and pool sizing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file. Unset means an in-memory database.
    pub database_path: Option<PathBuf>,
    /// Number of read-only connections for file-backed databases. Default: 4.
    pub read_pool_size: Option<usize>,
}

impl StorageConfig {
    pub fn effective_read_pool_size(&self) -> usize {
        self.read_pool_size.unwrap_or(4)
    }
}
