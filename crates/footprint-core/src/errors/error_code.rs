//! FootprintErrorCode trait for transport-level error reporting.

/// Trait for converting Footprint errors to stable error code strings.
/// Transports (D-Bus, IPC, CLI) surface the code next to the message.
pub trait FootprintErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const DB_BUSY: &str = "DB_BUSY";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const UNKNOWN_ACTIVITY: &str = "UNKNOWN_ACTIVITY";
pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
