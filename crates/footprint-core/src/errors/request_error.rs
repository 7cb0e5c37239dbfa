//! Errors returned to clients of the exposed request API
//! (purges, linking, registration).

use super::error_code::{self, FootprintErrorCode};
use super::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Unknown activity: {activity}")]
    UnknownActivity { activity: String },

    #[error("Invalid time unit {unit:?}, expected one of h, d, m, everything")]
    InvalidTimeUnit { unit: String },

    #[error("Invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl FootprintErrorCode for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActivity { .. } => error_code::UNKNOWN_ACTIVITY,
            Self::InvalidTimeUnit { .. } | Self::InvalidArgument { .. } => {
                error_code::INVALID_ARGUMENT
            }
            Self::Storage(e) => e.error_code(),
        }
    }
}
