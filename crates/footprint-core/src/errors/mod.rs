//! Error handling for Footprint.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod engine_error;
pub mod error_code;
pub mod request_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use engine_error::EngineError;
pub use error_code::FootprintErrorCode;
pub use request_error::RequestError;
pub use storage_error::StorageError;
