//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the Footprint tracing/logging system.
///
/// Reads `FOOTPRINT_LOG` for per-subsystem log levels, for example
/// `FOOTPRINT_LOG=footprint_scoring=debug,footprint_storage=warn`.
/// Falls back to `footprint=info` if unset or invalid.
///
/// Idempotent: only the first call installs the subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("FOOTPRINT_LOG")
            .unwrap_or_else(|_| EnvFilter::new("footprint=info"));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
