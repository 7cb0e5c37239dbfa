/// Footprint system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Seconds in a day, used for fractional day arithmetic.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Decay time constant in days: `timeFactor = e^(-days / 32)`.
pub const DEFAULT_DECAY_DAYS: f64 = 32.0;

/// Intervals shorter than this (but non-zero) are treated as noise.
pub const DEFAULT_MIN_INTERVAL_SECS: i64 = 4;

/// Sentinel stored in `lastUpdate` for a score row that was never computed.
pub const NEVER_UPDATED: i64 = -1;

/// Default poll interval of the background score maintainer.
pub const DEFAULT_MAINTAINER_POLL_MS: u64 = 5_000;

/// Default number of entries in a full-replace ranking snapshot.
pub const DEFAULT_RESULT_LIMIT: usize = 30;

/// Reserved filter tokens.
pub const TOKEN_ANY: &str = ":any";
pub const TOKEN_GLOBAL: &str = ":global";
pub const TOKEN_CURRENT: &str = ":current";

/// Blocklist patterns applied when the config doesn't name any.
pub const DEFAULT_BLOCKED_PATTERNS: &[&str] = &["about:*", "*/.*", "/", "/tmp/*"];
