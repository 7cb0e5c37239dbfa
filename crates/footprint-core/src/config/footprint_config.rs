//! Top-level Footprint configuration with 4-layer resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    IngestConfig, MaintainerConfig, RankingsConfig, RetentionConfig, ScoringConfig,
    StorageConfig, WhatToRemember,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FOOTPRINT_*`)
/// 3. Project config (`footprint.toml` in the given root)
/// 4. User config (`~/.footprint/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FootprintConfig {
    pub scoring: ScoringConfig,
    pub maintainer: MaintainerConfig,
    pub rankings: RankingsConfig,
    pub ingest: IngestConfig,
    pub retention: RetentionConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub result_limit: Option<usize>,
    pub keep_history_months: Option<u32>,
}

impl FootprintConfig {
    /// Load configuration with 4-layer resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %e,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("footprint.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &FootprintConfig) -> Result<(), ConfigError> {
        if let Some(days) = config.scoring.decay_days {
            if !(days.is_finite() && days > 0.0) {
                return Err(ConfigError::ValidationFailed {
                    field: "scoring.decay_days".to_string(),
                    message: "must be a positive number".to_string(),
                });
            }
        }
        if let Some(secs) = config.scoring.min_interval_secs {
            if secs < 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "scoring.min_interval_secs".to_string(),
                    message: "must not be negative".to_string(),
                });
            }
        }
        if config.maintainer.poll_interval_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "maintainer.poll_interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.rankings.result_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "rankings.result_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.storage.read_pool_size == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "storage.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.footprint/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut FootprintConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: FootprintConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut FootprintConfig, other: &FootprintConfig) {
        // Scoring
        if other.scoring.decay_days.is_some() {
            base.scoring.decay_days = other.scoring.decay_days;
        }
        if other.scoring.min_interval_secs.is_some() {
            base.scoring.min_interval_secs = other.scoring.min_interval_secs;
        }

        // Maintainer
        if other.maintainer.poll_interval_ms.is_some() {
            base.maintainer.poll_interval_ms = other.maintainer.poll_interval_ms;
        }

        // Rankings
        if other.rankings.result_limit.is_some() {
            base.rankings.result_limit = other.rankings.result_limit;
        }

        // Ingest
        if other.ingest.what_to_remember.is_some() {
            base.ingest.what_to_remember = other.ingest.what_to_remember;
        }
        if !other.ingest.applications.is_empty() {
            base.ingest.applications = other.ingest.applications.clone();
        }
        if other.ingest.blocked_by_default.is_some() {
            base.ingest.blocked_by_default = other.ingest.blocked_by_default;
        }
        if other.ingest.blocked_patterns.is_some() {
            base.ingest.blocked_patterns = other.ingest.blocked_patterns.clone();
        }
        if !other.ingest.off_the_record_activities.is_empty() {
            base.ingest.off_the_record_activities =
                other.ingest.off_the_record_activities.clone();
        }

        // Retention
        if other.retention.keep_history_months.is_some() {
            base.retention.keep_history_months = other.retention.keep_history_months;
        }

        // Storage
        if other.storage.database_path.is_some() {
            base.storage.database_path = other.storage.database_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `FOOTPRINT_SCORING_DECAY_DAYS`, `FOOTPRINT_STORAGE_DATABASE_PATH`, etc.
    fn apply_env_overrides(config: &mut FootprintConfig) {
        if let Ok(val) = std::env::var("FOOTPRINT_SCORING_DECAY_DAYS") {
            if let Ok(v) = val.parse::<f64>() {
                config.scoring.decay_days = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_SCORING_MIN_INTERVAL_SECS") {
            if let Ok(v) = val.parse::<i64>() {
                config.scoring.min_interval_secs = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_MAINTAINER_POLL_INTERVAL_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.maintainer.poll_interval_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_RANKINGS_RESULT_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                config.rankings.result_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_INGEST_WHAT_TO_REMEMBER") {
            let mode = match val.as_str() {
                "all_applications" => Some(WhatToRemember::AllApplications),
                "specific_applications" => Some(WhatToRemember::SpecificApplications),
                "no_applications" => Some(WhatToRemember::NoApplications),
                _ => None,
            };
            if mode.is_some() {
                config.ingest.what_to_remember = mode;
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_RETENTION_KEEP_HISTORY_MONTHS") {
            if let Ok(v) = val.parse::<u32>() {
                config.retention.keep_history_months = Some(v);
            }
        }
        if let Ok(val) = std::env::var("FOOTPRINT_STORAGE_DATABASE_PATH") {
            if !val.is_empty() {
                config.storage.database_path = Some(PathBuf::from(val));
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut FootprintConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.database_path {
            config.storage.database_path = Some(v.clone());
        }
        if let Some(v) = cli.poll_interval_ms {
            config.maintainer.poll_interval_ms = Some(v);
        }
        if let Some(v) = cli.result_limit {
            config.rankings.result_limit = Some(v);
        }
        if let Some(v) = cli.keep_history_months {
            config.retention.keep_history_months = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Returns the user-level config directory: `~/.footprint/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".footprint"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
