//! Configuration system for Footprint.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod footprint_config;
pub mod ingest_config;
pub mod maintainer_config;
pub mod rankings_config;
pub mod retention_config;
pub mod scoring_config;
pub mod storage_config;

pub use footprint_config::{CliOverrides, FootprintConfig};
pub use ingest_config::{IngestConfig, WhatToRemember};
pub use maintainer_config::MaintainerConfig;
pub use rankings_config::RankingsConfig;
pub use retention_config::RetentionConfig;
pub use scoring_config::ScoringConfig;
pub use storage_config::StorageConfig;
