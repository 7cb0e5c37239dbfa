//! Tests for the Footprint configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use footprint_core::config::{CliOverrides, FootprintConfig, WhatToRemember};
use footprint_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all FOOTPRINT_ env vars and point HOME at an empty directory
/// so a real user config can't leak into the tests.
fn isolate_env(home: &std::path::Path) {
    for key in [
        "FOOTPRINT_SCORING_DECAY_DAYS",
        "FOOTPRINT_SCORING_MIN_INTERVAL_SECS",
        "FOOTPRINT_MAINTAINER_POLL_INTERVAL_MS",
        "FOOTPRINT_RANKINGS_RESULT_LIMIT",
        "FOOTPRINT_INGEST_WHAT_TO_REMEMBER",
        "FOOTPRINT_RETENTION_KEEP_HISTORY_MONTHS",
        "FOOTPRINT_STORAGE_DATABASE_PATH",
    ] {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", home);
    std::env::remove_var("USERPROFILE");
}

#[test]
fn test_defaults_when_no_files() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    let config = FootprintConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.scoring.effective_decay_days(), 32.0);
    assert_eq!(config.scoring.effective_min_interval_secs(), 4);
    assert_eq!(config.maintainer.effective_poll_interval().as_millis(), 5000);
    assert_eq!(config.rankings.effective_result_limit(), 30);
    assert_eq!(config.retention.effective_keep_history_months(), 0);
    assert!(config.storage.database_path.is_none());
    assert_eq!(
        config.ingest.effective_what_to_remember(),
        WhatToRemember::AllApplications
    );
    assert_eq!(
        config.ingest.effective_blocked_patterns(),
        vec!["about:*", "*/.*", "/", "/tmp/*"]
    );
}

#[test]
fn test_four_layer_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::fs::create_dir_all(home.path().join(".footprint")).unwrap();
    std::fs::write(
        home.path().join(".footprint").join("config.toml"),
        r#"
[scoring]
decay_days = 10.0
min_interval_secs = 8

[rankings]
result_limit = 5
"#,
    )
    .unwrap();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("footprint.toml"),
        r#"
[scoring]
decay_days = 20.0

[rankings]
result_limit = 10
"#,
    )
    .unwrap();

    std::env::set_var("FOOTPRINT_RANKINGS_RESULT_LIMIT", "15");

    let cli = CliOverrides {
        database_path: Some(PathBuf::from("/var/lib/footprint.sqlite")),
        ..Default::default()
    };
    let config = FootprintConfig::load(dir.path(), Some(&cli)).unwrap();

    // User layer survives where nothing overrides it.
    assert_eq!(config.scoring.min_interval_secs, Some(8));
    // Project beats user.
    assert_eq!(config.scoring.decay_days, Some(20.0));
    // Env beats project.
    assert_eq!(config.rankings.result_limit, Some(15));
    // CLI applied.
    assert_eq!(
        config.storage.database_path,
        Some(PathBuf::from("/var/lib/footprint.sqlite"))
    );

    std::env::remove_var("FOOTPRINT_RANKINGS_RESULT_LIMIT");
}

#[test]
fn test_cli_beats_env() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    std::env::set_var("FOOTPRINT_MAINTAINER_POLL_INTERVAL_MS", "250");
    let cli = CliOverrides {
        poll_interval_ms: Some(50),
        ..Default::default()
    };
    let dir = tempdir();
    let config = FootprintConfig::load(dir.path(), Some(&cli)).unwrap();
    assert_eq!(config.maintainer.poll_interval_ms, Some(50));

    std::env::remove_var("FOOTPRINT_MAINTAINER_POLL_INTERVAL_MS");
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(dir.path().join("footprint.toml"), "not = valid = toml").unwrap();

    match FootprintConfig::load(dir.path(), None) {
        Err(ConfigError::ParseError { .. }) => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_invalid_values() {
    let _lock = ENV_MUTEX.lock().unwrap();
    let home = tempdir();
    isolate_env(home.path());

    let dir = tempdir();
    std::fs::write(
        dir.path().join("footprint.toml"),
        r#"
[scoring]
decay_days = 0.0
"#,
    )
    .unwrap();

    match FootprintConfig::load(dir.path(), None) {
        Err(ConfigError::ValidationFailed { field, .. }) => {
            assert_eq!(field, "scoring.decay_days");
        }
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_unrecognized_keys_accepted() {
    let config = FootprintConfig::from_toml(
        r#"
[scoring]
decay_days = 16.0
future_key = "x"

[future_section]
value = 1
"#,
    )
    .unwrap();
    assert_eq!(config.scoring.effective_decay_days(), 16.0);
}

#[test]
fn test_ingest_section() {
    let config = FootprintConfig::from_toml(
        r#"
[ingest]
what_to_remember = "specific_applications"
applications = ["firefox", "okular"]
blocked_by_default = true
blocked_patterns = []
off_the_record_activities = ["private"]
"#,
    )
    .unwrap();

    assert_eq!(
        config.ingest.effective_what_to_remember(),
        WhatToRemember::SpecificApplications
    );
    assert!(config.ingest.effective_blocked_by_default());
    assert!(config.ingest.effective_blocked_patterns().is_empty());
    assert_eq!(config.ingest.applications, vec!["firefox", "okular"]);
    assert_eq!(config.ingest.off_the_record_activities, vec!["private"]);
}

#[test]
fn test_toml_round_trip() {
    let mut config = FootprintConfig::default();
    config.scoring.decay_days = Some(12.5);
    config.retention.keep_history_months = Some(6);

    let text = config.to_toml().unwrap();
    let back = FootprintConfig::from_toml(&text).unwrap();
    assert_eq!(back.scoring.decay_days, Some(12.5));
    assert_eq!(back.retention.keep_history_months, Some(6));
}
