//! Config file and environment overrides

use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

use sidekick::commands::CommandContext;
use sidekick::config::{SidekickConfig, HOME_ENV};
use sidekick::Sidekick;

#[test]
#[serial]
fn test_home_env_overrides_config_file() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("sidekick.toml");
    fs::write(
        &config_path,
        format!(
            "storage_dir = \"{}\"\nmin_confidence = 0.8\nretention_days = 3\n",
            temp.path().join("from-file").display()
        ),
    )
    .unwrap();

    let home = temp.path().join("from-env");
    env::set_var(HOME_ENV, &home);
    let ctx = CommandContext::load(Some(config_path), false);
    env::remove_var(HOME_ENV);

    let ctx = ctx.unwrap();
    assert_eq!(ctx.config.storage_dir, home);
    assert_eq!(ctx.config.min_confidence, 0.8);
    assert_eq!(ctx.config.retention_days, 3);

    let sidekick = ctx.open().unwrap();
    assert_eq!(sidekick.storage_dir(), home.as_path());
    assert!(home.join("history").is_dir());
}

#[test]
#[serial]
fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("sidekick.toml");
    fs::write(&config_path, "min_confidence = 1.5\n").unwrap();

    env::remove_var(HOME_ENV);
    let err = CommandContext::load(Some(config_path), true).unwrap_err();
    assert!(err.to_string().contains("min_confidence"));
}

#[test]
#[serial]
fn test_open_loads_persisted_patterns() {
    let temp = TempDir::new().unwrap();
    env::remove_var(HOME_ENV);
    let config = SidekickConfig {
        storage_dir: temp.path().join("store"),
        ..SidekickConfig::default()
    };

    let first = Sidekick::open(&config).unwrap();
    first
        .track_event("s1", "Proceed? (y/n)", "y", true, "user_typed", 10)
        .unwrap();
    drop(first);

    let second = Sidekick::open(&config).unwrap();
    let list = second.get_patterns(None, 1, "last_seen").unwrap();
    assert_eq!(list.total_patterns, 1);

    let without_load = Sidekick::open(&SidekickConfig {
        auto_load_patterns: false,
        ..config
    })
    .unwrap();
    assert_eq!(
        without_load
            .get_patterns(None, 1, "occurrences")
            .unwrap()
            .total_patterns,
        0
    );
}
