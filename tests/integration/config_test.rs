use std::fs;

use resmon::core::config::Config;
use resmon::core::system_monitor::{AlertMetric, ProcessSort};
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("config.json"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_corrupt_or_empty_file_gives_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    fs::write(&path, "{ not json").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());

    fs::write(&path, "").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.set("thresholds.cpu", "70").unwrap();
    config.set("update_interval", "5").unwrap();
    config.set("process_sort", "memory").unwrap();
    config.set("theme", "light").unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path);
    assert_eq!(loaded, config);
    assert_eq!(loaded.thresholds.get(AlertMetric::Cpu), 70.0);
    assert_eq!(loaded.update_interval, 5);
    assert_eq!(loaded.process_sort, ProcessSort::Memory);
    assert_eq!(loaded.theme, "light");
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"thresholds": {"battery": 25}, "unknown_key": 1, "alert_enabled": false}"#,
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert!(!config.alert_enabled);
    assert_eq!(config.thresholds.battery, 25.0);
    assert_eq!(config.thresholds.cpu, 85.0);
    assert_eq!(config.alert_cooldown, 300);
    assert_eq!(config.history_size, 60);
}

#[test]
fn test_out_of_range_values_are_normalized_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{"update_interval": 0, "history_size": 0}"#).unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.update_interval, 1);
    assert_eq!(config.history_size, 1);

    fs::write(&path, r#"{"update_interval": 3600}"#).unwrap();
    assert_eq!(Config::load_from(&path).update_interval, 60);
}

#[test]
fn test_evaluator_uses_configured_thresholds() {
    let mut config = Config::default();
    config.set("thresholds.memory", "50").unwrap();
    config.set("alert_cooldown", "10").unwrap();

    let evaluator = config.alert_evaluator();
    assert_eq!(evaluator.threshold(AlertMetric::Memory), 50.0);
    assert_eq!(evaluator.cooldown_secs(), 10);
}
