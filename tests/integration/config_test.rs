use resmon::core::config::{AppConfig, DEFAULT_HISTORY_LENGTH, DEFAULT_UPDATE_INTERVAL_MS};
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = AppConfig::default();
    assert_eq!(config.update_interval_ms, 1000);
    assert_eq!(config.history_length, 60);
    assert_eq!(config.cpu_threshold, 90);
    assert_eq!(config.ram_threshold, 90);
}

#[test]
fn test_config_load_missing_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = AppConfig::load(&temp_dir.path().join("nope.json"));
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = AppConfig {
        update_interval_ms: 250,
        history_length: 120,
        cpu_threshold: 75,
        ram_threshold: 80,
    };
    config.save(&path).unwrap();

    assert_eq!(AppConfig::load(&path), config);
}

#[test]
fn test_config_corrupt_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    std::fs::write(&path, "{ this is not json").unwrap();
    assert_eq!(AppConfig::load(&path), AppConfig::default());

    std::fs::write(&path, "[1, 2, 3]").unwrap();
    assert_eq!(AppConfig::load(&path), AppConfig::default());
}

#[test]
fn test_config_partial_and_invalid_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"cpu_threshold": 70, "ram_threshold": "high", "update_interval_ms": 0, "extra": true}"#,
    )
    .unwrap();

    let config = AppConfig::load(&path);
    assert_eq!(config.cpu_threshold, 70);
    assert_eq!(config.ram_threshold, 90);
    assert_eq!(config.update_interval_ms, DEFAULT_UPDATE_INTERVAL_MS);
    assert_eq!(config.history_length, DEFAULT_HISTORY_LENGTH);
}

#[test]
fn test_config_set_validates() {
    let mut config = AppConfig::default();
    config.set("history_length", "30").unwrap();
    assert_eq!(config.history_length, 30);

    assert!(config.set("history_length", "0").is_err());
    assert!(config.set("cpu_threshold", "lots").is_err());
    assert!(config.set("colour", "1").is_err());
    assert_eq!(config.history_length, 30);
}
