// Config loading and validation tests

use eventcount::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8000
host = "127.0.0.1"

[database]
path = "data/events.db"
max_pool_size = 5

[ingest]
flush_threshold = 1000
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.database.path, "data/events.db");
    assert_eq!(config.database.max_pool_size, 5);
    assert_eq!(config.ingest.flush_threshold, 1000);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("").expect("empty config uses defaults");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.database.path, "database.db");
    assert_eq!(config.ingest.flush_threshold, 1000);
}

#[test]
fn test_config_partial_section_keeps_other_defaults() {
    let config = AppConfig::load_from_str("[ingest]\nflush_threshold = 25\n").expect("partial");
    assert_eq!(config.ingest.flush_threshold, 25);
    assert_eq!(config.database.path, "database.db");
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8000", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_db_path() {
    let bad = VALID_CONFIG.replace("path = \"data/events.db\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_config_validation_rejects_max_pool_size_zero() {
    let bad = VALID_CONFIG.replace("max_pool_size = 5", "max_pool_size = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_pool_size"));
}

#[test]
fn test_config_validation_rejects_flush_threshold_zero() {
    let bad = VALID_CONFIG.replace("flush_threshold = 1000", "flush_threshold = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("flush_threshold"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

// One test covers both CONFIG_FILE cases; the env var is process-global and
// parallel tests would race on it.
#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::set_var("CONFIG_FILE", "/nonexistent/eventcount.toml") };
    let missing = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };

    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.database.path, "data/events.db");

    // An explicitly named config file must exist.
    let err = missing.unwrap_err();
    assert!(err.to_string().contains("config file"));
}
