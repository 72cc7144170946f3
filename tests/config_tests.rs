// Config loading and validation tests

use docker_stats_exporter::config::AppConfig;
use std::io::Write;

const VALID_CONFIG: &str = r#"
[server]
port = 9100
host = "127.0.0.1"

[monitoring]
containers = ["api", "worker"]
interval_secs = 10
fetch_timeout_secs = 2
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.monitoring.containers, vec!["api", "worker"]);
    assert_eq!(config.monitoring.interval_secs, 10);
    assert_eq!(config.monitoring.fetch_timeout_secs, 2);
}

#[test]
fn test_config_empty_uses_defaults() {
    let config = AppConfig::load_from_str("").expect("defaults");
    assert_eq!(config.server.port, 8091);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(
        config.monitoring.containers,
        vec!["k6-browser", "playwright", "chrome-debug"]
    );
    assert_eq!(config.monitoring.interval_secs, 5);
    assert_eq!(config.monitoring.fetch_timeout_secs, 3);
}

#[test]
fn test_config_partial_section_fills_defaults() {
    let config = AppConfig::load_from_str("[server]\nport = 9000\n").expect("partial");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.monitoring.interval_secs, 5);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 9100", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_host() {
    let bad = VALID_CONFIG.replace("host = \"127.0.0.1\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.host"));
}

#[test]
fn test_config_validation_rejects_empty_container_list() {
    let bad = VALID_CONFIG.replace("containers = [\"api\", \"worker\"]", "containers = []");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitoring.containers"));
}

#[test]
fn test_config_validation_rejects_blank_container_name() {
    let bad = VALID_CONFIG.replace("containers = [\"api\", \"worker\"]", "containers = [\"api\", \" \"]");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("empty names"));
}

#[test]
fn test_config_validation_rejects_duplicate_container() {
    let bad = VALID_CONFIG.replace("containers = [\"api\", \"worker\"]", "containers = [\"api\", \"api\"]");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_config_validation_rejects_interval_zero() {
    let bad = VALID_CONFIG.replace("interval_secs = 10", "interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("monitoring.interval_secs"));
}

#[test]
fn test_config_validation_rejects_fetch_timeout_zero() {
    let bad = VALID_CONFIG.replace("fetch_timeout_secs = 2", "fetch_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("fetch_timeout_secs"));
}

#[test]
fn test_config_rejects_unknown_field() {
    let bad = format!("{VALID_CONFIG}\n[database]\npath = \"x\"\n");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_loads_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(VALID_CONFIG.as_bytes()).unwrap();
    let config = AppConfig::load_from_path(file.path()).expect("load_from_path");
    assert_eq!(config.monitoring.containers, vec!["api", "worker"]);
}

#[test]
fn test_config_missing_path_is_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = AppConfig::load_from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}
