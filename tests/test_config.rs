use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use lantern::config::{Config, ADDRESS_ENV, LOG_ENV, PORT_ENV, ROOT_ENV};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.address, "127.0.0.1");
    assert_eq!(cfg.server.port, 10000);
    assert_eq!(cfg.document_root, PathBuf::from("webroot"));
    assert_eq!(
        cfg.server.socket_addr().unwrap(),
        "127.0.0.1:10000".parse::<SocketAddr>().unwrap()
    );
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
server:
  address: 0.0.0.0
  port: 8080
  max_header_bytes: 4096
  read_timeout_secs: 5
document_root: /srv/www
log_level: debug
"#;
    let cfg = Config::from_yaml_str(yaml).unwrap();

    assert_eq!(cfg.server.address, "0.0.0.0");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.server.max_header_bytes, 4096);
    assert_eq!(cfg.server.read_timeout(), Duration::from_secs(5));
    // Missing fields keep their defaults
    assert_eq!(cfg.server.backlog, 16);
    assert_eq!(cfg.document_root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.log_level().unwrap(), tracing::Level::DEBUG);
}

#[test]
fn test_config_empty_yaml_is_default() {
    assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
    assert_eq!(Config::from_yaml_str("\n  \n").unwrap(), Config::default());
}

#[test]
fn test_config_rejects_unknown_fields() {
    assert!(Config::from_yaml_str("documnet_root: typo\n").is_err());
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lantern.yaml");
    std::fs::write(&path, "server:\n  port: 9000\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.server.port, 9000);

    assert!(Config::from_file(&dir.path().join("missing.yaml")).is_err());
}

#[test]
fn test_config_env_overrides() {
    let mut cfg = Config::default();
    cfg.apply_overrides(env(&[
        (ADDRESS_ENV, "::1"),
        (PORT_ENV, "3000"),
        (ROOT_ENV, "public"),
        (LOG_ENV, "warn"),
    ]))
    .unwrap();

    assert_eq!(
        cfg.server.socket_addr().unwrap(),
        "[::1]:3000".parse::<SocketAddr>().unwrap()
    );
    assert_eq!(cfg.document_root, PathBuf::from("public"));
    assert_eq!(cfg.log_level().unwrap(), tracing::Level::WARN);
}

#[test]
fn test_config_no_overrides_leaves_values() {
    let mut cfg = Config::default();
    cfg.apply_overrides(env(&[])).unwrap();

    assert_eq!(cfg, Config::default());
}

#[test]
fn test_config_invalid_port_override() {
    let mut cfg = Config::default();

    assert!(cfg.apply_overrides(env(&[(PORT_ENV, "70000")])).is_err());
    assert!(cfg.apply_overrides(env(&[(PORT_ENV, "http")])).is_err());
}

#[test]
fn test_config_validation_failures() {
    let mut cfg = Config::default();
    cfg.server.address = "localhost".to_string();
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.log_level = "loud".to_string();
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.server.backlog = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.server.max_header_bytes = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.server.read_timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1, cfg2);
}
