//! Tests for configuration validation

use std::collections::HashMap;

use prometheus_scrobble_queue::config::{AuthMethod, QueueConfig, ScrobblerConfig, ServerConfig};

fn valid_server() -> ServerConfig {
    ServerConfig::new("https://music.example.org", "alice", "sesame")
}

#[test]
fn test_queue_config_default() {
    let cfg = QueueConfig::default();
    assert_eq!(cfg.max_concurrent_requests, 3);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.limits().max_concurrent_requests, 3);
}

#[test]
fn test_queue_config_invalid_limit() {
    let cfg = QueueConfig {
        max_concurrent_requests: 0,
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_server_config_validation() {
    assert!(valid_server().validate().is_ok());
}

#[test]
fn test_server_config_invalid_scheme() {
    let cfg = ServerConfig::new("music.example.org", "alice", "sesame");
    assert!(cfg.validate().is_err());
}

#[test]
fn test_server_config_missing_credentials() {
    assert!(ServerConfig::new("https://h", "", "sesame").validate().is_err());
    assert!(ServerConfig::new("https://h", "alice", "").validate().is_err());
}

#[test]
fn test_server_config_invalid_timeout() {
    let mut cfg = valid_server();
    cfg.request_timeout_secs = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scrobbler_config_from_json_defaults() {
    let json = r#"{
        "server": {
            "server_url": "https://music.example.org",
            "username": "alice",
            "password": "sesame"
        }
    }"#;

    let cfg = ScrobblerConfig::from_json_str(json).expect("valid config");
    assert_eq!(cfg.queue.max_concurrent_requests, 3);
    assert_eq!(cfg.server.auth_method, AuthMethod::Hex);
    assert_eq!(cfg.server.api_version, "1.13.0");
    assert_eq!(cfg.server.request_timeout_secs, 30);
    assert!(cfg.server.verify_tls);
}

#[test]
fn test_scrobbler_config_from_json_overrides() {
    let json = r#"{
        "queue": { "max_concurrent_requests": 5 },
        "server": {
            "server_url": "http://localhost:4533",
            "username": "alice",
            "password": "sesame",
            "auth_method": "plain",
            "verify_tls": false
        }
    }"#;

    let cfg = ScrobblerConfig::from_json_str(json).expect("valid config");
    assert_eq!(cfg.queue.max_concurrent_requests, 5);
    assert_eq!(cfg.server.auth_method, AuthMethod::Plain);
    assert!(!cfg.server.verify_tls);
}

#[test]
fn test_scrobbler_config_from_json_rejects_invalid() {
    let json = r#"{
        "queue": { "max_concurrent_requests": 0 },
        "server": { "server_url": "https://h", "username": "a", "password": "b" }
    }"#;
    let err = ScrobblerConfig::from_json_str(json).unwrap_err();
    assert!(err.starts_with("queue invalid"));

    assert!(ScrobblerConfig::from_json_str("{not json").is_err());
}

#[test]
fn test_scrobbler_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("SUBSONIC_URL", "https://music.example.org"),
        ("SUBSONIC_USERNAME", "alice"),
        ("SUBSONIC_PASSWORD", "sesame"),
        ("SUBSONIC_AUTH_METHOD", "PLAIN"),
        ("SCROBBLE_MAX_CONCURRENT", "4"),
    ]
    .into_iter()
    .collect();

    let cfg = ScrobblerConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string()))
        .expect("valid env");
    assert_eq!(cfg.server.username, "alice");
    assert_eq!(cfg.server.auth_method, AuthMethod::Plain);
    assert_eq!(cfg.queue.max_concurrent_requests, 4);
}

#[test]
fn test_scrobbler_config_from_lookup_missing_var() {
    let err = ScrobblerConfig::from_lookup(|k| {
        (k == "SUBSONIC_URL").then(|| "https://h".to_string())
    })
    .unwrap_err();
    assert_eq!(err, "SUBSONIC_USERNAME is not set");
}

#[test]
fn test_scrobbler_config_from_lookup_bad_limit() {
    let err = ScrobblerConfig::from_lookup(|k| match k {
        "SUBSONIC_URL" => Some("https://h".into()),
        "SUBSONIC_USERNAME" => Some("a".into()),
        "SUBSONIC_PASSWORD" => Some("b".into()),
        "SCROBBLE_MAX_CONCURRENT" => Some("many".into()),
        _ => None,
    })
    .unwrap_err();
    assert!(err.contains("SCROBBLE_MAX_CONCURRENT"));
}

#[test]
fn test_auth_method_parse() {
    assert_eq!("hex".parse::<AuthMethod>(), Ok(AuthMethod::Hex));
    assert_eq!(" Token ".parse::<AuthMethod>(), Ok(AuthMethod::Token));
    assert!("md5".parse::<AuthMethod>().is_err());
}

#[test]
fn test_token_auth_from_json() {
    let cfg = ScrobblerConfig::from_json_str(
        r#"{
            "server": {
                "server_url": "https://music.example.org",
                "username": "alice",
                "password": "sesame",
                "auth_method": "token"
            }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.server.auth_method, AuthMethod::Token);
}
