//! Tests for the error log

use prometheus_scrobble_queue::core::{ErrorLog, ErrorSink};
use serde_json::json;

#[test]
fn test_error_log_keeps_order() {
    let mut log = ErrorLog::new();
    log.record("first (1)", None);
    log.record("second", Some(&json!({"code": 70})));
    log.record("third (3)", None);

    assert_eq!(log.len(), 3);
    assert_eq!(log.messages(), ["first (1)", "second", "third (3)"]);
    assert_eq!(log.last(), Some("third (3)"));
}

#[test]
fn test_error_log_skips_empty_messages() {
    let mut log = ErrorLog::default();
    log.record("", Some(&json!({"error": "oops"})));
    assert!(log.is_empty());
    assert_eq!(log.last(), None);
}
