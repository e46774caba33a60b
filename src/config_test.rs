// Unit tests for scenario configuration loading

use super::*;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_defaults_match_live_campaign() {
    let config = ScenarioConfig::default();
    assert_eq!(config.contact, "+60 3-9771 1660");
    assert_eq!(config.trigger_message, "kuhentest");
    assert_eq!(config.user_name, "Atika");
    assert_eq!(config.invalid_names.len(), 3);
    assert_eq!(config.receipt_path, PathBuf::from("fixtures/receipt.jpg"));
    assert_eq!(config.timeouts.qr_scan_secs, 120);
    assert_eq!(config.timeouts.button_wait_secs, 60);
    assert_eq!(config.timeouts.max_poll_attempts, 30);
}

#[test]
fn test_duration_helpers() {
    let timeouts = Timeouts::default();
    assert_eq!(timeouts.qr_scan(), Duration::from_secs(120));
    assert_eq!(timeouts.login_wait(), Duration::from_secs(30));
    assert_eq!(timeouts.button_wait(), Duration::from_secs(60));
    assert_eq!(timeouts.message_delay(), Duration::from_secs(3));
    assert_eq!(timeouts.error_delay(), Duration::from_secs(5));
    assert_eq!(timeouts.receipt_upload(), Duration::from_secs(15));
    assert_eq!(timeouts.probe(), Duration::from_secs(10));
    assert_eq!(timeouts.overall(), Duration::from_secs(30));
    assert_eq!(timeouts.poll_interval(), Duration::from_secs(1));
}

#[test]
fn test_partial_file_fills_gaps_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"contact": "+1 555 0100", "timeouts": {{"qr_scan_secs": 10}}}}"#
    )
    .unwrap();

    let config = ScenarioConfig::load(file.path()).unwrap();
    assert_eq!(config.contact, "+1 555 0100");
    assert_eq!(config.timeouts.qr_scan_secs, 10);
    // Untouched fields keep their defaults
    assert_eq!(config.trigger_message, "kuhentest");
    assert_eq!(config.timeouts.button_wait_secs, 60);
}

#[test]
fn test_full_override() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "contact": "+44 20 7946 0000",
            "trigger_message": "start",
            "user_name": "Sam",
            "agent_message": "Help please",
            "invalid_names": ["!!"],
            "receipt_path": "/tmp/receipt.png",
            "timeouts": {{"poll_interval_secs": 2, "max_poll_attempts": 5}}
        }}"#
    )
    .unwrap();

    let config = ScenarioConfig::load(file.path()).unwrap();
    assert_eq!(config.user_name, "Sam");
    assert_eq!(config.invalid_names, vec!["!!".to_string()]);
    assert_eq!(config.receipt_path, PathBuf::from("/tmp/receipt.png"));
    assert_eq!(config.timeouts.poll_interval_secs, 2);
    assert_eq!(config.timeouts.max_poll_attempts, 5);
}

#[test]
fn test_missing_file_errors_with_path() {
    let err = ScenarioConfig::load(Path::new("/nonexistent/scenario.json")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/scenario.json"));
}

#[test]
fn test_invalid_json_errors_with_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    let err = ScenarioConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid config file"));
}

#[test]
fn test_load_or_default() {
    let config = ScenarioConfig::load_or_default(None).unwrap();
    assert_eq!(config.contact, ScenarioConfig::default().contact);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ScenarioConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: ScenarioConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.contact, config.contact);
    assert_eq!(back.timeouts.max_poll_attempts, config.timeouts.max_poll_attempts);
}
