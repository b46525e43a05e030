//! Sink lifecycle: enable, disable, failure handling, re-enable.

use super::test_utils::{manager, StaticProvider};
use calls_telemetry::error::ConfigurationError;
use calls_telemetry::telemetry::{Properties, SinkConfigProvider};
use std::sync::atomic::Ordering;

struct MissingWriteKey;

impl SinkConfigProvider for MissingWriteKey {
    fn write_key(&self) -> String {
        String::new()
    }
    fn dataplane_url(&self) -> String {
        "https://dataplane.example.com".to_string()
    }
    fn diagnostic_id(&self) -> String {
        "diag-1".to_string()
    }
    fn server_version(&self) -> String {
        "9.0.0".to_string()
    }
    fn plugin_version(&self) -> String {
        "1.1.0".to_string()
    }
    fn build_hash(&self) -> String {
        String::new()
    }
}

#[test]
fn test_enable_disable_round_trip() {
    let (manager, _recorder) = manager();
    manager.set_enabled(true, &StaticProvider).unwrap();
    assert!(manager.is_enabled());
    manager.set_enabled(false, &StaticProvider).unwrap();
    assert!(!manager.is_enabled());
}

#[test]
fn test_idempotent_transitions() {
    let (manager, recorder) = manager();
    manager.set_enabled(true, &StaticProvider).unwrap();
    manager.set_enabled(true, &StaticProvider).unwrap();
    assert_eq!(recorder.created.load(Ordering::SeqCst), 1);

    manager.set_enabled(false, &StaticProvider).unwrap();
    manager.set_enabled(false, &StaticProvider).unwrap();
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invalid_config_aborts_enable() {
    let (manager, recorder) = manager();
    let err = manager.set_enabled(true, &MissingWriteKey).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidClientConfig(_)));
    assert!(!manager.is_enabled());
    assert_eq!(recorder.created.load(Ordering::SeqCst), 0);
}

#[test]
fn test_close_failure_discards_handle_and_allows_reenable() {
    let (manager, recorder) = manager();
    manager.enable(&StaticProvider).unwrap();
    recorder.fail_close.store(true, Ordering::SeqCst);

    assert!(matches!(
        manager.disable(),
        Err(ConfigurationError::ClientClose(_))
    ));
    assert!(!manager.is_enabled());

    manager.track("user_raise_hand", Properties::new());
    assert_eq!(recorder.event_count(), 0);

    recorder.fail_close.store(false, Ordering::SeqCst);
    manager.enable(&StaticProvider).unwrap();
    manager.track("user_raise_hand", Properties::new());
    assert_eq!(recorder.event_count(), 1);
}

#[test]
fn test_many_recreations() {
    let (manager, recorder) = manager();
    for _ in 0..20 {
        manager.enable(&StaticProvider).unwrap();
        manager.track("user_share_screen", Properties::new());
        manager.disable().unwrap();
    }
    assert_eq!(recorder.created.load(Ordering::SeqCst), 20);
    assert_eq!(recorder.closed.load(Ordering::SeqCst), 20);
    assert_eq!(recorder.event_count(), 20);
}
