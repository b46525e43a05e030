//! Reporting and ingestion racing against configuration toggles.

use super::test_utils::{enabled_api, manager, StaticProvider};
use calls_telemetry::telemetry::Properties;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_track_during_toggle_never_sees_closed_client() {
    let (manager, recorder) = manager();
    let stop = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let manager = Arc::clone(&manager);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    let mut props = Properties::new();
                    props.insert("worker".to_string(), json!(i));
                    manager.track("user_raise_hand", props);
                    let _ = manager.is_enabled();
                    let _ = manager.status();
                }
            })
        })
        .collect();

    for _ in 0..100 {
        manager.set_enabled(true, &StaticProvider).unwrap();
        manager.set_enabled(false, &StaticProvider).unwrap();
    }
    stop.store(true, Ordering::SeqCst);
    for worker in workers {
        worker.join().expect("worker panicked");
    }

    assert!(!manager.is_enabled());
    assert_eq!(
        recorder.created.load(Ordering::SeqCst),
        recorder.closed.load(Ordering::SeqCst)
    );
    assert_eq!(recorder.in_flight.load(Ordering::SeqCst), 0);
}

#[test]
fn test_concurrent_toggles_leave_single_sink() {
    let (manager, recorder) = manager();
    let togglers: Vec<_> = (0..4)
        .map(|i| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                for n in 0..50 {
                    manager.set_enabled((n + i) % 2 == 0, &StaticProvider).unwrap();
                }
            })
        })
        .collect();
    for toggler in togglers {
        toggler.join().expect("toggler panicked");
    }

    let created = recorder.created.load(Ordering::SeqCst);
    let closed = recorder.closed.load(Ordering::SeqCst);
    if manager.is_enabled() {
        assert_eq!(created, closed + 1);
    } else {
        assert_eq!(created, closed);
    }
}

#[test]
fn test_ingestion_during_toggle() {
    let (api, recorder) = enabled_api();
    let handlers: Vec<_> = (0..4)
        .map(|i| {
            let api = api.clone();
            thread::spawn(move || {
                let body = serde_json::to_vec(&json!({
                    "event": "user_share_screen",
                    "clientType": "web"
                }))
                .unwrap();
                for _ in 0..200 {
                    let response = api.handle_track_event(body.as_slice(), &format!("u{i}"));
                    if !response.is_success() {
                        assert_eq!(response.err.as_deref(), Some("telemetry is disabled"));
                    }
                }
            })
        })
        .collect();

    for _ in 0..50 {
        api.manager().disable().unwrap();
        api.manager().enable(&StaticProvider).unwrap();
    }
    for handler in handlers {
        handler.join().expect("handler panicked");
    }

    for (_, props) in recorder.events.lock().iter() {
        let user = props["ActualUserID"].as_str().unwrap();
        assert!(user.starts_with('u'));
        assert_eq!(props["ClientType"], "web");
    }
}
