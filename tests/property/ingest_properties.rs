//! Property tests for the ingestion gate.

use calls_telemetry::api::TelemetryApi;
use calls_telemetry::error::RejectionReason;
use calls_telemetry::telemetry::registry::{CLIENT_EVENTS, CLIENT_TYPES};
use calls_telemetry::telemetry::{is_recognized_client_type, is_recognized_event, TrackEventRequest};
use proptest::prelude::*;
use proptest::test_runner::{Config, TestRunner};
use std::sync::Arc;

use super::test_utils::{Recorder, RecordingFactory, StaticProvider};

fn enabled_api() -> (TelemetryApi, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let api = TelemetryApi::new(Arc::new(RecordingFactory(Arc::clone(&recorder))), 1 << 20);
    api.manager().enable(&StaticProvider).unwrap();
    (api, recorder)
}

fn known_event() -> impl Strategy<Value = String> {
    prop::sample::select(CLIENT_EVENTS.to_vec()).prop_map(str::to_string)
}

fn known_client_type() -> impl Strategy<Value = String> {
    prop::sample::select(CLIENT_TYPES.to_vec()).prop_map(str::to_string)
}

#[test]
fn test_unrecognized_event_rejected_for_any_client_type() {
    let mut runner = TestRunner::new(Config::with_cases(128));
    let (api, recorder) = enabled_api();
    runner
        .run(&("[a-z_]{0,24}", ".{0,12}"), |(event, client_type)| {
            prop_assume!(!is_recognized_event(&event));
            let request = TrackEventRequest {
                event,
                client_type,
                source: None,
                props: None,
            };
            prop_assert_eq!(
                api.gate().ingest_request(request, "u1"),
                Err(RejectionReason::UnrecognizedEvent)
            );
            Ok(())
        })
        .unwrap();
    assert_eq!(recorder.event_count(), 0);
}

#[test]
fn test_unrecognized_client_type_rejected() {
    let mut runner = TestRunner::new(Config::with_cases(128));
    let (api, recorder) = enabled_api();
    runner
        .run(&(known_event(), "[A-Za-z]{0,10}"), |(event, client_type)| {
            prop_assume!(!is_recognized_client_type(&client_type));
            let request = TrackEventRequest {
                event,
                client_type,
                source: None,
                props: None,
            };
            prop_assert_eq!(
                api.gate().ingest_request(request, "u1"),
                Err(RejectionReason::UnrecognizedClientType)
            );
            Ok(())
        })
        .unwrap();
    assert_eq!(recorder.event_count(), 0);
}

#[test]
fn test_identity_fields_always_overwritten() {
    let mut runner = TestRunner::new(Config::with_cases(64));
    let (api, recorder) = enabled_api();
    runner
        .run(
            &(known_event(), known_client_type(), ".{0,16}", "[a-z0-9]{1,26}"),
            |(event, client_type, spoofed, user_id)| {
                let body = serde_json::json!({
                    "event": event,
                    "clientType": client_type,
                    "props": {"ActualUserID": spoofed, "ClientType": spoofed}
                });
                let bytes = serde_json::to_vec(&body).unwrap();
                prop_assert!(api.handle_track_event(bytes.as_slice(), &user_id).is_success());

                let (tracked, props) = recorder.last_event().unwrap();
                prop_assert_eq!(tracked, event);
                prop_assert_eq!(props["ActualUserID"].as_str(), Some(user_id.as_str()));
                prop_assert_eq!(props["ClientType"].as_str(), Some(client_type.as_str()));
                Ok(())
            },
        )
        .unwrap();
}
