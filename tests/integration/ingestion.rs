//! End-to-end ingestion through the track-event handler.

use super::test_utils::enabled_api;
use calls_telemetry::api::{ApiResponse, STATUS_BAD_REQUEST};
use calls_telemetry::error::RejectionReason;
use calls_telemetry::telemetry::registry::{CLIENT_EVENTS, CLIENT_TYPES};
use calls_telemetry::telemetry::TrackEventRequest;
use serde_json::json;

fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

#[test]
fn test_every_event_and_client_type_is_accepted() {
    let (api, recorder) = enabled_api();
    for event in CLIENT_EVENTS {
        for client_type in CLIENT_TYPES {
            let response = api.handle_track_event(
                body(json!({"event": event, "clientType": client_type})).as_slice(),
                "u1",
            );
            assert!(response.is_success(), "{event}/{client_type} rejected");
        }
    }
    assert_eq!(
        recorder.event_count(),
        CLIENT_EVENTS.len() * CLIENT_TYPES.len()
    );
}

#[test]
fn test_spoofed_identity_is_overwritten() {
    let (api, recorder) = enabled_api();
    let response = api.handle_track_event(
        body(json!({
            "event": "user_raise_hand",
            "clientType": "web",
            "props": {"ActualUserID": "spoofed"}
        }))
        .as_slice(),
        "real-user-1",
    );
    assert_eq!(response, ApiResponse::success());

    let (event, props) = recorder.last_event().unwrap();
    assert_eq!(event, "user_raise_hand");
    assert_eq!(props["ActualUserID"], "real-user-1");
    assert_eq!(props["ClientType"], "web");
    assert!(!props.contains_key("Source"));
}

#[test]
fn test_source_is_injected() {
    let (api, recorder) = enabled_api();
    api.handle_track_event(
        body(json!({
            "event": "user_open_channel_link",
            "clientType": "desktop",
            "source": "channel_header",
            "props": {"Source": "ignored", "extra": [1, 2]}
        }))
        .as_slice(),
        "u1",
    );
    let (_, props) = recorder.last_event().unwrap();
    assert_eq!(props["Source"], "channel_header");
    assert_eq!(props["extra"], json!([1, 2]));
}

#[test]
fn test_disabled_rejects_valid_payload() {
    let (api, recorder) = enabled_api();
    api.manager().disable().unwrap();
    let response = api.handle_track_event(
        body(json!({"event": "user_raise_hand", "clientType": "web"})).as_slice(),
        "u1",
    );
    assert_eq!(response, ApiResponse::bad_request("telemetry is disabled"));
    assert_eq!(recorder.event_count(), 0);
}

#[test]
fn test_rejections_are_client_errors() {
    let (api, recorder) = enabled_api();
    let cases: Vec<(Vec<u8>, &str)> = vec![
        (b"{not json".to_vec(), ""),
        (body(json!({"event": "call_started", "clientType": "web"})), "invalid telemetry event"),
        (body(json!({"event": "user_raise_hand", "clientType": "tv"})), "invalid client type"),
        (body(json!({"event": "user_raise_hand"})), "invalid client type"),
    ];
    for (payload, reason) in cases {
        let response = api.handle_track_event(payload.as_slice(), "u1");
        assert_eq!(response.code, STATUS_BAD_REQUEST);
        if !reason.is_empty() {
            assert_eq!(response.err.as_deref(), Some(reason));
        }
    }
    assert_eq!(recorder.event_count(), 0);
}

#[test]
fn test_oversized_body_is_rejected() {
    let (api, recorder) = enabled_api();
    api.gate().set_max_body_bytes(64);
    let payload = body(json!({
        "event": "user_raise_hand",
        "clientType": "web",
        "props": {"pad": "x".repeat(128)}
    }));
    let response = api.handle_track_event(payload.as_slice(), "u1");
    assert_eq!(response.code, STATUS_BAD_REQUEST);
    assert_eq!(recorder.event_count(), 0);
}

#[test]
fn test_pre_decoded_requests_follow_same_rules() {
    let (api, recorder) = enabled_api();
    let request = TrackEventRequest {
        event: "user_lower_hand".to_string(),
        client_type: "mobile".to_string(),
        source: None,
        props: None,
    };
    let accepted = api.gate().ingest_request(request.clone(), "u2").unwrap();
    assert_eq!(accepted.event, "user_lower_hand");
    let (_, props) = recorder.last_event().unwrap();
    assert_eq!(props.len(), 2);

    let mut bad = request;
    bad.client_type = "Mobile".to_string();
    assert_eq!(
        api.gate().ingest_request(bad, "u2"),
        Err(RejectionReason::UnrecognizedClientType)
    );
}
