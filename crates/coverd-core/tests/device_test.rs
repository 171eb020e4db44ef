#![allow(clippy::unwrap_used)]
// `ShellyDevice` against a mocked RPC endpoint.

use std::time::Duration;

use coverd_core::{
    CommandTransport, ControllerConfig, CoreError, CoverCommand, CoverState, ShellyDevice,
    StatusProvider,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn frame(body: serde_json::Value) -> ResponseTemplate {
    let mut frame = json!({ "id": 1, "src": "shellyplus2pm-test" });
    frame
        .as_object_mut()
        .unwrap()
        .extend(body.as_object().unwrap().clone());
    ResponseTemplate::new(200).set_body_json(frame)
}

fn device(server: &MockServer, timeout: Duration) -> ShellyDevice {
    let mut config = ControllerConfig::new(Url::parse(&server.uri()).unwrap(), 0);
    config.timeout = timeout;
    ShellyDevice::connect(&config).unwrap()
}

#[tokio::test]
async fn status_reads_cover_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(body_partial_json(json!({ "method": "Cover.GetStatus", "src": "coverd" })))
        .respond_with(frame(json!({
            "result": { "id": 0, "state": "opening", "current_pos": 30 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = device(&server, Duration::from_secs(5))
        .cover_status(0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.state, CoverState::Opening);
    assert_eq!(status.position, Some(30));
}

#[tokio::test]
async fn missing_cover_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(frame(json!({
            "error": { "code": -105, "message": "Argument 'id', value 3 not found!" }
        })))
        .mount(&server)
        .await;

    let status = device(&server, Duration::from_secs(5))
        .cover_status(3)
        .await
        .unwrap();
    assert!(status.is_none());
}

#[tokio::test]
async fn status_timeout_reports_configured_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(
            frame(json!({ "result": { "id": 0, "state": "open" } }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = device(&server, Duration::from_secs(1))
        .cover_status(0)
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Timeout { timeout_secs: 1 }), "got: {err:?}");
    assert_eq!(err.to_string(), "Device request timed out after 1s");
}

#[tokio::test]
async fn command_timeout_names_the_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .respond_with(frame(json!({ "result": null })).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = device(&server, Duration::from_secs(1))
        .send(0, CoverCommand::Open)
        .await
        .unwrap_err();

    match err {
        CoreError::CommandFailed { message, .. } => {
            assert_eq!(message, "Request timed out after 1s");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}
