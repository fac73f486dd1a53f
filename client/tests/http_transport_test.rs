use std::time::Duration;

use contact_client::{
    ContactPayload, ErrorKind, HttpTransport, RequestOverrides, SubmissionClient, SubmitError,
    Transport,
};
use httpmock::prelude::*;
use serde_json::json;

fn fast() -> RequestOverrides {
    RequestOverrides::default().retry_delay(Duration::from_millis(5))
}

#[tokio::test]
async fn posts_json_and_parses_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/send-email")
                .header("content-type", "application/json")
                .json_body(json!({ "name": "Jane", "email": "jane@acme.test", "company": "Acme" }));
            then.status(200)
                .json_body(json!({ "success": true, "message": "Email sent successfully", "testMode": true }));
        })
        .await;

    let transport = HttpTransport::new(&server.base_url());
    let payload = ContactPayload {
        name: Some("Jane".into()),
        ..ContactPayload::new("jane@acme.test", "Acme")
    };
    let response = transport.send(&payload).await.unwrap();

    mock.assert_async().await;
    assert!(response.success);
    assert_eq!(response.test_mode, Some(true));
}

#[tokio::test]
async fn validation_error_uses_server_message_and_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-email");
            then.status(400)
                .json_body(json!({ "success": false, "message": "Valid email is required" }));
        })
        .await;

    let client = SubmissionClient::http(&server.base_url());
    let err = client
        .submit(&ContactPayload::new("nope", "Acme"), fast())
        .await
        .unwrap_err();

    mock.assert_hits_async(1).await;
    assert_eq!(err.kind(), ErrorKind::Client);
    assert_eq!(err.to_string(), "Valid email is required");
}

#[tokio::test]
async fn server_error_is_retried_until_exhausted() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-email");
            then.status(500).json_body(
                json!({ "success": false, "message": "Failed to send email. Please try again later." }),
            );
        })
        .await;

    let client = SubmissionClient::http(&server.base_url());
    let err = client
        .submit(&ContactPayload::new("john@x.com", "Acme"), fast().max_retries(3))
        .await
        .unwrap_err();

    mock.assert_hits_async(3).await;
    assert_eq!(
        err.to_string(),
        "Failed after 3 attempts: Failed to send email. Please try again later."
    );
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn non_json_error_body_gets_generic_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-email");
            then.status(502).body("<html>Bad Gateway</html>");
        })
        .await;

    let transport = HttpTransport::new(&server.base_url());
    let err = transport
        .send(&ContactPayload::new("john@x.com", "Acme"))
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Transient { status: Some(502), .. }));
    assert_eq!(err.to_string(), "Request failed with status 502");
}

#[tokio::test]
async fn rate_limit_is_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/send-email");
            then.status(429).json_body(
                json!({ "success": false, "message": "Too many requests, please try again later." }),
            );
        })
        .await;

    let client = SubmissionClient::http(&server.base_url());
    let err = client
        .submit(&ContactPayload::new("john@x.com", "Acme"), fast())
        .await
        .unwrap_err();

    mock.assert_hits_async(1).await;
    assert_eq!(err.status(), Some(429));
}

#[tokio::test]
async fn connection_refused_is_transient() {
    // Nothing listens on the discard port
    let transport = HttpTransport::new("http://127.0.0.1:9");
    let err = transport
        .send(&ContactPayload::new("john@x.com", "Acme"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transient);
    assert!(err.is_retryable());
}
