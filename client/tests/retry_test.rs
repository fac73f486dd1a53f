use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use contact_client::{
    bench, ContactPayload, ErrorKind, RequestOverrides, SubmissionClient, SubmitError,
    SubmitResponse, Transport,
};

/// Plays back scripted outcomes, then keeps repeating the fallback.
struct ScriptedTransport {
    script: Mutex<VecDeque<Result<SubmitResponse, SubmitError>>>,
    fallback: fn() -> Result<SubmitResponse, SubmitError>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    fn new(
        script: Vec<Result<SubmitResponse, SubmitError>>,
        fallback: fn() -> Result<SubmitResponse, SubmitError>,
    ) -> Self {
        ScriptedTransport {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _payload: &ContactPayload) -> Result<SubmitResponse, SubmitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(self.fallback)
    }
}

/// Never answers.
struct HangingTransport;

#[async_trait]
impl Transport for HangingTransport {
    async fn send(&self, _payload: &ContactPayload) -> Result<SubmitResponse, SubmitError> {
        std::future::pending().await
    }
}

fn ok() -> Result<SubmitResponse, SubmitError> {
    Ok(SubmitResponse {
        success: true,
        message: "Email sent successfully".into(),
        test_mode: None,
    })
}

fn server_error() -> Result<SubmitResponse, SubmitError> {
    Err(SubmitError::from_status(
        500,
        "Failed to send email. Please try again later.",
    ))
}

fn bad_request() -> Result<SubmitResponse, SubmitError> {
    Err(SubmitError::from_status(400, "Valid email is required"))
}

fn fast() -> RequestOverrides {
    RequestOverrides::default().retry_delay(Duration::from_millis(5))
}

fn payload() -> ContactPayload {
    ContactPayload::new("john@x.com", "Acme")
}

#[tokio::test]
async fn succeeds_after_two_failures() {
    let client = SubmissionClient::new(ScriptedTransport::new(
        vec![server_error(), server_error()],
        ok,
    ));

    let response = client
        .submit(&payload(), fast().max_retries(3))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(client.transport().calls(), 3);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let client = SubmissionClient::new(ScriptedTransport::new(vec![], bad_request));

    let err = client.submit(&payload(), fast()).await.unwrap_err();

    assert_eq!(client.transport().calls(), 1);
    assert_eq!(err.kind(), ErrorKind::Client);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Valid email is required");
}

#[tokio::test]
async fn exhausts_retry_budget() {
    let client = SubmissionClient::new(ScriptedTransport::new(vec![], server_error));

    let err = client
        .submit(&payload(), fast().max_retries(2))
        .await
        .unwrap_err();

    assert_eq!(client.transport().calls(), 2);
    assert!(matches!(err, SubmitError::Exhausted { attempts: 2, .. }));
    assert!(err.to_string().starts_with("Failed after 2 attempts"));
}

#[tokio::test]
async fn client_error_after_transient_stops_retrying() {
    let client = SubmissionClient::new(ScriptedTransport::new(
        vec![server_error(), bad_request()],
        ok,
    ));

    let err = client
        .submit(&payload(), fast().max_retries(5))
        .await
        .unwrap_err();

    assert_eq!(client.transport().calls(), 2);
    assert_eq!(err.kind(), ErrorKind::Client);
}

#[tokio::test]
async fn backoff_grows_linearly() {
    let client = SubmissionClient::new(ScriptedTransport::new(vec![], server_error));

    let started = Instant::now();
    let _ = client
        .submit(
            &payload(),
            RequestOverrides::default()
                .max_retries(3)
                .retry_delay(Duration::from_millis(40)),
        )
        .await;

    // 40ms after the first attempt, 80ms after the second
    assert!(started.elapsed() >= Duration::from_millis(120));
    assert_eq!(client.transport().calls(), 3);
}

#[tokio::test]
async fn times_out_hanging_transport() {
    let client = SubmissionClient::new(HangingTransport);

    let started = Instant::now();
    let err = client
        .submit(
            &payload(),
            RequestOverrides::default()
                .timeout(Duration::from_millis(100))
                .max_retries(1),
        )
        .await
        .unwrap_err();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.to_string().contains("100ms"));
}

#[tokio::test]
async fn client_defaults_apply_unless_overridden() {
    let client = SubmissionClient::new(ScriptedTransport::new(vec![], server_error))
        .with_defaults(fast().max_retries(4));

    let _ = client.submit(&payload(), RequestOverrides::default()).await;
    assert_eq!(client.transport().calls(), 4);

    let client = SubmissionClient::new(ScriptedTransport::new(vec![], server_error))
        .with_defaults(fast().max_retries(4));
    let _ = client
        .submit(&payload(), RequestOverrides::default().max_retries(1))
        .await;
    assert_eq!(client.transport().calls(), 1);
}

#[tokio::test]
async fn bench_counts_outcomes() {
    let client = SubmissionClient::new(ScriptedTransport::new(
        vec![ok(), bad_request(), ok(), bad_request()],
        ok,
    ));

    let report = bench::run(&client, 10, 4, fast()).await;

    assert_eq!(report.succeeded, 8);
    assert_eq!(report.failed, 2);
    assert_eq!(report.latencies.len(), 10);
    assert_eq!(client.transport().calls(), 10);
}
