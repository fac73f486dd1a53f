use crate::config::{RequestConfig, RequestOverrides};
use crate::error::SubmitError;
use crate::transport::{ContactPayload, HttpTransport, SubmitResponse, Transport};

/// Retrying submission client.
///
/// Each call is an independent state machine: attempt, then succeed, retry
/// after a linear backoff, or fail. Client errors end the loop at once.
///
/// A timed out attempt is dropped, which aborts the local request, but the
/// relay may already have accepted it; a retry after a timeout can therefore
/// produce duplicate emails.
pub struct SubmissionClient<T: Transport> {
    transport: T,
    defaults: RequestOverrides,
}

impl SubmissionClient<HttpTransport> {
    pub fn http(base_url: &str) -> Self {
        SubmissionClient::new(HttpTransport::new(base_url))
    }
}

impl<T: Transport> SubmissionClient<T> {
    pub fn new(transport: T) -> Self {
        SubmissionClient {
            transport,
            defaults: RequestOverrides::default(),
        }
    }

    /// Overrides applied to every call unless the call provides its own.
    pub fn with_defaults(mut self, defaults: RequestOverrides) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(
        &self,
        payload: &ContactPayload,
        overrides: RequestOverrides,
    ) -> Result<SubmitResponse, SubmitError> {
        let config = RequestConfig::merged(RequestOverrides {
            timeout: overrides.timeout.or(self.defaults.timeout),
            max_retries: overrides.max_retries.or(self.defaults.max_retries),
            retry_delay: overrides.retry_delay.or(self.defaults.retry_delay),
        });
        let max_attempts = config.max_attempts();

        let mut attempt = 1;
        loop {
            match self.attempt(payload, &config).await {
                Ok(response) => {
                    log::debug!("submission accepted on attempt {}", attempt);
                    return Ok(response);
                }
                Err(err) if !err.is_retryable() => {
                    log::warn!("submission rejected: {}", err);
                    return Err(err);
                }
                Err(err) if attempt >= max_attempts => {
                    log::error!("giving up after {} attempts: {}", attempt, err);
                    return Err(SubmitError::Exhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                Err(err) => {
                    let delay = config.backoff(attempt);
                    log::warn!(
                        "attempt {}/{} failed ({}), retrying in {}ms",
                        attempt,
                        max_attempts,
                        err,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        payload: &ContactPayload,
        config: &RequestConfig,
    ) -> Result<SubmitResponse, SubmitError> {
        tokio::time::timeout(config.timeout, self.transport.send(payload))
            .await
            .unwrap_or(Err(SubmitError::Timeout {
                after: config.timeout,
            }))
    }
}

/// Submits one payload to the relay at `base_url`.
pub async fn submit_contact(
    base_url: &str,
    payload: &ContactPayload,
    overrides: RequestOverrides,
) -> Result<SubmitResponse, SubmitError> {
    SubmissionClient::http(base_url)
        .submit(payload, overrides)
        .await
}
