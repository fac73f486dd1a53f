use std::time::Duration;

/// Per-call request settings. Built fresh from [`RequestOverrides`] on every
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestConfig {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Total number of attempts, including the first.
    pub max_retries: u32,
    /// Base backoff; retry `n` waits `retry_delay * n`.
    pub retry_delay: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig {
            timeout: Duration::from_millis(10_000),
            max_retries: 3,
            retry_delay: Duration::from_millis(1_000),
        }
    }
}

impl RequestConfig {
    pub fn merged(overrides: RequestOverrides) -> Self {
        let defaults = RequestConfig::default();
        RequestConfig {
            timeout: overrides.timeout.unwrap_or(defaults.timeout),
            max_retries: overrides.max_retries.unwrap_or(defaults.max_retries),
            retry_delay: overrides.retry_delay.unwrap_or(defaults.retry_delay),
        }
    }

    /// At least one attempt is always made.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(attempt)
    }
}

/// Caller supplied values that replace the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOverrides {
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<Duration>,
}

impl RequestOverrides {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = Some(retry_delay);
        self
    }
}
