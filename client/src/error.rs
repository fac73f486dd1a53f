use std::time::Duration;

/// How a failed attempt should be treated by the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was rejected; retrying cannot help.
    Client,
    /// Server or network failure.
    Transient,
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{message}")]
    Client { status: u16, message: String },

    #[error("{message}")]
    Transient { status: Option<u16>, message: String },

    #[error("Request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("Failed after {attempts} {}: {last}", attempts_word(.attempts))]
    Exhausted { attempts: u32, last: Box<SubmitError> },
}

fn attempts_word(attempts: &u32) -> &'static str {
    if *attempts == 1 {
        "attempt"
    } else {
        "attempts"
    }
}

impl SubmitError {
    /// Classifies an HTTP failure status. `429` counts as a client error so a
    /// rate limited caller does not hammer the endpoint.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if (400..500).contains(&status) && status != 408 {
            SubmitError::Client { status, message }
        } else {
            SubmitError::Transient {
                status: Some(status),
                message,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Client { .. } => ErrorKind::Client,
            SubmitError::Transient { .. } => ErrorKind::Transient,
            SubmitError::Timeout { .. } => ErrorKind::Timeout,
            SubmitError::Exhausted { last, .. } => last.kind(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::Exhausted { .. } => false,
            other => other.kind() != ErrorKind::Client,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Client { status, .. } => Some(*status),
            SubmitError::Transient { status, .. } => *status,
            SubmitError::Timeout { .. } => None,
            SubmitError::Exhausted { last, .. } => last.status(),
        }
    }
}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Transient {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert_eq!(SubmitError::from_status(400, "bad").kind(), ErrorKind::Client);
        assert_eq!(SubmitError::from_status(429, "slow down").kind(), ErrorKind::Client);
        assert_eq!(SubmitError::from_status(408, "timeout").kind(), ErrorKind::Transient);
        assert_eq!(SubmitError::from_status(500, "boom").kind(), ErrorKind::Transient);
        assert_eq!(SubmitError::from_status(503, "down").status(), Some(503));
    }

    #[test]
    fn retryability_follows_kind_not_text() {
        // A server message mentioning 400 is still a transient failure
        let err = SubmitError::Transient {
            status: Some(502),
            message: "upstream returned 400".into(),
        };
        assert!(err.is_retryable());
        assert!(!SubmitError::from_status(422, "Company is required").is_retryable());
        assert!(SubmitError::Timeout {
            after: Duration::from_millis(5)
        }
        .is_retryable());
    }

    #[test]
    fn messages() {
        let timeout = SubmitError::Timeout {
            after: Duration::from_millis(100),
        };
        assert_eq!(timeout.to_string(), "Request timed out after 100ms");

        let exhausted = SubmitError::Exhausted {
            attempts: 2,
            last: Box::new(SubmitError::from_status(500, "Failed to send email.")),
        };
        assert_eq!(exhausted.to_string(), "Failed after 2 attempts: Failed to send email.");
        assert_eq!(exhausted.kind(), ErrorKind::Transient);
        assert!(!exhausted.is_retryable());

        let single = SubmitError::Exhausted {
            attempts: 1,
            last: Box::new(timeout),
        };
        assert_eq!(single.to_string(), "Failed after 1 attempt: Request timed out after 100ms");
    }
}
