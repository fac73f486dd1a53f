//! Wire types and the HTTP transport for `POST /api/send-email`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SubmitError;

pub const SEND_EMAIL_PATH: &str = "/api/send-email";

/// JSON body sent to the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ContactPayload {
    pub fn new(email: impl Into<String>, company: impl Into<String>) -> Self {
        ContactPayload {
            email: email.into(),
            company: company.into(),
            ..Default::default()
        }
    }
}

/// Successful relay response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub test_mode: Option<bool>,
}

/// One attempt at delivering a payload. Implementations perform no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &ContactPayload) -> Result<SubmitResponse, SubmitError>;
}

/// reqwest based transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        HttpTransport {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEND_EMAIL_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &ContactPayload) -> Result<SubmitResponse, SubmitError> {
        log::debug!("POST {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = response.status();

        // The relay answers with JSON on every status
        let body: Option<Value> = response.json().await.ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("message"))
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(SubmitError::from_status(status.as_u16(), message));
        }

        let body = body.ok_or_else(|| SubmitError::Transient {
            status: Some(status.as_u16()),
            message: "Invalid JSON in response".to_string(),
        })?;
        serde_json::from_value(body).map_err(|e| SubmitError::Transient {
            status: Some(status.as_u16()),
            message: format!("Unexpected response body: {e}"),
        })
    }
}
