use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use relay_macros::HttpError;

use crate::mail::MailError;
use crate::submission::ValidationErrors;

/// Errors surfaced by the HTTP layer.
///
/// `Display` is the internal log text; `http_message()` is what the caller
/// sees. Server errors never expose their details.
#[derive(Debug, thiserror::Error, HttpError)]
pub enum Error {
    #[error("{0}")]
    #[http_error(BAD_REQUEST)]
    Validation(ValidationErrors),

    #[error("malformed request body: {0}")]
    #[http_error(BAD_REQUEST, "Request body must be valid JSON")]
    MalformedBody(String),

    #[error("request body too large")]
    #[http_error(PAYLOAD_TOO_LARGE, "Request body too large")]
    PayloadTooLarge,

    #[error("rate limit exceeded, retry in {retry_after}s")]
    #[http_error(TOO_MANY_REQUESTS, "Too many requests, please try again later.")]
    RateLimited { retry_after: u64 },

    #[error("not found")]
    #[http_error(NOT_FOUND, "Not found")]
    NotFound,

    #[error("method not allowed")]
    #[http_error(METHOD_NOT_ALLOWED, "Method not allowed")]
    MethodNotAllowed,

    #[error("mail dispatch failed: {0}")]
    #[http_error(INTERNAL_SERVER_ERROR, "Failed to send email. Please try again later.")]
    Mail(#[from] MailError),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// `{ "success": false, "message": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.http_code();
        // Details of server errors are only logged, never returned
        if code.is_server_error() {
            tracing::error!("Error Status {}: {}", code, self);
        } else {
            tracing::debug!("Rejected with {}: {}", code, self);
        }

        let mut response = (code, Json(ErrorResponse::new(self.http_message()))).into_response();
        if let Error::RateLimited { retry_after } = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, Error>;
