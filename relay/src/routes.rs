//! HTTP surface: `POST /api/send-email` and `GET /api/health`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mail::{DispatchResult, Dispatcher};
use crate::rate_limit::{rate_limit, RateLimit};
use crate::submission::ContactSubmission;

/// Covers every field at its character ceiling in worst-case UTF-8.
const BODY_LIMIT: usize = 64 * 1024;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub rate_limit: RateLimit,
    pub started: Instant,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, rate_limit: RateLimit) -> Self {
        AppState {
            dispatcher: Arc::new(dispatcher),
            rate_limit,
            started: Instant::now(),
        }
    }
}

pub fn router(state: AppState, config: &Config) -> Router {
    let dispatch_routes = Router::new()
        .route(
            "/api/send-email",
            post(send_email).fallback(method_not_allowed),
        )
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit,
        ));

    Router::new()
        .merge(dispatch_routes)
        .route("/api/health", get(health).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors(config))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(config: &Config) -> CorsLayer {
    let origins = config.origins();
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_origins(origins))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

fn parse_origins(origins: Vec<String>) -> Vec<HeaderValue> {
    origins
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect()
}

async fn send_email(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<DispatchResult>> {
    let Json(body) = payload.map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge,
        _ => Error::MalformedBody(e.body_text()),
    })?;
    let submission = ContactSubmission::from_json(&body)?;
    let result = state.dispatcher.dispatch(&submission).await?;
    Ok(Json(result))
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub version: &'static str,
    pub uptime: u64,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();

    Json(Health {
        status: "OK",
        timestamp,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started.elapsed().as_secs(),
    })
}

async fn not_found() -> Error {
    Error::NotFound
}

async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
