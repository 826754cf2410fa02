use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{Json, Router};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::domain::FireReport;
use crate::engine::fanout::{fire, FireTemplate};
use crate::server::error::ApiError;

/// Control header carrying the fan-out request count.
pub const COUNT_HEADER: &str = "RC_GO_COUNT";
/// Control header carrying the fan-out target URL.
pub const URL_HEADER: &str = "RC_GO_URL";

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Shared per-process state: the pooled outbound client, built once at
/// startup and reused across all inbound calls.
pub struct AppState {
    client: Client,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let _ = *START_TIME;
    Router::new()
        .route("/load_and_fire/", any(load_and_fire))
        .route("/health", get(health))
        .with_state(state)
}

/// Replays the inbound request `RC_GO_COUNT` times against `RC_GO_URL`,
/// releasing all copies simultaneously, and reports every outcome.
///
/// The inbound method, remaining headers, and body are forwarded verbatim to
/// each copy. Sub-request failures land inside the report; this endpoint's
/// own status only reflects validation or aggregation problems.
async fn load_and_fire(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FireReport>, ApiError> {
    let count = parse_count(&headers)?;
    let url = parse_target_url(&headers)?;
    let forwarded = forward_headers(&headers);

    info!(count, target = %url, method = %method, "dispatching fan-out");

    let template = FireTemplate::new(method, url, forwarded, body);
    let report = fire(&state.client, template, count)
        .await
        .map_err(ApiError::FanOut)?;

    info!(
        duration = %report.duration,
        results = report.results.len(),
        "fan-out complete"
    );

    Ok(Json(report))
}

fn parse_count(headers: &HeaderMap) -> Result<usize, ApiError> {
    let raw = headers
        .get(COUNT_HEADER)
        .ok_or_else(|| ApiError::InvalidCount("header missing".to_string()))?
        .to_str()
        .map_err(|_| ApiError::InvalidCount("not valid ASCII".to_string()))?;

    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        Ok(_) => Err(ApiError::InvalidCount(
            "must be greater than zero".to_string(),
        )),
        Err(_) => Err(ApiError::InvalidCount(format!(
            "`{raw}` is not a positive integer"
        ))),
    }
}

fn parse_target_url(headers: &HeaderMap) -> Result<String, ApiError> {
    let url = headers
        .get(URL_HEADER)
        .ok_or(ApiError::MissingUrl)?
        .to_str()
        .map_err(|_| ApiError::MissingUrl)?
        .trim();

    if url.is_empty() {
        return Err(ApiError::MissingUrl);
    }
    Ok(url.to_string())
}

/// Copies the inbound headers for replay, dropping the two control headers
/// and the hop-specific `host`/`content-length` (the outbound client derives
/// its own for each copy).
fn forward_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let key = name.as_str();
        if key.eq_ignore_ascii_case(COUNT_HEADER)
            || key.eq_ignore_ascii_case(URL_HEADER)
            || key == "host"
            || key == "content-length"
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    healthy: bool,
    service: &'static str,
    uptime_seconds: u64,
}

/// GET /health - liveness probe.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        service: env!("CARGO_PKG_NAME"),
        uptime_seconds: START_TIME.elapsed().as_secs(),
    })
}
