use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tokio::time::timeout;

use crate::analytics::{classify_referrer, extract_client_ip};
use crate::config::Config;
use crate::models::{NewClick, NewVisit};
use crate::storage::EventStore;

pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub config: Arc<Config>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackVisitRequest {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackClickRequest {
    pub link_name: String,
    pub url: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Record a page visit.
///
/// Always reports success: tracking is not in the critical path of the page
/// it instruments, so store outages and malformed payloads are logged and
/// swallowed. The client IP comes from proxy headers, never the body.
pub async fn track_visit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<SuccessResponse> {
    let payload = serde_json::from_slice::<TrackVisitRequest>(&body).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "malformed visit payload, recording a bare visit");
        TrackVisitRequest::default()
    });

    let referrer = payload.referrer.filter(|r| !r.is_empty());
    let visit = NewVisit {
        user_agent: payload.user_agent,
        ip_address: extract_client_ip(&headers).map(|ip| ip.to_string()),
        referrer_platform: classify_referrer(referrer.as_deref()),
        referrer,
        occurred_at: Utc::now().timestamp(),
    };

    let write_timeout = Duration::from_millis(state.config.tracking.write_timeout_ms);
    match timeout(write_timeout, state.store.insert_visit(&visit)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(error = %err, "failed to record visit"),
        Err(_) => tracing::warn!("visit write timed out"),
    }

    Json(SuccessResponse { success: true })
}

/// Record a link click, with the same always-success contract as
/// [`track_visit`]. A payload without the link fields records nothing.
pub async fn track_click(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<SuccessResponse> {
    let payload: TrackClickRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "malformed click payload, recording nothing");
            return Json(SuccessResponse { success: true });
        }
    };

    let click = NewClick {
        link_name: payload.link_name,
        link_url: payload.url,
        user_agent: payload.user_agent,
        ip_address: extract_client_ip(&headers).map(|ip| ip.to_string()),
        referrer: payload.referrer.filter(|r| !r.is_empty()),
        occurred_at: Utc::now().timestamp(),
    };

    let write_timeout = Duration::from_millis(state.config.tracking.write_timeout_ms);
    match timeout(write_timeout, state.store.insert_click(&click)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => {
            tracing::warn!(link_name = %click.link_name, error = %err, "failed to record click")
        }
        Err(_) => tracing::warn!(link_name = %click.link_name, "click write timed out"),
    }

    Json(SuccessResponse { success: true })
}

/// Operator login: constant-time comparison against the configured secret.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let supplied = payload.password.as_bytes();
    let expected = state.config.admin.password.as_bytes();

    if bool::from(supplied.ct_eq(expected)) {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid password".to_string(),
            }),
        ))
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}
