//! Operator analytics endpoint

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::handlers::{AppState, ErrorResponse};
use crate::analytics::{aggregate, TimeFilter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQueryParams {
    /// Time window: "1d", "7d" (default), "30d" or "all".
    pub time_filter: Option<String>,
}

/// Aggregated analytics for the operator dashboard.
///
/// Unlike ingestion this path fails loudly: any store failure yields a
/// generic 500 with no partial data.
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQueryParams>,
) -> impl IntoResponse {
    let filter = params
        .time_filter
        .as_deref()
        .map(TimeFilter::parse)
        .unwrap_or_default();
    let query_timeout = Duration::from_millis(state.config.tracking.query_timeout_ms);

    match aggregate(state.store.as_ref(), filter, query_timeout).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => {
            tracing::error!("Failed to aggregate analytics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch analytics".to_string(),
                }),
            )
                .into_response()
        }
    }
}
