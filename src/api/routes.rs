use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::storage::EventStore;

use super::analytics::get_analytics;
use super::handlers::{health_check, login, track_click, track_visit, AppState};

pub fn create_api_router(store: Arc<dyn EventStore>, config: Arc<Config>) -> Router {
    let state = Arc::new(AppState { store, config });

    // The bio page is typically served from a different origin than this API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/track/visit", post(track_visit))
        .route("/api/track/click", post(track_click))
        .route("/api/admin/analytics", get(get_analytics))
        .route("/api/admin/login", post(login))
        .layer(cors)
        .with_state(state)
}
