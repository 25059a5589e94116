//! Integration tests for the operator analytics and login endpoints
//!
//! These exercise the full pipeline: events in through the ingestion
//! endpoints (or directly through the store for backdated rows), summary out
//! through `/api/admin/analytics`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::Utc;
use linkpulse::config::{
    AdminConfig, Config, DatabaseBackend, DatabaseConfig, ServerConfig, TrackingConfig,
};
use linkpulse::models::{ClickEvent, NewClick, NewVisit, VisitEvent};
use linkpulse::storage::{EventStore, SqliteStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn create_test_store() -> Arc<dyn EventStore> {
    let store = SqliteStore::new("sqlite::memory:", 1).await.unwrap();
    store.init().await.unwrap();
    Arc::new(store)
}

fn create_test_config() -> Arc<Config> {
    Arc::new(Config {
        database: DatabaseConfig {
            backend: DatabaseBackend::Sqlite,
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        admin: AdminConfig {
            password: "test-secret".to_string(),
        },
        tracking: TrackingConfig {
            write_timeout_ms: 2000,
            query_timeout_ms: 5000,
        },
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_summary(app: &axum::Router, time_filter: &str) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/admin/analytics?timeFilter={time_filter}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

fn backdated_click(link_name: &str, occurred_at: i64) -> NewClick {
    NewClick {
        link_name: link_name.to_string(),
        link_url: format!("https://example.com/{link_name}"),
        user_agent: None,
        ip_address: None,
        referrer: None,
        occurred_at,
    }
}

fn backdated_visit(occurred_at: i64) -> NewVisit {
    NewVisit {
        user_agent: None,
        ip_address: None,
        referrer: None,
        referrer_platform: None,
        occurred_at,
    }
}

struct FailingStore;

#[async_trait::async_trait]
impl EventStore for FailingStore {
    async fn init(&self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn insert_click(&self, _click: &NewClick) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn insert_visit(&self, _visit: &NewVisit) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn clicks_since(&self, _since: i64) -> anyhow::Result<Vec<ClickEvent>> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn visits_since(&self, _since: i64) -> anyhow::Result<Vec<VisitEvent>> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn recent_clicks(&self, _since: i64, _limit: i64) -> anyhow::Result<Vec<ClickEvent>> {
        Err(anyhow::anyhow!("store offline"))
    }

    async fn recent_visits(&self, _since: i64, _limit: i64) -> anyhow::Result<Vec<VisitEvent>> {
        Err(anyhow::anyhow!("store offline"))
    }
}

#[tokio::test]
async fn test_end_to_end_visit_and_click_summary() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/track/visit",
            json!({ "userAgent": "Mozilla/5.0", "referrer": "https://t.co/abc" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/track/click",
            json!({ "linkName": "Portfolio", "url": "https://example.com/portfolio" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let summary = get_summary(&app, "all").await;

    assert_eq!(summary["totalVisits"], 1);
    assert_eq!(summary["totalClicks"], 1);
    assert_eq!(
        summary["topPlatforms"],
        json!([{ "platform": "Twitter/X", "visits": 1 }])
    );
    assert_eq!(
        summary["topLinks"],
        json!([{ "name": "Portfolio", "clicks": 1 }])
    );
    assert_eq!(summary["recentClicks"].as_array().unwrap().len(), 1);
    assert_eq!(summary["recentVisits"].as_array().unwrap().len(), 1);
    assert_eq!(summary["recentClicks"][0]["linkName"], "Portfolio");
}

#[tokio::test]
async fn test_unique_visitors_deduplicates_across_event_kinds() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    for uri in ["/api/track/visit", "/api/track/visit", "/api/track/click"] {
        let body = if uri.ends_with("click") {
            json!({ "linkName": "Blog", "url": "https://example.com/blog" })
        } else {
            json!({})
        };
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", "1.2.3.4")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.clone().oneshot(request).await.unwrap();
    }

    let summary = get_summary(&app, "all").await;
    assert_eq!(summary["totalVisits"], 2);
    assert_eq!(summary["totalClicks"], 1);
    // Same forwarded IP on every event.
    assert_eq!(summary["uniqueVisitors"], 1);
}

#[tokio::test]
async fn test_window_filter_excludes_old_events() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    store
        .insert_click(&backdated_click("old", now - 40 * 86_400))
        .await
        .unwrap();
    store
        .insert_click(&backdated_click("fresh", now - 3600))
        .await
        .unwrap();
    store
        .insert_visit(&backdated_visit(now - 40 * 86_400))
        .await
        .unwrap();

    let all = get_summary(&app, "all").await;
    assert_eq!(all["totalClicks"], 2);
    assert_eq!(all["totalVisits"], 1);

    let week = get_summary(&app, "7d").await;
    assert_eq!(week["totalClicks"], 1);
    assert_eq!(week["totalVisits"], 0);
    assert_eq!(week["topLinks"], json!([{ "name": "fresh", "clicks": 1 }]));
}

#[tokio::test]
async fn test_shrinking_window_never_increases_counts() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    for age_days in [0, 2, 10, 40] {
        store
            .insert_click(&backdated_click("link", now - age_days * 86_400))
            .await
            .unwrap();
        store
            .insert_visit(&backdated_visit(now - age_days * 86_400))
            .await
            .unwrap();
    }

    let mut previous_clicks = i64::MAX;
    let mut previous_visits = i64::MAX;
    for filter in ["all", "30d", "7d", "1d"] {
        let summary = get_summary(&app, filter).await;
        let clicks = summary["totalClicks"].as_i64().unwrap();
        let visits = summary["totalVisits"].as_i64().unwrap();
        assert!(clicks <= previous_clicks, "clicks grew when window shrank");
        assert!(visits <= previous_visits, "visits grew when window shrank");
        previous_clicks = clicks;
        previous_visits = visits;
    }
}

#[tokio::test]
async fn test_unrecognized_filter_treated_as_all() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    store
        .insert_click(&backdated_click("ancient", now - 365 * 86_400))
        .await
        .unwrap();

    let summary = get_summary(&app, "90d").await;
    assert_eq!(summary["totalClicks"], 1);
}

#[tokio::test]
async fn test_default_filter_is_seven_days() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    store
        .insert_click(&backdated_click("old", now - 10 * 86_400))
        .await
        .unwrap();
    store
        .insert_click(&backdated_click("fresh", now - 3600))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/analytics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = response_json(response).await;
    assert_eq!(summary["totalClicks"], 1);
}

#[tokio::test]
async fn test_recent_lists_bounded_to_fifty_newest_first() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    for i in 0..60 {
        store
            .insert_click(&backdated_click("link", now - i * 60))
            .await
            .unwrap();
    }

    let summary = get_summary(&app, "all").await;
    assert_eq!(summary["totalClicks"], 60);

    let recent = summary["recentClicks"].as_array().unwrap();
    assert_eq!(recent.len(), 50);

    let timestamps: Vec<i64> = recent
        .iter()
        .map(|c| c["occurredAt"].as_i64().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] >= w[1]));
    // The newest event leads the list.
    assert_eq!(timestamps[0], now);
}

#[tokio::test]
async fn test_clicks_by_day_ascending_and_consistent() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(Arc::clone(&store), create_test_config());

    let now = Utc::now().timestamp();
    for age_days in [0, 0, 2, 5] {
        store
            .insert_click(&backdated_click("link", now - age_days * 86_400))
            .await
            .unwrap();
    }

    let summary = get_summary(&app, "all").await;
    let days = summary["clicksByDay"].as_array().unwrap();
    assert_eq!(days.len(), 3);

    let dates: Vec<&str> = days.iter().map(|d| d["date"].as_str().unwrap()).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let sum: i64 = days.iter().map(|d| d["clicks"].as_i64().unwrap()).sum();
    assert_eq!(sum, summary["totalClicks"].as_i64().unwrap());
}

#[tokio::test]
async fn test_analytics_failure_returns_generic_500() {
    let store: Arc<dyn EventStore> = Arc::new(FailingStore);
    let app = linkpulse::api::create_api_router(store, create_test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/analytics?timeFilter=7d")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Failed to fetch analytics" })
    );
}

#[tokio::test]
async fn test_login_accepts_configured_password() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(store, create_test_config());

    let response = app
        .oneshot(post_json(
            "/api/admin/login",
            json!({ "password": "test-secret" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(store, create_test_config());

    let response = app
        .oneshot(post_json(
            "/api/admin/login",
            json!({ "password": "nope" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Invalid password" })
    );
}

#[tokio::test]
async fn test_health_check() {
    let store = create_test_store().await;
    let app = linkpulse::api::create_api_router(store, create_test_config());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({ "status": "OK" }));
}
