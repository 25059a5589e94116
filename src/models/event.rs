use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A recorded link click. Rows are append-only; `occurred_at` is the unix
/// timestamp (seconds, UTC) assigned by the server at insert time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: i64,
    pub link_name: String,
    pub link_url: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    pub occurred_at: i64,
}

/// A recorded page visit. `referrer_platform` is derived from `referrer` at
/// insert time and is `None` exactly when `referrer` is absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VisitEvent {
    pub id: i64,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    pub referrer_platform: Option<String>,
    pub occurred_at: i64,
}

/// Click event as built by the recorder, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_name: String,
    pub link_url: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    pub occurred_at: i64,
}

/// Visit event as built by the recorder, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub referrer: Option<String>,
    pub referrer_platform: Option<String>,
    pub occurred_at: i64,
}
