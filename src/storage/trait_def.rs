use crate::models::{ClickEvent, NewClick, NewVisit, VisitEvent};
use anyhow::Result;
use async_trait::async_trait;

/// Append-only event store backing ingestion and analytics.
///
/// The store only ever grows: there is no update or delete path. Reads are
/// range scans over `occurred_at`, so both backends keep an index on that
/// column.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Initialize the storage (create tables and indexes).
    async fn init(&self) -> Result<()>;

    /// Append one click event.
    async fn insert_click(&self, click: &NewClick) -> Result<()>;

    /// Append one visit event.
    async fn insert_visit(&self, visit: &NewVisit) -> Result<()>;

    /// All clicks with `occurred_at >= since`, oldest first.
    async fn clicks_since(&self, since: i64) -> Result<Vec<ClickEvent>>;

    /// All visits with `occurred_at >= since`, oldest first.
    async fn visits_since(&self, since: i64) -> Result<Vec<VisitEvent>>;

    /// The newest `limit` clicks with `occurred_at >= since`, newest first.
    async fn recent_clicks(&self, since: i64, limit: i64) -> Result<Vec<ClickEvent>>;

    /// The newest `limit` visits with `occurred_at >= since`, newest first.
    async fn recent_visits(&self, since: i64, limit: i64) -> Result<Vec<VisitEvent>>;
}
