//! On-demand analytics aggregation
//!
//! Every query recomputes the full summary from the event log: four range
//! scans over the store, then pure in-memory aggregation. There is no cache
//! or incremental state, which keeps the pipeline trivially correct at the
//! scale of a single bio-link page.
//!
//! This is the one operator-facing path, so unlike ingestion it fails loudly:
//! any store error or timeout aborts the whole aggregation and no partial
//! summary is ever returned.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::timeout;

use crate::analytics::models::{AnalyticsSummary, DayCount, LinkCount, PlatformCount, TimeFilter};
use crate::models::{ClickEvent, VisitEvent};
use crate::storage::EventStore;

/// How many events each recent-activity list carries.
pub const RECENT_LIMIT: i64 = 50;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("event store query timed out")]
    Timeout,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Compute the dashboard summary for one time window.
pub async fn aggregate(
    store: &dyn EventStore,
    filter: TimeFilter,
    query_timeout: Duration,
) -> Result<AnalyticsSummary, AggregateError> {
    let since = filter.window_start(Utc::now().timestamp());

    let clicks = fetch(query_timeout, store.clicks_since(since)).await?;
    let visits = fetch(query_timeout, store.visits_since(since)).await?;
    let recent_clicks = fetch(query_timeout, store.recent_clicks(since, RECENT_LIMIT)).await?;
    let recent_visits = fetch(query_timeout, store.recent_visits(since, RECENT_LIMIT)).await?;

    Ok(summarize(&clicks, &visits, recent_clicks, recent_visits))
}

async fn fetch<T>(
    limit: Duration,
    query: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, AggregateError> {
    match timeout(limit, query).await {
        Ok(result) => result.map_err(AggregateError::from),
        Err(_) => Err(AggregateError::Timeout),
    }
}

/// Pure aggregation over already-fetched in-window events.
///
/// `clicks` and `visits` are expected oldest-first (the store's scan order),
/// which makes ranking tie order deterministic: ties keep first-seen order.
pub fn summarize(
    clicks: &[ClickEvent],
    visits: &[VisitEvent],
    recent_clicks: Vec<ClickEvent>,
    recent_visits: Vec<VisitEvent>,
) -> AnalyticsSummary {
    let unique_visitors = clicks
        .iter()
        .map(|click| click.ip_address.as_deref())
        .chain(visits.iter().map(|visit| visit.ip_address.as_deref()))
        .flatten()
        .collect::<HashSet<_>>()
        .len() as i64;

    let top_links = ranked_counts(clicks.iter().map(|click| click.link_name.as_str()))
        .into_iter()
        .map(|(name, clicks)| LinkCount { name, clicks })
        .collect();

    let top_platforms = ranked_counts(
        visits
            .iter()
            .filter_map(|visit| visit.referrer_platform.as_deref()),
    )
    .into_iter()
    .map(|(platform, visits)| PlatformCount { platform, visits })
    .collect();

    // BTreeMap keys sort lexicographically, which for YYYY-MM-DD is
    // chronological order.
    let mut by_day: BTreeMap<String, i64> = BTreeMap::new();
    for click in clicks {
        let Some(at) = DateTime::<Utc>::from_timestamp(click.occurred_at, 0) else {
            continue;
        };
        *by_day.entry(at.format("%Y-%m-%d").to_string()).or_insert(0) += 1;
    }
    let clicks_by_day = by_day
        .into_iter()
        .map(|(date, clicks)| DayCount { date, clicks })
        .collect();

    AnalyticsSummary {
        total_clicks: clicks.len() as i64,
        total_visits: visits.len() as i64,
        unique_visitors,
        top_links,
        top_platforms,
        clicks_by_day,
        recent_clicks,
        recent_visits,
    }
}

/// Count occurrences of each key, then sort descending by count.
/// The sort is stable over first-seen order, so ties stay deterministic.
fn ranked_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, i64)> {
    let mut counts: HashMap<&'a str, i64> = HashMap::new();
    let mut order: Vec<&'a str> = Vec::new();

    for key in keys {
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, i64)> = order
        .into_iter()
        .map(|key| (key.to_string(), counts[key]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
