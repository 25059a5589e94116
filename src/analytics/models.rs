//! Analytics summary types and time windows

use serde::{Deserialize, Serialize};

use crate::models::{ClickEvent, VisitEvent};

/// Time window for an analytics query, anchored at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    #[default]
    Week,
    /// Last 30 days.
    Month,
    /// Everything since the epoch.
    All,
}

impl TimeFilter {
    /// Parse the wire value. Unrecognized values mean "all time".
    pub fn parse(value: &str) -> Self {
        match value {
            "1d" => TimeFilter::Day,
            "7d" => TimeFilter::Week,
            "30d" => TimeFilter::Month,
            _ => TimeFilter::All,
        }
    }

    /// Inclusive lower bound of the window, as a unix timestamp.
    pub fn window_start(&self, now: i64) -> i64 {
        const DAY_SECS: i64 = 24 * 60 * 60;
        match self {
            TimeFilter::Day => now - DAY_SECS,
            TimeFilter::Week => now - 7 * DAY_SECS,
            TimeFilter::Month => now - 30 * DAY_SECS,
            TimeFilter::All => 0,
        }
    }
}

/// Full dashboard summary, recomputed from the event log on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_clicks: i64,
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub top_links: Vec<LinkCount>,
    pub top_platforms: Vec<PlatformCount>,
    pub clicks_by_day: Vec<DayCount>,
    pub recent_clicks: Vec<ClickEvent>,
    pub recent_visits: Vec<VisitEvent>,
}

/// Clicks per link, sorted descending by count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCount {
    pub name: String,
    pub clicks: i64,
}

/// Visits per referrer platform, sorted descending by count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCount {
    pub platform: String,
    pub visits: i64,
}

/// Clicks on one UTC calendar date (`YYYY-MM-DD`). Dates without clicks are
/// omitted from the series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: String,
    pub clicks: i64,
}
