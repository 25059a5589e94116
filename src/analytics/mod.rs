//! Visit and click analytics
//!
//! This module holds the ingestion-side helpers (client IP extraction,
//! referrer-to-platform classification) and the on-demand aggregation that
//! turns the raw event log into the operator dashboard summary.

pub mod aggregator;
pub mod ip_extractor;
pub mod models;
pub mod platform;

pub use aggregator::{aggregate, AggregateError};
pub use ip_extractor::extract_client_ip;
pub use models::{AnalyticsSummary, TimeFilter};
pub use platform::classify_referrer;
