//! Client IP extraction from proxy headers
//!
//! The service always sits behind a reverse proxy, so the client address
//! comes from `X-Forwarded-For` (first entry) with `X-Real-IP` as fallback.
//! Both headers are client-influencable and untrusted: anything that does not
//! parse as an IP literal is discarded rather than stored as a placeholder.
//! Validation delegates to [`std::net::IpAddr`], so full IPv6 literal syntax
//! (including `::` zero compression) is accepted.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract and validate the client IP address from proxy headers.
///
/// Returns `None` when no header is present or the candidate value is not a
/// syntactically valid IPv4/IPv6 literal. Never fails: a garbage header must
/// not block event ingestion.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let candidate = forwarded_for_entry(headers).or_else(|| real_ip_entry(headers))?;
    candidate.parse::<IpAddr>().ok()
}

/// First comma-separated entry of `X-Forwarded-For`, if non-empty.
fn forwarded_for_entry(headers: &HeaderMap) -> Option<String> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = xff.split(',').next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(first.to_string())
    }
}

fn real_ip_entry(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-real-ip")?.to_str().ok()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
