//! Referrer-to-platform classification

use url::Url;

/// Ordered substring table mapping referrer URLs to platform labels.
/// First match wins, so more specific domains come before catch-alls.
const PLATFORMS: &[(&[&str], &str)] = &[
    (&["twitter.com", "t.co", "x.com"], "Twitter/X"),
    (&["linkedin.com"], "LinkedIn"),
    (&["instagram.com"], "Instagram"),
    (&["facebook.com", "fb.com"], "Facebook"),
    (&["medium.com"], "Medium"),
    (&["github.com"], "GitHub"),
    (&["youtube.com", "youtu.be"], "YouTube"),
    (&["tiktok.com"], "TikTok"),
    (&["reddit.com"], "Reddit"),
    (&["discord.com", "discord.gg"], "Discord"),
    (&["telegram.org", "t.me"], "Telegram"),
    (&["whatsapp.com"], "WhatsApp"),
    (&["google.com"], "Google Search"),
    (&["bing.com"], "Bing Search"),
    (&["duckduckgo.com"], "DuckDuckGo"),
];

/// Classify a referrer URL into a coarse platform label.
///
/// Returns `None` only for an absent or empty referrer. Unrecognized but
/// parseable URLs classify as their hostname (leading `www.` stripped);
/// unparseable strings classify as `"Unknown"`. Pure and total.
pub fn classify_referrer(referrer: Option<&str>) -> Option<String> {
    let referrer = referrer?;
    if referrer.is_empty() {
        return None;
    }

    let lowered = referrer.to_lowercase();
    for (needles, label) in PLATFORMS {
        if needles.iter().any(|needle| lowered.contains(needle)) {
            return Some((*label).to_string());
        }
    }

    let label = match Url::parse(referrer) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => "Unknown".to_string(),
        },
        Err(_) => "Unknown".to_string(),
    };

    Some(label)
}
