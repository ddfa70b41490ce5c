use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Selector};

use crate::ExtractedContent;

static ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z").expect("timestamp pattern")
});

/// Pulls the human-readable pieces out of an oEmbed `html` fragment.
///
/// Provider convention: the first `<p>` holds the post text and the last
/// `<a>` is a permalink whose `href` embeds an ISO-8601 timestamp. A
/// fragment with no paragraph yields empty text and a fragment with no
/// usable anchor yields no timestamp; neither is a failure.
pub fn extract_content(fragment: &str) -> ExtractedContent {
    let doc = Html::parse_fragment(fragment);
    let p_sel = Selector::parse("p").ok();
    let a_sel = Selector::parse("a").ok();

    let text = p_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .map(|p| p.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let timestamp = a_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).last())
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| ISO_TIMESTAMP.find(href))
        .map(|found| normalize_timestamp(found.as_str()));

    ExtractedContent { text, timestamp }
}

/// `2024-01-01T12:00:00.000Z` -> `2024-01-01 12:00 UTC`. A substring that
/// matched the pattern but still fails to parse passes through unchanged.
fn normalize_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => instant
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(err) => {
            log::warn!("content: keeping unparsable timestamp {raw}: {err}");
            raw.to_string()
        }
    }
}
