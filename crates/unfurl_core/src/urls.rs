use std::sync::LazyLock;

use regex::Regex;

// The `$-_` range is deliberate: it spans the ASCII block that contains
// `/ : ; ? @ & + , . -` and uppercase letters, which is what lets paths and
// query strings match. Narrowing it to the literal characters breaks every
// URL with a path.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z0-9]|[$-_@.&+]|[!*'(),]|%[0-9a-fA-F]{2})+")
        .expect("url pattern")
});

/// Scans free-form text for `http`/`https` URLs.
///
/// Matches are non-overlapping, returned in source order, and never
/// deduplicated: a URL repeated in the text is resolved twice downstream.
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|found| found.as_str().to_string())
        .collect()
}
