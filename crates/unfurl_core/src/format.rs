const ELLIPSIS: &str = "...";

/// One reply, in one of the two observed provider conventions.
///
/// `SocialPost` is used when the oEmbed payload carried an `html` fragment
/// that content extraction was run on; `StructuredCard` when it did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyContent {
    SocialPost {
        text: String,
        author: Option<String>,
        timestamp: Option<String>,
    },
    StructuredCard {
        title: Option<String>,
        author: Option<String>,
        provider: Option<String>,
    },
}

impl ReplyContent {
    /// Renders the display line, or `None` when no part is present.
    pub fn render(&self) -> Option<String> {
        let (parts, separator) = match self {
            ReplyContent::SocialPost {
                text,
                author,
                timestamp,
            } => {
                let mut parts = Vec::new();
                let text = normalize_whitespace(text);
                if !text.is_empty() {
                    parts.push(text);
                }
                if let Some(author) = present(author) {
                    parts.push(format!("-- {author}"));
                }
                if let Some(timestamp) = present(timestamp) {
                    parts.push(format!("({timestamp})"));
                }
                (parts, " ")
            }
            ReplyContent::StructuredCard {
                title,
                author,
                provider,
            } => {
                let mut parts = Vec::new();
                if let Some(title) = present(title) {
                    parts.push(title.to_string());
                }
                if let Some(author) = present(author) {
                    parts.push(format!("by {author}"));
                }
                if let Some(provider) = present(provider) {
                    parts.push(format!("via {provider}"));
                }
                (parts, " | ")
            }
        };

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(separator))
        }
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

/// Collapses runs of whitespace (including newlines) to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates a page title to at most `max_len` characters.
///
/// Over-long titles keep their first `max_len - 3` characters and gain a
/// `...` marker, so the result is exactly `max_len` characters; titles at or
/// under the limit pass through unmodified. Counting characters rather than
/// bytes keeps the cut off multi-byte boundaries.
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        return title.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
