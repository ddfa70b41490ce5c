use std::collections::HashSet;

/// Fallback titles longer than this are truncated (in characters).
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 200;

/// Immutable per-message view of the externally owned configuration.
///
/// Taken once at the start of message processing so every URL in the same
/// message sees the same settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    domains: HashSet<String>,
    pub title_fallback_enabled: bool,
    pub max_title_length: usize,
}

impl ConfigSnapshot {
    /// Builds a snapshot. Allow-list entries are lowercased so membership is
    /// case-insensitive on both sides; empty entries are discarded.
    pub fn new<I, S>(domains: I, title_fallback_enabled: bool, max_title_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|domain| domain.as_ref().trim().to_ascii_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        Self {
            domains,
            title_fallback_enabled,
            max_title_length,
        }
    }

    /// Exact-match membership test: `sub.example.com` does not match a
    /// configured `example.com`. An empty allow-list monitors nothing.
    pub fn monitors(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>(), true, DEFAULT_MAX_TITLE_LENGTH)
    }
}
