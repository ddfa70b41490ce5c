use std::fmt;

use serde::Deserialize;

/// Decoded response to one HTTP GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub body: String,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    /// URL after redirects; relative references are resolved against this.
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
    pub encoding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode { encoding: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode { encoding } => {
                write!(f, "body not decodable as {encoding}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Parsed oEmbed payload. Providers populate these fields independently;
/// nothing downstream may assume any particular combination is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OEmbedPayload {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub provider_name: Option<String>,
}

/// Human-readable pieces pulled out of an oEmbed `html` fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// First paragraph's text, trimmed; empty when the fragment has none.
    pub text: String,
    /// Normalized permalink timestamp, when the trailing anchor carried one.
    pub timestamp: Option<String>,
}

/// Terminal state of one URL's trip through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOutcome {
    RepliedOEmbed,
    RepliedTitle,
    Silent,
}
