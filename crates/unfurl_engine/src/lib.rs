//! Unfurl engine: the URL-to-summary resolution pipeline.
mod content;
mod fetch;
mod oembed;
mod pipeline;
mod title;
mod types;

pub use content::extract_content;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use oembed::{resolve_oembed, ResolveError};
pub use pipeline::{ConfigSource, Pipeline, ReplySink};
pub use title::{fetch_title, TitleError};
pub use types::{
    ExtractedContent, FailureKind, FetchError, FetchMetadata, FetchOutput, OEmbedPayload,
    UrlOutcome,
};
