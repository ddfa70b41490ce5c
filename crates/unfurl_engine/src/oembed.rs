use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::{FetchError, Fetcher, OEmbedPayload};

// Token match, not exact string: providers append parameters such as
// `; charset=utf-8` to the media type.
static OEMBED_MEDIA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)application/(json|xml)\+oembed").expect("oembed media type pattern")
});

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("page fetch failed: {0}")]
    PageFetch(#[source] FetchError),
    #[error("no oembed discovery link in page")]
    DiscoveryMissing,
    #[error("endpoint fetch failed: {0}")]
    EndpointFetch(#[source] FetchError),
    #[error("payload is not valid json: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Resolves a URL to its oEmbed payload: fetch the page, discover the
/// provider endpoint from a `<link>` with an oEmbed media type, fetch and
/// parse the endpoint's JSON. Every failure surfaces as a `ResolveError`;
/// the orchestrator treats them all as absence.
pub async fn resolve_oembed(
    fetcher: &dyn Fetcher,
    url: &str,
) -> Result<OEmbedPayload, ResolveError> {
    log::debug!("oembed: fetching page {url}");
    let page = fetcher.fetch(url).await.map_err(ResolveError::PageFetch)?;

    let endpoint_url = discovery_href(&page.body, &page.metadata.final_url)
        .ok_or(ResolveError::DiscoveryMissing)?;
    log::debug!("oembed: discovered endpoint {endpoint_url} for {url}");

    let endpoint = fetcher
        .fetch(&endpoint_url)
        .await
        .map_err(ResolveError::EndpointFetch)?;

    let payload: OEmbedPayload = serde_json::from_str(&endpoint.body)?;
    log::debug!("oembed: payload for {url}: {payload:?}");
    Ok(payload)
}

/// Absolute discovery URL from the first `<link>` whose `type` matches an
/// oEmbed media type. A relative `href` is resolved against the page URL.
fn discovery_href(page_html: &str, page_url: &str) -> Option<String> {
    let doc = Html::parse_document(page_html);
    let link_sel = Selector::parse("link").ok()?;
    let base = Url::parse(page_url).ok();

    for link in doc.select(&link_sel) {
        let element = link.value();
        let Some(media_type) = element.attr("type") else {
            continue;
        };
        if !OEMBED_MEDIA_TYPE.is_match(media_type) {
            continue;
        }
        let href = element
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty())?;
        return resolve_href(href, base.as_ref());
    }
    None
}

fn resolve_href(href: &str, base: Option<&Url>) -> Option<String> {
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.into());
    }
    base.and_then(|base| base.join(href).ok()).map(String::from)
}
