use scraper::{Html, Selector};
use unfurl_core::truncate_title;

use crate::{FetchError, Fetcher};

#[derive(Debug, thiserror::Error)]
pub enum TitleError {
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("page has no title")]
    Missing,
}

/// Secondary resolution path: the page's `<title>` text, trimmed and
/// truncated to `max_len` characters.
pub async fn fetch_title(
    fetcher: &dyn Fetcher,
    url: &str,
    max_len: usize,
) -> Result<String, TitleError> {
    log::debug!("title: attempting fallback for {url}");
    let page = fetcher.fetch(url).await?;

    let doc = Html::parse_document(&page.body);
    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .ok_or(TitleError::Missing)?;

    Ok(truncate_title(&title, max_len))
}
