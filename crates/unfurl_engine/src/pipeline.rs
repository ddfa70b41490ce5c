use std::sync::Arc;

use unfurl_core::{extract_urls, normalized_domain, ConfigSnapshot, ReplyContent};

use crate::content::extract_content;
use crate::{oembed, title, Fetcher, OEmbedPayload, UrlOutcome};

/// Externally owned configuration, read once per message.
pub trait ConfigSource: Send + Sync {
    fn is_channel_enabled(&self, channel_id: &str) -> bool;
    fn snapshot(&self) -> ConfigSnapshot;
}

/// Hands a formatted line to the chat transport. At most one line is
/// emitted per resolved URL; the pipeline never addresses a user.
pub trait ReplySink: Send + Sync {
    fn emit(&self, text: &str);
}

pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Processes one chat message: extracts URLs and resolves each in
    /// extraction order, sequentially. Every stage reports failure as a
    /// value, so one URL's failure never aborts its siblings; on total
    /// failure for a URL the pipeline stays silent rather than posting an
    /// error to chat.
    pub async fn process_message(
        &self,
        channel_id: &str,
        text: &str,
        config: &dyn ConfigSource,
        sink: &dyn ReplySink,
    ) -> Vec<UrlOutcome> {
        if !config.is_channel_enabled(channel_id) {
            log::debug!("pipeline: channel {channel_id} disabled, ignoring message");
            return Vec::new();
        }
        // One snapshot per message: every URL sees consistent settings.
        let snapshot = config.snapshot();

        let urls = extract_urls(text);
        log::debug!("pipeline: {} url(s) in message on {channel_id}", urls.len());

        let mut outcomes = Vec::with_capacity(urls.len());
        for url in &urls {
            let outcome = self.handle_url(url, &snapshot, sink).await;
            log::debug!("pipeline: {url} -> {outcome:?}");
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn handle_url(
        &self,
        url: &str,
        snapshot: &ConfigSnapshot,
        sink: &dyn ReplySink,
    ) -> UrlOutcome {
        let domain = normalized_domain(url);

        // The allow-list gates the oEmbed attempt, not the URL: anything
        // outside it goes straight to the title fallback.
        if snapshot.monitors(&domain) {
            match oembed::resolve_oembed(self.fetcher.as_ref(), url).await {
                Ok(payload) => {
                    if let Some(reply) = reply_for_payload(&payload) {
                        sink.emit(&reply);
                        return UrlOutcome::RepliedOEmbed;
                    }
                    // A payload with nothing to show falls through: a title
                    // reply conveys more value than silence.
                    log::debug!("pipeline: unformattable oembed payload for {url}");
                }
                Err(err) => log::warn!("pipeline: oembed resolution failed for {url}: {err}"),
            }
        } else {
            log::debug!("pipeline: domain {domain:?} not monitored, skipping oembed for {url}");
        }

        if !snapshot.title_fallback_enabled {
            return UrlOutcome::Silent;
        }
        match title::fetch_title(self.fetcher.as_ref(), url, snapshot.max_title_length).await {
            Ok(page_title) => {
                sink.emit(&format!("Title: {page_title}"));
                UrlOutcome::RepliedTitle
            }
            Err(err) => {
                log::warn!("pipeline: title fallback failed for {url}: {err}");
                UrlOutcome::Silent
            }
        }
    }
}

/// Style selection: a payload carrying an `html` fragment formats as a
/// social post built from the extracted content; one without formats as a
/// structured card from the payload's own fields.
fn reply_for_payload(payload: &OEmbedPayload) -> Option<String> {
    let reply = match payload.html.as_deref() {
        Some(fragment) => {
            let content = extract_content(fragment);
            ReplyContent::SocialPost {
                text: content.text,
                author: payload.author_name.clone(),
                timestamp: content.timestamp,
            }
        }
        None => ReplyContent::StructuredCard {
            title: payload.title.clone(),
            author: payload.author_name.clone(),
            provider: payload.provider_name.clone(),
        },
    };
    reply.render()
}
