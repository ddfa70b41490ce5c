use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use unfurl_core::ConfigSnapshot;
use unfurl_engine::{
    ConfigSource, FetchSettings, Pipeline, ReplySink, ReqwestFetcher, UrlOutcome,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct StaticConfig {
    enabled: bool,
    snapshot: ConfigSnapshot,
}

impl ConfigSource for StaticConfig {
    fn is_channel_enabled(&self, _channel_id: &str) -> bool {
        self.enabled
    }

    fn snapshot(&self) -> ConfigSnapshot {
        self.snapshot.clone()
    }
}

/// Allow-list containing the mock server's host, so its URLs are monitored.
fn monitoring(title_fallback: bool, max_title_length: usize) -> StaticConfig {
    StaticConfig {
        enabled: true,
        snapshot: ConfigSnapshot::new(["127.0.0.1"], title_fallback, max_title_length),
    }
}

/// Allow-list that does not contain the mock server's host.
fn unmonitored(title_fallback: bool) -> StaticConfig {
    StaticConfig {
        enabled: true,
        snapshot: ConfigSnapshot::new(["bsky.app"], title_fallback, 200),
    }
}

#[derive(Default)]
struct CollectingSink {
    replies: Mutex<Vec<String>>,
}

impl CollectingSink {
    fn take(&self) -> Vec<String> {
        self.replies.lock().unwrap().drain(..).collect()
    }
}

impl ReplySink for CollectingSink {
    fn emit(&self, text: &str) {
        self.replies.lock().unwrap().push(text.to_string());
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(Arc::new(ReqwestFetcher::new(FetchSettings::default())))
}

async fn mount_html(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn mount_json(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(server)
        .await;
}

fn discovery_page(server: &MockServer) -> String {
    format!(
        r#"<html><head>
        <link rel="alternate" type="application/json+oembed" href="{}/oembed">
        <title>Example</title>
        </head><body></body></html>"#,
        server.uri()
    )
}

#[tokio::test]
async fn monitored_url_gets_a_social_post_reply() {
    unfurl_logging::initialize_for_tests();
    let server = MockServer::start().await;
    mount_html(&server, "/profile/x/post/1", discovery_page(&server)).await;
    mount_json(
        &server,
        "/oembed",
        r#"{"html": "<p>Hello world</p><a href='https://bsky.app/profile/x/post/1/2024-01-01T12:00:00.000Z'>link</a>", "author_name": "Alice"}"#,
    )
    .await;

    let sink = CollectingSink::default();
    let message = format!("check this {}/profile/x/post/1", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(true, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedOEmbed]);
    assert_eq!(
        sink.take(),
        vec!["Hello world -- Alice (2024-01-01 12:00 UTC)".to_string()]
    );
}

#[tokio::test]
async fn unmonitored_url_falls_back_to_the_page_title() {
    let server = MockServer::start().await;
    mount_html(&server, "/post", discovery_page(&server)).await;

    let sink = CollectingSink::default();
    let message = format!("check this {}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &unmonitored(true), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    assert_eq!(sink.take(), vec!["Title: Example".to_string()]);
}

#[tokio::test]
async fn oembed_failure_with_fallback_disabled_stays_silent() {
    let server = MockServer::start().await;
    // nothing mounted: the page fetch itself 404s

    let sink = CollectingSink::default();
    let message = format!("{}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(false, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::Silent]);
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn disabled_channel_ignores_the_message() {
    let config = StaticConfig {
        enabled: false,
        snapshot: ConfigSnapshot::default(),
    };
    let sink = CollectingSink::default();
    let outcomes = pipeline()
        .process_message("#chat", "https://bsky.app/profile/x/post/1", &config, &sink)
        .await;

    assert!(outcomes.is_empty());
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn one_failing_url_does_not_abort_its_siblings() {
    let server = MockServer::start().await;
    mount_html(&server, "/good", discovery_page(&server)).await;
    mount_json(&server, "/oembed", r#"{"html": "<p>Still here</p>"}"#).await;

    let sink = CollectingSink::default();
    let message = format!("{0}/bad and {0}/good", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(false, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::Silent, UrlOutcome::RepliedOEmbed]);
    assert_eq!(sink.take(), vec!["Still here".to_string()]);
}

#[tokio::test]
async fn unformattable_payload_falls_through_to_the_title() {
    let server = MockServer::start().await;
    mount_html(&server, "/post", discovery_page(&server)).await;
    mount_json(&server, "/oembed", r#"{"html": "<div></div>"}"#).await;

    let sink = CollectingSink::default();
    let message = format!("{}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(true, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    assert_eq!(sink.take(), vec!["Title: Example".to_string()]);
}

#[tokio::test]
async fn missing_discovery_link_falls_back_to_the_title() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/post",
        "<html><head><title>Example</title></head><body></body></html>".to_string(),
    )
    .await;

    let sink = CollectingSink::default();
    let message = format!("{}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(true, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    assert_eq!(sink.take(), vec!["Title: Example".to_string()]);
}

#[tokio::test]
async fn unreachable_discovery_endpoint_falls_back_to_the_title() {
    let server = MockServer::start().await;
    let page = format!(
        r#"<html><head>
        <link rel="alternate" type="application/json+oembed" href="{}/gone">
        <title>Example</title>
        </head><body></body></html>"#,
        server.uri()
    );
    mount_html(&server, "/post", page).await;
    // nothing mounted at /gone -> 404

    let sink = CollectingSink::default();
    let message = format!("{}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(true, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    assert_eq!(sink.take(), vec!["Title: Example".to_string()]);
}

#[tokio::test]
async fn malformed_oembed_payload_falls_back_to_the_title() {
    let server = MockServer::start().await;
    mount_html(&server, "/post", discovery_page(&server)).await;
    Mock::given(method("GET"))
        .and(path("/oembed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&server)
        .await;

    let sink = CollectingSink::default();
    let message = format!("{}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &monitoring(true, 200), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    assert_eq!(sink.take(), vec!["Title: Example".to_string()]);
}

#[tokio::test]
async fn fallback_title_is_truncated_to_the_configured_length() {
    let server = MockServer::start().await;
    let long_title = "x".repeat(250);
    mount_html(
        &server,
        "/long",
        format!("<html><head><title>{long_title}</title></head></html>"),
    )
    .await;

    let sink = CollectingSink::default();
    let message = format!("{}/long", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &unmonitored(true), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::RepliedTitle]);
    let replies = sink.take();
    assert_eq!(replies.len(), 1);
    let reply = &replies[0];
    assert!(reply.starts_with("Title: "));
    assert!(reply.ends_with("..."));
    assert_eq!(reply.chars().count(), "Title: ".len() + 200);
}

#[tokio::test]
async fn repeated_url_is_resolved_twice() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/post",
        "<html><head><title>Example</title></head></html>".to_string(),
    )
    .await;

    let sink = CollectingSink::default();
    let message = format!("{0}/post and again {0}/post", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &unmonitored(true), &sink)
        .await;

    assert_eq!(
        outcomes,
        vec![UrlOutcome::RepliedTitle, UrlOutcome::RepliedTitle]
    );
    assert_eq!(
        sink.take(),
        vec!["Title: Example".to_string(), "Title: Example".to_string()]
    );
}

#[tokio::test]
async fn page_without_title_stays_silent() {
    let server = MockServer::start().await;
    mount_html(&server, "/bare", "<html><body>no head</body></html>".to_string()).await;

    let sink = CollectingSink::default();
    let message = format!("{}/bare", server.uri());
    let outcomes = pipeline()
        .process_message("#chat", &message, &unmonitored(true), &sink)
        .await;

    assert_eq!(outcomes, vec![UrlOutcome::Silent]);
    assert!(sink.take().is_empty());
}
