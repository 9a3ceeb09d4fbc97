//! Link preview integration tests
//!
//! Previews are served by a wiremock server on localhost, so every link
//! under test is untrusted.

use std::sync::Arc;
use std::time::{Duration, Instant};

use limechat::backend::render::{HttpPreviewFetcher, PreviewSource, Renderer};
use limechat::shared::RelayConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{og_page, spawn_relay, ChatClient};

fn renderer_with_timeout(timeout: Duration) -> Renderer {
    let config = RelayConfig::builder().preview_timeout(timeout).build().unwrap();
    let fetcher: Arc<dyn PreviewSource> = Arc::new(HttpPreviewFetcher::from_config(&config).unwrap());
    Renderer::new(&config, fetcher)
}

fn renderer() -> Renderer {
    renderer_with_timeout(Duration::from_secs(5))
}

async fn serve_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_embed_inserted_after_link() {
    let server = MockServer::start().await;
    serve_page(
        &server,
        "/article",
        og_page("Release & notes", "All the <new> things", "https://img.test/cover.png", Some("summary_large_image")),
    )
    .await;

    let url = format!("{}/article", server.uri());
    let html = renderer().render_html(&format!("read [this]({url}) today")).await;

    crate::assert_contains!(
        html,
        format!(
            "<a class=\"untrusted-site\" href=\"{url}\">this</a><br>\
             <div class=\"embed untrusted\"><h4 class=\"embed-title\">Release &amp; notes</h4><br>\
             <h5 class=\"embed-description\">All the &lt;new&gt; things</h5><br>\
             <img class=\"embed-image large-img\" src=\"https://img.test/cover.png\"></div> today"
        )
    );
}

#[tokio::test]
async fn test_bare_url_gets_embed() {
    let server = MockServer::start().await;
    serve_page(&server, "/", og_page("Home", "", "", None)).await;

    let html = renderer().render_html(&format!("see {}/ now.", server.uri())).await;
    crate::assert_contains!(html, "<h4 class=\"embed-title\">Home</h4>");
    crate::assert_contains!(html, "<img class=\"embed-image\" src=\"\">");
    assert!(html.ends_with("</div> now.</p>\n"));
}

#[tokio::test]
async fn test_page_without_metadata_gets_no_embed() {
    let server = MockServer::start().await;
    serve_page(&server, "/plain", "<html><head><title>x</title></head></html>".to_string()).await;

    let html = renderer()
        .render_html(&format!("[plain]({}/plain)", server.uri()))
        .await;
    assert!(!html.contains("embed"));
}

#[tokio::test]
async fn test_error_status_gets_no_embed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(og_page("t", "d", "i", None), "text/html"))
        .mount(&server)
        .await;

    let html = renderer()
        .render_html(&format!("[gone]({}/gone)", server.uri()))
        .await;
    assert!(!html.contains("embed"));
    crate::assert_contains!(html, "untrusted-site");
}

#[tokio::test]
async fn test_unreachable_host_gets_no_embed() {
    let html = renderer().render_html("[down](http://127.0.0.1:1/)").await;
    assert_eq!(
        html,
        "<p><a class=\"untrusted-site\" href=\"http://127.0.0.1:1/\">down</a></p>\n"
    );
}

#[tokio::test]
async fn test_slow_preview_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(og_page("late", "d", "i", None), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = Instant::now();
    let html = renderer_with_timeout(Duration::from_millis(200))
        .render_html(&format!("[slow]({}/)", server.uri()))
        .await;

    assert!(!html.contains("embed"));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_previews_fetched_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(og_page("t", "d", "i", None), "text/html")
                .set_delay(Duration::from_millis(500)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let uri = server.uri();
    let started = Instant::now();
    let rendered = renderer()
        .render_with_links(&format!("[a]({uri}/a) [b]({uri}/b) [c]({uri}/c)"))
        .await;

    assert!(rendered.links.iter().all(|link| link.preview_injected));
    assert!(started.elapsed() < Duration::from_millis(1400));
}

#[tokio::test]
async fn test_oversized_body_is_capped() {
    let server = MockServer::start().await;
    let padding = format!("<!-- {} -->", "x".repeat(64 * 1024));
    serve_page(&server, "/big", format!("{padding}{}", og_page("Late", "d", "i", None))).await;
    let url = url::Url::parse(&format!("{}/big", server.uri())).unwrap();

    let capped = RelayConfig::builder().preview_max_bytes(4096).build().unwrap();
    let preview = HttpPreviewFetcher::from_config(&capped)
        .unwrap()
        .fetch_preview(&url)
        .await
        .unwrap();
    assert!(preview.is_empty());

    let uncapped = HttpPreviewFetcher::from_config(&RelayConfig::default())
        .unwrap()
        .fetch_preview(&url)
        .await
        .unwrap();
    assert_eq!(uncapped.title.as_deref(), Some("Late"));
}

#[tokio::test]
async fn test_broadcast_waits_for_previews() {
    let server = MockServer::start().await;
    serve_page(&server, "/p", og_page("Embedded", "d", "https://img.test/i.png", None)).await;

    let config = RelayConfig::default();
    let fetcher: Arc<dyn PreviewSource> = Arc::new(HttpPreviewFetcher::from_config(&config).unwrap());
    let relay = spawn_relay(config, fetcher).await;
    let mut alice = ChatClient::connect(&relay).await;

    alice
        .send_message(&format!("[p]({}/p)", server.uri()), "Alice")
        .await;
    let message = alice.next_json().await;
    let content = message["content"].as_str().unwrap();
    crate::assert_contains!(content, "<h4 class=\"embed-title\">Embedded</h4>");

    let history = alice.history().await;
    assert_eq!(history[0]["content"], message["content"]);
}

#[tokio::test]
async fn test_slow_preview_does_not_hold_up_other_connections() {
    let delay = Duration::from_secs(2);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(og_page("Slow", "d", "", None), "text/html")
                .set_delay(delay),
        )
        .mount(&server)
        .await;

    let config = RelayConfig::default();
    let fetcher: Arc<dyn PreviewSource> = Arc::new(HttpPreviewFetcher::from_config(&config).unwrap());
    let relay = spawn_relay(config, fetcher).await;
    let mut alice = ChatClient::connect(&relay).await;
    let mut bob = ChatClient::connect(&relay).await;

    let started = Instant::now();
    alice
        .send_message(&format!("[slow]({}/slow)", server.uri()), "Alice")
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    bob.send_message("quick", "Bob").await;

    let first = bob.next_json().await;
    assert_eq!(first["content"], "<p>quick</p>\n");
    assert!(started.elapsed() < delay / 2, "plain message took {:?}", started.elapsed());

    let second = bob.next_json().await;
    crate::assert_contains!(second["content"].as_str().unwrap(), "<h4 class=\"embed-title\">Slow</h4>");
    assert!(started.elapsed() >= delay);
}
