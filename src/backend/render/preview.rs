/**
 * Link Previews
 *
 * Fetches a linked page and pulls its open-graph metadata into a small embed
 * block inserted right after the link.
 *
 * # Failure Handling
 *
 * Every failure (network error, timeout, non-success status, unreadable or
 * metadata-free page) means "no embed". Failures are logged at debug level
 * and never reach the client or interrupt rendering.
 *
 * # Extracted Metadata
 *
 * - `og:title`, `og:description`, `og:image` (`meta[property=...]`)
 * - `twitter:card` equal to `summary_large_image` marks a large image
 */
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::document::{Fragment, NodeId};
use crate::shared::config::RelayConfig;

const USER_AGENT: &str = concat!("limechat-preview/", env!("CARGO_PKG_VERSION"));

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[property="og:description"]"#));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:image"]"#));
static TWITTER_CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="twitter:card"]"#));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("metadata selectors are valid CSS")
}

/// Open-graph summary of a linked page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// `twitter:card` asked for a large image
    pub large_image: bool,
}

impl Preview {
    /// No title, description or image: nothing worth embedding
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.image.is_none()
    }
}

/// Preview fetch failures
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("scheme {0:?} cannot be previewed")]
    UnsupportedScheme(String),
}

/// Anything able to produce a preview for a URL
#[async_trait]
pub trait PreviewSource: Send + Sync {
    async fn fetch_preview(&self, url: &Url) -> Result<Preview, PreviewError>;
}

/// Fetches previews over HTTP with a bounded timeout and body size
#[derive(Debug, Clone)]
pub struct HttpPreviewFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpPreviewFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, PreviewError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, max_bytes })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, PreviewError> {
        Self::new(config.preview_timeout, config.preview_max_bytes)
    }
}

#[async_trait]
impl PreviewSource for HttpPreviewFetcher {
    async fn fetch_preview(&self, url: &Url) -> Result<Preview, PreviewError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PreviewError::UnsupportedScheme(url.scheme().to_string()));
        }

        let mut response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status(status));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = self.max_bytes.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= self.max_bytes {
                tracing::debug!("[Preview] Body of {} truncated at {} bytes", url, self.max_bytes);
                break;
            }
        }

        Ok(extract_preview(&String::from_utf8_lossy(&body)))
    }
}

/// Pull open-graph metadata out of an HTML document
///
/// The first matching tag wins. Blank values count as missing.
pub fn extract_preview(html: &str) -> Preview {
    let document = Html::parse_document(html);
    let content = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    Preview {
        title: content(&OG_TITLE),
        description: content(&OG_DESCRIPTION),
        image: content(&OG_IMAGE),
        large_image: content(&TWITTER_CARD).as_deref() == Some("summary_large_image"),
    }
}

/// Fetch a preview for `url`, folding every failure into `None`
pub async fn enrich(source: &dyn PreviewSource, url: &Url) -> Option<Preview> {
    match source.fetch_preview(url).await {
        Ok(preview) if preview.is_empty() => {
            tracing::debug!("[Preview] No metadata found at {}", url);
            None
        }
        Ok(preview) => Some(preview),
        Err(e) => {
            tracing::debug!("[Preview] Fetch of {} failed: {}", url, e);
            None
        }
    }
}

/// Insert `<br>` and an embed block right after `link`
pub fn attach_embed(doc: &mut Fragment, link: NodeId, preview: &Preview, trusted: bool) {
    let br = doc.create_element("br");
    doc.insert_after(link, br);

    let embed = doc.create_element("div");
    doc.add_class(embed, "embed");
    doc.add_class(embed, if trusted { "trusted" } else { "untrusted" });

    let title = doc.append_element(embed, "h4");
    doc.add_class(title, "embed-title");
    doc.append_text(title, preview.title.as_deref().unwrap_or_default());
    doc.append_element(embed, "br");

    let description = doc.append_element(embed, "h5");
    doc.add_class(description, "embed-description");
    doc.append_text(description, preview.description.as_deref().unwrap_or_default());
    doc.append_element(embed, "br");

    let image = doc.append_element(embed, "img");
    doc.add_class(image, "embed-image");
    if preview.large_image {
        doc.add_class(image, "large-img");
    }
    doc.set_attr(image, "src", preview.image.as_deref().unwrap_or_default());

    doc.insert_after(br, embed);
}
