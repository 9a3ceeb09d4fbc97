//! Deterministic preview sources

use async_trait::async_trait;
use limechat::backend::render::{Preview, PreviewError, PreviewSource};
use url::Url;

/// Fails every fetch
pub struct NoPreviews;

#[async_trait]
impl PreviewSource for NoPreviews {
    async fn fetch_preview(&self, url: &Url) -> Result<Preview, PreviewError> {
        Err(PreviewError::UnsupportedScheme(url.scheme().to_string()))
    }
}

/// Answers every fetch with the same preview
pub struct StaticPreview(pub Preview);

#[async_trait]
impl PreviewSource for StaticPreview {
    async fn fetch_preview(&self, _url: &Url) -> Result<Preview, PreviewError> {
        Ok(self.0.clone())
    }
}

/// A page carrying open-graph metadata
pub fn og_page(title: &str, description: &str, image: &str, card: Option<&str>) -> String {
    let card = card
        .map(|card| format!(r#"<meta name="twitter:card" content="{}">"#, card))
        .unwrap_or_default();
    format!(
        r#"<!doctype html><html><head>
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:image" content="{image}">
{card}
</head><body><p>page</p></body></html>"#
    )
}
