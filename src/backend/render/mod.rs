//! Rendering Pipeline
//!
//! Turns the untrusted markdown of a submitted message into the HTML string
//! that is stored and fanned out.
//!
//! # Stages
//!
//! 1. **Truncate** to the configured character limit
//! 2. **Markdown** (`markdown`) on pre-escaped input, into a [`Fragment`]
//! 3. **Spoilers** mark `language-spoiler` code blocks
//! 4. **Links** (`links`) classify every `<a>` as trusted or untrusted
//! 5. **Previews** (`preview`) fetched concurrently, embeds inserted
//! 6. **Serialize** the fragment once
//!
//! # Module Structure
//!
//! ```text
//! render/
//! ├── mod.rs       - Renderer assembling the stages
//! ├── document.rs  - Arena HTML tree
//! ├── markdown.rs  - Markdown to tree, spoiler marking
//! ├── links.rs     - Link trust classification
//! └── preview.rs   - Open-graph previews and embed markup
//! ```

/// Arena HTML tree
pub mod document;

/// Markdown rendering and spoiler marking
pub mod markdown;

/// Link trust classification
pub mod links;

/// Link previews
pub mod preview;

use std::sync::Arc;

use futures_util::future::join_all;

use crate::shared::config::{InvalidLinkPolicy, RelayConfig};
use crate::shared::message::truncate_chars;

pub use document::{Fragment, NodeId};
pub use links::{Link, TrustedOrigins};
pub use preview::{HttpPreviewFetcher, Preview, PreviewError, PreviewSource};

/// Output of a full render
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    /// Valid links in document order
    pub links: Vec<Link>,
}

/// The configured pipeline, shared by every connection
#[derive(Clone)]
pub struct Renderer {
    origins: TrustedOrigins,
    previews: Arc<dyn PreviewSource>,
    policy: InvalidLinkPolicy,
    max_content_chars: usize,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("origins", &self.origins)
            .field("policy", &self.policy)
            .field("max_content_chars", &self.max_content_chars)
            .finish_non_exhaustive()
    }
}

impl Renderer {
    pub fn new(config: &RelayConfig, previews: Arc<dyn PreviewSource>) -> Self {
        Self {
            origins: TrustedOrigins::new(config.trusted_origins.iter().cloned()),
            previews,
            policy: config.invalid_link_policy,
            max_content_chars: config.max_content_chars,
        }
    }

    /// Offline stages only: truncate, markdown and spoilers
    pub fn render(&self, raw: &str) -> Fragment {
        let text = truncate_chars(raw, self.max_content_chars);
        let mut doc = markdown::render_markdown(text);
        let spoilers = markdown::mark_spoilers(&mut doc);
        if spoilers > 0 {
            tracing::debug!("[Render] Marked {} spoiler block(s)", spoilers);
        }
        doc
    }

    /// Full pipeline, returning only the HTML
    pub async fn render_html(&self, raw: &str) -> String {
        self.render_with_links(raw).await.html
    }

    /// Full pipeline
    ///
    /// Resolves once every preview fetch for the message has finished,
    /// successfully or not.
    pub async fn render_with_links(&self, raw: &str) -> Rendered {
        let mut doc = self.render(raw);
        let mut links = links::classify(&mut doc, &self.origins, self.policy);

        let fetches = links.iter().map(|link| async move {
            if link.wants_preview() {
                preview::enrich(self.previews.as_ref(), &link.url).await
            } else {
                None
            }
        });
        let previews = join_all(fetches).await;

        for (link, preview) in links.iter_mut().zip(previews) {
            if let Some(preview) = preview {
                preview::attach_embed(&mut doc, link.node, &preview, link.trusted);
                link.preview_injected = true;
            }
        }

        let embeds = links.iter().filter(|link| link.preview_injected).count();
        tracing::debug!("[Render] {} link(s), {} embed(s)", links.len(), embeds);

        Rendered {
            html: doc.to_html(),
            links,
        }
    }
}
