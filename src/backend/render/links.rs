/**
 * Link Classification
 *
 * Walks the `<a>` elements of a rendered fragment, validates their `href`,
 * and tags each valid link `trusted-site` or `untrusted-site`. Trust is a
 * literal string-prefix match against a static allow-list and only drives
 * client-side styling; links are never removed or rewritten.
 */
use url::Url;

use super::document::{Fragment, NodeId};
use crate::shared::config::InvalidLinkPolicy;

pub const TRUSTED_CLASS: &str = "trusted-site";
pub const UNTRUSTED_CLASS: &str = "untrusted-site";

/// Allow-list of origin prefixes
#[derive(Debug, Clone, Default)]
pub struct TrustedOrigins {
    prefixes: Vec<String>,
}

impl TrustedOrigins {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact prefix match on the raw `href`; no host or scheme normalization
    pub fn is_trusted(&self, href: &str) -> bool {
        self.prefixes.iter().any(|prefix| href.starts_with(prefix.as_str()))
    }
}

/// A validated hyperlink found while rendering a message
#[derive(Debug, Clone)]
pub struct Link {
    /// The `<a>` element carrying the link
    pub node: NodeId,
    /// `href` exactly as it appears in the document
    pub href: String,
    pub url: Url,
    pub trusted: bool,
    /// Set once an embed has been inserted after the link
    pub preview_injected: bool,
}

impl Link {
    /// `javascript:` links are styled but never fetched
    pub fn is_script(&self) -> bool {
        self.url.scheme().eq_ignore_ascii_case("javascript")
    }

    /// Only plain web links are worth a preview fetch
    pub fn wants_preview(&self) -> bool {
        !self.is_script() && matches!(self.url.scheme(), "http" | "https")
    }
}

/// Annotate every valid link in `doc` and return them in document order
///
/// Links whose `href` is missing or not an absolute URL are left untouched.
/// With [`InvalidLinkPolicy::StopLinks`] the first such link also ends link
/// processing for the fragment; everything rendered so far is kept either way.
pub fn classify(doc: &mut Fragment, origins: &TrustedOrigins, policy: InvalidLinkPolicy) -> Vec<Link> {
    let mut links = Vec::new();
    for node in doc.elements_by_tag("a") {
        let parsed = doc
            .attr(node, "href")
            .and_then(|href| Url::parse(href).ok().map(|url| (href.to_string(), url)));
        let Some((href, url)) = parsed else {
            tracing::debug!("[Render] Skipping link without a valid absolute href");
            match policy {
                InvalidLinkPolicy::Skip => continue,
                InvalidLinkPolicy::StopLinks => break,
            }
        };

        let trusted = origins.is_trusted(&href);
        doc.add_class(node, if trusted { TRUSTED_CLASS } else { UNTRUSTED_CLASS });
        links.push(Link {
            node,
            href,
            url,
            trusted,
            preview_injected: false,
        });
    }
    links
}
