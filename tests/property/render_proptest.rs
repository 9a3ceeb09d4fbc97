//! Property-based tests for the offline rendering stages
//!
//! Whatever the input, the output may only contain the elements and
//! attributes the renderer itself creates.

use std::sync::{Arc, LazyLock};

use limechat::backend::render::markdown::render_markdown;
use limechat::backend::render::{Preview, PreviewError, PreviewSource, Renderer};
use limechat::shared::RelayConfig;
use proptest::prelude::*;
use regex::Regex;
use url::Url;

const ALLOWED_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "em", "strong", "del", "a", "code", "pre",
    "blockquote", "ul", "ol", "li", "hr", "br", "img", "input", "table", "thead", "tbody", "tr",
    "th", "td",
];

const ALLOWED_ATTRS: &[&str] = &[
    "class", "href", "title", "src", "alt", "type", "checked", "disabled", "start", "align",
    "onclick",
];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").unwrap());
static ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s([a-zA-Z-]+)="[^"]*""#).unwrap());

struct Offline;

#[async_trait::async_trait]
impl PreviewSource for Offline {
    async fn fetch_preview(&self, url: &Url) -> Result<Preview, PreviewError> {
        Err(PreviewError::UnsupportedScheme(url.scheme().to_string()))
    }
}

fn hostile_input() -> impl Strategy<Value = String> {
    let pieces = prop_oneof![
        Just("<script>alert(1)</script>".to_string()),
        Just("<img src=x onerror=alert(1)>".to_string()),
        Just("<a href=\"javascript:alert(1)\">x</a>".to_string()),
        Just("\"'&<> `<b>`".to_string()),
        Just("```spoiler\nhidden\n```\n".to_string()),
        Just("[t](https://vuejs.org/)".to_string()),
        Just("https://example.com/a?b=1&c=2".to_string()),
        Just("| a | b |\n|---|---|\n| 1 | 2 |\n".to_string()),
        Just("- [x] done\n".to_string()),
        "[ -~\\n]{0,30}",
    ];
    prop::collection::vec(pieces, 0..8).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn test_only_known_markup_is_emitted(input in hostile_input()) {
        let html = render_markdown(&input).to_html();
        for tag in TAG.captures_iter(&html) {
            prop_assert!(ALLOWED_TAGS.contains(&&tag[1]), "unexpected tag {} in {}", &tag[1], html);
            for attr in ATTR.captures_iter(&tag[2]) {
                prop_assert!(ALLOWED_ATTRS.contains(&&attr[1]), "unexpected attribute {} in {}", &attr[1], html);
            }
        }
    }

    #[test]
    fn test_onclick_only_on_spoilers(input in hostile_input()) {
        let renderer = Renderer::new(&RelayConfig::default(), Arc::new(Offline));
        let html = renderer.render(&input).to_html();
        let onclicks = html.matches(" onclick=\"").count();
        let spoilers = html.matches("<code class=\"language-spoiler spoilered\" onclick=\"").count();
        prop_assert_eq!(onclicks, spoilers);
    }

    #[test]
    fn test_arbitrary_text_renders_without_panicking(input in "\\PC{0,300}") {
        let renderer = Renderer::new(&RelayConfig::default(), Arc::new(Offline));
        let html = renderer.render(&input).to_html();
        prop_assert!(!html.contains("<script"));
    }
}
