/**
 * Markdown Rendering
 *
 * Turns untrusted message text into a [`Fragment`].
 *
 * The raw text is HTML-escaped first and markdown is interpreted on top of
 * the escaped text, so angle brackets, quotes and ampersands typed by users
 * can never become markup. Raw HTML events are dropped outright.
 *
 * Dialect: CommonMark with GFM tables, strikethrough and task lists. Bare
 * `http(s)://` URLs in running text are turned into links.
 */
use std::sync::LazyLock;

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use regex::Regex;

use super::document::{push_escaped, Fragment, NodeId};

/// Class pulldown-style code blocks get for a ```` ```spoiler ```` fence
pub const SPOILER_LANGUAGE_CLASS: &str = "language-spoiler";
/// Class marking a spoiler as hidden until revealed
pub const SPOILERED_CLASS: &str = "spoilered";
/// Click handler revealing a spoiler on the client
pub const SPOILER_TOGGLE: &str = "this.classList.toggle('show')";

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://[^\s<>]+").expect("bare URL pattern is valid"));

/// Sentence punctuation that ends a bare URL rather than belonging to it
const URL_TRAILERS: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', ']', '*', '_', '~'];

/// HTML-escape raw user text before markdown sees it
pub fn escape_input(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    push_escaped(&mut escaped, text);
    escaped.replace('\'', "&#39;")
}

/// Reverse [`escape_input`]
///
/// Code spans and code blocks keep entity references verbatim, so their text
/// is unescaped here and escaped once more on serialization.
fn undo_input_escape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Escape `text` and render it as markdown into a new fragment
pub fn render_markdown(text: &str) -> Fragment {
    let escaped = escape_input(text);

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(&escaped, options) {
        builder.push(event);
    }
    builder.finish()
}

/// Mark every ```` ```spoiler ```` code block as hidden with a reveal toggle
///
/// Returns the number of blocks marked.
pub fn mark_spoilers(doc: &mut Fragment) -> usize {
    let spoilers: Vec<NodeId> = doc
        .elements_by_tag("code")
        .into_iter()
        .filter(|&id| doc.has_class(id, SPOILER_LANGUAGE_CLASS))
        .collect();
    for &id in &spoilers {
        doc.add_class(id, SPOILERED_CLASS);
        doc.set_attr(id, "onclick", SPOILER_TOGGLE);
    }
    spoilers.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Block,
    Link,
    Code,
    Image,
    Table,
    TableHead,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: NodeId,
    kind: FrameKind,
}

#[derive(Debug)]
struct TableState {
    node: NodeId,
    alignments: Vec<Alignment>,
    body: Option<NodeId>,
    in_head: bool,
    cell: usize,
}

/// Builds a fragment from a pulldown-cmark event stream
struct TreeBuilder {
    doc: Fragment,
    stack: Vec<Frame>,
    /// Consecutive text events, flushed as one run
    pending_text: String,
    /// Stack index of the image whose alt text is being collected
    alt: Option<(usize, String)>,
    table: Option<TableState>,
}

impl TreeBuilder {
    fn new() -> Self {
        let doc = Fragment::new();
        let root = doc.root();
        Self {
            doc,
            stack: vec![Frame {
                node: root,
                kind: FrameKind::Block,
            }],
            pending_text: String::new(),
            alt: None,
            table: None,
        }
    }

    fn current(&self) -> Frame {
        self.stack.last().copied().unwrap_or(Frame {
            node: self.doc.root(),
            kind: FrameKind::Block,
        })
    }

    fn push(&mut self, event: Event<'_>) {
        if self.alt.is_some() {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, alt)) = self.alt.as_mut() {
                        alt.push_str(&text);
                    }
                }
                Event::Start(_) => {
                    let top = self.current();
                    self.stack.push(transparent(top.node));
                }
                Event::End(_) => self.close(),
                _ => {}
            }
            return;
        }

        if let Event::Text(text) = &event {
            self.pending_text.push_str(text);
            return;
        }
        self.flush_text();

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Code(code) => {
                let parent = self.current().node;
                let el = self.doc.append_element(parent, "code");
                self.doc.append_text(el, &undo_input_escape(&code));
            }
            Event::SoftBreak => {
                let parent = self.current().node;
                self.doc.append_text(parent, "\n");
            }
            Event::HardBreak => {
                let parent = self.current().node;
                self.doc.append_element(parent, "br");
            }
            Event::Rule => {
                let parent = self.current().node;
                self.doc.append_element(parent, "hr");
            }
            Event::TaskListMarker(checked) => {
                let parent = self.current().node;
                let input = self.doc.append_element(parent, "input");
                self.doc.set_attr(input, "type", "checkbox");
                self.doc.set_attr(input, "disabled", "");
                if checked {
                    self.doc.set_attr(input, "checked", "");
                }
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                tracing::trace!("[Render] Dropping raw HTML event ({} bytes)", html.len());
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let parent = self.current().node;
        let frame = match tag {
            Tag::Paragraph => self.block(parent, "p"),
            Tag::Heading { level, .. } => self.block(parent, heading_tag(level)),
            Tag::BlockQuote(_) => self.block(parent, "blockquote"),
            Tag::CodeBlock(kind) => {
                let pre = self.doc.append_element(parent, "pre");
                let code = self.doc.append_element(pre, "code");
                if let CodeBlockKind::Fenced(info) = kind {
                    if let Some(lang) = info.split_whitespace().next() {
                        self.doc.add_class(code, &format!("language-{}", lang));
                    }
                }
                Frame {
                    node: code,
                    kind: FrameKind::Code,
                }
            }
            Tag::List(Some(start)) => {
                let frame = self.block(parent, "ol");
                if start != 1 {
                    self.doc.set_attr(frame.node, "start", start.to_string());
                }
                frame
            }
            Tag::List(None) => self.block(parent, "ul"),
            Tag::Item => self.block(parent, "li"),
            Tag::Emphasis => self.block(parent, "em"),
            Tag::Strong => self.block(parent, "strong"),
            Tag::Strikethrough => self.block(parent, "del"),
            Tag::Link { dest_url, title, .. } => {
                let a = self.doc.append_element(parent, "a");
                self.doc.set_attr(a, "href", dest_url.to_string());
                if !title.is_empty() {
                    self.doc.set_attr(a, "title", title.to_string());
                }
                Frame {
                    node: a,
                    kind: FrameKind::Link,
                }
            }
            Tag::Image { dest_url, title, .. } => {
                let img = self.doc.append_element(parent, "img");
                self.doc.set_attr(img, "src", dest_url.to_string());
                self.alt = Some((self.stack.len(), String::new()));
                if !title.is_empty() {
                    self.doc.set_attr(img, "title", title.to_string());
                }
                Frame {
                    node: img,
                    kind: FrameKind::Image,
                }
            }
            Tag::Table(alignments) => {
                let table = self.doc.append_element(parent, "table");
                self.table = Some(TableState {
                    node: table,
                    alignments,
                    body: None,
                    in_head: false,
                    cell: 0,
                });
                Frame {
                    node: table,
                    kind: FrameKind::Table,
                }
            }
            Tag::TableHead => match self.table.as_mut() {
                Some(table) => {
                    table.in_head = true;
                    table.cell = 0;
                    let thead = self.doc.append_element(table.node, "thead");
                    let row = self.doc.append_element(thead, "tr");
                    Frame {
                        node: row,
                        kind: FrameKind::TableHead,
                    }
                }
                None => transparent(parent),
            },
            Tag::TableRow => match self.table.as_mut() {
                Some(table) => {
                    table.cell = 0;
                    let body = match table.body {
                        Some(body) => body,
                        None => {
                            let body = self.doc.append_element(table.node, "tbody");
                            table.body = Some(body);
                            body
                        }
                    };
                    let row = self.doc.append_element(body, "tr");
                    Frame {
                        node: row,
                        kind: FrameKind::Block,
                    }
                }
                None => transparent(parent),
            },
            Tag::TableCell => {
                let (tag, align) = match self.table.as_mut() {
                    Some(table) => {
                        let align = table.alignments.get(table.cell).copied();
                        table.cell += 1;
                        (if table.in_head { "th" } else { "td" }, align)
                    }
                    None => ("td", None),
                };
                let frame = self.block(parent, tag);
                let align = match align {
                    Some(Alignment::Left) => Some("left"),
                    Some(Alignment::Center) => Some("center"),
                    Some(Alignment::Right) => Some("right"),
                    _ => None,
                };
                if let Some(align) = align {
                    self.doc.set_attr(frame.node, "align", align);
                }
                frame
            }
            // HTML blocks, footnotes, metadata and the like contribute no element
            _ => transparent(parent),
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let depth = self.stack.len() - 1;
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Image => {
                if let Some((owner, alt)) = self.alt.take() {
                    if owner == depth {
                        self.doc.set_attr(frame.node, "alt", alt);
                    } else {
                        self.alt = Some((owner, alt));
                    }
                }
            }
            FrameKind::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.in_head = false;
                }
            }
            FrameKind::Table => self.table = None,
            _ => {}
        }
    }

    fn block(&mut self, parent: NodeId, tag: &'static str) -> Frame {
        Frame {
            node: self.doc.append_element(parent, tag),
            kind: FrameKind::Block,
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        let frame = self.current();
        if frame.kind == FrameKind::Code {
            self.doc.append_text(frame.node, &undo_input_escape(&text));
        } else if self.stack.iter().any(|f| f.kind == FrameKind::Link) {
            self.doc.append_text(frame.node, &text);
        } else {
            append_linkified(&mut self.doc, frame.node, &text);
        }
    }

    fn finish(mut self) -> Fragment {
        self.flush_text();
        self.doc
    }
}

/// A frame whose children go straight into `node`
fn transparent(node: NodeId) -> Frame {
    Frame {
        node,
        kind: FrameKind::Block,
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Strip trailing punctuation from a bare URL match
///
/// A closing parenthesis stays when it balances an opening one inside the URL.
fn trim_url_end(candidate: &str) -> &str {
    let mut url = candidate.trim_end_matches(URL_TRAILERS);
    while let Some(inner) = url.strip_suffix(')') {
        if url.matches(')').count() <= url.matches('(').count() {
            break;
        }
        url = inner.trim_end_matches(URL_TRAILERS);
    }
    url
}

/// Append `text`, turning bare http(s) URLs into links
fn append_linkified(doc: &mut Fragment, parent: NodeId, text: &str) {
    let mut written = 0;
    for found in BARE_URL.find_iter(text) {
        let url = trim_url_end(found.as_str());
        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());
        if !has_host {
            continue;
        }
        doc.append_text(parent, &text[written..found.start()]);
        let link = doc.append_element(parent, "a");
        doc.set_attr(link, "href", url);
        doc.append_text(link, url);
        written = found.start() + url.len();
    }
    doc.append_text(parent, &text[written..]);
}
