/**
 * HTML Document Fragment
 *
 * An owned, mutable HTML tree stored as an arena. Nodes are addressed by
 * [`NodeId`] handles so later pipeline stages can look elements up, add
 * classes and attributes, and insert siblings without re-parsing markup.
 * The tree is serialized to a string exactly once, by [`Fragment::to_html`].
 *
 * Text and attribute values are stored unescaped and escaped on output,
 * so no stage has to reason about escaping.
 */
use pulldown_cmark_escape::{escape_html, FmtWriter};

/// Handle to a node inside a [`Fragment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Elements serialized without a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Elements followed by a newline on output
const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote", "ul", "ol", "li", "hr",
    "table", "thead", "tbody", "tr",
];

#[derive(Debug, Clone)]
struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An HTML fragment under construction
#[derive(Debug, Clone)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Default for Fragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Fragment {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The invisible container holding the top-level nodes
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &'static str) -> NodeId {
        self.push_node(NodeData::Element(Element {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push_node(NodeData::Text(text.into()))
    }

    /// Attach a detached node as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &'static str) -> NodeId {
        let id = self.create_element(tag);
        self.append(parent, id);
        id
    }

    /// Append text, merging with a trailing text sibling
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeData::Text(existing) = &mut self.nodes[last.0].data {
                existing.push_str(text);
                return;
            }
        }
        let id = self.create_text(text);
        self.append(parent, id);
    }

    /// Insert `node` as the sibling immediately following `reference`
    ///
    /// Does nothing when `reference` is detached.
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.nodes[reference.0].parent else {
            return;
        };
        self.detach(node);
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|&id| id == reference)
            .map_or(siblings.len(), |idx| idx + 1);
        siblings.insert(position, node);
        self.nodes[node.0].parent = Some(parent);
    }

    #[cfg(test)]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[cfg(test)]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Tag name of an element, `None` for text and the root
    pub fn tag(&self, id: NodeId) -> Option<&'static str> {
        self.element(id).map(|el| el.tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        if let Some(el) = self.element_mut(id) {
            match el.attrs.iter_mut().find(|(key, _)| *key == name) {
                Some(slot) => slot.1 = value,
                None => el.attrs.push((name, value)),
            }
        }
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    pub fn classes(&self, id: NodeId) -> &[String] {
        match self.element(id) {
            Some(el) => &el.classes,
            None => &[],
        }
    }

    /// All elements with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending = vec![self.root()];
        while let Some(id) = pending.pop() {
            if self.tag(id) == Some(tag) {
                found.push(id);
            }
            pending.extend(self.nodes[id.0].children.iter().rev());
        }
        found
    }

    /// Concatenated text of a node and its descendants
    #[cfg(test)]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        self.collect_text(id, &mut text);
        text
    }

    /// Serialize the fragment to an HTML string
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    #[cfg(test)]
    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let NodeData::Text(text) = &self.nodes[id.0].data {
            out.push_str(text);
        }
        for &child in &self.nodes[id.0].children {
            self.collect_text(child, out);
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.data {
            NodeData::Root => {}
            NodeData::Text(text) => push_escaped(out, text),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(el.tag);
                if !el.classes.is_empty() {
                    out.push_str(" class=\"");
                    push_escaped(out, &el.classes.join(" "));
                    out.push('"');
                }
                for (name, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    push_escaped(out, value);
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag) {
                    return;
                }
                for &child in &node.children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(el.tag);
                out.push('>');
                if BLOCK_TAGS.contains(&el.tag) {
                    out.push('\n');
                }
            }
        }
    }
}

/// Append `text` to `out` with HTML special characters escaped
pub(crate) fn push_escaped(out: &mut String, text: &str) {
    // Writing into a String cannot fail.
    let _ = escape_html(FmtWriter(&mut *out), text);
}
