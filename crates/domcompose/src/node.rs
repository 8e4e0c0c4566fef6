//! CDP-style DOM Node structure used as conversion input.
//!
//! This module provides a DOM node structure that matches the Chrome DevTools Protocol
//! DOM.Node structure. Any parser (html5ever, CDP, etc.) can convert their output to
//! this structure. Nodes carry a `node_id` so that computed styles captured
//! alongside the tree can be looked up per element.

use indexmap::IndexMap;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            1 => NodeType::Element,
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element, // Default fallback
        }
    }
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone)]
pub struct Node {
    /// Identifier used to correlate the node with captured computed styles
    pub node_id: u32,

    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    /// Only present for element nodes
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_id: 0,
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = Some(
            attrs
                .into_iter()
                .flat_map(|(k, v)| [k.to_string(), v.to_string()])
                .collect(),
        );
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_id: 0,
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
        }
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style node id
    pub fn with_id(mut self, node_id: u32) -> Self {
        self.node_id = node_id;
        self
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this is an element with the given (lowercase) tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Iterate attributes as (name, value) pairs in source order
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        // CDP stores attributes as flat array: [name, value, name, value, ...]
        self.attributes
            .iter()
            .flat_map(|a| a.chunks_exact(2))
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// Raw `class` attribute (empty when absent)
    pub fn class_name(&self) -> &str {
        self.attr("class").unwrap_or("")
    }

    /// Individual class names
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.class_name().split_whitespace()
    }

    /// Check for a class name
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// `id` attribute (empty when absent)
    pub fn id(&self) -> &str {
        self.attr("id").unwrap_or("")
    }

    /// All `data-*` attributes
    pub fn data_attributes(&self) -> IndexMap<String, String> {
        self.attrs()
            .filter(|(n, _)| n.to_ascii_lowercase().starts_with("data-"))
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Check whether any child is an element
    pub fn has_element_children(&self) -> bool {
        self.element_children().next().is_some()
    }

    /// Check whether the node has any child at all
    pub fn has_children(&self) -> bool {
        self.children().next().is_some()
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        if let Some(ref mut children) = self.children {
            children.push(child);
        } else {
            self.children = Some(vec![child]);
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self.children().map(|child| child.text_content()).collect(),
        }
    }

    /// Whether any descendant text node holds non-whitespace text
    pub fn has_text(&self) -> bool {
        match self.node_type {
            NodeType::Text => self.node_value.as_deref().is_some_and(|v| !v.trim().is_empty()),
            NodeType::Comment => false,
            _ => self.children().any(Node::has_text),
        }
    }

    /// Whitespace-collapsed text content, cut once it is longer than `max`
    /// characters.
    ///
    /// The result is a prefix of the collapsed `text_content()` and is
    /// longer than `max` exactly when the full text is.
    pub fn text_preview(&self, max: usize) -> String {
        let mut preview = TextPreview::new(max + 1);
        self.collect_preview(&mut preview);
        preview.text
    }

    fn collect_preview(&self, preview: &mut TextPreview) -> bool {
        match self.node_type {
            NodeType::Text => preview.push(self.node_value.as_deref().unwrap_or_default()),
            NodeType::Comment => preview.is_full(),
            _ => self.children().any(|child| child.collect_preview(preview)),
        }
    }

    /// Depth-first search for the first element with `tag`, self included
    pub fn find_element(&self, tag: &str) -> Option<&Node> {
        if self.is_tag(tag) {
            return Some(self);
        }
        self.element_children().find_map(|c| c.find_element(tag))
    }

    /// Number nodes in document order starting at `next`; returns the next free id
    pub fn assign_node_ids(&mut self, next: u32) -> u32 {
        self.node_id = next;
        let mut next = next + 1;
        if let Some(ref mut children) = self.children {
            for child in children.iter_mut() {
                next = child.assign_node_ids(next);
            }
        }
        next
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => String::new(),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if self.is_void_element() {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            _ => self.inner_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(|child| child.outer_html()).collect()
    }

    /// Get attributes as a string for HTML output
    fn attributes_string(&self) -> String {
        self.attrs()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.to_string()
                } else {
                    format!("{}=\"{}\"", name, escape_html_attr(value))
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if this is a void element
    fn is_void_element(&self) -> bool {
        crate::utilities::is_void(&self.node_name)
    }
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape HTML text content
fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// A reference to a node with its chain of ancestors.
///
/// The chain lives on the stack of the recursive walk, which allows navigation
/// up the tree without storing parent pointers in [`Node`].
#[derive(Debug, Clone)]
struct TextPreview {
    text: String,
    chars: usize,
    limit: usize,
    pending_space: bool,
}

impl TextPreview {
    fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            chars: 0,
            limit,
            pending_space: false,
        }
    }

    fn is_full(&self) -> bool {
        self.chars >= self.limit
    }

    /// Append `s` with whitespace runs collapsed; true once full
    fn push(&mut self, s: &str) -> bool {
        for c in s.chars() {
            if self.is_full() {
                break;
            }
            if c.is_whitespace() {
                self.pending_space = self.chars > 0;
                continue;
            }
            if self.pending_space {
                self.pending_space = false;
                self.text.push(' ');
                self.chars += 1;
                if self.is_full() {
                    break;
                }
            }
            self.text.push(c);
            self.chars += 1;
        }
        self.is_full()
    }
}

pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    /// Reference to a child of this node
    pub fn child<'b>(&'b self, node: &'b Node) -> NodeRef<'b> {
        NodeRef {
            node,
            parent: Some(self),
        }
    }

    /// Parent reference, if known
    pub fn parent(&self) -> Option<&'a NodeRef<'a>> {
        self.parent
    }

    /// Get the parent tag name if known
    pub fn parent_tag(&self) -> Option<String> {
        self.parent.map(|p| p.tag_name())
    }

    /// Iterate ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a NodeRef<'a>> {
        std::iter::successors(self.parent, |p| p.parent)
    }

    /// Index among the parent's element children and the number of them.
    ///
    /// A root reports `(0, 1)`.
    pub fn sibling_position(&self) -> (usize, usize) {
        let Some(parent) = self.parent else {
            return (0, 1);
        };
        let mut index = 0;
        let mut count = 0;
        for sibling in parent.node.element_children() {
            if std::ptr::eq(sibling, self.node) {
                index = count;
            }
            count += 1;
        }
        (index, count)
    }

    /// 1-based ordinal among same-tag element siblings and the number of them
    pub fn same_tag_position(&self) -> (usize, usize) {
        let Some(parent) = self.parent else {
            return (1, 1);
        };
        let tag = &self.node.node_name;
        let mut ordinal = 1;
        let mut count = 0;
        for sibling in parent.node.element_children() {
            if !sibling.node_name.eq_ignore_ascii_case(tag) {
                continue;
            }
            count += 1;
            if std::ptr::eq(sibling, self.node) {
                ordinal = count;
            }
        }
        (ordinal, count)
    }

    /// Delegate to Node methods
    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.node.is_tag(tag)
    }

    pub fn tag_name(&self) -> String {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
