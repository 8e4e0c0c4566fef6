//! Computed-style capability
//!
//! The converter never computes cascaded styles itself. A host that renders
//! the page (a browser over CDP, an embedding engine, a test fake) supplies
//! them through [`StyleSource`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::baseline::UserAgentBaseline;
use super::whitelist::is_inheritable;
use super::StyleSnapshot;
use crate::node::Node;
use crate::Result;

/// Supplies computed styles of rendered elements
pub trait StyleSource {
    /// Full computed style of an element, keyed by kebab-case property
    fn computed_style(&self, node: &Node) -> Option<&StyleSnapshot>;

    /// Text as visually rendered, which may be clipped by CSS truncation.
    ///
    /// `None` means the host cannot tell, and DOM text content is used.
    fn rendered_text(&self, _node: &Node) -> Option<&str> {
        None
    }
}

/// Computed styles captured per node id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStyleSource {
    #[serde(default)]
    pub styles: HashMap<u32, StyleSnapshot>,
    #[serde(default)]
    pub rendered_text: HashMap<u32, String>,
}

impl SnapshotStyleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a captured snapshot document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Record the computed style of a node
    pub fn insert(&mut self, node_id: u32, style: StyleSnapshot) {
        self.styles.insert(node_id, style);
    }

    /// Record the rendered text of a node
    pub fn insert_rendered_text(&mut self, node_id: u32, text: impl Into<String>) {
        self.rendered_text.insert(node_id, text.into());
    }

    /// Approximate computed styles for a tree that was never rendered.
    ///
    /// No author stylesheets are applied. Each element starts from the UA
    /// initial values, inherits inheritable properties from its parent, then
    /// gets the UA rules for its tag and finally its inline declarations.
    pub fn approximate(root: &Node, ua: &UserAgentBaseline) -> Self {
        let mut source = Self::new();
        let initial = ua.initial_values();
        approximate_into(root, None, &initial, ua, &mut source);
        source
    }
}

fn approximate_into(
    node: &Node,
    parent: Option<&StyleSnapshot>,
    initial: &StyleSnapshot,
    ua: &UserAgentBaseline,
    out: &mut SnapshotStyleSource,
) {
    if !node.is_element() {
        return;
    }

    let mut style = initial.clone();
    if let Some(parent) = parent {
        for (property, value) in parent {
            if is_inheritable(property) {
                style.insert(property.clone(), value.clone());
            }
        }
    }
    style.extend(ua.tag_rules(&node.tag_name()));
    if let Some(inline) = node.attr("style") {
        style.extend(parse_inline_style(inline));
    }

    for child in node.element_children() {
        approximate_into(child, Some(&style), initial, ua, out);
    }
    out.insert(node.node_id, style);
}

impl StyleSource for SnapshotStyleSource {
    fn computed_style(&self, node: &Node) -> Option<&StyleSnapshot> {
        self.styles.get(&node.node_id)
    }

    fn rendered_text(&self, node: &Node) -> Option<&str> {
        self.rendered_text.get(&node.node_id).map(String::as_str)
    }
}

/// Parse a `style` attribute into (kebab-case property, value) pairs.
///
/// Semicolons inside parentheses or quotes do not split declarations, so
/// `url(data:...;base64,...)` survives. `!important` is dropped.
pub fn parse_inline_style(style: &str) -> Vec<(String, String)> {
    split_declarations(style)
        .into_iter()
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let property = property.trim().to_lowercase();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value);
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}

fn split_declarations(style: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                out.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&style[start..]);
    out.into_iter().filter(|d| !d.trim().is_empty()).collect()
}
