//! Component classification.
//!
//! Maps an element to one of a fixed set of component kinds. The kind is
//! advisory for layout semantics; it never gates whether children are
//! processed.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::node::Node;
use crate::style::StyleSnapshot;
use crate::utilities::is_heading;

/// Semantic component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Header,
    LinkContainer,
    Link,
    Video,
    Section,
    Text,
    Button,
    Image,
    #[serde(rename = "vstack")]
    VStack,
    #[serde(rename = "hstack")]
    HStack,
    Box,
    RichText,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Header => "header",
            ComponentKind::LinkContainer => "link-container",
            ComponentKind::Link => "link",
            ComponentKind::Video => "video",
            ComponentKind::Section => "section",
            ComponentKind::Text => "text",
            ComponentKind::Button => "button",
            ComponentKind::Image => "image",
            ComponentKind::VStack => "vstack",
            ComponentKind::HStack => "hstack",
            ComponentKind::Box => "box",
            ComponentKind::RichText => "rich-text",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static RICH_TEXT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|\s)(prose|rich-?text|wysiwyg)(\s|$|-)").unwrap());

const RICH_TEXT_HOSTS: &[&str] = &["div", "section", "article", "main", "aside"];

/// Whether an element hosts freeform formatted text
pub fn is_rich_text_container(node: &Node) -> bool {
    RICH_TEXT_HOSTS.contains(&node.tag_name().as_str()) && RICH_TEXT_CLASS.is_match(node.class_name())
}

/// Classify an element.
///
/// `computed` is only consulted for `div` layout (display and flex direction).
pub fn classify(node: &Node, computed: Option<&StyleSnapshot>) -> ComponentKind {
    let tag = node.tag_name();
    let has_elements = node.has_element_children();
    let has_text = node.has_text();

    if is_rich_text_container(node) {
        return ComponentKind::RichText;
    }

    match tag.as_str() {
        t if is_heading(t) => ComponentKind::Header,
        "a" if has_elements => ComponentKind::LinkContainer,
        "a" => ComponentKind::Link,
        "video" => ComponentKind::Video,
        "section" => ComponentKind::Section,
        "p" | "span" | "label" => ComponentKind::Text,
        "button" => ComponentKind::Button,
        "img" | "svg" => ComponentKind::Image,
        "div" if !has_elements && has_text => ComponentKind::Text,
        "div" => classify_layout(computed),
        _ if !has_elements && has_text => ComponentKind::Text,
        _ => ComponentKind::Box,
    }
}

fn classify_layout(computed: Option<&StyleSnapshot>) -> ComponentKind {
    let get = |property: &str| {
        computed
            .and_then(|c| c.get(property))
            .map(|v| v.trim())
            .unwrap_or("")
    };

    match get("display") {
        "flex" | "inline-flex" => {
            if get("flex-direction").starts_with("column") {
                ComponentKind::VStack
            } else {
                ComponentKind::HStack
            }
        }
        // Grid keeps the generic box until a grid kind exists
        "grid" | "inline-grid" => ComponentKind::Box,
        _ => ComponentKind::Box,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(pairs: &[(&str, &str)]) -> StyleSnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_headings_and_text_tags() {
        assert_eq!(classify(&Node::element("h3"), None), ComponentKind::Header);
        assert_eq!(classify(&Node::element("p"), None), ComponentKind::Text);
        assert_eq!(classify(&Node::element("label"), None), ComponentKind::Text);
        assert_eq!(classify(&Node::element("button"), None), ComponentKind::Button);
        assert_eq!(classify(&Node::element("svg"), None), ComponentKind::Image);
        assert_eq!(classify(&Node::element("section"), None), ComponentKind::Section);
    }

    #[test]
    fn test_links() {
        let plain = Node::element("a").with_child(Node::text("Go"));
        assert_eq!(classify(&plain, None), ComponentKind::Link);

        let container = Node::element("a").with_child(Node::element("img"));
        assert_eq!(classify(&container, None), ComponentKind::LinkContainer);
    }

    #[test]
    fn test_div_layouts() {
        let text_div = Node::element("div").with_child(Node::text("  hi "));
        assert_eq!(classify(&text_div, None), ComponentKind::Text);

        let div = Node::element("div").with_child(Node::element("span"));
        let column = style(&[("display", "flex"), ("flex-direction", "column")]);
        let row = style(&[("display", "flex"), ("flex-direction", "row")]);
        let grid = style(&[("display", "grid")]);

        assert_eq!(classify(&div, Some(&column)), ComponentKind::VStack);
        assert_eq!(classify(&div, Some(&row)), ComponentKind::HStack);
        assert_eq!(classify(&div, Some(&grid)), ComponentKind::Box);
        assert_eq!(classify(&div, None), ComponentKind::Box);
        assert_eq!(classify(&Node::element("div"), None), ComponentKind::Box);
    }

    #[test]
    fn test_other_tags() {
        let li = Node::element("li").with_child(Node::text("item"));
        assert_eq!(classify(&li, None), ComponentKind::Text);
        let ul = Node::element("ul").with_child(li);
        assert_eq!(classify(&ul, None), ComponentKind::Box);
    }

    #[test]
    fn test_rich_text() {
        let article = Node::element_with_attrs("article", vec![("class", "prose lg:prose-xl")])
            .with_child(Node::element("p"));
        assert_eq!(classify(&article, None), ComponentKind::RichText);
        let heading = Node::element_with_attrs("h2", vec![("class", "prose")]);
        assert_eq!(classify(&heading, None), ComponentKind::Header);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let div = Node::element("div").with_child(Node::element("span"));
        let row = style(&[("display", "flex")]);
        let first = classify(&div, Some(&row));
        for _ in 0..5 {
            assert_eq!(classify(&div, Some(&row)), first);
        }
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&ComponentKind::LinkContainer).unwrap(), "\"link-container\"");
        assert_eq!(serde_json::to_string(&ComponentKind::VStack).unwrap(), "\"vstack\"");
        assert_eq!(ComponentKind::RichText.to_string(), "rich-text");
    }
}
