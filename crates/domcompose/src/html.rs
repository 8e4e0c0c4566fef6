//! HTML parsing support.
//!
//! This module parses HTML strings into the CDP-style Node structure, for
//! hosts that hold markup instead of a live DOM. Nodes are numbered in
//! document order starting at 1 so that style snapshots captured for the
//! same markup can be matched up.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Elements that never render and are dropped while parsing
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Parse a complete HTML document. The returned root is the `html` element.
///
/// # Example
///
/// ```rust
/// use domcompose::parse_document;
///
/// let root = parse_document("<html><body><h1>Hello</h1></body></html>");
/// let body = root.find_element("body").unwrap();
/// assert_eq!(body.element_children().count(), 1);
/// ```
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    numbered(scraper_to_node(document.root_element()))
}

/// Parse an HTML fragment. The fragment's nodes are wrapped in an `html`
/// element.
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    numbered(scraper_to_node(document.root_element()))
}

fn numbered(mut node: Node) -> Node {
    node.assign_node_ids(1);
    node
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();

    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(el) if NON_RENDERED.contains(&el.name()) => {}
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let node = parse_html("<p>Hello World</p>");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "html");
        let p = node.find_element("p").unwrap();
        assert_eq!(p.text_content(), "Hello World");
    }

    #[test]
    fn test_node_ids_in_document_order() {
        let root = parse_html("<div><span>a</span><em>b</em></div>");
        assert_eq!(root.node_id, 1);
        let div = root.find_element("div").unwrap();
        let span = root.find_element("span").unwrap();
        let em = root.find_element("em").unwrap();
        assert!(div.node_id < span.node_id);
        assert!(span.node_id < em.node_id);
    }

    #[test]
    fn test_non_rendered_elements_dropped() {
        let root = parse_document(
            "<html><head><title>T</title></head><body><script>var x;</script><p class=\"lead\">Hi</p></body></html>",
        );
        assert!(root.find_element("head").is_none());
        assert!(root.find_element("script").is_none());
        let p = root.find_element("p").unwrap();
        assert!(p.has_class("lead"));
    }
}
