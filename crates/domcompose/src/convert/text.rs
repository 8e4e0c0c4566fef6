//! Text extraction and de-truncation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::Node;
use crate::style::StyleSnapshot;
use crate::utilities::{collapse_whitespace, strip_trailing_dots};

static CLAMP_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:truncate|text-ellipsis|ellipsis|line-clamp-(?:\d+|\[[^\]]+\]))$").unwrap());

/// Whether an element is visually clamped, so its rendered text may be
/// shorter than its content
pub fn is_clamped(node: &Node, computed: Option<&StyleSnapshot>) -> bool {
    if node.classes().any(|c| CLAMP_CLASS.is_match(c)) {
        return true;
    }
    let Some(computed) = computed else {
        return false;
    };
    let value = |property: &str| computed.get(property).map(|v| v.trim());
    value("text-overflow") == Some("ellipsis") || value("-webkit-line-clamp").is_some_and(|v| v != "none")
}

/// Text of the direct text-node children, each run collapsed, joined by a
/// single space
pub fn direct_text(node: &Node) -> String {
    node.children()
        .filter(|c| c.is_text())
        .map(|c| collapse_whitespace(&c.text_content()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Choose between the DOM text and the host's rendered text.
///
/// Clamped elements and elements with element children always use the DOM
/// text. Either way, leftover truncation dots are stripped.
pub fn full_text(node: &Node, computed: Option<&StyleSnapshot>, rendered: Option<&str>, dom_text: &str) -> String {
    let text = match rendered {
        Some(rendered) if !is_clamped(node, computed) && !node.has_element_children() => rendered,
        _ => dom_text,
    };
    strip_trailing_dots(&collapse_whitespace(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_indicators() {
        let clamped = |class: &str| is_clamped(&Node::element_with_attrs("p", vec![("class", class)]), None);
        assert!(clamped("truncate"));
        assert!(clamped("text-sm line-clamp-2"));
        assert!(clamped("line-clamp-[3]"));
        assert!(clamped("ellipsis"));
        assert!(!clamped("line-clamp-none"));
        assert!(!clamped("truncated-header"));

        let computed: StyleSnapshot = [("text-overflow".to_string(), "ellipsis".to_string())].into_iter().collect();
        assert!(is_clamped(&Node::element("p"), Some(&computed)));

        let computed: StyleSnapshot = [("-webkit-line-clamp".to_string(), "none".to_string())].into_iter().collect();
        assert!(!is_clamped(&Node::element("p"), Some(&computed)));
    }

    #[test]
    fn test_direct_text_skips_descendants() {
        let node = Node::element("li")
            .with_child(Node::text("  one "))
            .with_child(Node::element("b").with_child(Node::text("bold")))
            .with_child(Node::text("two"));
        assert_eq!(direct_text(&node), "one two");
    }

    #[test]
    fn test_full_text_prefers_dom_when_clamped() {
        let node = Node::element_with_attrs("p", vec![("class", "line-clamp-1")]);
        let text = full_text(&node, None, Some("Lorem ipsum..."), "Lorem ipsum dolor");
        assert_eq!(text, "Lorem ipsum dolor");

        let plain = Node::element("p");
        assert_eq!(full_text(&plain, None, Some("Shown  text"), "Shown text hidden"), "Shown text");
        assert_eq!(full_text(&plain, None, None, "Read more..."), "Read more");
    }
}
