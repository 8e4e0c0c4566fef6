//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Heading elements
pub const HEADING_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Form controls that carry a form metadata bundle
pub const FORM_ELEMENTS: &[&str] = &["input", "textarea", "select", "form"];

/// Layout containers eligible for border normalization
pub const CONTAINER_ELEMENTS: &[&str] = &[
    "div", "section", "article", "aside", "header", "footer", "main", "nav",
    "ul", "ol", "li", "form", "figure",
];

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a heading
pub fn is_heading(tag: &str) -> bool {
    HEADING_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a layout container
pub fn is_container(tag: &str) -> bool {
    CONTAINER_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

static TRAILING_DOTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\.{3,}|…)\s*$").unwrap());

/// Strip a trailing run of three or more dots (or an ellipsis character)
/// left over from visual truncation
pub fn strip_trailing_dots(text: &str) -> String {
    TRAILING_DOTS.replace(text, "").trim_end().to_string()
}

/// Clip `text` to `max` characters, appending `...` when clipped
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let clipped: String = text.chars().take(max).collect();
    format!("{}...", clipped.trim_end())
}

/// Convert a kebab-case CSS property to camelCase.
///
/// Vendor prefixes keep their leading capital (`-webkit-line-clamp` becomes
/// `WebkitLineClamp`), custom properties are returned unchanged.
pub fn to_camel_case(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = true;
            continue;
        }
        if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Clean an attribute value (trim and handle empty)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_trailing_dots() {
        assert_eq!(strip_trailing_dots("Lorem ipsum..."), "Lorem ipsum");
        assert_eq!(strip_trailing_dots("Wait....  "), "Wait");
        assert_eq!(strip_trailing_dots("More…"), "More");
        assert_eq!(strip_trailing_dots("v1.2.."), "v1.2..");
        assert_eq!(strip_trailing_dots("a... b"), "a... b");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("max-width"), "maxWidth");
        assert_eq!(to_camel_case("border-top-left-radius"), "borderTopLeftRadius");
        assert_eq!(to_camel_case("-webkit-line-clamp"), "WebkitLineClamp");
        assert_eq!(to_camel_case("color"), "color");
        assert_eq!(to_camel_case("--brand"), "--brand");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn test_is_void() {
        assert!(is_void("br"));
        assert!(is_void("IMG"));
        assert!(!is_void("div"));
    }
}
