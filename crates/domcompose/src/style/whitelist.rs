//! Fixed property whitelist
//!
//! Only properties listed here ever reach the output, whatever the
//! resolution mode decided.

use indexmap::IndexSet;

/// Properties carried into the document model, in kebab-case
pub const STANDARD_PROPERTIES: &[&str] = &[
    // Layout
    "display", "position", "top", "right", "bottom", "left", "z-index", "float", "clear",
    "box-sizing", "overflow", "overflow-x", "overflow-y", "width", "height", "min-width",
    "min-height", "max-width", "max-height", "aspect-ratio",
    // Spacing
    "margin-top", "margin-right", "margin-bottom", "margin-left",
    "padding-top", "padding-right", "padding-bottom", "padding-left",
    // Background
    "background-color", "background-image", "background-size", "background-position",
    "background-repeat", "background-clip",
    // Border
    "border-top-width", "border-right-width", "border-bottom-width", "border-left-width",
    "border-top-style", "border-right-style", "border-bottom-style", "border-left-style",
    "border-top-color", "border-right-color", "border-bottom-color", "border-left-color",
    "border-top-left-radius", "border-top-right-radius", "border-bottom-right-radius",
    "border-bottom-left-radius",
    // Effects
    "opacity", "box-shadow", "transform", "transition", "filter", "backdrop-filter",
    "mix-blend-mode", "cursor",
    // Text
    "color", "font-family", "font-size", "font-weight", "font-style", "line-height",
    "letter-spacing", "text-align", "text-decoration-line", "text-decoration-color",
    "text-transform", "text-overflow", "white-space", "word-break", "text-shadow",
    "vertical-align",
    // Flex
    "flex-direction", "flex-wrap", "justify-content", "align-items", "align-content",
    "align-self", "flex-grow", "flex-shrink", "flex-basis", "order", "gap", "row-gap",
    "column-gap",
    // Grid
    "grid-template-columns", "grid-template-rows", "grid-column", "grid-row", "grid-auto-flow",
    // List and table
    "list-style-type", "list-style-position", "border-collapse",
    // Visibility
    "visibility",
    // Media objects
    "object-fit", "object-position",
];

/// Properties that inherit from the parent by default
pub const INHERITED_PROPERTIES: &[&str] = &[
    "color", "font-family", "font-size", "font-weight", "font-style", "line-height",
    "letter-spacing", "text-align", "text-transform", "white-space", "word-break",
    "text-shadow", "visibility", "cursor", "list-style-type", "list-style-position",
    "border-collapse",
];

/// Check whether a property is inherited by default
pub fn is_inheritable(property: &str) -> bool {
    INHERITED_PROPERTIES.contains(&property)
}

/// Set of properties allowed into the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whitelist {
    properties: IndexSet<String>,
}

impl Whitelist {
    /// Whitelist of arbitrary kebab-case properties
    pub fn new<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    /// The standard layout/visual whitelist
    pub fn standard() -> Self {
        Self::new(STANDARD_PROPERTIES.iter().copied())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.contains(property)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_whitelist() {
        let whitelist = Whitelist::standard();
        assert!(whitelist.len() >= 90);
        assert!(whitelist.contains("display"));
        assert!(whitelist.contains("object-fit"));
        assert!(!whitelist.contains("content"));
    }

    #[test]
    fn test_inherited_are_whitelisted() {
        let whitelist = Whitelist::standard();
        assert!(INHERITED_PROPERTIES.iter().all(|p| whitelist.contains(p)));
        assert!(is_inheritable("color"));
        assert!(!is_inheritable("margin-top"));
    }
}
