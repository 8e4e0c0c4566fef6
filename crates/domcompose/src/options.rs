//! Configuration options for conversion runs

use crate::node::Node;
use crate::style::{StyleMode, Whitelist};

/// Attribute carrying the design-tool correlation id by default
pub const DEFAULT_CORRELATION_ATTRIBUTE: &str = "data-figma-id";

/// Recursion depth limit of a conversion run
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Structured style tracing, off unless asked for
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Trace style decisions for every element
    pub trace_styles: bool,

    /// Trace style decisions only for elements carrying one of these classes
    pub trace_classes: Vec<String>,
}

impl Diagnostics {
    /// Whether style decisions for `node` should be traced
    pub fn applies_to(&self, node: &Node) -> bool {
        self.trace_styles || node.classes().any(|c| self.trace_classes.iter().any(|t| t == c))
    }
}

/// Options for a conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Which computed properties are carried into the output
    pub style_mode: StyleMode,

    /// Properties allowed into the output
    pub whitelist: Whitelist,

    /// Attribute holding the correlation id matched against mappings
    pub correlation_attribute: String,

    /// Base URL used to make image sources absolute and classify links
    pub base_url: Option<String>,

    /// Recursion depth at which a run is aborted
    pub max_depth: usize,

    /// Replay the last result to requesting parties without reconverting
    pub replay_cached: bool,

    /// Origins allowed to request conversions
    pub allowed_origins: Vec<String>,

    /// Style tracing
    pub diagnostics: Diagnostics,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            style_mode: StyleMode::default(),
            whitelist: Whitelist::standard(),
            correlation_attribute: DEFAULT_CORRELATION_ATTRIBUTE.to_string(),
            base_url: None,
            max_depth: DEFAULT_MAX_DEPTH,
            replay_cached: true,
            allowed_origins: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.style_mode, StyleMode::UaDiffPlusInherited);
        assert_eq!(options.correlation_attribute, "data-figma-id");
        assert!(options.allowed_origins.is_empty());
    }

    #[test]
    fn test_diagnostics_gating() {
        let node = Node::element_with_attrs("div", vec![("class", "card debug-me")]);
        let mut diagnostics = Diagnostics::default();
        assert!(!diagnostics.applies_to(&node));

        diagnostics.trace_classes.push("debug-me".to_string());
        assert!(diagnostics.applies_to(&node));
        assert!(!diagnostics.applies_to(&Node::element("div")));
    }
}
