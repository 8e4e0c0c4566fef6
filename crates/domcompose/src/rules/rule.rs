//! Rule and Filter types for style exceptions.

use crate::node::NodeRef;
use crate::style::StyleSnapshot;
use domcompose_core::StyleMap;

/// What a rule sees of the element it applies to
pub struct RuleContext<'a, 'b> {
    /// The element, with its ancestors
    pub element: &'a NodeRef<'b>,
    /// Its full computed style, if the host has one
    pub computed: Option<&'a StyleSnapshot>,
}

impl RuleContext<'_, '_> {
    /// Lowercase tag name
    pub fn tag(&self) -> String {
        self.element.tag_name()
    }

    /// Computed value of a kebab-case property
    pub fn computed_value(&self, property: &str) -> Option<&str> {
        self.computed.and_then(|c| c.get(property)).map(String::as_str)
    }
}

/// Type alias for style exception handlers
pub type ApplyFn = Box<dyn Fn(&RuleContext, &mut StyleMap) + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(Box<dyn Fn(&str, &RuleContext) -> bool + Send + Sync>),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &RuleContext) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches an element
    pub fn matches(&self, tag: &str, ctx: &RuleContext) -> bool {
        let tag_lower = tag.to_lowercase();
        match self {
            Filter::TagName(t) => tag_lower == *t,
            Filter::TagNames(tags) => tags.contains(&tag_lower),
            Filter::Predicate(f) => f(&tag_lower, ctx),
        }
    }
}

/// A style exception: when the filter matches, the handler edits the
/// element's style map
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Handler editing the style map
    pub handler: ApplyFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, apply: F) -> Self
    where
        F: Fn(&RuleContext, &mut StyleMap) + Send + Sync + 'static,
    {
        Self {
            filter,
            handler: Box::new(apply),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, apply: F) -> Self
    where
        F: Fn(&RuleContext, &mut StyleMap) + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), apply)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], apply: F) -> Self
    where
        F: Fn(&RuleContext, &mut StyleMap) + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), apply)
    }

    /// Apply this rule's handler
    pub fn apply(&self, ctx: &RuleContext, styles: &mut StyleMap) {
        (self.handler)(ctx, styles)
    }
}
