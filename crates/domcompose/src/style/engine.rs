//! Style resolution engine

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::baseline::BaselineCache;
use super::source::StyleSource;
use super::whitelist::{is_inheritable, Whitelist};
use super::{StyleMode, StyleSnapshot};
use crate::node::{Node, NodeRef};
use crate::options::Diagnostics;
use crate::utilities::to_camel_case;
use domcompose_core::StyleMap;

/// Class token naming a call-to-action, e.g. `btn`, `button-primary`, `hero_cta`
static CTA_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|[-_])(btn|button|cta)([-_]|$)").unwrap());

/// Resolves the effective style of elements against their baselines
pub struct StyleEngine<'a> {
    source: &'a dyn StyleSource,
    baseline: &'a BaselineCache,
    diagnostics: &'a Diagnostics,
}

impl<'a> StyleEngine<'a> {
    pub fn new(source: &'a dyn StyleSource, baseline: &'a BaselineCache, diagnostics: &'a Diagnostics) -> Self {
        Self {
            source,
            baseline,
            diagnostics,
        }
    }

    /// Computed style of a node, if the host has one
    pub fn computed(&self, node: &Node) -> Option<&'a StyleSnapshot> {
        self.source.computed_style(node)
    }

    /// Rendered (possibly clipped) text of a node
    pub fn rendered_text(&self, node: &Node) -> Option<&'a str> {
        self.source.rendered_text(node)
    }

    /// Subset of the element's computed style selected by `mode` and
    /// `whitelist`, keyed by camelCase property.
    pub fn resolve(&self, element: &NodeRef, mode: StyleMode, whitelist: &Whitelist) -> StyleMap {
        let mut styles = StyleMap::new();
        let Some(computed) = self.computed(element.node) else {
            return styles;
        };

        let tag = element.tag_name();
        let baseline = self.baseline.get(&tag);
        let parent = element.parent().and_then(|p| self.computed(p.node));
        let tracing = self.diagnostics.applies_to(element.node);

        for (property, value) in computed {
            if !whitelist.contains(property) || value == "initial" || value == "unset" {
                continue;
            }

            let included = match mode {
                StyleMode::All => true,
                StyleMode::InheritedOnly => inherited_from_parent(property, value, parent),
                StyleMode::UaDiff => is_ua_diff(property, value, &baseline),
                StyleMode::UaDiffPlusInherited => {
                    is_ua_diff(property, value, &baseline) || inherited_from_parent(property, value, parent)
                }
            };

            if tracing {
                trace!(
                    target: "domcompose::style",
                    "<{}> {}: {:?} baseline={:?} included={}",
                    tag,
                    property,
                    value,
                    baseline.get(property),
                    included
                );
            }

            if included {
                styles.insert(to_camel_case(property), value.clone());
            }
        }

        if tag == "a" && is_cta(element.node) && !styles.contains_key("display") {
            styles.insert("display".to_string(), "inline-block".to_string());
        }

        styles
    }
}

fn is_cta(node: &Node) -> bool {
    node.classes().any(|class| CTA_CLASS.is_match(class))
}

/// Whether `value` differs from the baseline; missing baseline entries count
/// as different.
pub fn is_ua_diff(property: &str, value: &str, baseline: &StyleSnapshot) -> bool {
    baseline.get(property).map_or(true, |b| b != value)
}

/// Whether an inheritable property carries exactly the parent's value
pub fn inherited_from_parent(property: &str, value: &str, parent: Option<&StyleSnapshot>) -> bool {
    is_inheritable(property) && parent.and_then(|p| p.get(property)).is_some_and(|v| v == value)
}
