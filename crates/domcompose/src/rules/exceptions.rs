//! Built-in style exceptions.
//!
//! These encode tag- and class-conditioned adjustments that the generic
//! resolution cannot infer from computed values alone.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule, RuleContext};
use crate::utilities::{is_container, to_camel_case, HEADING_ELEMENTS};
use domcompose_core::StyleMap;

/// Properties copied verbatim from computed style for lists and navigation
const LIST_LAYOUT_PROPERTIES: &[&str] = &[
    "display", "list-style-type", "list-style-position", "list-style-image",
    "margin-top", "margin-right", "margin-bottom", "margin-left",
    "padding-top", "padding-right", "padding-bottom", "padding-left",
    "gap", "flex-direction", "justify-content", "align-items",
];

static BG_OPACITY_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bg-opacity-(\d{1,3})$").unwrap());

/// Create all built-in exception rules, in application order
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        image_rule(),
        button_rule(),
        paragraph_rule(),
        heading_rule(),
        list_rule(),
        bg_opacity_rule(),
        border_reset_rule(),
    ]
}

fn set(styles: &mut StyleMap, property: &str, value: &str) {
    styles.insert(property.to_string(), value.to_string());
}

fn has_border_class(ctx: &RuleContext) -> bool {
    ctx.element.node.classes().any(|c| c.starts_with("border"))
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |_, styles| set(styles, "maxWidth", "100%"))
}

fn button_rule() -> Rule {
    Rule::for_tag("button", |ctx, styles| {
        set(styles, "backgroundColor", "transparent");
        set(styles, "backgroundImage", "none");
        if !has_border_class(ctx) {
            set(styles, "border", "unset");
        }
    })
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, styles| set(styles, "display", "inline-block"))
}

fn heading_rule() -> Rule {
    Rule::for_tags(HEADING_ELEMENTS, |_, styles| {
        set(styles, "display", "block")
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol", "nav", "li"], |ctx, styles| {
        for property in LIST_LAYOUT_PROPERTIES {
            if let Some(value) = ctx.computed_value(property) {
                styles.insert(to_camel_case(property), value.to_string());
            }
        }
    })
}

fn bg_opacity_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, ctx| ctx.element.node.classes().any(|c| BG_OPACITY_CLASS.is_match(c))),
        |ctx, styles| {
            let level = ctx
                .element
                .node
                .classes()
                .filter_map(|c| BG_OPACITY_CLASS.captures(c))
                .filter_map(|caps| caps[1].parse::<u32>().ok())
                .last();
            if let Some(level) = level {
                let opacity = f64::from(level.min(100)) / 100.0;
                styles.insert("opacity".to_string(), opacity.to_string());
            }
        },
    )
}

fn border_reset_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, ctx| is_container(tag) && has_border_class(ctx)),
        |_, styles| {
            // The anchor goes first so resolved longhands still win
            styles.shift_insert(0, "border".to_string(), "0 solid".to_string());
        },
    )
}
