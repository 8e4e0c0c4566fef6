//! Style derivation: one responsive ruleset per element.
//!
//! Three layers, lowest precedence first:
//!
//! 1. resolved computed style ([`StyleEngine`])
//! 2. style exceptions ([`Rules`])
//! 3. inline `style` declarations

use crate::node::NodeRef;
use crate::options::ConvertOptions;
use crate::rules::{RuleContext, Rules};
use crate::style::{parse_inline_style, StyleEngine};
use crate::utilities::to_camel_case;
use domcompose_core::{ResponsiveStyles, StyleMap};

/// Combines resolved styles, exceptions and inline declarations
pub struct StyleDeriver<'a> {
    engine: &'a StyleEngine<'a>,
    rules: &'a Rules,
    options: &'a ConvertOptions,
}

impl<'a> StyleDeriver<'a> {
    pub fn new(engine: &'a StyleEngine<'a>, rules: &'a Rules, options: &'a ConvertOptions) -> Self {
        Self {
            engine,
            rules,
            options,
        }
    }

    /// Derive the styles of an element.
    ///
    /// Only the `default` breakpoint is populated; `tablet` and `mobile`
    /// need viewport simulation and stay empty.
    pub fn derive(&self, element: &NodeRef) -> ResponsiveStyles {
        let mut styles = self
            .engine
            .resolve(element, self.options.style_mode, &self.options.whitelist);

        let ctx = RuleContext {
            element,
            computed: self.engine.computed(element.node),
        };
        self.rules.apply(&ctx, &mut styles);

        if let Some(inline) = element.attr("style") {
            apply_inline(&mut styles, inline);
        }

        ResponsiveStyles::from_default(styles)
    }
}

/// Overlay inline declarations onto `styles`
fn apply_inline(styles: &mut StyleMap, inline: &str) {
    for (property, value) in parse_inline_style(inline) {
        styles.insert(to_camel_case(&property), value);
    }
}
