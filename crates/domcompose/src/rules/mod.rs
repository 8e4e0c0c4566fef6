//! Style exception registry.
//!
//! Tag behaviours are registered as rules instead of being hard-wired into
//! the deriver, so new ones are additive.

mod exceptions;
mod rule;

pub use exceptions::builtin_rules;
pub use rule::{Filter, Rule, RuleContext};

use indexmap::IndexMap;

use domcompose_core::StyleMap;

/// Collection of style exception rules
pub struct Rules {
    /// Built-in rules
    builtin_rules: Vec<Rule>,
    /// Custom rules added by the user (applied after the built-ins)
    custom_rules: IndexMap<String, Rule>,
}

impl Rules {
    /// Create a new Rules instance with the built-in exceptions
    pub fn new() -> Self {
        Self {
            builtin_rules: builtin_rules(),
            custom_rules: IndexMap::new(),
        }
    }

    /// Add a custom rule; a rule with the same key is replaced
    pub fn add(&mut self, key: &str, rule: Rule) {
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Remove a custom rule
    pub fn remove(&mut self, key: &str) -> Option<Rule> {
        self.custom_rules.shift_remove(key)
    }

    /// Apply every matching rule to `styles`, built-ins first
    pub fn apply(&self, ctx: &RuleContext, styles: &mut StyleMap) {
        let tag = ctx.tag();
        for rule in self.builtin_rules.iter().chain(self.custom_rules.values()) {
            if rule.filter.matches(&tag, ctx) {
                rule.apply(ctx, styles);
            }
        }
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.builtin_rules.len() + self.custom_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}
