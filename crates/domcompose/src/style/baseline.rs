//! Per-tag baseline styles
//!
//! The baseline of a tag is the computed style of a pristine, unstyled
//! element of that tag. It is what "default" means when deciding whether an
//! element's computed value was intended by the author.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use super::StyleSnapshot;
use crate::Result;

/// Supplies pristine per-tag computed styles.
///
/// Implementations must never reflect author stylesheets.
pub trait BaselineProvider {
    /// Computed style of a pristine element of `tag`
    fn pristine_style(&self, tag: &str) -> Result<StyleSnapshot>;
}

/// Memoizing front of a [`BaselineProvider`].
///
/// Entries are never invalidated, so one cache can serve repeated full-tree
/// conversions. Provider failures yield an empty snapshot and are not cached.
pub struct BaselineCache {
    provider: Box<dyn BaselineProvider>,
    entries: RefCell<HashMap<String, Rc<StyleSnapshot>>>,
}

impl BaselineCache {
    pub fn new(provider: impl BaselineProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Baseline for `tag`, probing the provider on first request
    pub fn get(&self, tag: &str) -> Rc<StyleSnapshot> {
        let tag = tag.to_lowercase();
        if let Some(hit) = self.entries.borrow().get(&tag) {
            return Rc::clone(hit);
        }

        match self.provider.pristine_style(&tag) {
            Ok(snapshot) => {
                debug!(target: "domcompose::baseline", "probed baseline for <{}> ({} properties)", tag, snapshot.len());
                let snapshot = Rc::new(snapshot);
                self.entries.borrow_mut().insert(tag, Rc::clone(&snapshot));
                snapshot
            }
            Err(err) => {
                warn!(target: "domcompose::baseline", "baseline unavailable for <{}>: {}", tag, err);
                Rc::new(StyleSnapshot::new())
            }
        }
    }

    /// Number of memoized tags
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Default for BaselineCache {
    fn default() -> Self {
        Self::new(UserAgentBaseline::new())
    }
}

/// Initial computed values of an element in an empty document
const INITIAL_VALUES: &[(&str, &str)] = &[
    ("display", "inline"),
    ("position", "static"),
    ("top", "auto"),
    ("right", "auto"),
    ("bottom", "auto"),
    ("left", "auto"),
    ("z-index", "auto"),
    ("float", "none"),
    ("clear", "none"),
    ("box-sizing", "content-box"),
    ("overflow", "visible"),
    ("overflow-x", "visible"),
    ("overflow-y", "visible"),
    ("width", "auto"),
    ("height", "auto"),
    ("min-width", "auto"),
    ("min-height", "auto"),
    ("max-width", "none"),
    ("max-height", "none"),
    ("aspect-ratio", "auto"),
    ("margin-top", "0px"),
    ("margin-right", "0px"),
    ("margin-bottom", "0px"),
    ("margin-left", "0px"),
    ("padding-top", "0px"),
    ("padding-right", "0px"),
    ("padding-bottom", "0px"),
    ("padding-left", "0px"),
    ("background-color", "rgba(0, 0, 0, 0)"),
    ("background-image", "none"),
    ("background-size", "auto"),
    ("background-position", "0% 0%"),
    ("background-repeat", "repeat"),
    ("background-clip", "border-box"),
    ("border-top-width", "0px"),
    ("border-right-width", "0px"),
    ("border-bottom-width", "0px"),
    ("border-left-width", "0px"),
    ("border-top-style", "none"),
    ("border-right-style", "none"),
    ("border-bottom-style", "none"),
    ("border-left-style", "none"),
    ("border-top-color", "rgb(0, 0, 0)"),
    ("border-right-color", "rgb(0, 0, 0)"),
    ("border-bottom-color", "rgb(0, 0, 0)"),
    ("border-left-color", "rgb(0, 0, 0)"),
    ("border-top-left-radius", "0px"),
    ("border-top-right-radius", "0px"),
    ("border-bottom-right-radius", "0px"),
    ("border-bottom-left-radius", "0px"),
    ("opacity", "1"),
    ("box-shadow", "none"),
    ("transform", "none"),
    ("transition", "all 0s ease 0s"),
    ("filter", "none"),
    ("backdrop-filter", "none"),
    ("mix-blend-mode", "normal"),
    ("cursor", "auto"),
    ("color", "rgb(0, 0, 0)"),
    ("font-family", "\"Times New Roman\""),
    ("font-size", "16px"),
    ("font-weight", "400"),
    ("font-style", "normal"),
    ("line-height", "normal"),
    ("letter-spacing", "normal"),
    ("text-align", "start"),
    ("text-decoration-line", "none"),
    ("text-decoration-color", "rgb(0, 0, 0)"),
    ("text-transform", "none"),
    ("text-overflow", "clip"),
    ("white-space", "normal"),
    ("word-break", "normal"),
    ("text-shadow", "none"),
    ("vertical-align", "baseline"),
    ("flex-direction", "row"),
    ("flex-wrap", "nowrap"),
    ("justify-content", "normal"),
    ("align-items", "normal"),
    ("align-content", "normal"),
    ("align-self", "auto"),
    ("flex-grow", "0"),
    ("flex-shrink", "1"),
    ("flex-basis", "auto"),
    ("order", "0"),
    ("gap", "normal"),
    ("row-gap", "normal"),
    ("column-gap", "normal"),
    ("grid-template-columns", "none"),
    ("grid-template-rows", "none"),
    ("grid-column", "auto"),
    ("grid-row", "auto"),
    ("grid-auto-flow", "row"),
    ("list-style-type", "disc"),
    ("list-style-position", "outside"),
    ("border-collapse", "separate"),
    ("visibility", "visible"),
    ("object-fit", "fill"),
    ("object-position", "50% 50%"),
];

const BLOCK_TAGS: &[&str] = &[
    "html", "body", "div", "p", "section", "article", "aside", "header", "footer", "main",
    "nav", "ul", "ol", "form", "figure", "figcaption", "blockquote", "address", "fieldset",
    "pre", "hr", "h1", "h2", "h3", "h4", "h5", "h6", "dl", "dt", "dd", "details", "summary",
];

/// User-agent stylesheet rules for a tag, on top of the initial values
fn tag_rules(tag: &str) -> Vec<(&'static str, &'static str)> {
    let mut rules = Vec::new();
    if BLOCK_TAGS.contains(&tag) {
        rules.push(("display", "block"));
    }

    let heading = |size: &'static str, margin: &'static str| {
        vec![
            ("display", "block"),
            ("font-size", size),
            ("font-weight", "700"),
            ("margin-top", margin),
            ("margin-bottom", margin),
        ]
    };
    let control = vec![
        ("display", "inline-block"),
        ("font-size", "13.3333px"),
        ("font-family", "Arial"),
        ("cursor", "default"),
        ("padding-top", "1px"),
        ("padding-bottom", "1px"),
        ("padding-left", "2px"),
        ("padding-right", "2px"),
        ("border-top-width", "2px"),
        ("border-right-width", "2px"),
        ("border-bottom-width", "2px"),
        ("border-left-width", "2px"),
        ("border-top-style", "inset"),
        ("border-right-style", "inset"),
        ("border-bottom-style", "inset"),
        ("border-left-style", "inset"),
    ];

    let table_cell = [
        ("display", "table-cell"),
        ("padding-top", "1px"),
        ("padding-right", "1px"),
        ("padding-bottom", "1px"),
        ("padding-left", "1px"),
    ];

    match tag {
        "body" => rules.extend([
            ("margin-top", "8px"),
            ("margin-right", "8px"),
            ("margin-bottom", "8px"),
            ("margin-left", "8px"),
        ]),
        "p" | "dl" => rules.extend([("margin-top", "16px"), ("margin-bottom", "16px")]),
        "h1" => rules.extend(heading("32px", "21.44px")),
        "h2" => rules.extend(heading("24px", "19.92px")),
        "h3" => rules.extend(heading("18.72px", "18.72px")),
        "h4" => rules.extend(heading("16px", "21.28px")),
        "h5" => rules.extend(heading("13.28px", "22.1776px")),
        "h6" => rules.extend(heading("10.72px", "24.9776px")),
        "ul" => rules.extend([
            ("margin-top", "16px"),
            ("margin-bottom", "16px"),
            ("padding-left", "40px"),
        ]),
        "ol" => rules.extend([
            ("margin-top", "16px"),
            ("margin-bottom", "16px"),
            ("padding-left", "40px"),
            ("list-style-type", "decimal"),
        ]),
        "li" => rules.push(("display", "list-item")),
        "a" => rules.extend([
            ("color", "rgb(0, 0, 238)"),
            ("text-decoration-line", "underline"),
            ("text-decoration-color", "rgb(0, 0, 238)"),
            ("cursor", "pointer"),
        ]),
        "strong" | "b" => rules.push(("font-weight", "700")),
        "em" | "i" => rules.push(("font-style", "italic")),
        "pre" => rules.extend([
            ("white-space", "pre"),
            ("font-family", "monospace"),
            ("font-size", "13px"),
            ("margin-top", "13px"),
            ("margin-bottom", "13px"),
        ]),
        "code" => rules.extend([("font-family", "monospace"), ("font-size", "13px")]),
        "blockquote" | "figure" => rules.extend([
            ("margin-top", "16px"),
            ("margin-bottom", "16px"),
            ("margin-left", "40px"),
            ("margin-right", "40px"),
        ]),
        "hr" => rules.extend([
            ("margin-top", "8px"),
            ("margin-bottom", "8px"),
            ("border-top-width", "1px"),
            ("border-right-width", "1px"),
            ("border-bottom-width", "1px"),
            ("border-left-width", "1px"),
            ("border-top-style", "inset"),
            ("border-right-style", "inset"),
            ("border-bottom-style", "inset"),
            ("border-left-style", "inset"),
        ]),
        "button" => {
            rules.extend(control);
            rules.extend([
                ("padding-left", "6px"),
                ("padding-right", "6px"),
                ("border-top-style", "outset"),
                ("border-right-style", "outset"),
                ("border-bottom-style", "outset"),
                ("border-left-style", "outset"),
                ("background-color", "rgb(239, 239, 239)"),
                ("text-align", "center"),
            ]);
        }
        "input" | "select" | "textarea" => rules.extend(control),
        "table" => rules.extend([("display", "table"), ("box-sizing", "border-box")]),
        "tr" => rules.push(("display", "table-row")),
        "td" => rules.extend(table_cell),
        "th" => {
            rules.extend(table_cell);
            rules.extend([("font-weight", "700"), ("text-align", "center")]);
        }
        "img" | "video" => rules.push(("display", "inline")),
        "svg" => rules.push(("overflow", "hidden")),
        _ => {}
    }

    if tag == "video" {
        rules.push(("object-fit", "contain"));
    }
    rules
}

/// Built-in provider modelled on a browser's user-agent stylesheet.
///
/// Works as a detached, unstyled document: no author styling is ever visible
/// to it.
#[derive(Debug, Clone, Default)]
pub struct UserAgentBaseline;

impl UserAgentBaseline {
    pub fn new() -> Self {
        Self
    }

    /// Initial values shared by all tags
    pub fn initial_values(&self) -> StyleSnapshot {
        INITIAL_VALUES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// UA rules specific to `tag`
    pub fn tag_rules(&self, tag: &str) -> StyleSnapshot {
        tag_rules(&tag.to_lowercase())
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl BaselineProvider for UserAgentBaseline {
    fn pristine_style(&self, tag: &str) -> Result<StyleSnapshot> {
        let mut snapshot = self.initial_values();
        snapshot.extend(self.tag_rules(tag));
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComposeError;
    use std::cell::Cell;

    struct CountingProvider {
        calls: Rc<Cell<usize>>,
    }

    impl BaselineProvider for CountingProvider {
        fn pristine_style(&self, tag: &str) -> Result<StyleSnapshot> {
            self.calls.set(self.calls.get() + 1);
            let mut snapshot = StyleSnapshot::new();
            snapshot.insert("display".to_string(), format!("{}-display", tag));
            Ok(snapshot)
        }
    }

    struct BrokenProvider;

    impl BaselineProvider for BrokenProvider {
        fn pristine_style(&self, _tag: &str) -> Result<StyleSnapshot> {
            Err(ComposeError::Baseline("offscreen document unavailable".to_string()))
        }
    }

    #[test]
    fn test_cache_memoizes_per_tag() {
        let calls = Rc::new(Cell::new(0));
        let cache = BaselineCache::new(CountingProvider { calls: Rc::clone(&calls) });

        assert_eq!(cache.get("div").get("display").map(String::as_str), Some("div-display"));
        cache.get("DIV");
        cache.get("span");
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_fails_closed() {
        let cache = BaselineCache::new(BrokenProvider);
        assert!(cache.get("div").is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_user_agent_baseline() {
        let ua = UserAgentBaseline::new();
        let div = ua.pristine_style("div").unwrap();
        assert_eq!(div.get("display").map(String::as_str), Some("block"));
        let span = ua.pristine_style("span").unwrap();
        assert_eq!(span.get("display").map(String::as_str), Some("inline"));
        let h1 = ua.pristine_style("h1").unwrap();
        assert_eq!(h1.get("font-size").map(String::as_str), Some("32px"));
        let ol = ua.pristine_style("ol").unwrap();
        assert_eq!(ol.get("list-style-type").map(String::as_str), Some("decimal"));
    }

    #[test]
    fn test_table_baselines() {
        let ua = UserAgentBaseline::new();
        let get = |tag: &str, property: &str| ua.pristine_style(tag).unwrap().get(property).cloned();

        assert_eq!(get("table", "display").as_deref(), Some("table"));
        assert_eq!(get("tr", "display").as_deref(), Some("table-row"));
        assert_eq!(get("td", "display").as_deref(), Some("table-cell"));
        assert_eq!(get("td", "padding-left").as_deref(), Some("1px"));
        assert_eq!(get("td", "font-weight").as_deref(), Some("400"));

        assert_eq!(get("th", "display").as_deref(), Some("table-cell"));
        assert_eq!(get("th", "padding-top").as_deref(), Some("1px"));
        assert_eq!(get("th", "font-weight").as_deref(), Some("700"));
        assert_eq!(get("th", "text-align").as_deref(), Some("center"));
    }
}
