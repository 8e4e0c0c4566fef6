//! Tree converter: turns a DOM subtree into a [`ComposeNode`] tree.
//!
//! Each element goes through these branches, first match wins:
//!
//! 1. `br` emits nothing
//! 2. a correlation id matching a component mapping emits the mapped
//!    component, without recursing
//! 3. a rich-text container with children emits its raw inner markup
//! 4. `svg` emits its markup as a base64 data URI
//! 5. a `div` holding only text gets one synthetic `text` child
//! 6. direct `br` children switch to line-break merge mode
//! 7. everything else: tag-specific props and bundles, then recursion

mod bundles;
mod text;

pub use bundles::{absolute_url, form_info, image_info, link_info, video_info};
pub use text::{direct_text, full_text, is_clamped};

use std::cell::Cell;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use indexmap::IndexMap;
use log::debug;
use url::Url;

use crate::classify::{classify, ComponentKind};
use crate::derive::StyleDeriver;
use crate::metadata;
use crate::node::{Node, NodeRef};
use crate::options::ConvertOptions;
use crate::rules::Rules;
use crate::style::StyleEngine;
use crate::utilities::{collapse_whitespace, strip_trailing_dots, FORM_ELEMENTS};
use crate::{ComposeError, Result};
use domcompose_core::{
    find_mapping, ComponentMapping, ComposeNode, DesignTokens, Metadata, PropValue, ResponsiveStyles,
};

/// Attributes that never reach `attrs`
const SKIPPED_ATTRIBUTES: &[&str] = &["class", "style"];

/// Recursive converter for one run.
///
/// Uids and slot ids are numbered per converter, so build a fresh one for
/// every run.
pub struct Converter<'a> {
    engine: &'a StyleEngine<'a>,
    deriver: StyleDeriver<'a>,
    options: &'a ConvertOptions,
    mappings: &'a [ComponentMapping],
    tokens: &'a DesignTokens,
    base_url: Option<Url>,
    next_uid: Cell<usize>,
    next_slot: Cell<usize>,
}

impl<'a> Converter<'a> {
    pub fn new(
        engine: &'a StyleEngine<'a>,
        rules: &'a Rules,
        options: &'a ConvertOptions,
        mappings: &'a [ComponentMapping],
        tokens: &'a DesignTokens,
    ) -> Result<Self> {
        let base_url = options.base_url.as_deref().map(Url::parse).transpose()?;
        Ok(Self {
            engine,
            deriver: StyleDeriver::new(engine, rules, options),
            options,
            mappings,
            tokens,
            base_url,
            next_uid: Cell::new(0),
            next_slot: Cell::new(0),
        })
    }

    /// Design tokens of this run
    pub fn tokens(&self) -> &DesignTokens {
        self.tokens
    }

    /// Convert `element` and its subtree.
    ///
    /// Returns `None` for nodes that emit nothing (`br`, text, comments).
    pub fn convert(&self, element: &NodeRef) -> Result<Option<ComposeNode>> {
        self.convert_at(element, 0)
    }

    fn convert_at(&self, element: &NodeRef, depth: usize) -> Result<Option<ComposeNode>> {
        let node = element.node;
        if !node.is_element() || node.is_tag("br") {
            return Ok(None);
        }
        if depth > self.options.max_depth {
            return Err(ComposeError::DepthExceeded(self.options.max_depth));
        }

        let computed = self.engine.computed(node);
        let kind = classify(node, computed);

        if let Some(mapped) = self.convert_mapped(element) {
            return Ok(Some(mapped));
        }

        if kind == ComponentKind::RichText && node.has_children() {
            let mut out = self.element_node(kind.as_str(), element, metadata::generate(element));
            out.props
                .insert("html".to_string(), PropValue::string(node.inner_html()));
            return Ok(Some(out));
        }

        if node.is_tag("svg") {
            let mut out = self.element_node(kind.as_str(), element, metadata::generate(element));
            out.props
                .insert("src".to_string(), PropValue::image_url(svg_data_uri(node)));
            return Ok(Some(out));
        }

        if node.is_tag("div") && !node.has_element_children() {
            let text = full_text(node, computed, self.engine.rendered_text(node), &node.text_content());
            if !text.is_empty() {
                let out = self.element_node(kind.as_str(), element, metadata::generate(element));
                let child = self.text_node(element, text);
                return Ok(Some(self.attach(out, vec![child])));
            }
        }

        if kind != ComponentKind::RichText && node.children().any(|c| c.is_tag("br")) {
            return self.convert_line_breaks(element, depth).map(Some);
        }

        self.convert_default(element, kind, depth).map(Some)
    }

    /// Terminal node for an element bound to a component mapping
    fn convert_mapped(&self, element: &NodeRef) -> Option<ComposeNode> {
        let id = element.attr(&self.options.correlation_attribute)?;
        let matched = find_mapping(self.mappings, id)?;
        debug!(
            target: "domcompose::convert",
            "{} {} mapped to {}",
            self.options.correlation_attribute,
            id,
            matched.mapping.code_component_name
        );
        let mut out = self.element_node(&matched.mapping.code_component_name, element, metadata::generate(element));
        out.props = matched.props();
        Some(out)
    }

    /// Merge mode: consecutive text runs become one text node, flushed at
    /// every element boundary. The element itself is always a `box`.
    fn convert_line_breaks(&self, element: &NodeRef, depth: usize) -> Result<ComposeNode> {
        let out = self.element_node(ComponentKind::Box.as_str(), element, metadata::generate(element));
        let mut children = Vec::new();
        let mut runs: Vec<String> = Vec::new();

        for child in element.children() {
            if child.is_text() {
                let text = collapse_whitespace(&child.text_content());
                if !text.is_empty() {
                    runs.push(text);
                }
            } else if child.is_element() && !child.is_tag("br") {
                self.flush_runs(element, &mut runs, &mut children);
                if let Some(converted) = self.convert_at(&element.child(child), depth + 1)? {
                    children.push(converted);
                }
            }
        }
        self.flush_runs(element, &mut runs, &mut children);

        Ok(self.attach(out, children))
    }

    fn flush_runs(&self, parent: &NodeRef, runs: &mut Vec<String>, children: &mut Vec<ComposeNode>) {
        if runs.is_empty() {
            return;
        }
        let text = strip_trailing_dots(&runs.join(" "));
        runs.clear();
        if !text.is_empty() {
            children.push(self.text_node(parent, text));
        }
    }

    fn convert_default(&self, element: &NodeRef, kind: ComponentKind, depth: usize) -> Result<ComposeNode> {
        let node = element.node;
        let tag = node.tag_name();
        let computed = self.engine.computed(node);
        let base = self.base_url.as_ref();
        let mut metadata = metadata::generate(element);
        let mut props = IndexMap::new();

        let label = || full_text(node, computed, self.engine.rendered_text(node), &node.text_content());

        match tag.as_str() {
            "button" => {
                props.insert("label".to_string(), PropValue::string(label()));
            }
            "a" => {
                let href = node.attr("href").unwrap_or_default();
                props.insert("href".to_string(), PropValue::string(href));
                props.insert("label".to_string(), PropValue::string(label()));
                for name in ["target", "rel"] {
                    if let Some(value) = node.attr(name) {
                        props.insert(name.to_string(), PropValue::string(value));
                    }
                }
                metadata.link_info = Some(link_info(href, base));
            }
            "img" => {
                let src = absolute_url(node.attr("src").unwrap_or_default(), base);
                let info = image_info(node, &src, computed);
                props.insert("src".to_string(), PropValue::image_url(src));
                props.insert("alt".to_string(), PropValue::string(info.alt.clone()));
                metadata.image_info = Some(info);
                return Ok(self.element_node(kind.as_str(), element, metadata).with_props(props));
            }
            "video" => {
                let info = video_info(node, base);
                if let Some(first) = info.sources.first() {
                    props.insert("src".to_string(), PropValue::string(first.src.clone()));
                }
                if !info.poster.is_empty() {
                    props.insert("poster".to_string(), PropValue::image_url(info.poster.clone()));
                }
                metadata.video_info = Some(info);
                return Ok(self.element_node(kind.as_str(), element, metadata).with_props(props));
            }
            t if FORM_ELEMENTS.contains(&t) => {
                metadata.form_info = Some(form_info(node));
            }
            _ => {}
        }

        let out = self.element_node(kind.as_str(), element, metadata).with_props(props);

        let mut children = Vec::new();
        for child in element.element_children() {
            if let Some(converted) = self.convert_at(&element.child(child), depth + 1)? {
                children.push(converted);
            }
        }

        let mut out = self.attach(out, children);
        if tag != "a" {
            let dom_text = direct_text(node);
            if !dom_text.is_empty() {
                let text = full_text(node, computed, self.engine.rendered_text(node), &dom_text);
                out.props.insert("text".to_string(), PropValue::string(text));
            }
        }
        Ok(out)
    }

    /// Node for a source element with its derived styles and attributes
    fn element_node(&self, kind: &str, element: &NodeRef, metadata: Metadata) -> ComposeNode {
        let mut out = ComposeNode::new(kind, self.uid(), metadata).with_styles(self.deriver.derive(element));
        out.attrs = element
            .node
            .attrs()
            .filter(|(name, _)| !SKIPPED_ATTRIBUTES.contains(name))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        out
    }

    /// Synthetic text node under `parent`
    fn text_node(&self, parent: &NodeRef, text: String) -> ComposeNode {
        let mut out = ComposeNode::new(ComponentKind::Text.as_str(), self.uid(), metadata::synthetic_text(parent, &text))
            .with_styles(ResponsiveStyles::default());
        out.props.insert("text".to_string(), PropValue::string(text));
        out
    }

    fn attach(&self, out: ComposeNode, children: Vec<ComposeNode>) -> ComposeNode {
        if children.is_empty() {
            return out;
        }
        out.with_children(self.slot_id(), children)
    }

    fn uid(&self) -> String {
        let n = self.next_uid.get() + 1;
        self.next_uid.set(n);
        format!("node-{}", n)
    }

    fn slot_id(&self) -> String {
        let n = self.next_slot.get() + 1;
        self.next_slot.set(n);
        format!("slot-{}", n)
    }
}

/// `data:image/svg+xml;base64,…` URI of an element's markup
pub fn svg_data_uri(node: &Node) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64_STANDARD.encode(node.outer_html()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::style::{BaselineCache, SnapshotStyleSource};
    use domcompose_core::{MappedNodeId, CHILDREN_PROP};

    fn run(root: &Node, source: &SnapshotStyleSource, options: &ConvertOptions, mappings: &[ComponentMapping]) -> Result<Option<ComposeNode>> {
        let cache = BaselineCache::default();
        let rules = Rules::new();
        let engine = StyleEngine::new(source, &cache, &options.diagnostics);
        let tokens = DesignTokens::default();
        let converter = Converter::new(&engine, &rules, options, mappings, &tokens)?;
        converter.convert(&NodeRef::new(root))
    }

    fn convert(root: &Node) -> ComposeNode {
        run(root, &SnapshotStyleSource::new(), &ConvertOptions::default(), &[])
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_line_break_emits_nothing() {
        let out = run(&Node::element("br"), &SnapshotStyleSource::new(), &ConvertOptions::default(), &[]).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_leaf_round_trip() {
        let out = convert(&Node::element("section"));
        assert_eq!(out.kind, "section");
        assert!(out.slots.is_empty());
        assert!(!out.props.contains_key(CHILDREN_PROP));
        assert!(out.styles.default.responsive_styles.tablet.is_empty());
    }

    #[test]
    fn test_de_truncation() {
        let p = Node::element_with_attrs("p", vec![("class", "line-clamp-1")])
            .with_child(Node::text("Lorem ipsum dolor sit amet consectetur"))
            .with_id(7);
        let mut source = SnapshotStyleSource::new();
        source.insert_rendered_text(7, "Lorem ipsum dolor sit amet...");
        let out = run(&p, &source, &ConvertOptions::default(), &[]).unwrap().unwrap();
        assert_eq!(out.prop_str("text"), Some("Lorem ipsum dolor sit amet consectetur"));
    }

    #[test]
    fn test_trailing_dots_stripped_from_dom_text() {
        let span = Node::element("span").with_child(Node::text("Read more..."));
        assert_eq!(convert(&span).prop_str("text"), Some("Read more"));
    }

    #[test]
    fn test_links() {
        let mail = Node::element_with_attrs("a", vec![("href", "mailto:a@b.com")]).with_child(Node::text("Mail"));
        let out = convert(&mail);
        let info = out.metadata.link_info.clone().unwrap();
        assert!(info.is_email);
        assert!(!info.is_internal && !info.is_external && !info.is_phone);
        assert_eq!(out.prop_str("label"), Some("Mail"));
        assert_eq!(out.prop_str("text"), None);

        let anchor = Node::element_with_attrs("a", vec![("href", "#section"), ("target", "_self")]);
        let out = convert(&anchor);
        assert!(out.metadata.link_info.as_ref().unwrap().is_internal);
        assert_eq!(out.prop_str("target"), Some("_self"));
        assert_eq!(out.kind, "link");
    }

    #[test]
    fn test_mapping_wins_and_stops_recursion() {
        let root = Node::element_with_attrs("div", vec![("data-figma-id", "12:34")])
            .with_child(Node::element("h1").with_child(Node::text("Title")))
            .with_child(Node::element("p").with_child(Node::text("Body")));
        let mapping: ComponentMapping = serde_json::from_value(serde_json::json!({
            "nodeIds": [{"nodeId": "12:34", "variantProperties": {"size": "lg"}}],
            "codeComponentName": "HeroBanner",
            "propMappings": {"size": "sm", "tone": "dark"}
        }))
        .unwrap();
        let other = ComponentMapping {
            node_ids: vec![MappedNodeId { node_id: "12:34".to_string(), ..Default::default() }],
            code_component_name: "Shadowed".to_string(),
            ..Default::default()
        };

        let out = run(&root, &SnapshotStyleSource::new(), &ConvertOptions::default(), &[mapping, other])
            .unwrap()
            .unwrap();
        assert_eq!(out.kind, "HeroBanner");
        assert!(out.slots.is_empty());
        assert_eq!(out.prop_str("size"), Some("lg"));
        assert_eq!(out.prop_str("tone"), Some("dark"));
        assert_eq!(out.attrs.get("data-figma-id").map(String::as_str), Some("12:34"));
    }

    #[test]
    fn test_rich_text_keeps_markup() {
        let article = Node::element_with_attrs("article", vec![("class", "prose")])
            .with_child(Node::element("p").with_child(Node::text("Hi <there>")));
        let out = convert(&article);
        assert_eq!(out.kind, "rich-text");
        assert_eq!(out.prop_str("html"), Some("<p>Hi &lt;there&gt;</p>"));
        assert!(out.is_leaf());
    }

    #[test]
    fn test_svg_becomes_data_uri() {
        let svg = Node::element_with_attrs("svg", vec![("viewBox", "0 0 10 10")])
            .with_child(Node::element_with_attrs("path", vec![("d", "M0 0")]));
        let out = convert(&svg);
        assert_eq!(out.kind, "image");
        assert!(out.is_leaf());
        let Some(PropValue::ImageUrl { static_value }) = out.props.get("src") else {
            panic!("expected imageUrl prop");
        };
        let encoded = static_value.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let markup = String::from_utf8(BASE64_STANDARD.decode(encoded).unwrap()).unwrap();
        assert!(markup.starts_with("<svg viewBox=\"0 0 10 10\">"));
    }

    #[test]
    fn test_text_div_gets_synthetic_child() {
        let div = Node::element("div").with_child(Node::text("  Hello   world "));
        let out = convert(&div);
        assert_eq!(out.kind, "text");
        assert_eq!(out.prop_str("text"), None);
        let children = out.children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, "text");
        assert_eq!(children[0].prop_str("text"), Some("Hello world"));
        assert_eq!(children[0].metadata.source_info.tag_name, "#text");
    }

    #[test]
    fn test_line_break_merge() {
        let div = Node::element("div")
            .with_child(Node::text("one"))
            .with_child(Node::element("br"))
            .with_child(Node::text("two"))
            .with_child(Node::element("span").with_child(Node::text("three")))
            .with_child(Node::text("four"));
        let out = convert(&div);
        assert_eq!(out.kind, "box");
        let children = out.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].prop_str("text"), Some("one two"));
        assert_eq!(children[1].kind, "text");
        assert_eq!(children[1].prop_str("text"), Some("three"));
        assert_eq!(children[2].prop_str("text"), Some("four"));
    }

    #[test]
    fn test_image_is_terminal_and_absolute() {
        let img = Node::element_with_attrs("img", vec![("src", "img/a.png"), ("alt", "A"), ("width", "64")]);
        let options = ConvertOptions {
            base_url: Some("https://example.com/blog/".to_string()),
            ..Default::default()
        };
        let out = run(&img, &SnapshotStyleSource::new(), &options, &[]).unwrap().unwrap();
        assert_eq!(out.kind, "image");
        assert_eq!(out.prop_str("src"), Some("https://example.com/blog/img/a.png"));
        assert_eq!(out.prop_str("alt"), Some("A"));
        assert_eq!(out.metadata.image_info.as_ref().unwrap().width, Some(64));
        assert_eq!(out.default_styles().get("maxWidth").map(String::as_str), Some("100%"));
    }

    #[test]
    fn test_video_without_source_is_kept() {
        let video = Node::element_with_attrs("video", vec![("controls", "")])
            .with_child(Node::element("p").with_child(Node::text("Unsupported")));
        let out = convert(&video);
        assert_eq!(out.kind, "video");
        assert!(out.is_leaf());
        assert!(!out.props.contains_key("src"));
        let info = out.metadata.video_info.unwrap();
        assert!(info.sources.is_empty());
        assert!(info.controls);
    }

    #[test]
    fn test_button_and_form_controls() {
        let form = Node::element("form")
            .with_child(Node::element_with_attrs("input", vec![("type", "email"), ("name", "email"), ("required", "")]))
            .with_child(Node::element("button").with_child(Node::text("Subscribe")));
        let out = convert(&form);
        assert_eq!(out.metadata.form_info.as_ref().map(|f| f.input_type.as_str()), Some("form"));
        let children = out.children();
        assert_eq!(children.len(), 2);
        let input = children[0].metadata.form_info.as_ref().unwrap();
        assert_eq!(input.input_type, "email");
        assert!(input.required);
        assert_eq!(children[1].kind, "button");
        assert_eq!(children[1].prop_str("label"), Some("Subscribe"));
    }

    #[test]
    fn test_attrs_skip_class_and_style() {
        let node = Node::element_with_attrs(
            "section",
            vec![("class", "hero"), ("style", "color: red"), ("id", "top"), ("aria-label", "Top")],
        );
        let out = convert(&node);
        assert_eq!(out.attrs.keys().map(String::as_str).collect::<Vec<_>>(), vec!["id", "aria-label"]);
        assert_eq!(out.default_styles().get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_uids_are_unique() {
        let list = (0..5).fold(Node::element("ul"), |ul, i| {
            ul.with_child(Node::element("li").with_child(Node::text(&format!("item {}", i))))
        });
        let root = Node::element("main")
            .with_child(list)
            .with_child(Node::element("div").with_child(Node::text("a")).with_child(Node::element("br")).with_child(Node::text("b")));
        let out = convert(&root);
        let uids: HashSet<&str> = out.descendants().iter().map(|n| n.uid.as_str()).collect();
        assert_eq!(uids.len(), out.count());
        assert!(out.count() > 8);
    }

    #[test]
    fn test_depth_limit() {
        let root = (0..4).fold(Node::element("div"), |inner, _| Node::element("div").with_child(inner));
        let options = ConvertOptions {
            max_depth: 2,
            ..Default::default()
        };
        let err = run(&root, &SnapshotStyleSource::new(), &options, &[]).unwrap_err();
        assert!(matches!(err, ComposeError::DepthExceeded(2)));
    }

    #[test]
    fn test_invalid_base_url() {
        let options = ConvertOptions {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let err = run(&Node::element("div"), &SnapshotStyleSource::new(), &options, &[]).unwrap_err();
        assert!(matches!(err, ComposeError::Url(_)));
    }
}
