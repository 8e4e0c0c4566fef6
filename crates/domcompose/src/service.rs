//! ComposeService - the main entry point for page conversions.

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::convert::Converter;
use crate::node::{Node, NodeRef};
use crate::options::ConvertOptions;
use crate::protocol::{InboundMessage, MessageEnvelope, OriginPolicy, OutboundMessage};
use crate::rules::{Rule, Rules};
use crate::style::{BaselineCache, BaselineProvider, StyleEngine, StyleSource};
use crate::{ComposeError, Result};
use domcompose_core::{ComponentMapping, ComposeNode, DesignTokens, Export};

/// Inputs of one conversion run
pub struct ConversionRequest<'a> {
    /// Root element; a missing root fails the run
    pub root: Option<&'a Node>,
    /// Computed styles of the rendered tree
    pub styles: &'a dyn StyleSource,
    /// Component mappings, first match wins
    pub mappings: &'a [ComponentMapping],
    /// Design tokens, passed through to the converter
    pub tokens: DesignTokens,
}

impl<'a> ConversionRequest<'a> {
    pub fn new(root: &'a Node, styles: &'a dyn StyleSource) -> Self {
        Self {
            root: Some(root),
            styles,
            mappings: &[],
            tokens: DesignTokens::default(),
        }
    }

    pub fn with_mappings(mut self, mappings: &'a [ComponentMapping]) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn with_tokens(mut self, tokens: DesignTokens) -> Self {
        self.tokens = tokens;
        self
    }
}

/// Result of the last successful run
#[derive(Debug, Clone, Default)]
pub struct ConversionSession {
    last: Option<ComposeNode>,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_result(&self) -> bool {
        self.last.is_some()
    }

    pub fn last_result(&self) -> Option<&ComposeNode> {
        self.last.as_ref()
    }

    /// Replace the stored result
    pub fn store(&mut self, node: ComposeNode) {
        self.last = Some(node);
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

/// The main service for converting rendered pages
pub struct ComposeService {
    options: ConvertOptions,
    rules: Rules,
    baseline: BaselineCache,
    session: ConversionSession,
}

impl ComposeService {
    /// Create a ComposeService with default options
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a ComposeService with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
            baseline: BaselineCache::default(),
            session: ConversionSession::new(),
        }
    }

    /// Replace the baseline provider; the cache starts empty
    pub fn with_baseline(mut self, provider: impl BaselineProvider + 'static) -> Self {
        self.baseline = BaselineCache::new(provider);
        self
    }

    /// Add a custom style exception
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut ConvertOptions {
        &mut self.options
    }

    pub fn session(&self) -> &ConversionSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ConversionSession {
        &mut self.session
    }

    /// Convert a rendered tree and remember the result
    pub fn convert(&mut self, request: &ConversionRequest) -> Result<ComposeNode> {
        let started = Instant::now();
        let node = self.run(request).map_err(|err| {
            error!(target: "domcompose::service", "conversion failed: {}", err);
            err
        })?;
        info!(
            target: "domcompose::service",
            "converted {} nodes in {:.2?}",
            node.count(),
            started.elapsed()
        );
        self.session.store(node.clone());
        Ok(node)
    }

    fn run(&self, request: &ConversionRequest) -> Result<ComposeNode> {
        let root = request.root.ok_or(ComposeError::MissingRoot)?;
        let engine = StyleEngine::new(request.styles, &self.baseline, &self.options.diagnostics);
        let converter = Converter::new(&engine, &self.rules, &self.options, request.mappings, &request.tokens)?;
        converter
            .convert(&NodeRef::new(root))?
            .ok_or_else(|| ComposeError::InvalidInput(format!("<{}> does not produce a node", root.tag_name())))
    }

    /// Parse markup, approximate its styles and convert its `body`
    #[cfg(feature = "html")]
    pub fn convert_html(&mut self, html: &str, mappings: &[ComponentMapping], tokens: DesignTokens) -> Result<ComposeNode> {
        use crate::style::{SnapshotStyleSource, UserAgentBaseline};

        let document = crate::html::parse_document(html);
        let styles = SnapshotStyleSource::approximate(&document, &UserAgentBaseline::new());
        let body = document.find_element("body").unwrap_or(&document);
        let request = ConversionRequest::new(body, &styles)
            .with_mappings(mappings)
            .with_tokens(tokens);
        self.convert(&request)
    }

    /// Convert and wrap the result for download
    pub fn convert_and_export(
        &mut self,
        request: &ConversionRequest,
        page_url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Export> {
        let node = self.convert(request)?;
        Ok(Export::new(&node, page_url, timestamp)?)
    }

    /// Answer a cross-window message.
    ///
    /// Returns `None` when the message is ignored. A stored result is
    /// replayed when `replay_cached` is set.
    pub fn deliver(&mut self, envelope: &MessageEnvelope, request: &ConversionRequest) -> Option<OutboundMessage> {
        let policy = OriginPolicy::new(&self.options.allowed_origins);
        match policy.accept(envelope)? {
            InboundMessage::RequestHtmlToJson => {}
        }

        if self.options.replay_cached {
            if let Some(last) = self.session.last_result() {
                info!(target: "domcompose::service", "replaying cached result to {}", envelope.origin);
                return Some(OutboundMessage::response(last.clone()));
            }
        }

        Some(match self.convert(request) {
            Ok(node) => OutboundMessage::response(node),
            Err(err) => OutboundMessage::error(err),
        })
    }
}

impl Default for ComposeService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{SnapshotStyleSource, StyleSnapshot};
    use serde_json::json;

    const ORIGIN: &str = "https://builder.example.com";

    struct NoBaseline;

    impl BaselineProvider for NoBaseline {
        fn pristine_style(&self, tag: &str) -> Result<StyleSnapshot> {
            Err(ComposeError::Baseline(format!("no offscreen document for <{}>", tag)))
        }
    }

    fn page() -> Node {
        Node::element("main")
            .with_id(1)
            .with_child(Node::element("h1").with_id(2).with_child(Node::text("Welcome")))
            .with_child(Node::element("p").with_id(3).with_child(Node::text("Hello")))
    }

    fn service() -> ComposeService {
        ComposeService::with_options(ConvertOptions {
            allowed_origins: vec![ORIGIN.to_string()],
            ..Default::default()
        })
    }

    fn request_envelope() -> MessageEnvelope {
        MessageEnvelope::new(ORIGIN, json!({"type": "request-html-to-json"}))
    }

    #[test]
    fn test_convert_stores_result() {
        let root = page();
        let styles = SnapshotStyleSource::new();
        let mut service = service();
        assert!(!service.session().has_result());

        let node = service.convert(&ConversionRequest::new(&root, &styles)).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[0].kind, "header");
        assert_eq!(service.session().last_result(), Some(&node));

        service.session_mut().clear();
        assert!(!service.session().has_result());
    }

    #[test]
    fn test_missing_root() {
        let styles = SnapshotStyleSource::new();
        let request = ConversionRequest {
            root: None,
            styles: &styles,
            mappings: &[],
            tokens: DesignTokens::default(),
        };
        let mut service = service();
        assert!(matches!(service.convert(&request), Err(ComposeError::MissingRoot)));
        assert!(!service.session().has_result());

        match service.deliver(&request_envelope(), &request) {
            Some(OutboundMessage::Error { error }) => assert!(error.contains("root")),
            other => panic!("expected error message, got {:?}", other),
        }
    }

    #[test]
    fn test_deliver_replays_cached_result() {
        let root = page();
        let styles = SnapshotStyleSource::new();
        let request = ConversionRequest::new(&root, &styles);
        let mut service = service();

        let first = service.deliver(&request_envelope(), &request);
        let Some(OutboundMessage::Response { data }) = first else {
            panic!("expected response");
        };

        let other_root = Node::element("section");
        let replayed = service.deliver(&request_envelope(), &ConversionRequest::new(&other_root, &styles));
        assert_eq!(replayed, Some(OutboundMessage::Response { data }));

        service.options_mut().replay_cached = false;
        let Some(OutboundMessage::Response { data }) = service.deliver(&request_envelope(), &ConversionRequest::new(&other_root, &styles)) else {
            panic!("expected response");
        };
        assert_eq!(data.kind, "section");
    }

    #[test]
    fn test_deliver_ignores_foreign_origin() {
        let root = page();
        let styles = SnapshotStyleSource::new();
        let mut service = service();
        let envelope = MessageEnvelope::new("https://elsewhere.example", json!({"type": "request-html-to-json"}));
        assert!(service.deliver(&envelope, &ConversionRequest::new(&root, &styles)).is_none());
        assert!(!service.session().has_result());
    }

    #[test]
    fn test_custom_rule() {
        let root = page();
        let styles = SnapshotStyleSource::new();
        let mut service = service();
        service.add_rule(
            "heading-caps",
            Rule::for_tag("h1", |_, styles| {
                styles.insert("textTransform".to_string(), "uppercase".to_string());
            }),
        );
        let node = service.convert(&ConversionRequest::new(&root, &styles)).unwrap();
        let heading = &node.children()[0];
        assert_eq!(heading.default_styles().get("textTransform").map(String::as_str), Some("uppercase"));
        assert_eq!(heading.default_styles().get("display").map(String::as_str), Some("block"));
    }

    #[test]
    fn test_failing_baseline_still_converts() {
        let root = page();
        let mut styles = SnapshotStyleSource::new();
        let computed: StyleSnapshot = [("color".to_string(), "rgb(0, 0, 0)".to_string())].into_iter().collect();
        styles.insert(3, computed);

        let mut service = ComposeService::new().with_baseline(NoBaseline);
        let node = service.convert(&ConversionRequest::new(&root, &styles)).unwrap();
        // with no baseline every value counts as author-set
        assert_eq!(node.children()[1].default_styles().get("color").map(String::as_str), Some("rgb(0, 0, 0)"));
    }

    #[test]
    fn test_convert_and_export() {
        let root = page();
        let styles = SnapshotStyleSource::new();
        let mut service = service();
        let timestamp = DateTime::parse_from_rfc3339("2024-05-01T10:20:30Z").unwrap().with_timezone(&Utc);
        let export = service
            .convert_and_export(&ConversionRequest::new(&root, &styles), "https://example.com/", timestamp)
            .unwrap();
        assert!(export.file_name.starts_with("example.com_root-2024-05-01T10:20:30"));
        assert!(export.json.contains("\"type\": \"box\""));
    }

    #[cfg(feature = "html")]
    #[test]
    fn test_convert_html() {
        let mut service = service();
        let node = service
            .convert_html(
                "<html><body><div class=\"card\" style=\"display: flex; flex-direction: column\"><h1>Title</h1><p>Body</p></div></body></html>",
                &[],
                DesignTokens::default(),
            )
            .unwrap();
        assert_eq!(node.metadata.source_info.tag_name, "body");
        let card = &node.children()[0];
        assert_eq!(card.kind, "vstack");
        assert_eq!(card.metadata.element_path, "div.card");
        assert_eq!(card.children()[0].prop_str("text"), Some("Title"));
        assert_eq!(card.default_styles().get("flexDirection").map(String::as_str), Some("column"));
    }
}
