//! # domcompose
//!
//! Convert rendered DOM trees into a compositional document model.
//!
//! Each element becomes a [`ComposeNode`] carrying a component kind, the
//! author-intended part of its computed style, typed props and a metadata
//! bundle that correlates it back to its source element.
//!
//! ## Design
//!
//! The converter never computes cascaded styles. The host supplies them:
//!
//! - **[`StyleSource`]**: computed style (and optionally rendered text) per
//!   element, e.g. captured over CDP alongside the DOM
//! - **[`BaselineProvider`]**: the computed style of a pristine element per
//!   tag, used to tell browser defaults from author styling
//!
//! Input trees use a CDP-style [`Node`] structure, so any parser or DOM
//! snapshot can feed the converter.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use domcompose::{ComposeService, ConversionRequest, Node, SnapshotStyleSource};
//!
//! let mut service = ComposeService::new();
//!
//! let root = Node::element("main")
//!     .with_id(1)
//!     .with_child(Node::element("h1").with_id(2).with_child(Node::text("Hello World")));
//! let styles = SnapshotStyleSource::new();
//!
//! let node = service.convert(&ConversionRequest::new(&root, &styles)).unwrap();
//! assert_eq!(node.children()[0].kind, "header");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use domcompose::{ComposeService, DesignTokens};
//!
//! let mut service = ComposeService::new();
//! let node = service
//!     .convert_html("<body><p>Hello World</p></body>", &[], DesignTokens::default())
//!     .unwrap();
//! assert_eq!(node.children()[0].prop_str("text"), Some("Hello World"));
//! ```

pub mod classify;
pub mod convert;
mod derive;
#[cfg(feature = "html")]
pub mod html;
pub mod metadata;
pub mod node;
mod options;
pub mod protocol;
mod rules;
mod service;
pub mod style;
mod utilities;

pub use classify::{classify, ComponentKind};
pub use convert::Converter;
pub use derive::StyleDeriver;
#[cfg(feature = "html")]
pub use html::{parse_document, parse_html};
pub use node::{Node, NodeRef, NodeType};
pub use options::{ConvertOptions, Diagnostics, DEFAULT_CORRELATION_ATTRIBUTE, DEFAULT_MAX_DEPTH};
pub use protocol::{InboundMessage, MessageEnvelope, OriginPolicy, OutboundMessage};
pub use rules::{Filter, Rule, RuleContext, Rules};
pub use service::{ComposeService, ConversionRequest, ConversionSession};
pub use style::{
    BaselineCache, BaselineProvider, SnapshotStyleSource, StyleEngine, StyleMode, StyleSnapshot, StyleSource,
    UserAgentBaseline, Whitelist,
};
pub use utilities::*;

pub use domcompose_core::{
    ComponentMapping, ComposeNode, DesignTokens, Export, ExportError, Metadata, PropValue, ResponsiveStyles,
    StyleMap,
};

/// Error type for domcompose operations
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing root element")]
    MissingRoot,

    #[error("Maximum depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error("Baseline unavailable: {0}")]
    Baseline(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, ComposeError>;
