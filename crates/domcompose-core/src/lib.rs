//! domcompose-core - compositional document model and JSON export
//!
//! This crate provides the data structures produced by `domcompose` when it
//! converts a rendered DOM tree, plus the helpers to export them. It has no
//! knowledge of the DOM itself.
//!
//! # Architecture
//!
//! ```text
//! Rendered DOM ──domcompose──▶ ┌───────────────┐
//!                              │               │
//! Component mappings ─────────▶│  ComposeNode  │ ──▶ JSON export
//!                              │               │
//!                              └───────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use domcompose_core::{ComposeNode, Metadata, PropValue, to_json};
//!
//! let mut text = ComposeNode::new("text", "n2", Metadata::default());
//! text.props.insert("text".to_string(), PropValue::string("Hello World"));
//!
//! let root = ComposeNode::new("box", "n1", Metadata::default()).with_children("s1", vec![text]);
//! let json = to_json(&root).unwrap();
//! assert!(json.contains("Hello World"));
//! ```

mod export;
mod mapping;
mod model;

pub use export::{derive_route, export_file_name, to_json, Export, ExportError};
pub use mapping::{find_mapping, ComponentMapping, DesignTokens, MappedNodeId, MappingMatch};
pub use model::{
    ComposeNode, FormInfo, ImageInfo, LinkInfo, MediaSource, Metadata, NodeStyles, Position,
    PropValue, ResponsiveStyles, SelectOption, SourceInfo, StyleMap, StyleVariant, VideoInfo,
    CHILDREN_PROP,
};
