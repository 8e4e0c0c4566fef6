//! Compositional document model
//!
//! This module defines the nodes produced by a conversion run. The tree is
//! built bottom-up and never mutated once a node is attached to its parent,
//! so none of these types carry back-references.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered mapping of camelCase CSS property name to its literal value
pub type StyleMap = IndexMap<String, String>;

/// Name of the prop that references a node's child slot
pub const CHILDREN_PROP: &str = "children";

/// A node of the compositional document model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeNode {
    /// Component kind (or mapped component name)
    #[serde(rename = "type")]
    pub kind: String,

    /// Identifier unique within one conversion run
    pub uid: String,

    /// Correlation and debugging metadata
    pub metadata: Metadata,

    /// Source attributes other than `class` and `style`
    #[serde(default)]
    pub attrs: IndexMap<String, String>,

    /// Named properties
    #[serde(default)]
    pub props: IndexMap<String, PropValue>,

    /// Child lists keyed by slot id
    #[serde(default)]
    pub slots: IndexMap<String, Vec<ComposeNode>>,

    /// Styles per variant
    #[serde(default)]
    pub styles: NodeStyles,
}

impl ComposeNode {
    /// Create a leaf node
    pub fn new(kind: impl Into<String>, uid: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            kind: kind.into(),
            uid: uid.into(),
            metadata,
            attrs: IndexMap::new(),
            props: IndexMap::new(),
            slots: IndexMap::new(),
            styles: NodeStyles::default(),
        }
    }

    /// Builder-style setter for the default responsive styles
    pub fn with_styles(mut self, styles: ResponsiveStyles) -> Self {
        self.styles = NodeStyles::from(styles);
        self
    }

    /// Builder-style setter adding props; existing names are overwritten
    pub fn with_props(mut self, props: IndexMap<String, PropValue>) -> Self {
        self.props.extend(props);
        self
    }

    /// Attach `children` under `slot_id` and point the `children` prop at it.
    ///
    /// An empty child list leaves the node a leaf.
    pub fn with_children(mut self, slot_id: impl Into<String>, children: Vec<ComposeNode>) -> Self {
        if children.is_empty() {
            return self;
        }
        let slot_id = slot_id.into();
        self.props
            .insert(CHILDREN_PROP.to_string(), PropValue::slot(slot_id.clone()));
        self.slots.insert(slot_id, children);
        self
    }

    /// Children referenced by the `children` prop, if any
    pub fn children(&self) -> &[ComposeNode] {
        match self.props.get(CHILDREN_PROP) {
            Some(PropValue::Slot { slot }) => {
                self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
            }
            _ => &[],
        }
    }

    /// Whether this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Static string value of a prop
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        self.props.get(name).and_then(PropValue::as_str)
    }

    /// Styles of the `default` breakpoint
    pub fn default_styles(&self) -> &StyleMap {
        &self.styles.default.responsive_styles.default
    }

    /// Total number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self
            .slots
            .values()
            .flat_map(|children| children.iter())
            .map(ComposeNode::count)
            .sum::<usize>()
    }

    /// Depth-first iterator over this subtree, self first
    pub fn descendants(&self) -> Vec<&ComposeNode> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }
}

fn collect_descendants<'a>(node: &'a ComposeNode, out: &mut Vec<&'a ComposeNode>) {
    out.push(node);
    for children in node.slots.values() {
        for child in children {
            collect_descendants(child, out);
        }
    }
}

/// Typed value descriptor of a prop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropValue {
    /// Literal string
    #[serde(rename = "string")]
    String {
        #[serde(rename = "staticString")]
        static_string: String,
    },
    /// Image source (URL or data URI)
    #[serde(rename = "imageUrl")]
    ImageUrl {
        #[serde(rename = "staticValue")]
        static_value: String,
    },
    /// Reference to a slot on the same node
    #[serde(rename = "slot")]
    Slot { slot: String },
}

impl PropValue {
    pub fn string(value: impl Into<String>) -> Self {
        PropValue::String {
            static_string: value.into(),
        }
    }

    pub fn image_url(value: impl Into<String>) -> Self {
        PropValue::ImageUrl {
            static_value: value.into(),
        }
    }

    pub fn slot(slot: impl Into<String>) -> Self {
        PropValue::Slot { slot: slot.into() }
    }

    /// Inner string of a string or image prop
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String { static_string } => Some(static_string),
            PropValue::ImageUrl { static_value } => Some(static_value),
            PropValue::Slot { .. } => None,
        }
    }
}

/// Style maps per breakpoint. Only `default` is populated by the converter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    pub default: StyleMap,
    #[serde(default)]
    pub tablet: StyleMap,
    #[serde(default)]
    pub mobile: StyleMap,
}

impl ResponsiveStyles {
    pub fn from_default(default: StyleMap) -> Self {
        Self {
            default,
            tablet: StyleMap::new(),
            mobile: StyleMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVariant {
    pub responsive_styles: ResponsiveStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyles {
    pub default: StyleVariant,
}

impl From<ResponsiveStyles> for NodeStyles {
    fn from(responsive_styles: ResponsiveStyles) -> Self {
        Self {
            default: StyleVariant { responsive_styles },
        }
    }
}

/// Debugging and correlation bundle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub source_info: SourceInfo,
    pub element_path: String,
    pub content_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_info: Option<LinkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_info: Option<FormInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_info: Option<ImageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_info: Option<VideoInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub tag_name: String,
    pub id: String,
    pub class_name: String,
    pub data_attributes: IndexMap<String, String>,
    pub position: Position,
}

/// Position of an element among its parent's element children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub index: usize,
    pub sibling_count: usize,
    pub parent_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub href: String,
    pub is_internal: bool,
    pub is_external: bool,
    pub is_email: bool,
    pub is_phone: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInfo {
    pub input_type: String,
    pub name: String,
    pub placeholder: String,
    pub required: bool,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub loading: String,
    pub decoding: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub sources: Vec<MediaSource>,
    pub poster: String,
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub muted: bool,
    pub controls: bool,
    pub plays_inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaSource {
    pub src: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}
