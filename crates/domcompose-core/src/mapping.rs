//! Component mapping entries and design tokens supplied by the caller

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::PropValue;

/// One mapping entry: binds design-tool node ids to a code component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMapping {
    #[serde(default)]
    pub node_ids: Vec<MappedNodeId>,
    pub code_component_name: String,
    #[serde(default)]
    pub prop_mappings: IndexMap<String, Value>,
    #[serde(default)]
    pub figma_component_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedNodeId {
    pub node_id: String,
    #[serde(default)]
    pub variant_properties: IndexMap<String, Value>,
}

/// A mapping entry matched against a correlation id
#[derive(Debug, Clone, Copy)]
pub struct MappingMatch<'a> {
    pub mapping: &'a ComponentMapping,
    pub node: &'a MappedNodeId,
}

impl MappingMatch<'_> {
    /// Props of the mapped component: `propMappings` first, then the
    /// matched id's `variantProperties` on top.
    pub fn props(&self) -> IndexMap<String, PropValue> {
        self.mapping
            .prop_mappings
            .iter()
            .chain(self.node.variant_properties.iter())
            .map(|(name, value)| (name.clone(), PropValue::string(value_to_string(value))))
            .collect()
    }
}

/// Find the mapping entry for a correlation id.
///
/// The first mapping containing the id wins, and within it the first
/// matching node id.
pub fn find_mapping<'a>(mappings: &'a [ComponentMapping], correlation_id: &str) -> Option<MappingMatch<'a>> {
    mappings.iter().find_map(|mapping| {
        mapping
            .node_ids
            .iter()
            .find(|n| n.node_id == correlation_id)
            .map(|node| MappingMatch { mapping, node })
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Design-token bundle. Threaded through conversion but not consulted yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignTokens(pub Value);
