//! Per-node debugging and correlation metadata.
//!
//! Generation never aborts a conversion: any failure degrades to a
//! placeholder carrying only the tag as title.

use log::warn;

use crate::node::NodeRef;
use crate::utilities::{clip, collapse_whitespace};
use crate::{ComposeError, Result};
use domcompose_core::{Metadata, Position, SourceInfo};

/// Maximum preview length in titles
pub const TITLE_PREVIEW_CHARS: usize = 50;

/// Maximum length of `contentPreview`
pub const CONTENT_PREVIEW_CHARS: usize = 100;

/// Elements at which element paths stop
const PATH_ROOTS: &[&str] = &["body", "html"];

/// Metadata for an element
pub fn generate(element: &NodeRef) -> Metadata {
    try_generate(element).unwrap_or_else(|err| {
        warn!(target: "domcompose::metadata", "metadata generation failed: {}", err);
        placeholder(&element.tag_name())
    })
}

/// Metadata for a text node synthesized under `parent`
pub fn synthetic_text(parent: &NodeRef, text: &str) -> Metadata {
    let preview = collapse_whitespace(text);
    let parent_path = element_path(parent);
    Metadata {
        title: with_preview("text", &preview),
        source_info: SourceInfo {
            tag_name: "#text".to_string(),
            position: Position {
                index: 0,
                sibling_count: 1,
                parent_tag: parent.tag_name(),
            },
            ..Default::default()
        },
        element_path: if parent_path.is_empty() {
            "#text".to_string()
        } else {
            format!("{} > #text", parent_path)
        },
        content_preview: clip(&preview, CONTENT_PREVIEW_CHARS),
        ..Default::default()
    }
}

fn try_generate(element: &NodeRef) -> Result<Metadata> {
    let node = element.node;
    if !node.is_element() {
        return Err(ComposeError::InvalidInput(format!(
            "metadata requested for non-element node {}",
            node.node_name
        )));
    }

    let tag = node.tag_name();
    let preview = node.text_preview(CONTENT_PREVIEW_CHARS);
    let (index, sibling_count) = element.sibling_position();

    Ok(Metadata {
        title: with_preview(&title_selector(element), &preview),
        source_info: SourceInfo {
            tag_name: tag,
            id: node.id().to_string(),
            class_name: node.class_name().to_string(),
            data_attributes: node.data_attributes(),
            position: Position {
                index,
                sibling_count,
                parent_tag: element.parent_tag().unwrap_or_default(),
            },
        },
        element_path: element_path(element),
        content_preview: clip(&preview, CONTENT_PREVIEW_CHARS),
        ..Default::default()
    })
}

fn placeholder(tag: &str) -> Metadata {
    Metadata {
        title: tag.to_string(),
        source_info: SourceInfo {
            tag_name: tag.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// `tag#id`, `tag.firstClass` or `tag`
fn title_selector(element: &NodeRef) -> String {
    let node = element.node;
    let tag = node.tag_name();
    if !node.id().is_empty() {
        format!("{}#{}", tag, node.id())
    } else if let Some(class) = node.classes().next() {
        format!("{}.{}", tag, class)
    } else {
        tag
    }
}

fn with_preview(label: &str, preview: &str) -> String {
    if preview.is_empty() {
        label.to_string()
    } else {
        format!("{} - \"{}\"", label, clip(preview, TITLE_PREVIEW_CHARS))
    }
}

/// Selector-like path from below the document body down to `element`
pub fn element_path(element: &NodeRef) -> String {
    if is_path_root(element) {
        return String::new();
    }

    let mut segments = vec![path_segment(element)];
    segments.extend(element.ancestors().take_while(|e| !is_path_root(e)).map(path_segment));
    segments.reverse();
    segments.join(" > ")
}

fn is_path_root(element: &NodeRef) -> bool {
    PATH_ROOTS.contains(&element.tag_name().as_str())
}

fn path_segment(element: &NodeRef) -> String {
    let node = element.node;
    if !node.id().is_empty() {
        return format!("#{}", node.id());
    }

    let tag = node.tag_name();
    let mut segment = match node.classes().next() {
        Some(class) => format!("{}.{}", tag, class),
        None => tag,
    };
    let (ordinal, count) = element.same_tag_position();
    if count > 1 {
        segment.push_str(&format!(":nth-of-type({})", ordinal));
    }
    segment
}
