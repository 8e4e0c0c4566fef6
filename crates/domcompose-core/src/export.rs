//! JSON export of a converted tree
//!
//! Exports are named `<route>-<ISO timestamp>.json`, where the route is
//! derived from the page URL the tree was captured from.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::model::ComposeNode;

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// A serialized tree ready to be offered as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub json: String,
}

impl Export {
    /// Serialize `node` and name the export after `page_url` and `timestamp`
    pub fn new(node: &ComposeNode, page_url: &str, timestamp: DateTime<Utc>) -> Result<Self, ExportError> {
        let url = Url::parse(page_url)?;
        Ok(Self {
            file_name: export_file_name(&url, timestamp),
            json: to_json(node)?,
        })
    }

    /// Write the export into `dir`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.json)?;
        Ok(path)
    }
}

/// Pretty-printed JSON document of a tree
pub fn to_json(node: &ComposeNode) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(node)
}

/// `<route>-<timestamp>.json`
pub fn export_file_name(url: &Url, timestamp: DateTime<Utc>) -> String {
    format!(
        "{}-{}.json",
        derive_route(url),
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Derive a file-name-safe route from a page URL.
///
/// Host and explicit port are joined with `_`, followed by the path with
/// slashes turned into `_` and other special characters removed. An empty
/// path becomes `root`. Routes starting with a digit get a `page_` prefix.
pub fn derive_route(url: &Url) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(host) = url.host_str() {
        if !host.is_empty() {
            parts.push(host.to_string());
        }
    }
    if let Some(port) = url.port() {
        parts.push(port.to_string());
    }

    let path: String = url
        .path()
        .trim_matches('/')
        .replace('/', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    parts.push(if path.is_empty() { "root".to_string() } else { path });

    let route = parts.join("_");
    if route.starts_with(|c: char| c.is_ascii_digit()) {
        format!("page_{}", route)
    } else {
        route
    }
}
