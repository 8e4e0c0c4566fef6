//! Cross-window request/response messages.
//!
//! The transport itself belongs to the host. This module only decides which
//! inbound messages are honoured and what the replies look like.

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use domcompose_core::ComposeNode;

/// Message type requesting a conversion
pub const REQUEST_TYPE: &str = "request-html-to-json";

/// A message as received by the host, with the sender's origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub origin: String,
    pub data: Value,
}

impl MessageEnvelope {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// Messages the converter understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    #[serde(rename = "request-html-to-json")]
    RequestHtmlToJson,
}

/// Replies sent back to the requesting origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "html-to-json-response")]
    Response { data: Box<ComposeNode> },
    #[serde(rename = "html-to-json-error")]
    Error { error: String },
}

impl OutboundMessage {
    pub fn response(node: ComposeNode) -> Self {
        OutboundMessage::Response { data: Box::new(node) }
    }

    pub fn error(error: impl ToString) -> Self {
        OutboundMessage::Error {
            error: error.to_string(),
        }
    }
}

/// Allow-list of origins permitted to request conversions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: origins
                .into_iter()
                .map(|o| normalize_origin(o.as_ref()))
                .filter(|o| !o.is_empty())
                .collect(),
        }
    }

    /// Exact match after trimming a trailing slash. An empty policy allows
    /// nothing.
    pub fn allows(&self, origin: &str) -> bool {
        let origin = normalize_origin(origin);
        self.allowed.iter().any(|o| *o == origin)
    }

    /// The request carried by `envelope`, if it is one this policy accepts.
    ///
    /// Foreign origins and unknown message types are ignored.
    pub fn accept(&self, envelope: &MessageEnvelope) -> Option<InboundMessage> {
        if !self.allows(&envelope.origin) {
            debug!(target: "domcompose::protocol", "ignoring message from {}", envelope.origin);
            return None;
        }
        match InboundMessage::deserialize(&envelope.data) {
            Ok(message) => Some(message),
            Err(_) => {
                debug!(target: "domcompose::protocol", "ignoring unknown message from {}", envelope.origin);
                None
            }
        }
    }
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domcompose_core::Metadata;
    use serde_json::json;

    fn policy() -> OriginPolicy {
        OriginPolicy::new(["https://builder.example.com/", "http://localhost:3000"])
    }

    #[test]
    fn test_accepts_request_from_allowed_origin() {
        let envelope = MessageEnvelope::new("https://builder.example.com", json!({"type": REQUEST_TYPE}));
        assert_eq!(policy().accept(&envelope), Some(InboundMessage::RequestHtmlToJson));
    }

    #[test]
    fn test_ignores_other_origins_and_types() {
        let foreign = MessageEnvelope::new("https://evil.example", json!({"type": REQUEST_TYPE}));
        assert_eq!(policy().accept(&foreign), None);

        let unknown = MessageEnvelope::new("http://localhost:3000", json!({"type": "ping"}));
        assert_eq!(policy().accept(&unknown), None);

        let not_object = MessageEnvelope::new("http://localhost:3000", json!("hello"));
        assert_eq!(policy().accept(&not_object), None);

        assert!(!OriginPolicy::default().allows("http://localhost:3000"));
    }

    #[test]
    fn test_outbound_wire_format() {
        let error = serde_json::to_value(OutboundMessage::error("no root")).unwrap();
        assert_eq!(error, json!({"type": "html-to-json-error", "error": "no root"}));

        let node = ComposeNode::new("box", "node-1", Metadata::default());
        let response = serde_json::to_value(OutboundMessage::response(node)).unwrap();
        assert_eq!(response["type"], "html-to-json-response");
        assert_eq!(response["data"]["uid"], "node-1");
        assert_eq!(response["data"]["type"], "box");
    }
}
