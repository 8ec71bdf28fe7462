//! Response declarations.
//!
//! A [`ResponseItem`] describes one possible response of an operation for a
//! single `(status code, content type)` pair. Several items may target the
//! same pair; the OpenAPI paths builder merges them.

use serde::{Deserialize, Serialize};

use crate::type_node::TypeNode;

/// Default content type for responses and request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type whose schema is always a binary string.
pub const OCTET_STREAM_CONTENT_TYPE: &str = "application/octet-stream";

fn default_content_type() -> String {
    JSON_CONTENT_TYPE.to_string()
}

/// One declared response of an operation.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::{ResponseItem, TypeNode};
///
/// let ok = ResponseItem::new("200")
///     .with_type(TypeNode::reference("/Item"))
///     .with_header("X-Request-Id");
///
/// assert_eq!(ok.content_type, "application/json");
/// assert_eq!(ok.headers, vec!["X-Request-Id".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<TypeNode>,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
}

impl ResponseItem {
    /// Creates a JSON response with no declared type.
    pub fn new(status_code: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            response_type: None,
            content_type: default_content_type(),
            headers: vec![],
        }
    }

    /// Sets the response type.
    pub fn with_type(mut self, response_type: TypeNode) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Adds a response header name.
    pub fn with_header(mut self, name: impl Into<String>) -> Self {
        self.headers.push(name.into());
        self
    }

    /// Returns true for `application/octet-stream` responses.
    pub fn is_octet_stream(&self) -> bool {
        self.content_type.eq_ignore_ascii_case(OCTET_STREAM_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let item: ResponseItem = serde_json::from_str(
            r##"{"statusCode": "404", "responseType": {"message": "string"}}"##,
        )
        .unwrap();

        assert_eq!(item.status_code, "404");
        assert_eq!(item.content_type, JSON_CONTENT_TYPE);
        assert!(item.headers.is_empty());
        assert!(matches!(item.response_type, Some(TypeNode::Composite(_))));
    }

    #[test]
    fn null_response_type_is_absent() {
        let item: ResponseItem =
            serde_json::from_str(r#"{"statusCode": "204", "responseType": null}"#).unwrap();
        assert!(item.response_type.is_none());
    }

    #[test]
    fn octet_stream_detection_ignores_case() {
        let item = ResponseItem::new("200").with_content_type("Application/Octet-Stream");
        assert!(item.is_octet_stream());
        assert!(!ResponseItem::new("200").is_octet_stream());
    }
}
