//! Core types for operation definitions.
//!
//! This module provides the fundamental types for describing an API:
//!
//! - [`ApiSpec`] - The top-level specification file
//! - [`GroupSpec`] - Ordered operation groups
//! - [`OperationSpec`] - Individual operation definitions
//! - [`RestMethod`] - HTTP method enumeration

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::input::{InputField, InputSource, Selector};
use crate::response::ResponseItem;

/// Variant tag an operation's only schema is usually registered under.
pub const DEFAULT_VARIANT: &str = "default";

/// HTTP methods supported by REST APIs.
///
/// ## Examples
///
/// Parse from string:
///
/// ```
/// use std::str::FromStr;
/// use apiscribe_define::RestMethod;
///
/// let method = RestMethod::from_str("GET").unwrap();
/// assert_eq!(method, RestMethod::Get);
/// ```
///
/// Display as uppercase, key OpenAPI paths in lowercase:
///
/// ```
/// use apiscribe_define::RestMethod;
///
/// assert_eq!(RestMethod::Post.to_string(), "POST");
/// assert_eq!(RestMethod::Post.as_path_key(), "post");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource
    #[serde(alias = "get")]
    Get,
    /// HTTP POST - Create a new resource
    #[serde(alias = "post")]
    Post,
    /// HTTP PUT - Replace a resource entirely
    #[serde(alias = "put")]
    Put,
    /// HTTP PATCH - Partially update a resource
    #[serde(alias = "patch")]
    Patch,
    /// HTTP DELETE - Remove a resource
    #[serde(alias = "delete")]
    Delete,
    /// HTTP HEAD - Get headers only (no body)
    #[serde(alias = "head")]
    Head,
    /// HTTP OPTIONS - Get allowed methods for a resource
    #[serde(alias = "options")]
    Options,
}

impl RestMethod {
    /// Returns the lowercase method name used as an OpenAPI path-item key.
    pub fn as_path_key(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Head => "head",
            Self::Options => "options",
        }
    }
}

/// Whether an operation answers once or streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Standard,
    Stream,
}

/// How the generated client turns a response body into output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormatter {
    #[default]
    Json,
    Text,
    Binary,
    Empty,
}

/// A single operation definition.
///
/// ## Schema variants
///
/// `schemas` maps a variant tag to a validation expression. Most operations
/// declare one variant. Operations that accept several encodings declare one
/// per content type, with [`DEFAULT_VARIANT`] naming the implicit one.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::{InputField, InputSource, OperationSpec, RestMethod};
///
/// let op = OperationSpec::new("getItem", RestMethod::Get, "/items/{id}")
///     .with_input("id", InputField::new(InputSource::Params, "z.string()"))
///     .with_input("session", InputField::new(InputSource::Internal, "z.any()"))
///     .with_schema("default", "z.object({ id: z.string() })");
///
/// // Internal inputs never become selectors
/// let names: Vec<_> = op.selectors().into_iter().map(|s| s.name).collect();
/// assert_eq!(names, vec!["id"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSpec {
    /// Operation name, usually lowerCamelCase (e.g. "listItems").
    pub name: String,
    pub method: RestMethod,
    /// Path template (e.g. "/items/{id}").
    pub path: String,
    #[serde(default)]
    pub inputs: IndexMap<String, InputField>,
    /// Variant tag to validation expression.
    #[serde(default)]
    pub schemas: IndexMap<String, String>,
    /// Error identifiers this operation can produce.
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub kind: OperationKind,
    /// Request body content type; JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub output_formatter: OutputFormatter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ResponseItem>,
}

impl OperationSpec {
    /// Creates an operation with no inputs, schemas, or responses.
    pub fn new(name: impl Into<String>, method: RestMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            path: path.into(),
            inputs: IndexMap::new(),
            schemas: IndexMap::new(),
            errors: vec![],
            kind: OperationKind::Standard,
            content_type: None,
            output_formatter: OutputFormatter::Json,
            description: None,
            tags: vec![],
            responses: vec![],
        }
    }

    /// Adds an input field.
    pub fn with_input(mut self, name: impl Into<String>, field: InputField) -> Self {
        self.inputs.insert(name.into(), field);
        self
    }

    /// Adds a schema variant.
    pub fn with_schema(mut self, tag: impl Into<String>, expression: impl Into<String>) -> Self {
        self.schemas.insert(tag.into(), expression.into());
        self
    }

    /// Adds an error identifier.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.errors.push(error.into());
        self
    }

    /// Adds a response declaration.
    pub fn with_response(mut self, response: ResponseItem) -> Self {
        self.responses.push(response);
        self
    }

    /// Sets the request content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Marks the operation as streaming.
    pub fn streaming(mut self) -> Self {
        self.kind = OperationKind::Stream;
        self
    }

    /// Returns true for streaming operations.
    pub fn is_stream(&self) -> bool {
        self.kind == OperationKind::Stream
    }

    /// Returns true when the operation declares more than one schema variant.
    pub fn has_variants(&self) -> bool {
        self.schemas.len() > 1
    }

    /// Returns one selector per non-internal input, in declaration order.
    ///
    /// Unknown sources are kept so callers can reject them.
    pub fn selectors(&self) -> Vec<Selector> {
        self.inputs
            .iter()
            .filter(|(_, field)| field.source != InputSource::Internal)
            .map(|(name, field)| Selector::from_field(name.clone(), field))
            .collect()
    }
}

/// Operation groups keyed by group name, in declaration order.
///
/// The group name becomes the generated schema module name.
pub type GroupSpec = IndexMap<String, Vec<OperationSpec>>;

/// A complete specification file.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::ApiSpec;
///
/// let spec: ApiSpec = serde_json::from_str(r#"{
///     "title": "Inventory",
///     "version": "1.0.0",
///     "groups": {
///         "items": [
///             { "name": "listItems", "method": "GET", "path": "/items" }
///         ]
///     }
/// }"#).unwrap();
///
/// assert_eq!(spec.groups["items"][0].name, "listItems");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpec {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    /// Shared-definitions import reference handed to the evaluator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<String>,
    pub groups: GroupSpec,
}

impl ApiSpec {
    /// Iterates over `(group name, operation)` pairs in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationSpec)> {
        self.groups
            .iter()
            .flat_map(|(group, ops)| ops.iter().map(move |op| (group.as_str(), op)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn rest_method_display_uppercase() {
        assert_eq!(RestMethod::Get.to_string(), "GET");
        assert_eq!(RestMethod::Post.to_string(), "POST");
        assert_eq!(RestMethod::Put.to_string(), "PUT");
        assert_eq!(RestMethod::Patch.to_string(), "PATCH");
        assert_eq!(RestMethod::Delete.to_string(), "DELETE");
        assert_eq!(RestMethod::Head.to_string(), "HEAD");
        assert_eq!(RestMethod::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn rest_method_from_str_invalid() {
        assert!(RestMethod::from_str("INVALID").is_err());
        assert!(RestMethod::from_str("get").is_err()); // Case-sensitive
        assert!(RestMethod::from_str("").is_err());
    }

    #[test]
    fn rest_method_path_key_is_lowercase_display() {
        for method in RestMethod::iter() {
            assert_eq!(method.as_path_key(), method.to_string().to_lowercase());
        }
    }

    #[test]
    fn rest_method_serde_accepts_both_cases() {
        let serialized = serde_json::to_string(&RestMethod::Post).unwrap();
        assert_eq!(serialized, "\"POST\"");

        let upper: RestMethod = serde_json::from_str("\"DELETE\"").unwrap();
        let lower: RestMethod = serde_json::from_str("\"delete\"").unwrap();
        assert_eq!(upper, RestMethod::Delete);
        assert_eq!(lower, RestMethod::Delete);
    }

    #[test]
    fn operation_spec_defaults() {
        let op: OperationSpec =
            serde_json::from_str(r#"{"name": "ping", "method": "GET", "path": "/ping"}"#).unwrap();

        assert_eq!(op.kind, OperationKind::Standard);
        assert_eq!(op.output_formatter, OutputFormatter::Json);
        assert!(op.inputs.is_empty());
        assert!(op.content_type.is_none());
        assert!(!op.has_variants());
    }

    #[test]
    fn operation_spec_reads_camel_case_fields() {
        let op: OperationSpec = serde_json::from_str(
            r#"{
                "name": "upload",
                "method": "POST",
                "path": "/files",
                "kind": "stream",
                "contentType": "multipart/form-data",
                "outputFormatter": "binary",
                "schemas": {
                    "default": "z.object({})",
                    "multipart/form-data": "z.object({ file: z.any() })"
                }
            }"#,
        )
        .unwrap();

        assert!(op.is_stream());
        assert!(op.has_variants());
        assert_eq!(op.content_type.as_deref(), Some("multipart/form-data"));
        assert_eq!(op.output_formatter, OutputFormatter::Binary);
    }

    #[test]
    fn selectors_keep_declaration_order_and_unknown_sources() {
        let op = OperationSpec::new("search", RestMethod::Get, "/search")
            .with_input("q", InputField::new(InputSource::Query, "z.string()"))
            .with_input("ctx", InputField::new(InputSource::Internal, "z.any()"))
            .with_input(
                "token",
                InputField::new(InputSource::Other("cookie".into()), "z.string()"),
            )
            .with_input("page", InputField::new(InputSource::Queries, "z.number()"));

        let names: Vec<_> = op.selectors().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["q", "token", "page"]);
    }

    #[test]
    fn api_spec_iterates_groups_in_order() {
        let mut groups = GroupSpec::new();
        groups.insert(
            "users".to_string(),
            vec![OperationSpec::new("listUsers", RestMethod::Get, "/users")],
        );
        groups.insert(
            "items".to_string(),
            vec![
                OperationSpec::new("listItems", RestMethod::Get, "/items"),
                OperationSpec::new("createItem", RestMethod::Post, "/items"),
            ],
        );
        let spec = ApiSpec {
            title: "Test".to_string(),
            version: "1".to_string(),
            description: None,
            servers: vec![],
            definitions: None,
            groups,
        };

        let seen: Vec<_> = spec.operations().map(|(g, op)| (g, op.name.as_str())).collect();
        assert_eq!(
            seen,
            vec![
                ("users", "listUsers"),
                ("items", "listItems"),
                ("items", "createItem"),
            ]
        );
    }
}
