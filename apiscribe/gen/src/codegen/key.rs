//! Endpoint keys shared by the registry and the dispatch table.

use std::fmt;

use apiscribe_define::{DEFAULT_VARIANT, OperationSpec, RestMethod};

/// Identity of one endpoint variant.
///
/// Renders as `[<variant> ]<METHOD> <path>`. Both the endpoint registry and
/// the dispatch table render their key from the same value, so a lookup in
/// one always finds its counterpart in the other.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::RestMethod;
/// use apiscribe_gen::codegen::EndpointKey;
///
/// let key = EndpointKey::new(RestMethod::Get, "/items");
/// assert_eq!(key.to_string(), "GET /items");
///
/// let key = key.with_variant("multipart/form-data");
/// assert_eq!(key.to_string(), "multipart/form-data GET /items");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub variant: Option<String>,
    pub method: RestMethod,
    pub path: String,
}

impl EndpointKey {
    pub fn new(method: RestMethod, path: impl Into<String>) -> Self {
        Self {
            variant: None,
            method,
            path: path.into(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Key for the schema variant `tag` of `operation`.
    ///
    /// The tag becomes a prefix only when the operation declares more than
    /// one variant and `tag` is not the default one.
    pub fn for_variant(operation: &OperationSpec, tag: &str) -> Self {
        let key = Self::new(operation.method, operation.path.clone());
        if operation.has_variants() && tag != DEFAULT_VARIANT {
            key.with_variant(tag)
        } else {
            key
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(variant) = &self.variant {
            write!(f, "{variant} ")?;
        }
        write!(f, "{} {}", self.method, self.path)
    }
}
