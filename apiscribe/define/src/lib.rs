//! apiscribe definition library
//!
//! This crate provides the declarative types that describe an HTTP API for
//! `apiscribe-gen`. A specification is a set of named operation groups; each
//! operation lists its inputs, validation expressions, error identifiers and
//! responses.
//!
//! ## Core Types
//!
//! - [`ApiSpec`] - A complete specification file (title, version, groups)
//! - [`GroupSpec`] - Ordered mapping from group name to operations
//! - [`OperationSpec`] - A single operation with inputs, schemas and errors
//! - [`InputField`] / [`InputSource`] - Declared inputs and where they travel
//! - [`Selector`] - One input binding as seen by the OpenAPI builder
//! - [`ResponseItem`] - One `(status, content type)` response declaration
//! - [`TypeNode`] - Recursive structural type used by responses
//! - [`RestMethod`] - HTTP methods
//!
//! ## Examples
//!
//! ```
//! use apiscribe_define::prelude::*;
//!
//! let op = OperationSpec::new("listItems", RestMethod::Get, "/items")
//!     .with_input("limit", InputField::new(InputSource::Query, "z.number()").optional())
//!     .with_schema("default", "z.object({ limit: z.number().optional() })")
//!     .with_response(
//!         ResponseItem::new("200").with_type(TypeNode::composite([(
//!             "items",
//!             TypeNode::array(TypeNode::reference("/Item")),
//!         )])),
//!     );
//!
//! let mut groups = GroupSpec::new();
//! groups.insert("items".to_string(), vec![op]);
//! assert_eq!(groups["items"].len(), 1);
//! ```

pub mod input;
pub mod prelude;
pub mod response;
pub mod type_node;
pub mod types;

// Re-export main types at crate root
pub use input::{InputField, InputSource, ParamLocation, Selector, SourceBinding};
pub use response::{JSON_CONTENT_TYPE, OCTET_STREAM_CONTENT_TYPE, ResponseItem};
pub use type_node::{REFERENCE_SIGIL, TypeNode};
pub use types::{
    ApiSpec, DEFAULT_VARIANT, GroupSpec, OperationKind, OperationSpec, OutputFormatter, RestMethod,
};
