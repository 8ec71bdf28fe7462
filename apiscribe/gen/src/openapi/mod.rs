//! OpenAPI document generation.
//!
//! - [`serializer`] converts structural type nodes into JSON Schema
//! - [`accumulator`] builds the `paths` object from operations
//! - [`document`] wraps paths into a complete OpenAPI 3.1 document

pub mod accumulator;
pub mod document;
pub mod serializer;

pub use accumulator::{OperationDef, PathHook, Paths, PathsBuilder};
pub use document::{OpenApiDocument, OpenApiInfo, OutputFormat, Server, document_from_spec};
pub use serializer::serialize;
