//! apiscribe generator library.
//!
//! This crate turns API specifications written with `apiscribe-define`
//! into two independent outputs:
//!
//! - An **OpenAPI 3.1 document** whose parameters and request bodies come
//!   from evaluated validation expressions and whose responses come from
//!   structural type nodes
//! - A set of **generated Rust modules** forming a typed client: per-group
//!   schema modules, endpoint registries and request dispatch tables
//!
//! Both outputs share one input classification and one endpoint key type,
//! so names and keys agree everywhere.
//!
//! ## Modules
//!
//! - [`openapi`] - Schema serializer, paths builder and document assembly
//! - [`evaluator`] - The validation-expression evaluation boundary
//! - [`compiler`] - Artifact compilation for the typed client
//! - [`codegen`] - Generators for the individual artifacts
//! - [`validation`] - Naming collision checks run before generation
//! - [`output`] - Formatting and atomic file writing
//! - [`loader`] - Specification and boilerplate loading
//! - [`parser`] - Path template utilities
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use apiscribe_gen::compiler::{CompileOptions, compile};
//! use apiscribe_gen::evaluator::JsonSchemaEvaluator;
//! use apiscribe_gen::loader::load_spec;
//! use apiscribe_gen::openapi::{OutputFormat, document_from_spec};
//! use apiscribe_gen::output::{write_artifacts, write_document};
//!
//! # async fn run() -> Result<(), apiscribe_gen::errors::GeneratorError> {
//! let spec = load_spec(Path::new("api.yaml"))?;
//!
//! let document = document_from_spec(&spec, JsonSchemaEvaluator).await?;
//! let artifacts = compile(&spec.groups, &CompileOptions::default())?;
//!
//! write_document(&document, Path::new("openapi.json"), OutputFormat::Json, false)?;
//! write_artifacts(&artifacts, Path::new("client/src"), false)?;
//! # Ok(())
//! # }
//! ```

pub mod codegen;
pub mod compiler;
pub mod errors;
pub mod evaluator;
pub mod loader;
pub mod openapi;
pub mod output;
pub mod parser;
pub mod validation;
