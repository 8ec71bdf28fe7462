//! Code generation modules for apiscribe.
//!
//! This module contains generators that produce Rust source code for a
//! typed client from grouped operation specifications. Each submodule
//! handles one generated artifact or one piece of shared bookkeeping.
//!
//! ## Submodules
//!
//! - [`plan`] - Expands operations into per-variant [`EndpointPlan`]s
//! - [`classify`] - Splits inputs into header/query/body/path buckets
//! - [`key`] - The [`EndpointKey`] joining registry and dispatch entries
//! - [`naming`] - Identifier casing and parsing
//! - [`runtime`] - The shared `runtime.rs` module
//! - [`schema_module`] - Per-group validation schema modules
//! - [`registry`] - Standard and streaming endpoint registries, `errors.rs`
//! - [`dispatch`] - Request dispatch tables
//!
//! ## Code Generation Flow
//!
//! 1. Every operation is planned once via [`plan_endpoints`]
//! 2. Each generator renders its artifact from the same plan list
//! 3. [`crate::compiler`] validates, formats and collects the artifacts
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style

pub mod classify;
pub mod dispatch;
pub mod key;
pub mod naming;
pub mod plan;
pub mod registry;
pub mod runtime;
pub mod schema_module;

pub use classify::{FieldBuckets, classify};
pub use dispatch::generate_dispatch_module;
pub use key::EndpointKey;
pub use plan::{EndpointPlan, SchemaPath, plan_endpoints};
pub use registry::{
    generate_endpoints_module, generate_errors_module, generate_stream_endpoints_module,
    referenced_errors,
};
pub use runtime::generate_runtime_module;
pub use schema_module::{generate_group_module, generate_schemas_mod};
