//! Shared runtime module for generated clients.
//!
//! `runtime.rs` is the module every other artifact builds on:
//!
//! - `Endpoint` / `StreamEndpoint` traits implemented by registry markers
//! - `RequestPlan` and `build_request`, which turn an input object into an
//!   `HttpRequest` using the four field buckets
//! - `Dispatch`, the row type of the dispatch tables
//! - `InputError` and `ParseFailure<I>` error types
//!
//! Its source does not depend on the specification, so it is kept as a
//! plain Rust file under `templates/` and parsed with `syn` before being
//! emitted. The generated code depends on `serde_json`, `thiserror` and
//! `percent-encoding`.

use proc_macro2::TokenStream;
use quote::ToTokens;

use crate::errors::GeneratorError;

/// Source of the generated `runtime.rs`.
pub const RUNTIME_TEMPLATE: &str = include_str!("../../templates/runtime.rs");

/// Type names exported by the generated runtime. Registry modules import
/// some of them next to the marker types.
pub const RUNTIME_TYPE_NAMES: &[&str] = &[
    "Endpoint",
    "StreamEndpoint",
    "ParseFailure",
    "InputError",
    "RequestContext",
    "RequestPlan",
    "RequestBody",
    "HttpRequest",
    "BodyEncoding",
    "BuildFn",
    "Dispatch",
];

/// Generates the complete `runtime.rs` module.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when the runtime template does not
/// parse.
pub fn generate_runtime_module() -> Result<TokenStream, GeneratorError> {
    let file = syn::parse_file(RUNTIME_TEMPLATE)
        .map_err(|e| GeneratorError::CodeGenError(format!("Runtime template is invalid: {e}")))?;
    Ok(file.into_token_stream())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{format_code, validate_code};

    fn runtime_code() -> String {
        let tokens = generate_runtime_module().expect("template should parse");
        let file = validate_code(&tokens).expect("runtime should parse");
        format_code(&file)
    }

    #[test]
    fn runtime_module_is_valid_rust() {
        assert!(validate_code(&generate_runtime_module().unwrap()).is_ok());
    }

    #[test]
    fn runtime_module_declares_public_surface() {
        let code = runtime_code();

        for item in [
            "pub trait Endpoint",
            "pub trait StreamEndpoint",
            "pub struct RequestContext",
            "pub enum BodyEncoding",
            "pub enum RequestBody",
            "pub struct HttpRequest",
            "pub struct RequestPlan",
            "pub struct Dispatch",
            "pub enum InputError",
            "pub struct ParseFailure<I>",
            "pub fn build_request(",
        ] {
            assert!(code.contains(item), "missing `{item}`");
        }
    }

    #[test]
    fn reserved_names_match_runtime_items() {
        let file = syn::parse_file(RUNTIME_TEMPLATE).unwrap();
        let mut declared: Vec<String> = file
            .items
            .iter()
            .filter_map(|item| match item {
                syn::Item::Struct(item) => Some(item.ident.to_string()),
                syn::Item::Enum(item) => Some(item.ident.to_string()),
                syn::Item::Trait(item) => Some(item.ident.to_string()),
                syn::Item::Type(item) => Some(item.ident.to_string()),
                _ => None,
            })
            .collect();

        let mut reserved: Vec<String> = RUNTIME_TYPE_NAMES.iter().map(|name| name.to_string()).collect();
        reserved.sort();
        declared.sort();
        assert_eq!(reserved, declared);
    }

    #[test]
    fn runtime_keeps_module_docs_and_notice() {
        let code = runtime_code();
        assert!(code.starts_with("// This code was automatically generated by apiscribe-gen"));
        assert!(code.contains("//! Runtime support shared by the generated endpoint registry"));
    }

    #[test]
    fn runtime_errors_use_thiserror() {
        let code = runtime_code();
        assert!(code.contains("thiserror::Error"));
        assert!(code.contains(r#"#[error("missing path parameter `{0}`")]"#));
    }
}
