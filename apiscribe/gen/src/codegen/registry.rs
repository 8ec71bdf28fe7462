//! Endpoint registry generation.
//!
//! Generates `endpoints.rs` (standard endpoints), `stream_endpoints.rs`
//! (streaming endpoints) and, when the surrounding crate does not supply
//! one, `errors.rs`.
//!
//! Every endpoint variant becomes a zero-sized marker type implementing
//! `Endpoint` or `StreamEndpoint`, whose `KEY` is the rendered
//! [`EndpointKey`](crate::codegen::EndpointKey) of the variant. Inputs are
//! untyped JSON objects until validation yields typed inputs, so every
//! marker declares `type Input = serde_json::Value`.

use apiscribe_define::OutputFormatter;
use indexmap::IndexSet;
use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::naming::{parse_ident, parse_path};
use crate::codegen::plan::EndpointPlan;
use crate::errors::GeneratorError;

/// Error identifier used by standard endpoints that declare no errors.
pub const FALLBACK_ERROR: &str = "UnknownError";

/// Variant wrapping input validation failures in every error union.
pub const INVALID_INPUT_VARIANT: &str = "InvalidInput";

/// Error identifiers of one standard endpoint, in declaration order,
/// without duplicates. Falls back to [`FALLBACK_ERROR`].
pub fn endpoint_errors<'a>(plan: &'a EndpointPlan<'_>) -> Vec<&'a str> {
    let declared: IndexSet<&str> = plan.operation.errors.iter().map(String::as_str).collect();
    if declared.is_empty() {
        vec![FALLBACK_ERROR]
    } else {
        declared.into_iter().collect()
    }
}

/// Every error identifier referenced by standard endpoints, deduplicated
/// in first-use order.
pub fn referenced_errors<'a>(plans: &'a [EndpointPlan<'_>]) -> Vec<&'a str> {
    let mut seen = IndexSet::new();
    for plan in plans.iter().filter(|plan| !plan.is_stream()) {
        seen.extend(endpoint_errors(plan));
    }
    seen.into_iter().collect()
}

fn output_type(formatter: OutputFormatter) -> TokenStream {
    match formatter {
        OutputFormatter::Json => quote! { serde_json::Value },
        OutputFormatter::Text => quote! { String },
        OutputFormatter::Binary => quote! { Vec<u8> },
        OutputFormatter::Empty => quote! { () },
    }
}

fn marker_doc(plan: &EndpointPlan<'_>) -> String {
    match &plan.operation.description {
        Some(description) => format!(" `{}`: {description}", plan.key),
        None => format!(" `{}`", plan.key),
    }
}

/// Generates the marker, `Endpoint` impl and error union of one standard
/// endpoint.
fn generate_standard_endpoint(plan: &EndpointPlan<'_>) -> Result<TokenStream, GeneratorError> {
    let marker = parse_ident(&plan.marker)?;
    let error_enum = parse_ident(&format!("{}Error", plan.marker))?;
    let key = plan.key.to_string();
    let schema = parse_path(&plan.schema.rust_path())?;
    let output = output_type(plan.operation.output_formatter);
    let doc = marker_doc(plan);
    let error_doc = format!(" Errors of [`{}`].", plan.marker);
    let invalid_input = parse_ident(INVALID_INPUT_VARIANT)?;

    let variants = endpoint_errors(plan)
        .into_iter()
        .map(|name| {
            let ident = parse_ident(name)?;
            Ok(quote! {
                #[error(transparent)]
                #ident(#[from] #ident),
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct #marker;

        impl Endpoint for #marker {
            const KEY: &'static str = #key;
            const SCHEMA: &'static str = #schema;
            type Input = serde_json::Value;
            type Output = #output;
            type Error = #error_enum;
        }

        #[doc = #error_doc]
        #[derive(Debug, thiserror::Error)]
        pub enum #error_enum {
            #(#variants)*
            #[error(transparent)]
            #invalid_input(#[from] ParseFailure<<#marker as Endpoint>::Input>),
        }
    })
}

/// Generates `endpoints.rs`.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when a name does not form a valid
/// identifier or `errors_module` is not a valid path.
pub fn generate_endpoints_module(
    plans: &[EndpointPlan<'_>],
    errors_module: &str,
) -> Result<TokenStream, GeneratorError> {
    let standard: Vec<_> = plans.iter().filter(|plan| !plan.is_stream()).collect();

    let errors_path = parse_path(errors_module)?;
    let error_idents = referenced_errors(plans)
        .into_iter()
        .map(parse_ident)
        .collect::<Result<Vec<_>, _>>()?;

    let imports = if standard.is_empty() {
        quote! {}
    } else {
        quote! {
            use crate::runtime::{Endpoint, ParseFailure};
            use #errors_path::{#(#error_idents),*};
        }
    };

    let endpoints = standard
        .iter()
        .map(|plan| generate_standard_endpoint(plan))
        .collect::<Result<Vec<_>, _>>()?;
    let keys = standard.iter().map(|plan| plan.key.to_string());

    Ok(quote! {
        //! Registry of standard endpoints.
        //!
        //! Each marker type carries the key of its dispatch table entry, its
        //! input schema and its output and error types.

        #imports

        #(#endpoints)*

        /// Keys of every standard endpoint, in declaration order.
        pub const ENDPOINT_KEYS: &[&str] = &[#(#keys),*];
    })
}

/// Generates `stream_endpoints.rs`.
pub fn generate_stream_endpoints_module(
    plans: &[EndpointPlan<'_>],
) -> Result<TokenStream, GeneratorError> {
    let streams: Vec<_> = plans.iter().filter(|plan| plan.is_stream()).collect();

    let endpoints = streams
        .iter()
        .map(|plan| {
            let marker = parse_ident(&plan.marker)?;
            let key = plan.key.to_string();
            let schema = parse_path(&plan.schema.rust_path())?;
            let item = output_type(plan.operation.output_formatter);
            let doc = marker_doc(plan);
            Ok(quote! {
                #[doc = #doc]
                #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
                pub struct #marker;

                impl StreamEndpoint for #marker {
                    const KEY: &'static str = #key;
                    const SCHEMA: &'static str = #schema;
                    type Input = serde_json::Value;
                    type Item = #item;
                }
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;
    let keys = streams.iter().map(|plan| plan.key.to_string());

    let imports = if streams.is_empty() {
        quote! {}
    } else {
        quote! { use crate::runtime::StreamEndpoint; }
    };

    Ok(quote! {
        //! Registry of streaming endpoints.

        #imports

        #(#endpoints)*

        /// Keys of every streaming endpoint, in declaration order.
        pub const STREAM_ENDPOINT_KEYS: &[&str] = &[#(#keys),*];
    })
}

/// Generates `errors.rs` with one unit error type per identifier.
pub fn generate_errors_module(identifiers: &[&str]) -> Result<TokenStream, GeneratorError> {
    let errors = identifiers
        .iter()
        .map(|name| {
            let ident = parse_ident(name)?;
            let message = name.to_string();
            Ok(quote! {
                #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, thiserror::Error)]
                #[error(#message)]
                pub struct #ident;
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    Ok(quote! {
        //! Error types referenced by the endpoint registry.

        #(#errors)*
    })
}
