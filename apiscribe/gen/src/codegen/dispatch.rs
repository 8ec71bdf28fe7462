//! Request dispatch table generation.
//!
//! Generates `dispatch.rs`: one request-building function per endpoint
//! variant plus the `DISPATCH` and `STREAM_DISPATCH` tables pairing each
//! endpoint key with its schema and builder.
//!
//! Each builder applies exactly the field buckets computed for its
//! operation through a static `RequestPlan`.

use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::naming::{module_name, parse_ident, parse_path};
use crate::codegen::plan::EndpointPlan;
use crate::errors::GeneratorError;

/// Maps a content type to the generated `BodyEncoding` variant.
///
/// `+json` suffixed types encode as JSON; unknown types are passed through
/// as raw encodings.
pub fn encoding_tokens(content_type: &str) -> TokenStream {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => quote! { BodyEncoding::Json },
        "application/x-www-form-urlencoded" => quote! { BodyEncoding::Form },
        "multipart/form-data" => quote! { BodyEncoding::Multipart },
        other if other.ends_with("+json") => quote! { BodyEncoding::Json },
        _ => quote! { BodyEncoding::Raw(#content_type) },
    }
}

/// Name of the generated builder function of an endpoint variant.
pub fn builder_name(plan: &EndpointPlan<'_>) -> String {
    format!("build_{}", module_name(&plan.marker))
}

fn generate_builder(plan: &EndpointPlan<'_>) -> Result<TokenStream, GeneratorError> {
    let name = parse_ident(&builder_name(plan))?;
    let method = plan.operation.method.to_string();
    let path = plan.operation.path.as_str();
    let headers = &plan.buckets.headers;
    let query = &plan.buckets.query;
    let body = &plan.buckets.body;
    let params = &plan.buckets.params;
    let encoding = encoding_tokens(plan.content_type);
    let doc = format!(" Builds the request for `{}`.", plan.key);

    Ok(quote! {
        #[doc = #doc]
        fn #name(input: &Value, context: &RequestContext) -> Result<HttpRequest, InputError> {
            const PLAN: RequestPlan = RequestPlan {
                method: #method,
                path: #path,
                headers: &[#(#headers),*],
                query: &[#(#query),*],
                body: &[#(#body),*],
                params: &[#(#params),*],
                encoding: #encoding,
            };
            build_request(&PLAN, input, context)
        }
    })
}

fn generate_entry(plan: &EndpointPlan<'_>) -> Result<TokenStream, GeneratorError> {
    let key = plan.key.to_string();
    let schema = parse_path(&plan.schema.rust_path())?;
    let build = parse_ident(&builder_name(plan))?;

    Ok(quote! {
        Dispatch {
            key: #key,
            schema: #schema,
            build: #build,
        }
    })
}

/// Generates `dispatch.rs`.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when a derived name is not a
/// valid identifier.
pub fn generate_dispatch_module(plans: &[EndpointPlan<'_>]) -> Result<TokenStream, GeneratorError> {
    let builders = plans
        .iter()
        .map(generate_builder)
        .collect::<Result<Vec<_>, _>>()?;

    let (streams, standard): (Vec<_>, Vec<_>) = plans.iter().partition(|plan| plan.is_stream());
    let entries = standard
        .iter()
        .map(|plan| generate_entry(plan))
        .collect::<Result<Vec<_>, _>>()?;
    let stream_entries = streams
        .iter()
        .map(|plan| generate_entry(plan))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        //! Request dispatch tables.
        //!
        //! Every entry pairs an endpoint key with its input schema and the
        //! function building its HTTP request. Keys match the endpoint
        //! registries exactly.

        use serde_json::Value;

        use crate::runtime::{
            BodyEncoding, Dispatch, HttpRequest, InputError, RequestContext, RequestPlan,
            build_request,
        };

        #(#builders)*

        /// Dispatch entries of standard endpoints.
        pub static DISPATCH: &[Dispatch] = &[#(#entries),*];

        /// Dispatch entries of streaming endpoints.
        pub static STREAM_DISPATCH: &[Dispatch] = &[#(#stream_entries),*];

        /// Finds the dispatch entry of a standard endpoint.
        pub fn lookup(key: &str) -> Option<&'static Dispatch> {
            DISPATCH.iter().find(|entry| entry.key == key)
        }

        /// Finds the dispatch entry of a streaming endpoint.
        pub fn lookup_stream(key: &str) -> Option<&'static Dispatch> {
            STREAM_DISPATCH.iter().find(|entry| entry.key == key)
        }
    })
}
