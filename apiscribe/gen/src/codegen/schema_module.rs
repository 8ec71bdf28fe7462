//! Per-group schema modules.
//!
//! Each group gets `schemas/<group>.rs` binding one identifier per
//! operation to its validation expression(s):
//!
//! ```text
//! pub const LIST_USERS: &str = "z.object({ page: z.number() })";
//!
//! pub mod upload_avatar {
//!     pub const DEFAULT: &str = "z.object({ url: z.string() })";
//!     pub const MULTIPART_FORM_DATA: &str = "z.object({ file: z.any() })";
//! }
//! ```

use apiscribe_define::{GroupSpec, OperationSpec};
use proc_macro2::TokenStream;
use quote::quote;

use crate::codegen::naming::{const_name, module_name, parse_ident};
use crate::errors::GeneratorError;

/// Generates the schema bindings of one operation.
///
/// One variant binds a constant directly. Several variants get a nested
/// module holding one constant per variant tag. An operation without
/// variants binds an empty expression.
pub fn generate_schema_binding(operation: &OperationSpec) -> Result<TokenStream, GeneratorError> {
    let doc = format!(" Input schema of `{}`.", operation.name);

    if operation.has_variants() {
        let module = parse_ident(&module_name(&operation.name))?;
        let constants = operation
            .schemas
            .iter()
            .map(|(tag, expression)| {
                let ident = parse_ident(&const_name(tag))?;
                let tag_doc = format!(" Variant `{tag}`.");
                Ok(quote! {
                    #[doc = #tag_doc]
                    pub const #ident: &str = #expression;
                })
            })
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        Ok(quote! {
            #[doc = #doc]
            pub mod #module {
                #(#constants)*
            }
        })
    } else {
        let ident = parse_ident(&const_name(&operation.name))?;
        let expression = operation
            .schemas
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or_default();

        Ok(quote! {
            #[doc = #doc]
            pub const #ident: &str = #expression;
        })
    }
}

/// Generates `schemas/<group>.rs`.
pub fn generate_group_module(
    group: &str,
    operations: &[OperationSpec],
) -> Result<TokenStream, GeneratorError> {
    let doc = format!(" Validation schemas for the `{group}` group.");
    let bindings = operations
        .iter()
        .map(generate_schema_binding)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        #![doc = #doc]

        #(#bindings)*
    })
}

/// Generates `schemas/mod.rs` declaring one module per group.
pub fn generate_schemas_mod(groups: &GroupSpec) -> Result<TokenStream, GeneratorError> {
    let modules = groups
        .keys()
        .map(|group| parse_ident(&module_name(group)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        //! Validation schemas, one module per operation group.

        #(pub mod #modules;)*
    })
}
