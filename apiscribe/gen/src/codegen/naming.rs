//! Identifier derivation for generated items.
//!
//! All casing goes through `heck` so the same operation name always maps to
//! the same identifiers across every artifact.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::Ident;

use crate::errors::GeneratorError;

/// Parses `name` as a Rust identifier.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` for keywords and strings that are
/// not identifiers, instead of panicking like `format_ident!`.
pub fn parse_ident(name: &str) -> Result<Ident, GeneratorError> {
    syn::parse_str::<Ident>(name)
        .map_err(|_| GeneratorError::CodeGenError(format!("'{name}' is not a valid Rust identifier")))
}

/// Parses a `::`-separated Rust path such as `crate::errors`.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` when `path` is not a valid path.
pub fn parse_path(path: &str) -> Result<syn::Path, GeneratorError> {
    syn::parse_str::<syn::Path>(path)
        .map_err(|_| GeneratorError::CodeGenError(format!("'{path}' is not a valid Rust path")))
}

/// `listItems` → `ListItems`
pub fn type_name(name: &str) -> String {
    name.to_upper_camel_case()
}

/// `listItems` → `LIST_ITEMS`
pub fn const_name(name: &str) -> String {
    name.to_shouty_snake_case()
}

/// `User Accounts` → `user_accounts`
pub fn module_name(name: &str) -> String {
    name.to_snake_case()
}

/// Marker type for one variant of an operation.
///
/// The default variant keeps the bare operation name; other variants append
/// their tag (`uploadFile` + `multipart/form-data` → `UploadFileMultipartFormData`).
pub fn marker_name(operation: &str, variant: Option<&str>) -> String {
    match variant {
        Some(tag) => format!("{}{}", type_name(operation), type_name(tag)),
        None => type_name(operation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casing_is_consistent() {
        assert_eq!(type_name("listItems"), "ListItems");
        assert_eq!(type_name("list_items"), "ListItems");
        assert_eq!(const_name("listItems"), "LIST_ITEMS");
        assert_eq!(const_name("multipart/form-data"), "MULTIPART_FORM_DATA");
        assert_eq!(module_name("UserAccounts"), "user_accounts");
    }

    #[test]
    fn marker_name_appends_variant_tag() {
        assert_eq!(marker_name("uploadFile", None), "UploadFile");
        assert_eq!(
            marker_name("uploadFile", Some("multipart/form-data")),
            "UploadFileMultipartFormData"
        );
    }

    #[test]
    fn parse_ident_rejects_keywords_and_garbage() {
        assert!(parse_ident("ListItems").is_ok());
        assert!(parse_ident("type").is_err());
        assert!(parse_ident("2fa").is_err());
        assert!(parse_ident("not an ident").is_err());
    }

    #[test]
    fn parse_path_accepts_crate_paths() {
        assert!(parse_path("crate::errors").is_ok());
        assert!(parse_path("my_client::errors::api").is_ok());
        assert!(parse_path("crate::").is_err());
    }
}
