//! Output validation, formatting and file writing.
//!
//! This module handles the final phase of generation: validating generated
//! token streams, formatting them, and writing artifacts to disk atomically.
//!
//! ## Output Structure
//!
//! A compiled artifact set is written relative to the output directory:
//! ```text
//! src/
//! ├── lib.rs               # Module declarations
//! ├── runtime.rs           # Endpoint traits, request building, errors
//! ├── errors.rs            # Error identifiers (unless supplied)
//! ├── endpoints.rs         # Standard endpoint registry
//! ├── stream_endpoints.rs  # Streaming endpoint registry
//! ├── dispatch.rs          # Request dispatch tables
//! └── schemas/
//!     ├── mod.rs
//!     └── <group>.rs       # Validation schemas per group
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes

use std::fs;
use std::path::Path;

use proc_macro2::TokenStream;
use tracing::{debug, info};

use crate::compiler::Artifacts;
use crate::errors::GeneratorError;
use crate::openapi::{OpenApiDocument, OutputFormat};

/// Notice prepended to every generated Rust file.
pub const GENERATED_NOTICE: &str =
    "// This code was automatically generated by apiscribe-gen. Do not edit manually.";

/// Validates generated code using syn.
///
/// Parses the token stream as a complete Rust file to ensure it's syntactically
/// valid before writing to disk.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {e}")))
}

/// Formats generated code using prettyplease.
///
/// The auto-generated notice is prepended as a regular comment so it does not
/// end up in rustdoc output.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!("{GENERATED_NOTICE}\n\n{formatted}")
}

/// Validates and formats a token stream in one step.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the code fails to parse.
pub fn render_code(tokens: &TokenStream) -> Result<String, GeneratorError> {
    Ok(format_code(&validate_code(tokens)?))
}

/// Writes content to a file atomically using a temp file + rename pattern.
///
/// Parent directories are created as needed.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if any filesystem operation fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Writes every artifact below `output_dir`.
///
/// In dry-run mode each artifact is printed to stdout under a header line
/// instead, and nothing touches the filesystem.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if a file cannot be written.
pub fn write_artifacts(
    artifacts: &Artifacts,
    output_dir: &Path,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    if dry_run {
        for (name, content) in artifacts {
            println!("=== {name} ===\n{content}\n");
        }
        return Ok(());
    }

    for (name, content) in artifacts {
        let path = output_dir.join(name);
        write_atomic(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    }
    info!(
        count = artifacts.len(),
        dir = %output_dir.display(),
        "wrote generated artifacts"
    );

    Ok(())
}

/// Renders the OpenAPI document and writes it to `path`, or prints it in
/// dry-run mode.
///
/// ## Errors
///
/// Returns `GeneratorError::Serialize` when rendering fails and
/// `GeneratorError::WriteError` when the file cannot be written.
pub fn write_document(
    document: &OpenApiDocument,
    path: &Path,
    format: OutputFormat,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    let rendered = document.render(format)?;

    if dry_run {
        println!("=== {} ===\n{rendered}", path.display());
    } else {
        write_atomic(path, &rendered)?;
        info!(path = %path.display(), ?format, "wrote OpenAPI document");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{OpenApiInfo, Paths};
    use quote::quote;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn artifacts() -> Artifacts {
        let mut artifacts = Artifacts::new();
        artifacts.insert("lib.rs".to_string(), "pub mod schemas;\n".to_string());
        artifacts.insert("schemas/items.rs".to_string(), "pub const A: &str = \"\";\n".to_string());
        artifacts
    }

    // === validate_code / format_code ===

    #[test]
    fn validate_code_rejects_invalid_tokens() {
        // a function item without a body
        let tokens = quote! { pub fn broken() };
        assert!(matches!(
            validate_code(&tokens),
            Err(GeneratorError::CodeGenError(_))
        ));
    }

    #[test]
    fn format_code_prepends_plain_comment_notice() {
        let file = validate_code(&quote! { pub struct Item; }).unwrap();
        let code = format_code(&file);

        assert!(code.starts_with("// This code was automatically generated by apiscribe-gen"));
        assert!(!code.starts_with("//!"));
        assert!(code.contains("pub struct Item;"));
    }

    // === write_atomic ===

    #[test]
    fn write_atomic_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test.rs");

        write_atomic(&file_path, "// Test content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// Test content");
    }

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/test.rs");

        assert!(write_atomic(&file_path, "// Nested content").is_ok());
        assert!(file_path.exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
    }

    #[test]
    fn write_atomic_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("clean.rs");

        write_atomic(&file_path, "// Content").unwrap();

        assert!(!file_path.with_extension("tmp").exists());
    }

    // === write_artifacts ===

    #[traced_test]
    #[test]
    fn write_artifacts_writes_nested_paths() {
        let temp_dir = TempDir::new().unwrap();

        write_artifacts(&artifacts(), temp_dir.path(), false).unwrap();

        assert!(temp_dir.path().join("lib.rs").exists());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("schemas/items.rs")).unwrap(),
            "pub const A: &str = \"\";\n"
        );
        assert!(logs_contain("wrote generated artifacts"));
    }

    #[test]
    fn write_artifacts_dry_run_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");

        write_artifacts(&artifacts(), &output, true).unwrap();

        assert!(!output.exists());
    }

    // === write_document ===

    #[test]
    fn write_document_renders_requested_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("openapi.yaml");
        let document = OpenApiDocument::new(OpenApiInfo::new("Inventory", "1.0.0"), Paths::new());

        write_document(&document, &path, OutputFormat::Yaml, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("openapi: 3.1.0"));
        assert!(content.contains("title: Inventory"));
    }
}
