//! Artifact compilation.
//!
//! [`compile`] turns a [`GroupSpec`] into the complete set of generated
//! source files for a typed client. Nothing is written here; the caller
//! receives an ordered `relative path → contents` map and decides what to
//! do with it (see [`crate::output::write_artifacts`]).
//!
//! Compilation is all-or-nothing. Classification failures and naming
//! collisions abort before any artifact is rendered.
//!
//! ## Examples
//!
//! ```
//! use apiscribe_define::{GroupSpec, InputField, InputSource, OperationSpec, RestMethod};
//! use apiscribe_gen::compiler::{CompileOptions, compile};
//!
//! let mut groups = GroupSpec::new();
//! groups.insert(
//!     "items".to_string(),
//!     vec![
//!         OperationSpec::new("getItem", RestMethod::Get, "/items/{id}")
//!             .with_input("id", InputField::new(InputSource::Params, "z.string()"))
//!             .with_schema("default", "z.object({ id: z.string() })"),
//!     ],
//! );
//!
//! let artifacts = compile(&groups, &CompileOptions::default()).unwrap();
//! assert!(artifacts.contains_key("schemas/items.rs"));
//! assert!(artifacts["dispatch.rs"].contains(r#"key: "GET /items/{id}""#));
//! ```

use apiscribe_define::GroupSpec;
use indexmap::IndexMap;
use proc_macro2::TokenStream;
use quote::quote;
use tracing::debug;

use crate::codegen::naming::{module_name, parse_ident};
use crate::codegen::{
    generate_dispatch_module, generate_endpoints_module, generate_errors_module,
    generate_group_module, generate_runtime_module, generate_schemas_mod,
    generate_stream_endpoints_module, plan_endpoints, referenced_errors,
};
use crate::errors::GeneratorError;
use crate::output::render_code;
use crate::validation::validate_plans;

/// Module path error identifiers are imported from by default.
pub const DEFAULT_ERRORS_MODULE: &str = "crate::errors";

/// File name of the generated (or supplied) error module.
pub const ERRORS_FILE: &str = "errors.rs";

/// Generated artifacts: relative file path to file contents, in a stable
/// order.
pub type Artifacts = IndexMap<String, String>;

/// Options controlling artifact compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Rust path the endpoint registry imports error identifiers from.
    pub errors_module: String,
    /// Pass-through files copied verbatim into the artifact set.
    pub boilerplate: Artifacts,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            errors_module: DEFAULT_ERRORS_MODULE.to_string(),
            boilerplate: Artifacts::new(),
        }
    }
}

impl CompileOptions {
    pub fn with_errors_module(mut self, errors_module: impl Into<String>) -> Self {
        self.errors_module = errors_module.into();
        self
    }

    /// Adds a pass-through artifact.
    pub fn with_boilerplate(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.boilerplate.insert(path.into(), contents.into());
        self
    }

    /// True when `errors.rs` must be generated: errors live in the local
    /// `errors` module and no pass-through file supplies it.
    pub fn generates_errors_module(&self) -> bool {
        self.errors_module == DEFAULT_ERRORS_MODULE && !self.boilerplate.contains_key(ERRORS_FILE)
    }

    /// True when `lib.rs` must declare an `errors` module.
    fn declares_errors_module(&self) -> bool {
        self.errors_module == DEFAULT_ERRORS_MODULE || self.boilerplate.contains_key(ERRORS_FILE)
    }
}

/// Top-level pass-through `.rs` files that become modules of the crate.
fn boilerplate_modules(boilerplate: &Artifacts) -> Vec<String> {
    boilerplate
        .keys()
        .filter(|path| !path.contains('/') && path.as_str() != ERRORS_FILE)
        .filter_map(|path| path.strip_suffix(".rs"))
        .map(str::to_string)
        .collect()
}

/// Generates `lib.rs` declaring every generated and pass-through module.
fn generate_lib_module(modules: &[String]) -> Result<TokenStream, GeneratorError> {
    let idents = modules
        .iter()
        .map(|module| parse_ident(module))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quote! {
        //! Generated API client.
        //!
        //! - `endpoints` / `stream_endpoints` - typed endpoint registries
        //! - `dispatch` - request dispatch tables keyed like the registries
        //! - `schemas` - validation schemas per operation group
        //! - `runtime` - shared traits, request building and error types

        #(pub mod #idents;)*
    })
}

/// Compiles `groups` into the full artifact set.
///
/// ## Errors
///
/// - `GeneratorError::UnknownInputSource` when an input declares an
///   unrecognized source
/// - `GeneratorError::NamingCollision` when two operations derive the same
///   identifier or key
/// - `GeneratorError::ConfigError` when a pass-through file would replace a
///   generated one
/// - `GeneratorError::CodeGenError` when a derived name is not a valid Rust
///   identifier
pub fn compile(groups: &GroupSpec, options: &CompileOptions) -> Result<Artifacts, GeneratorError> {
    let plans = plan_endpoints(groups)?;
    validate_plans(groups, &plans)?;

    let generate_errors = options.generates_errors_module();

    let mut modules: Vec<String> = ["runtime", "schemas", "endpoints", "stream_endpoints", "dispatch"]
        .into_iter()
        .map(str::to_string)
        .collect();
    if options.declares_errors_module() {
        modules.insert(1, "errors".to_string());
    }
    for module in boilerplate_modules(&options.boilerplate) {
        if module == "lib" || modules.contains(&module) {
            return Err(GeneratorError::ConfigError(format!(
                "boilerplate file '{module}.rs' would replace a generated module"
            )));
        }
        modules.push(module);
    }

    let mut artifacts = Artifacts::new();
    artifacts.insert("lib.rs".to_string(), render_code(&generate_lib_module(&modules)?)?);
    artifacts.insert("runtime.rs".to_string(), render_code(&generate_runtime_module()?)?);

    if generate_errors {
        let errors = referenced_errors(&plans);
        artifacts.insert(ERRORS_FILE.to_string(), render_code(&generate_errors_module(&errors)?)?);
    }

    artifacts.insert("schemas/mod.rs".to_string(), render_code(&generate_schemas_mod(groups)?)?);
    for (group, operations) in groups {
        let path = format!("schemas/{}.rs", module_name(group));
        artifacts.insert(path, render_code(&generate_group_module(group, operations)?)?);
        debug!(group = %group, operations = operations.len(), "compiled schema module");
    }

    for plan in &plans {
        debug!(
            group = plan.group,
            operation = %plan.operation.name,
            key = %plan.key,
            marker = %plan.marker,
            stream = plan.is_stream(),
            "compiled endpoint"
        );
    }

    artifacts.insert(
        "endpoints.rs".to_string(),
        render_code(&generate_endpoints_module(&plans, &options.errors_module)?)?,
    );
    artifacts.insert(
        "stream_endpoints.rs".to_string(),
        render_code(&generate_stream_endpoints_module(&plans)?)?,
    );
    artifacts.insert("dispatch.rs".to_string(), render_code(&generate_dispatch_module(&plans)?)?);

    for (path, contents) in &options.boilerplate {
        if artifacts.contains_key(path) {
            return Err(GeneratorError::ConfigError(format!(
                "boilerplate file '{path}' collides with a generated artifact"
            )));
        }
        artifacts.insert(path.clone(), contents.clone());
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiscribe_define::{InputField, InputSource, OperationSpec, RestMethod};
    use tracing_test::traced_test;

    fn groups() -> GroupSpec {
        let mut groups = GroupSpec::new();
        groups.insert(
            "items".to_string(),
            vec![
                OperationSpec::new("getItem", RestMethod::Get, "/items/{id}")
                    .with_input("id", InputField::new(InputSource::Params, "z.string()"))
                    .with_schema("default", "z.object({ id: z.string() })")
                    .with_error("NotFound"),
                OperationSpec::new("watchItems", RestMethod::Get, "/items/watch").streaming(),
            ],
        );
        groups
    }

    #[test]
    fn artifact_set_is_complete_and_ordered() {
        let artifacts = compile(&groups(), &CompileOptions::default()).unwrap();
        let names: Vec<_> = artifacts.keys().map(String::as_str).collect();

        assert_eq!(
            names,
            vec![
                "lib.rs",
                "runtime.rs",
                "errors.rs",
                "schemas/mod.rs",
                "schemas/items.rs",
                "endpoints.rs",
                "stream_endpoints.rs",
                "dispatch.rs",
            ]
        );
    }

    #[test]
    fn lib_declares_every_module() {
        let artifacts = compile(&groups(), &CompileOptions::default()).unwrap();
        let lib = &artifacts["lib.rs"];

        for module in ["runtime", "errors", "schemas", "endpoints", "stream_endpoints", "dispatch"] {
            assert!(lib.contains(&format!("pub mod {module};")), "missing {module}");
        }
    }

    #[test]
    fn every_artifact_carries_the_notice() {
        let artifacts = compile(&groups(), &CompileOptions::default()).unwrap();
        assert!(artifacts.values().all(|code| code.starts_with("// This code was automatically generated")));
    }

    #[test]
    fn external_errors_module_skips_errors_rs() {
        let options = CompileOptions::default().with_errors_module("my_errors");
        let artifacts = compile(&groups(), &options).unwrap();

        assert!(!artifacts.contains_key("errors.rs"));
        assert!(!artifacts["lib.rs"].contains("pub mod errors;"));
        assert!(artifacts["endpoints.rs"].contains("use my_errors::{NotFound};")
            || artifacts["endpoints.rs"].contains("use my_errors::NotFound;"));
    }

    #[test]
    fn supplied_errors_rs_is_passed_through() {
        let options = CompileOptions::default().with_boilerplate("errors.rs", "// hand written\n");
        let artifacts = compile(&groups(), &options).unwrap();

        assert_eq!(artifacts["errors.rs"], "// hand written\n");
        assert!(artifacts["lib.rs"].contains("pub mod errors;"));
    }

    #[test]
    fn boilerplate_modules_are_declared_and_copied_verbatim() {
        let options = CompileOptions::default()
            .with_boilerplate("client.rs", "pub struct Client;\n")
            .with_boilerplate("templates/README.md", "# client\n");
        let artifacts = compile(&groups(), &options).unwrap();

        assert_eq!(artifacts["client.rs"], "pub struct Client;\n");
        assert_eq!(artifacts["templates/README.md"], "# client\n");
        assert!(artifacts["lib.rs"].contains("pub mod client;"));
        assert!(!artifacts["lib.rs"].contains("templates"));
    }

    #[test]
    fn boilerplate_replacing_generated_module_is_rejected() {
        let options = CompileOptions::default().with_boilerplate("dispatch.rs", "");
        assert!(matches!(
            compile(&groups(), &options),
            Err(GeneratorError::ConfigError(_))
        ));

        let options = CompileOptions::default().with_boilerplate("schemas/items.rs", "");
        assert!(matches!(
            compile(&groups(), &options),
            Err(GeneratorError::ConfigError(_))
        ));
    }

    #[test]
    fn unknown_source_aborts_whole_compile() {
        let mut groups = groups();
        groups.insert(
            "admin".to_string(),
            vec![OperationSpec::new("purge", RestMethod::Delete, "/purge")
                .with_input("token", InputField::new(InputSource::from("cookie".to_string()), "{}"))],
        );

        match compile(&groups, &CompileOptions::default()) {
            Err(GeneratorError::UnknownInputSource { field, operation, source_name }) => {
                assert_eq!(field, "token");
                assert_eq!(operation, "purge");
                assert_eq!(source_name, "cookie");
            }
            other => panic!("expected UnknownInputSource, got {other:?}"),
        }
    }

    #[test]
    fn empty_spec_compiles() {
        let artifacts = compile(&GroupSpec::new(), &CompileOptions::default()).unwrap();
        assert!(artifacts["dispatch.rs"].contains("pub static DISPATCH: &[Dispatch] = &[];"));
        assert!(artifacts["errors.rs"].starts_with("// This code was automatically generated"));
    }

    #[traced_test]
    #[test]
    fn compile_logs_each_endpoint() {
        compile(&groups(), &CompileOptions::default()).unwrap();
        assert!(logs_contain("compiled endpoint"));
        assert!(logs_contain("compiled schema module"));
    }
}
