//! Pre-generation validation of endpoint plans.
//!
//! Detects naming collisions before any code is generated. Two operations
//! that derive the same marker type, endpoint key or schema constant would
//! otherwise produce artifacts that silently shadow each other or fail to
//! compile.
//!
//! ## Validation Checks
//!
//! - **Marker types**: every endpoint variant needs a distinct type name,
//!   and so does the `<Marker>Error` union of every standard endpoint.
//!   Neither may reuse a name exported by the generated runtime
//! - **Endpoint keys**: keys are unique within the standard and the
//!   streaming dispatch table
//! - **Schema constants**: every schema binding resolves to a distinct path
//! - **Group modules**: group names must not collapse to the same module
//! - **Error identifiers**: may not shadow a marker type, an error union,
//!   a runtime name or the built-in input-validation variant
//!
//! Path placeholders without a matching `params` input (and the reverse)
//! are reported with `warn!` but do not fail validation.

use std::collections::HashMap;

use apiscribe_define::GroupSpec;
use tracing::warn;

use crate::codegen::classify::classify;
use crate::codegen::naming::module_name;
use crate::codegen::plan::EndpointPlan;
use crate::codegen::registry::{INVALID_INPUT_VARIANT, endpoint_errors};
use crate::codegen::runtime::RUNTIME_TYPE_NAMES;
use crate::errors::GeneratorError;
use crate::parser::extract_path_params;

/// Human-readable origin of a plan, used in collision reports.
fn origin(plan: &EndpointPlan<'_>) -> String {
    match plan.variant {
        Some(variant) => format!("{}.{} [{variant}]", plan.group, plan.operation.name),
        None => format!("{}.{}", plan.group, plan.operation.name),
    }
}

/// Records `name` for `owner`, failing when another owner already holds it.
fn claim(
    seen: &mut HashMap<String, String>,
    kind: &'static str,
    name: String,
    owner: String,
) -> Result<(), GeneratorError> {
    if let Some(first) = seen.get(&name) {
        return Err(GeneratorError::NamingCollision {
            kind,
            name,
            first: first.clone(),
            second: owner,
        });
    }
    seen.insert(name, owner);
    Ok(())
}

/// Validates a planned specification before code generation.
///
/// ## Errors
///
/// Returns `GeneratorError::NamingCollision` for the first collision found.
pub fn validate_plans(groups: &GroupSpec, plans: &[EndpointPlan<'_>]) -> Result<(), GeneratorError> {
    let mut modules = HashMap::new();
    for group in groups.keys() {
        claim(&mut modules, "schema module", module_name(group), group.clone())?;
    }

    let mut markers: HashMap<String, String> = RUNTIME_TYPE_NAMES
        .iter()
        .map(|name| (name.to_string(), "generated runtime".to_string()))
        .collect();
    let mut keys = HashMap::new();
    let mut stream_keys = HashMap::new();
    let mut schemas = HashMap::new();

    for plan in plans {
        let owner = origin(plan);
        claim(&mut markers, "type name", plan.marker.clone(), owner.clone())?;
        if !plan.is_stream() {
            claim(
                &mut markers,
                "type name",
                format!("{}Error", plan.marker),
                format!("error union of {owner}"),
            )?;
        }
        claim(&mut schemas, "schema constant", plan.schema.rust_path(), owner.clone())?;

        let table = if plan.is_stream() {
            &mut stream_keys
        } else {
            &mut keys
        };
        claim(table, "endpoint key", plan.key.to_string(), owner)?;
    }

    for plan in plans.iter().filter(|plan| !plan.is_stream()) {
        for error in endpoint_errors(plan) {
            if error == INVALID_INPUT_VARIANT {
                return Err(GeneratorError::NamingCollision {
                    kind: "error variant",
                    name: error.to_string(),
                    first: "input validation".to_string(),
                    second: origin(plan),
                });
            }
            if let Some(first) = markers.get(error) {
                return Err(GeneratorError::NamingCollision {
                    kind: "type name",
                    name: error.to_string(),
                    first: first.clone(),
                    second: format!("error identifier of {}", origin(plan)),
                });
            }
        }
    }

    for (group, operations) in groups {
        for operation in operations {
            let placeholders = extract_path_params(&operation.path);
            let params = classify(operation)?.params;

            for placeholder in &placeholders {
                if !params.contains(placeholder) {
                    warn!(
                        group = %group,
                        operation = %operation.name,
                        placeholder = %placeholder,
                        "path placeholder has no params input"
                    );
                }
            }
            for param in &params {
                if !placeholders.contains(param) {
                    warn!(
                        group = %group,
                        operation = %operation.name,
                        param = %param,
                        "params input does not appear in the path"
                    );
                }
            }
        }
    }

    Ok(())
}
