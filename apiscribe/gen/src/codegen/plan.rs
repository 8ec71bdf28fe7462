//! Per-variant endpoint plans.
//!
//! Every generator works from the same [`EndpointPlan`] list, so markers,
//! keys and schema paths agree across all artifacts.

use apiscribe_define::{DEFAULT_VARIANT, GroupSpec, JSON_CONTENT_TYPE, OperationSpec};

use crate::codegen::classify::{FieldBuckets, classify};
use crate::codegen::key::EndpointKey;
use crate::codegen::naming::{const_name, marker_name, module_name};
use crate::errors::GeneratorError;

/// Where the validation expression of a variant lives in `schemas/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPath {
    /// Module of the group, `schemas::<module>`.
    pub module: String,
    /// Nested module for multi-variant operations.
    pub nested: Option<String>,
    pub constant: String,
}

impl SchemaPath {
    /// `crate::schemas::users::LIST_USERS` or
    /// `crate::schemas::files::upload::MULTIPART_FORM_DATA`.
    pub fn rust_path(&self) -> String {
        match &self.nested {
            Some(nested) => format!("crate::schemas::{}::{nested}::{}", self.module, self.constant),
            None => format!("crate::schemas::{}::{}", self.module, self.constant),
        }
    }
}

/// One generated endpoint: an operation restricted to one schema variant.
#[derive(Debug, Clone)]
pub struct EndpointPlan<'a> {
    pub group: &'a str,
    pub operation: &'a OperationSpec,
    /// Variant tag, `None` when the operation has at most one variant.
    pub variant: Option<&'a str>,
    pub key: EndpointKey,
    pub marker: String,
    pub schema: SchemaPath,
    pub buckets: FieldBuckets<'a>,
    /// Content type used to encode the request body.
    pub content_type: &'a str,
}

impl EndpointPlan<'_> {
    pub fn is_stream(&self) -> bool {
        self.operation.is_stream()
    }
}

/// Plans every endpoint of every group, in declaration order.
///
/// An operation with one variant (or none) yields one plan; an operation
/// with several yields one plan per variant.
///
/// ## Errors
///
/// Returns `GeneratorError::UnknownInputSource` from classification.
pub fn plan_endpoints(groups: &GroupSpec) -> Result<Vec<EndpointPlan<'_>>, GeneratorError> {
    let mut plans = vec![];

    for (group, operations) in groups {
        let module = module_name(group);
        for operation in operations {
            let buckets = classify(operation)?;

            if operation.has_variants() {
                for tag in operation.schemas.keys() {
                    let tag = tag.as_str();
                    let prefix = (tag != DEFAULT_VARIANT).then_some(tag);
                    let key = EndpointKey::for_variant(operation, tag);
                    plans.push(EndpointPlan {
                        group: group.as_str(),
                        operation,
                        variant: Some(tag),
                        marker: marker_name(&operation.name, prefix),
                        schema: SchemaPath {
                            module: module.clone(),
                            nested: Some(module_name(&operation.name)),
                            constant: const_name(tag),
                        },
                        buckets: buckets.clone(),
                        content_type: body_content_type(operation, prefix),
                        key,
                    });
                }
            } else {
                plans.push(EndpointPlan {
                    group: group.as_str(),
                    operation,
                    variant: None,
                    key: EndpointKey::for_variant(operation, DEFAULT_VARIANT),
                    marker: marker_name(&operation.name, None),
                    schema: SchemaPath {
                        module: module.clone(),
                        nested: None,
                        constant: const_name(&operation.name),
                    },
                    buckets,
                    content_type: body_content_type(operation, None),
                });
            }
        }
    }

    Ok(plans)
}

/// Non-default variant tag, then the declared content type, then JSON.
fn body_content_type<'a>(operation: &'a OperationSpec, variant: Option<&'a str>) -> &'a str {
    variant
        .or(operation.content_type.as_deref())
        .unwrap_or(JSON_CONTENT_TYPE)
}
