//! Input field classification into request location buckets.

use apiscribe_define::{OperationSpec, ParamLocation, SourceBinding};

use crate::errors::GeneratorError;

/// Input field names of one operation, split by where they travel in the
/// HTTP request. Each bucket keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBuckets<'a> {
    pub headers: Vec<&'a str>,
    pub query: Vec<&'a str>,
    pub body: Vec<&'a str>,
    pub params: Vec<&'a str>,
}

impl FieldBuckets<'_> {
    /// Total number of classified fields.
    pub fn len(&self) -> usize {
        self.headers.len() + self.query.len() + self.body.len() + self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classifies every input of `operation`.
///
/// `internal` inputs are dropped. Any unrecognized source aborts with an
/// error naming the field and the operation.
///
/// ## Errors
///
/// Returns `GeneratorError::UnknownInputSource` for unrecognized sources.
pub fn classify(operation: &OperationSpec) -> Result<FieldBuckets<'_>, GeneratorError> {
    let mut buckets = FieldBuckets::default();

    for (name, field) in &operation.inputs {
        let bucket = match field.source.binding() {
            SourceBinding::Location(ParamLocation::Header) => &mut buckets.headers,
            SourceBinding::Location(ParamLocation::Query) => &mut buckets.query,
            SourceBinding::Location(ParamLocation::Path) => &mut buckets.params,
            SourceBinding::Body => &mut buckets.body,
            SourceBinding::Excluded => continue,
            SourceBinding::Unknown(raw) => {
                return Err(GeneratorError::UnknownInputSource {
                    field: name.clone(),
                    operation: operation.name.clone(),
                    source_name: raw.to_string(),
                });
            }
        };
        bucket.push(name.as_str());
    }

    Ok(buckets)
}
