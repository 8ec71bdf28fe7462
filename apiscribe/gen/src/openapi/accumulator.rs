//! Operation accumulator for the OpenAPI `paths` object.
//!
//! [`PathsBuilder`] collects operations and response declarations, then
//! resolves every selector through an [`Evaluator`] in a single consuming
//! [`PathsBuilder::build_paths`] call.

use apiscribe_define::{
    InputSource, JSON_CONTENT_TYPE, OperationSpec, ResponseItem, RestMethod, Selector,
    SourceBinding,
};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::{debug, trace};

use crate::errors::GeneratorError;
use crate::evaluator::{Evaluator, prepare_expression};
use crate::openapi::serializer::serialize;

/// `path → method → operation object`.
pub type Paths = IndexMap<String, Map<String, Value>>;

/// Response objects for one `(path, method)` pair, keyed by status code.
type ResponseTable = Map<String, Value>;

/// Callback invoked once per operation after it has been inserted into the
/// paths object.
///
/// A returned fragment is merged into the final result at `path → method`
/// granularity.
pub trait PathHook {
    fn on_operation(
        &mut self,
        source_file: &str,
        method: RestMethod,
        path: &str,
        operation: &Value,
    ) -> Option<Paths>;
}

impl<F> PathHook for F
where
    F: FnMut(&str, RestMethod, &str, &Value) -> Option<Paths>,
{
    fn on_operation(
        &mut self,
        source_file: &str,
        method: RestMethod,
        path: &str,
        operation: &Value,
    ) -> Option<Paths> {
        self(source_file, method, path, operation)
    }
}

/// One operation as seen by the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDef {
    pub name: String,
    pub path: String,
    pub method: RestMethod,
    pub selectors: Vec<Selector>,
    pub responses: Vec<ResponseItem>,
    pub tags: Vec<String>,
    pub description: Option<String>,
    /// Passed through to the [`PathHook`].
    pub source_file: String,
    /// Request body content type; JSON when unset.
    pub content_type: Option<String>,
}

impl OperationDef {
    pub fn new(name: impl Into<String>, method: RestMethod, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            method,
            selectors: vec![],
            responses: vec![],
            tags: vec![],
            description: None,
            source_file: String::new(),
            content_type: None,
        }
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn with_response(mut self, response: ResponseItem) -> Self {
        self.responses.push(response);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Derives the accumulator view of an operation specification.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::UnknownInputSource` when an input declares a
    /// source outside the known set.
    pub fn from_spec(
        spec: &OperationSpec,
        source_file: impl Into<String>,
    ) -> Result<Self, GeneratorError> {
        let selectors = spec.selectors();
        if let Some(selector) = selectors
            .iter()
            .find(|s| matches!(s.source.binding(), SourceBinding::Unknown(_)))
        {
            return Err(unknown_source(selector, &spec.name));
        }

        Ok(Self {
            name: spec.name.clone(),
            path: spec.path.clone(),
            method: spec.method,
            selectors,
            responses: spec.responses.clone(),
            tags: spec.tags.clone(),
            description: spec.description.clone(),
            source_file: source_file.into(),
            content_type: spec.content_type.clone(),
        })
    }
}

fn unknown_source(selector: &Selector, operation: &str) -> GeneratorError {
    GeneratorError::UnknownInputSource {
        field: selector.name.clone(),
        operation: operation.to_string(),
        source_name: selector.source.to_string(),
    }
}

/// Ordered-append builder for the OpenAPI `paths` object.
///
/// ## Examples
///
/// ```
/// use apiscribe_define::{InputSource, ResponseItem, RestMethod, Selector, TypeNode};
/// use apiscribe_gen::evaluator::JsonSchemaEvaluator;
/// use apiscribe_gen::openapi::{OperationDef, PathsBuilder};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut builder = PathsBuilder::new(JsonSchemaEvaluator);
/// builder.add_operation(
///     OperationDef::new("listItems", RestMethod::Get, "/items")
///         .with_selector(Selector::new("limit", r#"{"type":"integer"}"#, InputSource::Query).optional())
///         .with_response(ResponseItem::new("200").with_type(TypeNode::array(TypeNode::reference("/Item")))),
/// );
///
/// let paths = builder.build_paths().await.unwrap();
/// assert_eq!(paths["/items"]["get"]["parameters"][0]["in"], "query");
/// # });
/// ```
pub struct PathsBuilder<E> {
    evaluator: E,
    definitions: Option<String>,
    hook: Option<Box<dyn PathHook + Send>>,
    operations: Vec<OperationDef>,
    responses: IndexMap<(String, RestMethod), ResponseTable>,
}

impl<E: Evaluator> PathsBuilder<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            definitions: None,
            hook: None,
            operations: vec![],
            responses: IndexMap::new(),
        }
    }

    /// Sets the shared definitions reference handed to every evaluation.
    pub fn with_definitions(mut self, definitions: impl Into<String>) -> Self {
        self.definitions = Some(definitions.into());
        self
    }

    pub fn with_hook(mut self, hook: impl PathHook + Send + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Registers an operation and merges its responses.
    ///
    /// Operations are not de-duplicated; registering the same one twice
    /// produces two evaluations and the second insertion wins.
    pub fn add_operation(&mut self, operation: OperationDef) {
        self.add_responses(&operation.path, operation.method, &operation.responses);
        debug!(
            operation = %operation.name,
            method = %operation.method,
            path = %operation.path,
            "accumulated operation"
        );
        self.operations.push(operation);
    }

    /// Merges response declarations into the table for `path` + `method`.
    pub fn add_responses(&mut self, path: &str, method: RestMethod, items: &[ResponseItem]) {
        let table = self
            .responses
            .entry((path.to_string(), method))
            .or_default();
        for item in items {
            merge_response(table, item);
        }
    }

    /// Evaluates every selector and assembles the paths object.
    ///
    /// Evaluation runs sequentially in declaration order. The hook, when
    /// set, sees each operation right after its insertion; the fragments it
    /// returns are merged once every operation is in place.
    ///
    /// ## Errors
    ///
    /// Propagates the first evaluation failure and rejects selectors with
    /// an unknown source.
    pub async fn build_paths(self) -> Result<Paths, GeneratorError> {
        let Self {
            evaluator,
            definitions,
            mut hook,
            operations,
            mut responses,
        } = self;

        let mut paths = Paths::new();
        let mut fragments = vec![];

        for operation in operations {
            let responses = responses
                .swap_remove(&(operation.path.clone(), operation.method))
                .or_else(|| {
                    // A repeated (path, method) reuses the table consumed by the first one
                    paths
                        .get(&operation.path)
                        .and_then(|methods| methods.get(operation.method.as_path_key()))
                        .and_then(|existing| existing.get("responses"))
                        .and_then(Value::as_object)
                        .cloned()
                })
                .unwrap_or_default();

            let object =
                build_operation(&evaluator, definitions.as_deref(), &operation, responses).await?;

            let method_key = operation.method.as_path_key();
            let methods = paths.entry(operation.path.clone()).or_default();
            methods.insert(method_key.to_string(), object);
            debug!(operation = %operation.name, path = %operation.path, method = method_key, "built operation");

            if let Some(hook) = hook.as_mut() {
                let inserted = &methods[method_key];
                if let Some(fragment) = hook.on_operation(
                    &operation.source_file,
                    operation.method,
                    &operation.path,
                    inserted,
                ) {
                    fragments.push(fragment);
                }
            }
        }

        for fragment in fragments {
            merge_fragment(&mut paths, fragment);
        }

        Ok(paths)
    }
}

async fn build_operation<E: Evaluator>(
    evaluator: &E,
    definitions: Option<&str>,
    operation: &OperationDef,
    responses: ResponseTable,
) -> Result<Value, GeneratorError> {
    let mut parameters = vec![];
    let mut body_properties = Map::new();
    let mut body_required = vec![];

    for selector in &operation.selectors {
        let binding = selector.source.binding();
        if matches!(binding, SourceBinding::Excluded) {
            continue;
        }
        if let SourceBinding::Unknown(_) = binding {
            return Err(unknown_source(selector, &operation.name));
        }

        let mut schema = evaluator
            .evaluate(prepare_expression(&selector.expression), definitions)
            .await?;
        if selector.nullable {
            schema = json!({ "anyOf": [schema, { "type": "null" }] });
        }

        match binding {
            SourceBinding::Location(location) => parameters.push(json!({
                "in": location.to_string(),
                "name": selector.name,
                "required": selector.required,
                "schema": schema,
            })),
            SourceBinding::Body => {
                if selector.required {
                    body_required.push(Value::String(selector.name.clone()));
                }
                body_properties.insert(selector.name.clone(), schema);
            }
            SourceBinding::Excluded | SourceBinding::Unknown(_) => {}
        }
    }

    let mut object = Map::new();
    object.insert("operationId".into(), json!(operation.name));
    if !operation.tags.is_empty() {
        object.insert("tags".into(), json!(operation.tags));
    }
    if let Some(description) = &operation.description {
        object.insert("description".into(), json!(description));
    }
    object.insert("parameters".into(), Value::Array(parameters));

    if has_body(operation) {
        let content_type = operation
            .content_type
            .as_deref()
            .unwrap_or(JSON_CONTENT_TYPE);
        let required = !body_required.is_empty();
        let mut schema = json!({ "type": "object", "properties": body_properties });
        if required {
            schema["required"] = Value::Array(body_required);
        }
        object.insert(
            "requestBody".into(),
            json!({
                "required": required,
                "content": { content_type: { "schema": schema } },
            }),
        );
    }

    if !responses.is_empty() {
        object.insert("responses".into(), Value::Object(responses));
    }

    Ok(Value::Object(object))
}

fn has_body(operation: &OperationDef) -> bool {
    operation
        .selectors
        .iter()
        .any(|s| s.source == InputSource::Body)
}

fn response_schema(item: &ResponseItem) -> Value {
    if item.is_octet_stream() {
        json!({ "type": "string", "format": "binary" })
    } else {
        serialize(item.response_type.as_ref())
    }
}

fn header_object() -> Value {
    json!({ "schema": { "type": "string" } })
}

/// Merges one response item into the table for its operation.
fn merge_response(table: &mut ResponseTable, item: &ResponseItem) {
    let schema = response_schema(item);

    let Some(response) = table.get_mut(&item.status_code) else {
        trace!(status = %item.status_code, content_type = %item.content_type, "new response");
        let mut response = json!({
            "description": format!("Response for {}", item.status_code),
            "content": { item.content_type.as_str(): { "schema": schema } },
        });
        if !item.headers.is_empty() {
            let headers: Map<String, Value> = item
                .headers
                .iter()
                .map(|name| (name.clone(), header_object()))
                .collect();
            response["headers"] = Value::Object(headers);
        }
        table.insert(item.status_code.clone(), response);
        return;
    };

    if !item.headers.is_empty() {
        if let Some(object) = response.as_object_mut() {
            let headers = object
                .entry("headers")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(headers) = headers.as_object_mut() {
                for name in &item.headers {
                    headers.entry(name.clone()).or_insert_with(header_object);
                }
            }
        }
    }

    let Some(content) = response.get_mut("content").and_then(Value::as_object_mut) else {
        return;
    };

    let Some(entry) = content.get_mut(&item.content_type) else {
        trace!(status = %item.status_code, content_type = %item.content_type, "sibling content type");
        content.insert(item.content_type.clone(), json!({ "schema": schema }));
        return;
    };

    let existing = &mut entry["schema"];
    if let Some(variants) = existing.get_mut("oneOf").and_then(Value::as_array_mut) {
        if variants.contains(&schema) {
            trace!(status = %item.status_code, "schema already in oneOf");
        } else {
            trace!(status = %item.status_code, "appending to oneOf");
            variants.push(schema);
        }
    } else if *existing == schema {
        trace!(status = %item.status_code, "coalesced identical schema");
    } else {
        trace!(status = %item.status_code, "promoting schema to oneOf");
        let previous = existing.take();
        *existing = json!({ "oneOf": [previous, schema] });
    }
}

fn merge_fragment(paths: &mut Paths, fragment: Paths) {
    for (path, methods) in fragment {
        let target = paths.entry(path).or_default();
        for (method, operation) in methods {
            target.insert(method, operation);
        }
    }
}
