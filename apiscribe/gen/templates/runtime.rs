//! Runtime support shared by the generated endpoint registry and
//! dispatch tables.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except RFC 3986 unreserved characters is escaped in
/// substituted path parameters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A standard request/response endpoint.
pub trait Endpoint {
    /// Key shared with the dispatch table entry.
    const KEY: &'static str;
    /// Validation expression of the endpoint input.
    const SCHEMA: &'static str;
    /// Input object accepted by the endpoint.
    type Input;
    /// Decoded response type.
    type Output;
    /// Error union of the endpoint.
    type Error: std::error::Error;
}

/// A streaming endpoint.
pub trait StreamEndpoint {
    /// Key shared with the stream dispatch table entry.
    const KEY: &'static str;
    /// Validation expression of the endpoint input.
    const SCHEMA: &'static str;
    /// Input object accepted by the endpoint.
    type Input;
    /// Type of each streamed item.
    type Item;
}

/// Per-call request context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Base URL prepended to every path (e.g., "https://api.example.com/v1").
    pub base_url: String,
    /// Headers sent with every request, before endpoint headers.
    pub headers: Vec<(String, String)>,
}

impl RequestContext {
    /// Creates a context with no extra headers.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Vec::new(),
        }
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// How body fields are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `application/json`
    Json,
    /// `application/x-www-form-urlencoded`
    Form,
    /// `multipart/form-data`
    Multipart,
    /// Any other content type; fields are passed through unencoded.
    Raw(&'static str),
}

impl BodyEncoding {
    /// The content type sent with the body.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
            Self::Multipart => "multipart/form-data",
            Self::Raw(content_type) => *content_type,
        }
    }
}

/// Encoded request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Multipart(Vec<(String, serde_json::Value)>),
    Raw {
        content_type: &'static str,
        fields: serde_json::Map<String, serde_json::Value>,
    },
}

/// Transport-level request produced by a dispatch entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// Static description of how one endpoint builds its request.
#[derive(Debug, Clone, Copy)]
pub struct RequestPlan {
    pub method: &'static str,
    /// Path template with `{param}` placeholders.
    pub path: &'static str,
    pub headers: &'static [&'static str],
    pub query: &'static [&'static str],
    pub body: &'static [&'static str],
    pub params: &'static [&'static str],
    pub encoding: BodyEncoding,
}

/// Function building the request of one endpoint.
pub type BuildFn = fn(&serde_json::Value, &RequestContext) -> Result<HttpRequest, InputError>;

/// One row of a dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct Dispatch {
    /// Key shared with the endpoint registry.
    pub key: &'static str,
    /// Validation expression of the input.
    pub schema: &'static str,
    pub build: BuildFn,
}

fn present<'a>(
    fields: &'a serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Option<&'a serde_json::Value> {
    fields.get(name).filter(|value| !value.is_null())
}

fn scalar(field: &str, location: &'static str, value: &serde_json::Value) -> Result<String, InputError> {
    match value {
        serde_json::Value::String(text) => Ok(text.clone()),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(InputError::Unsupported {
            field: field.to_string(),
            location,
        }),
    }
}

/// Builds the transport request for `input` following `plan`.
///
/// Path parameters are percent-encoded and substituted, header and query
/// fields are rendered as strings (query arrays repeat the key) and body
/// fields are encoded with the plan's encoding. Fields outside the plan
/// are ignored; `null` counts as absent.
///
/// ## Errors
///
/// Returns `InputError` when the input is not an object, a path parameter
/// is missing, or a value cannot be sent in its location.
pub fn build_request(
    plan: &RequestPlan,
    input: &serde_json::Value,
    context: &RequestContext,
) -> Result<HttpRequest, InputError> {
    let fields = input.as_object().ok_or(InputError::NotAnObject)?;

    let mut path = plan.path.to_string();
    for &name in plan.params {
        let value = present(fields, name).ok_or(InputError::MissingPathParam(name))?;
        let segment = scalar(name, "path", value)?;
        path = path.replace(
            &format!("{{{name}}}"),
            &utf8_percent_encode(&segment, PATH_SEGMENT).to_string(),
        );
    }

    let mut headers = context.headers.clone();
    for &name in plan.headers {
        if let Some(value) = present(fields, name) {
            headers.push((name.to_string(), scalar(name, "header", value)?));
        }
    }

    let mut query = Vec::new();
    for &name in plan.query {
        match present(fields, name) {
            Some(serde_json::Value::Array(items)) => {
                for item in items {
                    query.push((name.to_string(), scalar(name, "query", item)?));
                }
            }
            Some(value) => query.push((name.to_string(), scalar(name, "query", value)?)),
            None => {}
        }
    }

    let body = if plan.body.is_empty() {
        None
    } else {
        let values: serde_json::Map<String, serde_json::Value> = plan
            .body
            .iter()
            .filter_map(|&name| present(fields, name).map(|value| (name.to_string(), value.clone())))
            .collect();
        Some(match plan.encoding {
            BodyEncoding::Json => RequestBody::Json(serde_json::Value::Object(values)),
            BodyEncoding::Form => RequestBody::Form(
                values
                    .iter()
                    .map(|(name, value)| scalar(name, "form body", value).map(|text| (name.clone(), text)))
                    .collect::<Result<_, InputError>>()?,
            ),
            BodyEncoding::Multipart => RequestBody::Multipart(values.into_iter().collect()),
            BodyEncoding::Raw(content_type) => RequestBody::Raw {
                content_type,
                fields: values,
            },
        })
    };

    Ok(HttpRequest {
        method: plan.method,
        url: format!("{}{}", context.base_url.trim_end_matches('/'), path),
        headers,
        query,
        body,
    })
}

/// Errors raised while building a request from an input object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The input was not a JSON object.
    #[error("request input must be a JSON object")]
    NotAnObject,

    /// A path parameter had no value.
    #[error("missing path parameter `{0}`")]
    MissingPathParam(&'static str),

    /// A structured value was given where only scalars are allowed.
    #[error("field `{field}` cannot be sent in the {location}")]
    Unsupported {
        field: String,
        location: &'static str,
    },
}

/// An input of type `I` failed validation.
pub struct ParseFailure<I> {
    /// Validator diagnostics.
    pub message: String,
    input: std::marker::PhantomData<fn() -> I>,
}

impl<I> ParseFailure<I> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            input: std::marker::PhantomData,
        }
    }
}

impl<I> std::fmt::Debug for ParseFailure<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseFailure")
            .field("input", &std::any::type_name::<I>())
            .field("message", &self.message)
            .finish()
    }
}

impl<I> std::fmt::Display for ParseFailure<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid input: {}", self.message)
    }
}

impl<I> std::error::Error for ParseFailure<I> {}
