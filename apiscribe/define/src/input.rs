//! Operation inputs and their bindings.
//!
//! Every input of an operation declares a *source* that says where the value
//! travels in the HTTP request. The same classification feeds both the
//! OpenAPI parameters and the generated request builders, so it lives here
//! rather than in either generator.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Where an operation input comes from.
///
/// Unknown source strings are kept as [`InputSource::Other`] so that the
/// generator can report the offending field by name instead of failing the
/// whole parse.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use apiscribe_define::InputSource;
///
/// assert_eq!(InputSource::from_str("queries").unwrap(), InputSource::Queries);
/// assert_eq!(
///     InputSource::from_str("cookies").unwrap(),
///     InputSource::Other("cookies".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(from = "String", into = "String")]
pub enum InputSource {
    Query,
    Queries,
    Body,
    Params,
    Headers,
    /// Used by the handler only; never sent over the wire.
    Internal,
    #[strum(default)]
    Other(String),
}

/// OpenAPI parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamLocation {
    Query,
    Path,
    Header,
}

/// How an input binds to an outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBinding<'a> {
    /// Sent as a location parameter.
    Location(ParamLocation),
    /// Sent as a property of the synthesized request body.
    Body,
    /// Not sent at all.
    Excluded,
    /// Not a recognized source.
    Unknown(&'a str),
}

impl InputSource {
    /// Returns the source string as written in a specification.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Query => "query",
            Self::Queries => "queries",
            Self::Body => "body",
            Self::Params => "params",
            Self::Headers => "headers",
            Self::Internal => "internal",
            Self::Other(raw) => raw,
        }
    }

    /// Classifies this source.
    ///
    /// `query` and `queries` both land in the query string, `params` in the
    /// path and `headers` in the header list. `body` never becomes a location
    /// parameter.
    ///
    /// ```
    /// use apiscribe_define::{InputSource, ParamLocation, SourceBinding};
    ///
    /// assert_eq!(
    ///     InputSource::Queries.binding(),
    ///     SourceBinding::Location(ParamLocation::Query)
    /// );
    /// assert_eq!(InputSource::Body.binding(), SourceBinding::Body);
    /// assert_eq!(InputSource::Internal.binding(), SourceBinding::Excluded);
    /// ```
    pub fn binding(&self) -> SourceBinding<'_> {
        match self {
            Self::Query | Self::Queries => SourceBinding::Location(ParamLocation::Query),
            Self::Params => SourceBinding::Location(ParamLocation::Path),
            Self::Headers => SourceBinding::Location(ParamLocation::Header),
            Self::Body => SourceBinding::Body,
            Self::Internal => SourceBinding::Excluded,
            Self::Other(raw) => SourceBinding::Unknown(raw),
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InputSource {
    fn from(raw: String) -> Self {
        // EnumString has a default variant, so parsing cannot fail
        raw.parse().unwrap_or(Self::Other(raw))
    }
}

impl From<InputSource> for String {
    fn from(source: InputSource) -> Self {
        source.as_str().to_string()
    }
}

fn default_true() -> bool {
    true
}

/// One declared input of an operation.
///
/// `schema` holds the validation expression for the field. It is opaque to
/// this crate and only ever handed to an evaluator or copied into generated
/// source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputField {
    pub source: InputSource,
    pub schema: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
}

impl InputField {
    /// Creates a required, non-nullable input.
    pub fn new(source: InputSource, schema: impl Into<String>) -> Self {
        Self {
            source,
            schema: schema.into(),
            required: true,
            nullable: false,
        }
    }

    /// Marks the input as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Marks the input as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A single input-parameter binding as seen by the OpenAPI paths builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub name: String,
    /// Validation expression, evaluated into a JSON Schema.
    pub expression: String,
    pub source: InputSource,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default = "default_true")]
    pub required: bool,
}

impl Selector {
    /// Creates a required selector.
    pub fn new(name: impl Into<String>, expression: impl Into<String>, source: InputSource) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            source,
            nullable: false,
            required: true,
        }
    }

    /// Builds a selector from a named input field.
    pub fn from_field(name: impl Into<String>, field: &InputField) -> Self {
        Self {
            name: name.into(),
            expression: field.schema.clone(),
            source: field.source.clone(),
            nullable: field.nullable,
            required: field.required,
        }
    }

    /// Marks the selector as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}
