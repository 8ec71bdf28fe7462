//! Error types for the apiscribe generator.

use thiserror::Error;

/// Errors that can occur while building the OpenAPI document or the client
/// artifacts.
///
/// Every variant is fatal: generation stops before any artifact is written.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to parse the specification file
    #[error("Failed to parse API specification: {0}")]
    ParseError(String),

    /// An input declares a source outside the known set.
    #[error(
        "Unknown input source '{source_name}' for field '{field}' in operation '{operation}'"
    )]
    UnknownInputSource {
        /// The input field name.
        field: String,
        /// The operation declaring the field.
        operation: String,
        /// The source string as written.
        source_name: String,
    },

    /// The evaluator could not turn a validation expression into a schema.
    #[error("Failed to evaluate expression `{expression}`: {message}")]
    Evaluation {
        /// The expression as submitted (after suffix stripping).
        expression: String,
        /// Evaluator diagnostics.
        message: String,
    },

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Two operations would produce the same generated identifier or key.
    #[error("Naming collision: {kind} '{name}' is produced by both '{first}' and '{second}'")]
    NamingCollision {
        /// What collided (e.g. "endpoint key", "type name").
        kind: &'static str,
        /// The colliding value.
        name: String,
        /// The first operation producing it.
        first: String,
        /// The second operation producing it.
        second: String,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to render the OpenAPI document.
    #[error("Failed to serialize OpenAPI document: {0}")]
    Serialize(String),
}
