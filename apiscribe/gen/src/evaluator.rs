//! Validation-expression evaluation.
//!
//! The generator never interprets validation expressions itself. Every
//! expression crosses a single boundary, the [`Evaluator`] trait, and comes
//! back as a JSON Schema document. Two implementations ship with the crate:
//!
//! - [`JsonSchemaEvaluator`] - the expression already *is* a JSON Schema literal
//! - [`CommandEvaluator`] - an external program evaluates each expression in
//!   its own process
//!
//! Results are not memoized. The same expression used by two operations is
//! evaluated twice.

use std::future::Future;
use std::process::Stdio;

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::errors::GeneratorError;

/// Qualifier stripped from the end of an expression before evaluation.
pub const OPTIONAL_SUFFIX: &str = ".optional()";

/// Key removed from every evaluated schema.
pub const SCHEMA_MARKER: &str = "$schema";

/// Turns a validation expression into its JSON Schema form.
///
/// Implementations must not keep state between calls; each evaluation is
/// independent of every other one.
pub trait Evaluator {
    /// Evaluates `expression`, optionally resolving names against the shared
    /// definitions module referenced by `definitions`.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Evaluation` when no schema can be produced.
    fn evaluate(
        &self,
        expression: &str,
        definitions: Option<&str>,
    ) -> impl Future<Output = Result<Value, GeneratorError>> + Send;
}

impl<E: Evaluator> Evaluator for &E {
    fn evaluate(
        &self,
        expression: &str,
        definitions: Option<&str>,
    ) -> impl Future<Output = Result<Value, GeneratorError>> + Send {
        (**self).evaluate(expression, definitions)
    }
}

/// Strips the trailing optional qualifier from an expression.
///
/// Optionality is carried by the selector's `required` flag, so the
/// qualifier only gets in the evaluator's way.
///
/// ## Examples
///
/// ```
/// use apiscribe_gen::evaluator::prepare_expression;
///
/// assert_eq!(prepare_expression("z.string().optional()"), "z.string()");
/// assert_eq!(prepare_expression("  z.number().optional()  "), "z.number()");
/// assert_eq!(prepare_expression("z.optional(z.string())"), "z.optional(z.string())");
/// ```
pub fn prepare_expression(expression: &str) -> &str {
    let trimmed = expression.trim();
    trimmed.strip_suffix(OPTIONAL_SUFFIX).unwrap_or(trimmed)
}

/// Removes the top-level `$schema` marker from an evaluated schema.
pub fn strip_schema_marker(mut schema: Value) -> Value {
    if let Value::Object(map) = &mut schema {
        map.shift_remove(SCHEMA_MARKER);
    }
    schema
}

/// Evaluator for specifications whose expressions are JSON Schema literals.
///
/// ## Examples
///
/// ```
/// use apiscribe_gen::evaluator::{Evaluator, JsonSchemaEvaluator};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let schema = JsonSchemaEvaluator
///     .evaluate(r#"{"$schema": "https://json-schema.org/draft/2020-12/schema", "type": "integer"}"#, None)
///     .await
///     .unwrap();
/// assert_eq!(schema, serde_json::json!({ "type": "integer" }));
/// # });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaEvaluator;

impl Evaluator for JsonSchemaEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        _definitions: Option<&str>,
    ) -> impl Future<Output = Result<Value, GeneratorError>> + Send {
        let result = serde_json::from_str::<Value>(expression)
            .map(strip_schema_marker)
            .map_err(|e| GeneratorError::Evaluation {
                expression: expression.to_string(),
                message: e.to_string(),
            });
        std::future::ready(result)
    }
}

/// Evaluates each expression by running an external program.
///
/// The program receives the expression on stdin and, when a definitions
/// reference is configured, `--definitions <ref>` as arguments. It must print
/// one JSON Schema document on stdout and exit successfully.
///
/// One process per expression keeps evaluations isolated from each other.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: String,
    args: Vec<String>,
}

impl CommandEvaluator {
    /// Creates an evaluator running `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    /// Parses a shell-like command line (`node eval.js --strict`).
    ///
    /// Splits on whitespace only; quoting is not supported.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::ConfigError` for an empty command line.
    pub fn from_command_line(line: &str) -> Result<Self, GeneratorError> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| GeneratorError::ConfigError("evaluator command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Appends a fixed argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    async fn run(&self, expression: &str, definitions: Option<&str>) -> Result<Value, GeneratorError> {
        let failure = |message: String| GeneratorError::Evaluation {
            expression: expression.to_string(),
            message,
        };

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(definitions) = definitions {
            cmd.arg("--definitions").arg(definitions);
        }
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        trace!(program = %self.program, "spawning evaluator");
        let mut child = cmd
            .spawn()
            .map_err(|e| failure(format!("failed to spawn '{}': {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| failure("evaluator stdin unavailable".to_string()))?;
        stdin
            .write_all(expression.as_bytes())
            .await
            .map_err(|e| failure(format!("failed to write expression: {e}")))?;
        // Close stdin so the evaluator sees EOF
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| failure(format!("failed to wait for evaluator: {e}")))?;

        if !output.status.success() {
            return Err(failure(format!(
                "evaluator exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let schema: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| failure(format!("evaluator printed invalid JSON: {e}")))?;
        Ok(strip_schema_marker(schema))
    }
}

impl Evaluator for CommandEvaluator {
    fn evaluate(
        &self,
        expression: &str,
        definitions: Option<&str>,
    ) -> impl Future<Output = Result<Value, GeneratorError>> + Send {
        self.run(expression, definitions)
    }
}

/// Either built-in evaluator, selected at runtime.
#[derive(Debug, Clone)]
pub enum AnyEvaluator {
    JsonSchema(JsonSchemaEvaluator),
    Command(CommandEvaluator),
}

impl Evaluator for AnyEvaluator {
    async fn evaluate(
        &self,
        expression: &str,
        definitions: Option<&str>,
    ) -> Result<Value, GeneratorError> {
        match self {
            Self::JsonSchema(inner) => inner.evaluate(expression, definitions).await,
            Self::Command(inner) => inner.evaluate(expression, definitions).await,
        }
    }
}
