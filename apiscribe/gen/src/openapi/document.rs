//! OpenAPI 3.1 document assembly.
//!
//! [`OpenApiDocument`] wraps a built [`Paths`] object with the `info` and
//! `servers` sections and renders it as JSON or YAML.
//! [`document_from_spec`] runs the whole pipeline for an [`ApiSpec`].

use apiscribe_define::ApiSpec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::GeneratorError;
use crate::evaluator::Evaluator;
use crate::openapi::accumulator::{OperationDef, Paths, PathsBuilder};

/// OpenAPI version written to every document.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Output format for the generated OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output format.
    #[default]
    Json,
    /// YAML output format.
    Yaml,
}

impl OutputFormat {
    /// Picks the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Metadata about the API for the OpenAPI `info` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenApiInfo {
    /// The title of the API.
    pub title: String,
    /// The version of the API (e.g., "1.0.0").
    pub version: String,
    /// A description of the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OpenApiInfo {
    /// Creates a new `OpenApiInfo` with the required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A server object for the OpenAPI `servers` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// The URL to the target host.
    pub url: String,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A complete OpenAPI document.
///
/// ## Examples
///
/// ```rust
/// use apiscribe_gen::openapi::{OpenApiDocument, OpenApiInfo, OutputFormat, Paths, Server};
///
/// let doc = OpenApiDocument::new(OpenApiInfo::new("My API", "1.0.0"), Paths::new())
///     .add_server(Server::new("https://api.example.com"));
/// let yaml = doc.render(OutputFormat::Yaml).unwrap();
/// assert!(yaml.contains("openapi: 3.1.0"));
/// ```
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    info: OpenApiInfo,
    servers: Vec<Server>,
    paths: Paths,
}

impl OpenApiDocument {
    pub fn new(info: OpenApiInfo, paths: Paths) -> Self {
        Self {
            info,
            servers: Vec::new(),
            paths,
        }
    }

    /// Adds a server to the document.
    pub fn add_server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    /// Adds multiple servers to the document.
    pub fn add_servers(mut self, servers: impl IntoIterator<Item = Server>) -> Self {
        self.servers.extend(servers);
        self
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Renders the document as a string.
    ///
    /// ## Errors
    ///
    /// Returns `GeneratorError::Serialize` if serialization fails.
    pub fn render(&self, format: OutputFormat) -> Result<String, GeneratorError> {
        let document = self.to_value();

        match format {
            OutputFormat::Json => serde_json::to_string_pretty(&document)
                .map_err(|e| GeneratorError::Serialize(e.to_string())),
            OutputFormat::Yaml => serde_yaml::to_string(&document)
                .map_err(|e| GeneratorError::Serialize(e.to_string())),
        }
    }

    /// Builds the document as a JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        let mut document = serde_json::json!({
            "openapi": OPENAPI_VERSION,
            "info": self.info,
        });

        if !self.servers.is_empty() {
            document["servers"] = serde_json::json!(self.servers);
        }

        document["paths"] = serde_json::json!(self.paths);
        document
    }
}

/// Builds the OpenAPI document for a whole specification.
///
/// Every operation is tagged with its group name and reports the group name
/// as its source file.
///
/// ## Errors
///
/// Fails on the first unknown input source or evaluation error; no partial
/// document is returned.
pub async fn document_from_spec<E: Evaluator>(
    spec: &ApiSpec,
    evaluator: E,
) -> Result<OpenApiDocument, GeneratorError> {
    let mut builder = PathsBuilder::new(evaluator);
    if let Some(definitions) = &spec.definitions {
        builder = builder.with_definitions(definitions.clone());
    }

    for (group, operation) in spec.operations() {
        let mut def = OperationDef::from_spec(operation, group)?;
        if !def.tags.iter().any(|tag| tag == group) {
            def.tags.insert(0, group.to_string());
        }
        builder.add_operation(def);
    }

    let paths = builder.build_paths().await?;
    info!(paths = paths.len(), title = %spec.title, "built OpenAPI document");

    let mut info = OpenApiInfo::new(&spec.title, &spec.version);
    if let Some(description) = &spec.description {
        info = info.with_description(description);
    }

    Ok(OpenApiDocument::new(info, paths)
        .add_servers(spec.servers.iter().map(Server::new)))
}
