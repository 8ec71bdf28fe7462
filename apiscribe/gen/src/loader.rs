//! Loading specification files and pass-through boilerplate.

use std::fs;
use std::path::Path;

use apiscribe_define::ApiSpec;
use tracing::debug;

use crate::compiler::Artifacts;
use crate::errors::GeneratorError;

/// Loads an [`ApiSpec`] from a JSON or YAML file.
///
/// `.yaml` and `.yml` files are read as YAML; everything else as JSON.
///
/// ## Errors
///
/// Returns `GeneratorError::ConfigError` when the file cannot be read and
/// `GeneratorError::ParseError` when its contents are not a valid
/// specification.
pub fn load_spec(path: &Path) -> Result<ApiSpec, GeneratorError> {
    let content = fs::read_to_string(path).map_err(|e| {
        GeneratorError::ConfigError(format!("cannot read spec file '{}': {e}", path.display()))
    })?;

    let spec = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => parse_yaml(&content)?,
        _ => parse_json(&content)?,
    };

    debug!(
        path = %path.display(),
        groups = spec.groups.len(),
        operations = spec.operations().count(),
        "loaded specification"
    );
    Ok(spec)
}

/// Parses a specification from JSON text.
///
/// ## Errors
///
/// Returns `GeneratorError::ParseError` on malformed input.
pub fn parse_json(content: &str) -> Result<ApiSpec, GeneratorError> {
    serde_json::from_str(content).map_err(|e| GeneratorError::ParseError(e.to_string()))
}

/// Parses a specification from YAML text.
///
/// ## Errors
///
/// Returns `GeneratorError::ParseError` on malformed input.
pub fn parse_yaml(content: &str) -> Result<ApiSpec, GeneratorError> {
    serde_yaml::from_str(content).map_err(|e| GeneratorError::ParseError(e.to_string()))
}

/// Reads every file below `dir` as a pass-through artifact keyed by its
/// `/`-separated path relative to `dir`, sorted by path.
///
/// ## Errors
///
/// Returns `GeneratorError::ConfigError` when a directory or file cannot be
/// read.
pub fn load_boilerplate(dir: &Path) -> Result<Artifacts, GeneratorError> {
    let mut files = Vec::new();
    collect_files(dir, dir, &mut files)?;
    files.sort();

    let mut artifacts = Artifacts::new();
    for (relative, path) in files {
        let content = fs::read_to_string(&path).map_err(|e| {
            GeneratorError::ConfigError(format!("cannot read boilerplate '{}': {e}", path.display()))
        })?;
        artifacts.insert(relative, content);
    }

    debug!(dir = %dir.display(), files = artifacts.len(), "loaded boilerplate");
    Ok(artifacts)
}

fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut Vec<(String, std::path::PathBuf)>,
) -> Result<(), GeneratorError> {
    let read_error = |e: std::io::Error| {
        GeneratorError::ConfigError(format!("cannot read directory '{}': {e}", dir.display()))
    };

    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_dir() {
            collect_files(root, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let key = relative
                .components()
                .map(|part| part.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((key, path));
        }
    }

    Ok(())
}
