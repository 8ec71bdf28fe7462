//! apiscribe Code Generator
//!
//! Generates an OpenAPI document and typed Rust client modules from an API
//! specification file.

use std::path::PathBuf;

use apiscribe_gen::compiler::{CompileOptions, DEFAULT_ERRORS_MODULE, compile};
use apiscribe_gen::errors::GeneratorError;
use apiscribe_gen::evaluator::{AnyEvaluator, CommandEvaluator, JsonSchemaEvaluator};
use apiscribe_gen::loader::{load_boilerplate, load_spec};
use apiscribe_gen::openapi::{OutputFormat, document_from_spec};
use apiscribe_gen::output::{write_artifacts, write_document};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// apiscribe generator - transforms API specifications into OpenAPI documents and typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "apiscribe-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Specification file (.json, .yaml or .yml)
    #[arg(short, long)]
    spec: PathBuf,

    /// Output directory for generated client modules
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file for the OpenAPI document
    #[arg(long)]
    openapi: Option<PathBuf>,

    /// OpenAPI document format (defaults to the file extension)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Program evaluating validation expressions (expression on stdin,
    /// JSON Schema on stdout); expressions are read as JSON Schema when absent
    #[arg(long)]
    evaluator_cmd: Option<String>,

    /// Rust path the generated registry imports error types from
    #[arg(long, default_value = DEFAULT_ERRORS_MODULE)]
    errors_module: String,

    /// Directory of pass-through files copied into the generated output
    #[arg(long)]
    boilerplate: Option<PathBuf>,

    /// Print generated output without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initializes the tracing subscriber.
///
/// Verbosity levels:
/// - 0 (default): WARN only
/// - 1 (-v): INFO (files written, documents built)
/// - 2 (-vv): DEBUG (per-operation progress)
/// - 3 (-vvv): TRACE (response merge decisions)
///
/// `RUST_LOG` overrides the level derived from `-v`.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,apiscribe_gen=info".to_string(),
            2 => "info,apiscribe_gen=debug".to_string(),
            _ => "debug,apiscribe_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.output.is_none() && cli.openapi.is_none() {
        return Err(GeneratorError::ConfigError(
            "nothing to generate: pass --output and/or --openapi".to_string(),
        ));
    }

    let spec = load_spec(&cli.spec)?;
    info!(
        title = %spec.title,
        groups = spec.groups.len(),
        operations = spec.operations().count(),
        "loaded specification"
    );

    // Everything is built before anything is written
    let document = match &cli.openapi {
        Some(_) => {
            let evaluator = match &cli.evaluator_cmd {
                Some(line) => AnyEvaluator::Command(CommandEvaluator::from_command_line(line)?),
                None => AnyEvaluator::JsonSchema(JsonSchemaEvaluator),
            };
            Some(document_from_spec(&spec, evaluator).await?)
        }
        None => None,
    };

    let artifacts = match &cli.output {
        Some(_) => {
            let mut options = CompileOptions::default().with_errors_module(&cli.errors_module);
            if let Some(dir) = &cli.boilerplate {
                options.boilerplate = load_boilerplate(dir)?;
            }
            Some(compile(&spec.groups, &options)?)
        }
        None => None,
    };

    if let (Some(document), Some(path)) = (&document, &cli.openapi) {
        let format = cli.format.unwrap_or_else(|| OutputFormat::from_path(path));
        write_document(document, path, format, cli.dry_run)?;
    }

    if let (Some(artifacts), Some(dir)) = (&artifacts, &cli.output) {
        write_artifacts(artifacts, dir, cli.dry_run)?;
    }

    Ok(())
}
