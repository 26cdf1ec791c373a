//! GarmentCAD CLI - Bridge interface for the web app
//!
//! Commands: validate, derive, generate, diff
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use base64::Engine as _;
use garmentcad_core::{
    compute_diff, compute_partial, GenerationPipeline, GenerationRequest, ParameterDraft,
    ParameterSet, PreviousVersion, ValidationResult, Validator,
};

#[derive(Parser)]
#[command(name = "garmentcad-cli")]
#[command(about = "GarmentCAD CLI - Parametric T-shirt pattern engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parameter document
    Validate {
        /// Parameter JSON file
        #[arg(short, long)]
        params: PathBuf,
    },

    /// Compute derived values, as far as the document allows
    Derive {
        /// Parameter JSON file (may be incomplete)
        #[arg(short, long)]
        params: PathBuf,
    },

    /// Generate a version and its manufacturing pack
    Generate {
        /// Parameter JSON file
        #[arg(short, long)]
        params: PathBuf,

        /// Version number to stamp
        #[arg(short, long)]
        version: u32,

        /// Parameter JSON file of the previous version
        #[arg(long, requires = "previous_version")]
        previous: Option<PathBuf>,

        /// Previous version number
        #[arg(long, requires = "previous")]
        previous_version: Option<u32>,

        /// Write the zip here instead of embedding it as base64
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Compare two parameter documents
    Diff {
        #[arg(long)]
        old: PathBuf,

        #[arg(long)]
        new: PathBuf,
    },
}

#[derive(Serialize)]
struct GenerateReport {
    success: bool,
    id: String,
    version: u32,
    created_at: String,
    params_hash: String,
    pieces: usize,
    warnings: Vec<String>,
    diff_summary: Option<String>,
    digests: std::collections::BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    package_base64: Option<String>,
}

fn emit<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => println!(r#"{{"success": false, "error": "Serialization failed: {}"}}"#, e),
    }
}

fn fail(message: String) -> ExitCode {
    emit(&serde_json::json!({ "success": false, "error": message }));
    ExitCode::FAILURE
}

fn read_draft(path: &Path) -> Result<ParameterDraft, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
    ParameterDraft::from_json(&text).map_err(|e| format!("Invalid payload in {}: {}", path.display(), e))
}

/// Resolve and validate; on failure the validation report is the error.
fn load_params(validator: &Validator, path: &Path) -> Result<ParameterSet, Result<ValidationResult, String>> {
    let draft = match read_draft(path) {
        Ok(d) => d,
        Err(e) => return Err(Err(e)),
    };
    match validator.validate_draft(&draft) {
        (result, Some(params)) if result.valid => Ok(params),
        (result, _) => Err(Ok(result)),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let validator = Validator::new();

    match cli.command {
        Commands::Validate { params } => {
            let draft = match read_draft(&params) {
                Ok(d) => d,
                Err(e) => return fail(e),
            };
            let (result, _) = validator.validate_draft(&draft);
            emit(&result);
            if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Derive { params } => match read_draft(&params) {
            Ok(draft) => {
                emit(&compute_partial(&draft));
                ExitCode::SUCCESS
            }
            Err(e) => fail(e),
        },

        Commands::Generate { params, version, previous, previous_version, out } => {
            let current = match load_params(&validator, &params) {
                Ok(p) => p,
                Err(Ok(result)) => {
                    emit(&result);
                    return ExitCode::from(2);
                }
                Err(Err(e)) => return fail(e),
            };

            let previous = match (previous, previous_version) {
                (Some(path), Some(prev_version)) => match read_draft(&path).map(|d| d.resolve()) {
                    Ok(Ok(prev)) => Some(PreviousVersion { version: prev_version, params: prev }),
                    Ok(Err(problems)) => {
                        return fail(format!("Previous parameters incomplete: {}", problems.join("; ")))
                    }
                    Err(e) => return fail(e),
                },
                _ => None,
            };

            let request = GenerationRequest { params: current, version, previous };
            let generated = match GenerationPipeline::new().generate_version(&request) {
                Ok(g) => g,
                Err(e) => {
                    emit(&serde_json::json!({ "success": false, "error": e.to_string() }));
                    return ExitCode::from(2);
                }
            };

            let (package_path, package_base64) = match &out {
                Some(path) => {
                    if let Err(e) = std::fs::write(path, &generated.package) {
                        return fail(format!("Cannot write {}: {}", path.display(), e));
                    }
                    (Some(path.display().to_string()), None)
                }
                None => (
                    None,
                    Some(base64::engine::general_purpose::STANDARD.encode(&generated.package)),
                ),
            };

            emit(&GenerateReport {
                success: true,
                id: generated.id.clone(),
                version: generated.version,
                created_at: generated.created_at.to_rfc3339(),
                params_hash: generated.params_hash.clone(),
                pieces: generated.ir.pieces.len(),
                warnings: generated.warnings.clone(),
                diff_summary: generated.diff_summary().map(str::to_string),
                digests: generated.digests.clone(),
                package_path,
                package_base64,
            });
            ExitCode::SUCCESS
        }

        Commands::Diff { old, new } => {
            let resolve = |path: &Path| -> Result<ParameterSet, String> {
                read_draft(path)?
                    .resolve()
                    .map_err(|problems| format!("{}: {}", path.display(), problems.join("; ")))
            };
            match (resolve(&old), resolve(&new)) {
                (Ok(a), Ok(b)) => match compute_diff(&a, &b) {
                    Ok(diff) => {
                        emit(&diff);
                        ExitCode::SUCCESS
                    }
                    Err(e) => fail(format!("Cannot compare parameters: {}", e)),
                },
                (Err(e), _) | (_, Err(e)) => fail(e),
            }
        }
    }
}
