//! Generation Pipeline - Single Entry Point
//!
//! CRITICAL: generate_version MUST call validate internally. No bypass.
//!
//! One call produces one immutable version: pattern IR, every rendered artifact,
//! the documents, the diff against the previous version, and the zipped pack.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::diff::{build_version_diff, VersionDiff};
use crate::documents::{
    generate_bom, generate_construction_notes, generate_spec_sheet, Bom, ConstructionNotes,
    SpecSheet,
};
use crate::hashing::{artifact_digests, params_hash};
use crate::ir::{ParameterSnapshot, PatternIR};
use crate::package::{zip_entries, ManufacturingPackArtifacts, PackageError};
use crate::params::ParameterSet;
use crate::pieces::{generate_with_solver, SleeveCapSolver};
use crate::render::{render_dxf, render_svg, render_tech_sketch, RenderError};
use crate::validation::{ValidationResult, Validator};
use crate::ENGINE_VERSION;

#[cfg(feature = "test-hooks")]
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "test-hooks")]
static VALIDATION_CALL_COUNT: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "test-hooks")]
pub fn get_validation_call_count() -> u32 {
    VALIDATION_CALL_COUNT.load(Ordering::SeqCst)
}

#[cfg(feature = "test-hooks")]
pub fn reset_validation_call_count() {
    VALIDATION_CALL_COUNT.store(0, Ordering::SeqCst);
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid version {version}: {reason}")]
    InvalidVersion { version: u32, reason: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// The version a new one is diffed against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousVersion {
    pub version: u32,
    pub params: ParameterSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub params: ParameterSet,
    pub version: u32,
    #[serde(default)]
    pub previous: Option<PreviousVersion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedVersion {
    pub id: String,
    pub version: u32,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub params_hash: String,
    pub validation: ValidationResult,
    pub ir: PatternIR,
    pub dxf: String,
    pub svg: String,
    pub tech_sketch_svg: String,
    pub spec_sheet: SpecSheet,
    pub construction_notes: ConstructionNotes,
    pub bom: Bom,
    pub parameter_snapshot: ParameterSnapshot,
    pub diff: Option<VersionDiff>,
    /// SHA-256 of each pack member, keyed by file name.
    pub digests: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    /// Zipped manufacturing pack.
    #[serde(skip)]
    pub package: Vec<u8>,
}

impl GeneratedVersion {
    /// One-line change summary for the version record.
    pub fn diff_summary(&self) -> Option<&str> {
        self.diff.as_ref().map(|d| d.summary.as_str())
    }
}

/// The generation pipeline - single entry point for producing a version
pub struct GenerationPipeline {
    validator: Validator,
    solver: SleeveCapSolver,
}

impl GenerationPipeline {
    pub fn new() -> Self {
        Self {
            validator: Validator::new(),
            solver: SleeveCapSolver::default(),
        }
    }

    pub fn with_solver(solver: SleeveCapSolver) -> Self {
        Self {
            validator: Validator::new(),
            solver,
        }
    }

    /// Validate a parameter set
    ///
    /// This is the ONLY validation entry point.
    pub fn validate(&self, params: &ParameterSet) -> ValidationResult {
        #[cfg(feature = "test-hooks")]
        VALIDATION_CALL_COUNT.fetch_add(1, Ordering::SeqCst);

        self.validator.validate(params)
    }

    pub fn generate_version(&self, request: &GenerationRequest) -> Result<GeneratedVersion, PipelineError> {
        self.generate_version_at(request, Utc::now())
    }

    /// Generate with an explicit timestamp.
    ///
    /// CRITICAL: This ALWAYS calls validate internally. No bypass possible.
    pub fn generate_version_at(
        &self,
        request: &GenerationRequest,
        created_at: DateTime<Utc>,
    ) -> Result<GeneratedVersion, PipelineError> {
        check_version(request)?;

        // MANDATORY: Validation is always called. This is non-negotiable.
        let validation = self.validate(&request.params);
        if !validation.valid {
            let messages: Vec<_> = validation
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect();
            return Err(PipelineError::ValidationFailed(messages.join("; ")));
        }

        let generated = generate_with_solver(&request.params, request.version, &self.solver);
        let ir = generated.ir;

        let artifacts = ManufacturingPackArtifacts {
            dxf: render_dxf(&ir)?,
            svg: render_svg(&ir)?,
            tech_sketch_svg: render_tech_sketch(&ir)?,
            spec_sheet: generate_spec_sheet(&ir, created_at),
            construction_notes: generate_construction_notes(&ir, created_at),
            bom: generate_bom(&ir, created_at),
            parameter_snapshot: ParameterSnapshot::from(&ir),
            version_diff: request
                .previous
                .as_ref()
                .map(|prev| {
                    build_version_diff(&prev.params, &request.params, prev.version, request.version, created_at)
                })
                .transpose()?,
        };

        let entries = artifacts.entries()?;
        let digests = artifact_digests(entries.iter().map(|(name, bytes)| (*name, bytes.as_slice())));
        // digests and archive share one serialization
        let package = zip_entries(&entries)?;

        tracing::info!(
            version = request.version,
            pieces = ir.pieces.len(),
            cap_adjusted = ir.derived.sleeve_cap_adjusted,
            cap_adjustment_mm = ir.derived.sleeve_cap_adjustment_mm,
            pack_bytes = package.len(),
            "version generated"
        );

        let ManufacturingPackArtifacts {
            dxf,
            svg,
            tech_sketch_svg,
            spec_sheet,
            construction_notes,
            bom,
            parameter_snapshot,
            version_diff,
        } = artifacts;

        Ok(GeneratedVersion {
            id: Uuid::new_v4().to_string(),
            version: request.version,
            engine_version: ENGINE_VERSION.to_string(),
            created_at,
            params_hash: params_hash(&request.params)?,
            validation,
            ir,
            dxf,
            svg,
            tech_sketch_svg,
            spec_sheet,
            construction_notes,
            bom,
            parameter_snapshot,
            diff: version_diff,
            digests,
            warnings: generated.warnings,
            package,
        })
    }
}

impl Default for GenerationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Versions start at 1 and only move forward.
fn check_version(request: &GenerationRequest) -> Result<(), PipelineError> {
    if request.version == 0 {
        return Err(PipelineError::InvalidVersion {
            version: 0,
            reason: "versions start at 1".to_string(),
        });
    }
    if let Some(prev) = &request.previous {
        if prev.version >= request.version {
            return Err(PipelineError::InvalidVersion {
                version: request.version,
                reason: format!("must be greater than previous version {}", prev.version),
            });
        }
    }
    Ok(())
}
