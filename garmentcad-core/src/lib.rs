//! GarmentCAD Core - Parametric Pattern Engine
//!
//! # The Rules (Non-Negotiable)
//! 1. Parameters Are The Contract: a version is defined wholly by its parameter set
//! 2. Validation Is Protective: nothing is generated from an invalid set
//! 3. The IR Is Truth: every artifact is a pure function of the Pattern IR
//! 4. Deterministic Output: same IR, same bytes (timestamps aside)
//! 5. Versions Only Append: a new version is a new parameter set, never an edit

pub mod geometry;
pub mod params;
pub mod validation;
pub mod derived;
pub mod ir;
pub mod pieces;
pub mod render;
pub mod documents;
pub mod diff;
pub mod hashing;
pub mod package;
pub mod pipeline;

pub use params::{ParameterSet, ParameterDraft, FitProfile, SleeveType, NecklineType, StretchClass};
pub use validation::{validate, ValidationResult, ValidationRule, ValidationViolation, Validator};
pub use derived::{compute_derived, compute_partial, DerivedParameters, PartialDerived};
pub use ir::{PatternIR, PatternPiece, PieceKind, ParameterSnapshot};
pub use pieces::{generate, GeneratedPattern, SleeveCapSolver, CapSolution};
pub use render::{render_dxf, render_svg, render_tech_sketch, RenderError};
pub use documents::{generate_bom, generate_construction_notes, generate_spec_sheet};
pub use diff::{compute_diff, build_version_diff, ParamDiff, VersionDiff};
pub use hashing::{sha256_hex, canonical_json};
pub use package::{assemble_manufacturing_pack, zip_entries, ManufacturingPackArtifacts, PackageError};
pub use pipeline::{GenerationPipeline, GenerationRequest, GeneratedVersion, PreviousVersion, PipelineError};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
