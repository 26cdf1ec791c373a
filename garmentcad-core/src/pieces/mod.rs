//! Piece Generator
//!
//! Builds every cut piece of the T-shirt from a validated parameter set and
//! assembles the [`PatternIR`]. The bodices are built first so their armhole sew
//! edges can drive the sleeve cap solver.

pub mod bodice;
pub mod neckband;
pub mod pocket;
pub mod sleeve;
pub mod solver;

use serde::Serialize;

use crate::derived::{compute_derived, DerivedParameters};
use crate::geometry::{polyline_length, round_mm};
use crate::ir::{PatternIR, PatternPiece, SCHEMA_VERSION, TEMPLATE_TAG};
use crate::params::ParameterSet;

pub use solver::{CapSolution, SleeveCapSolver, SolverParams};

/// Armhole length assumed, per side, when an armhole edge cannot be found.
pub const ARMHOLE_FALLBACK_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPattern {
    pub ir: PatternIR,
    pub cap: CapSolution,
    pub warnings: Vec<String>,
}

/// Length of a bodice's armhole sew edge, or the depth-based fallback.
fn armhole_length(piece: &PatternPiece, seam_id: &str, derived: &DerivedParameters) -> f64 {
    match piece.edge(seam_id) {
        Some(edge) => polyline_length(&edge.points),
        None => {
            let fallback = derived.armhole_depth_mm * ARMHOLE_FALLBACK_FACTOR;
            tracing::warn!(seam_id, fallback, "armhole edge missing, using fallback length");
            fallback
        }
    }
}

/// Generate the pattern for `params` stamped with `version`.
///
/// The caller is expected to have validated `params`; the pipeline does so.
pub fn generate(params: &ParameterSet, version: u32) -> GeneratedPattern {
    generate_with_solver(params, version, &SleeveCapSolver::default())
}

pub fn generate_with_solver(
    params: &ParameterSet,
    version: u32,
    solver: &SleeveCapSolver,
) -> GeneratedPattern {
    let base = compute_derived(params);

    let front = bodice::build_front(params, &base, version);
    let back = bodice::build_back(params, &base, version);

    let armhole_target = armhole_length(&front, bodice::ARMHOLE_FRONT, &base)
        + armhole_length(&back, bodice::ARMHOLE_BACK, &base);

    let cap = solver.solve(base.sleeve_cap_height_mm, params.sleeve.bicep_width_mm, armhole_target);
    let sleeve = sleeve::build(params, cap.cap_height_mm, version);

    let derived = DerivedParameters {
        sleeve_cap_height_mm: cap.cap_height_mm,
        sleeve_cap_adjusted: cap.adjusted,
        sleeve_cap_adjustment_mm: round_mm(cap.adjustment_mm),
        ..base
    };

    let neckband = neckband::build(params, &derived, version);

    let mut pieces = vec![front, back, sleeve, neckband];
    pieces.extend(pocket::build(params, version));

    let warnings: Vec<String> = cap.warning().into_iter().collect();
    if cap.adjusted {
        tracing::warn!(
            adjustment_mm = cap.adjustment_mm,
            iterations = cap.iterations,
            "sleeve cap auto-corrected"
        );
    }

    GeneratedPattern {
        ir: PatternIR {
            template_type: TEMPLATE_TAG.to_string(),
            schema_version: SCHEMA_VERSION,
            params: params.clone(),
            derived,
            pieces,
        },
        cap,
        warnings,
    }
}
