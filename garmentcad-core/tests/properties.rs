//! Property-based tests for pattern engine invariants using the `proptest` crate.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use garmentcad_core::documents::generate_bom;
use garmentcad_core::pieces::generate;
use garmentcad_core::pieces::solver::{cap_seam_estimate, CAP_MAX_ITERATIONS, CAP_MIN_HEIGHT_MM};
use garmentcad_core::{compute_diff, render_dxf, validate, ParameterSet, SleeveCapSolver};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_cap_height() -> impl Strategy<Value = f64> {
    -50.0f64..400.0
}

fn arb_bicep() -> impl Strategy<Value = f64> {
    200.0f64..700.0
}

fn arb_armhole_target() -> impl Strategy<Value = f64> {
    0.0f64..2000.0
}

/// The whole accepted chest range; callers filter on validity.
fn arb_chest() -> impl Strategy<Value = f64> {
    600.0f64..2000.0
}

fn chest_params(chest: f64) -> ParameterSet {
    let mut params = ParameterSet::default();
    params.body.chest_finished_circumference_mm = chest;
    params.body.hem_sweep_width_mm = chest;
    params
}

fn yardage(params: &ParameterSet) -> f64 {
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let bom = generate_bom(&generate(params, 1).ir, at);
    bom.fabric_body_yardage_estimate.parse().unwrap()
}

// ---------------------------------------------------------------------------
// 1. Solver terminates within the iteration cap and respects the height floor
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn solver_terminates_above_floor(
        initial in arb_cap_height(),
        bicep in arb_bicep(),
        target in arb_armhole_target(),
    ) {
        let sol = SleeveCapSolver::default().solve(initial, bicep, target);
        prop_assert!(sol.iterations <= CAP_MAX_ITERATIONS);
        prop_assert!(sol.cap_height_mm >= CAP_MIN_HEIGHT_MM);
        prop_assert_eq!(sol.adjusted, sol.iterations > 0);
    }
}

// ---------------------------------------------------------------------------
// 2. A converged solve leaves the cap seam within tolerance of the target
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn converged_solution_matches_target(
        initial in 60.0f64..250.0,
        bicep in arb_bicep(),
        target in 500.0f64..900.0,
    ) {
        let sol = SleeveCapSolver::default().solve(initial, bicep, target);
        if sol.converged && sol.cap_height_mm > CAP_MIN_HEIGHT_MM {
            let err = (target - cap_seam_estimate(sol.cap_height_mm, bicep)).abs();
            prop_assert!(err <= 5.0 + 1e-9, "residual {} mm", err);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Body yardage never decreases as the chest grows
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bom_yardage_monotone_in_chest(
        chest in arb_chest(),
        step in 100.0f64..400.0,
    ) {
        let (lo, hi) = (chest_params(chest), chest_params(chest + step));
        prop_assume!(validate(&lo).valid && validate(&hi).valid);

        let small = yardage(&lo);
        let large = yardage(&hi);
        prop_assert!(large >= small, "{} -> {} yards for chest {} -> {}", small, large, chest, chest + step);
    }
}

// ---------------------------------------------------------------------------
// 4. Every valid parameter set yields 4 pieces, 5 with a pocket
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn valid_sets_generate_expected_pieces(
        chest in 900.0f64..1400.0,
        body_len in 600.0f64..900.0,
        sleeve_len in 150.0f64..600.0,
        with_pocket in any::<bool>(),
    ) {
        let mut params = ParameterSet::default();
        params.body.chest_finished_circumference_mm = chest;
        params.body.hem_sweep_width_mm = chest;
        params.body.body_length_hps_to_hem_mm = body_len;
        params.sleeve.sleeve_length_mm = sleeve_len;
        if with_pocket {
            params = params.with_pocket(100.0, 120.0, 70.0, 130.0);
        }
        prop_assume!(validate(&params).valid);

        let ir = generate(&params, 1).ir;
        prop_assert_eq!(ir.pieces.len(), if with_pocket { 5 } else { 4 });
        prop_assert!(render_dxf(&ir).is_ok());
    }
}

// ---------------------------------------------------------------------------
// 5. Diff is empty exactly when the reported fields agree
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn diff_reports_single_field_change(delta in 1.0f64..200.0) {
        let old = ParameterSet::default();
        let mut new = old.clone();
        new.body.body_length_hps_to_hem_mm += delta;

        prop_assert!(compute_diff(&old, &old).unwrap().changes.is_empty());
        let diff = compute_diff(&old, &new).unwrap();
        prop_assert_eq!(diff.changes.len(), 1);
        prop_assert_eq!(diff.changes[0].key.as_str(), "body_length_hps_to_hem_mm");
    }
}
