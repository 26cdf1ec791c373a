//! Sleeve cap solver
//!
//! Fixed-point iteration that nudges the cap height until the cap seam length
//! matches the combined front + back armhole sew length. The damping factor and
//! tolerance are empirical; existing production patterns were graded with them.

use serde::{Deserialize, Serialize};

use crate::geometry::round_mm;

/// Fraction of the length error applied per iteration.
pub const CAP_DAMPING: f64 = 0.2;
/// Cap/armhole length mismatch (mm) considered matched.
pub const CAP_TOLERANCE_MM: f64 = 5.0;
pub const CAP_MAX_ITERATIONS: usize = 10;
/// Final cap height never drops below this.
pub const CAP_MIN_HEIGHT_MM: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    pub damping: f64,
    pub tolerance_mm: f64,
    pub max_iterations: usize,
    pub min_cap_height_mm: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            damping: CAP_DAMPING,
            tolerance_mm: CAP_TOLERANCE_MM,
            max_iterations: CAP_MAX_ITERATIONS,
            min_cap_height_mm: CAP_MIN_HEIGHT_MM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapSolution {
    pub cap_height_mm: f64,
    /// True when at least one correction was applied.
    pub adjusted: bool,
    /// Signed total correction.
    pub adjustment_mm: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl CapSolution {
    /// User-facing warning when the cap was corrected.
    pub fn warning(&self) -> Option<String> {
        self.adjusted
            .then(|| format!("sleeve cap auto-corrected by {:+} mm", self.adjustment_mm))
    }
}

/// Cap seam length estimate: twice the diagonal from underarm to cap top.
pub fn cap_seam_estimate(cap_height: f64, bicep_width: f64) -> f64 {
    let half_bicep = bicep_width / 2.0;
    2.0 * round_mm((cap_height * cap_height + half_bicep * half_bicep).sqrt())
}

pub struct SleeveCapSolver {
    params: SolverParams,
}

impl SleeveCapSolver {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }

    pub fn solve(&self, initial_cap_height: f64, bicep_width: f64, armhole_target: f64) -> CapSolution {
        let mut cap_height = initial_cap_height;
        let mut adjustment_mm = 0.0;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.params.max_iterations {
            let estimate = cap_seam_estimate(cap_height, bicep_width);
            let delta = armhole_target - estimate;
            if delta.abs() <= self.params.tolerance_mm {
                converged = true;
                break;
            }

            let step = round_mm(delta * self.params.damping);
            cap_height = round_mm(cap_height + step);
            adjustment_mm = round_mm(adjustment_mm + step);
            iterations += 1;

            tracing::debug!(
                iteration = iterations,
                estimate,
                delta,
                cap_height,
                "sleeve cap iteration"
            );
        }

        if !converged {
            converged = (armhole_target - cap_seam_estimate(cap_height, bicep_width)).abs()
                <= self.params.tolerance_mm;
        }

        CapSolution {
            cap_height_mm: round_mm(cap_height.max(self.params.min_cap_height_mm)),
            adjusted: iterations > 0,
            adjustment_mm,
            iterations,
            converged,
        }
    }
}

impl Default for SleeveCapSolver {
    fn default() -> Self {
        Self::new(SolverParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_tolerance_is_untouched() {
        let bicep = 360.0;
        let cap = 138.0;
        let target = cap_seam_estimate(cap, bicep) + 4.0;
        let sol = SleeveCapSolver::default().solve(cap, bicep, target);
        assert!(!sol.adjusted);
        assert_eq!(sol.iterations, 0);
        assert_eq!(sol.cap_height_mm, 138.0);
        assert_eq!(sol.adjustment_mm, 0.0);
        assert!(sol.warning().is_none());
    }

    #[test]
    fn test_short_armhole_lowers_cap() {
        let sol = SleeveCapSolver::default().solve(138.0, 360.0, 384.0);
        assert!(sol.adjusted);
        assert!(sol.adjustment_mm < 0.0);
        assert!(sol.cap_height_mm < 138.0);
        assert!(sol.iterations <= CAP_MAX_ITERATIONS);
        assert!(sol.warning().unwrap().starts_with("sleeve cap auto-corrected by -"));
    }

    #[test]
    fn test_long_armhole_raises_cap() {
        let sol = SleeveCapSolver::default().solve(138.0, 360.0, 520.0);
        assert!(sol.adjustment_mm > 0.0);
        assert!(sol.warning().unwrap().contains("by +"));
    }

    #[test]
    fn test_floor_applies() {
        // unreachable target: cap would have to go negative
        let sol = SleeveCapSolver::default().solve(40.0, 360.0, 10.0);
        assert_eq!(sol.iterations, CAP_MAX_ITERATIONS);
        assert!(!sol.converged);
        assert_eq!(sol.cap_height_mm, CAP_MIN_HEIGHT_MM);
    }

    #[test]
    fn test_constants_unchanged() {
        assert_eq!(CAP_DAMPING, 0.2);
        assert_eq!(CAP_TOLERANCE_MM, 5.0);
        assert_eq!(CAP_MAX_ITERATIONS, 10);
    }
}
