//! Derived Parameter Calculator
//!
//! Secondary geometric constants computed from the primary parameters. Never
//! hand-edited; always recomputed.

use serde::{Deserialize, Serialize};

use crate::geometry::round_mm;
use crate::params::{Categorical, ParameterDraft, ParameterSet, StretchClass};

/// Armhole depth the armhole curve template was drawn for.
pub const REFERENCE_ARMHOLE_DEPTH_MM: f64 = 220.0;
/// Baseline cap height as a fraction of armhole depth.
pub const CAP_HEIGHT_RATIO: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameters {
    pub armhole_depth_mm: f64,
    pub armhole_curve_template_scale: f64,
    /// Solver-adjusted once the sleeve is generated.
    pub sleeve_cap_height_mm: f64,
    pub baseline_sleeve_cap_height_mm: f64,
    pub sleeve_cap_ease_mm: f64,
    pub neckband_length_ratio: f64,
    pub sleeve_cap_adjusted: bool,
    pub sleeve_cap_adjustment_mm: f64,
}

/// Whatever subset could be computed from an incomplete draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDerived {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armhole_depth_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub armhole_curve_template_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleeve_cap_height_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleeve_cap_ease_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neckband_length_ratio: Option<f64>,
}

/// Stretchier fabric takes a proportionally shorter neckband.
pub fn neckband_length_ratio(stretch: StretchClass) -> f64 {
    match stretch {
        StretchClass::Low => 0.92,
        StretchClass::Medium => 0.85,
        StretchClass::High => 0.75,
    }
}

pub fn armhole_depth(shoulder_width_mm: f64, drop_shoulder_mm: f64) -> f64 {
    round_mm(shoulder_width_mm * 0.5 + drop_shoulder_mm)
}

/// Derived values before the sleeve cap solver has run.
pub fn compute_derived(params: &ParameterSet) -> DerivedParameters {
    let armhole_depth_mm = armhole_depth(params.body.shoulder_width_mm, params.sleeve.drop_shoulder_mm);
    let cap = round_mm(armhole_depth_mm * CAP_HEIGHT_RATIO);

    DerivedParameters {
        armhole_depth_mm,
        armhole_curve_template_scale: round_mm(armhole_depth_mm / REFERENCE_ARMHOLE_DEPTH_MM),
        sleeve_cap_height_mm: cap,
        baseline_sleeve_cap_height_mm: cap,
        // knit fabric: no cap ease
        sleeve_cap_ease_mm: 0.0,
        neckband_length_ratio: neckband_length_ratio(params.neckline.fabric_stretch_class),
        sleeve_cap_adjusted: false,
        sleeve_cap_adjustment_mm: 0.0,
    }
}

/// Live-preview variant: computes what the draft allows and leaves the rest out.
///
/// Armhole-related values need the shoulder width (drop shoulder defaults to 0);
/// the neckband ratio needs a recognised stretch class.
pub fn compute_partial(draft: &ParameterDraft) -> PartialDerived {
    let mut out = PartialDerived::default();

    if let Some(shoulder) = draft.shoulder_width_mm.filter(|s| *s > 0.0) {
        let depth = armhole_depth(shoulder, draft.drop_shoulder_mm.unwrap_or(0.0));
        out.armhole_depth_mm = Some(depth);
        out.armhole_curve_template_scale = Some(round_mm(depth / REFERENCE_ARMHOLE_DEPTH_MM));
        out.sleeve_cap_height_mm = Some(round_mm(depth * CAP_HEIGHT_RATIO));
        out.sleeve_cap_ease_mm = Some(0.0);
    }

    out.neckband_length_ratio = draft
        .fabric_stretch_class
        .as_deref()
        .and_then(StretchClass::parse)
        .map(neckband_length_ratio);

    out
}
