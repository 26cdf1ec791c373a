//! Validation System - Rules Collect, Never Fail Fast
//!
//! Each rule inspects the parameter set independently and returns every
//! violation it finds. The validator runs all rules so a form can show every
//! problem at once. Generation must not proceed while any violation remains.

use serde::{Deserialize, Serialize};

use crate::geometry::round_mm;
use crate::params::{ParameterDraft, ParameterSet, PocketBlock};
use crate::pieces::bodice::ARMHOLE_SHAPING_RATIO;

/// Minimum clearance between the pocket and the bodice sew lines, both axes.
pub const POCKET_CLEARANCE_MM: f64 = 20.0;
/// Neck width must stay this far inside the shoulder width.
pub const NECK_SHOULDER_MARGIN_MM: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationViolation {
    fn new(rule: &str, field: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            field: field.to_string(),
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    fn with_values(mut self, expected: impl Into<String>, actual: impl ToString) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: vec![],
            violations: vec![],
        }
    }

    pub fn from_violations(violations: Vec<ValidationViolation>) -> Self {
        if violations.is_empty() {
            return Self::success();
        }
        Self {
            valid: false,
            errors: violations.iter().map(|v| v.message.clone()).collect(),
            violations,
        }
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation>;
}

struct FieldRange {
    field: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    get: fn(&ParameterSet) -> f64,
}

const FIELD_RANGES: &[FieldRange] = &[
    FieldRange { field: "chest_finished_circumference_mm", label: "Chest circumference", min: 600.0, max: 2000.0, get: |p| p.body.chest_finished_circumference_mm },
    FieldRange { field: "body_length_hps_to_hem_mm", label: "Body length", min: 400.0, max: 1200.0, get: |p| p.body.body_length_hps_to_hem_mm },
    FieldRange { field: "shoulder_width_mm", label: "Shoulder width", min: 300.0, max: 700.0, get: |p| p.body.shoulder_width_mm },
    FieldRange { field: "hem_sweep_width_mm", label: "Hem sweep width", min: 600.0, max: 2200.0, get: |p| p.body.hem_sweep_width_mm },
    FieldRange { field: "sleeve_length_mm", label: "Sleeve length", min: 100.0, max: 900.0, get: |p| p.sleeve.sleeve_length_mm },
    FieldRange { field: "bicep_width_mm", label: "Bicep width", min: 200.0, max: 700.0, get: |p| p.sleeve.bicep_width_mm },
    FieldRange { field: "sleeve_opening_width_mm", label: "Sleeve opening width", min: 100.0, max: 700.0, get: |p| p.sleeve.sleeve_opening_width_mm },
    FieldRange { field: "drop_shoulder_mm", label: "Drop shoulder", min: 0.0, max: 80.0, get: |p| p.sleeve.drop_shoulder_mm },
    FieldRange { field: "neck_width_mm", label: "Neck width", min: 80.0, max: 600.0, get: |p| p.neckline.neck_width_mm },
    FieldRange { field: "neck_depth_front_mm", label: "Neck depth front", min: 20.0, max: 300.0, get: |p| p.neckline.neck_depth_front_mm },
    FieldRange { field: "neck_depth_back_mm", label: "Neck depth back", min: 5.0, max: 150.0, get: |p| p.neckline.neck_depth_back_mm },
    FieldRange { field: "neckband_finished_width_mm", label: "Neckband width", min: 5.0, max: 60.0, get: |p| p.neckline.neckband_finished_width_mm },
    FieldRange { field: "seam_allowance_mm", label: "Seam allowance", min: 5.0, max: 25.0, get: |p| p.allowances.seam_allowance_mm },
    FieldRange { field: "hem_allowance_body_mm", label: "Hem allowance body", min: 5.0, max: 60.0, get: |p| p.allowances.hem_allowance_body_mm },
    FieldRange { field: "hem_allowance_sleeve_mm", label: "Hem allowance sleeve", min: 5.0, max: 60.0, get: |p| p.allowances.hem_allowance_sleeve_mm },
];

fn check_range(rule: &str, field: &str, label: &str, value: f64, min: f64, max: f64) -> Option<ValidationViolation> {
    if !value.is_finite() {
        return Some(ValidationViolation::new(rule, field, format!("{} must be a number", label)));
    }
    if value < min || value > max {
        return Some(
            ValidationViolation::new(rule, field, format!("{} must be between {}mm and {}mm", label, min, max))
                .with_values(format!("{}..={}", min, max), value),
        );
    }
    None
}

// --- Concrete Rules ---

pub struct RangeRule;

impl ValidationRule for RangeRule {
    fn name(&self) -> &'static str { "range" }

    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation> {
        FIELD_RANGES
            .iter()
            .filter_map(|r| check_range(self.name(), r.field, r.label, (r.get)(params), r.min, r.max))
            .collect()
    }
}

pub struct StructuralRule;

impl ValidationRule for StructuralRule {
    fn name(&self) -> &'static str { "structural" }

    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation> {
        let mut violations = vec![];
        let neck = &params.neckline;
        let sleeve = &params.sleeve;

        let max_neck = params.body.shoulder_width_mm - NECK_SHOULDER_MARGIN_MM;
        if neck.neck_width_mm >= max_neck {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    "neck_width_mm",
                    "Neck width must be less than shoulder width minus 20mm",
                )
                .with_values(format!("< {}", max_neck), neck.neck_width_mm),
            );
        }

        if neck.neck_depth_front_mm < neck.neck_depth_back_mm {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    "neck_depth_front_mm",
                    "Neck depth front must be at least neck depth back",
                )
                .with_values(format!(">= {}", neck.neck_depth_back_mm), neck.neck_depth_front_mm),
            );
        }

        // armhole anchors must run outward from the shoulder point
        let half_shoulder = round_mm(params.body.shoulder_width_mm / 2.0);
        let shaping_x = round_mm(params.body.chest_finished_circumference_mm / 4.0) * ARMHOLE_SHAPING_RATIO;
        if shaping_x < half_shoulder {
            let min_chest = round_mm(half_shoulder / ARMHOLE_SHAPING_RATIO * 4.0);
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    "chest_finished_circumference_mm",
                    "Chest circumference is too small for the shoulder width",
                )
                .with_values(format!(">= {}", min_chest), params.body.chest_finished_circumference_mm),
            );
        }

        if sleeve.sleeve_opening_width_mm > sleeve.bicep_width_mm {
            violations.push(
                ValidationViolation::new(
                    self.name(),
                    "sleeve_opening_width_mm",
                    "Sleeve opening width must not exceed bicep width",
                )
                .with_values(format!("<= {}", sleeve.bicep_width_mm), sleeve.sleeve_opening_width_mm),
            );
        }

        violations
    }
}

pub struct IdentityRule;

impl ValidationRule for IdentityRule {
    fn name(&self) -> &'static str { "identity" }

    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation> {
        if params.identity.size_label.trim().is_empty() {
            vec![ValidationViolation::new(self.name(), "size_label", "Size label must not be empty")]
        } else {
            vec![]
        }
    }
}

/// `#RRGGBB`, either case.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

pub struct ColorwayRule;

impl ValidationRule for ColorwayRule {
    fn name(&self) -> &'static str { "colorway" }

    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation> {
        let colors = &params.colorway;
        [
            ("body_color_hex", "Body color", Some(&colors.body_color_hex)),
            ("neckband_color_hex", "Neckband color", Some(&colors.neckband_color_hex)),
            ("pocket_color_hex", "Pocket color", colors.pocket_color_hex.as_ref()),
        ]
        .into_iter()
        .filter_map(|(field, label, value)| {
            let value = value?;
            (!is_hex_color(value)).then(|| {
                ValidationViolation::new(self.name(), field, format!("{} must be a hex color like #1A1A1A", label))
                    .with_values("#RRGGBB", value)
            })
        })
        .collect()
    }
}

/// Pocket checks apply only when the pocket is enabled.
pub struct PocketRule;

impl PocketRule {
    fn require(&self, value: Option<f64>, field: &str, label: &str, out: &mut Vec<ValidationViolation>) -> Option<f64> {
        if value.is_none() {
            out.push(ValidationViolation::new(
                self.name(),
                field,
                format!("{} is required when pocket is enabled", label),
            ));
        }
        value
    }
}

impl ValidationRule for PocketRule {
    fn name(&self) -> &'static str { "pocket" }

    fn validate(&self, params: &ParameterSet) -> Vec<ValidationViolation> {
        let PocketBlock {
            pocket_enabled,
            pocket_width_mm,
            pocket_height_mm,
            pocket_placement_from_cf_mm,
            pocket_placement_from_shoulder_mm,
            pocket_corner_radius_mm,
        } = params.pocket;

        if !pocket_enabled {
            return vec![];
        }

        let mut violations = vec![];
        let name = self.name();

        let width = self.require(pocket_width_mm, "pocket_width_mm", "Pocket width", &mut violations);
        let height = self.require(pocket_height_mm, "pocket_height_mm", "Pocket height", &mut violations);
        let from_cf = self.require(pocket_placement_from_cf_mm, "pocket_placement_from_cf_mm", "Pocket placement from CF", &mut violations);
        let from_shoulder = self.require(pocket_placement_from_shoulder_mm, "pocket_placement_from_shoulder_mm", "Pocket placement from shoulder", &mut violations);

        violations.extend(width.and_then(|w| check_range(name, "pocket_width_mm", "Pocket width", w, 60.0, 180.0)));
        violations.extend(height.and_then(|h| check_range(name, "pocket_height_mm", "Pocket height", h, 60.0, 180.0)));

        for (value, field, label) in [
            (from_cf, "pocket_placement_from_cf_mm", "Pocket placement from CF"),
            (from_shoulder, "pocket_placement_from_shoulder_mm", "Pocket placement from shoulder"),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    violations.push(
                        ValidationViolation::new(name, field, format!("{} must be zero or greater", label))
                            .with_values(">= 0", v),
                    );
                }
            }
        }

        if let Some(radius) = pocket_corner_radius_mm {
            if let Some(v) = check_range(name, "pocket_corner_radius_mm", "Pocket corner radius", radius, 0.0, 30.0) {
                violations.push(v);
            } else if let (Some(w), Some(h)) = (width, height) {
                if radius > w.min(h) / 2.0 {
                    violations.push(ValidationViolation::new(
                        name,
                        "pocket_corner_radius_mm",
                        "Pocket corner radius must not exceed half the smaller pocket side",
                    ));
                }
            }
        }

        // Fit inside the half-front sew area.
        if let (Some(w), Some(h), Some(cf), Some(sh)) = (width, height, from_cf, from_shoulder) {
            let half_chest = params.body.chest_finished_circumference_mm / 4.0;
            let right_edge = cf + w;
            let max_right = half_chest - POCKET_CLEARANCE_MM;
            if right_edge > max_right {
                violations.push(
                    ValidationViolation::new(
                        name,
                        "pocket_width_mm",
                        "Pocket must fit across the front bodice with 20mm clearance",
                    )
                    .with_values(format!("<= {}", max_right), right_edge),
                );
            }

            let bottom_edge = params.neckline.neck_depth_front_mm + sh + h;
            let max_bottom = params.body.body_length_hps_to_hem_mm
                - params.allowances.hem_allowance_body_mm
                - POCKET_CLEARANCE_MM;
            if bottom_edge > max_bottom {
                violations.push(
                    ValidationViolation::new(
                        name,
                        "pocket_height_mm",
                        "Pocket must fit above the hem with 20mm clearance",
                    )
                    .with_values(format!("<= {}", max_bottom), bottom_edge),
                );
            }
        }

        violations
    }
}

/// Validator runs every rule and gathers all violations.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(IdentityRule),
                Box::new(RangeRule),
                Box::new(StructuralRule),
                Box::new(ColorwayRule),
                Box::new(PocketRule),
            ],
        }
    }

    pub fn validate(&self, params: &ParameterSet) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(params))
            .collect();
        ValidationResult::from_violations(violations)
    }

    /// Resolve and validate a draft. Problems found while resolving (missing
    /// fields, unknown categorical values) are reported as `schema` violations.
    pub fn validate_draft(&self, draft: &ParameterDraft) -> (ValidationResult, Option<ParameterSet>) {
        match draft.resolve() {
            Ok(params) => (self.validate(&params), Some(params)),
            Err(problems) => {
                let violations = problems
                    .into_iter()
                    .map(|msg| {
                        let field = msg.split_whitespace().next().unwrap_or("").to_string();
                        ValidationViolation::new("schema", &field, msg)
                    })
                    .collect();
                (ValidationResult::from_violations(violations), None)
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with the standard rule set.
pub fn validate(params: &ParameterSet) -> ValidationResult {
    Validator::new().validate(params)
}
