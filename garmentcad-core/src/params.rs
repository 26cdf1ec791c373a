//! Parameter Model - The T-shirt input contract
//!
//! A [`ParameterSet`] is immutable per version: the next version is created by
//! submitting a whole new set. Its JSON form is flat (one key per field), which is
//! also the shape of the parameter snapshot written into every manufacturing pack.
//!
//! [`ParameterDraft`] is the loosely-typed form a form or a hand-written JSON file
//! provides. It resolves into a [`ParameterSet`], filling advanced fields from
//! default rules and collecting every missing or unknown value at once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::round_mm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitProfile {
    Slim,
    Regular,
    Relaxed,
    Oversized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleeveType {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NecklineType {
    Crew,
    V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StretchClass {
    Low,
    Medium,
    High,
}

/// Categorical fields share this so the draft resolver and the diff engine can go
/// through one string form.
pub trait Categorical: Sized + Copy + 'static {
    const FIELD: &'static str;
    const VARIANTS: &'static [(&'static str, Self)];

    fn as_str(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| *name == raw)
            .map(|(_, v)| *v)
    }

    fn allowed() -> String {
        Self::VARIANTS
            .iter()
            .map(|(name, _)| format!("\"{}\"", name))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! categorical {
    ($ty:ident, $field:literal, [$($name:literal => $variant:ident),+ $(,)?]) => {
        impl Categorical for $ty {
            const FIELD: &'static str = $field;
            const VARIANTS: &'static [(&'static str, Self)] = &[$(($name, $ty::$variant)),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

categorical!(FitProfile, "fit_profile", [
    "slim" => Slim,
    "regular" => Regular,
    "relaxed" => Relaxed,
    "oversized" => Oversized,
]);
categorical!(SleeveType, "sleeve_type", ["short" => Short, "long" => Long]);
categorical!(NecklineType, "neckline_type", ["crew" => Crew, "v" => V]);
categorical!(StretchClass, "fabric_stretch_class", [
    "low" => Low,
    "medium" => Medium,
    "high" => High,
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub size_label: String,
    pub fit_profile: FitProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyBlock {
    pub chest_finished_circumference_mm: f64,
    pub body_length_hps_to_hem_mm: f64,
    pub shoulder_width_mm: f64,
    pub hem_sweep_width_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleeveBlock {
    pub sleeve_type: SleeveType,
    pub sleeve_length_mm: f64,
    pub bicep_width_mm: f64,
    pub sleeve_opening_width_mm: f64,
    pub drop_shoulder_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NecklineBlock {
    pub neckline_type: NecklineType,
    pub neck_width_mm: f64,
    pub neck_depth_front_mm: f64,
    pub neck_depth_back_mm: f64,
    pub neckband_finished_width_mm: f64,
    pub fabric_stretch_class: StretchClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allowances {
    pub seam_allowance_mm: f64,
    pub hem_allowance_body_mm: f64,
    pub hem_allowance_sleeve_mm: f64,
}

/// Pocket fields are only meaningful when `pocket_enabled` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PocketBlock {
    #[serde(default)]
    pub pocket_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_width_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_height_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_placement_from_cf_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_placement_from_shoulder_mm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_corner_radius_mm: Option<f64>,
}

/// Resolved pocket geometry, available only for an enabled pocket with all
/// required dimensions present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PocketDims {
    pub width: f64,
    pub height: f64,
    pub from_cf: f64,
    pub from_shoulder: f64,
    pub corner_radius: f64,
}

impl PocketBlock {
    pub fn dims(&self) -> Option<PocketDims> {
        if !self.pocket_enabled {
            return None;
        }
        Some(PocketDims {
            width: self.pocket_width_mm?,
            height: self.pocket_height_mm?,
            from_cf: self.pocket_placement_from_cf_mm?,
            from_shoulder: self.pocket_placement_from_shoulder_mm?,
            corner_radius: self.pocket_corner_radius_mm.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colorway {
    pub body_color_hex: String,
    pub neckband_color_hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_color_hex: Option<String>,
}

/// The complete, current-schema T-shirt parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub body: BodyBlock,
    #[serde(flatten)]
    pub sleeve: SleeveBlock,
    #[serde(flatten)]
    pub neckline: NecklineBlock,
    #[serde(flatten)]
    pub allowances: Allowances,
    #[serde(flatten)]
    pub pocket: PocketBlock,
    #[serde(flatten)]
    pub colorway: Colorway,
}

impl Default for ParameterSet {
    /// Reference medium, regular-fit crew-neck tee.
    fn default() -> Self {
        Self {
            identity: Identity {
                size_label: "M".to_string(),
                fit_profile: FitProfile::Regular,
            },
            body: BodyBlock {
                chest_finished_circumference_mm: 1040.0,
                body_length_hps_to_hem_mm: 700.0,
                shoulder_width_mm: 460.0,
                hem_sweep_width_mm: 1040.0,
            },
            sleeve: SleeveBlock {
                sleeve_type: SleeveType::Short,
                sleeve_length_mm: 220.0,
                bicep_width_mm: 360.0,
                sleeve_opening_width_mm: 320.0,
                drop_shoulder_mm: 0.0,
            },
            neckline: NecklineBlock {
                neckline_type: NecklineType::Crew,
                neck_width_mm: 190.0,
                neck_depth_front_mm: 80.0,
                neck_depth_back_mm: 25.0,
                neckband_finished_width_mm: 20.0,
                fabric_stretch_class: StretchClass::Medium,
            },
            allowances: Allowances {
                seam_allowance_mm: 10.0,
                hem_allowance_body_mm: 20.0,
                hem_allowance_sleeve_mm: 20.0,
            },
            pocket: PocketBlock::default(),
            colorway: Colorway {
                body_color_hex: "#F5F0E8".to_string(),
                neckband_color_hex: "#1A1A1A".to_string(),
                pocket_color_hex: None,
            },
        }
    }
}

impl ParameterSet {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy with a pocket enabled at the given placement.
    pub fn with_pocket(mut self, width: f64, height: f64, from_cf: f64, from_shoulder: f64) -> Self {
        self.pocket = PocketBlock {
            pocket_enabled: true,
            pocket_width_mm: Some(width),
            pocket_height_mm: Some(height),
            pocket_placement_from_cf_mm: Some(from_cf),
            pocket_placement_from_shoulder_mm: Some(from_shoulder),
            pocket_corner_radius_mm: self.pocket.pocket_corner_radius_mm,
        };
        self
    }
}

/// Every field optional; categorical fields kept as raw strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterDraft {
    pub size_label: Option<String>,
    pub fit_profile: Option<String>,
    pub chest_finished_circumference_mm: Option<f64>,
    pub body_length_hps_to_hem_mm: Option<f64>,
    pub shoulder_width_mm: Option<f64>,
    pub hem_sweep_width_mm: Option<f64>,
    pub sleeve_type: Option<String>,
    pub sleeve_length_mm: Option<f64>,
    pub bicep_width_mm: Option<f64>,
    pub sleeve_opening_width_mm: Option<f64>,
    pub drop_shoulder_mm: Option<f64>,
    pub neckline_type: Option<String>,
    pub neck_width_mm: Option<f64>,
    pub neck_depth_front_mm: Option<f64>,
    pub neck_depth_back_mm: Option<f64>,
    pub neckband_finished_width_mm: Option<f64>,
    pub fabric_stretch_class: Option<String>,
    pub seam_allowance_mm: Option<f64>,
    pub hem_allowance_body_mm: Option<f64>,
    pub hem_allowance_sleeve_mm: Option<f64>,
    #[serde(default)]
    pub pocket_enabled: bool,
    pub pocket_width_mm: Option<f64>,
    pub pocket_height_mm: Option<f64>,
    pub pocket_placement_from_cf_mm: Option<f64>,
    pub pocket_placement_from_shoulder_mm: Option<f64>,
    pub pocket_corner_radius_mm: Option<f64>,
    pub body_color_hex: Option<String>,
    pub neckband_color_hex: Option<String>,
    pub pocket_color_hex: Option<String>,
}

const DEFAULT_NECKBAND_WIDTH_MM: f64 = 20.0;
const DEFAULT_SEAM_ALLOWANCE_MM: f64 = 10.0;
const DEFAULT_HEM_ALLOWANCE_MM: f64 = 20.0;

fn required<T: Clone>(value: &Option<T>, field: &str, problems: &mut Vec<String>) -> Option<T> {
    if value.is_none() {
        problems.push(format!("{} is required", field));
    }
    value.clone()
}

fn categorical<C: Categorical>(value: &Option<String>, problems: &mut Vec<String>) -> Option<C> {
    match value.as_deref() {
        None => {
            problems.push(format!("{} is required", C::FIELD));
            None
        }
        Some(raw) => {
            let parsed = C::parse(raw);
            if parsed.is_none() {
                problems.push(format!("{} must be one of {}", C::FIELD, C::allowed()));
            }
            parsed
        }
    }
}

impl ParameterDraft {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolve into a full parameter set.
    ///
    /// Advanced fields missing from the draft default from the primary
    /// measurements. Every missing required field and every unknown categorical
    /// value is reported together.
    pub fn resolve(&self) -> Result<ParameterSet, Vec<String>> {
        let mut problems = Vec::new();

        let size_label = required(&self.size_label, "size_label", &mut problems);
        let fit_profile = categorical::<FitProfile>(&self.fit_profile, &mut problems);
        let chest = required(&self.chest_finished_circumference_mm, "chest_finished_circumference_mm", &mut problems);
        let body_length = required(&self.body_length_hps_to_hem_mm, "body_length_hps_to_hem_mm", &mut problems);
        let shoulder = required(&self.shoulder_width_mm, "shoulder_width_mm", &mut problems);
        let sleeve_type = categorical::<SleeveType>(&self.sleeve_type, &mut problems);
        let sleeve_length = required(&self.sleeve_length_mm, "sleeve_length_mm", &mut problems);
        let neckline_type = categorical::<NecklineType>(&self.neckline_type, &mut problems);
        let neck_depth_front = required(&self.neck_depth_front_mm, "neck_depth_front_mm", &mut problems);
        let stretch = categorical::<StretchClass>(&self.fabric_stretch_class, &mut problems);
        let body_color = required(&self.body_color_hex, "body_color_hex", &mut problems);
        let neckband_color = required(&self.neckband_color_hex, "neckband_color_hex", &mut problems);

        let (
            Some(size_label),
            Some(fit_profile),
            Some(chest),
            Some(body_length),
            Some(shoulder),
            Some(sleeve_type),
            Some(sleeve_length),
            Some(neckline_type),
            Some(neck_depth_front),
            Some(stretch),
            Some(body_color),
            Some(neckband_color),
        ) = (
            size_label,
            fit_profile,
            chest,
            body_length,
            shoulder,
            sleeve_type,
            sleeve_length,
            neckline_type,
            neck_depth_front,
            stretch,
            body_color,
            neckband_color,
        )
        else {
            return Err(problems);
        };

        let bicep = self.bicep_width_mm.unwrap_or_else(|| round_mm(chest * 0.35));

        Ok(ParameterSet {
            identity: Identity {
                size_label,
                fit_profile,
            },
            body: BodyBlock {
                chest_finished_circumference_mm: chest,
                body_length_hps_to_hem_mm: body_length,
                shoulder_width_mm: shoulder,
                hem_sweep_width_mm: self.hem_sweep_width_mm.unwrap_or(chest),
            },
            sleeve: SleeveBlock {
                sleeve_type,
                sleeve_length_mm: sleeve_length,
                bicep_width_mm: bicep,
                sleeve_opening_width_mm: self
                    .sleeve_opening_width_mm
                    .unwrap_or_else(|| round_mm(bicep * 0.89)),
                drop_shoulder_mm: self.drop_shoulder_mm.unwrap_or(0.0),
            },
            neckline: NecklineBlock {
                neckline_type,
                neck_width_mm: self
                    .neck_width_mm
                    .unwrap_or_else(|| round_mm(shoulder * 0.41)),
                neck_depth_front_mm: neck_depth_front,
                neck_depth_back_mm: self
                    .neck_depth_back_mm
                    .unwrap_or_else(|| round_mm(neck_depth_front * 0.31)),
                neckband_finished_width_mm: self
                    .neckband_finished_width_mm
                    .unwrap_or(DEFAULT_NECKBAND_WIDTH_MM),
                fabric_stretch_class: stretch,
            },
            allowances: Allowances {
                seam_allowance_mm: self.seam_allowance_mm.unwrap_or(DEFAULT_SEAM_ALLOWANCE_MM),
                hem_allowance_body_mm: self.hem_allowance_body_mm.unwrap_or(DEFAULT_HEM_ALLOWANCE_MM),
                hem_allowance_sleeve_mm: self
                    .hem_allowance_sleeve_mm
                    .unwrap_or(DEFAULT_HEM_ALLOWANCE_MM),
            },
            pocket: PocketBlock {
                pocket_enabled: self.pocket_enabled,
                pocket_width_mm: self.pocket_width_mm,
                pocket_height_mm: self.pocket_height_mm,
                pocket_placement_from_cf_mm: self.pocket_placement_from_cf_mm,
                pocket_placement_from_shoulder_mm: self.pocket_placement_from_shoulder_mm,
                pocket_corner_radius_mm: self.pocket_corner_radius_mm,
            },
            colorway: Colorway {
                body_color_hex: body_color,
                neckband_color_hex: neckband_color,
                pocket_color_hex: self.pocket_color_hex.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_draft() -> ParameterDraft {
        ParameterDraft {
            size_label: Some("L".to_string()),
            fit_profile: Some("relaxed".to_string()),
            chest_finished_circumference_mm: Some(1100.0),
            body_length_hps_to_hem_mm: Some(740.0),
            shoulder_width_mm: Some(480.0),
            sleeve_type: Some("long".to_string()),
            sleeve_length_mm: Some(600.0),
            neckline_type: Some("v".to_string()),
            neck_depth_front_mm: Some(120.0),
            fabric_stretch_class: Some("low".to_string()),
            body_color_hex: Some("#1B2A4A".to_string()),
            neckband_color_hex: Some("#1B2A4A".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_snapshot_json_is_flat() {
        let json = serde_json::to_value(ParameterSet::default()).unwrap();
        assert_eq!(json["chest_finished_circumference_mm"], 1040.0);
        assert_eq!(json["fabric_stretch_class"], "medium");
        assert_eq!(json["pocket_enabled"], false);
        assert!(json.get("pocket_width_mm").is_none());
    }

    #[test]
    fn test_parameter_set_json_roundtrip() {
        let params = ParameterSet::default().with_pocket(100.0, 120.0, 70.0, 130.0);
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(ParameterSet::from_json(&json).unwrap(), params);
    }

    #[test]
    fn test_draft_fills_advanced_defaults() {
        let params = primary_draft().resolve().unwrap();
        assert_eq!(params.body.hem_sweep_width_mm, 1100.0);
        assert_eq!(params.sleeve.bicep_width_mm, 385.0);
        assert_eq!(params.sleeve.sleeve_opening_width_mm, 342.65);
        assert_eq!(params.sleeve.drop_shoulder_mm, 0.0);
        assert_eq!(params.neckline.neck_width_mm, 196.8);
        assert_eq!(params.neckline.neck_depth_back_mm, 37.2);
        assert_eq!(params.allowances.seam_allowance_mm, 10.0);
        assert_eq!(params.allowances.hem_allowance_sleeve_mm, 20.0);
    }

    #[test]
    fn test_draft_reports_every_problem() {
        let draft = ParameterDraft {
            fit_profile: Some("baggy".to_string()),
            sleeve_type: Some("cap".to_string()),
            ..primary_draft()
        };
        let draft = ParameterDraft {
            size_label: None,
            ..draft
        };
        let problems = draft.resolve().unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().any(|p| p == "size_label is required"));
        assert!(problems.iter().any(|p| p.starts_with("fit_profile must be one of")));
        assert!(problems.iter().any(|p| p.contains("\"short\", \"long\"")));
    }

    #[test]
    fn test_categorical_parse_and_allowed() {
        assert_eq!(StretchClass::parse("high"), Some(StretchClass::High));
        assert_eq!(StretchClass::parse("HIGH"), None);
        assert_eq!(FitProfile::parse("relaxed").map(|f| f.as_str()), Some("relaxed"));
        assert_eq!(StretchClass::allowed(), r#""low", "medium", "high""#);
        assert_eq!(StretchClass::FIELD, "fabric_stretch_class");
    }

    #[test]
    fn test_pocket_dims_require_enabled_flag() {
        let mut pocket = ParameterSet::default()
            .with_pocket(100.0, 120.0, 70.0, 130.0)
            .pocket;
        assert_eq!(pocket.dims().map(|d| d.width), Some(100.0));
        pocket.pocket_enabled = false;
        assert!(pocket.dims().is_none());
    }
}
