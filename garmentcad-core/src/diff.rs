//! Diff Engine - parameter changes between two versions
//!
//! Compares the flat JSON form of two parameter sets over a fixed list of
//! user-facing keys. Internal and derived fields are never reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::params::ParameterSet;

pub const NO_CHANGES: &str = "No parameter changes";

/// Reported keys, in report order, with their display labels.
pub const DIFF_KEYS: [(&str, &str); 29] = [
    ("size_label", "Size Label"),
    ("fit_profile", "Fit Profile"),
    ("chest_finished_circumference_mm", "Chest Circumference (mm)"),
    ("body_length_hps_to_hem_mm", "Body Length HPS→Hem (mm)"),
    ("shoulder_width_mm", "Shoulder Width (mm)"),
    ("hem_sweep_width_mm", "Hem Sweep Width (mm)"),
    ("sleeve_type", "Sleeve Type"),
    ("sleeve_length_mm", "Sleeve Length (mm)"),
    ("bicep_width_mm", "Bicep Width (mm)"),
    ("sleeve_opening_width_mm", "Sleeve Opening Width (mm)"),
    ("drop_shoulder_mm", "Drop Shoulder (mm)"),
    ("neckline_type", "Neckline Type"),
    ("neck_width_mm", "Neck Width (mm)"),
    ("neck_depth_front_mm", "Neck Depth Front (mm)"),
    ("neck_depth_back_mm", "Neck Depth Back (mm)"),
    ("neckband_finished_width_mm", "Neckband Width (mm)"),
    ("fabric_stretch_class", "Fabric Stretch Class"),
    ("seam_allowance_mm", "Seam Allowance (mm)"),
    ("hem_allowance_body_mm", "Hem Allowance Body (mm)"),
    ("hem_allowance_sleeve_mm", "Hem Allowance Sleeve (mm)"),
    ("pocket_enabled", "Pocket Enabled"),
    ("pocket_width_mm", "Pocket Width (mm)"),
    ("pocket_height_mm", "Pocket Height (mm)"),
    ("pocket_placement_from_cf_mm", "Pocket Placement from CF (mm)"),
    ("pocket_placement_from_shoulder_mm", "Pocket Placement from Shoulder (mm)"),
    ("pocket_corner_radius_mm", "Pocket Corner Radius (mm)"),
    ("body_color_hex", "Body Color"),
    ("neckband_color_hex", "Neckband Color"),
    ("pocket_color_hex", "Pocket Color"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamChange {
    pub key: String,
    pub label: String,
    /// `None` when the field was unset.
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDiff {
    pub summary: String,
    pub changes: Vec<ParamChange>,
}

impl ParamDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Diff plus the version pair it spans. Written as `version_diff.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionDiff {
    pub from_version: u32,
    pub to_version: u32,
    pub generated_at: DateTime<Utc>,
    pub changes: Vec<ParamChange>,
    pub summary: String,
}

fn flat(params: &ParameterSet) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "parameter set flattened to {} instead of an object",
            other
        ))),
    }
}

/// Summary form of a value: bare strings, shortest numbers, `unset` for absent.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "unset".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|f| f.to_string())
            .unwrap_or_else(|| n.to_string()),
        Some(other) => other.to_string(),
    }
}

pub fn compute_diff(old: &ParameterSet, new: &ParameterSet) -> Result<ParamDiff, serde_json::Error> {
    let (old_map, new_map) = (flat(old)?, flat(new)?);

    let changes: Vec<ParamChange> = DIFF_KEYS
        .iter()
        .filter_map(|(key, label)| {
            let (a, b) = (old_map.get(*key), new_map.get(*key));
            if a == b {
                return None;
            }
            Some(ParamChange {
                key: key.to_string(),
                label: label.to_string(),
                old_value: a.cloned(),
                new_value: b.cloned(),
            })
        })
        .collect();

    let summary = if changes.is_empty() {
        NO_CHANGES.to_string()
    } else {
        changes
            .iter()
            .map(|c| {
                format!(
                    "{}: {} → {}",
                    c.label,
                    display_value(c.old_value.as_ref()),
                    display_value(c.new_value.as_ref())
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    Ok(ParamDiff { summary, changes })
}

pub fn build_version_diff(
    old: &ParameterSet,
    new: &ParameterSet,
    from_version: u32,
    to_version: u32,
    generated_at: DateTime<Utc>,
) -> Result<VersionDiff, serde_json::Error> {
    let ParamDiff { summary, changes } = compute_diff(old, new)?;
    Ok(VersionDiff {
        from_version,
        to_version,
        generated_at,
        changes,
        summary,
    })
}
