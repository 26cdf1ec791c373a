//! Specification sheet: points of measure with inspection tolerances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::round_mm;
use crate::ir::PatternIR;
use crate::params::{FitProfile, StretchClass};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfMeasure {
    pub label: String,
    pub nominal_mm: f64,
    pub tolerance_plus_mm: f64,
    pub tolerance_minus_mm: f64,
}

impl PointOfMeasure {
    /// Symmetric tolerance.
    fn new(label: &str, nominal_mm: f64, tolerance_mm: f64) -> Self {
        Self {
            label: label.to_string(),
            nominal_mm: round_mm(nominal_mm),
            tolerance_plus_mm: tolerance_mm,
            tolerance_minus_mm: tolerance_mm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecSheet {
    pub template_type: String,
    pub schema_version: u32,
    pub size_label: String,
    pub fit_profile: FitProfile,
    pub units: String,
    pub generated_at: DateTime<Utc>,
    pub version: u32,
    pub points_of_measure: Vec<PointOfMeasure>,
    pub neckband_stretch_note: String,
    pub construction_reference: String,
}

pub fn stretch_note(stretch: StretchClass) -> &'static str {
    match stretch {
        StretchClass::Low => {
            "Low stretch fabric (< 20% stretch). Neckband cut at 92% of neckline perimeter."
        }
        StretchClass::Medium => {
            "Medium stretch fabric (20–50% stretch). Neckband cut at 85% of neckline perimeter."
        }
        StretchClass::High => {
            "High stretch fabric (> 50% stretch). Neckband cut at 75% of neckline perimeter."
        }
    }
}

pub fn generate_spec_sheet(ir: &PatternIR, generated_at: DateTime<Utc>) -> SpecSheet {
    let p = &ir.params;

    let mut pom = vec![
        PointOfMeasure::new("Chest Finished Circumference", p.body.chest_finished_circumference_mm, 10.0),
        PointOfMeasure::new("Body Length (HPS to Hem)", p.body.body_length_hps_to_hem_mm, 5.0),
        PointOfMeasure::new("Shoulder Width", p.body.shoulder_width_mm, 5.0),
        PointOfMeasure::new("Hem Sweep Width", p.body.hem_sweep_width_mm, 10.0),
        PointOfMeasure::new("Sleeve Length", p.sleeve.sleeve_length_mm, 5.0),
        PointOfMeasure::new("Bicep Width (1/2)", p.sleeve.bicep_width_mm / 2.0, 8.0),
        PointOfMeasure::new("Sleeve Opening Width (1/2)", p.sleeve.sleeve_opening_width_mm / 2.0, 5.0),
        PointOfMeasure::new("Neck Width", p.neckline.neck_width_mm, 3.0),
        PointOfMeasure::new("Neck Depth Front", p.neckline.neck_depth_front_mm, 3.0),
        PointOfMeasure::new("Neck Depth Back", p.neckline.neck_depth_back_mm, 2.0),
        PointOfMeasure::new("Neckband Finished Width", p.neckline.neckband_finished_width_mm, 2.0),
    ];

    if let Some(dims) = p.pocket.dims() {
        pom.push(PointOfMeasure::new("Pocket Width", dims.width, 3.0));
        pom.push(PointOfMeasure::new("Pocket Height", dims.height, 3.0));
    }

    SpecSheet {
        template_type: ir.template_type.clone(),
        schema_version: ir.schema_version,
        size_label: p.identity.size_label.clone(),
        fit_profile: p.identity.fit_profile,
        units: "mm".to_string(),
        generated_at,
        version: ir.version(),
        points_of_measure: pom,
        neckband_stretch_note: stretch_note(p.neckline.fabric_stretch_class).to_string(),
        construction_reference: "See construction_notes.json for seam and finish details."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::pieces::generate;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_default_sheet_has_eleven_points() {
        let sheet = generate_spec_sheet(&generate(&ParameterSet::default(), 1).ir, at());
        assert_eq!(sheet.points_of_measure.len(), 11);
        let chest = &sheet.points_of_measure[0];
        assert_eq!(chest.nominal_mm, 1040.0);
        assert_eq!(chest.tolerance_plus_mm, 10.0);
        assert_eq!(chest.tolerance_minus_mm, 10.0);
        let bicep = sheet.points_of_measure.iter().find(|p| p.label == "Bicep Width (1/2)").unwrap();
        assert_eq!(bicep.nominal_mm, 180.0);
        assert!(sheet.neckband_stretch_note.contains("85%"));
        assert_eq!(sheet.units, "mm");
    }

    #[test]
    fn test_pocket_points_added_when_enabled() {
        let params = ParameterSet::default().with_pocket(100.0, 120.0, 70.0, 130.0);
        let sheet = generate_spec_sheet(&generate(&params, 1).ir, at());
        let labels: Vec<_> = sheet.points_of_measure.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(&labels[11..], &["Pocket Width", "Pocket Height"]);
    }

    #[test]
    fn test_json_shape() {
        let sheet = generate_spec_sheet(&generate(&ParameterSet::default(), 3).ir, at());
        let json = serde_json::to_value(&sheet).unwrap();
        assert_eq!(json["template_type"], "tshirt");
        assert_eq!(json["schema_version"], 2);
        assert_eq!(json["fit_profile"], "regular");
        assert_eq!(json["version"], 3);
        assert_eq!(json["generated_at"], "2026-03-01T12:00:00Z");
    }
}
