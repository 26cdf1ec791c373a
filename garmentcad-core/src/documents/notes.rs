//! Construction notes: seam, stitch, hem and press instructions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ir::PatternIR;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchTypes {
    pub main_seams: String,
    pub neckband_attachment: String,
    pub hem_body: String,
    pub hem_sleeve: String,
}

impl Default for StitchTypes {
    fn default() -> Self {
        Self {
            main_seams: "4-thread overlock, SPI 12".to_string(),
            neckband_attachment: "4-thread overlock with stretch, SPI 14".to_string(),
            hem_body: "Twin-needle coverstitch, SPI 14".to_string(),
            hem_sleeve: "Twin-needle coverstitch, SPI 14".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionNotes {
    pub template_type: String,
    pub schema_version: u32,
    pub size_label: String,
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub fabric_assumption: String,
    pub seam_type: String,
    pub seam_allowance_note: String,
    pub neckband_finish: String,
    pub hem_finish_body: String,
    pub hem_finish_sleeve: String,
    pub sleeve_attachment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pocket_construction: Option<String>,
    pub stitch_types: StitchTypes,
    pub press_instructions: String,
    pub notch_reference: String,
}

const SLEEVE_ATTACHMENT: &str = "Set-in sleeve. Match sleeve cap front notch (N5) to front armhole notch (N1). \
Match sleeve cap back notch (N6) to back armhole notch (N3). Ease sleeve cap into armhole. \
Sew with 4-thread overlock pressing toward sleeve.";

const PRESS_INSTRUCTIONS: &str = "Press all seams toward back. Press neckband seam allowance toward body. \
Do not press neckband fold — neckband should stand naturally.";

const NOTCH_REFERENCE: &str = "N1=Front armhole, N2=Front side seam, N3=Back armhole, N4=Back side seam, \
N5=Sleeve cap front, N6=Sleeve cap back, N7=Sleeve underarm midpoint, N8=Neckband CF";

pub fn generate_construction_notes(ir: &PatternIR, generated_at: DateTime<Utc>) -> ConstructionNotes {
    let p = &ir.params;
    let sa = p.allowances.seam_allowance_mm;
    let ratio_pct = (ir.derived.neckband_length_ratio * 100.0).round();

    let pocket_construction = p.pocket.dims().map(|dims| {
        let mut text = format!(
            "Single welt patch pocket. Pocket size: {}×{}mm. \
             Placement: {}mm from CF, {}mm from shoulder. \
             Finish top edge: fold over {}mm, stitch with single needle. \
             Topstitch remaining three sides to front bodice with {}mm topstitch.",
            dims.width, dims.height, dims.from_cf, dims.from_shoulder, sa, sa
        );
        if dims.corner_radius > 0.0 {
            text.push_str(&format!(" Corner radius: {}mm.", dims.corner_radius));
        }
        text
    });

    ConstructionNotes {
        template_type: ir.template_type.clone(),
        schema_version: ir.schema_version,
        size_label: p.identity.size_label.clone(),
        version: ir.version(),
        generated_at,
        fabric_assumption: format!(
            "Knit jersey body ({} stretch). Knit rib or jersey neckband.",
            p.neckline.fabric_stretch_class
        ),
        seam_type: format!("4-thread overlock (serger). Seam allowance: {}mm.", sa),
        seam_allowance_note: format!(
            "All seam allowances are {}mm unless indicated on pattern piece.",
            sa
        ),
        neckband_finish: format!(
            "Fold neckband in half lengthwise (fold line marked on pattern). \
             Attach to neckline at {}% of neckline perimeter using a 4-thread overlock. \
             Stretch neckband to fit neckline. Align center front notch (N8) to center front seam.",
            ratio_pct
        ),
        hem_finish_body: format!(
            "Single fold hem. Turn up {}mm on body hem and sleeve. Stitch with twin-needle coverstitch.",
            p.allowances.hem_allowance_body_mm
        ),
        hem_finish_sleeve: format!(
            "Single fold hem. Turn up {}mm on sleeve opening. Stitch with twin-needle coverstitch.",
            p.allowances.hem_allowance_sleeve_mm
        ),
        sleeve_attachment: SLEEVE_ATTACHMENT.to_string(),
        pocket_construction,
        stitch_types: StitchTypes::default(),
        press_instructions: PRESS_INSTRUCTIONS.to_string(),
        notch_reference: NOTCH_REFERENCE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ParameterSet, StretchClass};
    use crate::pieces::generate;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_interpolates_live_values() {
        let mut params = ParameterSet::default();
        params.allowances.seam_allowance_mm = 12.0;
        params.neckline.fabric_stretch_class = StretchClass::High;
        let notes = generate_construction_notes(&generate(&params, 1).ir, at());
        assert_eq!(notes.seam_type, "4-thread overlock (serger). Seam allowance: 12mm.");
        assert!(notes.neckband_finish.contains("at 75% of neckline perimeter"));
        assert!(notes.fabric_assumption.starts_with("Knit jersey body (high stretch)"));
        assert_eq!(notes.stitch_types.main_seams, "4-thread overlock, SPI 12");
    }

    #[test]
    fn test_pocket_paragraph_only_when_enabled() {
        let notes = generate_construction_notes(&generate(&ParameterSet::default(), 1).ir, at());
        assert!(notes.pocket_construction.is_none());
        let json = serde_json::to_value(&notes).unwrap();
        assert!(json.get("pocket_construction").is_none());

        let mut params = ParameterSet::default().with_pocket(100.0, 120.0, 70.0, 130.0);
        params.pocket.pocket_corner_radius_mm = Some(8.0);
        let notes = generate_construction_notes(&generate(&params, 1).ir, at());
        let text = notes.pocket_construction.unwrap();
        assert!(text.starts_with("Single welt patch pocket. Pocket size: 100×120mm."));
        assert!(text.contains("Placement: 70mm from CF, 130mm from shoulder."));
        assert!(text.ends_with("Corner radius: 8mm."));
    }
}
