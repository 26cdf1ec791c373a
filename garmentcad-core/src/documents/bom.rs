//! Bill of materials with fabric yardage estimates.
//!
//! Areas are bounding-box areas, so estimates err on the generous side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::round_mm;
use crate::ir::{PatternIR, PieceKind};

/// One yard in millimetres.
pub const YARD_MM: f64 = 914.0;

/// Waste multiplier and roll width per fabric kind.
const BODY_FABRIC: (f64, f64) = (1.15, 1500.0);
const NECKBAND_FABRIC: (f64, f64) = (1.2, 600.0);
const POCKET_FABRIC: (f64, f64) = (1.3, 600.0);

const BODY_PIECES: [PieceKind; 3] = [PieceKind::FrontBodice, PieceKind::BackBodice, PieceKind::Sleeve];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub item: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: String,
}

impl BomLine {
    fn new(item: &str, description: impl Into<String>, quantity: f64, unit: &str, notes: impl Into<String>) -> Self {
        Self {
            item: item.to_string(),
            description: description.into(),
            quantity,
            unit: unit.to_string(),
            notes: notes.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bom {
    pub template_type: String,
    pub schema_version: u32,
    pub size_label: String,
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub fabric_body_area_sqmm: f64,
    pub fabric_body_yardage_estimate: String,
    pub fabric_neckband_area_sqmm: f64,
    pub fabric_neckband_yardage_estimate: String,
    pub lines: Vec<BomLine>,
}

impl Bom {
    pub fn line(&self, item: &str) -> Option<&BomLine> {
        self.lines.iter().find(|l| l.item == item)
    }
}

/// `(area × waste) / (914 × width)`.
pub fn yards_for_area(area_sqmm: f64, waste: f64, fabric_width_mm: f64) -> f64 {
    area_sqmm * waste / (YARD_MM * fabric_width_mm)
}

fn yards(area_sqmm: f64, (waste, width): (f64, f64)) -> (f64, String) {
    let y = yards_for_area(area_sqmm, waste, width);
    (round_mm(y), format!("{:.2}", y))
}

fn piece_area(ir: &PatternIR, kind: PieceKind) -> f64 {
    ir.piece(kind).map(|p| p.bounding_box.area()).unwrap_or(0.0)
}

pub fn generate_bom(ir: &PatternIR, generated_at: DateTime<Utc>) -> Bom {
    let p = &ir.params;

    let body_area: f64 = ir
        .pieces
        .iter()
        .filter(|piece| BODY_PIECES.contains(&piece.name))
        .map(|piece| piece.fabric_area_sqmm())
        .sum();
    let neckband_area = piece_area(ir, PieceKind::Neckband);
    let pocket_area = piece_area(ir, PieceKind::Pocket);

    let (body_qty, body_estimate) = yards(body_area + pocket_area, BODY_FABRIC);
    let (neckband_qty, neckband_estimate) = yards(neckband_area, NECKBAND_FABRIC);

    let placeholder = "Placeholder — specify label dimensions";
    let mut lines = vec![
        BomLine::new(
            "FABRIC-BODY",
            format!("Knit jersey body fabric ({} stretch)", p.neckline.fabric_stretch_class),
            body_qty,
            "yards",
            format!(
                "Based on {}mm chest, {}mm length. Includes 15% waste factor.",
                p.body.chest_finished_circumference_mm, p.body.body_length_hps_to_hem_mm
            ),
        ),
        BomLine::new(
            "FABRIC-NECKBAND",
            "Knit rib or jersey neckband fabric",
            neckband_qty,
            "yards",
            format!(
                "Neckband {}mm finished width. Includes 20% waste.",
                p.neckline.neckband_finished_width_mm
            ),
        ),
        BomLine::new("TRIM-CARE-LABEL", "Care and content label", 1.0, "pcs", placeholder),
        BomLine::new("TRIM-BRAND-LABEL", "Brand label (neck)", 1.0, "pcs", placeholder),
        BomLine::new(
            "TRIM-SIZE-LABEL",
            format!("Size label ({})", p.identity.size_label),
            1.0,
            "pcs",
            "Placeholder",
        ),
        BomLine::new("TRIM-HANG-TAG", "Hang tag with cord", 1.0, "pcs", "Placeholder"),
        BomLine::new(
            "THREAD-MAIN",
            "Overlock thread (main seams)",
            1.0,
            "set (4 cones)",
            "Color match to fabric body",
        ),
        BomLine::new(
            "THREAD-COVERSTITCH",
            "Coverstitch thread (hem)",
            1.0,
            "set (3 cones)",
            "Color match to fabric body",
        ),
    ];

    if let Some(dims) = p.pocket.dims() {
        let (pocket_qty, _) = yards(pocket_area, POCKET_FABRIC);
        lines.insert(
            2,
            BomLine::new(
                "FABRIC-POCKET",
                "Pocket fabric (may be same as body or contrast)",
                pocket_qty,
                "yards",
                format!("Pocket size: {}×{}mm", dims.width, dims.height),
            ),
        );
    }

    Bom {
        template_type: ir.template_type.clone(),
        schema_version: ir.schema_version,
        size_label: p.identity.size_label.clone(),
        version: ir.version(),
        generated_at,
        fabric_body_area_sqmm: body_area.round(),
        fabric_body_yardage_estimate: body_estimate,
        fabric_neckband_area_sqmm: neckband_area.round(),
        fabric_neckband_yardage_estimate: neckband_estimate,
        lines,
    }
}
