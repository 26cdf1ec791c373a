//! Neckband: a rectangle folded in half lengthwise.

use std::f64::consts::PI;

use crate::derived::DerivedParameters;
use crate::geometry::{round_mm, BoundingBox, Point};
use crate::ir::{
    AllowanceType, ConstructionEdge, EdgeType, Grainline, Notch, PatternPiece, PieceKind,
    PieceLabels,
};
use crate::params::ParameterSet;

/// Neckline perimeter estimate from the front and back half-arcs.
pub fn neckline_perimeter(params: &ParameterSet) -> f64 {
    let half_neck = params.neckline.neck_width_mm / 2.0;
    let front_arc = round_mm(half_neck * PI * 0.5 + params.neckline.neck_depth_front_mm * 1.1);
    let back_arc = round_mm(half_neck * PI * 0.35 + params.neckline.neck_depth_back_mm * 0.8);
    round_mm((front_arc + back_arc) * 2.0)
}

pub fn band_length(params: &ParameterSet, derived: &DerivedParameters) -> f64 {
    round_mm(neckline_perimeter(params) * derived.neckband_length_ratio)
}

pub fn build(params: &ParameterSet, derived: &DerivedParameters, version: u32) -> PatternPiece {
    let sa = params.allowances.seam_allowance_mm;
    let length = band_length(params, derived);
    // doubled: folded in half
    let width = round_mm(params.neckline.neckband_finished_width_mm * 2.0);

    let outline = [
        Point::mm(0.0, 0.0),
        Point::mm(length, 0.0),
        Point::mm(length, width),
        Point::mm(0.0, width),
        Point::mm(0.0, 0.0),
    ];

    let cut_contour = vec![
        Point::mm(-sa, -sa),
        Point::mm(length + sa, -sa),
        Point::mm(length + sa, width + sa),
        Point::mm(-sa, width + sa),
    ];

    let sew_edges = vec![
        ConstructionEdge::sew("S4", vec![outline[0], outline[1]]),
        ConstructionEdge::sew("S4", vec![outline[2], outline[3]]),
        ConstructionEdge::new(
            "FOLD_NB",
            EdgeType::Fold,
            AllowanceType::None,
            vec![Point::mm(0.0, width / 2.0), Point::mm(length, width / 2.0)],
        ),
        ConstructionEdge::sew("NB_JOIN", vec![outline[0], outline[3]]),
        ConstructionEdge::sew("NB_JOIN", vec![outline[1], outline[2]]),
    ];

    let notches = vec![Notch::new("N8", "S4", Point::mm(length / 2.0, 0.0), 90.0, 8.0)];

    PatternPiece {
        name: PieceKind::Neckband,
        cut_quantity: 1,
        mirror: false,
        fold: true,
        units: "mm".to_string(),
        bounding_box: BoundingBox::from_points(outline.iter().chain(cut_contour.iter())),
        cut_contour,
        sew_edges,
        notches,
        grainline: Grainline {
            start: Point::mm(length * 0.2, width * 0.25),
            end: Point::mm(length * 0.8, width * 0.25),
        },
        labels: PieceLabels {
            size_label: params.identity.size_label.clone(),
            piece_name: "NECKBAND".to_string(),
            cut_instruction: "CUT 1 – FOLD AT CENTER".to_string(),
            version,
        },
    }
}
