//! Sleeve: seven-point cap curve over a tapered trapezoid.
//!
//! x runs from the left underarm (0) to the right underarm (bicep width); y runs
//! from the cap top (0) down to the hem.

use crate::geometry::{round_mm, BoundingBox, Point};
use crate::ir::{
    AllowanceType, ConstructionEdge, EdgeType, Grainline, Notch, PatternPiece, PieceKind,
    PieceLabels,
};
use crate::params::ParameterSet;

pub const CAP_SEAM: &str = "S3_CAP";
pub const UNDERARM_SEAM: &str = "S5";

/// Cap anchors, symmetric about the bicep centreline.
pub fn cap_curve(bicep: f64, cap_height: f64) -> Vec<Point> {
    vec![
        Point::mm(0.0, cap_height),
        Point::mm(bicep * 0.12, cap_height * 0.35),
        Point::mm(bicep * 0.35, cap_height * 0.08),
        Point::mm(bicep / 2.0, 0.0),
        Point::mm(bicep * 0.65, cap_height * 0.08),
        Point::mm(bicep * 0.88, cap_height * 0.35),
        Point::mm(bicep, cap_height),
    ]
}

/// Build the sleeve for an already-solved cap height.
pub fn build(params: &ParameterSet, cap_height: f64, version: u32) -> PatternPiece {
    let sa = params.allowances.seam_allowance_mm;
    let hem = params.allowances.hem_allowance_sleeve_mm;
    let sleeve_len = params.sleeve.sleeve_length_mm;
    let bicep = params.sleeve.bicep_width_mm;
    let opening = params.sleeve.sleeve_opening_width_mm;

    let cap = cap_curve(bicep, cap_height);
    let taper = round_mm((bicep - opening) / 2.0);
    let hem_y = round_mm(cap_height + sleeve_len);
    let hemline = hem_y - hem;

    let mut cut_contour = Vec::with_capacity(cap.len() + 2);
    cut_contour.push(Point::mm(-sa, cap_height + sa));
    cut_contour.extend(cap[1..cap.len() - 1].iter().map(|p| Point::mm(p.x, p.y - sa)));
    cut_contour.push(Point::mm(bicep + sa, cap_height + sa));
    cut_contour.push(Point::mm(bicep - taper + sa, hem_y + hem));
    cut_contour.push(Point::mm(taper - sa, hem_y + hem));

    let sew_edges = vec![
        ConstructionEdge::sew(CAP_SEAM, cap),
        ConstructionEdge::sew(
            UNDERARM_SEAM,
            vec![Point::mm(0.0, cap_height), Point::mm(taper, hemline)],
        ),
        ConstructionEdge::sew(
            UNDERARM_SEAM,
            vec![Point::mm(bicep, cap_height), Point::mm(bicep - taper, hemline)],
        ),
        ConstructionEdge::new(
            "HEM_SLEEVE",
            EdgeType::Hem,
            AllowanceType::HemAllowanceSleeve,
            vec![Point::mm(taper, hemline), Point::mm(0.0, hemline)],
        ),
    ];

    let notches = vec![
        Notch::new("N5", CAP_SEAM, Point::mm(bicep / 2.0, 0.0), 90.0, 10.0),
        Notch::new("N6", CAP_SEAM, Point::mm(bicep * 0.75, cap_height * 0.2), 45.0, 8.0),
        Notch::new(
            "N7",
            UNDERARM_SEAM,
            Point::mm(bicep / 2.0, cap_height + sleeve_len * 0.5),
            90.0,
            8.0,
        ),
    ];

    let bounding_box = BoundingBox::from_points(
        cut_contour
            .iter()
            .chain(sew_edges.iter().flat_map(|e| e.points.iter()))
            .chain(notches.iter().map(|n| &n.position)),
    );

    PatternPiece {
        name: PieceKind::Sleeve,
        cut_quantity: 2,
        mirror: true,
        fold: false,
        units: "mm".to_string(),
        cut_contour,
        sew_edges,
        notches,
        grainline: Grainline {
            start: Point::mm(bicep / 2.0, cap_height + sleeve_len * 0.2),
            end: Point::mm(bicep / 2.0, cap_height + sleeve_len * 0.8),
        },
        labels: PieceLabels {
            size_label: params.identity.size_label.clone(),
            piece_name: "SLEEVE".to_string(),
            cut_instruction: "CUT 2".to_string(),
            version,
        },
        bounding_box,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_curve_is_symmetric() {
        let cap = cap_curve(360.0, 120.0);
        assert_eq!(cap.len(), 7);
        for i in 0..3 {
            let (l, r) = (cap[i], cap[6 - i]);
            assert_eq!(l.y, r.y);
            assert!((l.x + r.x - 360.0).abs() < 0.02);
        }
        assert_eq!(cap[3], Point::mm(180.0, 0.0));
    }

    #[test]
    fn test_sleeve_tapers_to_opening() {
        let params = ParameterSet::default();
        let piece = build(&params, 100.0, 1);
        // bicep 360, opening 320 -> 20mm taper each side
        let hem = piece.edges_of(EdgeType::Hem).next().unwrap();
        assert_eq!(hem.points[0].x, 20.0);
        // cap 100 + length 220 - sleeve hem 20
        assert_eq!(hem.points[0].y, 300.0);
        assert_eq!(piece.cut_quantity, 2);
        assert!(piece.mirror);
        assert_eq!(piece.notches.len(), 3);
    }
}
