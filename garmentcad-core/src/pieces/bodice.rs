//! Front and back bodice halves.
//!
//! Outlines are a short ordered run of anchors (neckline, shoulder point, armhole,
//! side seam, hem). The cut contour is the same anchor run translated outward by
//! the allowance at each anchor. That translation is an approximation of a true
//! polygon offset and downstream cutting files depend on its exact shape.

use crate::derived::DerivedParameters;
use crate::geometry::{round_mm, BoundingBox, Point};
use crate::ir::{
    AllowanceType, ConstructionEdge, EdgeType, Grainline, Notch, PatternPiece, PieceKind,
    PieceLabels,
};
use crate::params::{NecklineType, ParameterSet, PocketDims};

pub const ARMHOLE_FRONT: &str = "S3";
pub const ARMHOLE_BACK: &str = "S3_BACK";
pub const NECKLINE: &str = "S4";
pub const POCKET_MARK: &str = "POCKET_MARK";

const NOTCH_LENGTH_MM: f64 = 8.0;
/// Mid-armhole anchor sits at this fraction of the quarter chest.
pub const ARMHOLE_SHAPING_RATIO: f64 = 0.92;

struct Side {
    kind: PieceKind,
    piece_name: &'static str,
    armhole_seam: &'static str,
    hem_seam: &'static str,
    notch_ids: [&'static str; 2],
}

const FRONT: Side = Side {
    kind: PieceKind::FrontBodice,
    piece_name: "FRONT BODICE",
    armhole_seam: ARMHOLE_FRONT,
    hem_seam: "HEM_FRONT",
    notch_ids: ["N1", "N2"],
};

const BACK: Side = Side {
    kind: PieceKind::BackBodice,
    piece_name: "BACK BODICE",
    armhole_seam: ARMHOLE_BACK,
    hem_seam: "HEM_BACK",
    notch_ids: ["N3", "N4"],
};

/// Front neckline anchors, centre front to neck point.
///
/// V-neck dips straight through one midpoint; crew approximates the curve with
/// four anchors at fixed fractions of the half neck width and depth.
fn front_neckline(neckline: NecklineType, half_neck: f64, depth: f64) -> Vec<Point> {
    match neckline {
        NecklineType::V => vec![
            Point::mm(0.0, 0.0),
            Point::mm(half_neck * 0.5, depth * 0.5),
            Point::mm(half_neck, depth),
        ],
        NecklineType::Crew => vec![
            Point::mm(0.0, depth * 0.1),
            Point::mm(half_neck * 0.3, depth * 0.85),
            Point::mm(half_neck * 0.7, depth * 0.97),
            Point::mm(half_neck, depth),
        ],
    }
}

/// Back neckline is always a shallow crew.
fn back_neckline(half_neck: f64, depth: f64) -> Vec<Point> {
    vec![
        Point::mm(0.0, depth * 0.1),
        Point::mm(half_neck * 0.4, depth * 0.9),
        Point::mm(half_neck * 0.8, depth * 0.98),
        Point::mm(half_neck, depth),
    ]
}

/// Placement outline for the patch pocket, closed. Rounded corners are chamfered
/// by the corner radius.
pub fn pocket_outline(x0: f64, y0: f64, width: f64, height: f64, radius: f64) -> Vec<Point> {
    let x0 = round_mm(x0);
    let y0 = round_mm(y0);
    let x1 = round_mm(x0 + width);
    let y1 = round_mm(y0 + height);

    if radius > 0.0 {
        vec![
            Point::mm(x0 + radius, y0),
            Point::mm(x1 - radius, y0),
            Point::mm(x1, y0 + radius),
            Point::mm(x1, y1 - radius),
            Point::mm(x1 - radius, y1),
            Point::mm(x0 + radius, y1),
            Point::mm(x0, y1 - radius),
            Point::mm(x0, y0 + radius),
            Point::mm(x0 + radius, y0),
        ]
    } else {
        vec![
            Point::mm(x0, y0),
            Point::mm(x1, y0),
            Point::mm(x1, y1),
            Point::mm(x0, y1),
            Point::mm(x0, y0),
        ]
    }
}

pub fn build_front(params: &ParameterSet, derived: &DerivedParameters, version: u32) -> PatternPiece {
    let half_neck = round_mm(params.neckline.neck_width_mm / 2.0);
    let depth = params.neckline.neck_depth_front_mm;
    let neckline = front_neckline(params.neckline.neckline_type, half_neck, depth);

    let placement = params.pocket.dims().map(|PocketDims { width, height, from_cf, from_shoulder, corner_radius }| {
        ConstructionEdge::new(
            POCKET_MARK,
            EdgeType::Placement,
            AllowanceType::None,
            pocket_outline(from_cf, from_shoulder + depth, width, height, corner_radius),
        )
    });

    build(&FRONT, params, derived, version, depth, neckline, placement)
}

pub fn build_back(params: &ParameterSet, derived: &DerivedParameters, version: u32) -> PatternPiece {
    let half_neck = round_mm(params.neckline.neck_width_mm / 2.0);
    let depth = params.neckline.neck_depth_back_mm;
    let neckline = back_neckline(half_neck, depth);

    build(&BACK, params, derived, version, depth, neckline, None)
}

fn build(
    side: &Side,
    params: &ParameterSet,
    derived: &DerivedParameters,
    version: u32,
    neck_depth: f64,
    neckline: Vec<Point>,
    placement: Option<ConstructionEdge>,
) -> PatternPiece {
    let sa = params.allowances.seam_allowance_mm;
    let hem = params.allowances.hem_allowance_body_mm;
    let half_chest = round_mm(params.body.chest_finished_circumference_mm / 4.0);
    let body_len = params.body.body_length_hps_to_hem_mm;
    let half_shoulder = round_mm(params.body.shoulder_width_mm / 2.0);
    let half_neck = round_mm(params.neckline.neck_width_mm / 2.0);
    let armhole_depth = derived.armhole_depth_mm;
    let hemline = body_len - hem;

    // shoulder point -> underarm
    let armhole = vec![
        Point::mm(half_shoulder, neck_depth),
        Point::mm(half_chest * ARMHOLE_SHAPING_RATIO, armhole_depth * 0.3),
        Point::mm(half_chest, armhole_depth),
    ];

    let mut cut_contour = Vec::with_capacity(neckline.len() + 6);
    cut_contour.push(Point::mm(-sa, -sa));
    cut_contour.extend(neckline.iter().map(|p| Point::mm(p.x, p.y - sa)));
    cut_contour.push(Point::mm(half_neck + sa, neck_depth - sa));
    cut_contour.push(Point::mm(half_shoulder + sa, neck_depth - sa));
    cut_contour.extend(armhole[1..].iter().map(|p| Point::mm(p.x + sa, p.y)));
    cut_contour.push(Point::mm(half_chest + sa, body_len + hem));
    cut_contour.push(Point::mm(0.0, body_len + hem));

    let mut sew_edges = vec![
        ConstructionEdge::sew(
            "S1",
            vec![Point::mm(half_neck, neck_depth), Point::mm(half_shoulder, neck_depth)],
        ),
        ConstructionEdge::sew(
            "S2",
            vec![Point::mm(half_chest, armhole_depth), Point::mm(half_chest, hemline)],
        ),
        ConstructionEdge::sew(side.armhole_seam, armhole),
        ConstructionEdge::sew(NECKLINE, neckline),
        ConstructionEdge::new(
            side.hem_seam,
            EdgeType::Hem,
            AllowanceType::HemAllowanceBody,
            vec![Point::mm(half_chest, hemline), Point::mm(0.0, hemline)],
        ),
    ];
    sew_edges.extend(placement);

    let notches = vec![
        Notch::new(
            side.notch_ids[0],
            side.armhole_seam,
            Point::mm(half_chest * 0.96, armhole_depth * 0.5),
            0.0,
            NOTCH_LENGTH_MM,
        ),
        Notch::new(
            side.notch_ids[1],
            "S2",
            Point::mm(half_chest, armhole_depth + (hemline - armhole_depth) * 0.5),
            0.0,
            NOTCH_LENGTH_MM,
        ),
    ];

    let bounding_box = BoundingBox::from_points(
        cut_contour
            .iter()
            .chain(sew_edges.iter().flat_map(|e| e.points.iter()))
            .chain(notches.iter().map(|n| &n.position)),
    );

    PatternPiece {
        name: side.kind,
        cut_quantity: 1,
        mirror: false,
        fold: false,
        units: "mm".to_string(),
        cut_contour,
        sew_edges,
        notches,
        grainline: Grainline {
            start: Point::mm(half_chest * 0.3, body_len * 0.25),
            end: Point::mm(half_chest * 0.3, body_len * 0.75),
        },
        labels: PieceLabels {
            size_label: params.identity.size_label.clone(),
            piece_name: side.piece_name.to_string(),
            cut_instruction: "CUT 1".to_string(),
            version,
        },
        bounding_box,
    }
}
