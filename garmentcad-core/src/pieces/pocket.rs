//! Patch pocket, square or with chamfered corners.

use crate::geometry::{BoundingBox, Point};
use crate::ir::{ConstructionEdge, Grainline, PatternPiece, PieceKind, PieceLabels};
use crate::params::ParameterSet;

use super::bodice::pocket_outline;

/// `None` unless the pocket is enabled with its dimensions present.
pub fn build(params: &ParameterSet, version: u32) -> Option<PatternPiece> {
    let dims = params.pocket.dims()?;
    let sa = params.allowances.seam_allowance_mm;
    let (w, h) = (dims.width, dims.height);

    let outline = pocket_outline(0.0, 0.0, w, h, dims.corner_radius);
    let cut_contour = vec![
        Point::mm(-sa, -sa),
        Point::mm(w + sa, -sa),
        Point::mm(w + sa, h + sa),
        Point::mm(-sa, h + sa),
        Point::mm(-sa, -sa),
    ];
    let bounding_box = BoundingBox::from_points(outline.iter().chain(cut_contour.iter()));

    Some(PatternPiece {
        name: PieceKind::Pocket,
        cut_quantity: 1,
        mirror: false,
        fold: false,
        units: "mm".to_string(),
        cut_contour,
        sew_edges: vec![ConstructionEdge::sew("S6", outline)],
        notches: vec![],
        grainline: Grainline {
            start: Point::mm(w / 2.0, h * 0.2),
            end: Point::mm(w / 2.0, h * 0.8),
        },
        labels: PieceLabels {
            size_label: params.identity.size_label.clone(),
            piece_name: "POCKET".to_string(),
            cut_instruction: "CUT 1".to_string(),
            version,
        },
        bounding_box,
    })
}
