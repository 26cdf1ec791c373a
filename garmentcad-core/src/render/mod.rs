//! Renderers - pure functions of the Pattern IR
//!
//! Every renderer lays pieces out deterministically and produces text. A
//! malformed IR is an internal invariant violation: the renderer refuses it
//! outright instead of emitting partial output.

pub mod dxf;
pub mod sketch;
pub mod svg;

use thiserror::Error;

use crate::geometry::Point;
use crate::ir::{PatternIR, PatternPiece, PieceKind};

pub use dxf::{render_dxf, DxfLayer, DxfWriter, SEMANTIC_LAYERS};
pub use sketch::render_tech_sketch;
pub use svg::render_svg;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Pattern IR has no pieces")]
    EmptyPattern,

    #[error("Pattern IR is missing the {0} piece")]
    MissingPiece(&'static str),

    #[error("Piece {0} has a degenerate bounding box")]
    DegeneratePiece(&'static str),
}

/// Reject an IR no renderer can lay out.
pub(crate) fn check_pieces(ir: &PatternIR) -> Result<(), RenderError> {
    if ir.pieces.is_empty() {
        return Err(RenderError::EmptyPattern);
    }
    for piece in &ir.pieces {
        let bb = piece.bounding_box;
        if !(bb.width() > 0.0 && bb.height() > 0.0) {
            return Err(RenderError::DegeneratePiece(piece.name.name()));
        }
    }
    Ok(())
}

pub(crate) fn require_piece(ir: &PatternIR, kind: PieceKind) -> Result<&PatternPiece, RenderError> {
    ir.piece(kind).ok_or(RenderError::MissingPiece(kind.name()))
}

/// `x,y x,y ...` for SVG `points` attributes.
pub(crate) fn points_attr(points: &[Point], dx: f64, dy: f64) -> String {
    points
        .iter()
        .map(|p| {
            let q = p.offset(dx, dy);
            format!("{},{}", q.x, q.y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Minimal escaping for text nodes.
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::pieces::generate;

    #[test]
    fn test_empty_ir_is_rejected() {
        let mut ir = generate(&ParameterSet::default(), 1).ir;
        ir.pieces.clear();
        assert_eq!(render_svg(&ir), Err(RenderError::EmptyPattern));
        assert_eq!(render_dxf(&ir), Err(RenderError::EmptyPattern));
        assert_eq!(render_tech_sketch(&ir), Err(RenderError::EmptyPattern));
    }

    #[test]
    fn test_sketch_needs_both_bodices() {
        let mut ir = generate(&ParameterSet::default(), 1).ir;
        ir.pieces.retain(|p| p.name != PieceKind::BackBodice);
        assert_eq!(
            render_tech_sketch(&ir),
            Err(RenderError::MissingPiece("Back Bodice"))
        );
    }

    #[test]
    fn test_points_attr_offsets() {
        let pts = [Point::mm(1.0, 2.0), Point::mm(3.5, 4.0)];
        assert_eq!(points_attr(&pts, 10.0, 0.0), "11,2 13.5,4");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("S&M <M>"), "S&amp;M &lt;M&gt;");
    }
}
