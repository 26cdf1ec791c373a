//! Production cutting file: ASCII DXF (AC1015) in millimetres.
//!
//! Pieces are placed left to right with a fixed gap. Every entity sits on a
//! semantic layer so cutting software can toggle seams, notches and text
//! independently.

use std::fmt::Display;

use crate::geometry::{round_mm, tick_endpoints, Point};
use crate::ir::{EdgeType, PatternIR, PatternPiece};

use super::{check_pieces, RenderError};

pub const PIECE_GAP_MM: f64 = 100.0;
/// First entity handle of every document.
pub const FIRST_HANDLE: u64 = 0x65;

const ACAD_VERSION: &str = "AC1015";
/// `$INSUNITS` 4 = millimetres.
const INSUNITS_MM: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DxfLayer {
    Cut,
    Sew,
    Allowance,
    Hem,
    Notch,
    Grain,
    Fold,
    Text,
    Internal,
    Placement,
}

impl DxfLayer {
    pub fn name(&self) -> &'static str {
        match self {
            DxfLayer::Cut => "CUT",
            DxfLayer::Sew => "SEW",
            DxfLayer::Allowance => "ALLOWANCE",
            DxfLayer::Hem => "HEM",
            DxfLayer::Notch => "NOTCH",
            DxfLayer::Grain => "GRAIN",
            DxfLayer::Fold => "FOLD",
            DxfLayer::Text => "TEXT",
            DxfLayer::Internal => "INTERNAL",
            DxfLayer::Placement => "PLACEMENT",
        }
    }

    /// ACI colour index.
    pub fn color(&self) -> i32 {
        match self {
            DxfLayer::Cut => 7,
            DxfLayer::Sew => 4,
            DxfLayer::Allowance => 3,
            DxfLayer::Hem => 5,
            DxfLayer::Notch => 6,
            DxfLayer::Grain => 8,
            DxfLayer::Fold => 2,
            DxfLayer::Text => 1,
            DxfLayer::Internal => 9,
            DxfLayer::Placement => 30,
        }
    }
}

impl From<EdgeType> for DxfLayer {
    fn from(edge_type: EdgeType) -> Self {
        match edge_type {
            EdgeType::Cut => DxfLayer::Cut,
            EdgeType::Sew => DxfLayer::Sew,
            EdgeType::Hem => DxfLayer::Hem,
            EdgeType::Fold => DxfLayer::Fold,
            EdgeType::Placement => DxfLayer::Placement,
            EdgeType::Internal => DxfLayer::Internal,
        }
    }
}

/// Layer table order.
pub const SEMANTIC_LAYERS: [DxfLayer; 10] = [
    DxfLayer::Cut,
    DxfLayer::Sew,
    DxfLayer::Allowance,
    DxfLayer::Hem,
    DxfLayer::Notch,
    DxfLayer::Grain,
    DxfLayer::Fold,
    DxfLayer::Text,
    DxfLayer::Internal,
    DxfLayer::Placement,
];

/// Group-code/value line writer with a per-document handle counter.
pub struct DxfWriter {
    output: Vec<String>,
    handle_counter: u64,
}

impl DxfWriter {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            handle_counter: FIRST_HANDLE,
        }
    }

    /// Group codes carry a two-space prefix regardless of width.
    pub fn write_pair(&mut self, code: i32, value: impl Display) {
        self.output.push(format!("  {}", code));
        self.output.push(value.to_string());
    }

    /// Write group 5 with the next handle and return it.
    pub fn write_handle(&mut self) -> String {
        let handle = format!("{:X}", self.handle_counter);
        self.handle_counter += 1;
        self.write_pair(5, &handle);
        handle
    }

    pub fn write_point(&mut self, base_code: i32, point: Point) {
        self.write_pair(base_code, round_mm(point.x));
        self.write_pair(base_code + 10, round_mm(point.y));
    }

    pub fn begin_section(&mut self, name: &str) {
        self.write_pair(0, "SECTION");
        self.write_pair(2, name);
    }

    pub fn end_section(&mut self) {
        self.write_pair(0, "ENDSEC");
    }

    pub fn write_layer_table(&mut self, layers: &[DxfLayer]) {
        self.write_pair(0, "TABLE");
        self.write_pair(2, "LAYER");
        for layer in layers {
            self.write_pair(0, "LAYER");
            self.write_pair(2, layer.name());
            self.write_pair(70, 0);
            self.write_pair(62, layer.color());
            self.write_pair(6, "CONTINUOUS");
        }
        self.write_pair(0, "ENDTAB");
    }

    pub fn write_polyline(&mut self, layer: DxfLayer, points: &[Point], closed: bool) {
        self.write_pair(0, "LWPOLYLINE");
        self.write_handle();
        self.write_pair(8, layer.name());
        self.write_pair(90, points.len());
        self.write_pair(70, if closed { 1 } else { 0 });
        for p in points {
            self.write_point(10, *p);
        }
    }

    pub fn write_line(&mut self, layer: DxfLayer, start: Point, end: Point) {
        self.write_pair(0, "LINE");
        self.write_handle();
        self.write_pair(8, layer.name());
        self.write_point(10, start);
        self.write_point(11, end);
    }

    pub fn write_text(&mut self, layer: DxfLayer, at: Point, height: f64, text: &str) {
        self.write_pair(0, "TEXT");
        self.write_handle();
        self.write_pair(8, layer.name());
        self.write_point(10, at);
        self.write_pair(40, height);
        self.write_pair(1, text);
    }

    /// Append EOF and join.
    pub fn finish(mut self) -> String {
        self.write_pair(0, "EOF");
        self.output.join("\n")
    }
}

impl Default for DxfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_piece(w: &mut DxfWriter, piece: &PatternPiece, ox: f64, oy: f64) {
    let shift = |pts: &[Point]| pts.iter().map(|p| p.offset(ox, oy)).collect::<Vec<_>>();

    w.write_polyline(DxfLayer::Cut, &shift(&piece.cut_contour), true);

    for edge in piece.sew_edges.iter().filter(|e| e.points.len() >= 2) {
        w.write_polyline(edge.edge_type.into(), &shift(&edge.points), false);
    }

    for notch in &piece.notches {
        let (a, b) = tick_endpoints(notch.position.offset(ox, oy), notch.angle_deg, notch.length_mm);
        w.write_line(DxfLayer::Notch, a, b);
    }

    w.write_line(
        DxfLayer::Grain,
        piece.grainline.start.offset(ox, oy),
        piece.grainline.end.offset(ox, oy),
    );

    let labels = &piece.labels;
    let bb = piece.bounding_box;
    // one rounding, after the offset
    let center = Point::mm((bb.min_x + bb.max_x) / 2.0 + ox, (bb.min_y + bb.max_y) / 2.0 + oy);
    w.write_text(
        DxfLayer::Text,
        center,
        10.0,
        &format!("{} {} v{}", labels.piece_name, labels.size_label, labels.version),
    );
    w.write_text(
        DxfLayer::Text,
        Point::mm(center.x, center.y + 14.0),
        8.0,
        &labels.cut_instruction,
    );
}

/// Render the cutting file. Output carries no timestamp, so identical IR
/// yields byte-identical text.
pub fn render_dxf(ir: &PatternIR) -> Result<String, RenderError> {
    check_pieces(ir)?;

    let mut w = DxfWriter::new();

    w.begin_section("HEADER");
    w.write_pair(9, "$ACADVER");
    w.write_pair(1, ACAD_VERSION);
    w.write_pair(9, "$INSUNITS");
    w.write_pair(70, INSUNITS_MM);
    w.end_section();

    w.begin_section("TABLES");
    w.write_layer_table(&SEMANTIC_LAYERS);
    w.end_section();

    w.begin_section("ENTITIES");
    let mut x_offset = 0.0;
    for piece in &ir.pieces {
        let bb = piece.bounding_box;
        write_piece(&mut w, piece, x_offset - bb.min_x, -bb.min_y);
        x_offset += bb.width() + PIECE_GAP_MM;
    }
    w.end_section();

    tracing::debug!(pieces = ir.pieces.len(), "dxf rendered");
    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterSet;
    use crate::pieces::generate;

    #[test]
    fn test_writer_prefixes_group_codes_with_two_spaces() {
        let mut w = DxfWriter::new();
        w.write_pair(0, "SECTION");
        w.write_pair(10, 1.5);
        w.write_pair(100, "AcDbEntity");
        assert_eq!(w.finish(), "  0\nSECTION\n  10\n1.5\n  100\nAcDbEntity\n  0\nEOF");
    }

    #[test]
    fn test_layer_entry_bytes() {
        let mut w = DxfWriter::new();
        w.write_layer_table(&[DxfLayer::Cut]);
        assert_eq!(
            w.finish(),
            "  0\nTABLE\n  2\nLAYER\n  0\nLAYER\n  2\nCUT\n  70\n0\n  62\n7\n  6\nCONTINUOUS\n  0\nENDTAB\n  0\nEOF"
        );
    }

    #[test]
    fn test_label_centre_rounds_once() {
        // 10.005 - 0.004 is 10.001, which must not round up through 10.01
        let mut piece = generate(&ParameterSet::default(), 1).ir.pieces.remove(0);
        piece.bounding_box.min_x = 0.0;
        piece.bounding_box.max_x = 20.01;
        let mut w = DxfWriter::new();
        write_piece(&mut w, &piece, -0.004, 0.0);
        let out = w.finish();
        let text_at = out.find("\n  8\nTEXT\n  10\n").unwrap();
        let x_line = out[text_at..].lines().nth(4).unwrap();
        assert_eq!(x_line, "10");
    }

    #[test]
    fn test_handles_start_at_first_handle() {
        let mut w = DxfWriter::new();
        assert_eq!(w.write_handle(), "65");
        assert_eq!(w.write_handle(), "66");
    }

    #[test]
    fn test_layer_table_lists_every_semantic_layer() {
        let dxf = render_dxf(&generate(&ParameterSet::default(), 1).ir).unwrap();
        for layer in SEMANTIC_LAYERS {
            assert!(dxf.contains(&format!("LAYER\n  2\n{}\n  70\n0\n  62\n{}\n", layer.name(), layer.color())));
        }
        assert!(dxf.contains("$ACADVER\n  1\nAC1015"));
        assert!(dxf.contains("$INSUNITS\n  70\n4"));
        assert!(dxf.ends_with("  0\nEOF"));
    }

    #[test]
    fn test_render_is_byte_identical() {
        let ir = generate(&ParameterSet::default(), 1).ir;
        assert_eq!(render_dxf(&ir).unwrap(), render_dxf(&ir).unwrap());
    }

    #[test]
    fn test_entities_carry_labels_and_layers() {
        let params = ParameterSet::default().with_pocket(100.0, 120.0, 70.0, 130.0);
        let dxf = render_dxf(&generate(&params, 3).ir).unwrap();
        assert!(dxf.contains("FRONT BODICE M v3"));
        assert!(dxf.contains("\n  8\nPLACEMENT\n"));
        assert!(dxf.contains("\n  8\nNOTCH\n"));
        assert!(dxf.contains("\n  8\nGRAIN\n"));
        // one closed cut contour per piece
        assert_eq!(dxf.matches("  8\nCUT\n").count(), 5);
    }
}
