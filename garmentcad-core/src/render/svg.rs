//! Vector preview: every piece on a dark canvas, laid out on a fixed grid.

use crate::geometry::{arrowhead, round_mm, tick_endpoints, Point};
use crate::ir::{EdgeType, PatternIR, PatternPiece};

use super::{check_pieces, escape_xml, points_attr, RenderError};

pub const GRID_COLUMNS: usize = 2;
pub const GRID_GAP_MM: f64 = 60.0;
pub const GRID_PADDING_MM: f64 = 40.0;
pub const LABEL_BAND_MM: f64 = 28.0;
const LEGEND_BAND_MM: f64 = 20.0;

const NOTCH_COLOR: &str = "#f97316";
const GRAIN_COLOR: &str = "#64748b";

fn edge_style(edge_type: EdgeType) -> &'static str {
    match edge_type {
        EdgeType::Cut => r##"stroke="#e2e8f0" stroke-width="1.5""##,
        EdgeType::Sew => r##"stroke="#22d3ee" stroke-width="1" stroke-dasharray="6 3""##,
        EdgeType::Hem => r##"stroke="#60a5fa" stroke-width="1" stroke-dasharray="8 2 2 2""##,
        EdgeType::Fold => r##"stroke="#fbbf24" stroke-width="0.8" stroke-dasharray="2 3""##,
        EdgeType::Internal => r##"stroke="#475569" stroke-width="0.5" stroke-dasharray="3 3""##,
        EdgeType::Placement => r##"stroke="#fb923c" stroke-width="0.8" stroke-dasharray="4 3""##,
    }
}

const LEGEND: &[(&str, &str, &str)] = &[
    ("#e2e8f0", "", "Cut"),
    ("#22d3ee", "6,3", "Sew"),
    ("#60a5fa", "8,2,2,2", "Hem"),
    ("#fbbf24", "2,3", "Fold"),
    ("#fb923c", "4,3", "Placement"),
    (NOTCH_COLOR, "", "Notch"),
];

fn render_piece(piece: &PatternPiece, dx: f64, dy: f64, out: &mut Vec<String>) {
    out.push(format!(
        r#"<polygon points="{}" fill="none" {} />"#,
        points_attr(&piece.cut_contour, dx, dy),
        edge_style(EdgeType::Cut)
    ));

    for edge in &piece.sew_edges {
        let style = edge_style(edge.edge_type);
        match edge.points.as_slice() {
            [] | [_] => continue,
            [a, b] => {
                let (a, b) = (a.offset(dx, dy), b.offset(dx, dy));
                out.push(format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" fill="none" {} />"#,
                    a.x, a.y, b.x, b.y, style
                ));
            }
            points => {
                let tag = if edge.edge_type == EdgeType::Cut { "polygon" } else { "polyline" };
                out.push(format!(
                    r#"<{} points="{}" fill="none" {} />"#,
                    tag,
                    points_attr(points, dx, dy),
                    style
                ));
            }
        }
    }

    for notch in &piece.notches {
        let (a, b) = tick_endpoints(notch.position.offset(dx, dy), notch.angle_deg, notch.length_mm);
        out.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1.5" />"#,
            a.x, a.y, b.x, b.y, NOTCH_COLOR
        ));
    }

    let gs = piece.grainline.start.offset(dx, dy);
    let ge = piece.grainline.end.offset(dx, dy);
    let (a1, a2) = arrowhead(gs, ge, 7.0);
    out.push(format!(
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="0.8" stroke-dasharray="6 3" />"#,
        gs.x, gs.y, ge.x, ge.y, GRAIN_COLOR
    ));
    out.push(format!(
        r#"<polygon points="{},{} {},{} {},{}" fill="{}" />"#,
        ge.x, ge.y, a1.x, a1.y, a2.x, a2.y, GRAIN_COLOR
    ));
}

/// Column widths and row heights of the piece grid.
pub(crate) struct GridLayout {
    pub col_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

impl GridLayout {
    pub fn new(sizes: &[(f64, f64)], columns: usize) -> Self {
        let rows = sizes.len().div_ceil(columns);
        let mut col_widths = vec![0.0_f64; columns];
        let mut row_heights = vec![0.0_f64; rows];
        for (idx, (w, h)) in sizes.iter().enumerate() {
            let (c, r) = (idx % columns, idx / columns);
            col_widths[c] = col_widths[c].max(*w);
            row_heights[r] = row_heights[r].max(*h);
        }
        Self { col_widths, row_heights }
    }

    pub fn total_width(&self) -> f64 {
        self.col_widths.iter().sum::<f64>()
            + GRID_GAP_MM * (self.col_widths.len() as f64 - 1.0)
            + GRID_PADDING_MM * 2.0
    }

    pub fn total_height(&self) -> f64 {
        let rows = self.row_heights.len() as f64;
        self.row_heights.iter().sum::<f64>()
            + GRID_GAP_MM * (rows - 1.0)
            + GRID_PADDING_MM * 2.0
            + LABEL_BAND_MM * rows
    }
}

pub fn render_svg(ir: &PatternIR) -> Result<String, RenderError> {
    check_pieces(ir)?;

    let sizes: Vec<(f64, f64)> = ir
        .pieces
        .iter()
        .map(|p| (p.bounding_box.width(), p.bounding_box.height()))
        .collect();
    let grid = GridLayout::new(&sizes, GRID_COLUMNS);
    let total_w = round_mm(grid.total_width());
    let total_h = round_mm(grid.total_height());

    let mut out = Vec::new();
    out.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = total_w,
        h = total_h
    ));
    out.push(r##"<rect width="100%" height="100%" fill="#0f172a" />"##.to_string());

    let legend_y = 14.0;
    let mut lx = GRID_PADDING_MM;
    for (color, dash, label) in LEGEND {
        let dash_attr = if dash.is_empty() {
            String::new()
        } else {
            format!(r#" stroke-dasharray="{}""#, dash)
        };
        out.push(format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1.5"{} />"#,
            lx,
            legend_y,
            lx + 18.0,
            legend_y,
            color,
            dash_attr
        ));
        out.push(format!(
            r##"<text x="{}" y="{}" fill="#94a3b8" font-size="9" font-family="monospace">{}</text>"##,
            lx + 22.0,
            legend_y + 4.0,
            label
        ));
        lx += 72.0;
    }

    let mut y = GRID_PADDING_MM + LEGEND_BAND_MM;
    for (r, row) in ir.pieces.chunks(GRID_COLUMNS).enumerate() {
        let mut x = GRID_PADDING_MM;
        let row_h = grid.row_heights[r];

        for (c, piece) in row.iter().enumerate() {
            let col_w = grid.col_widths[c];
            let labels = &piece.labels;

            out.push(format!(
                r##"<text x="{}" y="{}" fill="#f8fafc" font-size="13" font-family="monospace" font-weight="bold">{}  |  {}</text>"##,
                round_mm(x),
                round_mm(y + 14.0),
                escape_xml(&labels.piece_name),
                escape_xml(&labels.cut_instruction)
            ));
            out.push(format!(
                r##"<text x="{}" y="{}" fill="#64748b" font-size="9" font-family="monospace">{}  v{}</text>"##,
                round_mm(x),
                round_mm(y + 25.0),
                escape_xml(&labels.size_label),
                labels.version
            ));
            out.push(format!(
                r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="#1e293b" stroke-width="1" rx="4" />"##,
                round_mm(x - 8.0),
                round_mm(y + LABEL_BAND_MM - 8.0),
                round_mm(col_w + 16.0),
                round_mm(row_h + 16.0)
            ));

            let origin = Point {
                x: x - piece.bounding_box.min_x,
                y: y + LABEL_BAND_MM - piece.bounding_box.min_y,
            };
            render_piece(piece, origin.x, origin.y, &mut out);

            x += col_w + GRID_GAP_MM;
        }

        y += row_h + LABEL_BAND_MM + GRID_GAP_MM;
    }

    out.push("</svg>".to_string());
    Ok(out.join("\n"))
}
