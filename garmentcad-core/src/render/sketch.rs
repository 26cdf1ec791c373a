//! Technical sketch: front and back views, scaled into fixed panels, with
//! dimension callouts.

use crate::geometry::{arrowhead, round_mm, Point};
use crate::ir::{EdgeType, PatternIR, PatternPiece, PieceKind};
use crate::params::{Categorical, ParameterSet};
use crate::pieces::bodice::{ARMHOLE_FRONT, NECKLINE, POCKET_MARK};

use super::{check_pieces, escape_xml, require_piece, RenderError};

pub const SKETCH_WIDTH: f64 = 640.0;
pub const SKETCH_HEIGHT: f64 = 440.0;
pub const PANEL_WIDTH: f64 = 270.0;
pub const PANEL_HEIGHT: f64 = 360.0;
const PADDING: f64 = 30.0;
const PANEL_TOP: f64 = 50.0;
const PANEL_GAP: f64 = 40.0;
const FILL_RATIO: f64 = 0.85;

const FONT: &str = "Arial, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Front,
    Back,
}

impl View {
    fn label(&self) -> &'static str {
        match self {
            View::Front => "FRONT VIEW",
            View::Back => "BACK VIEW",
        }
    }
}

/// Uniform scale plus translation mapping piece millimetres into a panel.
#[derive(Debug, Clone, Copy)]
struct PanelTransform {
    scale: f64,
    ox: f64,
    oy: f64,
}

impl PanelTransform {
    fn fit(piece: &PatternPiece, panel_x: f64, panel_y: f64) -> Self {
        let bb = piece.bounding_box;
        let (w, h) = (bb.width(), bb.height());
        let scale = (PANEL_WIDTH / w).min(PANEL_HEIGHT / h) * FILL_RATIO;
        Self {
            scale,
            ox: panel_x + (PANEL_WIDTH - w * scale) / 2.0 - bb.min_x * scale,
            oy: panel_y + (PANEL_HEIGHT - h * scale) / 2.0 - bb.min_y * scale,
        }
    }

    fn apply(&self, p: Point) -> Point {
        Point::mm(p.x * self.scale + self.ox, p.y * self.scale + self.oy)
    }
}

fn callout(from: Point, to: Point, label: &str) -> String {
    [
        format!(
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#374151" stroke-width="0.6" stroke-dasharray="3 2" />"##,
            from.x, from.y, to.x, to.y
        ),
        format!(r##"<circle cx="{}" cy="{}" r="1.5" fill="#374151" />"##, from.x, from.y),
        format!(
            r##"<text x="{}" y="{}" fill="#111827" font-size="9" font-family="{}">{}</text>"##,
            round_mm(to.x + 4.0),
            round_mm(to.y + 4.0),
            FONT,
            escape_xml(label)
        ),
    ]
    .join("\n")
}

fn render_panel(
    piece: &PatternPiece,
    params: &ParameterSet,
    view: View,
    panel_x: f64,
    out: &mut Vec<String>,
) {
    let t = PanelTransform::fit(piece, panel_x, PANEL_TOP);

    out.push(format!(
        r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#f9fafb" stroke="#d1d5db" stroke-width="0.8" rx="4" />"##,
        round_mm(panel_x),
        round_mm(PANEL_TOP),
        PANEL_WIDTH,
        PANEL_HEIGHT
    ));
    out.push(format!(
        r##"<text x="{}" y="{}" text-anchor="middle" fill="#374151" font-size="11" font-weight="bold" font-family="{}">{}</text>"##,
        round_mm(panel_x + PANEL_WIDTH / 2.0),
        round_mm(PANEL_TOP - 6.0),
        FONT,
        view.label()
    ));

    let outline = piece
        .cut_contour
        .iter()
        .map(|p| {
            let q = t.apply(*p);
            format!("{},{}", q.x, q.y)
        })
        .collect::<Vec<_>>()
        .join(" ");
    out.push(format!(
        r##"<polygon points="{}" fill="#f8f8f0" stroke="#1a1a1a" stroke-width="1.2" />"##,
        outline
    ));

    let gs = t.apply(piece.grainline.start);
    let ge = t.apply(piece.grainline.end);
    let (a1, a2) = arrowhead(gs, ge, 6.0);
    out.push(format!(
        r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#6b7280" stroke-width="0.8" stroke-dasharray="5 3" />"##,
        gs.x, gs.y, ge.x, ge.y
    ));
    out.push(format!(
        r##"<polygon points="{},{} {},{} {},{}" fill="#6b7280" />"##,
        ge.x, ge.y, a1.x, a1.y, a2.x, a2.y
    ));

    let neck = piece.sew_edges.iter().find(|e| e.seam_id.starts_with(NECKLINE));
    if let Some(p) = neck.and_then(|e| e.points.get(e.points.len() / 2)) {
        let at = t.apply(*p);
        out.push(callout(
            at,
            at.offset(-40.0, -25.0),
            &format!("{} NECK", params.neckline.neckline_type.as_str().to_uppercase()),
        ));
    }

    if let Some(p) = piece.edges_of(EdgeType::Hem).next().and_then(|e| e.points.first()) {
        let at = t.apply(*p);
        out.push(callout(
            at,
            at.offset(30.0, 20.0),
            &format!("HEM {}mm", params.allowances.hem_allowance_body_mm),
        ));
    }

    if view != View::Front {
        return;
    }

    if let (Some(dims), Some(mark)) = (params.pocket.dims(), piece.edge(POCKET_MARK)) {
        if let Some(p) = mark.points.first() {
            let at = t.apply(*p);
            let w = round_mm(dims.width * t.scale);
            let h = round_mm(dims.height * t.scale);
            out.push(format!(
                r##"<rect x="{}" y="{}" width="{}" height="{}" fill="rgba(251,146,60,0.15)" stroke="#fb923c" stroke-width="0.8" stroke-dasharray="3 2" />"##,
                at.x, at.y, w, h
            ));
            out.push(callout(
                Point::mm(at.x + w / 2.0, at.y + h / 2.0),
                Point::mm(at.x + w + 20.0, at.y - 10.0),
                &format!("POCKET {}×{}mm", dims.width, dims.height),
            ));
        }
    }

    if let Some(p) = piece.edge(ARMHOLE_FRONT).and_then(|e| e.points.last()) {
        let at = t.apply(*p);
        out.push(callout(
            at,
            at.offset(35.0, -10.0),
            &format!(
                "{} {}mm",
                params.sleeve.sleeve_type.as_str().to_uppercase(),
                params.sleeve.sleeve_length_mm
            ),
        ));
    }
}

pub fn render_tech_sketch(ir: &PatternIR) -> Result<String, RenderError> {
    check_pieces(ir)?;
    let front = require_piece(ir, PieceKind::FrontBodice)?;
    let back = require_piece(ir, PieceKind::BackBodice)?;
    let params = &ir.params;
    let center_x = SKETCH_WIDTH / 2.0;

    let mut out = Vec::new();
    out.push(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
        w = SKETCH_WIDTH,
        h = SKETCH_HEIGHT
    ));
    out.push(r#"<rect width="100%" height="100%" fill="white" />"#.to_string());

    out.push(format!(
        r##"<text x="{}" y="20" text-anchor="middle" fill="#111827" font-size="13" font-weight="bold" font-family="{}">Technical Sketch — T-Shirt  {}  v{}</text>"##,
        center_x,
        FONT,
        escape_xml(&params.identity.size_label),
        ir.version()
    ));
    out.push(format!(
        r##"<text x="{}" y="34" text-anchor="middle" fill="#6b7280" font-size="9" font-family="{}">{} FIT  ·  {} SLEEVE  ·  {} NECK</text>"##,
        center_x,
        FONT,
        params.identity.fit_profile.as_str().to_uppercase(),
        params.sleeve.sleeve_type.as_str().to_uppercase(),
        params.neckline.neckline_type.as_str().to_uppercase()
    ));

    render_panel(front, params, View::Front, PADDING, &mut out);
    render_panel(back, params, View::Back, PADDING + PANEL_WIDTH + PANEL_GAP, &mut out);

    let footer_y = SKETCH_HEIGHT - 16.0;
    let footer = [
        format!("Chest: {}mm", params.body.chest_finished_circumference_mm),
        format!("Body: {}mm", params.body.body_length_hps_to_hem_mm),
        format!("Shoulder: {}mm", params.body.shoulder_width_mm),
        format!("SA: {}mm", params.allowances.seam_allowance_mm),
        format!("Fabric: {} stretch", params.neckline.fabric_stretch_class.as_str()),
    ]
    .join("  ·  ");
    out.push(format!(
        r##"<text x="{}" y="{}" text-anchor="middle" fill="#9ca3af" font-size="8" font-family="{}">{}</text>"##,
        center_x, footer_y, FONT, footer
    ));
    out.push(format!(
        r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#e5e7eb" stroke-width="0.5" />"##,
        PADDING,
        footer_y - 10.0,
        SKETCH_WIDTH - PADDING,
        footer_y - 10.0
    ));

    out.push("</svg>".to_string());
    Ok(out.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{NecklineType, SleeveType};
    use crate::pieces::generate;

    #[test]
    fn test_title_and_subtitle() {
        let sketch = render_tech_sketch(&generate(&ParameterSet::default(), 2).ir).unwrap();
        assert!(sketch.contains("Technical Sketch — T-Shirt  M  v2"));
        assert!(sketch.contains("REGULAR FIT  ·  SHORT SLEEVE  ·  CREW NECK"));
        assert!(sketch.contains(">FRONT VIEW</text>"));
        assert!(sketch.contains(">BACK VIEW</text>"));
        assert!(sketch.contains("Chest: 1040mm  ·  Body: 700mm"));
        assert!(sketch.contains("Fabric: medium stretch"));
    }

    #[test]
    fn test_callouts_follow_parameters() {
        let mut params = ParameterSet::default();
        params.neckline.neckline_type = NecklineType::V;
        params.sleeve.sleeve_type = SleeveType::Long;
        params.sleeve.sleeve_length_mm = 600.0;
        let sketch = render_tech_sketch(&generate(&params, 1).ir).unwrap();
        assert_eq!(sketch.matches(">V NECK</text>").count(), 2);
        assert_eq!(sketch.matches(">HEM 20mm</text>").count(), 2);
        // sleeve callout on the front view only
        assert_eq!(sketch.matches(">LONG 600mm</text>").count(), 1);
        assert!(!sketch.contains("POCKET"));
    }

    #[test]
    fn test_pocket_callout_when_enabled() {
        let params = ParameterSet::default().with_pocket(100.0, 120.0, 70.0, 130.0);
        let sketch = render_tech_sketch(&generate(&params, 1).ir).unwrap();
        assert!(sketch.contains("POCKET 100×120mm"));
        assert!(sketch.contains("fill=\"rgba(251,146,60,0.15)\""));
    }

    #[test]
    fn test_piece_fits_inside_panel() {
        let ir = generate(&ParameterSet::default(), 1).ir;
        let front = ir.piece(PieceKind::FrontBodice).unwrap();
        let t = PanelTransform::fit(front, PADDING, PANEL_TOP);
        let bb = front.bounding_box;
        let lo = t.apply(Point::mm(bb.min_x, bb.min_y));
        let hi = t.apply(Point::mm(bb.max_x, bb.max_y));
        assert!(lo.x >= PADDING && hi.x <= PADDING + PANEL_WIDTH);
        assert!(lo.y >= PANEL_TOP && hi.y <= PANEL_TOP + PANEL_HEIGHT);
    }
}
