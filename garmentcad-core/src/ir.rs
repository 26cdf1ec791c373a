//! Pattern IR - the canonical intermediate representation
//!
//! Produced once per generation call and never mutated afterwards. Every renderer
//! and documentation generator is a function of a [`PatternIR`] alone.

use serde::{Deserialize, Serialize};

use crate::derived::DerivedParameters;
use crate::geometry::{BoundingBox, Point};
use crate::params::ParameterSet;

pub const TEMPLATE_TAG: &str = "tshirt";
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Cut,
    Sew,
    Hem,
    Fold,
    Placement,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    SeamAllowance,
    HemAllowanceBody,
    HemAllowanceSleeve,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionEdge {
    pub seam_id: String,
    pub edge_type: EdgeType,
    pub allowance_type: AllowanceType,
    pub points: Vec<Point>,
}

impl ConstructionEdge {
    pub fn new(
        seam_id: &str,
        edge_type: EdgeType,
        allowance_type: AllowanceType,
        points: Vec<Point>,
    ) -> Self {
        Self {
            seam_id: seam_id.to_string(),
            edge_type,
            allowance_type,
            points,
        }
    }

    /// A seam-allowance sew edge, the most common kind.
    pub fn sew(seam_id: &str, points: Vec<Point>) -> Self {
        Self::new(seam_id, EdgeType::Sew, AllowanceType::SeamAllowance, points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notch {
    pub notch_id: String,
    pub seam_id: String,
    pub position: Point,
    pub angle_deg: f64,
    pub length_mm: f64,
}

impl Notch {
    pub fn new(notch_id: &str, seam_id: &str, position: Point, angle_deg: f64, length_mm: f64) -> Self {
        Self {
            notch_id: notch_id.to_string(),
            seam_id: seam_id.to_string(),
            position,
            angle_deg,
            length_mm,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grainline {
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceLabels {
    pub size_label: String,
    pub piece_name: String,
    pub cut_instruction: String,
    pub version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    #[serde(rename = "Front Bodice")]
    FrontBodice,
    #[serde(rename = "Back Bodice")]
    BackBodice,
    Sleeve,
    Neckband,
    Pocket,
}

impl PieceKind {
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::FrontBodice => "Front Bodice",
            PieceKind::BackBodice => "Back Bodice",
            PieceKind::Sleeve => "Sleeve",
            PieceKind::Neckband => "Neckband",
            PieceKind::Pocket => "Pocket",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternPiece {
    pub name: PieceKind,
    pub cut_quantity: u32,
    pub mirror: bool,
    pub fold: bool,
    pub units: String,
    /// Closed outline including allowances; the first point is not repeated unless
    /// the generator closes it explicitly.
    pub cut_contour: Vec<Point>,
    pub sew_edges: Vec<ConstructionEdge>,
    pub notches: Vec<Notch>,
    pub grainline: Grainline,
    pub labels: PieceLabels,
    pub bounding_box: BoundingBox,
}

impl PatternPiece {
    pub fn edge(&self, seam_id: &str) -> Option<&ConstructionEdge> {
        self.sew_edges.iter().find(|e| e.seam_id == seam_id)
    }

    pub fn edges_of(&self, edge_type: EdgeType) -> impl Iterator<Item = &ConstructionEdge> {
        self.sew_edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Bounding box area times cut quantity.
    pub fn fabric_area_sqmm(&self) -> f64 {
        self.bounding_box.area() * self.cut_quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternIR {
    pub template_type: String,
    pub schema_version: u32,
    pub params: ParameterSet,
    pub derived: DerivedParameters,
    pub pieces: Vec<PatternPiece>,
}

impl PatternIR {
    pub fn piece(&self, kind: PieceKind) -> Option<&PatternPiece> {
        self.pieces.iter().find(|p| p.name == kind)
    }

    /// Version stamped on the piece labels.
    pub fn version(&self) -> u32 {
        self.pieces.first().map(|p| p.labels.version).unwrap_or(1)
    }
}

/// Parameter snapshot written into the manufacturing pack: the parameter set,
/// flattened, plus derived values and the template identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    #[serde(flatten)]
    pub params: ParameterSet,
    pub derived: DerivedParameters,
    pub template_type: String,
    pub schema_version: u32,
}

impl From<&PatternIR> for ParameterSnapshot {
    fn from(ir: &PatternIR) -> Self {
        Self {
            params: ir.params.clone(),
            derived: ir.derived.clone(),
            template_type: ir.template_type.clone(),
            schema_version: ir.schema_version,
        }
    }
}
