//! Documentation Generators
//!
//! Spec sheet, bill of materials and construction notes. Each is a pure function
//! of the IR and a generation timestamp, serialized as JSON into the
//! manufacturing pack.

pub mod bom;
pub mod notes;
pub mod spec_sheet;

pub use bom::{generate_bom, yards_for_area, Bom, BomLine};
pub use notes::{generate_construction_notes, ConstructionNotes, StitchTypes};
pub use spec_sheet::{generate_spec_sheet, PointOfMeasure, SpecSheet};
