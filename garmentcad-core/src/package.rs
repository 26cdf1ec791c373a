//! Package Assembler - the manufacturing pack archive
//!
//! Every artifact of one version goes into a single DEFLATE zip under a
//! `manufacturing_pack/` folder. Any failure here aborts the version.

use std::io::{Cursor, Write};

use serde::Serialize;
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::diff::VersionDiff;
use crate::documents::{Bom, ConstructionNotes, SpecSheet};
use crate::ir::ParameterSnapshot;

pub const PACK_FOLDER: &str = "manufacturing_pack";

pub const DXF_FILE: &str = "pattern_production.dxf";
pub const PREVIEW_FILE: &str = "pattern_preview.svg";
pub const SKETCH_FILE: &str = "tech_sketch.svg";
pub const SPEC_SHEET_FILE: &str = "spec_sheet.json";
pub const NOTES_FILE: &str = "construction_notes.json";
pub const BOM_FILE: &str = "bom.json";
pub const SNAPSHOT_FILE: &str = "parameter_snapshot.json";
pub const DIFF_FILE: &str = "version_diff.json";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ManufacturingPackArtifacts {
    pub dxf: String,
    pub svg: String,
    pub tech_sketch_svg: String,
    pub spec_sheet: SpecSheet,
    pub construction_notes: ConstructionNotes,
    pub bom: Bom,
    pub parameter_snapshot: ParameterSnapshot,
    /// Present for every version after the first.
    pub version_diff: Option<VersionDiff>,
}

fn pretty<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(value)
}

impl ManufacturingPackArtifacts {
    /// File name and content of every pack member, in archive order.
    pub fn entries(&self) -> Result<Vec<(&'static str, Vec<u8>)>, PackageError> {
        let mut entries = vec![
            (DXF_FILE, self.dxf.as_bytes().to_vec()),
            (PREVIEW_FILE, self.svg.as_bytes().to_vec()),
            (SKETCH_FILE, self.tech_sketch_svg.as_bytes().to_vec()),
            (SPEC_SHEET_FILE, pretty(&self.spec_sheet)?),
            (NOTES_FILE, pretty(&self.construction_notes)?),
            (BOM_FILE, pretty(&self.bom)?),
            (SNAPSHOT_FILE, pretty(&self.parameter_snapshot)?),
        ];
        if let Some(diff) = &self.version_diff {
            entries.push((DIFF_FILE, pretty(diff)?));
        }
        Ok(entries)
    }
}

/// Zip the pack in memory.
pub fn assemble_manufacturing_pack(artifacts: &ManufacturingPackArtifacts) -> Result<Vec<u8>, PackageError> {
    zip_entries(&artifacts.entries()?)
}

/// Zip already-serialized members under the pack folder, in the given order.
pub fn zip_entries(entries: &[(&str, Vec<u8>)]) -> Result<Vec<u8>, PackageError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        zip.start_file(format!("{}/{}", PACK_FOLDER, name), options)?;
        zip.write_all(bytes)?;
    }

    let bytes = zip.finish()?.into_inner();
    tracing::debug!(files = entries.len(), bytes = bytes.len(), "manufacturing pack assembled");
    Ok(bytes)
}
