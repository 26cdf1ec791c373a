//! Manufacturing pack contract: file set, layout, and on-disk round trip.

use std::fs::File;
use std::io::Read;

use garmentcad_core::{GenerationPipeline, GenerationRequest, ParameterSet, PreviousVersion};

fn member_names(archive: &mut zip::ZipArchive<File>) -> Vec<String> {
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

fn write_pack(bytes: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pack.zip");
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

#[test]
fn first_version_pack_has_seven_files() {
    let out = GenerationPipeline::new()
        .generate_version(&GenerationRequest { params: ParameterSet::default(), version: 1, previous: None })
        .unwrap();
    let (_dir, path) = write_pack(&out.package);

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let names = member_names(&mut archive);
    assert_eq!(
        names,
        vec![
            "manufacturing_pack/pattern_production.dxf",
            "manufacturing_pack/pattern_preview.svg",
            "manufacturing_pack/tech_sketch.svg",
            "manufacturing_pack/spec_sheet.json",
            "manufacturing_pack/construction_notes.json",
            "manufacturing_pack/bom.json",
            "manufacturing_pack/parameter_snapshot.json",
        ]
    );
}

#[test]
fn later_version_pack_includes_diff() {
    let mut params = ParameterSet::default();
    params.sleeve.sleeve_length_mm = 240.0;

    let out = GenerationPipeline::new()
        .generate_version(&GenerationRequest {
            params,
            version: 2,
            previous: Some(PreviousVersion { version: 1, params: ParameterSet::default() }),
        })
        .unwrap();
    let (_dir, path) = write_pack(&out.package);

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    assert_eq!(archive.len(), 8);

    let mut text = String::new();
    archive
        .by_name("manufacturing_pack/version_diff.json")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    let diff: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(diff["from_version"], 1);
    assert_eq!(diff["to_version"], 2);
    assert_eq!(diff["summary"], "Sleeve Length (mm): 220 → 240");
}

#[test]
fn snapshot_carries_params_and_derived() {
    let out = GenerationPipeline::new()
        .generate_version(&GenerationRequest { params: ParameterSet::default(), version: 1, previous: None })
        .unwrap();
    let (_dir, path) = write_pack(&out.package);

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    let mut text = String::new();
    archive
        .by_name("manufacturing_pack/parameter_snapshot.json")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(snapshot["template_type"], "tshirt");
    assert_eq!(snapshot["schema_version"], 2);
    assert_eq!(snapshot["chest_finished_circumference_mm"], 1040.0);
    assert_eq!(snapshot["fabric_stretch_class"], "medium");
    assert_eq!(snapshot["derived"]["armhole_depth_mm"], 230.0);
    assert_eq!(snapshot["derived"]["neckband_length_ratio"], 0.85);
}

#[test]
fn digests_match_archive_members() {
    let out = GenerationPipeline::new()
        .generate_version(&GenerationRequest { params: ParameterSet::default(), version: 1, previous: None })
        .unwrap();
    let (_dir, path) = write_pack(&out.package);

    let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
    for (name, digest) in &out.digests {
        let mut bytes = Vec::new();
        archive
            .by_name(&format!("manufacturing_pack/{}", name))
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(&garmentcad_core::sha256_hex(&bytes), digest, "{}", name);
    }
}
