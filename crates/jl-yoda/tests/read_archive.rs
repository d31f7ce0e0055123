//! Integration tests: read YODA archives from fixture files.

use approx::assert_relative_eq;
use jl_yoda::{AnalysisObject, read_archive, write_archive};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

fn tmp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("jl_yoda_{}_{}_{}", std::process::id(), nanos, name))
}

#[test]
fn read_jet_label_fixture() {
    let path = fixture_path("jet_labels.yoda");
    assert!(path.exists(), "missing fixture: {}", path.display());

    let archive = read_archive(&path).expect("failed to read fixture");
    assert_eq!(archive.len(), 6);
    assert_eq!(archive.paths()[0], "/MC_QCDAWARE_JETS/Jet0_AktLabVsKtLab");

    let h = archive
        .get("/MC_QCDAWARE_JETS/Jet0_AktLabVsKtLab")
        .and_then(AnalysisObject::as_histo2d)
        .expect("Histo2D");
    assert_eq!(h.bins.len(), 5);
    assert_eq!(h.annotation("YLabel"), Some("$k_t$ label"));
    assert_relative_eq!(h.sum_w(true), 10.0);
    assert_relative_eq!(h.sum_w(false), 10.0);

    let types: Vec<&str> = archive.iter().map(|(_, o)| o.type_name()).collect();
    assert_eq!(types, vec!["Histo2D", "Histo2D", "Histo1D", "Histo1D", "Scatter2D", "Histo1D"]);
}

#[test]
fn gzip_archives_round_trip_through_disk() {
    let archive = read_archive(fixture_path("jet_labels.yoda")).unwrap();
    let out = tmp_path("copy.yoda.gz");

    let objects: Vec<&AnalysisObject> = archive.iter().map(|(_, o)| o).collect();
    write_archive(objects, &out).expect("write gz");

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b], "expected gzip magic");

    let back = read_archive(&out).expect("read gz");
    assert_eq!(back.paths(), archive.paths());
    for (path, obj) in archive.iter() {
        assert_eq!(back.get(path), Some(obj), "{path} changed on rewrite");
    }

    let _ = std::fs::remove_file(&out);
}

#[test]
fn plain_archives_round_trip_through_disk() {
    let archive = read_archive(fixture_path("jet_labels.yoda")).unwrap();
    let out = tmp_path("copy.yoda");

    write_archive(archive.iter().map(|(_, o)| o), &out).expect("write plain");

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("BEGIN YODA_HISTO2D /MC_QCDAWARE_JETS/Jet0_AktLabVsKtLab\n"));
    assert!(!text.contains("\n\n\n"));

    let back = read_archive(&out).expect("read plain");
    assert_eq!(back.paths(), archive.paths());
    for (path, obj) in archive.iter() {
        assert_eq!(back.get(path), Some(obj), "{path} changed on rewrite");
    }

    let _ = std::fs::remove_file(&out);
}

#[test]
fn write_into_missing_directory_is_output_failure() {
    let archive = read_archive(fixture_path("jet_labels.yoda")).unwrap();
    let out = tmp_path("no_such_dir").join("out.yoda");
    let err = write_archive(archive.iter().map(|(_, o)| o), &out).unwrap_err();
    assert!(matches!(err, jl_yoda::YodaError::OutputWriteFailure { .. }), "got {err}");
}
