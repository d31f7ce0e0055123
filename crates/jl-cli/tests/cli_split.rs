use jl_yoda::read_archive;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_jetlabel"))
}

fn repo_root() -> PathBuf {
    // crates/jl-cli -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").canonicalize().unwrap()
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let mut p = std::env::temp_dir();
    p.push(format!("jetlabel_cli_{}_{}_{}", std::process::id(), nanos, name));
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn split_writes_one_archive_per_label() {
    let input = repo_root().join("tests/fixtures/jet_labels.yoda");
    let out_dir = tmp_dir("split");

    let o = run(&["split", input.to_str().unwrap(), "--out-dir", out_dir.to_str().unwrap()]);
    assert!(o.status.success(), "stderr:\n{}", String::from_utf8_lossy(&o.stderr));

    assert_eq!(listing(&out_dir), vec!["GluonKt.yoda", "LightAkt.yoda"]);

    let light = read_archive(out_dir.join("LightAkt.yoda")).unwrap();
    assert_eq!(light.paths(), vec!["/MC_QCDAWARE_JETS/Jet0__pt", "/MC_QCDAWARE_JETS/Jet1__eta"]);
    let types: Vec<&str> = light.iter().map(|(_, o)| o.type_name()).collect();
    assert_eq!(types, vec!["Histo1D", "Scatter2D"]);

    let gluon = read_archive(out_dir.join("GluonKt.yoda")).unwrap();
    assert_eq!(gluon.paths(), vec!["/MC_QCDAWARE_JETS/Jet0__pt"]);

    let stderr = String::from_utf8_lossy(&o.stderr);
    assert!(stderr.contains("LightAkt.yoda (2 objects)"), "stderr:\n{stderr}");

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn split_prefixed_naming() {
    let input = repo_root().join("tests/fixtures/jet_labels.yoda");
    let out_dir = tmp_dir("split_prefixed");

    let o = run(&[
        "split",
        input.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--naming",
        "prefixed",
    ]);
    assert!(o.status.success(), "stderr:\n{}", String::from_utf8_lossy(&o.stderr));
    assert_eq!(listing(&out_dir), vec!["jet_labels_GluonKt.yoda", "jet_labels_LightAkt.yoda"]);

    std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn split_flag_overrides_config_naming() {
    let input = repo_root().join("tests/fixtures/jet_labels.yoda");
    let work = tmp_dir("split_config");
    let out_dir = work.join("out");
    std::fs::create_dir_all(&work).unwrap();
    let cfg = work.join("jetlabel.yaml");
    std::fs::write(
        &cfg,
        "split_naming: prefixed\nsplit_selection:\n  vocabularies:\n    - [\"Light\"]\n    - [\"Akt\"]\n",
    )
    .unwrap();

    let o = run(&[
        "split",
        input.to_str().unwrap(),
        "--out-dir",
        out_dir.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
    ]);
    assert!(o.status.success(), "stderr:\n{}", String::from_utf8_lossy(&o.stderr));
    assert_eq!(listing(&out_dir), vec!["jet_labels_LightAkt.yoda"]);

    let out_dir2 = work.join("out2");
    let o = run(&[
        "split",
        input.to_str().unwrap(),
        "--out-dir",
        out_dir2.to_str().unwrap(),
        "--config",
        cfg.to_str().unwrap(),
        "--naming",
        "label",
    ]);
    assert!(o.status.success(), "stderr:\n{}", String::from_utf8_lossy(&o.stderr));
    assert_eq!(listing(&out_dir2), vec!["LightAkt.yoda"]);

    std::fs::remove_dir_all(&work).ok();
}

#[test]
fn split_rejects_unknown_naming() {
    let input = repo_root().join("tests/fixtures/jet_labels.yoda");
    let o = run(&["split", input.to_str().unwrap(), "--naming", "suffix"]);
    assert!(!o.status.success());
}

#[test]
fn split_malformed_input_reports_line() {
    let work = tmp_dir("split_malformed");
    std::fs::create_dir_all(&work).unwrap();
    let input = work.join("bad.yoda");
    std::fs::write(&input, "BEGIN YODA_HISTO1D /A/Jet0_LightAkt_pt\nPath=/A/Jet0_LightAkt_pt\n").unwrap();

    let o = run(&["split", input.to_str().unwrap(), "--out-dir", work.to_str().unwrap()]);
    assert!(!o.status.success());
    let stderr = String::from_utf8_lossy(&o.stderr);
    assert!(stderr.contains("malformed archive at line"), "stderr:\n{stderr}");
    assert_eq!(listing(&work), vec!["bad.yoda"]);

    std::fs::remove_dir_all(&work).ok();
}
