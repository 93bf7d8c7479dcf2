use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn promptsmith() -> Command {
    let mut cmd = Command::cargo_bin("promptsmith").unwrap();
    cmd.env_remove("PROMPTSMITH_CATALOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn kinds_lists_selection_keys() {
    promptsmith()
        .arg("kinds")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "pose: pose_preset, pose_reference",
        ))
        .stdout(predicate::str::contains("four_panel: four_panel"));
}

#[test]
fn sections_are_numbered() {
    promptsmith()
        .args(["sections", "decorative_text"])
        .assert()
        .success()
        .stdout("1. header\n2. style\n3. text\n4. background\n5. output\n");
}

#[test]
fn unknown_selection_key_fails() {
    promptsmith()
        .args(["sections", "comic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown selection key: comic"));
}

#[test]
fn generate_reads_state_and_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.yaml");
    let out = dir.path().join("doc.yaml");
    fs::write(
        &state,
        "title: Jump\npose:\n  use_pose_capture: true\n  pose_reference_image_path: /p/jump.png\n",
    )
    .unwrap();

    promptsmith()
        .arg("generate")
        .arg("pose")
        .arg("--state")
        .arg(&state)
        .arg("--prune")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let doc = fs::read_to_string(&out).unwrap();
    assert!(doc.starts_with("# Character Pose\n"));
    assert!(doc.contains("title: \"Jump\""));
    assert!(doc.contains("pose_image: \"jump.png\""));
}

#[test]
fn explicit_key_overrides_derived_key() {
    promptsmith()
        .args(["generate", "background", "--key", "background_with_reference"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reference:"));
}

#[test]
fn check_reports_catalog_issues() {
    promptsmith().arg("check").assert().success().stdout(
        predicate::str::starts_with("catalog OK: 10 output types, 16 selection keys"),
    );

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("MasterTemplate.yaml"),
        "output_types:\n  demo:\n    sections: {}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("SelectionMap.yaml"),
        "selection_map:\n  demo:\n    sections: [header, title_overlay]\n",
    )
    .unwrap();

    promptsmith()
        .arg("check")
        .arg("--catalog")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout("demo: section `header` is not defined\n");
}

#[test]
fn missing_catalog_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    promptsmith()
        .args(["generate", "face_sheet"])
        .env("PROMPTSMITH_CATALOG", dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog document not found"));
}

#[test]
fn render_uses_the_library() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("sheet.yaml"),
        "name: \"{{name}}\"\nextra: \"{{extra}}\"\n",
    )
    .unwrap();
    let vars = dir.path().join("vars.json");
    fs::write(&vars, r#"{"name": "Aki"}"#).unwrap();

    promptsmith()
        .arg("render")
        .arg("sheet")
        .arg("--vars")
        .arg(&vars)
        .arg("--library")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("name: \"Aki\"\n\n");
}
