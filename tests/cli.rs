//! Command-line tests that never reach ffmpeg.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

#[allow(deprecated)]
fn vmaker_cmd(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vmaker").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("VMAKER_CONFIG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(config)
        .arg("--yes");
    cmd
}

/// A configured project whose working directory holds `clips`.
fn project(clips: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let root = tempdir().unwrap();
    let work = root.path().join("clips").join("01");
    fs::create_dir_all(&work).unwrap();
    fs::create_dir_all(root.path().join("raw")).unwrap();
    for name in clips {
        fs::write(work.join(name), name.as_bytes()).unwrap();
    }
    let config = root.path().join("config.json");
    let json = serde_json::json!({
        "raw_dir": root.path().join("raw"),
        "clip_dir": root.path().join("clips"),
        "output_dir": root.path().join("out"),
        "curr_dirname": "01",
    });
    fs::write(&config, json.to_string()).unwrap();
    (root, config, work)
}

#[test]
fn missing_config_points_to_init() {
    let root = tempdir().unwrap();
    vmaker_cmd(&root.path().join("absent.json"))
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [initializing]"))
        .stderr(predicate::str::contains("vmaker init"));
}

#[test]
fn cfg_prints_directories() {
    let (_root, config, work) = project(&[]);
    vmaker_cmd(&config)
        .arg("cfg")
        .assert()
        .success()
        .stdout(predicate::str::contains(work.display().to_string()));
}

#[test]
fn bad_timestamp_fails_before_lookup() {
    let (_root, config, work) = project(&["demo.mp4"]);
    vmaker_cmd(&config)
        .args(["cut", "demo", "1:2:3", "00:00:05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [validating]"));
    assert_eq!(fs::read(work.join("demo.mp4")).unwrap(), b"demo.mp4");
}

#[test]
fn rm_with_unknown_name_removes_nothing() {
    let (_root, config, work) = project(&["001-a.mp4", "002-b.mp4"]);
    vmaker_cmd(&config)
        .args(["rm", "1", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing was removed"))
        .stderr(predicate::str::contains("ghost"));
    assert!(work.join("001-a.mp4").exists());
    assert!(work.join("002-b.mp4").exists());
}

#[test]
fn rm_reports_remaining_count() {
    let (_root, config, work) = project(&["001-a.mp4", "002-b.mp4", "003-c.mkv"]);
    vmaker_cmd(&config)
        .args(["rm", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 clip(s)"));
    assert!(!work.join("001-a.mp4").exists());
    assert!(work.join("002-b.mp4").exists());
}

#[test]
fn rename_keeps_extension() {
    let (_root, config, work) = project(&["003-demo.mov"]);
    vmaker_cmd(&config)
        .args(["rename", "3", "003-final"])
        .assert()
        .success();
    assert!(work.join("003-final.mov").exists());
    assert!(!work.join("003-demo.mov").exists());
}

#[test]
fn leftover_staging_file_blocks_transforms() {
    let (_root, config, work) = project(&["demo.mp4", "intro_output.mp4"]);
    vmaker_cmd(&config)
        .args(["convert", "demo.mp4", ".mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging file is already present"));
    assert_eq!(fs::read(work.join("demo.mp4")).unwrap(), b"demo.mp4");
    assert!(!work.join("demo.mkv").exists());
}

#[test]
fn unknown_clip_is_reported() {
    let (_root, config, _work) = project(&["002-intro.mp4"]);
    vmaker_cmd(&config)
        .args(["mute", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error [resolving]"));
}

#[test]
fn add_copies_newest_recording() {
    let (root, config, work) = project(&["001-setup.mp4"]);
    fs::write(root.path().join("raw").join("capture.mkv"), b"rec").unwrap();
    vmaker_cmd(&config)
        .args(["add", "intro", "--rename-strategy", "clip-info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 clip(s)"));
    assert_eq!(fs::read(work.join("002-intro.mkv")).unwrap(), b"rec");
}
