//! End-to-end tests driving the `asana` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn asana(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_asana"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run asana binary")
}

/// Copy the standard fixtures into `dir` under the default file names.
fn stage_default_inputs(dir: &Path) {
    fs::copy(fixture_path("train_data.csv"), dir.join("train_data.csv")).unwrap();
    fs::copy(fixture_path("test_data.csv"), dir.join("test_data.csv")).unwrap();
}

/// Parse the percentage out of a line such as `... Accuracy: 95.00%`.
fn parse_accuracy(stdout: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|l| l.contains("Accuracy:"))
        .expect("no accuracy line");
    let pct = line
        .rsplit("Accuracy: ")
        .next()
        .unwrap()
        .trim_end_matches('%');
    pct.parse().unwrap()
}

#[test]
fn train_with_defaults_writes_model_and_prints_accuracy() {
    let dir = TempDir::new().unwrap();
    stage_default_inputs(dir.path());

    let out = asana(&["train"], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Training complete! Accuracy:"), "stdout: {stdout}");
    assert!(stdout.contains("Model saved as yoga_pose_model.pkl"), "stdout: {stdout}");

    let accuracy = parse_accuracy(&stdout);
    assert!((0.0..=100.0).contains(&accuracy));

    let model = dir.path().join("yoga_pose_model.pkl");
    assert!(fs::metadata(&model).unwrap().len() > 0);
}

#[test]
fn evaluate_reloaded_model_matches_training_accuracy() {
    let dir = TempDir::new().unwrap();
    stage_default_inputs(dir.path());

    let trained = asana(&["train", "--report", "out/train.json"], dir.path());
    assert!(trained.status.success());
    let train_accuracy = parse_accuracy(&String::from_utf8(trained.stdout).unwrap());

    let evaluated = asana(&["evaluate", "--report", "out/eval.json"], dir.path());
    assert!(
        evaluated.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&evaluated.stderr)
    );
    let eval_accuracy = parse_accuracy(&String::from_utf8(evaluated.stdout).unwrap());
    assert!((train_accuracy - eval_accuracy).abs() < 1e-9);

    let train_report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/train.json")).unwrap())
            .unwrap();
    let eval_report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/eval.json")).unwrap())
            .unwrap();
    assert_eq!(train_report["seed"], 42);
    assert_eq!(train_report["n_train_samples"], 100);
    assert!(eval_report["seed"].is_null());
    assert_eq!(train_report["confusion_matrix"], eval_report["confusion_matrix"]);
}

#[test]
fn missing_label_column_fails_without_writing_model() {
    let dir = TempDir::new().unwrap();
    let train = fixture_path("train_no_label.csv");
    let test = fixture_path("test_data.csv");

    let out = asana(
        &[
            "train",
            "--train",
            train.to_str().unwrap(),
            "--test",
            test.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("label column"));
    assert!(!dir.path().join("yoga_pose_model.pkl").exists());
}

#[test]
fn mismatched_feature_columns_fail() {
    let dir = TempDir::new().unwrap();
    let train = fixture_path("train_data.csv");
    let test = fixture_path("test_extra_column.csv");

    let out = asana(
        &[
            "train",
            "--train",
            train.to_str().unwrap(),
            "--test",
            test.to_str().unwrap(),
        ],
        dir.path(),
    );
    assert!(!out.status.success());
    assert!(!dir.path().join("yoga_pose_model.pkl").exists());
}

#[test]
fn evaluate_rejects_table_with_different_columns() {
    let dir = TempDir::new().unwrap();
    stage_default_inputs(dir.path());
    let trained = asana(&["train"], dir.path());
    assert!(trained.status.success());

    let data = fixture_path("test_extra_column.csv");
    let out = asana(
        &["evaluate", "--data", data.to_str().unwrap(), "--report", "eval.json"],
        dir.path(),
    );
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("do not match the model"), "stderr: {stderr}");
    assert!(stderr.contains("nose_z"), "stderr: {stderr}");
    assert!(out.stdout.is_empty());
    assert!(!dir.path().join("eval.json").exists());
}

#[test]
fn missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = asana(&["train"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read training CSV"));
}
