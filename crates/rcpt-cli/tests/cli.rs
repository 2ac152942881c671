use std::io::Cursor;
use std::path::Path;

use assert_cmd::Command;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use predicates::prelude::*;
use tempfile::TempDir;

fn rcpt(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rcpt").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("RUST_LOG");
    cmd
}

fn png_base64() -> String {
    let mut bytes = Vec::new();
    DynamicImage::new_rgb8(16, 16)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    STANDARD.encode(bytes)
}

fn request(extra: serde_json::Value) -> String {
    let mut payload = serde_json::json!({ "image_png_base64": png_base64() });
    if let (Some(target), Some(fields)) = (payload.as_object_mut(), extra.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    payload.to_string()
}

fn write_observations(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("observations.json");
    std::fs::write(
        &path,
        r#"[
            {"text": "Blue Bottle Coffee", "confidence": 0.97},
            {"text": "smudge", "confidence": 0.12},
            {"text": "Total $15.35", "confidence": 0.91}
        ]"#,
    )
    .unwrap();
    path
}

#[test]
fn missing_image_is_validation_error() {
    let home = TempDir::new().unwrap();
    rcpt(&home)
        .write_stdin(r#"{"locale": "en_US"}"#)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("validation_error: image_png_base64 must not be empty"));
}

#[test]
fn out_of_range_confidence_is_validation_error() {
    let home = TempDir::new().unwrap();
    rcpt(&home)
        .arg("recognize")
        .write_stdin(request(serde_json::json!({ "minimum_confidence": 1.5 })))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("minimum_confidence must be between 0.0 and 1.0"));
}

#[test]
fn unknown_recognition_level_is_validation_error() {
    let home = TempDir::new().unwrap();
    rcpt(&home)
        .write_stdin(request(serde_json::json!({ "recognition_level": "turbo" })))
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("validation_error:"));
}

#[test]
fn unparsable_envelope_is_malformed_request() {
    let home = TempDir::new().unwrap();
    rcpt(&home)
        .write_stdin("{ not json")
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("malformed_request:"));
}

#[test]
fn empty_stdin_is_validation_error() {
    let home = TempDir::new().unwrap();
    rcpt(&home)
        .write_stdin("")
        .assert()
        .code(2)
        .stderr("validation_error: request body is empty\n");
}

#[test]
fn replayed_observations_are_filtered() {
    let home = TempDir::new().unwrap();
    let observations = write_observations(home.path());

    let output = rcpt(&home)
        .arg("recognize")
        .arg("--observations")
        .arg(&observations)
        .write_stdin(request(serde_json::json!({ "minimum_confidence": 0.5 })))
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    assert!(stdout.ends_with("}\n"));
    let response: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(response["text"], "Blue Bottle Coffee\nTotal $15.35");
    assert_eq!(response["warnings"], serde_json::json!(["low_confidence_filtered"]));
    assert!(stdout.find("\"text\"").unwrap() < stdout.find("\"warnings\"").unwrap());
}

#[test]
fn everything_below_threshold_reports_no_text() {
    let home = TempDir::new().unwrap();
    let observations = write_observations(home.path());

    rcpt(&home)
        .args(["recognize", "--observations"])
        .arg(&observations)
        .write_stdin(request(serde_json::json!({ "minimum_confidence": 1.0 })))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"text\": \"\""))
        .stdout(predicate::str::contains("low_confidence_filtered"))
        .stdout(predicate::str::contains("no_text_detected"));
}

#[test]
fn engine_failure_is_vision_error() {
    let home = TempDir::new().unwrap();

    rcpt(&home)
        .args(["recognize", "--observations"])
        .arg(home.path().join("missing.json"))
        .write_stdin(request(serde_json::json!({})))
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("vision_error:"))
        .stderr(predicate::function(|s: &str| s.lines().count() == 1));
}

#[test]
fn missing_models_are_vision_error() {
    let home = TempDir::new().unwrap();

    rcpt(&home)
        .args(["recognize", "--model-dir"])
        .arg(home.path().join("no-models"))
        .write_stdin(request(serde_json::json!({})))
        .assert()
        .code(3)
        .stderr(predicate::str::starts_with("vision_error: failed to load model"));
}

#[test]
fn invalid_request_does_not_touch_models() {
    let home = TempDir::new().unwrap();

    rcpt(&home)
        .args(["recognize", "--model-dir"])
        .arg(home.path().join("no-models"))
        .write_stdin(r#"{"image_png_base64": "!!!"}"#)
        .assert()
        .code(2)
        .stderr("validation_error: image_png_base64 is not valid base64\n");
}

#[test]
fn unreadable_config_is_internal_error() {
    let home = TempDir::new().unwrap();

    rcpt(&home)
        .arg("--config")
        .arg(home.path().join("absent.json"))
        .write_stdin(request(serde_json::json!({})))
        .assert()
        .code(4)
        .stderr(predicate::str::starts_with("internal_error:"));
}

#[test]
fn extract_reads_text_files() {
    let home = TempDir::new().unwrap();
    let receipt = home.path().join("receipt.txt");
    std::fs::write(
        &receipt,
        "Blue Bottle Coffee\n09/27/2025 08:41 AM\nSubtotal $12.35\nTax $1.00\nTip $2.00\nTotal $15.35\n",
    )
    .unwrap();

    let output = rcpt(&home)
        .args(["extract", "--locale", "en_US"])
        .arg(&receipt)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["merchant_name"], "Blue Bottle Coffee");
    assert_eq!(json["total_amount"], "15.35");
    assert_eq!(json["tax_amount"], "1.00");
    assert_eq!(json["tip_amount"], "2.00");
    assert_eq!(json["currency_code"], "USD");
    assert_eq!(json["purchase_date"], "2025-09-27T08:41:00");
}

#[test]
fn extract_csv_from_glob_and_stdin() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("a.txt"), "Deli\nTotal 4.50\n").unwrap();
    std::fs::write(home.path().join("b.txt"), "Cafe\nTotal €3.20\n").unwrap();
    let pattern = home.path().join("*.txt");

    rcpt(&home)
        .args(["extract", "--format", "csv", "--locale", "en_US"])
        .arg(pattern.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "source,merchant_name,purchase_date,total_amount,tax_amount,tip_amount,currency_code\n",
        ))
        .stdout(predicate::str::contains(",Deli,,4.50,4.50,4.50,\n"))
        .stdout(predicate::str::contains(",Cafe,,3.20,3.20,3.20,EUR\n"));

    rcpt(&home)
        .args(["extract", "--format", "text", "--locale", "en_US"])
        .write_stdin(r#"{"text": "Deli\nTotal $4.50", "warnings": []}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Merchant: Deli"))
        .stdout(predicate::str::contains("$4.50"));
}

#[test]
fn config_set_and_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("rcpt.json");

    rcpt(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    rcpt(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "recognition.minimum_confidence", "0.5"])
        .assert()
        .success();

    rcpt(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "recognition.minimum_confidence"])
        .assert()
        .success()
        .stdout("0.5\n");

    rcpt(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "recognition.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn models_status_reports_missing_files() {
    let home = TempDir::new().unwrap();

    rcpt(&home)
        .args(["models", "status", "--model-dir"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("det.onnx"))
        .stdout(predicate::str::contains("missing"));
}
