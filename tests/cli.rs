use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::NamedTempFile;

#[test]
fn health_prints_fixed_ok_status() {
    let mut cmd = Command::cargo_bin("doc-merge").expect("Binary exists");
    cmd.arg("health");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"ok\""));
}

#[test]
fn merge_with_missing_request_file_fails_with_diagnostic() {
    let mut cmd = Command::cargo_bin("doc-merge").expect("Binary exists");
    cmd.arg("merge").arg("--request").arg("/no/such/request.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read request file"));
}

#[test]
fn merge_with_malformed_request_json_fails_with_diagnostic() {
    let request = NamedTempFile::new().expect("Creating temp request file failed");
    write(request.path(), b"{ not json").expect("Writing temp request failed");

    let mut cmd = Command::cargo_bin("doc-merge").expect("Binary exists");
    cmd.arg("merge").arg("--request").arg(request.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse merge request"));
}

#[test]
fn merge_without_store_configuration_is_a_configuration_error() {
    let request = NamedTempFile::new().expect("Creating temp request file failed");
    write(
        request.path(),
        br#"{"job_id":"abc123","template_url":"https://docs.example.com/t.docx","module_urls":["https://docs.example.com/m.docx"]}"#,
    )
    .expect("Writing temp request failed");

    let mut cmd = Command::cargo_bin("doc-merge").expect("Binary exists");
    cmd.arg("merge")
        .arg("--request")
        .arg(request.path())
        .env_remove("OBJECT_STORE_URL")
        .env_remove("OBJECT_STORE_SERVICE_KEY");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
