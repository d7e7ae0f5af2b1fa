//! End-to-end CLI tests for the harvester binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with the default config location pointed at an empty directory.
fn harvester(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("harvester").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--start-page"))
        .stdout(predicate::str::contains("--resolver"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("harvester"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_inverted_page_range_fails() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .args(["-s", "5", "-e", "4", "--resolver", "none"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start_page"));
}

#[test]
fn test_binary_missing_chrome_fails_before_crawling() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .args(["-s", "1", "-e", "1", "--base-url", "http://127.0.0.1:9"])
        .arg("--chrome")
        .arg(home.path().join("no-such-chromium"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to set up redirect resolver"));
}

#[test]
fn test_binary_missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    harvester(&home)
        .arg("--config")
        .arg(home.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config file"));
}

#[test]
fn test_binary_config_with_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("harvester.toml");
    std::fs::write(&config, "max_retries = 3\n").unwrap();
    harvester(&home)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_retries"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_downloads_pdf_from_mock_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search/keyword/docsupport"))
        .and(query_param("resultPage", "3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "docSupportResults": [{ "documentId": "ABC" }] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/search/documents/sds/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Ethanol SDS", "documentLocation": format!("{}/files/ethanol.pdf", server.uri()) }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/ethanol.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 ok".to_vec()),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = home.path().join("PDFs");
    let mut cmd = harvester(&home);
    cmd.args(["-s", "3", "-e", "3", "--resolver", "none", "-q", "--base-url"])
        .arg(server.uri())
        .arg("-o")
        .arg(&output);

    let result = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let written = std::fs::read(output.join("ethanol_sds.pdf")).unwrap();
    assert_eq!(written, b"%PDF-1.4 ok");
}
