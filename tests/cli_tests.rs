//! E2E tests for the link-checker CLI

#![allow(deprecated)] // cargo_bin deprecation - will update when assert_cmd stabilizes replacement

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn link_checker() -> Command {
    let mut cmd = Command::cargo_bin("link-checker").unwrap();
    cmd.env_remove("LINK_CHECKER_FILE")
        .env_remove("LINK_CHECKER_TIMEOUT")
        .env_remove("LINK_CHECKER_USER_AGENT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_page(dir: &Path, script: &str) -> String {
    let file_path = dir.join("index.html");
    fs::write(
        &file_path,
        format!("<html><body><script>\n{}\n</script></body></html>", script),
    )
    .unwrap();
    file_path.to_str().unwrap().to_string()
}

#[test]
fn test_help() {
    link_checker()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--user-agent"))
        .stdout(predicate::str::contains("--block"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_version() {
    link_checker()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("link-checker"));
}

#[test]
fn test_file_not_found() {
    let dir = tempdir().unwrap();
    link_checker()
        .arg(dir.path().join("missing.html"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("was not found"));
}

#[test]
fn test_default_file_not_found() {
    let dir = tempdir().unwrap();
    link_checker()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Parsing HTML file: index.html"))
        .stderr(predicate::str::contains("index.html"));
}

#[test]
fn test_no_data_blocks() {
    let dir = tempdir().unwrap();
    let page = write_page(dir.path(), "const somethingElse = [];");

    link_checker()
        .arg(&page)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Checking").not())
        .stderr(predicate::str::contains("Could not find"));
}

#[test]
fn test_blocks_without_urls() {
    let dir = tempdir().unwrap();
    let page = write_page(
        dir.path(),
        r#"const institutes = [{"name": "No link"}];
const jobBoards = [];"#,
    );

    link_checker()
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 data array(s)"))
        .stdout(predicate::str::contains("No URLs found to check"));
}

#[test]
fn test_unparseable_block_warns() {
    let dir = tempdir().unwrap();
    let page = write_page(
        dir.path(),
        r#"const institutes = [{"name": "A" "url": "x"}];
const jobBoards = [];"#,
    );

    link_checker()
        .arg(&page)
        .assert()
        .success()
        .stderr(predicate::str::contains("institutes"))
        .stdout(predicate::str::contains("No URLs found to check"));
}

#[test]
fn test_timeout_validation() {
    link_checker()
        .args(["--timeout", "0", "index.html"])
        .assert()
        .failure();
}

#[tokio::test]
async fn test_reports_broken_links() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let page = write_page(
        dir.path(),
        &format!(
            r#"const institutes = [{{"name":"A","url":"{0}/good",}},{{"name":"B","url":"{0}/bad"}}];"#,
            server.uri()
        ),
    );

    link_checker()
        .arg(&page)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Checking (1/2)"))
        .stdout(predicate::str::contains("  -> OK"))
        .stdout(predicate::str::contains("  -> FAILED: Status 404"))
        .stdout(predicate::str::contains("Found 1 broken links:"))
        .stdout(predicate::str::contains(format!(
            "  - {}/bad (Status 404)",
            server.uri()
        )));
}

#[tokio::test]
async fn test_all_links_ok_json() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let page = write_page(
        dir.path(),
        &format!(
            "const jobBoards = [{{ name: 'Board', url: '{0}/good', homepageUrl: '{0}/good' }}];",
            server.uri()
        ),
    );

    let output = link_checker()
        .args([page.as_str(), "--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Checking (1/1)"))
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["ok"], 1);
    assert_eq!(json["failed"], 0);
    assert_eq!(json["results"][0]["status"], "OK");
}
