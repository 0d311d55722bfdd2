// ABOUTME: Integration tests for the docmark CLI binary.
// ABOUTME: Tests file and stdin input, JSON and file output, and error exits.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Test Page</title></head>
<body>
<main><h1>Heading</h1><p>Hi there</p></main>
</body>
</html>"#;

fn docmark_cmd() -> Command {
    Command::cargo_bin("docmark").unwrap()
}

fn write_page(dir: &TempDir) -> std::path::PathBuf {
    let html_path = dir.path().join("page.html");
    fs::write(&html_path, PAGE).unwrap();
    html_path
}

#[test]
fn converts_html_file_to_markdown() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("title: \"Test Page\""))
        .stdout(predicate::str::contains("url: \"https://example.com/doc\""))
        .stdout(predicate::str::contains("# Heading"))
        .stdout(predicate::str::contains("Hi there"));
}

#[test]
fn reads_stdin_and_overrides_title() {
    assert_cmd::Command::cargo_bin("docmark")
        .unwrap()
        .arg("--url")
        .arg("https://example.com/doc")
        .arg("--title")
        .arg("Custom")
        .write_stdin(PAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains("title: \"Custom\""))
        .stdout(predicate::str::contains("Hi there"));
}

#[test]
fn json_output_includes_markdown_and_filename() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);

    let output = docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["title"], "Test Page");
    assert_eq!(value["url"], "https://example.com/doc");
    assert!(value["body"].as_str().unwrap().contains("Hi there"));
    assert!(value["markdown"].as_str().unwrap().starts_with("---\n"));
    let filename = value["filename"].as_str().unwrap();
    assert!(filename.starts_with("doc-"));
    assert!(filename.ends_with(".md"));
    assert!(!filename.contains(':'));
}

#[test]
fn writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);
    let out_path = temp_dir.path().join("out.md");

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .arg("-o")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("Hi there"));
}

#[test]
fn timing_goes_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .arg("--timing")
        .assert()
        .success()
        .stderr(predicate::str::contains("elapsed:"));
}

#[test]
fn malformed_url_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("not a url")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("input error"));
}

#[test]
fn bad_profile_fails() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = write_page(&temp_dir);
    let profile_path = temp_dir.path().join("profile.json");
    fs::write(&profile_path, "{ \"name\": 1 }").unwrap();

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .arg("--profile")
        .arg(&profile_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn missing_input_file_fails() {
    docmark_cmd()
        .arg("--html")
        .arg("/nonexistent/page.html")
        .arg("--url")
        .arg("https://example.com/doc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn empty_page_prints_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("empty.html");
    fs::write(&html_path, "<html><body></body></html>").unwrap();

    docmark_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/doc")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
