mod server;

use assert_cmd::cargo;
use predicates::prelude::*;
use server::{GOOD_PAGE, Route, start_server};
use std::fs;

async fn page_url() -> String {
    let base = start_server(vec![Route::html("/", GOOD_PAGE)]).await;
    format!("{}/", base)
}

#[tokio::test]
async fn test_cli_help() {
    let mut cmd = cargo::cargo_bin_cmd!("pageaudit");
    let assert = cmd.arg("--help").assert();

    let expected_pattern = if cfg!(windows) {
        "pageaudit.exe [OPTIONS] <URL>"
    } else {
        "pageaudit [OPTIONS] <URL>"
    };

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(expected_pattern))
        .stdout(predicate::str::contains("--no-security-scan"))
        .stdout(predicate::str::contains("--compare"));
}

#[tokio::test]
async fn test_cli_rejects_invalid_url() {
    let mut cmd = cargo::cargo_bin_cmd!("pageaudit");
    cmd.arg("example.com")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid URL provided"));
}

#[tokio::test]
async fn test_cli_rejects_unsupported_config_format() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("pageaudit.ini");
    fs::write(&config, "timeout = 5").unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("pageaudit");
    cmd.arg("--config")
        .arg(&config)
        .arg("https://example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported config file format"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_json_output() {
    let url = page_url().await;

    let mut cmd = cargo::cargo_bin_cmd!("pageaudit");
    let output = cmd
        .args(["--output", "json", "--no-performance", &url])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["version"], "2.0");
    assert_eq!(report["url"], url.as_str());
    assert!(report["overall_score"].as_u64().unwrap() <= 100);
    assert_eq!(report["category_scores"]["performance"], 0);
    assert!(report["issues"].as_array().unwrap().len() > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_text_output() {
    let url = page_url().await;

    let mut cmd = cargo::cargo_bin_cmd!("pageaudit");
    cmd.env("NO_COLOR", "1")
        .args(["--no-performance", &url])
        .assert()
        .success()
        .stdout(predicate::str::contains("PageAudit - SEO Audit Report"))
        .stdout(predicate::str::contains("Overall Score:"))
        .stdout(predicate::str::contains("Executive Summary"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_save_and_compare() {
    let url = page_url().await;
    let dir = tempfile::tempdir().unwrap();
    let saved = dir.path().join("report.json");

    let mut first = cargo::cargo_bin_cmd!("pageaudit");
    first
        .args(["--output", "json", "--no-performance", "--save"])
        .arg(&saved)
        .arg(&url)
        .assert()
        .success()
        .stderr(predicate::str::contains("Report saved to:"));

    let previous: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&saved).unwrap()).unwrap();
    assert!(previous["comparison"].is_null());

    let mut second = cargo::cargo_bin_cmd!("pageaudit");
    let output = second
        .args(["--output", "json", "--no-performance", "--compare"])
        .arg(&saved)
        .arg(&url)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["comparison"]["previous_score"],
        previous["overall_score"]
    );
    assert_eq!(report["comparison"]["trend_direction"], "stable");
    assert_eq!(report["comparison"]["new_issues"], serde_json::json!([]));
}
