mod server;

use clap::Parser;
use pageaudit::cli::Cli;
use pageaudit::http_client::DEFAULT_USER_AGENT;
use pageaudit::run;
use server::{GOOD_PAGE, Route, start_server};
use std::fs;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["pageaudit"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_cli_defaults() {
    let cli = parse(&["https://example.com"]);

    assert_eq!(cli.url, "https://example.com");
    assert_eq!(cli.output, "text");
    assert_eq!(cli.save, None);
    assert!(!cli.verbose);
    assert!(cli.keywords.is_empty());
    assert!(!cli.no_performance);
    assert!(!cli.no_accessibility);
    assert!(!cli.no_security_scan);
    assert!(!cli.check_links);
    assert!(!cli.external);
    assert!(!cli.respect_robots_txt);
    assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cli.timeout, 30);
    assert_eq!(cli.concurrency, 5);
    assert_eq!(cli.rate_limit, None);
    assert_eq!(cli.compare, None);
    assert_eq!(cli.config, None);
}

#[test]
fn test_cli_all_flags() {
    let cli = parse(&[
        "-o",
        "json",
        "-s",
        "out.json",
        "-v",
        "-k",
        "rust",
        "--keyword",
        "seo audit",
        "--no-performance",
        "--no-accessibility",
        "--no-security-scan",
        "--check-links",
        "--external",
        "--respect-robots-txt",
        "true",
        "--user-agent",
        "MyBot/1.0",
        "-t",
        "10",
        "-c",
        "3",
        "-r",
        "2.5",
        "--compare",
        "old.json",
        "--config",
        "pageaudit.toml",
        "https://example.com/page",
    ]);

    assert_eq!(cli.output, "json");
    assert_eq!(cli.save.as_deref(), Some("out.json"));
    assert!(cli.verbose);
    assert_eq!(cli.keywords, ["rust", "seo audit"]);
    assert!(cli.no_performance && cli.no_accessibility && cli.no_security_scan);
    assert!(cli.check_links && cli.external && cli.respect_robots_txt);
    assert_eq!(cli.user_agent, "MyBot/1.0");
    assert_eq!(cli.timeout, 10);
    assert_eq!(cli.concurrency, 3);
    assert_eq!(cli.rate_limit, Some(2.5));
    assert_eq!(cli.compare.as_deref(), Some("old.json"));
    assert_eq!(cli.config.as_deref(), Some("pageaudit.toml"));
}

#[test]
fn test_cli_requires_url() {
    assert!(Cli::try_parse_from(["pageaudit"]).is_err());
    assert!(Cli::try_parse_from(["pageaudit", "--respect-robots-txt", "maybe", "x"]).is_err());
}

#[tokio::test]
async fn test_run_rejects_unsupported_scheme() {
    let err = run(parse(&["ftp://example.com"])).await.unwrap_err();
    assert!(err.to_string().contains("Invalid URL scheme"));
}

#[tokio::test]
async fn test_run_fails_on_missing_config_file() {
    let err = run(parse(&["--config", "/nonexistent/pageaudit.toml", "https://example.com"]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[tokio::test]
async fn test_run_saves_report_using_config_file() {
    let base = start_server(vec![Route::html("/", GOOD_PAGE)]).await;
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("report.json");
    let config_path = dir.path().join("audit.yaml");
    fs::write(
        &config_path,
        format!(
            "output: json\nno_performance: true\nmin_word_count: 5\nsave: {}\n",
            report_path.display()
        ),
    )
    .unwrap();

    run(parse(&["--config", config_path.to_str().unwrap(), &base]))
        .await
        .unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["category_scores"]["performance"], 0);
    let ids: Vec<&str> = report["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|issue| issue["id"].as_str())
        .collect();
    assert!(!ids.contains(&"low-word-count"));
}

#[tokio::test]
async fn test_run_reports_http_errors() {
    let base = start_server(vec![Route::status("/down", 503)]).await;
    let err = run(parse(&["--no-performance", &format!("{}/down", base)]))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}
