mod server;

use pageaudit::analyzers::content::LinkTarget;
use pageaudit::http_client::build_http_client;
use pageaudit::link_checker::LinkChecker;
use server::{Route, start_server};
use std::time::Instant;

fn link_routes() -> Vec<Route> {
    vec![
        Route::text("/ok", "text/plain", "OK"),
        Route::redirect("/redirect", 301, "/ok"),
        Route::redirect("/redirect-temp", 302, "/ok"),
        Route::status("/server-error", 500),
    ]
}

fn target(base: &str, path: &str) -> LinkTarget {
    LinkTarget {
        url: format!("{}{}", base, path),
        is_external: false,
    }
}

#[tokio::test]
async fn test_link_checker_statuses() {
    let base = start_server(link_routes()).await;
    let client = build_http_client(5, "PageAudit-Test/1.0", true).unwrap();
    let checker = LinkChecker::new(client, 4, None);

    let targets: Vec<_> = ["/ok", "/not-found", "/redirect", "/redirect-temp", "/server-error"]
        .iter()
        .map(|path| target(&base, path))
        .collect();
    let statuses = checker.check_all(&targets).await;

    assert_eq!(statuses.len(), 5);
    // Results keep the input order regardless of completion order
    for (status, target) in statuses.iter().zip(&targets) {
        assert_eq!(status.url, target.url);
    }

    assert_eq!(statuses[0].status_code, Some(200));
    assert_eq!(statuses[0].redirected_url, None);
    assert!(!statuses[0].is_broken());

    assert_eq!(statuses[1].status_code, Some(404));
    assert!(statuses[1].is_broken());

    let ok_url = format!("{}/ok", base);
    assert_eq!(statuses[2].status_code, Some(200));
    assert_eq!(statuses[2].redirected_url.as_deref(), Some(ok_url.as_str()));
    assert_eq!(statuses[3].redirected_url.as_deref(), Some(ok_url.as_str()));

    assert_eq!(statuses[4].status_code, Some(500));
    assert!(statuses[4].is_broken());
}

#[tokio::test]
async fn test_link_checker_connection_failure_is_broken() {
    let client = build_http_client(2, "PageAudit-Test/1.0", true).unwrap();
    let checker = LinkChecker::new(client, 1, None);

    // Port 9 (discard) is not expected to accept HTTP connections locally
    let statuses = checker
        .check_all(&[LinkTarget {
            url: "http://127.0.0.1:9/".to_string(),
            is_external: true,
        }])
        .await;

    assert_eq!(statuses[0].status_code, None);
    assert!(statuses[0].error.is_some());
    assert!(statuses[0].is_broken());
    assert!(statuses[0].is_external);
}

#[tokio::test]
async fn test_link_checker_rate_limit() {
    let base = start_server(link_routes()).await;
    let client = build_http_client(5, "PageAudit-Test/1.0", true).unwrap();
    let checker = LinkChecker::new(client, 5, Some(2.0));

    let targets: Vec<_> = (0..4).map(|_| target(&base, "/ok")).collect();
    let start = Instant::now();
    let statuses = checker.check_all(&targets).await;

    assert!(statuses.iter().all(|s| s.status_code == Some(200)));
    // Burst of 2, then roughly one request every 500ms
    assert!(start.elapsed().as_millis() >= 800);
}
