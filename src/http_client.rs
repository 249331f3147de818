use reqwest::{Client, ClientBuilder, header, redirect::Policy};
use std::time::Duration;

/// Default user agent sent with every audit request
pub const DEFAULT_USER_AGENT: &str = "PageAudit-Bot/1.0 (+https://github.com/pageaudit/pageaudit)";

/// Upper bound on redirects, both for the manual page fetch and the shared client
pub const MAX_REDIRECTS: usize = 10;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const CONNECTION: &str = "keep-alive";

/// Creates a reqwest client with browser-like headers.
///
/// `follow_redirects` controls whether reqwest follows redirects itself. The page
/// fetch turns it off so the engine can record every hop of the chain.
pub fn build_http_client(
    timeout_secs: u64,
    user_agent: &str,
    follow_redirects: bool,
) -> reqwest::Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        header::HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::CONNECTION,
        header::HeaderValue::from_static(CONNECTION),
    );

    let policy = if follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    ClientBuilder::new()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(policy)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}
