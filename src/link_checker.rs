use crate::analyzers::content::LinkTarget;
use crate::models::{ExternalLinks, InternalLinks};
use futures::stream::{self, StreamExt};
use governor::{
    Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::direct::NotKeyed,
};
use std::num::NonZeroU32;

/// Outcome of verifying one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStatus {
    pub url: String,
    pub is_external: bool,
    /// `None` when the request itself failed
    pub status_code: Option<u16>,
    pub redirected_url: Option<String>,
    pub error: Option<String>,
}

impl LinkStatus {
    pub fn is_broken(&self) -> bool {
        self.status_code.is_none_or(|code| code >= 400)
    }
}

pub struct LinkChecker {
    client: reqwest::Client,
    concurrency: usize,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl LinkChecker {
    /// `client` should follow redirects; a link is judged by where it ends up.
    pub fn new(
        client: reqwest::Client,
        concurrency: usize,
        requests_per_second: Option<f64>,
    ) -> Self {
        let rate_limiter = requests_per_second
            .filter(|rps| rps.is_finite() && *rps > 0.0)
            .and_then(|rps| NonZeroU32::new(rps.ceil() as u32))
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Self {
            client,
            concurrency: concurrency.max(1),
            rate_limiter,
        }
    }

    /// Checks every target and returns the statuses in input order.
    pub async fn check_all(&self, targets: &[LinkTarget]) -> Vec<LinkStatus> {
        let mut results = stream::iter(targets.iter().enumerate())
            .map(|(idx, target)| async move { (idx, self.check_link(target).await) })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|(idx, _)| *idx);
        results.into_iter().map(|(_, status)| status).collect()
    }

    async fn check_link(&self, target: &LinkTarget) -> LinkStatus {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        // GET rather than HEAD: many servers answer HEAD incorrectly
        match self.client.get(&target.url).send().await {
            Ok(response) => {
                let final_url = response.url().as_str();
                let redirected_url = (final_url != target.url).then(|| final_url.to_string());
                let status = response.status().as_u16();
                if status >= 400 {
                    tracing::debug!(url = %target.url, status, "Broken link");
                }

                LinkStatus {
                    url: target.url.clone(),
                    is_external: target.is_external,
                    status_code: Some(status),
                    redirected_url,
                    error: None,
                }
            }
            Err(e) => {
                tracing::debug!(url = %target.url, error = %e, "Link check failed");
                LinkStatus {
                    url: target.url.clone(),
                    is_external: target.is_external,
                    status_code: None,
                    redirected_url: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Internal links, plus external ones when asked, capped at `limit`
pub fn select_targets(
    targets: &[LinkTarget],
    include_external: bool,
    limit: usize,
) -> Vec<LinkTarget> {
    targets
        .iter()
        .filter(|t| include_external || !t.is_external)
        .take(limit)
        .cloned()
        .collect()
}

/// Writes broken counts and URLs into the content link stats
pub fn apply_results(
    statuses: &[LinkStatus],
    internal: &mut InternalLinks,
    external: &mut ExternalLinks,
) {
    for status in statuses.iter().filter(|s| s.is_broken()) {
        if status.is_external {
            external.broken += 1;
            external.broken_urls.push(status.url.clone());
        } else {
            internal.broken += 1;
            internal.broken_urls.push(status.url.clone());
        }
    }
}
