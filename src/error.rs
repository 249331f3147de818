use thiserror::Error;

/// Failures that abort an audit run.
///
/// Sub-check failures (robots.txt, sitemap, performance timing, link checks) are
/// not represented here: they degrade their own section of the report instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Invalid URL provided: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL scheme '{0}': only http and https are supported")]
    UnsupportedScheme(String),

    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("Too many redirects while fetching {0}")]
    TooManyRedirects(String),

    #[error("Auditing {0} is disallowed by robots.txt")]
    DisallowedByRobots(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}
