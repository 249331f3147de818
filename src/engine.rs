//! The audit pipeline: validate, fetch once, analyze, score, report.

use crate::analyzers::content::LinkTarget;
use crate::analyzers::{accessibility, content, mobile, performance, schema, security, technical};
use crate::comparison;
use crate::error::AuditError;
use crate::http_client::{MAX_REDIRECTS, build_http_client};
use crate::issues::generate_issues;
use crate::link_checker::{self, LinkChecker};
use crate::models::{
    AccessibilityAudit, AuditConfiguration, AuditProgress, AuditStage, Canonical, ContentAnalysis,
    Crawlability, EnhancedAuditResult, HtmlSitemap, Indexability, MetaRobots, MobileUsability,
    PerformanceMetrics, RedirectHop, SchemaMarkup, SecurityAudit, Sitemaps, TechnicalSeo,
    UrlStructure,
};
use crate::robots::analyze_robots_txt;
use crate::scoring::{self, Findings};
use crate::summary;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{self, HeaderMap};
use scraper::Html;
use std::time::{Duration, Instant};
use url::Url;

pub const REPORT_VERSION: &str = "2.0";

/// The page as fetched, after following redirects
#[derive(Debug)]
pub struct FetchedPage {
    pub final_url: Url,
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: String,
    pub redirect_chain: Vec<RedirectHop>,
    pub load_time_ms: u64,
    pub response_size: usize,
}

/// Everything computed from the parsed document
struct DocumentReport {
    meta_robots: MetaRobots,
    canonical: Canonical,
    html_sitemap: HtmlSitemap,
    url_structure: UrlStructure,
    content: ContentAnalysis,
    security: SecurityAudit,
    mobile: MobileUsability,
    schema: SchemaMarkup,
    accessibility: Option<AccessibilityAudit>,
    link_targets: Vec<LinkTarget>,
}

pub struct AuditEngine {
    config: AuditConfiguration,
    /// Redirects disabled; the engine follows them itself to record the chain
    page_client: reqwest::Client,
    client: reqwest::Client,
    previous: Option<EnhancedAuditResult>,
    progress: AuditProgress,
    progress_bar: Option<ProgressBar>,
}

impl AuditEngine {
    pub fn new(mut config: AuditConfiguration) -> Result<Self, AuditError> {
        if config.depth > 1 {
            tracing::warn!(
                depth = config.depth,
                "Only single-page audits are supported, using depth 1"
            );
            config.depth = 1;
        }

        let page_client = build_http_client(config.timeout_secs, &config.user_agent, false)?;
        let client = build_http_client(config.timeout_secs, &config.user_agent, true)?;

        Ok(Self {
            config,
            page_client,
            client,
            previous: None,
            progress: AuditProgress::default(),
            progress_bar: None,
        })
    }

    /// Compare the next run against this earlier report
    pub fn with_previous_result(mut self, previous: EnhancedAuditResult) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Mirror pipeline progress on a terminal spinner
    pub fn enable_progress_bar(&mut self) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("[{elapsed_precise}] {spinner:.cyan} {msg}")
                .expect("Progress bar template should be valid"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        self.progress_bar = Some(pb);
    }

    pub fn progress(&self) -> &AuditProgress {
        &self.progress
    }

    pub fn config(&self) -> &AuditConfiguration {
        &self.config
    }

    fn update_progress(&mut self, stage: AuditStage, progress: u8, task: &str) {
        tracing::debug!(?stage, progress, task, "Audit progress");
        self.progress.stage = stage;
        self.progress.progress = progress;
        self.progress.current_task = task.to_string();
        if let Some(pb) = &self.progress_bar {
            pb.set_message(task.to_string());
        }
    }

    fn record_error(&mut self, message: String) {
        tracing::warn!(error = %message, "Audit sub-check degraded");
        self.progress.errors.push(message);
    }

    /// Runs the full pipeline for one page.
    ///
    /// Only an invalid URL, a failed page fetch or (when configured) a robots.txt
    /// refusal abort the run. Everything else degrades its own section.
    pub async fn run_audit(&mut self, url: &str) -> Result<EnhancedAuditResult, AuditError> {
        self.progress = AuditProgress::default();

        match self.audit(url).await {
            Ok(result) => {
                self.update_progress(AuditStage::Complete, 100, "Audit complete");
                if let Some(pb) = &self.progress_bar {
                    pb.finish_with_message(format!("Audit complete: {}/100", result.overall_score));
                }
                Ok(result)
            }
            Err(e) => {
                self.update_progress(AuditStage::Error, self.progress.progress, "Audit failed");
                self.progress.errors.push(e.to_string());
                if let Some(pb) = &self.progress_bar {
                    pb.abandon_with_message(format!("Audit failed: {}", e));
                }
                Err(e)
            }
        }
    }

    async fn audit(&mut self, input: &str) -> Result<EnhancedAuditResult, AuditError> {
        let url = validate_url(input)?;

        self.update_progress(AuditStage::Crawling, 10, "Checking robots.txt");
        let robots_lookup = analyze_robots_txt(&self.client, &url, &self.config.user_agent).await;
        if let Some(error) = robots_lookup.fetch_error {
            self.record_error(error);
        }
        let robots_txt = robots_lookup.report;
        if self.config.respect_robots_txt && robots_txt.found && !robots_txt.allows {
            return Err(AuditError::DisallowedByRobots(url.to_string()));
        }

        self.update_progress(AuditStage::Crawling, 20, "Fetching page");
        let page = fetch_page(&self.page_client, &url).await?;
        self.progress.pages_processed = 1;
        tracing::info!(
            url = %page.final_url,
            status = page.status_code,
            load_time_ms = page.load_time_ms,
            bytes = page.response_size,
            "Fetched page"
        );

        self.update_progress(AuditStage::Analyzing, 40, "Analyzing document");
        let mut doc = analyze_document(&page, &self.config);

        self.update_progress(
            AuditStage::Analyzing,
            60,
            "Checking sitemap, performance and links",
        );
        let targets = if self.config.check_broken_links {
            link_checker::select_targets(
                &doc.link_targets,
                self.config.include_external,
                self.config.page_limit,
            )
        } else {
            vec![]
        };
        let checker = LinkChecker::new(
            self.client.clone(),
            self.config.concurrency,
            self.config.rate_limit,
        );
        let client = &self.client;
        let include_performance = self.config.include_performance;
        let check_links = self.config.check_broken_links;

        let (sitemap_lookup, performance, link_statuses) = tokio::join!(
            technical::analyze_xml_sitemap(client, &page.final_url, &robots_txt.sitemaps),
            async {
                if include_performance {
                    Some(performance::measure(client, page.final_url.as_str()).await)
                } else {
                    None
                }
            },
            async {
                if check_links {
                    checker.check_all(&targets).await
                } else {
                    vec![]
                }
            },
        );

        for error in sitemap_lookup.fetch_errors {
            self.record_error(error);
        }
        let xml_sitemap = sitemap_lookup.sitemap;
        let performance = match performance {
            Some(Ok(metrics)) => Some(metrics),
            Some(Err(e)) => {
                self.record_error(format!("Performance analysis failed: {}", e));
                Some(PerformanceMetrics::default())
            }
            None => None,
        };
        link_checker::apply_results(
            &link_statuses,
            &mut doc.content.internal_links,
            &mut doc.content.external_links,
        );

        self.update_progress(AuditStage::Generating, 85, "Calculating scores");
        let technical_seo = TechnicalSeo {
            indexability: Indexability {
                robots_txt,
                meta_robots: doc.meta_robots,
                canonical: doc.canonical,
            },
            crawlability: Crawlability {
                status_code: page.status_code,
                redirect_chain: page.redirect_chain,
                load_time_ms: page.load_time_ms,
                response_size: page.response_size,
            },
            sitemaps: Sitemaps {
                xml_sitemap,
                html_sitemap: doc.html_sitemap,
            },
            url_structure: doc.url_structure,
        };

        let findings = Findings {
            technical: &technical_seo,
            performance: performance.as_ref(),
            accessibility: doc.accessibility.as_ref(),
            content: &doc.content,
            security: &doc.security,
            mobile: &doc.mobile,
            schema: &doc.schema,
        };
        let category_scores = scoring::category_scores(&findings);
        let overall_score = scoring::overall_score(&category_scores);

        self.update_progress(
            AuditStage::Generating,
            95,
            "Generating issues and recommendations",
        );
        let issues = generate_issues(&findings, &self.config);
        let quick_wins = summary::quick_wins(&issues);
        let executive_summary =
            summary::executive_summary(overall_score, &category_scores, &issues);
        let comparison = self
            .previous
            .as_ref()
            .map(|previous| comparison::compare(overall_score, &issues, previous));

        Ok(EnhancedAuditResult {
            url: url.to_string(),
            scanned_at: chrono::Utc::now().to_rfc3339(),
            version: REPORT_VERSION.to_string(),
            overall_score,
            category_scores,
            technical_seo,
            performance: performance.unwrap_or_default(),
            accessibility: doc.accessibility.unwrap_or_default(),
            content: doc.content,
            security: doc.security,
            mobile: doc.mobile,
            schema: doc.schema,
            issues,
            quick_wins,
            comparison,
            summary: executive_summary,
        })
    }
}

/// Parses and normalizes an audit target; only absolute http(s) URLs with a host are accepted.
pub fn validate_url(input: &str) -> Result<Url, AuditError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| AuditError::InvalidUrl(format!("{} ({})", trimmed, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(AuditError::UnsupportedScheme(scheme.to_string())),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AuditError::InvalidUrl(trimmed.to_string()));
    }

    Ok(url)
}

fn redirect_kind(status: u16) -> &'static str {
    match status {
        301 | 308 => "permanent",
        _ => "temporary",
    }
}

/// GETs the page, following up to [`MAX_REDIRECTS`] redirects by hand.
/// `client` must not follow redirects itself.
pub async fn fetch_page(client: &reqwest::Client, url: &Url) -> Result<FetchedPage, AuditError> {
    let start = Instant::now();
    let mut current = url.clone();
    let mut redirect_chain = Vec::new();

    loop {
        let response = client.get(current.as_str()).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let Some(location) = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return Err(AuditError::HttpStatus {
                    status: status.as_u16(),
                    reason: "redirect without a Location header".to_string(),
                });
            };
            if redirect_chain.len() >= MAX_REDIRECTS {
                return Err(AuditError::TooManyRedirects(url.to_string()));
            }

            let next = current
                .join(location)
                .map_err(|e| AuditError::InvalidUrl(format!("{} ({})", location, e)))?;
            tracing::debug!(
                from = %current,
                to = %next,
                status = status.as_u16(),
                "Following redirect"
            );

            redirect_chain.push(RedirectHop {
                url: current.to_string(),
                status_code: status.as_u16(),
                kind: redirect_kind(status.as_u16()).to_string(),
            });
            current = next;
            continue;
        }

        if !status.is_success() {
            return Err(AuditError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let headers = response.headers().clone();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.is_empty()
            && !content_type.contains("text/html")
            && !content_type.contains("application/xhtml")
        {
            tracing::warn!(
                url = %current,
                content_type = %content_type,
                "Non-HTML content type detected, parsing may fail"
            );
        }

        let bytes = response.bytes().await?;
        let load_time_ms = start.elapsed().as_millis() as u64;

        return Ok(FetchedPage {
            final_url: current,
            status_code: status.as_u16(),
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            redirect_chain,
            load_time_ms,
            response_size: bytes.len(),
        });
    }
}

/// All analyses of the parsed document. Synchronous, so the parsed `Html` never
/// lives across an await point.
fn analyze_document(page: &FetchedPage, config: &AuditConfiguration) -> DocumentReport {
    let document = Html::parse_document(&page.body);
    let page_url = &page.final_url;

    DocumentReport {
        meta_robots: technical::meta_robots(&document),
        canonical: technical::canonical(&document, page_url),
        html_sitemap: technical::html_sitemap(&document),
        url_structure: technical::url_structure(page_url),
        content: content::analyze(&document, page_url, &config.target_keywords),
        security: security::analyze(&document, page_url, &page.headers, config.include_security),
        mobile: mobile::analyze(&document),
        schema: schema::analyze(&document, config.include_schema_validation),
        accessibility: config
            .include_accessibility
            .then(|| accessibility::analyze(&document)),
        link_targets: content::link_targets(&document, page_url),
    }
}
