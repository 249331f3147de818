//! Turns the sub-reports into a prioritized list of actionable issues.

use crate::models::{
    AccessibilityAudit, AuditConfiguration, AuditIssue, ContentAnalysis, Effort, IssueCategory,
    MobileUsability, PerformanceMetrics, Priority, Resource, ResourceKind, SchemaMarkup,
    SecurityAudit, TechnicalSeo, ViolationImpact,
};
use crate::scoring::Findings;

const LCP_TARGET_MS: f64 = 2500.0;
const CLS_TARGET: f64 = 0.1;
const SLOW_RESPONSE_MS: u64 = 3000;
const MIN_READABILITY: u8 = 60;

/// Small builder so each rule reads as one block
struct Draft(AuditIssue);

impl Draft {
    fn new(id: &str, category: IssueCategory, priority: Priority, effort: Effort) -> Self {
        Self(AuditIssue {
            id: id.to_string(),
            category,
            priority,
            title: String::new(),
            description: String::new(),
            impact: String::new(),
            effort,
            recommendation: String::new(),
            resources: vec![],
            affected_elements: vec![],
        })
    }

    fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = title.into();
        self
    }

    fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = description.into();
        self
    }

    fn impact(mut self, impact: impl Into<String>) -> Self {
        self.0.impact = impact.into();
        self
    }

    fn recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.0.recommendation = recommendation.into();
        self
    }

    fn resource(mut self, kind: ResourceKind, title: &str, url: &str) -> Self {
        self.0.resources.push(Resource {
            title: title.to_string(),
            url: url.to_string(),
            kind,
        });
        self
    }

    fn docs(self, title: &str, url: &str) -> Self {
        self.resource(ResourceKind::Documentation, title, url)
    }

    fn affects<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.affected_elements = elements.into_iter().map(Into::into).collect();
        self
    }

    fn build(self) -> AuditIssue {
        self.0
    }
}

/// Every violated rule becomes one issue. The result is sorted by priority;
/// within a priority the rule order below is kept.
pub fn generate_issues(findings: &Findings, config: &AuditConfiguration) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    issues.extend(technical_issues(findings.technical, config));
    issues.extend(content_issues(findings.content, config));
    issues.extend(security_issues(findings.security));
    issues.extend(mobile_issues(findings.mobile));
    if let Some(performance) = findings.performance {
        issues.extend(performance_issues(performance, config));
    }
    if let Some(accessibility) = findings.accessibility {
        issues.extend(accessibility_issues(accessibility, config));
    }
    issues.extend(schema_issues(findings.schema));

    issues.sort_by_key(|issue| issue.priority);
    issues
}

fn technical_issues(technical: &TechnicalSeo, config: &AuditConfiguration) -> Vec<AuditIssue> {
    let robots = &technical.indexability.robots_txt;
    let canonical = &technical.indexability.canonical;
    let crawlability = &technical.crawlability;
    let mut issues = Vec::new();

    if !robots.found {
        issues.push(
            Draft::new(
                "robots-txt-missing",
                IssueCategory::Technical,
                Priority::Important,
                Effort::Low,
            )
            .title("Missing robots.txt file")
            .description("No robots.txt file found")
            .impact("Search engines may have difficulty crawling your site")
            .recommendation("Create a robots.txt file")
            .docs(
                "Robots.txt Guide",
                "https://developers.google.com/search/docs/crawling-indexing/robots/intro",
            )
            .affects(["/robots.txt"])
            .build(),
        );
    } else if !robots.allows {
        issues.push(
            Draft::new(
                "robots-txt-blocking",
                IssueCategory::Technical,
                Priority::Critical,
                Effort::Low,
            )
            .title("Page blocked by robots.txt")
            .description("robots.txt disallows crawling of this page")
            .impact("Search engines will not crawl the page and may drop it from results")
            .recommendation("Remove or narrow the Disallow rule that matches this URL")
            .docs(
                "Robots.txt Guide",
                "https://developers.google.com/search/docs/crawling-indexing/robots/intro",
            )
            .resource(
                ResourceKind::Tool,
                "robots.txt Tester",
                "https://support.google.com/webmasters/answer/6062598",
            )
            .affects(["/robots.txt"])
            .build(),
        );
    }

    if technical.indexability.meta_robots.noindex {
        issues.push(
            Draft::new("noindex", IssueCategory::Technical, Priority::Critical, Effort::Low)
                .title("Page is marked noindex")
                .description("The robots meta tag tells search engines not to index this page")
                .impact("The page will not appear in search results")
                .recommendation("Remove noindex from the robots meta tag if the page should rank")
                .docs(
                    "Robots meta tag",
                    "https://developers.google.com/search/docs/crawling-indexing/robots-meta-tag",
                )
                .affects([r#"meta[name="robots"]"#])
                .build(),
        );
    }

    if !canonical.found {
        issues.push(
            Draft::new(
                "canonical-missing",
                IssueCategory::Technical,
                Priority::Important,
                Effort::Low,
            )
            .title("Missing canonical URL")
            .description("Page does not declare a canonical URL")
            .impact("Duplicate URLs may split ranking signals")
            .recommendation(r#"Add <link rel="canonical"> pointing to the preferred URL"#)
            .docs(
                "Canonical URLs",
                "https://developers.google.com/search/docs/crawling-indexing/consolidate-duplicate-urls",
            )
            .affects(["head"])
            .build(),
        );
    } else if !canonical.is_self_referencing {
        issues.push(
            Draft::new("canonical-mismatch", IssueCategory::Technical, Priority::Low, Effort::Low)
                .title("Canonical URL points elsewhere")
                .description(format!(
                    "Canonical URL is {}",
                    canonical.url.as_deref().unwrap_or("unknown")
                ))
                .impact("Search engines may index the canonical target instead of this page")
                .recommendation("Make sure the canonical URL is the intended version of this page")
                .docs(
                    "Canonical URLs",
                    "https://developers.google.com/search/docs/crawling-indexing/consolidate-duplicate-urls",
                )
                .affects(canonical.url.iter().cloned().chain(canonical.errors.iter().cloned()))
                .build(),
        );
    }

    if crawlability.status_code != 200 {
        issues.push(
            Draft::new(
                "http-status-error",
                IssueCategory::Technical,
                Priority::Critical,
                Effort::High,
            )
            .title(format!("HTTP {} Error", crawlability.status_code))
            .description(format!(
                "Page returns {} status code",
                crawlability.status_code
            ))
            .impact("Page may not be indexed by search engines")
            .recommendation("Fix server configuration to return 200 status code")
            .docs(
                "HTTP Status Codes",
                "https://developer.mozilla.org/en-US/docs/Web/HTTP/Status",
            )
            .affects(["page"])
            .build(),
        );
    }

    if crawlability.redirect_chain.len() > 1 {
        issues.push(
            Draft::new("redirect-chain", IssueCategory::Technical, Priority::Important, Effort::Low)
                .title("Redirect chain")
                .description(format!(
                    "The page is reached through {} redirects",
                    crawlability.redirect_chain.len()
                ))
                .impact("Each hop adds latency and can lose ranking signals")
                .recommendation("Link directly to the final URL and redirect in a single hop")
                .docs(
                    "Redirects and Google Search",
                    "https://developers.google.com/search/docs/crawling-indexing/301-redirects",
                )
                .affects(crawlability.redirect_chain.iter().map(|hop| hop.url.clone()))
                .build(),
        );
    }

    if crawlability.load_time_ms > SLOW_RESPONSE_MS {
        issues.push(
            Draft::new(
                "slow-response",
                IssueCategory::Technical,
                Priority::Important,
                Effort::Medium,
            )
            .title("Slow server response")
            .description(format!(
                "The page took {} ms to download",
                crawlability.load_time_ms
            ))
            .impact("Slow pages are crawled less and frustrate visitors")
            .recommendation("Add caching and reduce server processing time")
            .docs("Reduce server response times", "https://web.dev/articles/ttfb")
            .affects(["page"])
            .build(),
        );
    }

    let max_bytes = config.max_page_size_kb.saturating_mul(1024);
    if crawlability.response_size > max_bytes {
        issues.push(
            Draft::new(
                "page-too-large",
                IssueCategory::Technical,
                Priority::Important,
                Effort::Medium,
            )
            .title("Page is too large")
            .description(format!(
                "HTML document is {} KB (limit: {} KB)",
                crawlability.response_size / 1024,
                config.max_page_size_kb
            ))
            .impact("Large documents load slowly and may be truncated by crawlers")
            .recommendation("Reduce inline markup, scripts and styles in the HTML document")
            .docs(
                "Avoid enormous network payloads",
                "https://developer.chrome.com/docs/lighthouse/performance/total-byte-weight",
            )
            .affects(["html"])
            .build(),
        );
    }

    if !technical.url_structure.is_clean {
        issues.push(
            Draft::new("unclean-url", IssueCategory::Technical, Priority::Low, Effort::Medium)
                .title("URL structure could be cleaner")
                .description("URL contains parameters, uppercase letters or special characters")
                .impact("Readable URLs are easier to share and understand")
                .recommendation("Use short lowercase paths with hyphen separated words")
                .docs(
                    "URL structure best practices",
                    "https://developers.google.com/search/docs/crawling-indexing/url-structure",
                )
                .affects(technical.url_structure.issues.iter().cloned())
                .build(),
        );
    }

    if !technical.sitemaps.xml_sitemap.found {
        issues.push(
            Draft::new(
                "xml-sitemap-missing",
                IssueCategory::Technical,
                Priority::Important,
                Effort::Low,
            )
            .title("Missing XML sitemap")
            .description("No XML sitemap was found in robots.txt or at /sitemap.xml")
            .impact("Search engines may discover new pages slowly")
            .recommendation("Publish an XML sitemap and reference it from robots.txt")
            .docs(
                "Build and submit a sitemap",
                "https://developers.google.com/search/docs/crawling-indexing/sitemaps/build-sitemap",
            )
            .affects(["/sitemap.xml"])
            .build(),
        );
    }

    issues
}

fn content_issues(content: &ContentAnalysis, config: &AuditConfiguration) -> Vec<AuditIssue> {
    let headings = &content.heading_structure;
    let mut issues = Vec::new();

    if content.word_count < config.min_word_count {
        issues.push(
            Draft::new(
                "low-word-count",
                IssueCategory::Content,
                Priority::Important,
                Effort::Medium,
            )
            .title("Low word count")
            .description(format!("Page has only {} words", content.word_count))
            .impact("May be considered thin content by search engines")
            .recommendation("Add more comprehensive, valuable content")
            .docs(
                "Content Quality Guidelines",
                "https://developers.google.com/search/docs/fundamentals/creating-helpful-content",
            )
            .affects(["body"])
            .build(),
        );
    }

    if content.word_count > 0 && content.readability_score < MIN_READABILITY {
        issues.push(
            Draft::new("poor-readability", IssueCategory::Content, Priority::Low, Effort::Medium)
                .title("Content is hard to read")
                .description(format!(
                    "Reading ease score is {} (target: {} or more)",
                    content.readability_score, MIN_READABILITY
                ))
                .impact("Visitors may leave before finding what they need")
                .recommendation("Use shorter sentences and simpler words")
                .resource(
                    ResourceKind::Guide,
                    "Flesch reading ease",
                    "https://en.wikipedia.org/wiki/Flesch%E2%80%93Kincaid_readability_tests",
                )
                .affects(["body"])
                .build(),
        );
    }

    if headings.h1_count == 0 {
        issues.push(
            Draft::new("missing-h1", IssueCategory::Seo, Priority::Critical, Effort::Low)
                .title("Missing H1 heading")
                .description("Page does not have an H1 heading")
                .impact("Reduced SEO performance and poor content structure")
                .recommendation("Add a descriptive H1 heading to the page")
                .docs(
                    "HTML Headings Best Practices",
                    "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/Heading_Elements",
                )
                .affects(["h1"])
                .build(),
        );
    } else if headings.h1_count > 1 {
        issues.push(
            Draft::new("multiple-h1", IssueCategory::Seo, Priority::Important, Effort::Low)
                .title("Multiple H1 headings")
                .description(format!("Page has {} H1 headings", headings.h1_count))
                .impact("The main topic of the page is ambiguous")
                .recommendation("Keep a single H1 and demote the others to H2")
                .docs(
                    "HTML Headings Best Practices",
                    "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/Heading_Elements",
                )
                .affects(["h1"])
                .build(),
        );
    }

    if !headings.missing_headings.is_empty() {
        issues.push(
            Draft::new("heading-hierarchy", IssueCategory::Content, Priority::Low, Effort::Low)
                .title("Heading levels are skipped")
                .description("The heading outline skips one or more levels")
                .impact("Screen readers and crawlers rely on a consistent outline")
                .recommendation("Nest headings one level at a time")
                .docs(
                    "HTML Headings Best Practices",
                    "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/Heading_Elements",
                )
                .affects(headings.missing_headings.iter().cloned())
                .build(),
        );
    }

    if content.images.without_alt > 0 {
        issues.push(
            Draft::new(
                "images-missing-alt",
                IssueCategory::Content,
                Priority::Important,
                Effort::Low,
            )
            .title("Images without alt text")
            .description(format!(
                "{} images have no alt attribute",
                content.images.without_alt
            ))
            .impact("Image search cannot understand the images and screen readers skip them")
            .recommendation("Describe every meaningful image with an alt attribute")
            .docs(
                "Image SEO best practices",
                "https://developers.google.com/search/docs/appearance/google-images",
            )
            .affects(["img"])
            .build(),
        );
    }

    if content.images.oversized > 0 {
        issues.push(
            Draft::new("oversized-images", IssueCategory::Content, Priority::Low, Effort::Medium)
                .title("Oversized images")
                .description(format!(
                    "{} images are declared wider or taller than 1200px",
                    content.images.oversized
                ))
                .impact("Large images slow down page loads")
                .recommendation("Serve responsive images sized for their display")
                .docs("Responsive images", "https://web.dev/learn/design/responsive-images")
                .affects(["img"])
                .build(),
        );
    }

    if content.internal_links.count == 0 {
        issues.push(
            Draft::new(
                "no-internal-links",
                IssueCategory::Content,
                Priority::Important,
                Effort::Low,
            )
            .title("No internal links")
            .description("Page does not link to any other page on the site")
            .impact("Crawlers and visitors cannot discover related content")
            .recommendation("Link to related pages with descriptive anchor text")
            .docs(
                "Make links crawlable",
                "https://developers.google.com/search/docs/crawling-indexing/links-crawlable",
            )
            .affects(["a[href]"])
            .build(),
        );
    }

    let broken = content.internal_links.broken + content.external_links.broken;
    if broken > 0 {
        issues.push(
            Draft::new("broken-links", IssueCategory::Content, Priority::Important, Effort::Low)
                .title("Broken links")
                .description(format!("{} links point to pages that fail to load", broken))
                .impact("Broken links waste crawl budget and frustrate visitors")
                .recommendation("Fix or remove links that return errors")
                .docs(
                    "HTTP Status Codes",
                    "https://developer.mozilla.org/en-US/docs/Web/HTTP/Status",
                )
                .affects(
                    content
                        .internal_links
                        .broken_urls
                        .iter()
                        .chain(&content.external_links.broken_urls)
                        .cloned(),
                )
                .build(),
        );
    }

    issues
}

fn slug(text: &str) -> String {
    let mut slug = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn security_issues(security: &SecurityAudit) -> Vec<AuditIssue> {
    let headers = &security.security_headers;
    let mut issues = Vec::new();

    if !security.https_enabled {
        issues.push(
            Draft::new("no-https", IssueCategory::Security, Priority::Critical, Effort::Medium)
                .title("HTTPS not enabled")
                .description("Site is not served over HTTPS")
                .impact("Security risk and negative SEO impact")
                .recommendation("Enable HTTPS with SSL certificate")
                .docs("Why HTTPS matters", "https://web.dev/articles/why-https-matters")
                .affects(["site"])
                .build(),
        );
    }

    if !security.mixed_content.is_empty() {
        issues.push(
            Draft::new(
                "mixed-content",
                IssueCategory::Security,
                Priority::Important,
                Effort::Medium,
            )
            .title("Mixed content detected")
            .description("HTTP resources loaded on HTTPS page")
            .impact("Security warnings and blocked content")
            .recommendation("Update all resource URLs to use HTTPS")
            .docs("What is mixed content?", "https://web.dev/articles/what-is-mixed-content")
            .affects(security.mixed_content.iter().map(|item| item.url.clone()))
            .build(),
        );
    }

    let missing: Vec<&str> = [
        (headers.strict_transport_security, "Strict-Transport-Security"),
        (headers.content_security_policy, "Content-Security-Policy"),
        (headers.x_frame_options, "X-Frame-Options"),
        (headers.x_content_type_options, "X-Content-Type-Options"),
        (headers.referrer_policy, "Referrer-Policy"),
    ]
    .into_iter()
    .filter(|(present, _)| !present)
    .map(|(_, name)| name)
    .collect();
    if !missing.is_empty() {
        issues.push(
            Draft::new(
                "missing-security-headers",
                IssueCategory::Security,
                Priority::Important,
                Effort::Low,
            )
            .title("Missing security headers")
            .description(format!("{} security headers are not set", missing.len()))
            .impact("Browsers cannot apply protections against common attacks")
            .recommendation("Configure the server to send the missing security headers")
            .docs(
                "HTTP security headers",
                "https://developer.mozilla.org/en-US/docs/Web/HTTP/Headers#security",
            )
            .resource(
                ResourceKind::Tool,
                "Security Headers scanner",
                "https://securityheaders.com/",
            )
            .affects(missing)
            .build(),
        );
    }

    for vulnerability in &security.vulnerabilities {
        issues.push(
            Draft::new(
                &format!("vulnerability-{}", slug(&vulnerability.kind)),
                IssueCategory::Security,
                Priority::Important,
                Effort::Medium,
            )
            .title(vulnerability.kind.clone())
            .description(vulnerability.description.clone())
            .impact("Weakens the page's defenses against injection and clickjacking")
            .recommendation(vulnerability.recommendation.clone())
            .docs(
                "OWASP Secure Headers Project",
                "https://owasp.org/www-project-secure-headers/",
            )
            .affects(["page"])
            .build(),
        );
    }

    issues
}

fn mobile_issues(mobile: &MobileUsability) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    if !mobile.viewport.has_valid_viewport {
        issues.push(
            Draft::new("missing-viewport", IssueCategory::Mobile, Priority::Critical, Effort::Low)
                .title("Missing viewport meta tag")
                .description("Page lacks proper viewport configuration")
                .impact("Poor mobile user experience")
                .recommendation(
                    r#"Add viewport meta tag: <meta name="viewport" content="width=device-width, initial-scale=1">"#,
                )
                .docs(
                    "Viewport Meta Tag",
                    "https://developer.mozilla.org/en-US/docs/Web/HTML/Viewport_meta_tag",
                )
                .affects(["head"])
                .build(),
        );
    }

    let small: Vec<String> = mobile
        .small_touch_targets()
        .map(|t| t.selector.clone())
        .collect();
    if !small.is_empty() {
        issues.push(
            Draft::new(
                "small-touch-targets",
                IssueCategory::Mobile,
                Priority::Important,
                Effort::Medium,
            )
            .title("Touch targets too small")
            .description(format!("{} touch targets are smaller than 48px", small.len()))
            .impact("Difficult mobile navigation")
            .recommendation("Increase touch target size to at least 48x48px")
            .docs("Accessible tap targets", "https://web.dev/articles/accessible-tap-targets")
            .affects(small)
            .build(),
        );
    }

    if !mobile.content_fits {
        issues.push(
            Draft::new("content-overflow", IssueCategory::Mobile, Priority::Low, Effort::Medium)
                .title("Content may not fit small screens")
                .description("Fixed pixel widths or several tables suggest horizontal scrolling")
                .impact("Visitors on phones have to scroll sideways")
                .recommendation("Use relative widths and make tables responsive")
                .docs(
                    "Responsive web design basics",
                    "https://web.dev/articles/responsive-web-design-basics",
                )
                .affects(["body"])
                .build(),
        );
    }

    issues
}

fn performance_issues(
    performance: &PerformanceMetrics,
    config: &AuditConfiguration,
) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    if let Some(lcp) = performance.lcp.filter(|lcp| *lcp > LCP_TARGET_MS) {
        issues.push(
            Draft::new("poor-lcp", IssueCategory::Performance, Priority::Critical, Effort::High)
                .title("Poor Largest Contentful Paint")
                .description(format!("LCP is {}ms (target: <2.5s)", lcp.round()))
                .impact("Poor user experience and SEO rankings")
                .recommendation("Optimize largest content element loading")
                .docs("LCP Optimization", "https://web.dev/articles/lcp")
                .affects(["largest-contentful-paint"])
                .build(),
        );
    }

    if let Some(cls) = performance.cls.filter(|cls| *cls > CLS_TARGET) {
        issues.push(
            Draft::new("poor-cls", IssueCategory::Performance, Priority::Important, Effort::Medium)
                .title("Poor Cumulative Layout Shift")
                .description(format!("CLS is {:.3} (target: <0.1)", cls))
                .impact("Poor user experience from unexpected layout shifts")
                .recommendation("Stabilize layout by reserving space for dynamic content")
                .docs("CLS Optimization", "https://web.dev/articles/cls")
                .affects(["layout-shifting-elements"])
                .build(),
        );
    }

    if performance.performance_score < config.performance_threshold {
        issues.push(
            Draft::new(
                "low-performance-score",
                IssueCategory::Performance,
                Priority::Important,
                Effort::High,
            )
            .title("Performance score below target")
            .description(format!(
                "Performance score is {} (target: {})",
                performance.performance_score, config.performance_threshold
            ))
            .impact("Slow pages rank lower and convert worse")
            .recommendation("Reduce server response time and page weight")
            .docs("Fast load times", "https://web.dev/explore/fast")
            .resource(
                ResourceKind::Tool,
                "PageSpeed Insights",
                "https://pagespeed.web.dev/",
            )
            .affects(["page"])
            .build(),
        );
    }

    issues
}

fn violation_priority(impact: ViolationImpact) -> Priority {
    match impact {
        ViolationImpact::Critical => Priority::Critical,
        ViolationImpact::Serious => Priority::Important,
        ViolationImpact::Moderate | ViolationImpact::Minor => Priority::Low,
    }
}

fn accessibility_issues(
    accessibility: &AccessibilityAudit,
    config: &AuditConfiguration,
) -> Vec<AuditIssue> {
    let mut issues: Vec<AuditIssue> = Vec::new();

    // Violations are per element; issues are per rule
    for violation in &accessibility.violations {
        let targets = violation.nodes.iter().map(|node| node.target.join(" "));

        if let Some(existing) = issues.iter_mut().find(|issue| issue.id == violation.id) {
            existing.affected_elements.extend(targets);
            continue;
        }

        issues.push(
            Draft::new(
                &violation.id,
                IssueCategory::Accessibility,
                violation_priority(violation.impact),
                Effort::Medium,
            )
            .title(violation.description.clone())
            .description(violation.help.clone())
            .impact("Accessibility barrier for users with disabilities")
            .recommendation(violation.help.clone())
            .docs("Accessibility Guide", &violation.help_url)
            .affects(targets)
            .build(),
        );
    }

    if accessibility.score < config.accessibility_threshold {
        issues.push(
            Draft::new(
                "low-accessibility-score",
                IssueCategory::Accessibility,
                Priority::Important,
                Effort::Medium,
            )
            .title("Accessibility score below target")
            .description(format!(
                "Accessibility score is {} (target: {})",
                accessibility.score, config.accessibility_threshold
            ))
            .impact("Some visitors cannot use the page")
            .recommendation("Fix the accessibility violations listed in this report")
            .docs("WCAG quick reference", "https://www.w3.org/WAI/WCAG22/quickref/")
            .affects(["page"])
            .build(),
        );
    }

    issues
}

fn schema_issues(schema: &SchemaMarkup) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    if !schema.found {
        issues.push(
            Draft::new("no-schema", IssueCategory::Seo, Priority::Important, Effort::Medium)
                .title("No structured data found")
                .description("Page lacks structured data markup")
                .impact("Missed opportunities for rich snippets")
                .recommendation("Add relevant structured data markup")
                .docs(
                    "Structured Data Guide",
                    "https://developers.google.com/search/docs/appearance/structured-data/intro-structured-data",
                )
                .resource(
                    ResourceKind::Tool,
                    "Rich Results Test",
                    "https://search.google.com/test/rich-results",
                )
                .affects(["head", "body"])
                .build(),
        );
    }

    if !schema.parse_errors.is_empty() {
        issues.push(
            Draft::new("invalid-json-ld", IssueCategory::Seo, Priority::Important, Effort::Low)
                .title("Invalid JSON-LD")
                .description(format!(
                    "{} JSON-LD blocks could not be parsed",
                    schema.parse_errors.len()
                ))
                .impact("Search engines ignore structured data they cannot parse")
                .recommendation("Fix the JSON syntax of the structured data blocks")
                .resource(
                    ResourceKind::Tool,
                    "Schema Markup Validator",
                    "https://validator.schema.org/",
                )
                .affects(schema.parse_errors.iter().cloned())
                .build(),
        );
    }

    let validation_errors: Vec<String> = schema
        .structured_data
        .iter()
        .flat_map(|data| data.errors.iter().cloned())
        .collect();
    if !validation_errors.is_empty() {
        issues.push(
            Draft::new("schema-validation-errors", IssueCategory::Seo, Priority::Low, Effort::Low)
                .title("Structured data is incomplete")
                .description(format!(
                    "{} required structured data properties are missing",
                    validation_errors.len()
                ))
                .impact("Incomplete markup is not eligible for rich results")
                .recommendation("Add the required properties to the structured data")
                .docs(
                    "Structured data general guidelines",
                    "https://developers.google.com/search/docs/appearance/structured-data/sd-policies",
                )
                .affects(validation_errors)
                .build(),
        );
    }

    issues
}
