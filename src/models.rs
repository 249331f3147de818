use crate::http_client::DEFAULT_USER_AGENT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Options that drive a single audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfiguration {
    /// Crawl depth. Audits are single-page, so anything above 1 is clamped.
    pub depth: usize,
    /// Maximum number of link URLs verified when link checking is enabled
    pub page_limit: usize,
    pub include_external: bool,
    pub respect_robots_txt: bool,
    pub user_agent: String,

    pub target_keywords: Vec<String>,
    pub include_performance: bool,
    pub include_accessibility: bool,
    pub include_security: bool,
    pub include_schema_validation: bool,
    pub check_broken_links: bool,

    pub performance_threshold: u8,
    pub accessibility_threshold: u8,
    pub min_word_count: usize,
    pub max_page_size_kb: usize,

    pub timeout_secs: u64,
    pub concurrency: usize,
    pub rate_limit: Option<f64>,
}

impl Default for AuditConfiguration {
    fn default() -> Self {
        Self {
            depth: 1,
            page_limit: 100,
            include_external: false,
            respect_robots_txt: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            target_keywords: vec![],
            include_performance: true,
            include_accessibility: true,
            include_security: true,
            include_schema_validation: true,
            check_broken_links: false,
            performance_threshold: 90,
            accessibility_threshold: 90,
            min_word_count: 300,
            max_page_size_kb: 3072,
            timeout_secs: 30,
            concurrency: 5,
            rate_limit: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedAuditResult {
    pub url: String,
    pub scanned_at: String,
    pub version: String,

    pub overall_score: u8,
    pub category_scores: CategoryScores,

    pub technical_seo: TechnicalSeo,
    pub performance: PerformanceMetrics,
    pub accessibility: AccessibilityAudit,
    pub content: ContentAnalysis,
    pub security: SecurityAudit,
    pub mobile: MobileUsability,
    pub schema: SchemaMarkup,

    pub issues: Vec<AuditIssue>,
    pub quick_wins: Vec<QuickWin>,
    pub comparison: Option<ScoreComparison>,
    pub summary: ExecutiveSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical: u8,
    pub performance: u8,
    pub accessibility: u8,
    pub seo: u8,
    pub content: u8,
    pub security: u8,
    pub mobile: u8,
}

impl CategoryScores {
    /// Scores in their canonical order
    pub fn entries(&self) -> [(IssueCategory, u8); 7] {
        [
            (IssueCategory::Technical, self.technical),
            (IssueCategory::Performance, self.performance),
            (IssueCategory::Accessibility, self.accessibility),
            (IssueCategory::Seo, self.seo),
            (IssueCategory::Content, self.content),
            (IssueCategory::Security, self.security),
            (IssueCategory::Mobile, self.mobile),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Technical,
    Performance,
    Accessibility,
    Seo,
    Content,
    Security,
    Mobile,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueCategory::Technical => "technical",
            IssueCategory::Performance => "performance",
            IssueCategory::Accessibility => "accessibility",
            IssueCategory::Seo => "seo",
            IssueCategory::Content => "content",
            IssueCategory::Security => "security",
            IssueCategory::Mobile => "mobile",
        };
        f.write_str(name)
    }
}

/// Issue priority. Variant order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Estimated remediation hours
    pub fn hours(self) -> u32 {
        match self {
            Effort::Low => 1,
            Effort::Medium => 4,
            Effort::High => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Documentation,
    Tool,
    Guide,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditIssue {
    pub id: String,
    pub category: IssueCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub effort: Effort,
    pub recommendation: String,
    pub resources: Vec<Resource>,
    pub affected_elements: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickWin {
    pub title: String,
    pub description: String,
    pub effort: Effort,
    pub impact: Impact,
    pub category: IssueCategory,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub key_findings: Vec<String>,
    pub priority_actions: Vec<String>,
    pub estimated_impact: String,
    pub time_to_implement: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComparison {
    pub previous_score: u8,
    pub score_change: i16,
    pub new_issues: Vec<String>,
    pub resolved_issues: Vec<String>,
    pub trend_direction: TrendDirection,
}

// ---------------------------------------------------------------------------
// Technical SEO
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalSeo {
    pub indexability: Indexability,
    pub crawlability: Crawlability,
    pub sitemaps: Sitemaps,
    pub url_structure: UrlStructure,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Indexability {
    pub robots_txt: RobotsTxtReport,
    pub meta_robots: MetaRobots,
    pub canonical: Canonical,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobotsTxtReport {
    pub found: bool,
    pub allows: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub sitemaps: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRobots {
    pub noindex: bool,
    pub nofollow: bool,
    pub noarchive: bool,
    pub nosnippet: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Canonical {
    pub found: bool,
    pub url: Option<String>,
    pub is_self_referencing: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub url: String,
    pub status_code: u16,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Crawlability {
    pub status_code: u16,
    pub redirect_chain: Vec<RedirectHop>,
    pub load_time_ms: u64,
    pub response_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sitemaps {
    pub xml_sitemap: XmlSitemap,
    pub html_sitemap: HtmlSitemap,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XmlSitemap {
    pub found: bool,
    pub url: Option<String>,
    pub url_count: usize,
    pub is_index: bool,
    pub sitemap_count: usize,
    pub errors: Vec<String>,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HtmlSitemap {
    pub found: bool,
    pub link_count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlStructure {
    pub is_clean: bool,
    pub has_parameters: bool,
    pub length: usize,
    pub is_descriptive: bool,
    pub issues: Vec<String>,
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub lcp: Option<f64>,
    pub cls: Option<f64>,
    pub inp: Option<f64>,
    pub fcp: Option<f64>,
    pub ttfb: Option<f64>,
    pub tbt: Option<f64>,
    pub si: Option<f64>,
    pub tti: Option<f64>,
    pub performance_score: u8,
    pub opportunities_count: u32,
    pub diagnostics_count: u32,
    pub lab_data: LabData,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LabData {
    pub first_contentful_paint: f64,
    pub largest_contentful_paint: f64,
    pub speed_index: f64,
    pub time_to_interactive: f64,
    pub total_blocking_time: f64,
    pub cumulative_layout_shift: f64,
}

// ---------------------------------------------------------------------------
// Accessibility
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationImpact {
    Critical,
    Serious,
    Moderate,
    Minor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationNode {
    pub target: Vec<String>,
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub impact: ViolationImpact,
    pub description: String,
    pub help: String,
    pub help_url: String,
    pub nodes: Vec<ViolationNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilityPass {
    pub id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessibilityAudit {
    pub score: u8,
    pub violations: Vec<Violation>,
    pub passes: Vec<AccessibilityPass>,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentAnalysis {
    pub word_count: usize,
    pub readability_score: u8,
    pub keyword_density: Vec<KeywordDensity>,
    pub heading_structure: HeadingStructure,
    pub internal_links: InternalLinks,
    pub external_links: ExternalLinks,
    pub images: ImageStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordDensity {
    pub keyword: String,
    pub count: usize,
    pub density: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadingStructure {
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h4_count: usize,
    pub h5_count: usize,
    pub h6_count: usize,
    pub is_structured: bool,
    pub missing_headings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InternalLinks {
    pub count: usize,
    pub unique: usize,
    pub nofollow: usize,
    pub broken: usize,
    pub broken_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalLinks {
    pub count: usize,
    pub unique: usize,
    pub nofollow: usize,
    pub broken: usize,
    pub broken_urls: Vec<String>,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ImageStats {
    pub total: usize,
    pub without_alt: usize,
    pub oversized: usize,
    pub unoptimized: usize,
    pub decorative_count: usize,
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixedContentKind {
    Image,
    Script,
    Stylesheet,
    Iframe,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixedContent {
    pub kind: MixedContentKind,
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaders {
    pub content_security_policy: bool,
    pub strict_transport_security: bool,
    pub x_frame_options: bool,
    pub x_content_type_options: bool,
    pub referrer_policy: bool,
    pub permissions_policy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilitySeverity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub kind: String,
    pub severity: VulnerabilitySeverity,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityAudit {
    pub https_enabled: bool,
    pub mixed_content: Vec<MixedContent>,
    pub server_signature: Option<String>,
    pub security_headers: SecurityHeaders,
    pub vulnerabilities: Vec<Vulnerability>,
}

// ---------------------------------------------------------------------------
// Mobile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub configured: bool,
    pub content: Option<String>,
    pub has_valid_viewport: bool,
    pub initial_scale: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TouchTarget {
    pub selector: String,
    pub text: String,
    pub is_too_small: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InteractiveElements {
    pub buttons: usize,
    pub links: usize,
    pub forms: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobileUsability {
    pub is_mobile_friendly: bool,
    pub viewport: Viewport,
    pub touch_targets: Vec<TouchTarget>,
    pub text_readability_score: u8,
    pub content_fits: bool,
    pub interactive_elements: InteractiveElements,
}

impl MobileUsability {
    pub fn small_touch_targets(&self) -> impl Iterator<Item = &TouchTarget> {
        self.touch_targets.iter().filter(|t| t.is_too_small)
    }
}

// ---------------------------------------------------------------------------
// Structured data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredData {
    pub kind: String,
    pub properties: Value,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaMarkup {
    pub found: bool,
    pub types: Vec<String>,
    pub structured_data: Vec<StructuredData>,
    pub parse_errors: Vec<String>,
    pub breadcrumbs: bool,
    pub organization: bool,
    pub website: bool,
    pub article: bool,
    pub product: bool,
    pub review: bool,
    pub faq: bool,
    pub how_to: bool,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStage {
    Initializing,
    Crawling,
    Analyzing,
    Generating,
    Complete,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditProgress {
    pub stage: AuditStage,
    pub progress: u8,
    pub current_task: String,
    pub pages_processed: usize,
    pub total_pages: usize,
    pub errors: Vec<String>,
}

impl Default for AuditProgress {
    fn default() -> Self {
        Self {
            stage: AuditStage::Initializing,
            progress: 0,
            current_task: "Setting up audit configuration".to_string(),
            pages_processed: 0,
            total_pages: 1,
            errors: vec![],
        }
    }
}
