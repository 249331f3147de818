//! Category scores and the weighted overall score.
//!
//! Each category starts at 100 and loses a fixed number of points per violated
//! rule, floored at 0.

use crate::models::{
    AccessibilityAudit, CategoryScores, ContentAnalysis, MobileUsability, PerformanceMetrics,
    SchemaMarkup, SecurityAudit, TechnicalSeo,
};

/// Borrowed view of every sub-report of one audit.
///
/// `performance` and `accessibility` are `None` when those analyses were not run.
#[derive(Debug, Clone, Copy)]
pub struct Findings<'a> {
    pub technical: &'a TechnicalSeo,
    pub performance: Option<&'a PerformanceMetrics>,
    pub accessibility: Option<&'a AccessibilityAudit>,
    pub content: &'a ContentAnalysis,
    pub security: &'a SecurityAudit,
    pub mobile: &'a MobileUsability,
    pub schema: &'a SchemaMarkup,
}

pub const WEIGHT_TECHNICAL: f64 = 0.20;
pub const WEIGHT_PERFORMANCE: f64 = 0.20;
pub const WEIGHT_ACCESSIBILITY: f64 = 0.15;
pub const WEIGHT_SEO: f64 = 0.15;
pub const WEIGHT_CONTENT: f64 = 0.15;
pub const WEIGHT_SECURITY: f64 = 0.10;
pub const WEIGHT_MOBILE: f64 = 0.05;

/// Running score for one category
struct Deductions(i32);

impl Deductions {
    fn new() -> Self {
        Self(100)
    }

    fn apply(&mut self, violated: bool, points: i32) {
        if violated {
            self.0 -= points;
        }
    }

    fn finish(self) -> u8 {
        self.0.clamp(0, 100) as u8
    }
}

pub fn category_scores(findings: &Findings) -> CategoryScores {
    CategoryScores {
        technical: technical_score(findings.technical),
        performance: findings.performance.map_or(0, |p| p.performance_score.min(100)),
        accessibility: findings.accessibility.map_or(0, |a| a.score.min(100)),
        seo: seo_score(findings.technical, findings.content, findings.schema),
        content: content_score(findings.content),
        security: security_score(findings.security),
        mobile: mobile_score(findings.mobile),
    }
}

pub fn overall_score(scores: &CategoryScores) -> u8 {
    let weighted = f64::from(scores.technical) * WEIGHT_TECHNICAL
        + f64::from(scores.performance) * WEIGHT_PERFORMANCE
        + f64::from(scores.accessibility) * WEIGHT_ACCESSIBILITY
        + f64::from(scores.seo) * WEIGHT_SEO
        + f64::from(scores.content) * WEIGHT_CONTENT
        + f64::from(scores.security) * WEIGHT_SECURITY
        + f64::from(scores.mobile) * WEIGHT_MOBILE;

    weighted.round().clamp(0.0, 100.0) as u8
}

pub fn technical_score(technical: &TechnicalSeo) -> u8 {
    let indexability = &technical.indexability;
    let crawlability = &technical.crawlability;
    let mut score = Deductions::new();

    score.apply(!indexability.robots_txt.found, 10);
    score.apply(!indexability.robots_txt.allows, 20);
    score.apply(indexability.meta_robots.noindex, 30);
    score.apply(!indexability.canonical.found, 15);
    score.apply(!indexability.canonical.is_self_referencing, 10);

    score.apply(crawlability.status_code != 200, 25);
    score.apply(crawlability.redirect_chain.len() > 1, 10);
    score.apply(crawlability.load_time_ms > 3000, 15);

    score.apply(!technical.url_structure.is_clean, 10);
    score.apply(technical.url_structure.length > 100, 5);

    score.apply(!technical.sitemaps.xml_sitemap.found, 15);

    score.finish()
}

pub fn content_score(content: &ContentAnalysis) -> u8 {
    let headings = &content.heading_structure;
    let external = &content.external_links;
    let mut score = Deductions::new();

    if content.word_count < 300 {
        score.apply(true, 20);
    } else {
        score.apply(content.word_count < 500, 10);
    }

    if content.readability_score < 60 {
        score.apply(true, 15);
    } else {
        score.apply(content.readability_score < 70, 5);
    }

    score.apply(headings.h1_count == 0, 15);
    score.apply(headings.h1_count > 1, 10);
    score.apply(!headings.missing_headings.is_empty(), 5);

    score.apply(content.images.without_alt > 0, 10);
    score.apply(content.images.oversized > 0, 5);

    score.apply(content.internal_links.count == 0, 10);
    score.apply(
        external.count > 0 && external.nofollow as f64 / external.count as f64 > 0.8,
        5,
    );

    score.finish()
}

pub fn security_score(security: &SecurityAudit) -> u8 {
    let headers = &security.security_headers;
    let mut score = Deductions::new();

    score.apply(!security.https_enabled, 30);
    score.apply(!security.mixed_content.is_empty(), 20);
    score.apply(!headers.strict_transport_security, 10);
    score.apply(!headers.x_frame_options, 10);
    score.apply(!headers.x_content_type_options, 5);
    score.apply(!headers.referrer_policy, 5);
    score.apply(true, 10 * security.vulnerabilities.len() as i32);

    score.finish()
}

pub fn mobile_score(mobile: &MobileUsability) -> u8 {
    let mut score = Deductions::new();

    score.apply(!mobile.is_mobile_friendly, 40);
    score.apply(!mobile.viewport.has_valid_viewport, 20);
    score.apply(mobile.small_touch_targets().next().is_some(), 15);
    score.apply(mobile.text_readability_score < 80, 10);
    score.apply(!mobile.content_fits, 10);

    score.finish()
}

pub fn seo_score(technical: &TechnicalSeo, content: &ContentAnalysis, schema: &SchemaMarkup) -> u8 {
    let h1_count = content.heading_structure.h1_count;
    let mut score = Deductions::new();

    score.apply(h1_count == 0, 15);
    score.apply(h1_count > 1, 10);

    score.apply(!schema.found, 15);
    score.apply(!schema.organization, 5);
    score.apply(!schema.website, 5);

    score.apply(!technical.indexability.canonical.found, 10);
    score.apply(!technical.sitemaps.xml_sitemap.found, 10);

    score.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RedirectHop, SecurityHeaders, Vulnerability, VulnerabilitySeverity};

    fn healthy_technical() -> TechnicalSeo {
        let mut technical = TechnicalSeo::default();
        technical.indexability.robots_txt.found = true;
        technical.indexability.robots_txt.allows = true;
        technical.indexability.canonical.found = true;
        technical.indexability.canonical.is_self_referencing = true;
        technical.crawlability.status_code = 200;
        technical.url_structure.is_clean = true;
        technical.url_structure.length = 30;
        technical.sitemaps.xml_sitemap.found = true;
        technical
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total = WEIGHT_TECHNICAL
            + WEIGHT_PERFORMANCE
            + WEIGHT_ACCESSIBILITY
            + WEIGHT_SEO
            + WEIGHT_CONTENT
            + WEIGHT_SECURITY
            + WEIGHT_MOBILE;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_score_is_weighted_and_rounded() {
        let all = |v| CategoryScores {
            technical: v,
            performance: v,
            accessibility: v,
            seo: v,
            content: v,
            security: v,
            mobile: v,
        };
        assert_eq!(overall_score(&all(100)), 100);
        assert_eq!(overall_score(&all(0)), 0);

        let scores = CategoryScores {
            technical: 85,
            performance: 0,
            accessibility: 0,
            seo: 70,
            content: 60,
            security: 45,
            mobile: 100,
        };
        // 17 + 10.5 + 9 + 4.5 + 5 = 46
        assert_eq!(overall_score(&scores), 46);
    }

    #[test]
    fn test_technical_deductions() {
        assert_eq!(technical_score(&healthy_technical()), 100);

        let mut technical = healthy_technical();
        technical.indexability.meta_robots.noindex = true;
        technical.crawlability.redirect_chain = vec![
            RedirectHop {
                url: "http://a/".into(),
                status_code: 301,
                kind: "permanent".into(),
            };
            2
        ];
        technical.crawlability.load_time_ms = 3500;
        assert_eq!(technical_score(&technical), 45);

        let mut worst = TechnicalSeo::default();
        worst.indexability.meta_robots.noindex = true;
        assert_eq!(technical_score(&worst), 0);
    }

    #[test]
    fn test_missing_robots_txt_is_not_treated_as_allowing() {
        let mut technical = healthy_technical();
        technical.indexability.robots_txt = Default::default();
        assert_eq!(technical_score(&technical), 70);
    }

    #[test]
    fn test_missing_canonical_also_loses_self_reference_points() {
        let mut technical = healthy_technical();
        technical.indexability.canonical.found = false;
        technical.indexability.canonical.is_self_referencing = false;
        assert_eq!(technical_score(&technical), 75);

        // A canonical pointing elsewhere only loses the self-reference points
        technical.indexability.canonical.found = true;
        assert_eq!(technical_score(&technical), 90);
    }

    #[test]
    fn test_content_deductions() {
        let mut content = ContentAnalysis {
            word_count: 450,
            readability_score: 65,
            ..Default::default()
        };
        content.heading_structure.h1_count = 1;
        content.internal_links.count = 3;
        assert_eq!(content_score(&content), 85);

        content.external_links.count = 4;
        content.external_links.nofollow = 4;
        assert_eq!(content_score(&content), 80);

        // Internal nofollow links do not count against the external ratio
        content.external_links.nofollow = 0;
        content.internal_links.nofollow = 3;
        assert_eq!(content_score(&content), 85);
    }

    #[test]
    fn test_security_deductions_floor_at_zero() {
        let mut security = SecurityAudit {
            https_enabled: true,
            security_headers: SecurityHeaders {
                strict_transport_security: true,
                x_frame_options: true,
                x_content_type_options: true,
                referrer_policy: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(security_score(&security), 100);

        security.https_enabled = false;
        security.vulnerabilities = vec![
            Vulnerability {
                kind: "x".into(),
                severity: VulnerabilitySeverity::Medium,
                description: String::new(),
                recommendation: String::new(),
            };
            8
        ];
        assert_eq!(security_score(&security), 0);
    }

    #[test]
    fn test_disabled_analyses_score_zero() {
        let technical = healthy_technical();
        let content = ContentAnalysis::default();
        let security = SecurityAudit::default();
        let mobile = MobileUsability::default();
        let schema = SchemaMarkup::default();

        let findings = Findings {
            technical: &technical,
            performance: None,
            accessibility: None,
            content: &content,
            security: &security,
            mobile: &mobile,
            schema: &schema,
        };
        let scores = category_scores(&findings);
        assert_eq!(scores.performance, 0);
        assert_eq!(scores.accessibility, 0);
        assert_eq!(scores.technical, 100);
        // no h1, no schema, no organization, no website
        assert_eq!(scores.seo, 60);
    }
}
