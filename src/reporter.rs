use crate::models::{AuditIssue, EnhancedAuditResult, Priority, TrendDirection};
use anyhow::{Context, Result};
use colored::*;
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

fn score_colored(score: u8) -> ColoredString {
    let text = format!("{:>3}/100", score);
    if score >= 80 {
        text.bright_green()
    } else if score >= 50 {
        text.yellow()
    } else {
        text.bright_red()
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value {
        "yes".bright_green()
    } else {
        "no".bright_red()
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::Critical => "CRITICAL ".bright_red().bold(),
        Priority::Important => "IMPORTANT".yellow(),
        Priority::Low => "LOW      ".bright_cyan(),
    }
}

impl Reporter {
    pub fn print_text_report(result: &EnhancedAuditResult) {
        print!("{}", Self::render_text_report(result));
    }

    /// Human-readable report, colored unless colors are disabled
    pub fn render_text_report(result: &EnhancedAuditResult) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = Self::write_text_report(&mut out, result);
        out
    }

    fn write_text_report(out: &mut String, result: &EnhancedAuditResult) -> std::fmt::Result {
        writeln!(out, "\n{}", "=".repeat(80).bright_blue())?;
        writeln!(out, "{}", "PageAudit - SEO Audit Report".bright_cyan().bold())?;
        writeln!(out, "{}", "=".repeat(80).bright_blue())?;
        writeln!(out)?;

        writeln!(out, "{}: {}", "URL".bright_white().bold(), result.url)?;
        writeln!(out, "{}: {}", "Scanned at".bright_white().bold(), result.scanned_at)?;
        writeln!(out)?;

        writeln!(
            out,
            "{} {}",
            "Overall Score:".bright_white().bold(),
            score_colored(result.overall_score).bold()
        )?;
        writeln!(out)?;

        writeln!(out, "{}", "Category Scores".bright_yellow().bold().underline())?;
        for (category, score) in result.category_scores.entries() {
            writeln!(
                out,
                "  {:<15} {}",
                format!("{}:", capitalize(&category.to_string())),
                score_colored(score)
            )?;
        }
        writeln!(out)?;

        Self::write_details(out, result)?;
        Self::write_issues(out, &result.issues)?;

        if !result.quick_wins.is_empty() {
            writeln!(out, "{}", "Quick Wins".bright_yellow().bold().underline())?;
            for (idx, win) in result.quick_wins.iter().enumerate() {
                writeln!(
                    out,
                    "  {}. {} ({})",
                    idx + 1,
                    win.title.bright_white(),
                    win.category
                )?;
                for step in &win.steps {
                    writeln!(out, "       - {}", step)?;
                }
            }
            writeln!(out)?;
        }

        let summary = &result.summary;
        writeln!(out, "{}", "Executive Summary".bright_yellow().bold().underline())?;
        for finding in &summary.key_findings {
            writeln!(out, "  * {}", finding)?;
        }
        if !summary.priority_actions.is_empty() {
            writeln!(out, "  {}", "Priority actions:".bright_white().bold())?;
            for (idx, action) in summary.priority_actions.iter().enumerate() {
                writeln!(out, "    {}. {}", idx + 1, action)?;
            }
        }
        writeln!(out, "  Estimated impact:  {}", summary.estimated_impact)?;
        writeln!(out, "  Time to implement: {}", summary.time_to_implement)?;
        writeln!(out)?;

        if let Some(comparison) = &result.comparison {
            writeln!(out, "{}", "Comparison".bright_yellow().bold().underline())?;
            let change = format!("{:+}", comparison.score_change);
            let trend = match comparison.trend_direction {
                TrendDirection::Improving => format!("{} (improving)", change).bright_green(),
                TrendDirection::Declining => format!("{} (declining)", change).bright_red(),
                TrendDirection::Stable => format!("{} (stable)", change).normal(),
            };
            writeln!(out, "  Previous score: {}", comparison.previous_score)?;
            writeln!(out, "  Change:         {}", trend)?;
            if !comparison.new_issues.is_empty() {
                writeln!(out, "  New issues:      {}", comparison.new_issues.join(", "))?;
            }
            if !comparison.resolved_issues.is_empty() {
                writeln!(
                    out,
                    "  Resolved issues: {}",
                    comparison.resolved_issues.join(", ")
                )?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{}", "=".repeat(80).bright_blue())
    }

    fn write_details(out: &mut String, result: &EnhancedAuditResult) -> std::fmt::Result {
        let technical = &result.technical_seo;
        let crawl = &technical.crawlability;
        let content = &result.content;

        writeln!(out, "{}", "Key Facts".bright_yellow().bold().underline())?;
        writeln!(
            out,
            "  Status:          {} ({} redirects, {} ms, {} KB)",
            crawl.status_code,
            crawl.redirect_chain.len(),
            crawl.load_time_ms,
            crawl.response_size / 1024
        )?;
        writeln!(
            out,
            "  robots.txt:      {}",
            yes_no(technical.indexability.robots_txt.found)
        )?;
        writeln!(
            out,
            "  Canonical:       {}",
            technical
                .indexability
                .canonical
                .url
                .as_deref()
                .map(|u| u.normal())
                .unwrap_or_else(|| "none".bright_red())
        )?;
        writeln!(
            out,
            "  XML sitemap:     {}",
            yes_no(technical.sitemaps.xml_sitemap.found)
        )?;
        writeln!(
            out,
            "  Words:           {} (readability {})",
            content.word_count, content.readability_score
        )?;
        writeln!(
            out,
            "  Links:           {} internal, {} external, {} broken",
            content.internal_links.count,
            content.external_links.count,
            content.internal_links.broken + content.external_links.broken
        )?;
        writeln!(
            out,
            "  Images:          {} total, {} without alt",
            content.images.total, content.images.without_alt
        )?;
        let headers = &result.security.security_headers;
        let present = [
            headers.content_security_policy,
            headers.strict_transport_security,
            headers.x_frame_options,
            headers.x_content_type_options,
            headers.referrer_policy,
            headers.permissions_policy,
        ]
        .into_iter()
        .filter(|h| *h)
        .count();
        writeln!(
            out,
            "  HTTPS:           {} ({}/6 security headers, {} mixed content)",
            yes_no(result.security.https_enabled),
            present,
            result.security.mixed_content.len()
        )?;
        writeln!(
            out,
            "  Performance:     {}/100 (LCP {} ms)",
            result.performance.performance_score,
            result.performance.lab_data.largest_contentful_paint.round()
        )?;
        writeln!(
            out,
            "  Accessibility:   {} violations, {} passes",
            result.accessibility.violations.len(),
            result.accessibility.passes.len()
        )?;
        writeln!(
            out,
            "  Mobile friendly: {}",
            yes_no(result.mobile.is_mobile_friendly)
        )?;
        writeln!(
            out,
            "  Structured data: {}",
            if result.schema.types.is_empty() {
                "none".bright_red()
            } else {
                result.schema.types.join(", ").normal()
            }
        )?;
        writeln!(out)
    }

    fn write_issues(out: &mut String, issues: &[AuditIssue]) -> std::fmt::Result {
        writeln!(
            out,
            "{} ({})",
            "Issues".bright_yellow().bold().underline(),
            issues.len()
        )?;
        if issues.is_empty() {
            writeln!(out, "  {}", "No issues found".bright_green())?;
            return writeln!(out);
        }

        for (priority, heading) in [
            (Priority::Critical, "Critical"),
            (Priority::Important, "Important"),
            (Priority::Low, "Low priority"),
        ] {
            let group: Vec<&AuditIssue> =
                issues.iter().filter(|i| i.priority == priority).collect();
            if group.is_empty() {
                continue;
            }

            writeln!(out, "  {} ({})", heading.bright_white().bold(), group.len())?;
            for issue in group {
                writeln!(
                    out,
                    "  [{}] {} {}",
                    priority_label(issue.priority),
                    issue.title.bright_white(),
                    format!("({})", issue.category).dimmed()
                )?;
                if !issue.description.is_empty() {
                    writeln!(out, "              {}", issue.description)?;
                }
                writeln!(out, "              -> {}", issue.recommendation)?;
            }
        }
        writeln!(out)
    }

    pub fn to_json(result: &EnhancedAuditResult) -> Result<String> {
        serde_json::to_string_pretty(result).context("Failed to serialize audit report")
    }

    pub fn save_json_report(result: &EnhancedAuditResult, filename: &str) -> Result<()> {
        let json = Self::to_json(result)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write report file: {}", filename))?;
        eprintln!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
