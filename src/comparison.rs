use crate::models::{AuditIssue, EnhancedAuditResult, ScoreComparison, TrendDirection};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Compares this run against a previous report of the same page.
pub fn compare(
    overall_score: u8,
    issues: &[AuditIssue],
    previous: &EnhancedAuditResult,
) -> ScoreComparison {
    let current_ids: HashSet<&str> = issues.iter().map(|i| i.id.as_str()).collect();
    let previous_ids: HashSet<&str> = previous.issues.iter().map(|i| i.id.as_str()).collect();

    let score_change = i16::from(overall_score) - i16::from(previous.overall_score);

    ScoreComparison {
        previous_score: previous.overall_score,
        score_change,
        new_issues: unique_ids(issues, |id| !previous_ids.contains(id)),
        resolved_issues: unique_ids(&previous.issues, |id| !current_ids.contains(id)),
        trend_direction: match score_change {
            1.. => TrendDirection::Improving,
            0 => TrendDirection::Stable,
            _ => TrendDirection::Declining,
        },
    }
}

/// Issue ids matching `keep`, in issue order, without repeats
fn unique_ids(issues: &[AuditIssue], keep: impl Fn(&str) -> bool) -> Vec<String> {
    let mut seen = HashSet::new();
    issues
        .iter()
        .map(|issue| issue.id.as_str())
        .filter(|id| keep(*id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Loads a report previously written with `--save`
pub fn load_previous_report(path: impl AsRef<Path>) -> Result<EnhancedAuditResult> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read previous report: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse previous report: {}", path.display()))
}
