use crate::models::{
    AuditIssue, CategoryScores, Effort, ExecutiveSummary, Impact, Priority, QuickWin,
};

const MAX_QUICK_WINS: usize = 5;
const MAX_PRIORITY_ACTIONS: usize = 3;
const WEAK_CATEGORY_SCORE: u8 = 70;

/// Low-effort issues worth fixing first. `issues` must already be sorted by priority.
pub fn quick_wins(issues: &[AuditIssue]) -> Vec<QuickWin> {
    issues
        .iter()
        .filter(|issue| {
            issue.effort == Effort::Low
                && matches!(issue.priority, Priority::Critical | Priority::Important)
        })
        .take(MAX_QUICK_WINS)
        .map(|issue| QuickWin {
            title: issue.title.clone(),
            description: issue.description.clone(),
            effort: issue.effort,
            impact: if issue.priority == Priority::Critical {
                Impact::High
            } else {
                Impact::Medium
            },
            category: issue.category,
            steps: action_steps(issue),
        })
        .collect()
}

fn action_steps(issue: &AuditIssue) -> Vec<String> {
    let locate = if issue.affected_elements.is_empty() {
        "Identify affected elements".to_string()
    } else {
        format!("Locate affected elements: {}", issue.affected_elements.join(", "))
    };

    vec![
        locate,
        issue.recommendation.clone(),
        "Test the implementation".to_string(),
        "Re-run the audit to validate the fix".to_string(),
    ]
}

pub fn executive_summary(
    overall_score: u8,
    scores: &CategoryScores,
    issues: &[AuditIssue],
) -> ExecutiveSummary {
    let critical = count_priority(issues, Priority::Critical);
    let important = count_priority(issues, Priority::Important);

    ExecutiveSummary {
        key_findings: key_findings(overall_score, scores, critical),
        priority_actions: issues
            .iter()
            .take(MAX_PRIORITY_ACTIONS)
            .map(|issue| issue.recommendation.clone())
            .collect(),
        estimated_impact: estimated_impact(critical, important).to_string(),
        time_to_implement: time_to_implement(issues).to_string(),
    }
}

fn count_priority(issues: &[AuditIssue], priority: Priority) -> usize {
    issues.iter().filter(|i| i.priority == priority).count()
}

fn key_findings(overall_score: u8, scores: &CategoryScores, critical: usize) -> Vec<String> {
    let mut findings = Vec::new();

    findings.push(
        match overall_score {
            80.. => "Overall SEO health is good with room for optimization",
            60..=79 => "SEO performance needs improvement in several areas",
            _ => "Significant SEO issues require immediate attention",
        }
        .to_string(),
    );

    if critical > 0 {
        findings.push(format!(
            "{} critical issues found that need immediate action",
            critical
        ));
    }

    // First category wins ties
    let entries = scores.entries();
    let mut lowest = entries[0];
    for entry in &entries[1..] {
        if entry.1 < lowest.1 {
            lowest = *entry;
        }
    }
    if lowest.1 < WEAK_CATEGORY_SCORE {
        findings.push(format!(
            "{} performance is the primary concern ({}/100)",
            lowest.0, lowest.1
        ));
    }

    findings
}

fn estimated_impact(critical: usize, important: usize) -> &'static str {
    if critical >= 3 {
        "High impact - addressing critical issues could significantly improve SEO performance"
    } else if critical >= 1 || important >= 5 {
        "Medium impact - fixing key issues will provide noticeable improvements"
    } else {
        "Low impact - optimizations will provide incremental improvements"
    }
}

pub fn estimated_hours(issues: &[AuditIssue]) -> u32 {
    issues.iter().map(|issue| issue.effort.hours()).sum()
}

fn time_to_implement(issues: &[AuditIssue]) -> &'static str {
    match estimated_hours(issues) {
        0..=8 => "1 day",
        9..=40 => "1 week",
        41..=160 => "1 month",
        _ => "2+ months",
    }
}
