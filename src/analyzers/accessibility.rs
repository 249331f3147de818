use super::{describe, snippet};
use crate::models::{
    AccessibilityAudit, AccessibilityPass, Violation, ViolationImpact, ViolationNode,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector should be valid")
});

const POINTS_PER_VIOLATION: usize = 10;

struct Rule {
    id: &'static str,
    impact: ViolationImpact,
    description: &'static str,
    help: &'static str,
}

const IMAGE_ALT: Rule = Rule {
    id: "image-alt",
    impact: ViolationImpact::Serious,
    description: "Images must have alternate text",
    help: "Add alt attributes to img elements",
};

const HEADING_ORDER: Rule = Rule {
    id: "heading-order",
    impact: ViolationImpact::Moderate,
    description: "Heading levels should only increase by one",
    help: "Ensure headings follow a logical order",
};

const RULES: [&Rule; 2] = [&IMAGE_ALT, &HEADING_ORDER];

fn violation(rule: &Rule, element: &ElementRef) -> Violation {
    Violation {
        id: rule.id.to_string(),
        impact: rule.impact,
        description: rule.description.to_string(),
        help: rule.help.to_string(),
        help_url: format!("https://dequeuniversity.com/rules/axe/4.4/{}", rule.id),
        nodes: vec![ViolationNode {
            target: vec![describe(element)],
            html: snippet(element),
        }],
    }
}

/// One violation per offending element, so the score drops per element.
pub fn analyze(document: &Html) -> AccessibilityAudit {
    let mut violations = Vec::new();

    for img in document.select(&IMG_SELECTOR) {
        if img.value().attr("alt").is_none_or(str::is_empty) {
            violations.push(violation(&IMAGE_ALT, &img));
        }
    }

    let mut last_level = 0;
    for heading in document.select(&HEADING_SELECTOR) {
        let level = heading
            .value()
            .name()
            .strip_prefix('h')
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(1);
        if level > last_level + 1 {
            violations.push(violation(&HEADING_ORDER, &heading));
        }
        last_level = level;
    }

    let passes = RULES
        .iter()
        .filter(|rule| !violations.iter().any(|v| v.id == rule.id))
        .map(|rule| AccessibilityPass {
            id: rule.id.to_string(),
            description: rule.description.to_string(),
        })
        .collect();

    AccessibilityAudit {
        score: 100usize.saturating_sub(violations.len() * POINTS_PER_VIOLATION) as u8,
        violations,
        passes,
    }
}
