//! Single-document analyses.
//!
//! Every analyzer except `performance` works on an already parsed
//! [`scraper::Html`] and is synchronous. The engine runs them in one block so the
//! parsed document never lives across an `.await`.

pub mod accessibility;
pub mod content;
pub mod mobile;
pub mod performance;
pub mod schema;
pub mod security;
pub mod technical;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));

const NON_VISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

const SNIPPET_LIMIT: usize = 200;

/// Visible text of `<body>`, one space between text nodes.
pub fn body_text(document: &Html) -> String {
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut text = String::new();
    for node in root.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_VISIBLE_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(chunk);
    }

    text
}

/// Number of sentences the way a `/[.!?]+/` split counts them: one more than
/// the number of terminator runs.
pub fn sentence_count(text: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in text.chars() {
        let terminator = matches!(c, '.' | '!' | '?');
        if terminator && !in_run {
            runs += 1;
        }
        in_run = terminator;
    }
    runs + 1
}

/// Short CSS-like description of an element: `tag#id` or `tag.class`
pub fn describe(element: &ElementRef) -> String {
    let el = element.value();
    let name = el.name();

    if let Some(id) = el.id() {
        return format!("{}#{}", name, id);
    }
    if let Some(class) = el.classes().next() {
        return format!("{}.{}", name, class);
    }
    name.to_string()
}

/// Outer HTML truncated to a readable length
pub fn snippet(element: &ElementRef) -> String {
    let html = element.html();
    if html.chars().count() <= SNIPPET_LIMIT {
        return html;
    }
    let mut cut: String = html.chars().take(SNIPPET_LIMIT).collect();
    cut.push('…');
    cut
}

/// Leading integer of an attribute value, like `parseInt("800px")`
pub fn leading_int(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
