use super::{body_text, describe, sentence_count, technical::meta_content};
use crate::models::{InteractiveElements, MobileUsability, TouchTarget, Viewport};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static TOUCH_TARGET_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a, button, input, textarea, select")
        .expect("touch target selector should be valid")
});
static INLINE_WIDTH_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[style*="width:"][style*="px"]"#)
        .expect("inline width selector should be valid")
});
static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("table selector should be valid"));
static BUTTON_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"button, input[type="button"], input[type="submit"]"#)
        .expect("button selector should be valid")
});
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static FORM_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("form").expect("form selector should be valid"));

const MIN_LINK_TEXT_CHARS: usize = 3;
const MAX_FIXED_WIDTH_ELEMENTS: usize = 5;
const MAX_TABLES: usize = 3;

pub fn analyze(document: &Html) -> MobileUsability {
    let viewport = viewport(document);
    let touch_targets = touch_targets(document);
    let text_readability_score = text_readability_score(&body_text(document));
    let content_fits = content_fits(document);

    let is_mobile_friendly = viewport.has_valid_viewport
        && !touch_targets.iter().any(|t| t.is_too_small)
        && text_readability_score >= 80
        && content_fits;

    MobileUsability {
        is_mobile_friendly,
        viewport,
        touch_targets,
        text_readability_score,
        content_fits,
        interactive_elements: interactive_elements(document),
    }
}

pub fn viewport(document: &Html) -> Viewport {
    let Some(content) = meta_content(document, "viewport") else {
        return Viewport::default();
    };

    let normalized: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let has_valid_viewport = normalized.contains("width=device-width");

    let initial_scale = normalized
        .split([',', ';'])
        .find_map(|pair| pair.strip_prefix("initial-scale="))
        .and_then(|value| value.parse::<f64>().ok());

    Viewport {
        configured: has_valid_viewport,
        content: (!content.is_empty()).then(|| content.to_string()),
        has_valid_viewport,
        initial_scale,
    }
}

/// Without layout information the only signal is link text: a link with less
/// than three characters of text is assumed to render too small to tap.
pub fn touch_targets(document: &Html) -> Vec<TouchTarget> {
    document
        .select(&TOUCH_TARGET_SELECTOR)
        .filter(|el| {
            !(el.value().name() == "input"
                && el
                    .value()
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden")))
        })
        .map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            TouchTarget {
                selector: describe(&el),
                is_too_small: el.value().name() == "a"
                    && text.chars().count() < MIN_LINK_TEXT_CHARS,
                text,
            }
        })
        .collect()
}

/// 100, or 80 when sentences average more than twenty words
pub fn text_readability_score(text: &str) -> u8 {
    let words = text.split_whitespace().count() as f64;
    let sentences = sentence_count(text) as f64;
    if words / sentences > 20.0 { 80 } else { 100 }
}

pub fn content_fits(document: &Html) -> bool {
    document.select(&INLINE_WIDTH_SELECTOR).count() < MAX_FIXED_WIDTH_ELEMENTS
        && document.select(&TABLE_SELECTOR).count() < MAX_TABLES
}

pub fn interactive_elements(document: &Html) -> InteractiveElements {
    InteractiveElements {
        buttons: document.select(&BUTTON_SELECTOR).count(),
        links: document.select(&LINK_SELECTOR).count(),
        forms: document.select(&FORM_SELECTOR).count(),
    }
}
