use super::{body_text, leading_int, sentence_count};
use crate::models::{
    ContentAnalysis, ExternalLinks, HeadingStructure, ImageStats, InternalLinks, KeywordDensity,
};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

static HEADING_SELECTORS: Lazy<[Selector; 6]> = Lazy::new(|| {
    ["h1", "h2", "h3", "h4", "h5", "h6"]
        .map(|tag| Selector::parse(tag).expect("heading selector should be valid"))
});
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));

/// A link found on the page, resolved to an absolute http(s) URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: String,
    pub is_external: bool,
}

pub fn analyze(document: &Html, page_url: &Url, keywords: &[String]) -> ContentAnalysis {
    let text = body_text(document);
    let (internal_links, external_links) = link_structure(document, page_url);

    ContentAnalysis {
        word_count: word_count(&text),
        readability_score: readability_score(&text),
        keyword_density: keyword_density(&text, keywords),
        heading_structure: heading_structure(document),
        internal_links,
        external_links,
        images: image_stats(document),
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Simplified Flesch reading ease, clamped to 0..=100
pub fn readability_score(text: &str) -> u8 {
    let words = word_count(text);
    if words == 0 {
        return 0;
    }

    let sentences = sentence_count(text) as f64;
    let syllables = count_syllables(text) as f64;
    let words = words as f64;

    let score = 206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words);
    score.round().clamp(0.0, 100.0) as u8
}

fn count_syllables(text: &str) -> usize {
    let letters: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect();

    letters
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| vowel_groups(word).max(1))
        .sum()
}

fn vowel_groups(word: &str) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for c in word.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !in_group {
            groups += 1;
        }
        in_group = vowel;
    }
    groups
}

/// Occurrences of each keyword (or phrase) among the page's words
pub fn keyword_density(text: &str, keywords: &[String]) -> Vec<KeywordDensity> {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();
    let total = words.len();

    keywords
        .iter()
        .map(|keyword| {
            let phrase: Vec<String> = keyword
                .split_whitespace()
                .map(|w| w.to_lowercase())
                .collect();

            let count = if phrase.is_empty() || phrase.len() > total {
                0
            } else {
                words
                    .windows(phrase.len())
                    .filter(|window| *window == phrase.as_slice())
                    .count()
            };

            KeywordDensity {
                keyword: keyword.clone(),
                count,
                density: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

pub fn heading_structure(document: &Html) -> HeadingStructure {
    let counts: Vec<usize> = HEADING_SELECTORS
        .iter()
        .map(|selector| document.select(selector).count())
        .collect();

    let mut missing_headings = Vec::new();
    let mut previous_level = 0;
    for (idx, count) in counts.iter().enumerate() {
        let level = idx + 1;
        if *count == 0 {
            continue;
        }
        if previous_level > 0 && level > previous_level + 1 {
            missing_headings.push(format!(
                "Missing h{} before h{}",
                previous_level + 1,
                level
            ));
        }
        previous_level = level;
    }

    HeadingStructure {
        h1_count: counts[0],
        h2_count: counts[1],
        h3_count: counts[2],
        h4_count: counts[3],
        h5_count: counts[4],
        h6_count: counts[5],
        is_structured: missing_headings.is_empty(),
        missing_headings,
    }
}

fn is_nofollow(rel: Option<&str>) -> bool {
    rel.is_some_and(|rel| rel.to_lowercase().contains("nofollow"))
}

/// Internal links start with `/` or `#` or mention the host; external links are
/// absolute `http` links to anything else. Broken counts are filled in later by
/// the link checker.
pub fn link_structure(document: &Html, page_url: &Url) -> (InternalLinks, ExternalLinks) {
    let hostname = page_url.host_str().unwrap_or("localhost");

    let mut internal = InternalLinks::default();
    let mut external = ExternalLinks::default();
    let mut internal_hrefs = HashSet::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let nofollow = is_nofollow(element.value().attr("rel"));

        if href.starts_with('/') || href.starts_with('#') || href.contains(hostname) {
            internal.count += 1;
            internal_hrefs.insert(href);
            if nofollow {
                internal.nofollow += 1;
            }
        } else if href.starts_with("http") {
            external.count += 1;
            if nofollow {
                external.nofollow += 1;
            }
            if let Some(domain) = Url::parse(href)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
                && !external.domains.contains(&domain)
            {
                external.domains.push(domain);
            }
        }
    }

    internal.unique = internal_hrefs.len();
    external.unique = external.domains.len();

    (internal, external)
}

/// Unique absolute http(s) link URLs in document order, fragments stripped
pub fn link_targets(document: &Html, page_url: &Url) -> Vec<LinkTarget> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if href.starts_with('#') {
            continue;
        }
        let Ok(mut absolute) = page_url.join(href) else {
            continue;
        };
        if !matches!(absolute.scheme(), "http" | "https") {
            continue;
        }
        absolute.set_fragment(None);

        let is_external = absolute.host_str() != page_url.host_str()
            || absolute.port_or_known_default() != page_url.port_or_known_default();
        let url = absolute.to_string();
        if seen.insert(url.clone()) {
            targets.push(LinkTarget { url, is_external });
        }
    }

    targets
}

pub fn image_stats(document: &Html) -> ImageStats {
    let mut stats = ImageStats::default();

    for img in document.select(&IMG_SELECTOR) {
        let el = img.value();
        stats.total += 1;

        // Empty alt is both missing text and a decorative marker
        let alt = el.attr("alt");
        if alt.is_none_or(str::is_empty) {
            stats.without_alt += 1;
        }
        if alt == Some("") {
            stats.decorative_count += 1;
        }

        let src = el.attr("src").unwrap_or("").to_lowercase();
        if src.ends_with(".jpg") || src.ends_with(".jpeg") || src.ends_with(".png") {
            stats.unoptimized += 1;
        }

        let width = el.attr("width").and_then(leading_int).unwrap_or(0);
        let height = el.attr("height").and_then(leading_int).unwrap_or(0);
        if width > 1200 || height > 1200 {
            stats.oversized += 1;
        }
    }

    stats
}
