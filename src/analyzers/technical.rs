use crate::models::{Canonical, HtmlSitemap, MetaRobots, UrlStructure, XmlSitemap};
use once_cell::sync::Lazy;
use reqwest::header;
use scraper::{Html, Selector};
use url::Url;

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name]").expect("meta[name] selector should be valid"));
static LINK_REL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("link[rel]").expect("link[rel] selector should be valid"));
static SITEMAP_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href*="sitemap"]"#).expect("sitemap link selector should be valid")
});

/// Content of the first `<meta name=…>` whose name matches case-insensitively
pub(crate) fn meta_content<'a>(document: &'a Html, name: &str) -> Option<&'a str> {
    document
        .select(&META_SELECTOR)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|el| el.value().attr("content"))
}

pub fn meta_robots(document: &Html) -> MetaRobots {
    let content = meta_content(document, "robots")
        .unwrap_or("")
        .to_lowercase();

    MetaRobots {
        noindex: content.contains("noindex"),
        nofollow: content.contains("nofollow"),
        noarchive: content.contains("noarchive"),
        nosnippet: content.contains("nosnippet"),
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

pub fn canonical(document: &Html, page_url: &Url) -> Canonical {
    let href = document
        .select(&LINK_REL_SELECTOR)
        .find(|el| {
            el.value().attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case("canonical"))
            })
        })
        .and_then(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty());

    let Some(href) = href else {
        return Canonical {
            errors: vec!["No canonical URL found".to_string()],
            ..Default::default()
        };
    };

    let resolved = match page_url.join(href) {
        Ok(url) => url,
        Err(e) => {
            return Canonical {
                found: true,
                errors: vec![format!("Canonical URL could not be parsed ({}): {}", e, href)],
                ..Default::default()
            };
        }
    };

    let mut errors = Vec::new();
    if resolved.host_str() != page_url.host_str() {
        errors.push(format!(
            "Canonical URL points to a different host: {}",
            resolved.host_str().unwrap_or("")
        ));
    }

    Canonical {
        found: true,
        is_self_referencing: without_fragment(&resolved) == without_fragment(page_url),
        url: Some(resolved.to_string()),
        errors,
    }
}

pub fn html_sitemap(document: &Html) -> HtmlSitemap {
    let link_count = document.select(&SITEMAP_LINK_SELECTOR).count();
    HtmlSitemap {
        found: link_count > 0,
        link_count,
    }
}

fn is_clean_segment(segment: &str) -> bool {
    segment.is_empty()
        || segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn url_structure(url: &Url) -> UrlStructure {
    let path = url.path();
    let has_parameters = url.query().is_some_and(|q| !q.is_empty());
    let is_clean = !has_parameters && path.split('/').all(is_clean_segment);

    let mut issues = Vec::new();
    if has_parameters {
        issues.push("Contains query parameters".to_string());
    }
    if path.len() > 100 {
        issues.push("URL is too long".to_string());
    }
    if path.contains('_') {
        issues.push("Contains underscores".to_string());
    }

    UrlStructure {
        is_clean,
        has_parameters,
        length: url.as_str().len(),
        is_descriptive: path.split('/').any(|segment| segment.len() > 3),
        issues,
    }
}

fn default_sitemap_url(page_url: &Url) -> Url {
    let mut url = page_url.clone();
    url.set_path("/sitemap.xml");
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Sitemap discovery result plus the candidates that failed at the network level
#[derive(Debug, Clone, Default)]
pub struct SitemapLookup {
    pub sitemap: XmlSitemap,
    pub fetch_errors: Vec<String>,
}

/// Looks for an XML sitemap at the robots.txt `Sitemap:` locations first, then
/// at `/sitemap.xml`. The first response that looks like a sitemap wins.
pub async fn analyze_xml_sitemap(
    client: &reqwest::Client,
    page_url: &Url,
    declared: &[String],
) -> SitemapLookup {
    let mut candidates: Vec<String> = declared.to_vec();
    let fallback = default_sitemap_url(page_url).to_string();
    if !candidates.contains(&fallback) {
        candidates.push(fallback);
    }

    let mut errors = Vec::new();
    let mut fetch_errors = Vec::new();

    for candidate in candidates {
        let response = match client.get(&candidate).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(url = %candidate, error = %e, "Failed to fetch sitemap");
                let message = format!("Failed to fetch sitemap {}: {}", candidate, e);
                errors.push(message.clone());
                fetch_errors.push(message);
                continue;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url = %candidate, status = %response.status(), "Sitemap not found");
            errors.push(format!(
                "Sitemap not found at {} (HTTP {})",
                candidate,
                response.status().as_u16()
            ));
            continue;
        }

        let last_modified = response
            .headers()
            .get(header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let content = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let message = format!("Failed to read sitemap {}: {}", candidate, e);
                errors.push(message.clone());
                fetch_errors.push(message);
                continue;
            }
        };

        let is_index = content.contains("<sitemapindex");
        if !is_index && !content.contains("<urlset") {
            errors.push(format!("{} is not a valid XML sitemap", candidate));
            continue;
        }

        return SitemapLookup {
            sitemap: XmlSitemap {
                found: true,
                url: Some(candidate),
                url_count: content.matches("<url>").count(),
                is_index,
                sitemap_count: content.matches("<sitemap>").count(),
                errors,
                last_modified,
            },
            fetch_errors,
        };
    }

    SitemapLookup {
        sitemap: XmlSitemap {
            errors,
            ..Default::default()
        },
        fetch_errors,
    }
}
