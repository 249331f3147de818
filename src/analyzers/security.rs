use crate::models::{
    MixedContent, MixedContentKind, SecurityAudit, SecurityHeaders, Vulnerability,
    VulnerabilitySeverity,
};
use once_cell::sync::Lazy;
use reqwest::header::{self, HeaderMap};
use scraper::{Html, Selector};
use url::Url;

static RESOURCE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[src], link[href], img[src], iframe[src]")
        .expect("resource selector should be valid")
});
static INLINE_SCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script:not([src])").expect("inline script selector should be valid")
});

pub fn analyze(
    document: &Html,
    page_url: &Url,
    headers: &HeaderMap,
    include_vulnerability_scan: bool,
) -> SecurityAudit {
    let https_enabled = page_url.scheme() == "https";

    SecurityAudit {
        https_enabled,
        mixed_content: if https_enabled {
            mixed_content(document)
        } else {
            vec![]
        },
        server_signature: headers
            .get(header::SERVER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        security_headers: security_headers(headers),
        vulnerabilities: if include_vulnerability_scan {
            vulnerabilities(document, headers)
        } else {
            vec![]
        },
    }
}

/// Plain `http://` references from the page. Every `<link href>` counts, whatever its `rel`.
pub fn mixed_content(document: &Html) -> Vec<MixedContent> {
    let mut found = Vec::new();

    for element in document.select(&RESOURCE_SELECTOR) {
        let el = element.value();
        let src = el.attr("src").or_else(|| el.attr("href")).unwrap_or("").trim();
        if !src.to_ascii_lowercase().starts_with("http://") {
            continue;
        }

        let kind = match el.name() {
            "img" => MixedContentKind::Image,
            "script" => MixedContentKind::Script,
            "iframe" => MixedContentKind::Iframe,
            "link" => MixedContentKind::Stylesheet,
            _ => MixedContentKind::Other,
        };

        found.push(MixedContent {
            kind,
            url: src.to_string(),
            description: format!("{} element loads HTTP resource", el.name()),
        });
    }

    found
}

pub fn security_headers(headers: &HeaderMap) -> SecurityHeaders {
    SecurityHeaders {
        content_security_policy: headers.contains_key(header::CONTENT_SECURITY_POLICY),
        strict_transport_security: headers.contains_key(header::STRICT_TRANSPORT_SECURITY),
        x_frame_options: headers.contains_key(header::X_FRAME_OPTIONS),
        x_content_type_options: headers.contains_key(header::X_CONTENT_TYPE_OPTIONS),
        referrer_policy: headers.contains_key(header::REFERRER_POLICY),
        permissions_policy: headers.contains_key("permissions-policy"),
    }
}

fn vulnerability(kind: &str, description: &str, recommendation: &str) -> Vulnerability {
    Vulnerability {
        kind: kind.to_string(),
        severity: VulnerabilitySeverity::Medium,
        description: description.to_string(),
        recommendation: recommendation.to_string(),
    }
}

/// Naive heuristics: inline scripts and missing anti-sniffing / framing headers
pub fn vulnerabilities(document: &Html, headers: &HeaderMap) -> Vec<Vulnerability> {
    let mut found = Vec::new();

    if document.select(&INLINE_SCRIPT_SELECTOR).next().is_some() {
        found.push(vulnerability(
            "Inline JavaScript detected",
            "The page contains inline scripts, which prevents a strict Content-Security-Policy",
            "Move inline scripts into external files or allow them with CSP nonces or hashes",
        ));
    }
    if !headers.contains_key(header::X_CONTENT_TYPE_OPTIONS) {
        found.push(vulnerability(
            "Missing X-Content-Type-Options header",
            "Browsers may MIME-sniff responses into executable content",
            "Send X-Content-Type-Options: nosniff",
        ));
    }
    if !headers.contains_key(header::X_FRAME_OPTIONS) {
        found.push(vulnerability(
            "Missing X-Frame-Options header",
            "The page can be embedded in frames on other sites (clickjacking)",
            "Send X-Frame-Options: DENY or SAMEORIGIN, or a CSP frame-ancestors directive",
        ));
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn hardened_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000"),
        );
        headers.insert(header::SERVER, HeaderValue::from_static("nginx"));
        headers
    }

    #[test]
    fn test_mixed_content_kinds() {
        let document = Html::parse_document(
            r#"<head>
            <link rel="stylesheet" href="http://cdn.example.com/site.css">
            <link rel="icon" href="http://cdn.example.com/favicon.ico">
            <link rel="alternate" href="http://example.com/fr/">
            <script src="http://cdn.example.com/app.js"></script>
            </head><body>
            <img src="http://cdn.example.com/a.png">
            <img src="https://cdn.example.com/b.png">
            <iframe src="http://video.example.com/embed"></iframe>
            </body>"#,
        );

        let kinds: Vec<_> = mixed_content(&document).into_iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            [
                MixedContentKind::Stylesheet,
                MixedContentKind::Stylesheet,
                MixedContentKind::Stylesheet,
                MixedContentKind::Script,
                MixedContentKind::Image,
                MixedContentKind::Iframe,
            ]
        );
    }

    #[test]
    fn test_mixed_content_only_reported_on_https() {
        let document = Html::parse_document(r#"<img src="http://cdn.example.com/a.png">"#);
        let headers = HeaderMap::new();

        let plain = analyze(
            &document,
            &Url::parse("http://example.com/").unwrap(),
            &headers,
            true,
        );
        assert!(!plain.https_enabled);
        assert!(plain.mixed_content.is_empty());

        let secure = analyze(
            &document,
            &Url::parse("https://example.com/").unwrap(),
            &headers,
            true,
        );
        assert!(secure.https_enabled);
        assert_eq!(secure.mixed_content.len(), 1);
        assert_eq!(secure.mixed_content[0].description, "img element loads HTTP resource");
    }

    #[test]
    fn test_security_headers_and_server_signature() {
        let document = Html::parse_document("<p>hi</p>");
        let audit = analyze(
            &document,
            &Url::parse("https://example.com/").unwrap(),
            &hardened_headers(),
            true,
        );

        assert!(audit.security_headers.strict_transport_security);
        assert!(audit.security_headers.x_frame_options);
        assert!(!audit.security_headers.content_security_policy);
        assert_eq!(audit.server_signature.as_deref(), Some("nginx"));
        assert!(audit.vulnerabilities.is_empty());
    }

    #[test]
    fn test_any_script_without_src_is_inline() {
        let headers = hardened_headers();

        let external = Html::parse_document(r#"<script src="/app.js"></script>"#);
        assert!(vulnerabilities(&external, &headers).is_empty());

        let json_ld = Html::parse_document(
            r#"<script type="application/ld+json">{"@type":"WebSite"}</script>"#,
        );
        let found = vulnerabilities(&json_ld, &headers);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, "Inline JavaScript detected");
        assert_eq!(found[0].severity, VulnerabilitySeverity::Medium);
    }

    #[test]
    fn test_https_page_with_http_head_links() {
        let document = Html::parse_document(
            r#"<head>
            <link rel="canonical" href="http://example.com/">
            <link rel="alternate" hreflang="fr" href="http://example.com/fr/">
            <script type="application/ld+json">{"@type":"Organization"}</script>
            </head><body><a href="http://example.com/about">About</a></body>"#,
        );
        let audit = analyze(
            &document,
            &Url::parse("https://example.com/").unwrap(),
            &HeaderMap::new(),
            true,
        );

        assert_eq!(audit.mixed_content.len(), 2);
        assert!(
            audit
                .mixed_content
                .iter()
                .all(|m| m.kind == MixedContentKind::Stylesheet)
        );
        assert_eq!(audit.vulnerabilities.len(), 3);
    }

    #[test]
    fn test_vulnerability_scan_can_be_disabled() {
        let document = Html::parse_document(r#"<script>alert(1)</script>"#);
        let url = Url::parse("https://example.com/").unwrap();

        assert_eq!(analyze(&document, &url, &HeaderMap::new(), true).vulnerabilities.len(), 3);
        assert!(analyze(&document, &url, &HeaderMap::new(), false).vulnerabilities.is_empty());
    }
}
