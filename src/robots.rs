use crate::models::RobotsTxtReport;
use std::collections::HashMap;
use url::Url;

const KNOWN_DIRECTIVES: &[&str] = &[
    "user-agent",
    "allow",
    "disallow",
    "sitemap",
    "crawl-delay",
    "host",
    "clean-param",
];

/// Represents a robots.txt rule (either Allow or Disallow)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    pattern: String,
    is_allow: bool,
}

/// Parsed robots.txt for a single origin
#[derive(Debug, Default)]
pub struct RobotsTxt {
    /// Rules grouped by user-agent token (lowercased)
    groups: HashMap<String, Vec<Rule>>,
    sitemaps: Vec<String>,
    warnings: Vec<String>,
}

impl RobotsTxt {
    /// Parses robots.txt content. Relative `Sitemap:` values are resolved
    /// against `base` when one is given.
    pub fn parse(content: &str, base: Option<&Url>) -> Self {
        let mut robots = Self::default();
        let mut current_agents: Vec<String> = Vec::new();
        let mut in_rules = false;

        for (line_no, raw) in content.lines().enumerate() {
            let line = match raw.find('#') {
                Some(pos) => &raw[..pos],
                None => raw,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let Some((field, value)) = line.split_once(':') else {
                robots
                    .warnings
                    .push(format!("Line {} is not a directive: {}", line_no + 1, line));
                continue;
            };

            let field = field.trim().to_lowercase();
            let value = value.trim();

            match field.as_str() {
                "user-agent" => {
                    if value.is_empty() {
                        robots
                            .warnings
                            .push(format!("Empty User-agent on line {}", line_no + 1));
                        continue;
                    }
                    // Consecutive User-agent lines share one group
                    if in_rules {
                        current_agents.clear();
                        in_rules = false;
                    }
                    let agent = value.to_lowercase();
                    robots.groups.entry(agent.clone()).or_default();
                    current_agents.push(agent);
                }
                "allow" | "disallow" => {
                    in_rules = true;
                    // An empty Disallow allows everything, which is the default
                    if value.is_empty() {
                        continue;
                    }
                    let rule = Rule {
                        pattern: value.to_string(),
                        is_allow: field == "allow",
                    };
                    for agent in &current_agents {
                        robots
                            .groups
                            .entry(agent.clone())
                            .or_default()
                            .push(rule.clone());
                    }
                }
                "sitemap" => {
                    let resolved = base
                        .and_then(|b| b.join(value).ok())
                        .map(|u| u.to_string())
                        .unwrap_or_else(|| value.to_string());
                    robots.sitemaps.push(resolved);
                }
                other if KNOWN_DIRECTIVES.contains(&other) => {
                    in_rules = true;
                }
                other => {
                    robots.warnings.push(format!(
                        "Unknown directive '{}' on line {}",
                        other,
                        line_no + 1
                    ));
                }
            }
        }

        if robots.blocks_everything() {
            robots
                .warnings
                .push("robots.txt disallows all crawlers from the entire site".to_string());
        }

        robots
    }

    /// Checks if a URL may be crawled by the given user agent
    pub fn is_allowed(&self, url: &Url, user_agent: &str) -> bool {
        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        match self.group_for(user_agent) {
            Some(rules) => check_rules(rules, &path),
            None => true,
        }
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Picks the most specific group naming the agent's product token, falling back to `*`.
    /// Equally long matches resolve to the alphabetically first agent.
    fn group_for(&self, user_agent: &str) -> Option<&Vec<Rule>> {
        let token = user_agent
            .split('/')
            .next()
            .unwrap_or(user_agent)
            .trim()
            .to_lowercase();

        self.groups
            .iter()
            .filter(|(agent, _)| agent.as_str() != "*" && token.contains(agent.as_str()))
            .max_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| b.cmp(a)))
            .map(|(_, rules)| rules)
            .or_else(|| self.groups.get("*"))
    }

    fn blocks_everything(&self) -> bool {
        self.groups
            .get("*")
            .is_some_and(|rules| !check_rules(rules, "/") && !rules.iter().any(|r| r.is_allow))
    }
}

/// Longest matching rule wins; on equal length Allow wins
fn check_rules(rules: &[Rule], path: &str) -> bool {
    let mut allowed = true;
    let mut best_len: Option<usize> = None;

    for rule in rules {
        if !path_matches(&rule.pattern, path) {
            continue;
        }
        let len = rule.pattern.len();
        match best_len {
            Some(best) if len < best => {}
            Some(best) if len == best => allowed |= rule.is_allow,
            _ => {
                best_len = Some(len);
                allowed = rule.is_allow;
            }
        }
    }

    allowed
}

/// Checks if a path matches a pattern (supports `*` and a trailing `$`)
fn path_matches(pattern: &str, path: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };

    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or("");
    let Some(mut rest) = path.strip_prefix(first) else {
        return false;
    };

    let parts: Vec<&str> = parts.collect();
    if parts.is_empty() {
        return !anchored || rest.is_empty();
    }

    for (idx, part) in parts.iter().enumerate() {
        if anchored && idx == parts.len() - 1 {
            return rest.ends_with(part);
        }
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }

    true
}

/// Gets the robots.txt URL for a page
pub fn robots_url(page_url: &Url) -> Url {
    let mut url = page_url.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Outcome of fetching robots.txt: the report plus the network failure, if any
#[derive(Debug, Clone, Default)]
pub struct RobotsLookup {
    pub report: RobotsTxtReport,
    /// Set when the file could not be fetched or read. A plain 404 is not a failure.
    pub fetch_error: Option<String>,
}

/// Fetches robots.txt for the page's origin and evaluates it for `user_agent`.
///
/// Never fails: a missing or unreachable file yields `found = false` and
/// `allows = false`.
pub async fn analyze_robots_txt(
    client: &reqwest::Client,
    page_url: &Url,
    user_agent: &str,
) -> RobotsLookup {
    let url = robots_url(page_url);

    let response = match client.get(url.as_str()).send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to fetch robots.txt");
            return unreachable_robots(format!("Failed to fetch robots.txt: {}", e));
        }
    };

    if !response.status().is_success() {
        tracing::info!(url = %url, status = %response.status(), "robots.txt not found");
        return RobotsLookup {
            report: RobotsTxtReport {
                errors: vec!["robots.txt not found".to_string()],
                ..Default::default()
            },
            fetch_error: None,
        };
    }

    let content = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to read robots.txt body");
            return unreachable_robots(format!("Failed to read robots.txt: {}", e));
        }
    };

    let robots = RobotsTxt::parse(&content, Some(&url));
    RobotsLookup {
        report: RobotsTxtReport {
            found: true,
            allows: robots.is_allowed(page_url, user_agent),
            errors: vec![],
            warnings: robots.warnings().to_vec(),
            sitemaps: robots.sitemaps().to_vec(),
        },
        fetch_error: None,
    }
}

fn unreachable_robots(message: String) -> RobotsLookup {
    RobotsLookup {
        report: RobotsTxtReport {
            errors: vec![message.clone()],
            ..Default::default()
        },
        fetch_error: Some(message),
    }
}
