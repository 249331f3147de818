use clap::Parser;

use crate::http_client::DEFAULT_USER_AGENT;

#[derive(Parser, Debug)]
#[command(name = "pageaudit")]
#[command(about = "A CLI single-page SEO auditor", long_about = None)]
pub struct Cli {
    /// The URL of the page to audit
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save the JSON report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Target keyword for density analysis (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,

    /// Skip the performance analysis
    #[arg(long)]
    pub no_performance: bool,

    /// Skip the accessibility analysis
    #[arg(long)]
    pub no_accessibility: bool,

    /// Skip the vulnerability heuristics of the security analysis
    #[arg(long)]
    pub no_security_scan: bool,

    /// Verify the page's links and report broken ones
    #[arg(long)]
    pub check_links: bool,

    /// Include external links in link verification
    #[arg(short, long)]
    pub external: bool,

    /// Refuse to audit pages disallowed by robots.txt (default: false)
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub respect_robots_txt: bool,

    /// User agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds (default: 30)
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    /// Number of concurrent link checks (default: 5)
    #[arg(short = 'c', long, default_value_t = 5)]
    pub concurrency: usize,

    /// Rate limit for link checks in requests per second (e.g., 1.0 for 1 req/s)
    #[arg(short = 'r', long)]
    pub rate_limit: Option<f64>,

    /// Previous JSON report to compare against
    #[arg(long, value_name = "FILE")]
    pub compare: Option<String>,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
