use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::http_client::DEFAULT_USER_AGENT;
use crate::models::AuditConfiguration;

/// Configuration file structure that mirrors CLI arguments plus the analysis thresholds.
/// All fields are optional to allow partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Output format: text or json
    pub output: Option<String>,

    /// Save report to file
    pub save: Option<String>,

    /// Verbose output
    pub verbose: Option<bool>,

    /// Target keywords for density analysis
    pub keywords: Option<Vec<String>>,

    pub no_performance: Option<bool>,
    pub no_accessibility: Option<bool>,
    pub no_security_scan: Option<bool>,
    pub check_links: Option<bool>,

    /// Include external links in link verification
    pub external: Option<bool>,

    /// Respect robots.txt rules
    pub respect_robots_txt: Option<bool>,

    pub user_agent: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    /// Number of concurrent link checks
    pub concurrency: Option<usize>,

    /// Rate limit for link checks in requests per second
    pub rate_limit: Option<f64>,

    // File-only settings
    pub depth: Option<usize>,
    pub page_limit: Option<usize>,
    pub min_word_count: Option<usize>,
    pub performance_threshold: Option<u8>,
    pub accessibility_threshold: Option<u8>,
    pub max_page_size_kb: Option<usize>,
    pub include_schema_validation: Option<bool>,
}

/// Configuration file format based on file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    const ALL: [ConfigFormat; 3] = [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml];

    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                _ => None,
            })
    }

    pub fn extensions(&self) -> &[&str] {
        match self {
            ConfigFormat::Json => &["json"],
            ConfigFormat::Toml => &["toml"],
            ConfigFormat::Yaml => &["yaml", "yml"],
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let format = ConfigFormat::from_path(path)
            .with_context(|| format!("Unsupported config file format: {}", path.display()))?;

        let config = match format {
            ConfigFormat::Json => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            ConfigFormat::Toml => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Default configuration file paths, current directory first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        for format in &ConfigFormat::ALL {
            for ext in format.extensions() {
                paths.push(PathBuf::from(format!("pageaudit.{}", ext)));
            }
        }

        // XDG_CONFIG_HOME if set and non-empty, otherwise ~/.config
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        if let Some(config_home) = config_home {
            let app_dir = config_home.join("pageaudit");
            for format in &ConfigFormat::ALL {
                for ext in format.extensions() {
                    paths.push(app_dir.join(format!("config.{}", ext)));
                }
            }
        }

        paths
    }

    /// Returns the first configuration file found, or None if no config exists
    pub fn from_default_paths() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration file");
                return Ok(Some(Self::from_file(&path)?));
            }
        }
        Ok(None)
    }

    /// Merge this configuration with CLI arguments.
    /// Values that differ from the CLI defaults take precedence over the file.
    pub fn merge_with_cli(&self, cli: &Cli) -> Cli {
        Cli {
            url: cli.url.clone(),
            output: if cli.output != "text" {
                cli.output.clone()
            } else {
                self.output.clone().unwrap_or_else(|| cli.output.clone())
            },
            save: cli.save.clone().or_else(|| self.save.clone()),
            verbose: cli.verbose || self.verbose.unwrap_or(false),
            keywords: if cli.keywords.is_empty() {
                self.keywords.clone().unwrap_or_default()
            } else {
                cli.keywords.clone()
            },
            no_performance: cli.no_performance || self.no_performance.unwrap_or(false),
            no_accessibility: cli.no_accessibility || self.no_accessibility.unwrap_or(false),
            no_security_scan: cli.no_security_scan || self.no_security_scan.unwrap_or(false),
            check_links: cli.check_links || self.check_links.unwrap_or(false),
            external: cli.external || self.external.unwrap_or(false),
            respect_robots_txt: if cli.respect_robots_txt {
                cli.respect_robots_txt
            } else {
                self.respect_robots_txt.unwrap_or(cli.respect_robots_txt)
            },
            user_agent: if cli.user_agent != DEFAULT_USER_AGENT {
                cli.user_agent.clone()
            } else {
                self.user_agent
                    .clone()
                    .unwrap_or_else(|| cli.user_agent.clone())
            },
            timeout: if cli.timeout != 30 {
                cli.timeout
            } else {
                self.timeout.unwrap_or(cli.timeout)
            },
            concurrency: if cli.concurrency != 5 {
                cli.concurrency
            } else {
                self.concurrency.unwrap_or(cli.concurrency)
            },
            rate_limit: cli.rate_limit.or(self.rate_limit),
            compare: cli.compare.clone(),
            config: cli.config.clone(),
        }
    }

    /// Builds the audit options from already merged CLI arguments and the file-only settings
    pub fn audit_configuration(&self, cli: &Cli) -> AuditConfiguration {
        let defaults = AuditConfiguration::default();
        AuditConfiguration {
            depth: self.depth.unwrap_or(defaults.depth),
            page_limit: self.page_limit.unwrap_or(defaults.page_limit),
            min_word_count: self.min_word_count.unwrap_or(defaults.min_word_count),
            performance_threshold: self
                .performance_threshold
                .unwrap_or(defaults.performance_threshold),
            accessibility_threshold: self
                .accessibility_threshold
                .unwrap_or(defaults.accessibility_threshold),
            max_page_size_kb: self.max_page_size_kb.unwrap_or(defaults.max_page_size_kb),
            include_schema_validation: self
                .include_schema_validation
                .unwrap_or(defaults.include_schema_validation),
            ..AuditConfiguration::from(cli)
        }
    }
}

impl From<&Cli> for AuditConfiguration {
    fn from(cli: &Cli) -> Self {
        Self {
            include_external: cli.external,
            respect_robots_txt: cli.respect_robots_txt,
            user_agent: cli.user_agent.clone(),
            target_keywords: cli.keywords.clone(),
            include_performance: !cli.no_performance,
            include_accessibility: !cli.no_accessibility,
            include_security: !cli.no_security_scan,
            check_broken_links: cli.check_links,
            timeout_secs: cli.timeout,
            concurrency: cli.concurrency,
            rate_limit: cli.rate_limit,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pageaudit"];
        argv.extend_from_slice(args);
        argv.push("https://example.com");
        Cli::try_parse_from(argv).unwrap()
    }

    fn write_temp(ext: &str, content: &str) -> PathBuf {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().with_extension(ext);
        fs::write(&temp_path, content).unwrap();
        temp_path
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Some(ConfigFormat::Json)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.TOML")),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")),
            Some(ConfigFormat::Yaml)
        );
        assert_eq!(ConfigFormat::from_path(Path::new("config.txt")), None);
    }

    #[test]
    fn test_load_json_config() {
        let path = write_temp(
            "json",
            r#"{
                "output": "json",
                "keywords": ["rust", "seo"],
                "check_links": true,
                "timeout": 10,
                "min_word_count": 500
            }"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.as_deref(), Some("json"));
        assert_eq!(
            config.keywords,
            Some(vec!["rust".to_string(), "seo".to_string()])
        );
        assert_eq!(config.check_links, Some(true));
        assert_eq!(config.timeout, Some(10));
        assert_eq!(config.min_word_count, Some(500));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_toml_config() {
        let path = write_temp(
            "toml",
            r#"
concurrency = 8
performance_threshold = 75
include_schema_validation = false
            "#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.concurrency, Some(8));
        assert_eq!(config.performance_threshold, Some(75));
        assert_eq!(config.include_schema_validation, Some(false));
        assert_eq!(config.output, None);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_yaml_config() {
        let path = write_temp(
            "yml",
            r#"
respect_robots_txt: true
rate_limit: 2.5
max_page_size_kb: 1024
            "#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.respect_robots_txt, Some(true));
        assert_eq!(config.rate_limit, Some(2.5));
        assert_eq!(config.max_page_size_kb, Some(1024));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_and_unsupported_configs() {
        for (ext, content) in [
            ("json", "{ invalid json }"),
            ("toml", "[[[ invalid toml"),
            ("yaml", "timeout: [unclosed"),
            ("txt", "content"),
        ] {
            let path = write_temp(ext, content);
            assert!(Config::from_file(&path).is_err(), "{} should fail", ext);
            fs::remove_file(path).ok();
        }
    }

    #[test]
    fn test_merge_with_cli_uses_file_values_for_defaults() {
        let config = Config {
            output: Some("json".to_string()),
            keywords: Some(vec!["audit".to_string()]),
            check_links: Some(true),
            respect_robots_txt: Some(true),
            timeout: Some(12),
            concurrency: Some(9),
            rate_limit: Some(1.5),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&cli(&[]));
        assert_eq!(merged.url, "https://example.com");
        assert_eq!(merged.output, "json");
        assert_eq!(merged.keywords, ["audit"]);
        assert!(merged.check_links);
        assert!(merged.respect_robots_txt);
        assert_eq!(merged.timeout, 12);
        assert_eq!(merged.concurrency, 9);
        assert_eq!(merged.rate_limit, Some(1.5));
        assert_eq!(merged.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_merge_with_cli_overrides() {
        let config = Config {
            output: Some("json".to_string()),
            keywords: Some(vec!["audit".to_string()]),
            timeout: Some(12),
            user_agent: Some("FileBot/1.0".to_string()),
            ..Default::default()
        };

        let merged = config.merge_with_cli(&cli(&[
            "--output",
            "xml",
            "-k",
            "rust",
            "--timeout",
            "5",
            "--user-agent",
            "CliBot/2.0",
            "--save",
            "report.json",
        ]));
        assert_eq!(merged.output, "xml");
        assert_eq!(merged.keywords, ["rust"]);
        assert_eq!(merged.timeout, 5);
        assert_eq!(merged.user_agent, "CliBot/2.0");
        assert_eq!(merged.save.as_deref(), Some("report.json"));
    }

    #[test]
    fn test_audit_configuration_from_cli() {
        let options = AuditConfiguration::from(&cli(&[
            "--no-performance",
            "--no-security-scan",
            "--check-links",
            "--external",
            "--respect-robots-txt",
            "true",
        ]));
        assert!(!options.include_performance);
        assert!(options.include_accessibility);
        assert!(!options.include_security);
        assert!(options.check_broken_links);
        assert!(options.include_external);
        assert!(options.respect_robots_txt);
        assert_eq!(options.page_limit, 100);
    }

    #[test]
    fn test_audit_configuration_applies_file_only_settings() {
        let config = Config {
            depth: Some(3),
            page_limit: Some(20),
            min_word_count: Some(150),
            performance_threshold: Some(70),
            accessibility_threshold: Some(80),
            max_page_size_kb: Some(512),
            include_schema_validation: Some(false),
            ..Default::default()
        };

        let options = config.audit_configuration(&cli(&["--concurrency", "2"]));
        assert_eq!(options.depth, 3);
        assert_eq!(options.page_limit, 20);
        assert_eq!(options.min_word_count, 150);
        assert_eq!(options.performance_threshold, 70);
        assert_eq!(options.accessibility_threshold, 80);
        assert_eq!(options.max_page_size_kb, 512);
        assert!(!options.include_schema_validation);
        assert_eq!(options.concurrency, 2);
    }

    /// Isolated working directory and XDG config home, restored on drop
    struct Sandbox {
        cwd: tempfile::TempDir,
        config_home: tempfile::TempDir,
        original_dir: PathBuf,
    }

    impl Sandbox {
        fn enter() -> Self {
            let sandbox = Self {
                cwd: tempfile::tempdir().unwrap(),
                config_home: tempfile::tempdir().unwrap(),
                original_dir: std::env::current_dir().unwrap(),
            };
            std::env::set_current_dir(sandbox.cwd.path()).unwrap();
            unsafe {
                std::env::set_var("XDG_CONFIG_HOME", sandbox.config_home.path());
            }
            sandbox
        }

        fn app_dir(&self) -> PathBuf {
            let dir = self.config_home.path().join("pageaudit");
            fs::create_dir_all(&dir).unwrap();
            dir
        }
    }

    impl Drop for Sandbox {
        fn drop(&mut self) {
            std::env::set_current_dir(&self.original_dir).ok();
            unsafe {
                std::env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_paths_follow_xdg_config_home() {
        let sandbox = Sandbox::enter();

        let paths = Config::default_paths();
        assert_eq!(paths[0], PathBuf::from("pageaudit.json"));
        assert_eq!(paths.len(), 8);
        assert!(
            paths
                .iter()
                .any(|p| p.starts_with(sandbox.config_home.path().join("pageaudit")))
        );
    }

    #[test]
    #[serial]
    fn test_from_default_paths_priority_order() {
        let sandbox = Sandbox::enter();

        fs::write(sandbox.app_dir().join("config.toml"), "timeout = 20").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.timeout, Some(20));

        // The working directory wins once a file exists there
        fs::write(sandbox.cwd.path().join("pageaudit.yaml"), "timeout: 7").unwrap();
        let config = Config::from_default_paths().unwrap().unwrap();
        assert_eq!(config.timeout, Some(7));
    }

    #[test]
    #[serial]
    fn test_from_default_paths_without_files() {
        let sandbox = Sandbox::enter();
        assert!(Config::from_default_paths().unwrap().is_none());

        fs::write(sandbox.cwd.path().join("pageaudit.json"), "{ broken").unwrap();
        assert!(Config::from_default_paths().is_err());
    }
}
