pub mod analyzers;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod engine;
pub mod error;
pub mod http_client;
pub mod issues;
pub mod link_checker;
pub mod models;
pub mod reporter;
pub mod robots;
pub mod scoring;
pub mod summary;

use anyhow::Result;
use cli::Cli;
use colored::*;
use config::Config;
use engine::AuditEngine;
use reporter::Reporter;
use std::path::Path;

pub async fn run(args: Cli) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_default_paths()?.unwrap_or_default(),
    };
    let args = file_config.merge_with_cli(&args);
    let audit_config = file_config.audit_configuration(&args);

    let json_output = args.output == "json";
    if !json_output {
        println!("{}", "PageAudit - Single Page SEO Auditor".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!();
        println!("{} {}", "Auditing:".bright_white().bold(), args.url);
        println!();
    }

    let mut engine = AuditEngine::new(audit_config)?;
    if let Some(previous) = &args.compare {
        engine = engine.with_previous_result(comparison::load_previous_report(previous)?);
    }
    if args.verbose {
        engine.enable_progress_bar();
    }

    let result = engine.run_audit(&args.url).await?;

    if json_output {
        println!("{}", Reporter::to_json(&result)?);
    } else {
        Reporter::print_text_report(&result);
    }

    if let Some(filename) = &args.save {
        Reporter::save_json_report(&result, filename)?;
    }

    Ok(())
}
