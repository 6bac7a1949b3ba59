//! check-links command: validate the links embedded in a page
//!
//! Text output mirrors what a CI log reader wants to see line by line;
//! `--format json` keeps stdout machine-readable and moves progress to stderr.

use crate::config::{
    CheckConfig, DEFAULT_BLOCK_NAMES, DEFAULT_INPUT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::extract::Extraction;
use crate::runner::{CheckRunner, Progress};
use crate::schema::{CheckResult, LinkStatus, OverallStatus, Report};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CheckLinksArgs {
    /// HTML file holding the data arrays
    #[arg(value_name = "FILE", env = "LINK_CHECKER_FILE", default_value = DEFAULT_INPUT)]
    pub file: PathBuf,

    /// Timeout per URL in seconds
    #[arg(long, env = "LINK_CHECKER_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// User-Agent sent with every request
    #[arg(long, env = "LINK_CHECKER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Script identifier of a data array (repeatable)
    #[arg(long = "block", value_name = "NAME", default_values_t = DEFAULT_BLOCK_NAMES.map(String::from).to_vec())]
    pub blocks: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CheckLinksArgs {
    pub fn config(&self) -> CheckConfig {
        CheckConfig {
            input: self.file.clone(),
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            block_names: self.blocks.clone(),
            ..CheckConfig::default()
        }
    }
}

/// Compact JSON report
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub ok: usize,
    pub failed: usize,
    pub checked_at: String,
    pub results: Vec<JsonResult<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonResult<'a> {
    pub url: &'a str,
    pub status: &'a LinkStatus,
    pub ok: bool,
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            ok: report.ok_count(),
            failed: report.failure_count(),
            checked_at: Utc::now().to_rfc3339(),
            results: report
                .results()
                .iter()
                .map(|r| JsonResult {
                    url: &r.url,
                    status: &r.status,
                    ok: r.is_ok(),
                })
                .collect(),
        }
    }
}

/// Run the check-links command and return the outcome for the exit code
pub async fn run_check_links(args: CheckLinksArgs) -> Result<OverallStatus> {
    let runner = CheckRunner::new(args.config()).context("Failed to set up link checker")?;
    let mut console = Console {
        format: args.format,
    };

    let (report, overall) = runner.run_file(&mut console).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&JsonReport::new(&report))?),
        OutputFormat::Text => print_summary(&report),
    }

    Ok(overall)
}

fn print_summary(report: &Report) {
    if report.is_empty() {
        println!("No URLs found to check. Exiting.");
        return;
    }

    println!();
    println!("--- Link Check Complete ---");
    if report.failure_count() == 0 {
        println!("All links are working correctly!");
    } else {
        println!("Found {} broken links:", report.failure_count());
        for failure in report.failures() {
            println!("  - {} ({})", failure.url, failure_reason(&failure.status));
        }
    }
}

/// The reason part of a failed status, without the `FAILED: ` prefix
fn failure_reason(status: &LinkStatus) -> String {
    match status {
        LinkStatus::Ok => "OK".to_string(),
        LinkStatus::Failed(reason) => reason.to_string(),
    }
}

/// Prints progress to stdout for text output, stderr for JSON
struct Console {
    format: OutputFormat,
}

impl Console {
    fn line(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => eprintln!("{}", message),
        }
    }
}

impl Progress for Console {
    fn reading(&mut self, path: &Path) {
        self.line(&format!("--- Parsing HTML file: {} ---", path.display()));
    }

    fn extracted(&mut self, extraction: &Extraction) {
        self.line(&format!(
            "Found {} data array(s) in the script tag.",
            extraction.blocks_found
        ));
        self.line(&format!(
            "--- Found {} unique URLs to check ---",
            extraction.urls.len()
        ));
    }

    fn checking(&mut self, index: usize, total: usize, url: &str) {
        self.line(&format!("Checking ({}/{}): {}", index, total, url));
    }

    fn checked(&mut self, result: &CheckResult) {
        match &result.status {
            LinkStatus::Ok => self.line("  -> OK"),
            status => self.line(&format!("  -> {}", status)),
        }
    }
}
