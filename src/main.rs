//! link-checker CLI
//!
//! Checks the URLs in a page's `institutes`/`jobBoards` script arrays.
//! Exits non-zero when any link is broken so CI jobs fail.

use anyhow::Result;
use clap::Parser;
use link_checker::{run_check_links, CheckLinksArgs};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "link-checker")]
#[command(version)]
#[command(about = "Check that links embedded in a page's script data are reachable")]
#[command(long_about = "Finds the named data arrays in an HTML file, sends a HEAD request to every \
url/homepageUrl they contain, and exits with status 1 if any link is broken.")]
struct Cli {
    #[command(flatten)]
    args: CheckLinksArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("link_checker=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let overall = run_check_links(cli.args).await?;
    Ok(ExitCode::from(overall.exit_code()))
}
