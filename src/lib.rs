//! link-checker: verify the links embedded in a page's script data
//!
//! Pipeline:
//! - extract: locate named array literals and collect their URL fields
//! - probe: HEAD-check each URL and classify failures
//! - runner: drive both and produce a report with an overall status

pub mod check_links;
pub mod config;
pub mod error;
pub mod extract;
pub mod lenient;
pub mod probe;
pub mod runner;
pub mod schema;

pub use check_links::{run_check_links, CheckLinksArgs, OutputFormat};
pub use config::CheckConfig;
pub use error::{BlockError, CheckError, ExtractError};
pub use extract::{Extraction, NamedArrayBlock, RecordExtractor, UrlSet};
pub use probe::LinkValidator;
pub use runner::{CheckRunner, Progress, Silent};
pub use schema::{CheckResult, FailureReason, LinkStatus, OverallStatus, Record, Report};
