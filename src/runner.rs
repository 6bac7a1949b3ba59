//! Check orchestration: extract, then probe every URL in order

use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::extract::{Extraction, RecordExtractor};
use crate::probe::LinkValidator;
use crate::schema::{CheckResult, OverallStatus, Report};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

/// Hooks for live progress output. All methods default to doing nothing.
pub trait Progress {
    fn reading(&mut self, _path: &Path) {}
    fn extracted(&mut self, _extraction: &Extraction) {}
    fn checking(&mut self, _index: usize, _total: usize, _url: &str) {}
    fn checked(&mut self, _result: &CheckResult) {}
}

/// Progress sink that discards everything
pub struct Silent;

impl Progress for Silent {}

/// Runs a full check with one extractor and one HTTP client
pub struct CheckRunner {
    config: CheckConfig,
    extractor: RecordExtractor,
    validator: LinkValidator,
}

impl CheckRunner {
    pub fn new(config: CheckConfig) -> Result<Self, CheckError> {
        let extractor = RecordExtractor::new(config.block_names.as_slice())?;
        let validator = LinkValidator::new(&config)?;
        Ok(Self {
            config,
            extractor,
            validator,
        })
    }

    /// Read the configured input file and check it
    pub async fn run_file(
        &self,
        progress: &mut dyn Progress,
    ) -> Result<(Report, OverallStatus), CheckError> {
        let path = &self.config.input;
        progress.reading(path);

        let document = tokio::fs::read_to_string(path).await.map_err(|source| {
            let path = path.clone();
            if source.kind() == ErrorKind::NotFound {
                CheckError::MissingInput { path, source }
            } else {
                CheckError::ReadInput { path, source }
            }
        })?;

        self.run(&document, progress).await
    }

    /// Check every URL found in `document`, one at a time.
    ///
    /// Zero URLs is a success with an empty report.
    pub async fn run(
        &self,
        document: &str,
        progress: &mut dyn Progress,
    ) -> Result<(Report, OverallStatus), CheckError> {
        let extraction = self.extractor.extract(document)?;
        info!(
            blocks = extraction.blocks_found,
            skipped = extraction.skipped.len(),
            urls = extraction.urls.len(),
            "Extracted links"
        );
        progress.extracted(&extraction);

        let total = extraction.urls.len();
        let mut report = Report::with_capacity(total);
        for (i, url) in extraction.urls.iter().enumerate() {
            progress.checking(i + 1, total, url);
            let result = self.validator.check(url).await;
            progress.checked(&result);
            report.push(result);
        }

        let overall = report.overall();
        Ok((report, overall))
    }
}
