//! Run configuration
//!
//! Built once by the binary and handed to the runner; nothing reads
//! process-wide state after that.

use std::path::PathBuf;
use std::time::Duration;

/// Page checked when no path is given
pub const DEFAULT_INPUT: &str = "index.html";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Desktop browser signature; some hosts reject unidentified clients
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Script identifiers holding link records
pub const DEFAULT_BLOCK_NAMES: [&str; 2] = ["institutes", "jobBoards"];

/// Redirect hops followed before giving up
pub const MAX_REDIRECTS: usize = 10;

/// Configuration for a link check run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfig {
    pub input: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
    pub block_names: Vec<String>,
    pub max_redirects: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            block_names: DEFAULT_BLOCK_NAMES.iter().map(|s| s.to_string()).collect(),
            max_redirects: MAX_REDIRECTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.input, PathBuf::from("index.html"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.block_names, vec!["institutes", "jobBoards"]);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }
}
