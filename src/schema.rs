//! Records, check results and reports
//!
//! The status vocabulary here is what ends up on the console and in the
//! JSON report, so the `Display` strings are part of the interface.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Field holding a record's primary link
pub const URL_FIELD: &str = "url";
/// Field holding a record's homepage link
pub const HOMEPAGE_URL_FIELD: &str = "homepageUrl";

/// A single entry of a data block, reduced to its link fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub url: Option<String>,
    pub homepage_url: Option<String>,
}

impl Record {
    /// Read the link fields of a decoded entry. Returns `None` for entries
    /// that are not objects. Empty or non-string fields count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let link = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Some(Self {
            url: link(URL_FIELD),
            homepage_url: link(HOMEPAGE_URL_FIELD),
        })
    }

    /// Present link fields, primary first
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.url
            .as_deref()
            .into_iter()
            .chain(self.homepage_url.as_deref())
    }
}

/// Category of a transport-level probe failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    Timeout,
    DnsFailure,
    ConnectionRefused,
    TlsError,
    ConnectionError,
    TooManyRedirects,
    InvalidUrl,
    RequestError,
}

impl fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestErrorKind::Timeout => "Timeout",
            RequestErrorKind::DnsFailure => "DnsFailure",
            RequestErrorKind::ConnectionRefused => "ConnectionRefused",
            RequestErrorKind::TlsError => "TlsError",
            RequestErrorKind::ConnectionError => "ConnectionError",
            RequestErrorKind::TooManyRedirects => "TooManyRedirects",
            RequestErrorKind::InvalidUrl => "InvalidUrl",
            RequestErrorKind::RequestError => "RequestError",
        };
        f.write_str(name)
    }
}

/// Why a link failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Response received with status >= 400
    Status(u16),
    /// No response: timeout, DNS, refused connection, TLS, ...
    Request(RequestErrorKind),
    /// Anything the probe did not anticipate
    Unexpected(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Status(code) => write!(f, "Status {}", code),
            FailureReason::Request(kind) => write!(f, "Request Error ({})", kind),
            FailureReason::Unexpected(message) => {
                write!(f, "An unexpected error occurred ({})", message)
            }
        }
    }
}

/// Outcome of one link check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Ok,
    Failed(FailureReason),
}

impl LinkStatus {
    /// Map an HTTP status code: anything below 400 is reachable
    pub fn from_status_code(code: u16) -> Self {
        if code >= 400 {
            LinkStatus::Failed(FailureReason::Status(code))
        } else {
            LinkStatus::Ok
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, LinkStatus::Ok)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Ok => f.write_str("OK"),
            LinkStatus::Failed(reason) => write!(f, "FAILED: {}", reason),
        }
    }
}

impl Serialize for LinkStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result for a single URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub url: String,
    pub status: LinkStatus,
}

impl CheckResult {
    pub fn new(url: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// Overall run outcome, surfaced as the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallStatus {
    Success,
    Failure,
}

impl OverallStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            OverallStatus::Success => 0,
            OverallStatus::Failure => 1,
        }
    }
}

/// Ordered results of a run, one per discovered URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    results: Vec<CheckResult>,
}

impl Report {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn ok_count(&self) -> usize {
        self.len() - self.failure_count()
    }

    /// Failure if and only if at least one result is not OK
    pub fn overall(&self) -> OverallStatus {
        if self.failures().next().is_some() {
            OverallStatus::Failure
        } else {
            OverallStatus::Success
        }
    }
}
