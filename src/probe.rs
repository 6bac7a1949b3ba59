//! Link probing over HTTP
//!
//! One HEAD request per URL through a shared client. Every outcome, including
//! errors the client reports, is folded into a [`CheckResult`].

use crate::config::CheckConfig;
use crate::schema::{CheckResult, FailureReason, LinkStatus, RequestErrorKind};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::error::Error as StdError;
use std::io;
use tracing::debug;
use url::Url;

/// Checks single URLs; holds the connection pool for the whole run
#[derive(Debug, Clone)]
pub struct LinkValidator {
    client: Client,
}

impl LinkValidator {
    pub fn new(config: &CheckConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    /// Probe `url` once and classify the outcome. Never fails.
    pub async fn check(&self, url: &str) -> CheckResult {
        let status = match self.probe(url).await {
            Ok(code) => LinkStatus::from_status_code(code),
            Err(reason) => LinkStatus::Failed(reason),
        };
        CheckResult::new(url, status)
    }

    async fn probe(&self, url: &str) -> Result<u16, FailureReason> {
        let target = match Url::parse(url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => return Err(FailureReason::Request(RequestErrorKind::InvalidUrl)),
        };

        let response = self
            .client
            .head(target)
            .send()
            .await
            .map_err(|e| classify_error(&e))?;

        if response.url().as_str() != url {
            debug!(url, final_url = %response.url(), "Followed redirect");
        }
        Ok(response.status().as_u16())
    }
}

/// Map a client error onto the failure vocabulary
fn classify_error(err: &reqwest::Error) -> FailureReason {
    debug!(error = ?err, "Probe failed");

    let kind = if err.is_timeout() {
        RequestErrorKind::Timeout
    } else if err.is_redirect() {
        RequestErrorKind::TooManyRedirects
    } else if err.is_builder() {
        RequestErrorKind::InvalidUrl
    } else if err.is_connect() {
        classify_connect(err)
    } else if err.is_request() {
        RequestErrorKind::RequestError
    } else {
        return FailureReason::Unexpected(err.to_string());
    };
    FailureReason::Request(kind)
}

/// Walk the source chain of a connect error for something more specific.
///
/// The outer error's message embeds the request URL, so only its sources
/// are matched by text.
fn classify_connect(err: &(dyn StdError + 'static)) -> RequestErrorKind {
    let chain = || std::iter::successors(Some(err), |&e| e.source());

    for e in chain() {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            match io_err.kind() {
                io::ErrorKind::ConnectionRefused => return RequestErrorKind::ConnectionRefused,
                io::ErrorKind::TimedOut => return RequestErrorKind::Timeout,
                _ => {}
            }
        }
    }

    chain()
        .skip(1)
        .find_map(|e| classify_message(&e.to_string()))
        .unwrap_or(RequestErrorKind::ConnectionError)
}

fn classify_message(message: &str) -> Option<RequestErrorKind> {
    let lower = message.to_lowercase();
    if lower.contains("dns error")
        || lower.contains("failed to lookup address")
        || lower.contains("name or service not known")
        || lower.contains("no such host")
    {
        Some(RequestErrorKind::DnsFailure)
    } else if lower.contains("connection refused") {
        Some(RequestErrorKind::ConnectionRefused)
    } else if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        Some(RequestErrorKind::TlsError)
    } else if lower.contains("timed out") {
        Some(RequestErrorKind::Timeout)
    } else {
        None
    }
}
