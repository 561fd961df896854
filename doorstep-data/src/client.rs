//! HTTP client construction and transport error classification shared by
//! the adapters.

use std::time::Duration;

use reqwest::Client;

/// Default user agent for outgoing requests.
pub const DEFAULT_USER_AGENT: &str = "doorstep/0.1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error type for adapter construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
    /// The configured endpoint is not a valid URL.
    InvalidUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        source: url::ParseError,
    },
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::InvalidUrl { url, source } => write!(f, "invalid endpoint {url:?}: {source}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::InvalidUrl { source, .. } => Some(source),
        }
    }
}

pub(crate) fn build_client(
    user_agent: &str,
    timeout: Duration,
) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

pub(crate) fn parse_endpoint(raw: &str) -> Result<url::Url, ProviderBuildError> {
    url::Url::parse(raw).map_err(|source| ProviderBuildError::InvalidUrl {
        url: raw.to_owned(),
        source,
    })
}

/// Transport failure, independent of the error type a caller reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    Timeout,
    Status { status: u16, message: String },
    Network { message: String },
}

impl TransportFailure {
    pub(crate) fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout;
        }
        if let Some(status) = error.status() {
            return Self::Status {
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        Self::Network {
            message: error.to_string(),
        }
    }
}
