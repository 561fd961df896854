//! HTTP-backed [`EntranceSource`].

use std::time::Duration;

use async_trait::async_trait;
use doorstep_core::{EntranceCandidate, EntranceQueryError, EntranceSource};
use geo::Coord;
use log::{debug, warn};
use reqwest::Client;
use url::Url;

use super::query::build_entrance_query;
use super::response::{OverpassResponse, filter_entrances};
use crate::client::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, TransportFailure, build_client,
    parse_endpoint,
};

/// Public Overpass interpreter.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Search radius around the destination, in metres.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 10.0;

/// Configuration for [`OverpassEntranceSource`].
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Building search radius in metres.
    pub radius_m: f64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OVERPASS_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            radius_m: DEFAULT_SEARCH_RADIUS_M,
        }
    }
}

impl OverpassConfig {
    /// Create a new configuration with the given interpreter URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the building search radius.
    #[must_use]
    pub fn with_radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }
}

/// Entrance lookup against an Overpass interpreter.
///
/// The HTTP client is built once and reused for every lookup.
pub struct OverpassEntranceSource {
    client: Client,
    endpoint: Url,
    config: OverpassConfig,
}

impl std::fmt::Debug for OverpassEntranceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassEntranceSource")
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OverpassEntranceSource {
    /// Create a source for the interpreter at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = parse_endpoint(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Interpreter URL with the entrance query in the `data` parameter.
    fn build_request_url(&self, destination: Coord<f64>) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("data", &build_entrance_query(destination, self.config.radius_m));
        url
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> EntranceQueryError {
        let url = self.endpoint.to_string();
        match TransportFailure::classify(error) {
            TransportFailure::Timeout => EntranceQueryError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status { status, message } => EntranceQueryError::HttpError {
                url,
                status,
                message,
            },
            TransportFailure::Network { message } => {
                EntranceQueryError::NetworkError { url, message }
            }
        }
    }
}

fn convert_body(body: &[u8]) -> Result<Vec<EntranceCandidate>, EntranceQueryError> {
    let response: OverpassResponse =
        serde_json::from_slice(body).map_err(|err| EntranceQueryError::ParseError {
            message: err.to_string(),
        })?;
    if let Some(remark) = &response.remark {
        warn!("overpass remark: {remark}");
    }
    Ok(filter_entrances(response))
}

#[async_trait]
impl EntranceSource for OverpassEntranceSource {
    async fn find_entrances(
        &self,
        destination: Coord<f64>,
    ) -> Result<Vec<EntranceCandidate>, EntranceQueryError> {
        let url = self.build_request_url(destination);
        debug!(
            "querying {} for entrances near ({}, {})",
            self.endpoint, destination.y, destination.x
        );

        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err))?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;

        let entrances = convert_body(&body)?;
        debug!("overpass returned {} entrances", entrances.len());
        Ok(entrances)
    }
}
