//! Look up building entrances near a destination.

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::EntranceCandidate;

/// Errors from [`EntranceSource::find_entrances`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntranceQueryError {
    /// The request did not complete within the configured timeout.
    #[error("entrance query to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The request could not be sent or the connection failed.
    #[error("entrance query to {url} failed: {message}")]
    NetworkError {
        /// Endpoint that was queried.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("entrance query to {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse entrance query response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
}

/// Source of entrance candidates for a destination.
///
/// Implementations return every entrance they know of near `destination`, in
/// the order the backing service reports them. An empty list is a valid
/// answer; callers decide how to fall back.
#[async_trait]
pub trait EntranceSource: Send + Sync {
    /// Find entrance candidates near `destination`.
    async fn find_entrances(
        &self,
        destination: Coord<f64>,
    ) -> Result<Vec<EntranceCandidate>, EntranceQueryError>;
}
