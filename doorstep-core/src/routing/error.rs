use thiserror::Error;

/// Errors from [`crate::routing::RoutingEngine`] calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// A request to the routing backend timed out.
    #[error("routing request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The request could not be sent or the connection failed.
    #[error("routing request to {url} failed: {message}")]
    NetworkError {
        /// Endpoint that was queried.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The backend answered with a non-success status.
    #[error("routing request to {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// Routing data could not be decoded.
    #[error("failed to parse routing data: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// The query spans more routing data than the engine will load.
    #[error("route needs {required} tiles but at most {limit} may be loaded")]
    AreaTooLarge {
        /// Tiles needed to cover the query.
        required: usize,
        /// Configured limit.
        limit: usize,
    },
    /// No routable ways were found around the query points.
    #[error("no routable network near the requested points")]
    EmptyNetwork,
}
