//! Routing engine trait and query type.

use async_trait::async_trait;
use geo::Coord;

use crate::path::Path;

use super::error::RoutingError;

/// A single origin → destination routing request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuery {
    /// Where the driver starts.
    pub from: Coord<f64>,
    /// Entrance or raw destination to reach.
    pub to: Coord<f64>,
    /// Restrict the path to the road/path network, without free-space legs
    /// from the raw points onto the network.
    pub road_network_only: bool,
}

/// Graph-based path search over a road/path network.
///
/// Engines are constructed from explicit configuration; no process-wide
/// state is consulted.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use doorstep_core::{Location, Path, RouteQuery, RoutingEngine, RoutingError, Step};
///
/// struct StraightLine;
///
/// #[async_trait]
/// impl RoutingEngine for StraightLine {
///     async fn query(&self, query: &RouteQuery) -> Result<Option<Path>, RoutingError> {
///         Ok(Some(Path::from_steps(vec![Step {
///             start: Location::at(query.from),
///             stop: Location::at(query.to),
///             distance_m: 0.0,
///         }])))
///     }
/// }
/// ```
#[async_trait]
pub trait RoutingEngine: Send + Sync {
    /// Return the first path found for `query`.
    ///
    /// `Ok(None)` means the engine finished without finding a path.
    async fn query(&self, query: &RouteQuery) -> Result<Option<Path>, RoutingError>;

    /// Fill in the full geometry of a path returned by [`Self::query`].
    ///
    /// Engines whose paths are already complete keep the default.
    async fn complete_path(&self, path: Path) -> Result<Path, RoutingError> {
        Ok(path)
    }
}
