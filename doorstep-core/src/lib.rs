//! Core domain types and pipeline for Doorstep.
//!
//! Doorstep helps delivery drivers reach the right building entrance. This
//! crate holds everything that does not talk to the network:
//!
//! - [`EntranceSource`] and [`RoutingEngine`], the seams to external
//!   services;
//! - [`tags`], converting routable-tiles tag triples into flat OSM tags;
//! - [`extract_geometry`] and [`geometry_to_geojson`], turning a path into a
//!   map-ready feature collection;
//! - [`Planner`], which sequences the lookups and fans out per candidate;
//! - [`projection`], coordinate and tile maths shared with the adapters.
//!
//! HTTP-backed implementations of the traits live in `doorstep-data`.

mod candidate;
pub mod entrance;
pub mod features;
pub mod geometry;
pub mod path;
pub mod plan;
pub mod projection;
pub mod routing;
pub mod tags;

#[doc(hidden)]
pub mod test_support;

pub use candidate::{EntranceCandidate, Tags};
pub use entrance::{EntranceQueryError, EntranceSource};
pub use features::geometry_to_geojson;
pub use geometry::{Obstacle, PathGeometry, extract_geometry};
pub use path::{Leg, Location, Path, Step};
pub use plan::{PlanError, PlanSummary, PlanUpdate, Planner, PlannerConfig};
pub use routing::{RouteQuery, RoutingEngine, RoutingError};
