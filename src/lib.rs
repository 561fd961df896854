//! Facade crate for Doorstep, which routes delivery drivers to building
//! entrances.
//!
//! This crate re-exports the core pipeline types and, behind the `http`
//! feature, the Overpass entrance source and routable-tiles engine.

#![forbid(unsafe_code)]

pub use doorstep_core::{
    EntranceCandidate, EntranceQueryError, EntranceSource, Leg, Location, Obstacle, Path,
    PathGeometry, PlanError, PlanSummary, PlanUpdate, Planner, PlannerConfig, RouteQuery,
    RoutingEngine, RoutingError, Step, Tags, extract_geometry, geometry_to_geojson,
};

#[cfg(feature = "http")]
pub use doorstep_data::{
    OverpassConfig, OverpassEntranceSource, ProviderBuildError, RoutableTilesConfig,
    RoutableTilesEngine,
};
