//! Routing over routable tiles.
//!
//! Routable tiles are JSON-LD documents published per slippy-map tile that
//! carry the OpenStreetMap nodes and ways needed for routing. The
//! [`RoutableTilesEngine`] fetches the tiles around a query, assembles a
//! graph of the highway network and searches it with A*.
//!
//! # Example
//!
//! ```no_run
//! use doorstep_core::{RouteQuery, RoutingEngine};
//! use doorstep_data::tiles::{RoutableTilesConfig, RoutableTilesEngine};
//! use geo::Coord;
//!
//! # async fn route() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RoutableTilesEngine::with_config(RoutableTilesConfig::default().with_max_tiles(16))?;
//! let query = RouteQuery {
//!     from: Coord { x: 3.7199, y: 51.0500 },
//!     to: Coord { x: 3.7251, y: 51.0543 },
//!     road_network_only: false,
//! };
//! match engine.query(&query).await? {
//!     Some(path) => println!("{:.0} m", path.distance_m()),
//!     None => println!("no route"),
//! }
//! # Ok(())
//! # }
//! ```

mod engine;
mod graph;
pub mod jsonld;

pub use engine::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_TILES, DEFAULT_TILE_ZOOM, DEFAULT_TILES_URL,
    RoutableTilesConfig, RoutableTilesEngine,
};
pub use graph::RoutingGraph;
