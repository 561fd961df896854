//! Entrance lookup through the Overpass API.
//!
//! [`OverpassEntranceSource`] implements [`doorstep_core::EntranceSource`] by
//! asking an Overpass interpreter for every `entrance` node on a building
//! outline near the destination.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use doorstep_core::EntranceSource;
//! use doorstep_data::overpass::{OverpassConfig, OverpassEntranceSource};
//! use geo::Coord;
//!
//! # async fn lookup() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverpassConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_radius_m(15.0);
//! let source = OverpassEntranceSource::with_config(config)?;
//!
//! let entrances = source.find_entrances(Coord { x: 24.9402, y: 60.1710 }).await?;
//! println!("{} entrances", entrances.len());
//! # Ok(())
//! # }
//! ```

mod query;
mod response;
mod source;

pub use query::build_entrance_query;
pub use response::{OverpassElement, OverpassResponse, filter_entrances};
pub use source::{
    DEFAULT_OVERPASS_URL, DEFAULT_SEARCH_RADIUS_M, OverpassConfig, OverpassEntranceSource,
};
