//! HTTP adapters for the Doorstep pipeline.
//!
//! Responsibilities:
//! - Look up building entrances through the Overpass API.
//! - Route over routable tiles fetched on demand.
//!
//! Boundaries:
//! - Do not encode pipeline rules (live in `doorstep-core`).
//! - Keep blocking work off async executors; every request goes through an
//!   async-capable client.
//!
//! Invariants:
//! - Adapters are built from explicit configuration values.
//! - No global mutable state.

mod client;
pub mod overpass;
pub mod tiles;

pub use client::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError};
pub use overpass::{OverpassConfig, OverpassEntranceSource};
pub use tiles::{RoutableTilesConfig, RoutableTilesEngine};
