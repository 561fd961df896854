//! Service settings shared by the subcommands once layering is done.

use std::time::Duration;

use doorstep_data::overpass::{DEFAULT_OVERPASS_URL, DEFAULT_SEARCH_RADIUS_M};
use doorstep_data::tiles::{DEFAULT_TILE_ZOOM, DEFAULT_TILES_URL};
use doorstep_data::DEFAULT_TIMEOUT;

use crate::{ARG_SEARCH_RADIUS, ARG_TILE_ZOOM, ARG_TIMEOUT, CliError};

/// Deepest zoom level slippy tiles are published at.
const MAX_TILE_ZOOM: u8 = 22;

/// Endpoints and limits for the HTTP adapters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ServiceSettings {
    pub(crate) overpass_url: String,
    pub(crate) tiles_url: String,
    pub(crate) tile_zoom: u8,
    pub(crate) search_radius_m: f64,
    pub(crate) timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_owned(),
            tiles_url: DEFAULT_TILES_URL.to_owned(),
            tile_zoom: DEFAULT_TILE_ZOOM,
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Optional overrides as they arrive from the merged configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct ServiceOverrides {
    pub(crate) overpass_url: Option<String>,
    pub(crate) tiles_url: Option<String>,
    pub(crate) tile_zoom: Option<u8>,
    pub(crate) search_radius_m: Option<f64>,
    pub(crate) timeout_secs: Option<u64>,
}

impl TryFrom<ServiceOverrides> for ServiceSettings {
    type Error = CliError;

    fn try_from(overrides: ServiceOverrides) -> Result<Self, Self::Error> {
        let defaults = Self::default();

        let tile_zoom = overrides.tile_zoom.unwrap_or(defaults.tile_zoom);
        if tile_zoom > MAX_TILE_ZOOM {
            return Err(CliError::OutOfRange {
                field: ARG_TILE_ZOOM,
                expected: "at most 22",
                value: tile_zoom.to_string(),
            });
        }
        let search_radius_m = overrides.search_radius_m.unwrap_or(defaults.search_radius_m);
        if !(search_radius_m.is_finite() && search_radius_m > 0.0) {
            return Err(CliError::OutOfRange {
                field: ARG_SEARCH_RADIUS,
                expected: "a positive number of metres",
                value: search_radius_m.to_string(),
            });
        }
        let timeout = match overrides.timeout_secs {
            Some(0) => {
                return Err(CliError::OutOfRange {
                    field: ARG_TIMEOUT,
                    expected: "at least one second",
                    value: "0".to_owned(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.timeout,
        };

        Ok(Self {
            overpass_url: overrides.overpass_url.unwrap_or(defaults.overpass_url),
            tiles_url: overrides.tiles_url.unwrap_or(defaults.tiles_url),
            tile_zoom,
            search_radius_m,
            timeout,
        })
    }
}
