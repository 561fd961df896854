//! Construction of the entrance source and routing engine.

use std::sync::Arc;

use doorstep_core::{EntranceSource, RoutingEngine};
use doorstep_data::overpass::{OverpassConfig, OverpassEntranceSource};
use doorstep_data::tiles::{RoutableTilesConfig, RoutableTilesEngine};

use crate::CliError;
use crate::settings::ServiceSettings;

/// Builds the adapters for one command invocation.
pub(crate) trait AdapterBuilder {
    fn entrance_source(
        &self,
        settings: &ServiceSettings,
    ) -> Result<Arc<dyn EntranceSource>, CliError>;

    fn routing_engine(
        &self,
        settings: &ServiceSettings,
    ) -> Result<Arc<dyn RoutingEngine>, CliError>;
}

/// Overpass entrances and routable-tiles routing over HTTP.
pub(crate) struct HttpAdapterBuilder;

impl AdapterBuilder for HttpAdapterBuilder {
    fn entrance_source(
        &self,
        settings: &ServiceSettings,
    ) -> Result<Arc<dyn EntranceSource>, CliError> {
        let config = OverpassConfig::new(settings.overpass_url.clone())
            .with_timeout(settings.timeout)
            .with_radius_m(settings.search_radius_m);
        let source =
            OverpassEntranceSource::with_config(config).map_err(|source| {
                CliError::BuildAdapter {
                    service: "Overpass",
                    url: settings.overpass_url.clone(),
                    source,
                }
            })?;
        Ok(Arc::new(source))
    }

    fn routing_engine(
        &self,
        settings: &ServiceSettings,
    ) -> Result<Arc<dyn RoutingEngine>, CliError> {
        let config = RoutableTilesConfig::new(settings.tiles_url.clone())
            .with_zoom(settings.tile_zoom)
            .with_timeout(settings.timeout);
        let engine = RoutableTilesEngine::with_config(config).map_err(|source| {
            CliError::BuildAdapter {
                service: "routable tiles",
                url: settings.tiles_url.clone(),
                source,
            }
        })?;
        Ok(Arc::new(engine))
    }
}

/// Single-threaded runtime driving one command.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}
