//! `plan` command: route to every entrance and stream feature collections.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use doorstep_core::{PlanError, PlanSummary, PlanUpdate, Planner, PlannerConfig};
use geo::Coord;
use geojson::FeatureCollection;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::adapters::{AdapterBuilder, HttpAdapterBuilder, runtime};
use crate::coords::parse_lat_lon;
use crate::settings::{ServiceOverrides, ServiceSettings};
use crate::{
    ARG_DESTINATION, ARG_ORIGIN, ARG_OUTPUT, ARG_OVERPASS_URL, ARG_ROAD_NETWORK_ONLY,
    ARG_SEARCH_RADIUS, ARG_TILE_ZOOM, ARG_TILES_URL, ARG_TIMEOUT, CliError, ENV_PLAN_DESTINATION,
    ENV_PLAN_ORIGIN,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Look up the entrances of the building at the destination \
                 and route from the origin to each of them. Every route that \
                 completes is printed as one GeoJSON feature collection per \
                 line; each line replaces the previous one. Coordinates are \
                 given as `lat,lon`.",
    about = "Route from an origin to every entrance near a destination"
)]
#[ortho_config(prefix = "DOORSTEP")]
pub(crate) struct PlanArgs {
    /// Starting point as `lat,lon`.
    #[arg(value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) origin: Option<String>,
    /// Delivery address position as `lat,lon`.
    #[arg(value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Routable tiles endpoint.
    #[arg(long = ARG_TILES_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) tiles_url: Option<String>,
    /// Zoom level of the routable tiles.
    #[arg(long = ARG_TILE_ZOOM, value_name = "zoom")]
    #[serde(default)]
    pub(crate) tile_zoom: Option<u8>,
    /// Radius around the destination searched for buildings, in metres.
    #[arg(long = ARG_SEARCH_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) search_radius_m: Option<f64>,
    /// Timeout for each HTTP request, in seconds.
    #[arg(long = ARG_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
    /// Keep routes on the road network (default). Pass `false` to join the
    /// raw origin and destination to the network with free-space steps.
    #[arg(
        long = ARG_ROAD_NETWORK_ONLY,
        value_name = "bool",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) road_network_only: Option<bool>,
    /// Also write the latest feature collection to this file.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) origin: Coord<f64>,
    pub(crate) destination: Coord<f64>,
    pub(crate) services: ServiceSettings,
    pub(crate) road_network_only: bool,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let origin = required_coordinate(args.origin, ARG_ORIGIN, ENV_PLAN_ORIGIN)?;
        let destination =
            required_coordinate(args.destination, ARG_DESTINATION, ENV_PLAN_DESTINATION)?;
        let services = ServiceSettings::try_from(ServiceOverrides {
            overpass_url: args.overpass_url,
            tiles_url: args.tiles_url,
            tile_zoom: args.tile_zoom,
            search_radius_m: args.search_radius_m,
            timeout_secs: args.timeout_secs,
        })?;
        Ok(Self {
            origin,
            destination,
            services,
            road_network_only: args.road_network_only.unwrap_or(true),
            output: args.output,
        })
    }
}

/// Parse a mandatory `lat,lon` option.
pub(crate) fn required_coordinate(
    value: Option<String>,
    field: &'static str,
    env: &'static str,
) -> Result<Coord<f64>, CliError> {
    let value = value.ok_or(CliError::MissingArgument { field, env })?;
    parse_lat_lon(&value).map_err(|source| CliError::InvalidCoordinate {
        field,
        value,
        source,
    })
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &HttpAdapterBuilder, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn AdapterBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_plan(&config, builder, writer)
}

pub(crate) fn execute_plan(
    config: &PlanConfig,
    builder: &dyn AdapterBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let planner = Planner::new(
        builder.entrance_source(&config.services)?,
        builder.routing_engine(&config.services)?,
        PlannerConfig::default()
            .with_route_timeout(Some(config.services.timeout.saturating_mul(2)))
            .with_road_network_only(config.road_network_only),
    );
    let runtime = runtime()?;

    let mut sink = UpdateSink::new(writer, config.output.as_deref());
    let summary = runtime.block_on(planner.calculate_plan(
        config.origin,
        config.destination,
        |update| sink.accept(update),
    ))?;
    sink.finish(&summary)
}

/// Receives plan updates and writes each delivered collection out.
struct UpdateSink<'a> {
    writer: &'a mut dyn Write,
    output: Option<&'a Utf8Path>,
    write_error: Option<CliError>,
    first_failure: Option<PlanError>,
}

impl<'a> UpdateSink<'a> {
    fn new(writer: &'a mut dyn Write, output: Option<&'a Utf8Path>) -> Self {
        Self {
            writer,
            output,
            write_error: None,
            first_failure: None,
        }
    }

    fn accept(&mut self, update: PlanUpdate) {
        if self.write_error.is_some() {
            return;
        }
        match update.result {
            Ok(collection) => {
                if let Err(err) = self.emit(&collection) {
                    self.write_error = Some(err);
                }
            }
            Err(err) => {
                warn!("candidate {} not routed: {err}", update.candidate.id);
                self.first_failure.get_or_insert(err);
            }
        }
    }

    fn emit(&mut self, collection: &FeatureCollection) -> Result<(), CliError> {
        let line = serde_json::to_string(collection).map_err(CliError::Serialise)?;
        self.writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush())
            .map_err(CliError::WriteOutput)?;
        if let Some(path) = self.output {
            doorstep_fs::write_replacing(path, line.as_bytes()).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn finish(self, summary: &PlanSummary) -> Result<(), CliError> {
        if let Some(err) = self.write_error {
            return Err(err);
        }
        info!(
            "plan {} delivered {} of {} routes{}",
            summary.generation,
            summary.delivered,
            summary.candidates,
            if summary.used_fallback {
                " (no entrances found; routed to the destination)"
            } else {
                ""
            }
        );
        match self.first_failure {
            Some(failure) if summary.delivered == 0 => Err(CliError::Planning(failure)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
