//! `entrances` command: print the entrance candidates for a destination.

use std::io::Write;

use clap::Parser;
use doorstep_core::EntranceCandidate;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::adapters::{AdapterBuilder, HttpAdapterBuilder, runtime};
use crate::plan::required_coordinate;
use crate::settings::{ServiceOverrides, ServiceSettings};
use crate::{
    ARG_DESTINATION, ARG_OVERPASS_URL, ARG_SEARCH_RADIUS, ARG_TIMEOUT, CliError,
    ENV_ENTRANCES_DESTINATION,
};

/// CLI arguments for the `entrances` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query the entrance service for the building at the \
                 destination and print the candidates as JSON. An empty \
                 list means `plan` would route to the destination itself.",
    about = "List the entrances near a destination"
)]
#[ortho_config(prefix = "DOORSTEP")]
pub(crate) struct EntrancesArgs {
    /// Delivery address position as `lat,lon`.
    #[arg(value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) destination: Option<String>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Radius around the destination searched for buildings, in metres.
    #[arg(long = ARG_SEARCH_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) search_radius_m: Option<f64>,
    /// Timeout for the HTTP request, in seconds.
    #[arg(long = ARG_TIMEOUT, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

pub(crate) fn run_entrances(args: EntrancesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_entrances_with(args, &HttpAdapterBuilder, &mut stdout)
}

pub(crate) fn run_entrances_with(
    args: EntrancesArgs,
    builder: &dyn AdapterBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let destination = required_coordinate(
        merged.destination,
        ARG_DESTINATION,
        ENV_ENTRANCES_DESTINATION,
    )?;
    let services = ServiceSettings::try_from(ServiceOverrides {
        overpass_url: merged.overpass_url,
        search_radius_m: merged.search_radius_m,
        timeout_secs: merged.timeout_secs,
        ..ServiceOverrides::default()
    })?;

    let source = builder.entrance_source(&services)?;
    let candidates = runtime()?.block_on(source.find_entrances(destination))?;
    info!("found {} entrances", candidates.len());
    write_candidates(writer, &candidates)
}

fn write_candidates(
    writer: &mut dyn Write,
    candidates: &[EntranceCandidate],
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(candidates).map_err(CliError::Serialise)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
