//! Command-line interface for Doorstep.
//!
//! `doorstep plan` routes from an origin to every entrance near a
//! destination and prints one GeoJSON feature collection per delivered
//! route. `doorstep entrances` prints the entrance candidates alone.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod adapters;
mod coords;
mod entrances;
mod error;
mod plan;
mod settings;

pub use coords::CoordinateError;
pub use error::CliError;

use entrances::EntrancesArgs;
use plan::PlanArgs;

pub(crate) const ARG_ORIGIN: &str = "origin";
pub(crate) const ARG_DESTINATION: &str = "destination";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_TILES_URL: &str = "tiles-url";
pub(crate) const ARG_TILE_ZOOM: &str = "tile-zoom";
pub(crate) const ARG_SEARCH_RADIUS: &str = "search-radius-m";
pub(crate) const ARG_TIMEOUT: &str = "timeout-secs";
pub(crate) const ARG_ROAD_NETWORK_ONLY: &str = "road-network-only";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ENV_PLAN_ORIGIN: &str = "DOORSTEP_CMDS_PLAN_ORIGIN";
pub(crate) const ENV_PLAN_DESTINATION: &str = "DOORSTEP_CMDS_PLAN_DESTINATION";
pub(crate) const ENV_ENTRANCES_DESTINATION: &str = "DOORSTEP_CMDS_ENTRANCES_DESTINATION";

/// Run the Doorstep CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
        Command::Entrances(args) => entrances::run_entrances(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "doorstep",
    about = "Route delivery drivers to the right building entrance",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Route from an origin to every entrance near a destination.
    Plan(PlanArgs),
    /// List the entrances found near a destination.
    Entrances(EntrancesArgs),
}

#[cfg(test)]
mod tests;
