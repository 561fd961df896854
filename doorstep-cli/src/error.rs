//! Error types emitted by the Doorstep CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use doorstep_core::{EntranceQueryError, PlanError};
use doorstep_data::ProviderBuildError;
use thiserror::Error;

use crate::coords::CoordinateError;

/// Errors emitted by the Doorstep CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required positional argument is missing after configuration merging.
    #[error("missing {field} (pass <{field}> or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate argument could not be parsed.
    #[error("invalid {field} {value:?}: {source}")]
    InvalidCoordinate {
        field: &'static str,
        value: String,
        #[source]
        source: CoordinateError,
    },
    /// A numeric option is outside its accepted range.
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
    /// Constructing an HTTP adapter failed.
    #[error("failed to build {service} client for {url:?}: {source}")]
    BuildAdapter {
        service: &'static str,
        url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Building the async runtime failed.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// The entrance lookup failed.
    #[error(transparent)]
    EntranceQuery(#[from] EntranceQueryError),
    /// Planning failed before or for every candidate.
    #[error(transparent)]
    Planning(#[from] PlanError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing the output file failed.
    #[error("failed to write {path:?}: {source}")]
    WriteOutputFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}
