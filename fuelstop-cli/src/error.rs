//! Error types emitted by the Fuelstop CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use fuelstop_core::PlannerError;
use fuelstop_data::routing::ProviderBuildError;
use fuelstop_data::{CatalogImportError, PersistStationsError, SqliteStationCatalogError};
use thiserror::Error;

/// Errors emitted by the Fuelstop CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A coordinate option was not a `lat,lon` pair.
    #[error("{field} must be a latitude,longitude pair, got {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading the price list failed.
    #[error("failed to import price list: {0}")]
    ImportCatalog(#[from] CatalogImportError),
    /// Persisting stations to SQLite failed.
    #[error("failed to persist stations to {path:?}: {source}")]
    PersistStations {
        path: Utf8PathBuf,
        #[source]
        source: PersistStationsError,
    },
    /// Opening the station catalog failed.
    #[error(transparent)]
    OpenCatalog(#[from] SqliteStationCatalogError),
    /// Constructing the route provider failed.
    #[error("failed to build route provider for {base_url:?}: {source}")]
    BuildRouteProvider {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The planner rejected the trip.
    #[error("planning failed: {0}")]
    Plan(#[from] PlannerError),
    /// Serializing the plan response failed.
    #[error("failed to serialize plan response: {0}")]
    SerializePlanResponse(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
