//! Import command implementation for the Fuelstop CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use fuelstop_data::{ImportedStations, import_stations_csv, persist_stations_to_sqlite};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_CSV, ARG_DATABASE, CliError, DEFAULT_DATABASE, ENV_CSV, require_existing};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Read the OPIS truck-stop price list and store every located \
                 station in a SQLite database. Rows without latitude and \
                 longitude are skipped; repeated truck stops keep their \
                 cheapest price.",
    about = "Import a fuel price list"
)]
#[ortho_config(prefix = "FUELSTOP")]
pub(crate) struct ImportArgs {
    /// Path to the price list CSV file.
    #[arg(long = ARG_CSV, value_name = "path")]
    #[serde(default)]
    pub(crate) csv: Option<Utf8PathBuf>,
    /// Path of the SQLite database to create or update.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

impl ImportArgs {
    fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) csv: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl ImportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.csv, ARG_CSV)
    }
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let csv = args.csv.ok_or(CliError::MissingArgument {
            field: ARG_CSV,
            env: ENV_CSV,
        })?;
        let database = args
            .database
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE));
        Ok(Self { csv, database })
    }
}

pub(crate) fn run_import_with(args: ImportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let imported = execute_import(&config)?;
    writeln!(writer, "{}", summary_line(&imported, &config)).map_err(CliError::WriteOutput)
}

pub(crate) fn execute_import(config: &ImportConfig) -> Result<ImportedStations, CliError> {
    let imported = import_stations_csv(&config.csv)?;
    persist_stations_to_sqlite(&config.database, &imported.stations).map_err(|source| {
        CliError::PersistStations {
            path: config.database.clone(),
            source,
        }
    })?;
    Ok(imported)
}

fn summary_line(imported: &ImportedStations, config: &ImportConfig) -> String {
    format!(
        "imported {} stations into {} ({} rows read, {} without coordinates, {} rejected, {} duplicates merged)",
        imported.stations.len(),
        config.database,
        imported.rows_read,
        imported.skipped_without_coordinates,
        imported.rejected,
        imported.duplicates_merged
    )
}
