//! Command-line interface for importing fuel prices and planning trips.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};

mod error;
mod import;
mod plan;

pub use error::CliError;

use import::{ImportArgs, run_import_with};
use plan::{DefaultPlannerBuilder, PlanArgs, run_plan_with};

const ARG_CSV: &str = "csv";
const ARG_DATABASE: &str = "database";
const ARG_START: &str = "start";
const ARG_FINISH: &str = "finish";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_RANGE_LIMIT: &str = "range-limit";
const ARG_MILES_PER_GALLON: &str = "miles-per-gallon";
const ARG_CORRIDOR_WIDTH: &str = "corridor-width";
const ARG_START_TANK_PRICE: &str = "start-tank-price";
const ENV_CSV: &str = "FUELSTOP_CMDS_IMPORT_CSV";
const ENV_START: &str = "FUELSTOP_CMDS_PLAN_START";
const ENV_FINISH: &str = "FUELSTOP_CMDS_PLAN_FINISH";

/// Database used when `--database` is not supplied.
const DEFAULT_DATABASE: &str = "fuelstop.db";

/// Run the Fuelstop CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments are invalid or the command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Import(args) => run_import_with(args, writer),
        Command::Plan(args) => run_plan_with(args, &DefaultPlannerBuilder, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "fuelstop",
    about = "Plan the cheapest refuelling stops for a long road trip",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load an OPIS price list into the station database.
    Import(ImportArgs),
    /// Route a trip and print the refuelling plan as JSON.
    Plan(PlanArgs),
}

/// Check that `path` names an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match path.metadata() {
        Ok(metadata) if metadata.is_file() => Ok(()),
        Ok(_) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests;
