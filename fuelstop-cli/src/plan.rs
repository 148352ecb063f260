//! Plan command implementation for the Fuelstop CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use fuelstop_core::{
    FuelPlanner, PlanRequest, PlanResponse, PlannerConfig, PlannerError, RefillPolicy,
    RouteProvider, StartTankPricing, StationCatalog,
};
use fuelstop_data::SqliteStationCatalog;
use fuelstop_data::routing::{DEFAULT_OSRM_BASE_URL, HttpRouteProvider};
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_CORRIDOR_WIDTH, ARG_DATABASE, ARG_FINISH, ARG_MILES_PER_GALLON, ARG_OSRM_BASE_URL,
    ARG_RANGE_LIMIT, ARG_START, ARG_START_TANK_PRICE, CliError, DEFAULT_DATABASE, ENV_FINISH,
    ENV_START, require_existing,
};

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "plan",
    long_about = "Route a trip with OSRM, look up the stations stored by \
                 `fuelstop import` along the way and print the cheapest \
                 refuelling plan as JSON. Coordinates are given as \
                 latitude,longitude pairs.",
    about = "Plan refuelling stops for a trip"
)]
#[ortho_config(prefix = "FUELSTOP")]
pub(crate) struct PlanArgs {
    /// Departure as `lat,lon`.
    #[arg(long = ARG_START, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) start: Option<String>,
    /// Destination as `lat,lon`.
    #[arg(long = ARG_FINISH, value_name = "lat,lon", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) finish: Option<String>,
    /// Path to the station database written by `fuelstop import`.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Miles the vehicle can travel on a full tank.
    #[arg(long = ARG_RANGE_LIMIT, value_name = "miles")]
    #[serde(default)]
    pub(crate) range_limit: Option<f64>,
    /// Fuel economy in miles per gallon.
    #[arg(long = ARG_MILES_PER_GALLON, value_name = "mpg")]
    #[serde(default)]
    pub(crate) miles_per_gallon: Option<f64>,
    /// Maximum distance of a usable station from the route, in miles.
    #[arg(long = ARG_CORRIDOR_WIDTH, value_name = "miles")]
    #[serde(default)]
    pub(crate) corridor_width: Option<f64>,
    /// Price per gallon paid for the departure tank; reported separately from
    /// the trip's fuel cost. The tank is free when omitted.
    #[arg(long = ARG_START_TANK_PRICE, value_name = "dollars")]
    #[serde(default)]
    pub(crate) start_tank_price: Option<f64>,
}

impl PlanArgs {
    fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) request: PlanRequest,
    pub(crate) database: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) planner: PlannerConfig,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let start = args.start.ok_or(CliError::MissingArgument {
            field: ARG_START,
            env: ENV_START,
        })?;
        let finish = args.finish.ok_or(CliError::MissingArgument {
            field: ARG_FINISH,
            env: ENV_FINISH,
        })?;
        let request = PlanRequest {
            start: parse_coordinate(ARG_START, &start)?,
            finish: parse_coordinate(ARG_FINISH, &finish)?,
        };

        let defaults = PlannerConfig::default();
        let planner = PlannerConfig {
            range_limit_miles: args.range_limit.unwrap_or(defaults.range_limit_miles),
            miles_per_gallon: args.miles_per_gallon.unwrap_or(defaults.miles_per_gallon),
            corridor_width_miles: args
                .corridor_width
                .unwrap_or(defaults.corridor_width_miles),
            start_tank: args
                .start_tank_price
                .map_or(defaults.start_tank, |price_per_gallon| {
                    StartTankPricing::Fixed { price_per_gallon }
                }),
        };

        Ok(Self {
            request,
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_OSRM_BASE_URL.to_owned()),
            planner,
        })
    }
}

/// Parse a `lat,lon` pair into a coordinate with `x = longitude`.
pub(crate) fn parse_coordinate(field: &'static str, value: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        field,
        value: value.to_owned(),
    };
    let (lat, lon) = value.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(Coord { x: lon, y: lat })
    } else {
        Err(invalid())
    }
}

/// Anything able to answer a [`PlanRequest`].
pub(crate) trait TripPlanner {
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError>;
}

impl<C, P, R> TripPlanner for FuelPlanner<C, P, R>
where
    C: StationCatalog,
    P: RouteProvider,
    R: RefillPolicy,
{
    fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        Self::plan(self, request)
    }
}

/// Builds a planner for the current plan invocation.
pub(crate) trait PlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TripPlanner>, CliError>;
}

pub(crate) struct DefaultPlannerBuilder;

impl PlannerBuilder for DefaultPlannerBuilder {
    fn build(&self, config: &PlanConfig) -> Result<Box<dyn TripPlanner>, CliError> {
        let catalog = SqliteStationCatalog::open(&config.database)?;
        let provider = HttpRouteProvider::new(config.osrm_base_url.clone()).map_err(|source| {
            CliError::BuildRouteProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(FuelPlanner::new(catalog, provider, config.planner)))
    }
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    builder: &dyn PlannerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let response = execute_plan(args, builder)?;
    write_plan_response(writer, &response)
}

fn execute_plan(args: PlanArgs, builder: &dyn PlannerBuilder) -> Result<PlanResponse, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    log::debug!("planning with {:?}", config.planner);
    let planner = builder.build(&config)?;
    Ok(planner.plan(&config.request)?)
}

fn write_plan_response(writer: &mut dyn Write, response: &PlanResponse) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(response).map_err(CliError::SerializePlanResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
