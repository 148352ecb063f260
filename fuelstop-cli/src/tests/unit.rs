//! Focused unit tests covering CLI configuration validation.

use super::helpers::{Workspace, write_utf8};
use super::*;
use crate::import::ImportConfig;
use crate::plan::{PlanConfig, parse_coordinate};
use camino::Utf8PathBuf;
use clap::Parser;
use fuelstop_core::{PlannerConfig, StartTankPricing};
use fuelstop_data::routing::DEFAULT_OSRM_BASE_URL;
use geo::Coord;
use rstest::rstest;

fn plan_args(start: Option<&str>, finish: Option<&str>) -> PlanArgs {
    PlanArgs {
        start: start.map(str::to_owned),
        finish: finish.map(str::to_owned),
        ..PlanArgs::default()
    }
}

#[rstest]
fn import_without_csv_errors() {
    let err = ImportConfig::try_from(ImportArgs::default()).expect_err("missing csv should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_CSV);
            assert_eq!(env, ENV_CSV);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn import_defaults_database_path() {
    let args = ImportArgs {
        csv: Some(Utf8PathBuf::from("prices.csv")),
        database: None,
    };
    let config = ImportConfig::try_from(args).expect("config");
    assert_eq!(config.csv, Utf8PathBuf::from("prices.csv"));
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
}

#[rstest]
fn import_validate_sources_reports_missing_csv() {
    let workspace = Workspace::new();
    let config = ImportConfig {
        csv: workspace.path("missing.csv"),
        database: workspace.path("stations.db"),
    };
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_CSV),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn import_validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    let config = ImportConfig {
        csv: workspace.path(""),
        database: workspace.path("stations.db"),
    };
    let err = config
        .validate_sources()
        .expect_err("expected directory rejection");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_CSV),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
#[case(None, Some("0,8"), ARG_START, ENV_START)]
#[case(Some("0,0"), None, ARG_FINISH, ENV_FINISH)]
fn plan_without_endpoints_errors(
    #[case] start: Option<&str>,
    #[case] finish: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let err = PlanConfig::try_from(plan_args(start, finish)).expect_err("missing endpoint");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn plan_applies_defaults() {
    let config = PlanConfig::try_from(plan_args(Some("40.7128,-74.0060"), Some("34.05,-118.24")))
        .expect("config");
    assert_eq!(
        config.request.start,
        Coord {
            x: -74.0060,
            y: 40.7128
        }
    );
    assert_eq!(config.request.finish, Coord { x: -118.24, y: 34.05 });
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.osrm_base_url, DEFAULT_OSRM_BASE_URL);
    assert_eq!(config.planner, PlannerConfig::default());
}

#[rstest]
fn plan_applies_overrides() {
    let args = PlanArgs {
        database: Some(Utf8PathBuf::from("other.db")),
        osrm_base_url: Some("http://router.example:5000".to_owned()),
        range_limit: Some(300.0),
        miles_per_gallon: Some(7.5),
        corridor_width: Some(2.0),
        start_tank_price: Some(3.40),
        ..plan_args(Some("0,0"), Some("0,8"))
    };
    let config = PlanConfig::try_from(args).expect("config");
    assert_eq!(config.database, Utf8PathBuf::from("other.db"));
    assert_eq!(config.osrm_base_url, "http://router.example:5000");
    assert_eq!(config.planner.range_limit_miles, 300.0);
    assert_eq!(config.planner.miles_per_gallon, 7.5);
    assert_eq!(config.planner.corridor_width_miles, 2.0);
    assert_eq!(
        config.planner.start_tank,
        StartTankPricing::Fixed {
            price_per_gallon: 3.40
        }
    );
}

#[rstest]
fn plan_reads_the_start_tank_price_flag() {
    let cli = Cli::try_parse_from([
        "fuelstop",
        "plan",
        "--start",
        "0,0",
        "--finish",
        "0,8",
        "--start-tank-price",
        "3.25",
    ])
    .expect("parse arguments");
    let Command::Plan(args) = cli.command else {
        panic!("expected plan command");
    };
    let config = PlanConfig::try_from(args).expect("config");
    assert_eq!(
        config.planner.start_tank,
        StartTankPricing::Fixed {
            price_per_gallon: 3.25
        }
    );
}

#[rstest]
fn plan_validate_sources_reports_missing_database() {
    let workspace = Workspace::new();
    let config = PlanConfig {
        database: workspace.path("missing.db"),
        ..PlanConfig::try_from(plan_args(Some("0,0"), Some("0,8"))).expect("config")
    };
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_DATABASE),
        other => panic!("unexpected error {other:?}"),
    }
}

#[rstest]
fn plan_validate_sources_accepts_existing_database() {
    let workspace = Workspace::new();
    let database = workspace.path("stations.db");
    write_utf8(&database, b"");
    let config = PlanConfig {
        database,
        ..PlanConfig::try_from(plan_args(Some("0,0"), Some("0,8"))).expect("config")
    };
    config.validate_sources().expect("database exists");
}

#[rstest]
#[case("0,0", Coord { x: 0.0, y: 0.0 })]
#[case(" 51.5 , -0.12 ", Coord { x: -0.12, y: 51.5 })]
#[case("-90,180", Coord { x: 180.0, y: -90.0 })]
fn parse_coordinate_reads_lat_lon(#[case] value: &str, #[case] expected: Coord<f64>) {
    let coord = parse_coordinate(ARG_START, value).expect("valid coordinate");
    assert_eq!(coord, expected);
}

#[rstest]
#[case("north")]
#[case("51.5")]
#[case("51.5,west")]
#[case("91,0")]
#[case("0,181")]
#[case("NaN,0")]
fn parse_coordinate_rejects_invalid_values(#[case] value: &str) {
    let err = parse_coordinate(ARG_FINISH, value).expect_err("invalid coordinate");
    match err {
        CliError::InvalidCoordinate { field, value: got } => {
            assert_eq!(field, ARG_FINISH);
            assert_eq!(got, value);
        }
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
fn cli_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "fuelstop",
        "plan",
        "--start",
        "-33.86,151.21",
        "--finish",
        "-37.81,144.96",
    ])
    .expect("parse arguments");
    match cli.command {
        Command::Plan(args) => {
            assert_eq!(args.start.as_deref(), Some("-33.86,151.21"));
            assert_eq!(args.finish.as_deref(), Some("-37.81,144.96"));
        }
        other => panic!("expected plan command, found {other:?}"),
    }
}

#[rstest]
fn cli_rejects_unknown_subcommands() {
    let err = Cli::try_parse_from(["fuelstop", "geocode"]).expect_err("unknown subcommand");
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
}
