//! Facade crate for the Fuelstop refuelling planner.
//!
//! This crate re-exports the core domain types and, behind the `data`
//! feature, the price-list importer, SQLite station catalog and OSRM route
//! provider.

#![forbid(unsafe_code)]

pub use fuelstop_core::{
    CheapestAheadPolicy, FuelPlanError, FuelPlanner, PlanRequest, PlanResponse, PlannerConfig,
    PlannerError, ProjectedStation, RefillPolicy, Route, RouteError, RouteProvider,
    RouteProviderError, StartTankPricing, Station, StationCatalog, StationError, StopDecision,
    StopOptimizer, StopPlan, optimize, project,
};

#[cfg(feature = "data")]
pub use fuelstop_data::routing::{HttpRouteProvider, HttpRouteProviderConfig};
#[cfg(feature = "data")]
pub use fuelstop_data::{
    ImportedStations, SqliteStationCatalog, SqliteStationCatalogError, import_stations_csv,
    persist_stations_to_sqlite,
};
