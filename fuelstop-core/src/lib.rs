//! Core engine for choosing where a long-haul vehicle should refuel.
//!
//! Given a driving [`Route`] and a set of priced [`Station`]s, the engine
//! places each station along the route ([`project`]) and then selects the
//! stops and purchase amounts that minimise the fuel bill while never
//! exceeding the vehicle range ([`StopOptimizer`]). [`FuelPlanner`] ties the
//! two together behind the [`RouteProvider`] and [`StationCatalog`] traits.
//!
//! The crate performs no I/O. Adapters for real data sources live in
//! `fuelstop-data`.
#![forbid(unsafe_code)]

mod catalog;
mod context;
mod optimizer;
mod plan;
mod planner;
mod projector;
mod route;
mod route_provider;
mod station;

#[doc(hidden)]
pub mod test_support;

pub use catalog::{StationCatalog, pad_bbox};
pub use context::{
    DEFAULT_MILES_PER_GALLON, DEFAULT_RANGE_LIMIT_MILES, RouteContext, StartTankPricing,
};
pub use optimizer::{
    CheapestAheadPolicy, FillUpPolicy, MinimumFuelPolicy, RefillContext, RefillPolicy,
    StopOptimizer, Waypoint, optimize,
};
pub use plan::{FuelPlanError, StopDecision, StopPlan, round_to_cents};
pub use planner::{
    FuelPlanner, PlanRequest, PlanResponse, PlannerConfig, PlannerError, optimize_route,
};
pub use projector::{DEFAULT_CORRIDOR_WIDTH_MILES, EPSILON_MILES, ProjectedStation, project};
pub use route::{Route, RouteError, RoutePoint};
pub use route_provider::{RouteProvider, RouteProviderError};
pub use station::{Station, StationError};
