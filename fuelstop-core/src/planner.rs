//! End-to-end fuel planning: route, candidate lookup, projection and stop
//! optimisation.

use geo::{BoundingRect, Coord};
use thiserror::Error;

use crate::projector::EPSILON_MILES;
use crate::{
    CheapestAheadPolicy, DEFAULT_CORRIDOR_WIDTH_MILES, DEFAULT_MILES_PER_GALLON,
    DEFAULT_RANGE_LIMIT_MILES, FuelPlanError, RefillPolicy, Route, RouteContext, RouteProvider,
    RouteProviderError, StartTankPricing, Station, StationCatalog, StopOptimizer, StopPlan,
    pad_bbox, project,
};

/// Vehicle and search parameters applied to every plan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Miles the vehicle can travel on a full tank.
    pub range_limit_miles: f64,
    /// Miles travelled per gallon.
    pub miles_per_gallon: f64,
    /// Maximum distance of a usable station from the route, in miles.
    pub corridor_width_miles: f64,
    /// Pricing applied to the departure tank.
    pub start_tank: StartTankPricing,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            range_limit_miles: DEFAULT_RANGE_LIMIT_MILES,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            corridor_width_miles: DEFAULT_CORRIDOR_WIDTH_MILES,
            start_tank: StartTankPricing::Free,
        }
    }
}

impl PlannerConfig {
    /// Optimiser parameters for `route`.
    #[must_use]
    pub const fn context_for(&self, route: &Route) -> RouteContext {
        RouteContext::new(route.length_miles)
            .with_range_limit(self.range_limit_miles)
            .with_miles_per_gallon(self.miles_per_gallon)
            .with_start_tank(self.start_tank)
    }

    fn validate_corridor(&self) -> Result<(), FuelPlanError> {
        let width = self.corridor_width_miles;
        if width.is_finite() && width >= 0.0 {
            Ok(())
        } else {
            Err(FuelPlanError::invalid_input(format!(
                "corridor width must be non-negative, got {width}"
            )))
        }
    }
}

/// Trip endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanRequest {
    /// Departure coordinate (`x = longitude`, `y = latitude`).
    pub start: Coord<f64>,
    /// Destination coordinate.
    pub finish: Coord<f64>,
}

/// The computed route together with its refuelling plan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanResponse {
    /// Route returned by the provider.
    pub route: Route,
    /// Selected stops and totals.
    pub plan: StopPlan,
}

/// Errors returned by [`FuelPlanner::plan`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// The routing service failed.
    #[error("routing failed: {0}")]
    Route(#[from] RouteProviderError),
    /// Projection or optimisation rejected the trip.
    #[error(transparent)]
    Plan(#[from] FuelPlanError),
}

/// Project `stations` onto `route` and choose refuelling stops.
///
/// # Errors
///
/// Returns [`FuelPlanError::InvalidInput`] for unusable parameters,
/// [`FuelPlanError::NoStationsInCorridor`] when the trip needs a stop but no
/// station lies in the corridor, and [`FuelPlanError::Infeasible`] when some
/// stretch is longer than one tank.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::{Coord, line_string};
/// use fuelstop_core::{PlannerConfig, Route, Station, optimize_route};
///
/// let geometry = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
/// let route = Route::new(690.9, Duration::from_secs(36_000), geometry).unwrap();
/// let station = Station::new(1, "Halfway", Coord { x: 5.0, y: 0.0 }, 3.0).unwrap();
///
/// let plan = optimize_route(&route, vec![station], &PlannerConfig::default()).unwrap();
/// assert_eq!(plan.stops.len(), 1);
/// ```
pub fn optimize_route<I>(
    route: &Route,
    stations: I,
    config: &PlannerConfig,
) -> Result<StopPlan, FuelPlanError>
where
    I: IntoIterator<Item = Station>,
{
    plan_stops(&StopOptimizer::new(), route, stations, config)
}

fn plan_stops<R, I>(
    optimizer: &StopOptimizer<R>,
    route: &Route,
    stations: I,
    config: &PlannerConfig,
) -> Result<StopPlan, FuelPlanError>
where
    R: RefillPolicy,
    I: IntoIterator<Item = Station>,
{
    config.validate_corridor()?;
    let context = config.context_for(route);
    context.validate()?;

    let projected = project(route, stations, config.corridor_width_miles);
    if projected.is_empty() && needs_refuelling(&context) {
        return Err(FuelPlanError::NoStationsInCorridor);
    }
    optimizer.optimize(&context, &projected)
}

#[expect(clippy::float_arithmetic, reason = "range check carries a tolerance")]
fn needs_refuelling(context: &RouteContext) -> bool {
    context.route_length_miles > context.range_limit_miles + EPSILON_MILES
}

fn validate_coordinate(label: &str, coord: Coord<f64>) -> Result<(), FuelPlanError> {
    let valid = coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y);
    if valid {
        Ok(())
    } else {
        Err(FuelPlanError::invalid_input(format!(
            "{label} coordinate ({}, {}) is not a valid longitude/latitude",
            coord.x, coord.y
        )))
    }
}

/// Plans refuelling stops for trips between two coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelstop_core::test_support::{MemoryCatalog, StraightLineRouteProvider};
/// use fuelstop_core::{FuelPlanner, PlanRequest, PlannerConfig, Station};
///
/// let stations = [Station::new(1, "Halfway", Coord { x: 5.0, y: 0.0 }, 3.0).unwrap()];
/// let planner = FuelPlanner::new(
///     MemoryCatalog::with_stations(stations),
///     StraightLineRouteProvider::default(),
///     PlannerConfig::default(),
/// );
/// let request = PlanRequest {
///     start: Coord { x: 0.0, y: 0.0 },
///     finish: Coord { x: 10.0, y: 0.0 },
/// };
/// let response = planner.plan(&request).unwrap();
/// assert_eq!(response.plan.stops.len(), 1);
/// ```
#[derive(Debug)]
pub struct FuelPlanner<C, P, R = CheapestAheadPolicy> {
    catalog: C,
    provider: P,
    optimizer: StopOptimizer<R>,
    config: PlannerConfig,
}

impl<C, P> FuelPlanner<C, P>
where
    C: StationCatalog,
    P: RouteProvider,
{
    /// Planner using the default purchase rule.
    #[must_use]
    pub const fn new(catalog: C, provider: P, config: PlannerConfig) -> Self {
        Self {
            catalog,
            provider,
            optimizer: StopOptimizer::new(),
            config,
        }
    }
}

impl<C, P, R> FuelPlanner<C, P, R>
where
    C: StationCatalog,
    P: RouteProvider,
    R: RefillPolicy,
{
    /// Swap the purchase rule.
    #[must_use]
    pub fn with_policy<Q: RefillPolicy>(self, policy: Q) -> FuelPlanner<C, P, Q> {
        FuelPlanner {
            catalog: self.catalog,
            provider: self.provider,
            optimizer: StopOptimizer::with_policy(policy),
            config: self.config,
        }
    }

    /// Parameters applied to every plan.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Route the trip and choose refuelling stops along it.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Route`] when the provider fails and
    /// [`PlannerError::Plan`] when the request, projection or optimisation is
    /// rejected.
    pub fn plan(&self, request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        validate_coordinate("start", request.start)?;
        validate_coordinate("finish", request.finish)?;

        let route = self.provider.route(request.start, request.finish)?;
        let bounds = route
            .geometry
            .bounding_rect()
            .ok_or_else(|| FuelPlanError::invalid_input("route geometry is empty"))?;
        let search = pad_bbox(bounds, self.config.corridor_width_miles);
        let stations = self.catalog.stations_in_bbox(&search);

        let plan = plan_stops(&self.optimizer, &route, stations, &self.config)?;
        log::info!(
            "planned {:.1} mile trip with {} stops costing {:.2}",
            route.length_miles,
            plan.stops.len(),
            plan.total_fuel_cost
        );
        Ok(PlanResponse { route, plan })
    }
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "fixtures scale degrees to miles")]
mod tests {
    use super::*;
    use crate::test_support::{FixedRouteProvider, MemoryCatalog, StraightLineRouteProvider};
    use geo::line_string;
    use rstest::{fixture, rstest};
    use std::time::Duration;

    const DEGREE_MILES: f64 = 69.093;

    fn station(id: u64, lon: f64, lat: f64, price: f64) -> Station {
        Station::new(id, format!("Station {id}"), Coord { x: lon, y: lat }, price)
            .expect("valid station")
    }

    #[fixture]
    fn ten_degree_route() -> Route {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        Route::new(10.0 * DEGREE_MILES, Duration::from_secs(36_000), geometry).expect("route")
    }

    fn request() -> PlanRequest {
        PlanRequest {
            start: Coord { x: 0.0, y: 0.0 },
            finish: Coord { x: 10.0, y: 0.0 },
        }
    }

    #[rstest]
    fn short_trip_without_stations_needs_no_stops() {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        let route = Route::new(DEGREE_MILES, Duration::from_secs(3_600), geometry).expect("route");
        let plan = optimize_route(&route, Vec::new(), &PlannerConfig::default()).expect("plan");
        assert!(plan.is_empty());
    }

    #[rstest]
    fn long_trip_without_corridor_stations_is_rejected(ten_degree_route: Route) {
        let far_away = vec![station(1, 5.0, 3.0, 3.0)];
        let err = optimize_route(&ten_degree_route, far_away, &PlannerConfig::default())
            .expect_err("nothing in corridor");
        assert_eq!(err, FuelPlanError::NoStationsInCorridor);
    }

    #[rstest]
    fn rejects_negative_corridor(ten_degree_route: Route) {
        let config = PlannerConfig {
            corridor_width_miles: -1.0,
            ..PlannerConfig::default()
        };
        let err = optimize_route(&ten_degree_route, Vec::new(), &config).expect_err("invalid");
        assert!(matches!(err, FuelPlanError::InvalidInput { .. }));
    }

    #[rstest]
    fn plans_through_catalog_and_provider(ten_degree_route: Route) {
        let catalog = MemoryCatalog::with_stations([
            station(1, 4.0, 0.01, 3.40),
            station(2, 6.0, 0.01, 3.10),
            station(3, 6.0, 2.00, 1.00),
        ]);
        let planner = FuelPlanner::new(
            catalog,
            FixedRouteProvider::new(ten_degree_route),
            PlannerConfig::default(),
        );
        let response = planner.plan(&request()).expect("plan");
        let ids: Vec<u64> = response.plan.stops.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![2]);
        assert!((response.route.length_miles - 10.0 * DEGREE_MILES).abs() < 1e-9);
    }

    #[rstest]
    fn surfaces_provider_failures() {
        let planner = FuelPlanner::new(
            MemoryCatalog::default(),
            FixedRouteProvider::failing(RouteProviderError::NoRoute),
            PlannerConfig::default(),
        );
        let err = planner.plan(&request()).expect_err("provider failure");
        assert_eq!(err, PlannerError::Route(RouteProviderError::NoRoute));
    }

    #[rstest]
    fn rejects_out_of_range_coordinates() {
        let planner = FuelPlanner::new(
            MemoryCatalog::default(),
            StraightLineRouteProvider::default(),
            PlannerConfig::default(),
        );
        let request = PlanRequest {
            start: Coord { x: 0.0, y: 95.0 },
            finish: Coord { x: 1.0, y: 0.0 },
        };
        assert!(matches!(
            planner.plan(&request),
            Err(PlannerError::Plan(FuelPlanError::InvalidInput { .. }))
        ));
    }

    #[rstest]
    fn custom_policy_is_used(ten_degree_route: Route) {
        let catalog =
            MemoryCatalog::with_stations([station(1, 1.0, 0.0, 2.0), station(2, 6.0, 0.0, 4.0)]);
        let config = PlannerConfig::default();
        let planner = FuelPlanner::new(catalog, FixedRouteProvider::new(ten_degree_route), config)
            .with_policy(crate::MinimumFuelPolicy);
        let response = planner.plan(&request()).expect("plan");
        // The cheap early stop is skipped: the tank already reaches mile 414.6.
        let ids: Vec<u64> = response.plan.stops.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[rstest]
    fn default_policy_fills_at_the_cheap_early_stop(ten_degree_route: Route) {
        let catalog =
            MemoryCatalog::with_stations([station(1, 1.0, 0.0, 2.0), station(2, 6.0, 0.0, 4.0)]);
        let planner = FuelPlanner::new(
            catalog,
            FixedRouteProvider::new(ten_degree_route),
            PlannerConfig::default(),
        );
        let response = planner.plan(&request()).expect("plan");
        let ids: Vec<u64> = response.plan.stops.iter().map(|s| s.station_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
