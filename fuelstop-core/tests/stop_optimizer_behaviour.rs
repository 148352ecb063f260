//! Behavioural tests for `StopOptimizer` using rstest-bdd.
#![expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point fuel figures"
)]

use std::cell::RefCell;

use fuelstop_core::{
    FuelPlanError, ProjectedStation, RouteContext, RoutePoint, Station, StopOptimizer, StopPlan,
};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug)]
struct OptimizerWorld {
    context: RefCell<RouteContext>,
    stations: RefCell<Vec<ProjectedStation>>,
    outcome: RefCell<Option<Result<StopPlan, FuelPlanError>>>,
}

impl OptimizerWorld {
    fn new() -> Self {
        Self {
            context: RefCell::new(RouteContext::new(1.0)),
            stations: RefCell::new(Vec::new()),
            outcome: RefCell::new(None),
        }
    }

    fn set_route(&self, length_miles: f64) {
        self.context
            .replace(RouteContext::new(length_miles).with_range_limit(500.0));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn add_station(&self, miles: f64, price: f64) {
        let id = u64::try_from(self.stations.borrow().len()).expect("small station count") + 1;
        let station = Station::new(id, format!("Station {id}"), Coord { x: 0.0, y: 0.0 }, price)
            .expect("valid station");
        self.stations
            .borrow_mut()
            .push(ProjectedStation::at(station, RoutePoint::new(miles)));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_outcome(&self) -> Result<StopPlan, FuelPlanError> {
        self.outcome
            .borrow()
            .as_ref()
            .cloned()
            .expect("outcome should be recorded before assertions")
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn expect_plan(&self) -> StopPlan {
        self.expect_outcome().expect("expected a plan")
    }
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::new()
}

#[given("a 550 mile route with a 500 mile range")]
fn given_550_mile_route(world: &OptimizerWorld) {
    world.set_route(550.0);
}

#[given("a 450 mile route with a 500 mile range")]
fn given_450_mile_route(world: &OptimizerWorld) {
    world.set_route(450.0);
}

#[given("a 700 mile route with a 500 mile range")]
fn given_700_mile_route(world: &OptimizerWorld) {
    world.set_route(700.0);
}

#[given("a 1000 mile route with a 500 mile range")]
fn given_1000_mile_route(world: &OptimizerWorld) {
    world.set_route(1_000.0);
}

#[given("a station at mile 300 priced 3.00")]
fn given_station_300_at_300(world: &OptimizerWorld) {
    world.add_station(300.0, 3.00);
}

#[given("a station at mile 300 priced 3.50")]
fn given_station_300_at_350(world: &OptimizerWorld) {
    world.add_station(300.0, 3.50);
}

#[given("a station at mile 400 priced 3.00")]
fn given_station_400_at_300(world: &OptimizerWorld) {
    world.add_station(400.0, 3.00);
}

#[given("stations at miles 100 and 700")]
fn given_stations_either_side_of_gap(world: &OptimizerWorld) {
    world.add_station(100.0, 3.00);
    world.add_station(700.0, 3.00);
}

#[when("the stop optimizer runs")]
fn when_optimizer_runs(world: &OptimizerWorld) {
    let context = *world.context.borrow();
    let outcome = StopOptimizer::new().optimize(&context, &world.stations.borrow());
    world.outcome.replace(Some(outcome));
}

#[then("the plan has 1 stop")]
fn then_one_stop(world: &OptimizerWorld) {
    assert_eq!(world.expect_plan().stops.len(), 1);
}

#[then("the plan has no stops")]
fn then_no_stops(world: &OptimizerWorld) {
    let plan = world.expect_plan();
    assert!(plan.is_empty());
    assert!(plan.total_fuel_cost.abs() < f64::EPSILON);
}

#[then("the stop at mile 300 buys 5 gallons")]
#[expect(
    clippy::indexing_slicing,
    reason = "the preceding step asserts a single stop"
)]
fn then_buys_five_gallons(world: &OptimizerWorld) {
    let plan = world.expect_plan();
    let stop = &plan.stops[0];
    assert_eq!(stop.route_point, RoutePoint::new(300.0));
    assert!((stop.gallons_purchased - 5.0).abs() < 1e-9);
    assert!(stop.gallons_purchased <= world.context.borrow().tank_capacity_gallons());
}

#[then("the total fuel cost is 15.00")]
fn then_total_cost(world: &OptimizerWorld) {
    assert!((world.expect_plan().total_fuel_cost - 15.00).abs() < 1e-9);
}

#[then("the only stop is at mile 400")]
fn then_stop_at_400(world: &OptimizerWorld) {
    let plan = world.expect_plan();
    let points: Vec<RoutePoint> = plan.stops.iter().map(|stop| stop.route_point).collect();
    assert_eq!(points, vec![RoutePoint::new(400.0)]);
}

#[then("the plan fails with a gap from mile 100 to mile 700")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_gap_reported(world: &OptimizerWorld) {
    let err = world.expect_outcome().expect_err("expected Infeasible");
    assert_eq!(
        err,
        FuelPlanError::Infeasible {
            gap_start: RoutePoint::new(100.0),
            gap_end: RoutePoint::new(700.0),
        }
    );
}

#[scenario(path = "tests/features/stop_optimizer.feature", index = 0)]
fn single_mid_route_stop(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/stop_optimizer.feature", index = 1)]
fn trip_within_one_tank(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/stop_optimizer.feature", index = 2)]
fn stretch_longer_than_a_tank(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/stop_optimizer.feature", index = 3)]
fn cheaper_station_preferred(world: OptimizerWorld) {
    let _ = world;
}
