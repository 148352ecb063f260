//! Choose refuelling stops and purchase amounts along a route.
//!
//! The optimiser runs in two phases. A shortest-path search over the
//! projected stations selects the stops that minimise the total fuel bill,
//! preferring fewer stops when costs tie. A [`RefillPolicy`] then decides how
//! much to buy at each selected stop. Purchases are always clamped so the
//! vehicle reaches the next stop and the tank never overflows.
//!
//! # Examples
//! ```
//! use fuelstop_core::{ProjectedStation, RouteContext, RoutePoint, Station, StopOptimizer};
//! use geo::Coord;
//!
//! let station = Station::new(7, "Midway", Coord { x: -100.0, y: 35.0 }, 3.00).unwrap();
//! let stations = vec![ProjectedStation::at(station, RoutePoint::new(300.0))];
//!
//! let plan = StopOptimizer::new()
//!     .optimize(&RouteContext::new(550.0), &stations)
//!     .unwrap();
//! assert_eq!(plan.stops.len(), 1);
//! assert_eq!(plan.total_fuel_cost, 15.00);
//! ```

mod graph;
mod refill;

use std::cmp::Ordering;

pub use refill::{
    CheapestAheadPolicy, FillUpPolicy, MinimumFuelPolicy, RefillContext, RefillPolicy, Waypoint,
};

use self::graph::{FuelGraph, Node};
use crate::projector::EPSILON_MILES;
use crate::{FuelPlanError, ProjectedStation, RouteContext, RoutePoint, StartTankPricing};
use crate::{StopDecision, StopPlan};

/// Purchases below this many gallons are treated as no purchase.
const GALLON_TOLERANCE: f64 = 1e-9;

/// Selects stops and purchase amounts for a route.
///
/// The purchase rule is a type parameter so callers can swap it without
/// touching stop selection.
#[derive(Debug, Clone, Default)]
pub struct StopOptimizer<P = CheapestAheadPolicy> {
    policy: P,
}

impl StopOptimizer {
    /// Optimiser using [`CheapestAheadPolicy`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: CheapestAheadPolicy,
        }
    }
}

impl<P: RefillPolicy> StopOptimizer<P> {
    /// Optimiser using a custom purchase rule.
    #[must_use]
    pub const fn with_policy(policy: P) -> Self {
        Self { policy }
    }

    /// The purchase rule in use.
    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Build a refuelling plan for `stations` along the route in `context`.
    ///
    /// Stations may arrive in any order; positions outside the route are
    /// ignored. When one tank covers the trip the plan is empty.
    ///
    /// # Errors
    ///
    /// Returns [`FuelPlanError::InvalidInput`] for unusable context values and
    /// [`FuelPlanError::Infeasible`] when some stretch between consecutive
    /// candidates (or the start and finish) is longer than one tank.
    pub fn optimize(
        &self,
        context: &RouteContext,
        stations: &[ProjectedStation],
    ) -> Result<StopPlan, FuelPlanError> {
        context.validate()?;
        let candidates = candidates(context, stations);

        if within_range(context.route_length_miles, context.range_limit_miles) {
            log::debug!(
                "{:.1} mile route fits in one {:.1} mile tank; no stops needed",
                context.route_length_miles,
                context.range_limit_miles
            );
            return Ok(StopPlan::from_stops(Vec::new(), start_tank_cost(context, None)));
        }
        if let Some((gap_start, gap_end)) = first_gap(context, &candidates) {
            return Err(FuelPlanError::Infeasible { gap_start, gap_end });
        }

        let graph = FuelGraph::new(
            nodes(context, &candidates),
            context.range_limit_miles,
            context.miles_per_gallon,
        );
        let path = graph.cheapest_path().ok_or(FuelPlanError::Infeasible {
            gap_start: RoutePoint::START,
            gap_end: RoutePoint::new(context.route_length_miles),
        })?;
        let selected: Vec<&ProjectedStation> = path
            .iter()
            .filter_map(|node| node.checked_sub(1))
            .filter_map(|index| candidates.get(index).copied())
            .collect();

        let stops = self.purchase(context, &selected);
        let first = stops.first().map(|stop| (stop.route_point, stop.price_per_gallon));
        let plan = StopPlan::from_stops(stops, start_tank_cost(context, first));
        log::debug!(
            "selected {} of {} candidate stations; {:.2} gallons for {:.2}",
            plan.stops.len(),
            candidates.len(),
            plan.total_gallons,
            plan.total_fuel_cost
        );
        Ok(plan)
    }

    /// Walk the selected stops, asking the policy how much to buy at each.
    #[expect(
        clippy::float_arithmetic,
        reason = "fuel bookkeeping is floating-point"
    )]
    fn purchase(&self, context: &RouteContext, selected: &[&ProjectedStation]) -> Vec<StopDecision> {
        let waypoints: Vec<Waypoint> = selected
            .iter()
            .map(|candidate| Waypoint {
                route_point: candidate.route_point,
                price_per_gallon: candidate.price_per_gallon(),
            })
            .collect();

        let mut decisions = Vec::with_capacity(selected.len());
        let mut fuel = context.range_limit_miles;
        let mut position = 0.0;
        for (stop, candidate) in selected.iter().enumerate() {
            let here = candidate.route_point.miles();
            let arrival = (fuel - (here - position)).max(0.0);
            let refill = RefillContext {
                stop,
                waypoints: &waypoints,
                route_length_miles: context.route_length_miles,
                range_limit_miles: context.range_limit_miles,
                fuel_on_arrival_miles: arrival,
            };
            let bought = clamp_purchase(&refill, self.policy.miles_to_buy(&refill));
            fuel = arrival + bought;
            position = here;

            let gallons = context.gallons_for(bought);
            if gallons <= GALLON_TOLERANCE {
                continue;
            }
            let price = candidate.price_per_gallon();
            decisions.push(StopDecision {
                station_id: candidate.station.id,
                station_name: candidate.station.name.clone(),
                locality: candidate.station.locality.clone(),
                route_point: candidate.route_point,
                gallons_purchased: gallons,
                price_per_gallon: price,
                cost: gallons * price,
            });
        }
        decisions
    }
}

/// Optimise with the default purchase rule.
///
/// # Errors
///
/// See [`StopOptimizer::optimize`].
pub fn optimize(
    context: &RouteContext,
    stations: &[ProjectedStation],
) -> Result<StopPlan, FuelPlanError> {
    StopOptimizer::new().optimize(context, stations)
}

/// Keep the policy's answer between "enough for the next hop" and "full".
fn clamp_purchase(refill: &RefillContext<'_>, proposed: f64) -> f64 {
    let needed = refill.shortfall(refill.miles_to_next());
    let room = refill.room_miles().max(needed);
    if proposed.is_finite() {
        proposed.max(needed).min(room)
    } else {
        needed
    }
}

#[expect(clippy::float_arithmetic, reason = "range check carries a tolerance")]
fn within_range(distance: f64, range_limit: f64) -> bool {
    distance <= range_limit + EPSILON_MILES
}

/// Stations on the route, ordered by position, then price, then id.
fn candidates<'a>(
    context: &RouteContext,
    stations: &'a [ProjectedStation],
) -> Vec<&'a ProjectedStation> {
    let length = context.route_length_miles;
    let mut kept: Vec<&ProjectedStation> = stations
        .iter()
        .filter(|candidate| {
            let miles = candidate.route_point.miles();
            let on_route = miles.is_finite() && (0.0..=length).contains(&miles);
            if !on_route {
                log::warn!(
                    "ignoring station {} at {} outside the {length:.1} mile route",
                    candidate.station.id,
                    candidate.route_point
                );
            }
            on_route
        })
        .collect();
    kept.sort_by(|lhs, rhs| compare_candidates(lhs, rhs));
    kept
}

fn compare_candidates(lhs: &ProjectedStation, rhs: &ProjectedStation) -> Ordering {
    lhs.route_point
        .miles()
        .total_cmp(&rhs.route_point.miles())
        .then_with(|| lhs.price_per_gallon().total_cmp(&rhs.price_per_gallon()))
        .then_with(|| lhs.station.id.cmp(&rhs.station.id))
}

/// First stretch between consecutive points that one tank cannot cover.
#[expect(clippy::float_arithmetic, reason = "gaps are distance differences")]
fn first_gap(
    context: &RouteContext,
    candidates: &[&ProjectedStation],
) -> Option<(RoutePoint, RoutePoint)> {
    let points = std::iter::once(RoutePoint::START)
        .chain(candidates.iter().map(|candidate| candidate.route_point))
        .chain(std::iter::once(RoutePoint::new(context.route_length_miles)));
    let mut previous = RoutePoint::START;
    for point in points {
        if !within_range(point.miles() - previous.miles(), context.range_limit_miles) {
            return Some((previous, point));
        }
        previous = point;
    }
    None
}

fn nodes(context: &RouteContext, candidates: &[&ProjectedStation]) -> Vec<Node> {
    let start = Node {
        miles: 0.0,
        price_per_gallon: 0.0,
    };
    let finish = Node {
        miles: context.route_length_miles,
        price_per_gallon: 0.0,
    };
    std::iter::once(start)
        .chain(candidates.iter().map(|candidate| Node {
            miles: candidate.route_point.miles(),
            price_per_gallon: candidate.price_per_gallon(),
        }))
        .chain(std::iter::once(finish))
        .collect()
}

/// Price of the departure tank under the configured pricing.
#[expect(
    clippy::float_arithmetic,
    reason = "tank cost is gallons times price"
)]
fn start_tank_cost(context: &RouteContext, first_stop: Option<(RoutePoint, f64)>) -> f64 {
    match context.start_tank {
        StartTankPricing::Free => 0.0,
        StartTankPricing::Fixed { price_per_gallon } => {
            context.tank_capacity_gallons() * price_per_gallon
        }
        StartTankPricing::FirstStop => first_stop.map_or(0.0, |(point, price)| {
            context.gallons_for(point.miles()) * price
        }),
    }
}
