//! Purchase-amount policies applied to the stops the optimiser selected.
//!
//! A policy only decides *how much* to buy. The optimiser clamps every answer
//! so the vehicle always reaches the next stop and the tank never overflows.

use crate::RoutePoint;

/// A selected stop as seen by a refill policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Position along the route.
    pub route_point: RoutePoint,
    /// Posted price per gallon.
    pub price_per_gallon: f64,
}

/// Everything a policy may inspect when choosing a purchase.
///
/// Fuel quantities are expressed in miles of driving.
#[derive(Debug, Clone, Copy)]
pub struct RefillContext<'a> {
    /// Index of the current stop within `waypoints`.
    pub stop: usize,
    /// Every selected stop, in route order.
    pub waypoints: &'a [Waypoint],
    /// Total route length.
    pub route_length_miles: f64,
    /// Miles available from a full tank.
    pub range_limit_miles: f64,
    /// Fuel left in the tank when the vehicle pulls in.
    pub fuel_on_arrival_miles: f64,
}

impl RefillContext<'_> {
    /// The stop being refuelled.
    #[must_use]
    pub fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.stop)
    }

    /// Later stops within one tank of the current stop.
    pub fn upcoming_in_range(&self) -> impl Iterator<Item = &Waypoint> + '_ {
        let here = self.here_miles();
        let limit = self.range_limit_miles;
        self.waypoints
            .iter()
            .skip(self.stop.saturating_add(1))
            .take_while(move |waypoint| distance(here, waypoint.route_point.miles()) <= limit)
    }

    /// Miles from the current stop to the next stop, or to the finish.
    #[must_use]
    pub fn miles_to_next(&self) -> f64 {
        let next = self
            .waypoints
            .get(self.stop.saturating_add(1))
            .map_or(self.route_length_miles, |waypoint| {
                waypoint.route_point.miles()
            });
        distance(self.here_miles(), next)
    }

    /// Miles from the current stop to the finish.
    #[must_use]
    pub fn miles_to_finish(&self) -> f64 {
        distance(self.here_miles(), self.route_length_miles)
    }

    /// Miles from the current stop to `waypoint`.
    #[must_use]
    pub fn miles_to(&self, waypoint: &Waypoint) -> f64 {
        distance(self.here_miles(), waypoint.route_point.miles())
    }

    /// Free space in the tank, in miles.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "tank headroom is a difference")]
    pub fn room_miles(&self) -> f64 {
        (self.range_limit_miles - self.fuel_on_arrival_miles).max(0.0)
    }

    /// Miles that must be bought to reach `miles_ahead` from here.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "shortfall is a difference")]
    pub fn shortfall(&self, miles_ahead: f64) -> f64 {
        (miles_ahead - self.fuel_on_arrival_miles).max(0.0)
    }

    fn here_miles(&self) -> f64 {
        self.current()
            .map_or(0.0, |waypoint| waypoint.route_point.miles())
    }
}

#[expect(clippy::float_arithmetic, reason = "route distances are differences")]
fn distance(from: f64, to: f64) -> f64 {
    to - from
}

/// Decides how many miles of fuel to buy at a selected stop.
///
/// Closures taking a [`RefillContext`] implement this trait, so callers can
/// swap the purchase rule without defining a type.
///
/// # Examples
/// ```
/// use fuelstop_core::{RefillContext, RefillPolicy};
///
/// // Always fill the tank to the brim.
/// let brim = |context: &RefillContext<'_>| context.room_miles();
/// let context = RefillContext {
///     stop: 0,
///     waypoints: &[],
///     route_length_miles: 900.0,
///     range_limit_miles: 500.0,
///     fuel_on_arrival_miles: 120.0,
/// };
/// assert_eq!(brim.miles_to_buy(&context), 380.0);
/// ```
pub trait RefillPolicy {
    /// Miles of fuel to buy at `context.current()`.
    fn miles_to_buy(&self, context: &RefillContext<'_>) -> f64;
}

impl<F> RefillPolicy for F
where
    F: Fn(&RefillContext<'_>) -> f64,
{
    fn miles_to_buy(&self, context: &RefillContext<'_>) -> f64 {
        self(context)
    }
}

/// Buy just enough to reach the next stop that is no more expensive; when
/// none is in range, buy enough to finish, or fill up if the finish is out of
/// reach.
///
/// Applied to the stops chosen by the optimiser this reproduces the cheapest
/// purchase schedule for that set of stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheapestAheadPolicy;

impl RefillPolicy for CheapestAheadPolicy {
    fn miles_to_buy(&self, context: &RefillContext<'_>) -> f64 {
        let Some(here) = context.current() else {
            return 0.0;
        };
        if let Some(cheaper) = context
            .upcoming_in_range()
            .find(|waypoint| waypoint.price_per_gallon <= here.price_per_gallon)
        {
            return context.shortfall(context.miles_to(cheaper));
        }
        let to_finish = context.miles_to_finish();
        if to_finish <= context.range_limit_miles {
            context.shortfall(to_finish)
        } else {
            context.room_miles()
        }
    }
}

/// Buy only what is needed to reach the next stop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MinimumFuelPolicy;

impl RefillPolicy for MinimumFuelPolicy {
    fn miles_to_buy(&self, context: &RefillContext<'_>) -> f64 {
        context.shortfall(context.miles_to_next())
    }
}

/// Fill up at every stop, but never beyond what the rest of the trip needs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FillUpPolicy;

impl RefillPolicy for FillUpPolicy {
    fn miles_to_buy(&self, context: &RefillContext<'_>) -> f64 {
        context
            .room_miles()
            .min(context.shortfall(context.miles_to_finish()))
    }
}
