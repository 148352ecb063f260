//! Refuelling plans and the errors raised while building them.

use thiserror::Error;

use crate::RoutePoint;

/// One recommended refuelling stop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopDecision {
    /// Catalog identifier of the station.
    pub station_id: u64,
    /// Display name of the station.
    pub station_name: String,
    /// Optional "City, ST" label of the station.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locality: Option<String>,
    /// Where the stop sits along the route.
    pub route_point: RoutePoint,
    /// Gallons bought at this stop.
    pub gallons_purchased: f64,
    /// Posted price per gallon.
    pub price_per_gallon: f64,
    /// `gallons_purchased * price_per_gallon` at full precision.
    pub cost: f64,
}

/// Ordered refuelling decisions covering a whole trip.
///
/// Consecutive stops (and the start and finish) are never further apart than
/// the vehicle range, and `total_fuel_cost` is the sum of the stop costs
/// rounded to cents.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopPlan {
    /// Stops in route order.
    pub stops: Vec<StopDecision>,
    /// Gallons bought across every stop.
    pub total_gallons: f64,
    /// Sum of stop costs, rounded to cents.
    pub total_fuel_cost: f64,
    /// Price of the departure tank under the configured pricing, rounded to
    /// cents. Not included in `total_fuel_cost`.
    pub start_tank_cost: f64,
}

impl StopPlan {
    /// A plan with no stops, used when one tank covers the trip.
    ///
    /// # Examples
    /// ```
    /// use fuelstop_core::StopPlan;
    ///
    /// let plan = StopPlan::empty();
    /// assert!(plan.stops.is_empty());
    /// assert_eq!(plan.total_fuel_cost, 0.0);
    /// ```
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a plan from ordered stops, deriving the totals.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "plan totals accumulate floating-point gallons and costs"
    )]
    pub fn from_stops(stops: Vec<StopDecision>, start_tank_cost: f64) -> Self {
        let total_gallons = stops.iter().map(|stop| stop.gallons_purchased).sum();
        let raw_cost: f64 = stops.iter().map(|stop| stop.cost).sum();
        Self {
            stops,
            total_gallons,
            total_fuel_cost: round_to_cents(raw_cost),
            start_tank_cost: round_to_cents(start_tank_cost),
        }
    }

    /// Whether the trip needs no refuelling.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Round a currency amount to whole cents.
///
/// # Examples
/// ```
/// use fuelstop_core::round_to_cents;
///
/// assert_eq!(round_to_cents(12.345_1), 12.35);
/// assert_eq!(round_to_cents(0.004), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "currency rounding operates on floating-point amounts"
)]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Errors raised while projecting stations or optimising stops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuelPlanError {
    /// A route, range or consumption parameter was not usable.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the rejected parameter.
        reason: String,
    },
    /// No station projected onto the route within the corridor.
    #[error("no fuel stations lie within the route corridor")]
    NoStationsInCorridor,
    /// Some stretch of the route is longer than one tank.
    #[error("route cannot be completed: gap from {gap_start} to {gap_end} exceeds the range limit")]
    Infeasible {
        /// Last reachable point before the gap.
        gap_start: RoutePoint,
        /// First point after the gap.
        gap_end: RoutePoint,
    },
}

impl FuelPlanError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
