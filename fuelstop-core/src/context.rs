//! Per-request vehicle and route parameters.

use crate::FuelPlanError;

/// Default maximum miles travelled on one full tank.
pub const DEFAULT_RANGE_LIMIT_MILES: f64 = 500.0;

/// Default fuel economy in miles per gallon.
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;

/// How the fuel already in the tank at departure is priced.
///
/// The vehicle always leaves full. The departure fuel is already paid for, so
/// this setting never changes which stations are chosen; it only sets the
/// reported [`StopPlan::start_tank_cost`](crate::StopPlan::start_tank_cost).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum StartTankPricing {
    /// The departure tank costs nothing.
    #[default]
    Free,
    /// The departure tank was bought at a known price per gallon.
    Fixed {
        /// Price paid per gallon before departure.
        price_per_gallon: f64,
    },
    /// Fuel burnt before the first stop is charged at that stop's price.
    FirstStop,
}

/// Immutable parameters for one optimisation run.
///
/// # Examples
/// ```
/// use fuelstop_core::RouteContext;
///
/// let context = RouteContext::new(1_200.0).with_miles_per_gallon(8.0);
/// assert_eq!(context.range_limit_miles, 500.0);
/// assert_eq!(context.tank_capacity_gallons(), 62.5);
/// assert!(context.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteContext {
    /// Total route length in miles.
    pub route_length_miles: f64,
    /// Miles the vehicle can travel on a full tank.
    pub range_limit_miles: f64,
    /// Miles travelled per gallon.
    pub miles_per_gallon: f64,
    /// Pricing applied to the departure tank.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_tank: StartTankPricing,
}

impl RouteContext {
    /// Context for a route of `route_length_miles` with default vehicle limits.
    #[must_use]
    pub const fn new(route_length_miles: f64) -> Self {
        Self {
            route_length_miles,
            range_limit_miles: DEFAULT_RANGE_LIMIT_MILES,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            start_tank: StartTankPricing::Free,
        }
    }

    /// Override the range limit.
    #[must_use]
    pub const fn with_range_limit(mut self, range_limit_miles: f64) -> Self {
        self.range_limit_miles = range_limit_miles;
        self
    }

    /// Override the fuel economy.
    #[must_use]
    pub const fn with_miles_per_gallon(mut self, miles_per_gallon: f64) -> Self {
        self.miles_per_gallon = miles_per_gallon;
        self
    }

    /// Override the departure tank pricing.
    #[must_use]
    pub const fn with_start_tank(mut self, start_tank: StartTankPricing) -> Self {
        self.start_tank = start_tank;
        self
    }

    /// Gallons needed to cover `miles`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "fuel volume is a floating-point ratio of distance and economy"
    )]
    pub fn gallons_for(&self, miles: f64) -> f64 {
        miles / self.miles_per_gallon
    }

    /// Gallons held by a full tank.
    #[must_use]
    pub fn tank_capacity_gallons(&self) -> f64 {
        self.gallons_for(self.range_limit_miles)
    }

    /// Reject non-positive or non-finite parameters.
    ///
    /// # Errors
    ///
    /// Returns [`FuelPlanError::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<(), FuelPlanError> {
        require_positive("route length", self.route_length_miles)?;
        require_positive("range limit", self.range_limit_miles)?;
        require_positive("consumption rate", self.miles_per_gallon)?;
        if let StartTankPricing::Fixed { price_per_gallon } = self.start_tank
            && (!price_per_gallon.is_finite() || price_per_gallon < 0.0)
        {
            return Err(FuelPlanError::invalid_input(format!(
                "start tank price must be non-negative, got {price_per_gallon}"
            )));
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), FuelPlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FuelPlanError::invalid_input(format!(
            "{field} must be positive, got {value}"
        )))
    }
}
