//! Driving routes and positions along them.

use std::fmt;
use std::time::Duration;

use geo::LineString;
use thiserror::Error;

/// Distance in miles from the start of a route, measured along its path.
///
/// # Examples
/// ```
/// use fuelstop_core::RoutePoint;
///
/// let point = RoutePoint::new(120.5);
/// assert_eq!(point.miles(), 120.5);
/// assert!(RoutePoint::START < point);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoutePoint(f64);

impl RoutePoint {
    /// The start of every route.
    pub const START: Self = Self(0.0);

    /// Wrap a distance in miles.
    #[must_use]
    pub const fn new(miles: f64) -> Self {
        Self(miles)
    }

    /// Distance from the start in miles.
    #[must_use]
    pub const fn miles(self) -> f64 {
        self.0
    }
}

impl fmt::Display for RoutePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mile {:.1}", self.0)
    }
}

/// A computed driving route between two coordinates.
///
/// `length_miles` is the road distance reported by the routing service and is
/// authoritative; `geometry` is the (possibly simplified) path used to place
/// stations along the route. Duration and map URL pass through to callers
/// untouched.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::line_string;
/// use fuelstop_core::Route;
///
/// # fn main() -> Result<(), fuelstop_core::RouteError> {
/// let geometry = line_string![(x: -97.7, y: 30.3), (x: -96.8, y: 32.8)];
/// let route = Route::new(195.0, Duration::from_secs(3 * 3600), geometry)?;
/// assert_eq!(route.length_miles, 195.0);
/// assert!(route.map_url.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Total road distance in miles.
    pub length_miles: f64,
    /// Estimated driving time.
    pub duration: Duration,
    /// Ordered path from start to finish (`x = longitude`, `y = latitude`).
    pub geometry: LineString<f64>,
    /// Human-viewable map link for the route, when available.
    #[cfg_attr(feature = "serde", serde(default))]
    pub map_url: Option<String>,
}

/// Errors returned by [`Route::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// The geometry contained no coordinates.
    #[error("route geometry must contain at least one coordinate")]
    EmptyGeometry,
    /// The reported length was zero, negative or not finite.
    #[error("route length must be positive, got {0}")]
    NonPositiveLength(f64),
}

impl Route {
    /// Validates and constructs a [`Route`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::EmptyGeometry`] when `geometry` has no points and
    /// [`RouteError::NonPositiveLength`] when `length_miles` is not positive.
    pub fn new(
        length_miles: f64,
        duration: Duration,
        geometry: LineString<f64>,
    ) -> Result<Self, RouteError> {
        if geometry.0.is_empty() {
            return Err(RouteError::EmptyGeometry);
        }
        if !length_miles.is_finite() || length_miles <= 0.0 {
            return Err(RouteError::NonPositiveLength(length_miles));
        }
        Ok(Self {
            length_miles,
            duration,
            geometry,
            map_url: None,
        })
    }

    /// Attach a map link.
    #[must_use]
    pub fn with_map_url(mut self, map_url: impl Into<String>) -> Self {
        self.map_url = Some(map_url.into());
        self
    }

    /// Position of the finish.
    #[must_use]
    pub const fn finish(&self) -> RoutePoint {
        RoutePoint::new(self.length_miles)
    }
}
