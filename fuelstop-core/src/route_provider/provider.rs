//! Route provider trait.

use geo::Coord;

use crate::Route;

use super::error::RouteProviderError;

/// Fetch a driving route between two coordinates.
///
/// Coordinates use WGS84 (`x = longitude`, `y = latitude`).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use geo::{Coord, LineString};
/// use fuelstop_core::{Route, RouteProvider, RouteProviderError};
///
/// struct Direct;
///
/// impl RouteProvider for Direct {
///     fn route(
///         &self,
///         start: Coord<f64>,
///         finish: Coord<f64>,
///     ) -> Result<Route, RouteProviderError> {
///         let geometry = LineString::from(vec![start, finish]);
///         Route::new(42.0, Duration::from_secs(2_520), geometry)
///             .map_err(|err| RouteProviderError::Parse { message: err.to_string() })
///     }
/// }
///
/// let route = Direct.route(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.5, y: 0.0 })?;
/// assert_eq!(route.length_miles, 42.0);
/// # Ok::<(), RouteProviderError>(())
/// ```
pub trait RouteProvider {
    /// Return the route from `start` to `finish`.
    ///
    /// Implementations should return [`RouteProviderError::NoRoute`] when the
    /// service finds no drivable path.
    fn route(&self, start: Coord<f64>, finish: Coord<f64>) -> Result<Route, RouteProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::test_support::StraightLineRouteProvider;

    #[rstest]
    fn straight_line_provider_measures_the_chord() {
        let route = StraightLineRouteProvider::default()
            .route(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 })
            .expect("route");
        assert!(route.length_miles > 69.0 && route.length_miles < 69.2);
        assert_eq!(route.geometry.0.len(), 2);
    }

    #[rstest]
    fn straight_line_provider_rejects_identical_points() {
        let point = Coord { x: 1.0, y: 1.0 };
        let err = StraightLineRouteProvider::default()
            .route(point, point)
            .expect_err("zero length");
        assert_eq!(err, RouteProviderError::NoRoute);
    }
}
