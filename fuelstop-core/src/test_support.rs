//! In-memory catalog and deterministic route providers used by unit,
//! behaviour and documentation tests.

use std::time::Duration;

use geo::{Coord, Distance, Haversine, Intersects, LineString, Point, Rect};

use crate::{Route, RouteProvider, RouteProviderError, Station, StationCatalog};

const METRES_PER_MILE: f64 = 1_609.344;

/// In-memory `StationCatalog` performing a linear scan.
///
/// Intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemoryCatalog {
    stations: Vec<Station>,
}

impl MemoryCatalog {
    /// Create a catalog from a collection of stations.
    pub fn with_stations<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = Station>,
    {
        Self {
            stations: stations.into_iter().collect(),
        }
    }

    /// Number of stations held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationCatalog for MemoryCatalog {
    fn stations_in_bbox(&self, bbox: &Rect<f64>) -> Box<dyn Iterator<Item = Station> + Send + '_> {
        let bbox = *bbox;
        Box::new(
            self.stations
                .iter()
                // `Intersects` treats boundary points as inside the rectangle.
                .filter(move |station| bbox.intersects(&station.location))
                .cloned(),
        )
    }
}

/// `RouteProvider` returning the great-circle chord between the endpoints.
///
/// Road length is the chord length multiplied by `detour_factor` and the
/// duration assumes `speed_mph`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLineRouteProvider {
    /// Ratio of road distance to straight-line distance.
    pub detour_factor: f64,
    /// Average driving speed.
    pub speed_mph: f64,
}

impl Default for StraightLineRouteProvider {
    fn default() -> Self {
        Self {
            detour_factor: 1.0,
            speed_mph: 60.0,
        }
    }
}

impl RouteProvider for StraightLineRouteProvider {
    #[expect(
        clippy::float_arithmetic,
        reason = "route length and duration are derived from the chord"
    )]
    fn route(&self, start: Coord<f64>, finish: Coord<f64>) -> Result<Route, RouteProviderError> {
        let chord = Haversine.distance(Point::from(start), Point::from(finish)) / METRES_PER_MILE;
        let length = chord * self.detour_factor;
        let hours = length / self.speed_mph;
        let duration = Duration::try_from_secs_f64(hours * 3_600.0).unwrap_or(Duration::ZERO);
        let geometry = LineString::from(vec![start, finish]);
        Route::new(length, duration, geometry).map_err(|_| RouteProviderError::NoRoute)
    }
}

/// `RouteProvider` returning a canned route or error regardless of input.
#[derive(Debug, Clone)]
pub struct FixedRouteProvider {
    outcome: Result<Route, RouteProviderError>,
}

impl FixedRouteProvider {
    /// Always return `route`.
    #[must_use]
    pub const fn new(route: Route) -> Self {
        Self { outcome: Ok(route) }
    }

    /// Always fail with `error`.
    #[must_use]
    pub const fn failing(error: RouteProviderError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl RouteProvider for FixedRouteProvider {
    fn route(&self, _start: Coord<f64>, _finish: Coord<f64>) -> Result<Route, RouteProviderError> {
        self.outcome.clone()
    }
}
