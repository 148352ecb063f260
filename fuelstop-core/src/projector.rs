//! Place catalog stations onto a route.
//!
//! Each station is snapped to the nearest point of the route polyline on the
//! sphere. Its along-route distance becomes its [`RoutePoint`] and its
//! distance from the snapped point becomes its corridor offset. Stations that
//! sit too far from the road, or that snap outside the route, are dropped.

use std::cmp::Ordering;
use std::collections::HashMap;

use geo::{Closest, Distance, Haversine, HaversineClosestPoint, Line, Point};

use crate::{Route, RoutePoint, Station};

/// Default half-width of the corridor around a route, in miles.
pub const DEFAULT_CORRIDOR_WIDTH_MILES: f64 = 5.0;

/// Tolerance used for corridor and range boundary comparisons, in miles.
pub const EPSILON_MILES: f64 = 1e-6;

const METRES_PER_MILE: f64 = 1_609.344;

/// A station tagged with its position along a route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectedStation {
    /// The catalog station.
    pub station: Station,
    /// Distance from the route start to the station's snapped position.
    pub route_point: RoutePoint,
    /// Distance from the station to the route, in miles.
    pub offset_miles: f64,
}

impl ProjectedStation {
    /// Place a station at a known route position, bypassing geometry.
    ///
    /// Useful when positions come from an upstream linear-referencing system.
    #[must_use]
    pub const fn at(station: Station, route_point: RoutePoint) -> Self {
        Self {
            station,
            route_point,
            offset_miles: 0.0,
        }
    }

    /// Posted price per gallon.
    #[must_use]
    pub const fn price_per_gallon(&self) -> f64 {
        self.station.price_per_gallon
    }
}

/// A polyline segment with its cumulative start distance.
struct Segment {
    line: Line<f64>,
    start_miles: f64,
    length_miles: f64,
}

/// Project stations onto `route`, keeping those within `corridor_width_miles`.
///
/// The result is deduplicated by station id (keeping the instance closest to
/// the route) and sorted by route position, then price, then id. An empty
/// result means no station lies in the corridor; it is not an error here.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::{Coord, line_string};
/// use fuelstop_core::{Route, Station, project};
///
/// let geometry = line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0)];
/// let route = Route::new(138.0, Duration::from_secs(7_200), geometry).unwrap();
/// let near = Station::new(1, "Near", Coord { x: 1.0, y: 0.01 }, 3.10).unwrap();
/// let far = Station::new(2, "Far", Coord { x: 1.0, y: 1.0 }, 2.90).unwrap();
///
/// let projected = project(&route, vec![near, far], 5.0);
/// assert_eq!(projected.len(), 1);
/// assert_eq!(projected[0].station.id, 1);
/// assert!((projected[0].route_point.miles() - 69.0).abs() < 0.5);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "corridor comparisons carry a floating-point tolerance"
)]
pub fn project<I>(route: &Route, stations: I, corridor_width_miles: f64) -> Vec<ProjectedStation>
where
    I: IntoIterator<Item = Station>,
{
    let segments = build_segments(route);
    let scale = calibration(route, &segments);
    let route_length = route.length_miles;

    let mut by_id: HashMap<u64, ProjectedStation> = HashMap::new();
    let mut dropped = 0_usize;
    for station in stations {
        let Some((along, offset)) = snap(route, &segments, station.location.into()) else {
            dropped += 1;
            continue;
        };
        let Some(route_point) = place(along, scale, route_length) else {
            dropped += 1;
            continue;
        };
        if offset > corridor_width_miles + EPSILON_MILES {
            dropped += 1;
            continue;
        }
        let candidate = ProjectedStation {
            station,
            route_point,
            offset_miles: offset,
        };
        by_id
            .entry(candidate.station.id)
            .and_modify(|existing| {
                if candidate.offset_miles < existing.offset_miles {
                    *existing = candidate.clone();
                }
            })
            .or_insert(candidate);
    }

    let mut projected: Vec<ProjectedStation> = by_id.into_values().collect();
    projected.sort_by(compare_projected);
    log::debug!(
        "projected {} stations onto a {route_length:.1} mile route; dropped {dropped} outside the {corridor_width_miles} mile corridor",
        projected.len()
    );
    projected
}

/// Ordering used for optimiser input: position, then price, then id.
fn compare_projected(lhs: &ProjectedStation, rhs: &ProjectedStation) -> Ordering {
    lhs.route_point
        .miles()
        .total_cmp(&rhs.route_point.miles())
        .then_with(|| lhs.price_per_gallon().total_cmp(&rhs.price_per_gallon()))
        .then_with(|| lhs.station.id.cmp(&rhs.station.id))
}

#[expect(
    clippy::float_arithmetic,
    reason = "unit conversion from metres to miles"
)]
fn haversine_miles(from: Point<f64>, to: Point<f64>) -> f64 {
    Haversine.distance(from, to) / METRES_PER_MILE
}

#[expect(
    clippy::float_arithmetic,
    reason = "cumulative route distance is a floating-point sum"
)]
fn build_segments(route: &Route) -> Vec<Segment> {
    let mut start_miles = 0.0;
    route
        .geometry
        .lines()
        .map(|line| {
            let length_miles = haversine_miles(line.start_point(), line.end_point());
            let segment = Segment {
                line,
                start_miles,
                length_miles,
            };
            start_miles += length_miles;
            segment
        })
        .collect()
}

/// Factor mapping geometry miles onto the route's reported road length.
#[expect(
    clippy::float_arithmetic,
    reason = "calibration is a ratio of two distances"
)]
fn calibration(route: &Route, segments: &[Segment]) -> f64 {
    let geometry_miles: f64 = segments.iter().map(|segment| segment.length_miles).sum();
    if geometry_miles > EPSILON_MILES {
        route.length_miles / geometry_miles
    } else {
        1.0
    }
}

/// Nearest position along the geometry as `(along_miles, offset_miles)`.
fn snap(route: &Route, segments: &[Segment], point: Point<f64>) -> Option<(f64, f64)> {
    if segments.is_empty() {
        let origin = route.geometry.points().next()?;
        return Some((0.0, haversine_miles(origin, point)));
    }
    segments
        .iter()
        .filter_map(|segment| snap_to_segment(segment, point))
        .min_by(|(lhs_along, lhs_offset), (rhs_along, rhs_offset)| {
            lhs_offset
                .total_cmp(rhs_offset)
                .then_with(|| lhs_along.total_cmp(rhs_along))
        })
}

#[expect(
    clippy::float_arithmetic,
    reason = "along-segment distance is offset from the segment start"
)]
fn snap_to_segment(segment: &Segment, point: Point<f64>) -> Option<(f64, f64)> {
    let nearest = match segment.line.haversine_closest_point(&point) {
        Closest::Intersection(nearest) | Closest::SinglePoint(nearest) => nearest,
        Closest::Indeterminate => return None,
    };
    let into_segment =
        haversine_miles(segment.line.start_point(), nearest).min(segment.length_miles);
    let offset = haversine_miles(nearest, point);
    Some((segment.start_miles + into_segment, offset))
}

/// Scale an along-geometry distance and keep it only if it lies on the route.
#[expect(
    clippy::float_arithmetic,
    reason = "route positions are scaled floating-point distances"
)]
fn place(along_miles: f64, scale: f64, route_length: f64) -> Option<RoutePoint> {
    let miles = along_miles * scale;
    if !miles.is_finite() || miles < -EPSILON_MILES || miles > route_length + EPSILON_MILES {
        return None;
    }
    Some(RoutePoint::new(miles.clamp(0.0, route_length)))
}

#[cfg(test)]
#[expect(clippy::float_arithmetic, reason = "assertions compare floating-point distances")]
mod tests {
    use super::*;
    use geo::{Coord, LineString, line_string};
    use rstest::{fixture, rstest};
    use std::time::Duration;

    /// One degree of longitude on the equator, in miles.
    const DEGREE_MILES: f64 = 69.093;

    fn station(id: u64, lon: f64, lat: f64, price: f64) -> Station {
        Station::new(id, format!("Station {id}"), Coord { x: lon, y: lat }, price)
            .expect("valid station")
    }

    #[fixture]
    fn equator_route() -> Route {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)];
        Route::new(2.0 * DEGREE_MILES, Duration::from_secs(3_600), geometry).expect("route")
    }

    #[rstest]
    fn orders_by_route_point(equator_route: Route) {
        let stations = vec![
            station(1, 1.5, 0.0, 3.0),
            station(2, 0.5, 0.0, 3.0),
            station(3, 1.0, 0.0, 3.0),
        ];
        let ids: Vec<u64> = project(&equator_route, stations, 5.0)
            .iter()
            .map(|p| p.station.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[rstest]
    fn breaks_position_ties_by_price(equator_route: Route) {
        let stations = vec![station(1, 1.0, 0.0, 3.5), station(2, 1.0, 0.0, 3.1)];
        let ids: Vec<u64> = project(&equator_route, stations, 5.0)
            .iter()
            .map(|p| p.station.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[rstest]
    fn drops_stations_outside_corridor(equator_route: Route) {
        // 0.1 degrees of latitude is roughly 6.9 miles.
        let stations = vec![station(1, 1.0, 0.1, 3.0), station(2, 1.0, 0.05, 3.0)];
        let projected = project(&equator_route, stations, 5.0);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].station.id, 2);
        assert!(projected[0].offset_miles > 3.0 && projected[0].offset_miles < 4.0);
    }

    #[rstest]
    fn deduplicates_by_id_keeping_closest(equator_route: Route) {
        let stations = vec![station(9, 0.5, 0.05, 3.0), station(9, 1.5, 0.01, 3.0)];
        let projected = project(&equator_route, stations, 5.0);
        assert_eq!(projected.len(), 1);
        assert!((projected[0].route_point.miles() - 1.5 * DEGREE_MILES).abs() < 0.5);
    }

    #[rstest]
    fn stations_beyond_the_ends_snap_to_endpoints_only_within_corridor(equator_route: Route) {
        let stations = vec![station(1, -0.02, 0.0, 3.0), station(2, 2.5, 0.0, 3.0)];
        let projected = project(&equator_route, stations, 5.0);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].station.id, 1);
        assert!(projected[0].route_point.miles().abs() < 1e-6);
    }

    #[rstest]
    fn calibrates_to_reported_length() {
        let geometry = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)];
        // The road is twice as long as the straight-line geometry.
        let route =
            Route::new(2.0 * DEGREE_MILES, Duration::from_secs(60), geometry).expect("route");
        let projected = project(&route, vec![station(1, 0.5, 0.0, 3.0)], 5.0);
        assert!((projected[0].route_point.miles() - DEGREE_MILES).abs() < 0.5);
    }

    #[rstest]
    fn single_point_geometry_projects_to_start() {
        let geometry = LineString::from(vec![Coord { x: 0.0, y: 0.0 }]);
        let route = Route::new(10.0, Duration::from_secs(60), geometry).expect("route");
        let projected = project(&route, vec![station(1, 0.01, 0.0, 3.0)], 5.0);
        assert_eq!(projected.len(), 1);
        assert!(projected[0].route_point.miles().abs() < f64::EPSILON);
    }

    #[rstest]
    fn returns_empty_when_nothing_is_near(equator_route: Route) {
        let projected = project(&equator_route, vec![station(1, 1.0, 5.0, 3.0)], 5.0);
        assert!(projected.is_empty());
    }
}
