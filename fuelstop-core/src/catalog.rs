//! Read-only access to fuel stations.
//!
//! The `StationCatalog` trait lets the planner pull candidate stations for a
//! route without knowing how they are stored.

use geo::{Coord, Rect};

use crate::Station;

/// Read-only access to priced fuel stations.
///
/// The bounding box uses WGS84 coordinates (`x = longitude`,
/// `y = latitude`).
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Intersects, Rect};
/// use fuelstop_core::{Station, StationCatalog};
///
/// struct VecCatalog(Vec<Station>);
///
/// impl StationCatalog for VecCatalog {
///     fn stations_in_bbox(
///         &self,
///         bbox: &Rect<f64>,
///     ) -> Box<dyn Iterator<Item = Station> + Send + '_> {
///         let bbox = *bbox;
///         Box::new(
///             self.0
///                 .iter()
///                 .filter(move |s| bbox.intersects(&s.location))
///                 .cloned(),
///         )
///     }
/// }
///
/// let station = Station::new(1, "Depot", Coord { x: -97.0, y: 32.0 }, 3.2).unwrap();
/// let catalog = VecCatalog(vec![station.clone()]);
/// let bbox = Rect::new(Coord { x: -98.0, y: 31.0 }, Coord { x: -96.0, y: 33.0 });
///
/// let found: Vec<_> = catalog.stations_in_bbox(&bbox).collect();
/// assert_eq!(found, vec![station]);
/// ```
pub trait StationCatalog {
    /// Return every station inside `bbox`, boundary included.
    ///
    /// Regions crossing the antimeridian are not modelled; callers must split
    /// such areas into two rectangles.
    fn stations_in_bbox(&self, bbox: &Rect<f64>) -> Box<dyn Iterator<Item = Station> + Send + '_>;
}

/// Degrees of latitude per mile, rounded up so padding errs wide.
const DEGREES_PER_MILE: f64 = 0.014_492_754;

/// Grow `bbox` by `miles` on every side.
///
/// Longitude padding is widened by the cosine of the most poleward latitude
/// so the corridor is covered away from the equator.
///
/// # Examples
/// ```
/// use geo::{Coord, Rect};
/// use fuelstop_core::pad_bbox;
///
/// let bbox = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
/// let padded = pad_bbox(bbox, 69.0);
/// assert!((padded.min().y + 1.0).abs() < 1e-6);
/// assert!(padded.max().x > 2.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "bounding box padding converts miles to degrees"
)]
pub fn pad_bbox(bbox: Rect<f64>, miles: f64) -> Rect<f64> {
    let lat_pad = miles.max(0.0) * DEGREES_PER_MILE;
    let min = bbox.min();
    let max = bbox.max();
    let poleward = (min.y.abs().max(max.y.abs()) + lat_pad).min(89.0);
    let lon_pad = lat_pad / poleward.to_radians().cos();
    Rect::new(
        Coord {
            x: (min.x - lon_pad).max(-180.0),
            y: (min.y - lat_pad).max(-90.0),
        },
        Coord {
            x: (max.x + lon_pad).min(180.0),
            y: (max.y + lat_pad).min(90.0),
        },
    )
}
