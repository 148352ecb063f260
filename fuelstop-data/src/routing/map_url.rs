//! Human-viewable map links for planned routes.

use geo::Coord;
use url::Url;

/// OpenStreetMap directions page.
pub const DEFAULT_MAP_BASE_URL: &str = "https://www.openstreetmap.org/directions";

/// Build a driving-directions link between two coordinates.
///
/// The link asks OpenStreetMap to draw the car route with the same OSRM
/// engine used for planning.
///
/// # Errors
///
/// Returns [`url::ParseError`] when `base_url` is not an absolute URL.
///
/// # Examples
/// ```
/// use fuelstop_data::routing::{DEFAULT_MAP_BASE_URL, directions_url};
/// use geo::Coord;
///
/// let url = directions_url(
///     DEFAULT_MAP_BASE_URL,
///     Coord { x: -97.7431, y: 30.2672 },
///     Coord { x: -96.797, y: 32.7767 },
/// )?;
/// assert!(url.as_str().starts_with("https://www.openstreetmap.org/directions?"));
/// # Ok::<(), url::ParseError>(())
/// ```
pub fn directions_url(
    base_url: &str,
    start: Coord<f64>,
    finish: Coord<f64>,
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base_url)?;
    let route = format!(
        "{:.5},{:.5};{:.5},{:.5}",
        start.y, start.x, finish.y, finish.x
    );
    url.query_pairs_mut()
        .append_pair("engine", "fossgis_osrm_car")
        .append_pair("route", &route);
    Ok(url)
}
