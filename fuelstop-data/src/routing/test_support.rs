//! Test utilities for routing providers.
//!
//! This module provides [`StubRouteProvider`], a deterministic test double
//! for [`RouteProvider`] that decodes a canned OSRM response body with the
//! same conversion [`super::HttpRouteProvider`] uses, without making HTTP
//! requests.

use fuelstop_core::{Route, RouteProvider, RouteProviderError};
use geo::Coord;
use serde_json::json;

use super::map_url::DEFAULT_MAP_BASE_URL;
use super::osrm::RouteResponse;
use super::provider::route_from_response;

/// Stub `RouteProvider` for testing.
///
/// # Example
///
/// ```
/// use fuelstop_core::RouteProvider;
/// use fuelstop_data::routing::test_support::{StubRouteProvider, osrm_route_body};
/// use geo::Coord;
///
/// let start = Coord { x: -97.7, y: 30.3 };
/// let finish = Coord { x: -96.8, y: 32.8 };
/// let provider = StubRouteProvider::with_body(osrm_route_body(321_868.8, 10_800.0, &[start, finish]));
///
/// let route = provider.route(start, finish)?;
/// assert!((route.length_miles - 200.0).abs() < 1e-9);
/// # Ok::<(), fuelstop_core::RouteProviderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StubRouteProvider {
    response: StubResponse,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Body(String),
    Error(RouteProviderError),
}

impl StubRouteProvider {
    /// Create a provider that decodes the given OSRM response body.
    #[must_use]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            response: StubResponse::Body(body.into()),
        }
    }

    /// Create a provider that returns the given error.
    #[must_use]
    pub fn with_error(error: RouteProviderError) -> Self {
        Self {
            response: StubResponse::Error(error),
        }
    }
}

/// Build an OSRM Route API body with a single route along `path`.
#[must_use]
pub fn osrm_route_body(distance_metres: f64, duration_secs: f64, path: &[Coord<f64>]) -> String {
    let coordinates: Vec<[f64; 2]> = path.iter().map(|coord| [coord.x, coord.y]).collect();
    json!({
        "code": "Ok",
        "routes": [{
            "distance": distance_metres,
            "duration": duration_secs,
            "geometry": { "type": "LineString", "coordinates": coordinates },
        }],
    })
    .to_string()
}

impl RouteProvider for StubRouteProvider {
    fn route(&self, start: Coord<f64>, finish: Coord<f64>) -> Result<Route, RouteProviderError> {
        match &self.response {
            StubResponse::Body(body) => {
                let response: RouteResponse =
                    serde_json::from_str(body).map_err(|err| RouteProviderError::Parse {
                        message: err.to_string(),
                    })?;
                route_from_response(response, start, finish, Some(DEFAULT_MAP_BASE_URL))
            }
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
