//! OSRM API response types for the Route service.
//!
//! Requests ask for `overview=full&geometries=geojson`, so each route carries
//! its full path as a GeoJSON `LineString` of `[lon, lat]` pairs.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route found between the coordinates
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Alternative routes, best first.
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Check if the service found no route.
    #[must_use]
    pub fn is_no_route(&self) -> bool {
        self.code == "NoRoute"
    }
}

/// A single route alternative.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    /// Road distance in metres.
    pub distance: f64,
    /// Expected travel time in seconds.
    pub duration: f64,
    /// Path geometry.
    pub geometry: GeoJsonLineString,
}

/// GeoJSON `LineString` geometry.
#[derive(Debug, Deserialize)]
pub struct GeoJsonLineString {
    /// Ordered `[lon, lat]` positions.
    pub coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 16093.44,
                "duration": 720.5,
                "weight": 720.5,
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-97.7, 30.3], [-97.6, 30.4]]
                },
                "legs": []
            }],
            "waypoints": []
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let route = response.routes.first().expect("one route");
        assert_eq!(route.distance, 16093.44);
        assert_eq!(route.duration, 720.5);
        assert_eq!(route.geometry.coordinates.len(), 2);
    }

    #[test]
    fn deserialise_no_route_response() {
        let json = r#"{
            "code": "NoRoute",
            "message": "Impossible route between points"
        }"#;

        let response: RouteResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert!(response.is_no_route());
        assert!(response.routes.is_empty());
    }
}
