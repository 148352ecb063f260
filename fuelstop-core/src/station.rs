//! Fuel stations offered by the price catalog.

use geo::Coord;
use thiserror::Error;

/// A refuelling point with a posted diesel price.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use fuelstop_core::Station;
///
/// # fn main() -> Result<(), fuelstop_core::StationError> {
/// let station = Station::new(7, "Big Rig Plaza", Coord { x: -97.7, y: 30.3 }, 3.49)?;
/// assert_eq!(station.id, 7);
/// assert_eq!(station.price_per_gallon, 3.49);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    /// Catalog identifier, unique per station.
    pub id: u64,
    /// Display name of the truck stop.
    pub name: String,
    /// Optional "City, ST" label for display.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locality: Option<String>,
    /// Geospatial position.
    pub location: Coord<f64>,
    /// Retail price per gallon.
    pub price_per_gallon: f64,
}

/// Errors returned by [`Station::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StationError {
    /// The price was zero, negative or not a finite number.
    #[error("station {id} has invalid price {price}; prices must be positive")]
    InvalidPrice {
        /// Identifier of the rejected station.
        id: u64,
        /// Offending price.
        price: f64,
    },
    /// The coordinates were not finite or fell outside WGS84 bounds.
    #[error("station {id} has invalid coordinates ({lon}, {lat})")]
    InvalidLocation {
        /// Identifier of the rejected station.
        id: u64,
        /// Offending longitude.
        lon: f64,
        /// Offending latitude.
        lat: f64,
    },
}

impl Station {
    /// Validates and constructs a [`Station`].
    ///
    /// # Errors
    ///
    /// Returns [`StationError`] when the price is not positive or the
    /// location is not a valid longitude/latitude pair.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        location: Coord<f64>,
        price_per_gallon: f64,
    ) -> Result<Self, StationError> {
        if !price_per_gallon.is_finite() || price_per_gallon <= 0.0 {
            return Err(StationError::InvalidPrice {
                id,
                price: price_per_gallon,
            });
        }
        if !is_valid_location(location) {
            return Err(StationError::InvalidLocation {
                id,
                lon: location.x,
                lat: location.y,
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            locality: None,
            location,
            price_per_gallon,
        })
    }

    /// Attach a locality label such as `"Bakersfield, CA"`.
    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = Some(locality.into());
        self
    }
}

fn is_valid_location(location: Coord<f64>) -> bool {
    location.x.is_finite()
        && location.y.is_finite()
        && (-180.0..=180.0).contains(&location.x)
        && (-90.0..=90.0).contains(&location.y)
}
