//! Import of the OPIS truck-stop fuel price list.
//!
//! The price list is a CSV file with one row per truck stop:
//!
//! ```text
//! OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,Latitude,Longitude
//! 7,WOODSHED OF BIG CABIN,"I-44, EXIT 283 & US-69",Big Cabin,OK,307,3.00733333,36.5383,-95.2206
//! ```
//!
//! `Latitude` and `Longitude` are optional. Rows without both are skipped,
//! since the engine cannot place a station it cannot locate. A truck stop
//! may appear several times with different rack prices; the cheapest retail
//! price wins.

pub mod sqlite;

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, Trim};
use fuelstop_core::{Station, StationError};
use geo::Coord;
use serde::Deserialize;
use thiserror::Error;

use crate::fs::open_utf8_file;

/// Errors raised while importing the price list.
#[derive(Debug, Error)]
pub enum CatalogImportError {
    /// The CSV file could not be opened.
    #[error("failed to open price list at {path:?}")]
    Open {
        /// Location of the CSV file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A row could not be decoded.
    #[error("failed to read price list: {source}")]
    Parse {
        /// Decoder error returned by `csv`, including the record position.
        #[source]
        source: csv::Error,
    },
}

/// Stations decoded from a price list together with import statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedStations {
    /// Unique stations ordered by identifier.
    pub stations: Vec<Station>,
    /// Data rows read from the file.
    pub rows_read: usize,
    /// Rows skipped because they carried no coordinates.
    pub skipped_without_coordinates: usize,
    /// Rows skipped because their price or coordinates were invalid.
    pub rejected: usize,
    /// Rows folded into an earlier row for the same truck stop.
    pub duplicates_merged: usize,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "OPIS Truckstop ID")]
    truckstop_id: u64,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "City", default)]
    city: String,
    #[serde(rename = "State", default)]
    state: String,
    #[serde(rename = "Retail Price")]
    retail_price: f64,
    #[serde(rename = "Latitude", default)]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    longitude: Option<f64>,
}

impl PriceRow {
    fn location(&self) -> Option<Coord<f64>> {
        match (self.longitude, self.latitude) {
            (Some(x), Some(y)) => Some(Coord { x, y }),
            _ => None,
        }
    }

    fn locality(&self) -> Option<String> {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => Some(format!("{}, {}", self.city, self.state)),
            (false, true) => Some(self.city.clone()),
            (true, false) => Some(self.state.clone()),
            (true, true) => None,
        }
    }

    fn into_station(self, location: Coord<f64>) -> Result<Station, StationError> {
        let locality = self.locality();
        let station = Station::new(self.truckstop_id, self.name, location, self.retail_price)?;
        Ok(match locality {
            Some(label) => station.with_locality(label),
            None => station,
        })
    }
}

/// Read a price list from any reader.
///
/// # Errors
///
/// Returns [`CatalogImportError::Parse`] when the header is missing a
/// required column or a row holds a value of the wrong type.
///
/// # Examples
/// ```
/// use fuelstop_data::read_stations_csv;
///
/// let csv = "\
/// OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,Latitude,Longitude
/// 7,WOODSHED OF BIG CABIN,I-44 EXIT 283,Big Cabin,OK,307,3.007,36.5383,-95.2206
/// 8,NO FIX TRUCK STOP,I-40 EXIT 1,Nowhere,TX,12,3.100,,
/// ";
/// let imported = read_stations_csv(csv.as_bytes())?;
/// assert_eq!(imported.stations.len(), 1);
/// assert_eq!(imported.skipped_without_coordinates, 1);
/// # Ok::<(), fuelstop_data::CatalogImportError>(())
/// ```
pub fn read_stations_csv<R: Read>(reader: R) -> Result<ImportedStations, CatalogImportError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut by_id: BTreeMap<u64, Station> = BTreeMap::new();
    let mut imported = ImportedStations::default();

    for record in csv_reader.deserialize::<PriceRow>() {
        let row = record.map_err(|source| CatalogImportError::Parse { source })?;
        imported.rows_read += 1;

        let Some(location) = row.location() else {
            log::warn!(
                "skipping truck stop {} ({}): no coordinates",
                row.truckstop_id,
                row.name
            );
            imported.skipped_without_coordinates += 1;
            continue;
        };
        let station = match row.into_station(location) {
            Ok(station) => station,
            Err(err) => {
                log::warn!("skipping row: {err}");
                imported.rejected += 1;
                continue;
            }
        };

        match by_id.entry(station.id) {
            Entry::Vacant(slot) => {
                slot.insert(station);
            }
            Entry::Occupied(mut slot) => {
                imported.duplicates_merged += 1;
                if station.price_per_gallon < slot.get().price_per_gallon {
                    slot.insert(station);
                }
            }
        }
    }

    imported.stations = by_id.into_values().collect();
    log::info!(
        "imported {} stations from {} rows",
        imported.stations.len(),
        imported.rows_read
    );
    Ok(imported)
}

/// Read a price list from a CSV file on disk.
///
/// # Errors
///
/// Returns [`CatalogImportError::Open`] when the file cannot be opened and
/// [`CatalogImportError::Parse`] when its contents are malformed.
pub fn import_stations_csv(path: &Utf8Path) -> Result<ImportedStations, CatalogImportError> {
    let file = open_utf8_file(path).map_err(|source| CatalogImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_stations_csv(file)
}
