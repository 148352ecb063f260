//! Data access adapters for the Fuelstop engine.
//!
//! Responsibilities:
//! - Import the OPIS truck-stop price list from CSV.
//! - Persist stations to SQLite and serve them through an R\*-tree backed
//!   [`fuelstop_core::StationCatalog`].
//! - Fetch driving routes from an OSRM service through
//!   [`fuelstop_core::RouteProvider`].
//!
//! Boundaries:
//! - Do not encode refuelling rules (live in `fuelstop-core`).
//! - Blocking I/O stays behind the synchronous core traits.
//!
//! Invariants:
//! - Catalogs are read-only snapshots once opened.
//! - No global mutable state.
#![forbid(unsafe_code)]

pub mod catalog;
mod fs;
pub mod routing;

pub use catalog::sqlite::{
    PersistStationsError, SqliteStationCatalog, SqliteStationCatalogError,
    persist_stations_to_sqlite,
};
pub use catalog::{CatalogImportError, ImportedStations, import_stations_csv, read_stations_csv};
