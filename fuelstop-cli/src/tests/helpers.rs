//! Test helpers for building CLI workspaces on disk.

use camino::{Utf8Path, Utf8PathBuf};
use fuelstop_core::Station;
use fuelstop_data::persist_stations_to_sqlite;
use geo::Coord;
use std::fs;
use tempfile::TempDir;

/// Price list with one station a little over halfway along an 8 degree
/// equator trip and one row without coordinates.
pub(super) const PRICE_LIST: &str = "\
OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,Latitude,Longitude
101,EQUATOR FUEL,Hwy 1,Midway,XX,1,3.00,0.01,4.3636364
102,LOST FUEL,Hwy 2,Nowhere,XX,1,2.50,,
";

/// Temporary directory addressed through UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Persist the single located station from [`PRICE_LIST`] to `database`.
pub(super) fn write_station_database(database: &Utf8Path) {
    let station = Station::new(101, "EQUATOR FUEL", Coord { x: 4.363_636_4, y: 0.01 }, 3.00)
        .expect("valid station")
        .with_locality("Midway, XX");
    persist_stations_to_sqlite(database, &[station]).expect("persist station");
}
