//! SQLite persistence and an R\*-tree backed catalog for fuel stations.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use fuelstop_core::{Station, StationCatalog, StationError};
use geo::{Coord, Rect};
use rstar::{AABB, RTree, RTreeObject};
use rusqlite::{Connection, Error as SqliteError, OpenFlags, Transaction};
use thiserror::Error;

use crate::fs::ensure_parent_dir;

/// Errors raised when persisting stations to SQLite.
#[derive(Debug, Error)]
pub enum PersistStationsError {
    /// Failed to create the parent directory for the database.
    #[error("failed to create parent directory for {path:?}")]
    CreateDirectory {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Destination database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Beginning the transaction failed.
    #[error("failed to begin station persistence transaction")]
    BeginTransaction {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the `fuel_stations` table failed.
    #[error("failed to create fuel_stations table")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A station identifier could not be represented as an SQLite integer.
    #[error("station id {station_id} exceeds SQLite i64 range")]
    StationIdOutOfRange {
        /// Identifier that failed the conversion.
        station_id: u64,
    },
    /// Preparing the insert statement failed.
    #[error("failed to prepare station insert statement")]
    PrepareInsert {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Writing a station row failed.
    #[error("failed to persist station {station_id}")]
    PersistRow {
        /// Identifier of the station being persisted.
        station_id: u64,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Committing the transaction failed.
    #[error("failed to commit station persistence transaction")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// Persist stations to a SQLite database on disk.
///
/// The function is idempotent: rows are replaced when identifiers already
/// exist. Parent directories are created automatically and the
/// `fuel_stations` table is initialised if missing.
///
/// # Errors
///
/// Returns [`PersistStationsError`] when the database cannot be created or a
/// row cannot be written. Nothing is committed on failure.
pub fn persist_stations_to_sqlite(
    path: &Utf8Path,
    stations: &[Station],
) -> Result<(), PersistStationsError> {
    ensure_parent_dir(path).map_err(|source| PersistStationsError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })?;
    let mut connection =
        Connection::open(path.as_std_path()).map_err(|source| PersistStationsError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let transaction = connection
        .transaction()
        .map_err(|source| PersistStationsError::BeginTransaction { source })?;

    create_schema(&transaction)?;
    persist_rows(&transaction, stations)?;

    transaction
        .commit()
        .map_err(|source| PersistStationsError::Commit { source })?;
    log::info!("persisted {} stations to {path}", stations.len());
    Ok(())
}

fn create_schema(transaction: &Transaction<'_>) -> Result<(), PersistStationsError> {
    transaction
        .execute(
            "CREATE TABLE IF NOT EXISTS fuel_stations (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                locality TEXT,
                lon REAL NOT NULL,
                lat REAL NOT NULL,
                retail_price REAL NOT NULL
            )",
            [],
        )
        .map(|_| ())
        .map_err(|source| PersistStationsError::CreateSchema { source })
}

fn persist_rows(
    transaction: &Transaction<'_>,
    stations: &[Station],
) -> Result<(), PersistStationsError> {
    if stations.is_empty() {
        return Ok(());
    }

    let mut statement = transaction
        .prepare(
            "INSERT OR REPLACE INTO fuel_stations (id, name, locality, lon, lat, retail_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .map_err(|source| PersistStationsError::PrepareInsert { source })?;

    for station in stations {
        let station_id = i64::try_from(station.id).map_err(|_| {
            PersistStationsError::StationIdOutOfRange {
                station_id: station.id,
            }
        })?;
        statement
            .execute((
                station_id,
                station.name.as_str(),
                station.locality.as_deref(),
                station.location.x,
                station.location.y,
                station.price_per_gallon,
            ))
            .map_err(|source| PersistStationsError::PersistRow {
                station_id: station.id,
                source,
            })?;
    }

    Ok(())
}

/// Errors raised when opening a [`SqliteStationCatalog`].
#[derive(Debug, Error)]
pub enum SqliteStationCatalogError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A stored identifier was negative.
    #[error("stored station id {id} is negative")]
    NegativeId {
        /// Offending identifier.
        id: i64,
    },
    /// A stored row no longer forms a valid station.
    #[error(transparent)]
    InvalidStation(#[from] StationError),
    /// Generic SQLite error when reading station rows.
    #[error(transparent)]
    Database(#[from] SqliteError),
}

/// Station wrapper carrying the envelope used by the R\*-tree.
#[derive(Debug, Clone)]
struct IndexedStation(Station);

impl RTreeObject for IndexedStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.0.location.x, self.0.location.y])
    }
}

/// Read-only station catalog loaded from SQLite into an R\*-tree.
///
/// Queries return stations in ascending identifier order.
///
/// # Examples
/// ```
/// use fuelstop_core::{Station, StationCatalog};
/// use fuelstop_data::SqliteStationCatalog;
/// use geo::{Coord, Rect};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let station = Station::new(1, "Pilot", Coord { x: -97.7, y: 30.3 }, 3.19)?;
/// let catalog = SqliteStationCatalog::from_stations(vec![station]);
/// let bbox = Rect::new(Coord { x: -98.0, y: 30.0 }, Coord { x: -97.0, y: 31.0 });
/// assert_eq!(catalog.stations_in_bbox(&bbox).count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct SqliteStationCatalog {
    index: RTree<IndexedStation>,
}

impl fmt::Debug for SqliteStationCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStationCatalog")
            .field("entries", &self.index.size())
            .finish_non_exhaustive()
    }
}

impl SqliteStationCatalog {
    /// Load every station from the database at `path`.
    ///
    /// The database is opened read-only and released once loaded.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStationCatalogError`] when the database cannot be
    /// opened or holds a row that is not a valid station.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStationCatalogError> {
        let connection =
            Connection::open_with_flags(path.as_std_path(), OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|source| SqliteStationCatalogError::OpenDatabase {
                    path: path.to_path_buf(),
                    source,
                })?;
        let stations = load_stations(&connection)?;
        log::debug!("loaded {} stations from {path}", stations.len());
        Ok(Self::from_stations(stations))
    }

    /// Build a catalog from stations already in memory.
    pub fn from_stations<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = Station>,
    {
        Self {
            index: RTree::bulk_load(stations.into_iter().map(IndexedStation).collect()),
        }
    }

    /// Number of stations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.size()
    }

    /// Whether the catalog holds no stations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.size() == 0
    }
}

impl StationCatalog for SqliteStationCatalog {
    fn stations_in_bbox(&self, bbox: &Rect<f64>) -> Box<dyn Iterator<Item = Station> + Send + '_> {
        let envelope =
            AABB::from_corners([bbox.min().x, bbox.min().y], [bbox.max().x, bbox.max().y]);
        let mut stations: Vec<Station> = self
            .index
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.0.clone())
            .collect();

        stations.sort_unstable_by_key(|station| station.id);

        Box::new(stations.into_iter())
    }
}

fn load_stations(connection: &Connection) -> Result<Vec<Station>, SqliteStationCatalogError> {
    let mut statement = connection
        .prepare("SELECT id, name, locality, lon, lat, retail_price FROM fuel_stations")?;
    let mut rows = statement.query([])?;
    let mut stations = Vec::new();

    while let Some(row) = rows.next()? {
        let raw_id: i64 = row.get(0)?;
        let id =
            u64::try_from(raw_id).map_err(|_| SqliteStationCatalogError::NegativeId { id: raw_id })?;
        let name: String = row.get(1)?;
        let locality: Option<String> = row.get(2)?;
        let lon: f64 = row.get(3)?;
        let lat: f64 = row.get(4)?;
        let price: f64 = row.get(5)?;

        let station = Station::new(id, name, Coord { x: lon, y: lat }, price)?;
        stations.push(match locality {
            Some(label) => station.with_locality(label),
            None => station,
        });
    }

    Ok(stations)
}
